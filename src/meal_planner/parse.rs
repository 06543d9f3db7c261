//! Turning model text into a [`DailyMealPlan`].
//!
//! Models asked for "JSON only" still wrap the object in prose now and then,
//! so parsing falls back to pulling the plan object out of the surrounding
//! text before giving up.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::dto::{DailyMealPlan, Meal};
use crate::errors::GenerationError;

pub const MEAL_SLOTS: [&str; 4] = ["breakfast", "lunch", "snack", "dinner"];

pub const MEAL_FIELDS: [&str; 8] = [
    "name",
    "description",
    "calories",
    "protein",
    "carbs",
    "fat",
    "rationale",
    "preparation_steps",
];

pub const NO_JSON_OBJECT: &str = "no JSON object located";

pub(crate) fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

/// Greedy `{ ... "breakfast" ... }` region: first `{` that is eventually
/// followed by `"breakfast"`, through the last `}` in the text.
pub fn locate_plan_object(text: &str) -> Option<&str> {
    lazy_static! {
        static ref PLAN_RE: Regex = Regex::new(r#"(?s)\{.*?"breakfast".*\}"#).unwrap();
    }
    PLAN_RE.find(text).map(|m| m.as_str())
}

/// Strict parse, then one repair attempt on the located plan object.
pub fn parse_plan_json(text: &str) -> Result<Map<String, Value>, GenerationError> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(v) => v,
        Err(strict_err) => {
            warn!(error = %strict_err, "strict JSON parse failed, attempting extraction");
            let Some(candidate) = locate_plan_object(text) else {
                error!(raw = %text, "could not locate a JSON object in model output");
                return Err(GenerationError::MalformedOutput {
                    reason: NO_JSON_OBJECT.into(),
                    raw: text.to_string(),
                });
            };
            info!(preview = %preview(candidate), "extracted JSON candidate");
            serde_json::from_str::<Value>(candidate).map_err(|e| {
                error!(error = %e, raw = %text, "extracted JSON failed to parse");
                GenerationError::MalformedOutput {
                    reason: e.to_string(),
                    raw: text.to_string(),
                }
            })?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(GenerationError::MalformedOutput {
            reason: format!("expected a JSON object, got {}", kind_of(&other)),
            raw: text.to_string(),
        }),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Every slot present and an object, every slot carrying every field.
pub fn validate_plan(data: &Map<String, Value>) -> Result<(), GenerationError> {
    for slot in MEAL_SLOTS {
        let meal = data
            .get(slot)
            .and_then(Value::as_object)
            .ok_or_else(|| GenerationError::SchemaViolation {
                key: slot.to_string(),
                meal: None,
            })?;
        if let Some(field) = MEAL_FIELDS.iter().find(|f| !meal.contains_key(**f)) {
            return Err(GenerationError::SchemaViolation {
                key: field.to_string(),
                meal: Some(slot.to_string()),
            });
        }
    }
    Ok(())
}

fn coercion(slot: &str, field: &str, reason: impl Into<String>) -> GenerationError {
    GenerationError::TypeCoercion {
        meal: slot.to_string(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn number_field(meal: &Map<String, Value>, slot: &str, field: &str) -> Result<f64, GenerationError> {
    let n = match &meal[field] {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| coercion(slot, field, "number out of range"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| coercion(slot, field, format!("{s:?} is not a number")))?,
        other => return Err(coercion(slot, field, format!("expected a number, got {}", kind_of(other)))),
    };
    if !n.is_finite() || n < 0.0 {
        return Err(coercion(slot, field, format!("{n} is not a non-negative number")));
    }
    Ok(n)
}

fn text_field(meal: &Map<String, Value>, slot: &str, field: &str) -> Result<String, GenerationError> {
    meal[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| coercion(slot, field, format!("expected a string, got {}", kind_of(&meal[field]))))
}

fn steps_field(meal: &Map<String, Value>, slot: &str) -> Result<Vec<String>, GenerationError> {
    const FIELD: &str = "preparation_steps";
    let items = meal[FIELD]
        .as_array()
        .ok_or_else(|| coercion(slot, FIELD, format!("expected an array, got {}", kind_of(&meal[FIELD]))))?;
    if items.is_empty() {
        return Err(coercion(slot, FIELD, "must contain at least one step"));
    }
    items
        .iter()
        .map(|step| {
            step.as_str()
                .map(str::to_string)
                .ok_or_else(|| coercion(slot, FIELD, "every step must be a string"))
        })
        .collect()
}

fn meal_from_json(data: &Map<String, Value>, slot: &str) -> Result<Meal, GenerationError> {
    let meal = data
        .get(slot)
        .and_then(Value::as_object)
        .ok_or_else(|| GenerationError::SchemaViolation {
            key: slot.to_string(),
            meal: None,
        })?;
    Ok(Meal {
        name: text_field(meal, slot, "name")?,
        description: text_field(meal, slot, "description")?,
        calories: number_field(meal, slot, "calories")?,
        protein: number_field(meal, slot, "protein")?,
        carbs: number_field(meal, slot, "carbs")?,
        fat: number_field(meal, slot, "fat")?,
        rationale: text_field(meal, slot, "rationale")?,
        preparation_steps: steps_field(meal, slot)?,
    })
}

/// Validates first, then builds; unknown extra keys are ignored.
pub fn build_plan(data: &Map<String, Value>) -> Result<DailyMealPlan, GenerationError> {
    validate_plan(data)?;
    Ok(DailyMealPlan {
        breakfast: meal_from_json(data, "breakfast")?,
        lunch: meal_from_json(data, "lunch")?,
        snack: meal_from_json(data, "snack")?,
        dinner: meal_from_json(data, "dinner")?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::meal_planner::fixtures::{plan_json, plan_value};

    #[test]
    fn strict_json_parses() {
        let map = parse_plan_json(&plan_json()).unwrap();
        assert_eq!(Value::Object(map), plan_value());
    }

    #[test]
    fn json_embedded_in_prose_is_extracted() {
        let embedded = plan_json();
        let text = format!("Here is your plan:\n{embedded}\nEnjoy!");
        let map = parse_plan_json(&text).unwrap();
        let alone: Value = serde_json::from_str(&embedded).unwrap();
        assert_eq!(Value::Object(map), alone);
    }

    #[test]
    fn markdown_fences_are_stripped_by_extraction() {
        let text = format!("```json\n{}\n```", plan_json());
        assert!(parse_plan_json(&text).is_ok());
    }

    #[test]
    fn locate_spans_first_brace_to_last_brace() {
        let text = "pre {\"x\": 1, \"breakfast\": {}} mid } post";
        assert_eq!(
            locate_plan_object(text),
            Some("{\"x\": 1, \"breakfast\": {}} mid }")
        );
        assert_eq!(locate_plan_object("{\"lunch\": {}}"), None);
        assert_eq!(locate_plan_object("no braces here"), None);
    }

    #[test]
    fn text_without_braces_reports_no_object() {
        let err = parse_plan_json("Sorry, I cannot help with that.").unwrap_err();
        match err {
            GenerationError::MalformedOutput { reason, raw } => {
                assert_eq!(reason, NO_JSON_OBJECT);
                assert_eq!(raw, "Sorry, I cannot help with that.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn broken_candidate_reports_decode_error() {
        let text = "plan: { \"breakfast\": { \"name\": \"Oats\", } }";
        let err = parse_plan_json(text).unwrap_err();
        match err {
            GenerationError::MalformedOutput { reason, raw } => {
                assert_ne!(reason, NO_JSON_OBJECT);
                assert!(!reason.is_empty());
                assert_eq!(raw, text);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_object_json_is_malformed() {
        let err = parse_plan_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput { .. }));
    }

    #[test]
    fn missing_snack_is_named() {
        let mut v = plan_value();
        v.as_object_mut().unwrap().remove("snack");
        let err = build_plan(v.as_object().unwrap()).unwrap_err();
        match err {
            GenerationError::SchemaViolation { key, meal } => {
                assert_eq!(key, "snack");
                assert_eq!(meal, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_field_names_meal_and_field() {
        let mut v = plan_value();
        v["dinner"].as_object_mut().unwrap().remove("fat");
        let err = build_plan(v.as_object().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "missing required key in dinner: fat");
    }

    #[test]
    fn non_object_meal_is_a_schema_violation() {
        let mut v = plan_value();
        v["lunch"] = json!("soup");
        let err = build_plan(v.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, GenerationError::SchemaViolation { ref key, .. } if key == "lunch"));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let mut v = plan_value();
        v["breakfast"]["calories"] = json!(" 350 ");
        v["breakfast"]["protein"] = json!("21.5");
        let plan = build_plan(v.as_object().unwrap()).unwrap();
        assert_eq!(plan.breakfast.calories, 350.0);
        assert_eq!(plan.breakfast.protein, 21.5);
    }

    #[test]
    fn unit_suffixed_values_fail_coercion() {
        let mut v = plan_value();
        v["snack"]["carbs"] = json!("30g");
        let err = build_plan(v.as_object().unwrap()).unwrap_err();
        match err {
            GenerationError::TypeCoercion { meal, field, .. } => {
                assert_eq!(meal, "snack");
                assert_eq!(field, "carbs");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_and_null_numbers_fail_coercion() {
        let mut v = plan_value();
        v["lunch"]["fat"] = json!(-1.0);
        assert!(matches!(
            build_plan(v.as_object().unwrap()),
            Err(GenerationError::TypeCoercion { .. })
        ));

        let mut v = plan_value();
        v["lunch"]["fat"] = Value::Null;
        assert!(matches!(
            build_plan(v.as_object().unwrap()),
            Err(GenerationError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn empty_or_non_string_steps_fail() {
        let mut v = plan_value();
        v["dinner"]["preparation_steps"] = json!([]);
        assert!(matches!(
            build_plan(v.as_object().unwrap()),
            Err(GenerationError::TypeCoercion { ref field, .. }) if field == "preparation_steps"
        ));

        let mut v = plan_value();
        v["dinner"]["preparation_steps"] = json!("Boil water");
        assert!(build_plan(v.as_object().unwrap()).is_err());
    }

    #[test]
    fn build_then_serialize_matches_input() {
        let input = plan_value();
        let plan = build_plan(input.as_object().unwrap()).unwrap();
        assert_eq!(serde_json::to_value(&plan).unwrap(), input);
        assert_eq!(
            plan.breakfast.preparation_steps,
            vec!["Simmer oats in water".to_string(), "Top with berries".to_string()]
        );
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut v = plan_value();
        v["notes"] = json!("drink water");
        v["lunch"]["cuisine"] = json!("greek");
        assert!(build_plan(v.as_object().unwrap()).is_ok());
    }
}
