use serde::{Deserialize, Serialize};

/// Request body for `POST /meal-planner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub primary_goal: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub is_meat_eater: bool,
    pub is_lactose_intolerant: bool,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub eating_style: String,
    pub caffeine_consumption: String,
    pub sugar_consumption: String,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err("weight_kg must be a positive number".into());
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err("height_cm must be a positive number".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub rationale: String,
    pub preparation_steps: Vec<String>,
}

/// Response body: one meal per slot, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMealPlan {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub snack: Meal,
    pub dinner: Meal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_planner::fixtures::profile;

    #[test]
    fn allergies_default_to_empty() {
        let body = r#"{
            "primary_goal": "maintain",
            "weight_kg": 70,
            "height_cm": 170,
            "is_meat_eater": false,
            "is_lactose_intolerant": true,
            "eating_style": "vegetarian",
            "caffeine_consumption": "none",
            "sugar_consumption": "high"
        }"#;
        let p: UserProfile = serde_json::from_str(body).unwrap();
        assert!(p.allergies.is_empty());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn non_positive_measurements_are_rejected() {
        let mut p = profile();
        p.weight_kg = 0.0;
        assert!(p.validate().unwrap_err().contains("weight_kg"));

        let mut p = profile();
        p.height_cm = -5.0;
        assert!(p.validate().unwrap_err().contains("height_cm"));

        let mut p = profile();
        p.weight_kg = f64::NAN;
        assert!(p.validate().is_err());
    }
}
