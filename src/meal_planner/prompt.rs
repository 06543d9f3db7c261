use super::dto::UserProfile;

pub const SYSTEM_PROMPT: &str = "You are a nutrition expert that provides meal plans in valid JSON format only. \
Your responses must be properly formatted JSON with no additional text or markdown formatting.";

const MEAL_SHAPE: &str = r#"{
    "name": "[GENERATE APPROPRIATE NAME]",
    "description": "[GENERATE BRIEF DESCRIPTION]",
    "calories": [APPROPRIATE CALORIE NUMBER],
    "protein": [APPROPRIATE PROTEIN GRAMS],
    "carbs": [APPROPRIATE CARB GRAMS],
    "fat": [APPROPRIATE FAT GRAMS],
    "rationale": "[EXPLAIN WHY THIS MEAL FITS USER'S NEEDS]",
    "preparation_steps": ["[STEP 1]", "[STEP 2]", "..."]
  }"#;

fn yes_no(v: bool) -> &'static str {
    if v {
        "yes"
    } else {
        "no"
    }
}

pub fn render_prompt(profile: &UserProfile) -> String {
    let allergies = if profile.allergies.is_empty() {
        "none".to_string()
    } else {
        profile.allergies.join(", ")
    };

    format!(
        r#"Create a personalized daily meal plan based on these user details:
Goal: {goal}
Weight: {weight}kg
Height: {height}cm
Meat Eater: {meat}
Lactose Intolerant: {lactose}
Allergies: {allergies}
Eating Style: {style}
Caffeine: {caffeine}
Sugar: {sugar}

You MUST respond with a valid JSON object containing personalized meal recommendations appropriate for this specific user. Return ONLY a JSON object with exactly four keys, "breakfast", "lunch", "snack" and "dinner", each matching this structure:

{{
  "breakfast": {shape},
  "lunch": {shape},
  "snack": {shape},
  "dinner": {shape}
}}

IMPORTANT:
- Create realistic, nutritionally appropriate meals for this user's specific profile and goal
- All nutritional values must be numbers without units (no "g" suffix)
- Ensure preparation_steps is an array of strings with clear cooking/preparation instructions
- Provide accurate nutritional values based on the ingredients
- The response must be a valid JSON object with NO text outside the JSON
- For a user trying to {goal}, adjust calories and macros accordingly
- DO NOT include any markdown formatting, just return the raw JSON
"#,
        goal = profile.primary_goal,
        weight = profile.weight_kg,
        height = profile.height_cm,
        meat = yes_no(profile.is_meat_eater),
        lactose = yes_no(profile.is_lactose_intolerant),
        allergies = allergies,
        style = profile.eating_style,
        caffeine = profile.caffeine_consumption,
        sugar = profile.sugar_consumption,
        shape = MEAL_SHAPE,
    )
}
