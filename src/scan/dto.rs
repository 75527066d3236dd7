use serde::Serialize;

use crate::recipes::dto::Recipe;

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub detected_ingredients: Vec<String>,
    pub pantry_updated: bool,
    pub suggested_recipes: Vec<Recipe>,
}
