use serde::{Deserialize, Deserializer, Serialize};

/// One suggested recipe as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(deserialize_with = "instructions_text")]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients_needed: Option<Vec<String>>,
}

/// Models sometimes return instructions as a list of steps.
#[derive(Deserialize)]
#[serde(untagged)]
enum Instructions {
    Text(String),
    Steps(Vec<String>),
}

fn instructions_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Instructions::deserialize(d)? {
        Instructions::Text(text) => text,
        Instructions::Steps(steps) => steps.join("\n"),
    })
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub recipes: Vec<Recipe>,
}
