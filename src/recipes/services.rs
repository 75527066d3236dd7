use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::dto::Recipe;
use crate::ai::{models::RecipeModel, RecipeSuggester};

#[derive(Debug, Error)]
#[error("malformed recipe payload: {0}")]
pub struct MalformedPayload(#[from] serde_json::Error);

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Recipe>),
    Wrapped { recipes: Vec<Recipe> },
}

/// Parse suggestion output. Accepts a bare array or `{"recipes": [...]}`.
pub fn parse_recipes(text: &str) -> Result<Vec<Recipe>, MalformedPayload> {
    let payload: Payload = serde_json::from_str(text.trim())?;
    Ok(match payload {
        Payload::List(recipes) | Payload::Wrapped { recipes } => recipes,
    })
}

/// Ask for recipes; any upstream or parse failure yields an empty list.
pub async fn suggest_or_empty(
    client: &dyn RecipeSuggester,
    ingredients: &[String],
    model: RecipeModel,
) -> Vec<Recipe> {
    let raw = match client.suggest(ingredients, model).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, %model, "recipe suggestion failed, returning none");
            return Vec::new();
        }
    };
    match parse_recipes(&raw) {
        Ok(recipes) => {
            debug!(count = recipes.len(), %model, "recipes suggested");
            recipes
        }
        Err(e) => {
            warn!(error = %e, %model, "discarding unparseable recipe output");
            Vec::new()
        }
    }
}
