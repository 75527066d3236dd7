use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    ai::models::resolve,
    auth::jwt::AuthUser,
    error::ApiError,
    pantry::names::normalize_list,
    state::AppState,
};

use super::{
    dto::{SuggestRequest, SuggestResponse},
    services::suggest_or_empty,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/recipes/suggest", post(suggest_recipes))
}

#[instrument(skip(state, body))]
pub async fn suggest_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let ingredients = normalize_list(body.ingredients.iter().map(String::as_str));
    if ingredients.is_empty() {
        return Err(ApiError::BadRequest("ingredients list is required".into()));
    }
    let model = resolve(body.model.as_deref(), state.config.ai.default_recipe_model)?;

    let recipes = suggest_or_empty(state.recipes.as_ref(), &ingredients, model).await;
    Ok(Json(SuggestResponse { recipes }))
}
