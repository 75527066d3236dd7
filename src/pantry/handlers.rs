use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::{
    dto::{CreateIngredientRequest, Pagination, UpdateIngredientRequest},
    repo_types::Ingredient,
    store::{IngredientPatch, NewIngredient},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route(
            "/ingredients/:id",
            get(get_ingredient)
                .put(update_ingredient)
                .patch(update_ingredient)
                .delete(delete_ingredient),
        )
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let (limit, offset) = p.clamped();
    let rows = state.pantry.list(user_id, limit, offset).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, body))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Ingredient>), ApiError> {
    let new = NewIngredient::try_from(body)?;
    let created = state.pantry.create(user_id, new).await?;
    info!(%user_id, id = %created.id, name = %created.name, "ingredient created");

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/ingredients/{}", created.id))
        .map_err(ApiError::internal)?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Ingredient>, ApiError> {
    Ok(Json(state.pantry.get(user_id, id).await?))
}

/// Serves both PUT and PATCH; absent fields keep their stored values.
#[instrument(skip(state, body))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateIngredientRequest>,
) -> Result<Json<Ingredient>, ApiError> {
    let patch = IngredientPatch::try_from(body)?;
    let updated = state.pantry.update(user_id, id, patch).await?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.pantry.delete(user_id, id).await?;
    info!(%user_id, %id, "ingredient deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn create_body(name: &str) -> Json<CreateIngredientRequest> {
        Json(CreateIngredientRequest {
            name: name.into(),
            quantity: 2.0,
            expiration_date: date!(2026 - 12 - 01),
        })
    }

    #[tokio::test]
    async fn create_then_fetch_scoped_to_owner() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();

        let (status, headers, Json(created)) = create_ingredient(
            State(state.clone()),
            AuthUser(owner),
            create_body(" Milk "),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.name, "milk");
        assert_eq!(
            headers[header::LOCATION],
            format!("/api/v1/ingredients/{}", created.id).as_str()
        );

        let Json(fetched) = get_ingredient(State(state.clone()), AuthUser(owner), Path(created.id))
            .await
            .unwrap();
        assert_eq!(fetched, created);

        let other = get_ingredient(State(state), AuthUser(Uuid::new_v4()), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(other.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        create_ingredient(State(state.clone()), AuthUser(owner), create_body("egg"))
            .await
            .unwrap();
        let err = create_ingredient(State(state), AuthUser(owner), create_body("EGG"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn patch_keeps_unspecified_fields_and_delete_removes() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        let (_, _, Json(created)) =
            create_ingredient(State(state.clone()), AuthUser(owner), create_body("rice"))
                .await
                .unwrap();

        let patch = UpdateIngredientRequest {
            quantity: Some(0.5),
            ..Default::default()
        };
        let Json(updated) = update_ingredient(
            State(state.clone()),
            AuthUser(owner),
            Path(created.id),
            Json(patch),
        )
        .await
        .unwrap();
        assert_eq!(updated.quantity, 0.5);
        assert_eq!(updated.name, "rice");
        assert_eq!(updated.expiration_date, created.expiration_date);

        let status = delete_ingredient(State(state.clone()), AuthUser(owner), Path(created.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let again = delete_ingredient(State(state), AuthUser(owner), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_only_own_rows() {
        let state = AppState::fake();
        let (me, them) = (Uuid::new_v4(), Uuid::new_v4());
        for name in ["a", "b"] {
            create_ingredient(State(state.clone()), AuthUser(me), create_body(name))
                .await
                .unwrap();
        }
        create_ingredient(State(state.clone()), AuthUser(them), create_body("c"))
            .await
            .unwrap();

        let p = Pagination { limit: 50, offset: 0 };
        let Json(rows) = list_ingredients(State(state), AuthUser(me), Query(p))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.user_id == me));
    }
}
