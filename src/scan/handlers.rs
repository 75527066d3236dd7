use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::{
    dto::ScanResponse,
    services::{scan_and_suggest, ScanRequest},
    upload::ImageUpload,
};

pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/ingredients/scan", post(scan_ingredients))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// POST /ingredients/scan (multipart)
/// Fields: `image` (file), optional `model` and `recipe_model`.
#[instrument(skip(state, mp))]
pub async fn scan_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<Json<ScanResponse>, ApiError> {
    let mut req = ScanRequest {
        image: None,
        model: None,
        recipe_model: None,
    };

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let file_name = field.file_name().map(str::to_owned);
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read image: {e}")))?;
                req.image = Some(ImageUpload {
                    body,
                    content_type,
                    file_name,
                });
            }
            Some("model") => req.model = Some(text_field(field).await?),
            Some("recipe_model") => req.recipe_model = Some(text_field(field).await?),
            other => warn!(field = ?other, "ignoring unexpected multipart field"),
        }
    }

    let resp = scan_and_suggest(&state, user_id, req).await?;
    Ok(Json(resp))
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid form field: {e}")))
}
