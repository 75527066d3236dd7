use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::ScanResponse,
    upload::{ImageUpload, StoredImage},
};
use crate::{
    ai::{
        models::{resolve, UnknownModel},
        ClassifierError,
    },
    error::ApiError,
    pantry::{
        names::{parse_detected, MAX_NAME_LEN},
        store::StoreError,
    },
    recipes::services::suggest_or_empty,
    state::AppState,
};

pub struct ScanRequest {
    pub image: Option<ImageUpload>,
    pub model: Option<String>,
    pub recipe_model: Option<String>,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("an image file is required")]
    MissingInput,
    #[error(transparent)]
    UnknownModel(#[from] UnknownModel),
    #[error("failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ScanError> for ApiError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::MissingInput => ApiError::BadRequest(e.to_string()),
            ScanError::UnknownModel(e) => e.into(),
            ScanError::Staging(_) => ApiError::internal(e),
            ScanError::Classifier(e) => e.into(),
            ScanError::Store(e) => e.into(),
        }
    }
}

/// Detect ingredients in an image, add the new ones to the user's pantry and
/// suggest recipes for everything detected.
///
/// Validation happens before any upstream or store call. Recipe suggestion
/// never fails the scan; a bad or missing answer is an empty list.
#[instrument(skip(state, req))]
pub async fn scan_and_suggest(
    state: &AppState,
    user_id: Uuid,
    req: ScanRequest,
) -> Result<ScanResponse, ScanError> {
    let image = req
        .image
        .filter(|img| !img.body.is_empty())
        .ok_or(ScanError::MissingInput)?;
    let defaults = &state.config.ai;
    let vision_model = resolve(req.model.as_deref(), defaults.default_vision_model)?;
    let recipe_model = resolve(req.recipe_model.as_deref(), defaults.default_recipe_model)?;

    let scan = &state.config.scan;
    let stored = StoredImage::store(&scan.upload_dir, image).await?;
    debug!(path = %stored.path().display(), "upload staged");

    let payload = stored.load().await?;
    let raw = state.vision.classify(&payload, vision_model).await?;
    drop(stored);

    let (detected, overlong): (Vec<String>, Vec<String>) = parse_detected(&raw)
        .into_iter()
        .partition(|name| name.chars().count() <= MAX_NAME_LEN);
    if !overlong.is_empty() {
        warn!(
            skipped = overlong.len(),
            max = MAX_NAME_LEN,
            "dropping detected names that are too long for a pantry row"
        );
    }
    let inserted = state
        .pantry
        .insert_missing(
            user_id,
            &detected,
            scan.default_quantity,
            scan.placeholder_expiration,
        )
        .await?;
    info!(
        detected = detected.len(),
        inserted,
        model = %vision_model,
        "pantry updated from scan"
    );

    let suggested_recipes =
        suggest_or_empty(state.recipes.as_ref(), &detected, recipe_model).await;

    Ok(ScanResponse {
        detected_ingredients: detected,
        pantry_updated: true,
        suggested_recipes,
    })
}
