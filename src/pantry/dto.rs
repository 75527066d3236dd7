use serde::Deserialize;
use time::Date;

use super::{
    names::{normalize_name, MAX_NAME_LEN},
    repo_types::iso_date,
    store::{IngredientPatch, NewIngredient},
};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub quantity: f64,
    #[serde(with = "iso_date")]
    pub expiration_date: Date,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    #[serde(default, with = "iso_date::option")]
    pub expiration_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 50 }

impl Pagination {
    /// Clamp to sane bounds before hitting the database.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 200), self.offset.max(0))
    }
}

fn validate_name(raw: &str) -> Result<String, ApiError> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

fn validate_quantity(q: f64) -> Result<f64, ApiError> {
    if !q.is_finite() || q < 0.0 {
        return Err(ApiError::BadRequest("quantity must be a non-negative number".into()));
    }
    Ok(q)
}

impl TryFrom<CreateIngredientRequest> for NewIngredient {
    type Error = ApiError;

    fn try_from(req: CreateIngredientRequest) -> Result<Self, Self::Error> {
        Ok(NewIngredient {
            name: validate_name(&req.name)?,
            quantity: validate_quantity(req.quantity)?,
            expiration_date: req.expiration_date,
        })
    }
}

impl TryFrom<UpdateIngredientRequest> for IngredientPatch {
    type Error = ApiError;

    fn try_from(req: UpdateIngredientRequest) -> Result<Self, Self::Error> {
        Ok(IngredientPatch {
            name: req.name.as_deref().map(validate_name).transpose()?,
            quantity: req.quantity.map(validate_quantity).transpose()?,
            expiration_date: req.expiration_date,
        })
    }
}
