use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use super::repo_types::Ingredient;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ingredient not found")]
    NotFound,
    #[error("an ingredient named '{0}' already exists")]
    Duplicate(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Validated values for a new pantry row.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub quantity: f64,
    pub expiration_date: Date,
}

/// Partial edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct IngredientPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub expiration_date: Option<Date>,
}

/// Per-user ingredient persistence. `(user_id, name)` is unique.
#[async_trait]
pub trait PantryStore: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ingredient>, StoreError>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Ingredient, StoreError>;

    async fn create(&self, user_id: Uuid, new: NewIngredient) -> Result<Ingredient, StoreError>;

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: IngredientPatch,
    ) -> Result<Ingredient, StoreError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError>;

    /// Insert each name that the user does not already have, leaving
    /// existing rows untouched. Returns how many rows were created.
    async fn insert_missing(
        &self,
        user_id: Uuid,
        names: &[String],
        quantity: f64,
        expiration_date: Date,
    ) -> Result<u64, StoreError>;
}
