use crate::ai::{AiClient, RecipeSuggester, VisionClassifier};
use crate::config::AppConfig;
use crate::db;
use crate::pantry::{repo::PgPantryStore, store::PantryStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub pantry: Arc<dyn PantryStore>,
    pub vision: Arc<dyn VisionClassifier>,
    pub recipes: Arc<dyn RecipeSuggester>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;

        // One HTTP client for both AI backends
        let ai = Arc::new(AiClient::from_config(&config.ai)?);
        let pantry = Arc::new(PgPantryStore::new(db.clone())) as Arc<dyn PantryStore>;

        Ok(Self::from_parts(db, config, pantry, ai.clone(), ai))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        pantry: Arc<dyn PantryStore>,
        vision: Arc<dyn VisionClassifier>,
        recipes: Arc<dyn RecipeSuggester>,
    ) -> Self {
        Self {
            db,
            config,
            pantry,
            vision,
            recipes,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State with in-memory fakes and a pool that never connects.
    pub fn fake() -> Self {
        use crate::testing::{FakeRecipes, FakeVision, MemoryPantry};

        Self::from_parts(
            db::lazy_pool(),
            Arc::new(crate::testing::test_config()),
            Arc::new(MemoryPantry::default()),
            Arc::new(FakeVision::replying("")),
            Arc::new(FakeRecipes::replying("[]")),
        )
    }
}
