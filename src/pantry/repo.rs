use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use super::{
    repo_types::Ingredient,
    store::{IngredientPatch, NewIngredient, PantryStore, StoreError},
};

/// Postgres-backed [`PantryStore`].
#[derive(Clone)]
pub struct PgPantryStore {
    db: PgPool,
}

impl PgPantryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_error(e: sqlx::Error, name: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(name.to_owned())
        }
        _ => StoreError::Persistence(e),
    }
}

#[async_trait]
impl PantryStore for PgPantryStore {
    async fn list(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ingredient>, StoreError> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, quantity, expiration_date, created_at
            FROM ingredients
            WHERE user_id = $1
            ORDER BY created_at DESC, name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Ingredient, StoreError> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, quantity, expiration_date, created_at
            FROM ingredients
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn create(&self, user_id: Uuid, new: NewIngredient) -> Result<Ingredient, StoreError> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name, quantity, expiration_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, quantity, expiration_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(&new.name)
        .bind(new.quantity)
        .bind(new.expiration_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, &new.name))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: IngredientPatch,
    ) -> Result<Ingredient, StoreError> {
        let name = patch.name.clone().unwrap_or_default();
        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
               SET name = COALESCE($3, name),
                   quantity = COALESCE($4, quantity),
                   expiration_date = COALESCE($5, expiration_date)
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, quantity, expiration_date, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.quantity)
        .bind(patch.expiration_date)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, &name))?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM ingredients WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_missing(
        &self,
        user_id: Uuid,
        names: &[String],
        quantity: f64,
        expiration_date: Date,
    ) -> Result<u64, StoreError> {
        if names.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;
        let mut inserted = 0;
        for name in names {
            let res = sqlx::query(
                r#"
                INSERT INTO ingredients (user_id, name, quantity, expiration_date)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, name) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(name)
            .bind(quantity)
            .bind(expiration_date)
            .execute(&mut *tx)
            .await?;
            inserted += res.rows_affected();
        }
        tx.commit().await?;

        debug!(%user_id, detected = names.len(), inserted, "pantry insert_missing");
        Ok(inserted)
    }
}
