//! PostgreSQL-backed read adapter for tags and ingredients.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReferenceRepository, ReferenceRepositoryError};
use crate::domain::{Ingredient, IngredientId, IngredientNameFilter, Tag, TagId};

use super::error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::{IngredientRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Diesel-backed implementation of the reference data port.
#[derive(Clone)]
pub struct DieselReferenceRepository {
    pool: DbPool,
}

impl DieselReferenceRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ReferenceRepositoryError {
    map_pool_error(error, ReferenceRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> ReferenceRepositoryError {
    map_basic_diesel_error(
        error,
        ReferenceRepositoryError::query,
        ReferenceRepositoryError::connection,
    )
}

/// `ILIKE` pattern matching names that start with `prefix`.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_tags(rows: Vec<TagRow>) -> Result<Vec<Tag>, ReferenceRepositoryError> {
    rows.into_iter()
        .map(|row| Tag::try_from(row).map_err(ReferenceRepositoryError::query))
        .collect()
}

fn to_ingredients(rows: Vec<IngredientRow>) -> Result<Vec<Ingredient>, ReferenceRepositoryError> {
    rows.into_iter()
        .map(|row| Ingredient::try_from(row).map_err(ReferenceRepositoryError::query))
        .collect()
}

#[async_trait]
impl ReferenceRepository for DieselReferenceRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, ReferenceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_tags(rows)
    }

    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, ReferenceRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::id.eq_any(raw))
            .select(TagRow::as_select())
            .order_by(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_tags(rows)
    }

    async fn list_ingredients(
        &self,
        filter: Option<IngredientNameFilter>,
    ) -> Result<Vec<Ingredient>, ReferenceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name, ingredients::id))
            .into_boxed();
        if let Some(filter) = filter {
            query = query.filter(ingredients::name.ilike(prefix_pattern(filter.prefix())));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel)?;
        to_ingredients(rows)
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, ReferenceRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(raw))
            .select(IngredientRow::as_select())
            .order_by(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_ingredients(rows)
    }
}
