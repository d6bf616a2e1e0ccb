//! Port for the read-only tag and ingredient tables.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, IngredientNameFilter, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reference data adapters.
    pub enum ReferenceRepositoryError for "reference repository" {}
}

/// Read-only access to the tag and ingredient tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Every tag ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, ReferenceRepositoryError>;

    /// Tags whose ids appear in `ids`; missing ids are simply absent.
    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, ReferenceRepositoryError>;

    /// Ingredients ordered by name, optionally narrowed by a name prefix.
    async fn list_ingredients(
        &self,
        filter: Option<IngredientNameFilter>,
    ) -> Result<Vec<Ingredient>, ReferenceRepositoryError>;

    /// Ingredients whose ids appear in `ids`; missing ids are simply absent.
    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, ReferenceRepositoryError>;
}
