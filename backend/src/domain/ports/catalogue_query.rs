//! Driving port for tag and ingredient reads.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, IngredientNameFilter, Tag, TagId};

/// Read access to tags and ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every tag ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// One tag, or `not_found`.
    async fn get_tag(&self, id: TagId) -> Result<Tag, Error>;

    /// Ingredients, optionally narrowed to a case-insensitive name prefix.
    async fn list_ingredients(
        &self,
        filter: Option<IngredientNameFilter>,
    ) -> Result<Vec<Ingredient>, Error>;

    /// One ingredient, or `not_found`.
    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
