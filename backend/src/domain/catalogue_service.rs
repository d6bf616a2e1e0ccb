//! Read-only service over tags and ingredients.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{CatalogueQuery, ReferenceRepository, ReferenceRepositoryError};
use super::{Error, Ingredient, IngredientId, IngredientNameFilter, Tag, TagId};

/// Service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<R> {
    reference: Arc<R>,
}

impl<R> CatalogueService<R> {
    /// Wrap the reference-data repository.
    #[must_use]
    pub const fn new(reference: Arc<R>) -> Self {
        Self { reference }
    }
}

#[async_trait]
impl<R> CatalogueQuery for CatalogueService<R>
where
    R: ReferenceRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.reference
            .list_tags()
            .await
            .map_err(ReferenceRepositoryError::into_domain_error)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error> {
        self.reference
            .tags_by_ids(&[id])
            .await
            .map_err(ReferenceRepositoryError::into_domain_error)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn list_ingredients(
        &self,
        filter: Option<IngredientNameFilter>,
    ) -> Result<Vec<Ingredient>, Error> {
        self.reference
            .list_ingredients(filter)
            .await
            .map_err(ReferenceRepositoryError::into_domain_error)
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.reference
            .ingredients_by_ids(&[id])
            .await
            .map_err(ReferenceRepositoryError::into_domain_error)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
