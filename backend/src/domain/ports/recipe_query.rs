//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{Error, RecipeFilter, RecipeId, RecipeView, Viewer};

/// Recipe reads with per-viewer flags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Recipes matching `filter`, with flags resolved for `viewer`.
    ///
    /// List filters that depend on the viewer yield an empty page for
    /// anonymous viewers.
    async fn list_recipes(
        &self,
        viewer: Viewer,
        filter: RecipeFilter,
    ) -> Result<Vec<RecipeView>, Error>;

    /// One recipe, or `not_found`.
    async fn get_recipe(&self, viewer: Viewer, id: RecipeId) -> Result<RecipeView, Error>;
}
