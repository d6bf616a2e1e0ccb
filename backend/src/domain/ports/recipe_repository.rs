//! Port for recipe persistence.
//!
//! Writes carry the full tag and ingredient sets; adapters apply the recipe
//! row and its link rows atomically.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeId, RecipeSelection, RecipeWrite, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError for "recipe repository" {
        /// A referenced tag or ingredient vanished before the write landed.
        MissingReference { message: String } => "recipe references a missing row: {message}",
        /// The recipe row does not exist.
        NotFound { id: i64 } => "recipe {id} not found",
    }
}

/// Recipe aggregate storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its tags and ingredient lines.
    async fn create(&self, recipe: &RecipeWrite) -> Result<RecipeId, RecipeRepositoryError>;

    /// Replace a recipe's fields, tags and ingredient lines.
    async fn update(&self, id: RecipeId, recipe: &RecipeWrite)
    -> Result<(), RecipeRepositoryError>;

    /// Delete a recipe and everything hanging off it.
    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError>;

    /// Fetch one recipe with related rows expanded.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Author of a recipe, without loading the aggregate.
    async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError>;

    /// Recipes matching `selection`, newest first.
    async fn list(&self, selection: &RecipeSelection) -> Result<Vec<Recipe>, RecipeRepositoryError>;
}
