//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipeView, UserId};

/// Authoring operations on recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Publish a recipe authored by `author`.
    ///
    /// Unknown tag or ingredient ids fail with `not_found`.
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft)
    -> Result<RecipeView, Error>;

    /// Replace a recipe; only its author may do so (`forbidden` otherwise).
    async fn update_recipe(
        &self,
        editor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe; only its author may do so.
    async fn delete_recipe(&self, editor: UserId, id: RecipeId) -> Result<(), Error>;
}
