//! Port for recipe comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, NewComment, RecipeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError for "comment repository" {}
}

/// Comment storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a comment and return it with its id and author username.
    async fn add(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Comments on a recipe, oldest first.
    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;
}
