//! Driving port for recipe comments.

use async_trait::async_trait;

use crate::domain::{Comment, CommentText, Error, RecipeId, UserId};

/// Read and add comments on recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Comments on an existing recipe, oldest first.
    async fn list_comments(&self, recipe: RecipeId) -> Result<Vec<Comment>, Error>;

    /// Add a comment by `author` to an existing recipe.
    async fn add_comment(
        &self,
        author: UserId,
        recipe: RecipeId,
        text: CommentText,
    ) -> Result<Comment, Error>;
}
