//! Comment domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::port_error_mapping::map_recipe_repository_error;
use super::ports::{CommentCommand, CommentRepository, CommentRepositoryError, RecipeRepository};
use super::{Comment, CommentText, Error, NewComment, RecipeId, UserId};

/// Service implementing [`CommentCommand`].
#[derive(Clone)]
pub struct CommentService<C, R> {
    comments: Arc<C>,
    recipes: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<C, R> CommentService<C, R> {
    /// Build the service; `clock` stamps `pub_date`.
    #[must_use]
    pub const fn new(comments: Arc<C>, recipes: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            recipes,
            clock,
        }
    }
}

impl<C, R> CommentService<C, R>
where
    C: CommentRepository,
    R: RecipeRepository,
{
    async fn ensure_recipe(&self, recipe: RecipeId) -> Result<(), Error> {
        self.recipes
            .author_of(recipe)
            .await
            .map_err(map_recipe_repository_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("recipe {recipe} not found")))
    }
}

#[async_trait]
impl<C, R> CommentCommand for CommentService<C, R>
where
    C: CommentRepository,
    R: RecipeRepository,
{
    async fn list_comments(&self, recipe: RecipeId) -> Result<Vec<Comment>, Error> {
        self.ensure_recipe(recipe).await?;
        self.comments
            .list_for_recipe(recipe)
            .await
            .map_err(CommentRepositoryError::into_domain_error)
    }

    async fn add_comment(
        &self,
        author: UserId,
        recipe: RecipeId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        self.ensure_recipe(recipe).await?;
        let comment = self
            .comments
            .add(&NewComment {
                recipe,
                author,
                text,
                pub_date: self.clock.utc(),
            })
            .await
            .map_err(CommentRepositoryError::into_domain_error)?;
        info!(comment_id = %comment.id, recipe_id = %recipe, "comment added");
        Ok(comment)
    }
}
