//! PostgreSQL-backed comment repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, NewComment, RecipeId};

use super::error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::{CommentJoinRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CommentRepositoryError {
    map_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn to_comment(row: CommentJoinRow) -> Result<Comment, CommentRepositoryError> {
    Comment::try_from(row).map_err(CommentRepositoryError::query)
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn add(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewCommentRow {
            recipe_id: comment.recipe.get(),
            author_id: comment.author.get(),
            text: comment.text.as_ref(),
            pub_date: comment.pub_date,
        };
        let id: i64 = diesel::insert_into(comments::table)
            .values(&row)
            .returning(comments::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let stored: CommentJoinRow = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id))
            .select((
                comments::id,
                comments::recipe_id,
                comments::text,
                comments::pub_date,
                users::username,
            ))
            .first(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_comment(stored)
    }

    async fn list_for_recipe(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<CommentJoinRow> = comments::table
            .inner_join(users::table)
            .filter(comments::recipe_id.eq(recipe.get()))
            .select((
                comments::id,
                comments::recipe_id,
                comments::text,
                comments::pub_date,
                users::username,
            ))
            .order_by((comments::pub_date, comments::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows.into_iter().map(to_comment).collect()
    }
}
