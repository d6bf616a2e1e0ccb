//! PostgreSQL-backed author subscriptions.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{FollowRepository, FollowRepositoryError};
use crate::domain::{Follow, UserId, Username};

use super::error_mapping::{DieselFailure, classify, failure_message, map_pool_error};
use super::models::{NewFollowRow, relation_id};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, users};

const UNIQUE_CONSTRAINT: &str = "follows_user_author_key";

/// Diesel-backed implementation of the follow repository port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> FollowRepositoryError {
    map_pool_error(error, FollowRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> FollowRepositoryError {
    let failure = classify(&error);
    if failure.is_unique(UNIQUE_CONSTRAINT) {
        return FollowRepositoryError::duplicate();
    }
    match failure {
        DieselFailure::Connection => FollowRepositoryError::connection(failure_message(&failure)),
        _ => FollowRepositoryError::query(failure_message(&failure)),
    }
}

async fn usernames(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
) -> Result<HashMap<i64, Username>, FollowRepositoryError> {
    let rows: Vec<(i64, String)> = users::table
        .filter(users::id.eq_any(ids))
        .select((users::id, users::username))
        .load(conn)
        .await
        .map_err(map_diesel)?;
    rows.into_iter()
        .map(|(id, raw)| {
            Username::parse(&raw)
                .map(|username| (id, username))
                .map_err(|err| FollowRepositoryError::query(err.to_string()))
        })
        .collect()
}

fn lookup(names: &HashMap<i64, Username>, id: i64) -> Result<Username, FollowRepositoryError> {
    names
        .get(&id)
        .cloned()
        .ok_or_else(|| FollowRepositoryError::query(format!("user {id} has no row")))
}

fn to_follow(
    names: &HashMap<i64, Username>,
    id: i64,
    user_id: i64,
    author_id: i64,
) -> Result<Follow, FollowRepositoryError> {
    Ok(Follow {
        id: relation_id(id).map_err(FollowRepositoryError::query)?,
        user: lookup(names, user_id)?,
        author: lookup(names, author_id)?,
    })
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn create(&self, user: UserId, author: UserId) -> Result<Follow, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewFollowRow {
            user_id: user.get(),
            author_id: author.get(),
        };
        let id: i64 = diesel::insert_into(follows::table)
            .values(&row)
            .returning(follows::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let names = usernames(&mut conn, &[row.user_id, row.author_id]).await?;
        to_follow(&names, id, row.user_id, row.author_id)
    }

    async fn exists(&self, user: UserId, author: UserId) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::user_id.eq(user.get()))
                .filter(follows::author_id.eq(author.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }

    async fn delete(&self, user: UserId, author: UserId) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(user.get()))
                .filter(follows::author_id.eq(author.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(deleted > 0)
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Follow>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<(i64, i64)> = follows::table
            .filter(follows::user_id.eq(user.get()))
            .select((follows::id, follows::author_id))
            .order_by(follows::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut ids: Vec<i64> = rows.iter().map(|(_, author)| *author).collect();
        ids.push(user.get());
        let names = usernames(&mut conn, &ids).await?;
        rows.into_iter()
            .map(|(id, author_id)| to_follow(&names, id, user.get(), author_id))
            .collect()
    }
}
