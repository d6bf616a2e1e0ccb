//! Port for author subscriptions.

use async_trait::async_trait;

use crate::domain::{Follow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow repository adapters.
    pub enum FollowRepositoryError for "follow repository" {
        /// The `(user, author)` pair already exists.
        Duplicate => "subscription must be unique",
    }
}

/// Subscription storage keyed by `(user, author)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Subscribe `user` to `author`.
    async fn create(&self, user: UserId, author: UserId) -> Result<Follow, FollowRepositoryError>;

    /// Whether `user` already follows `author`.
    async fn exists(&self, user: UserId, author: UserId) -> Result<bool, FollowRepositoryError>;

    /// Remove a subscription; returns whether a row was deleted.
    async fn delete(&self, user: UserId, author: UserId) -> Result<bool, FollowRepositoryError>;

    /// Subscriptions held by `user`.
    async fn list_for_user(&self, user: UserId) -> Result<Vec<Follow>, FollowRepositoryError>;
}
