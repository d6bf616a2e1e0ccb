//! Driving port for user profile reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Public profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All users ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One user, or `not_found`.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;
}
