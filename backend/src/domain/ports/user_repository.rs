//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, MediaUrl, PasswordDigest, User, UserId, UserProfileDraft, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError for "user repository" {
        /// Another account already uses the email address.
        DuplicateEmail => "email is already registered",
        /// Another account already uses the username.
        DuplicateUsername => "username is already taken",
    }
}

/// Row content for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    /// Validated profile fields.
    pub profile: UserProfileDraft,
    /// Stored avatar URL, if any.
    pub avatar: Option<MediaUrl>,
    /// Argon2 digest of the chosen password.
    pub password: PasswordDigest,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
}

/// User profile paired with its stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Public profile.
    pub user: User,
    /// Stored password digest.
    pub password: PasswordDigest,
}

/// Account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Unique violations surface as [`UserRepositoryError::DuplicateEmail`]
    /// or [`UserRepositoryError::DuplicateUsername`].
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError>;

    /// Whether any account uses `email`.
    async fn email_exists(&self, email: &Email) -> Result<bool, UserRepositoryError>;

    /// Whether any account uses `username`.
    async fn username_exists(&self, username: &Username) -> Result<bool, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user together with the password digest, keyed by email.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Fetch a user together with the password digest, keyed by id.
    async fn find_credentials_by_id(
        &self,
        id: UserId,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Replace the stored password digest.
    async fn update_password(
        &self,
        id: UserId,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;
}
