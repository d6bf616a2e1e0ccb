//! Driving port for account registration and credential checks.
//!
//! Inbound adapters call this port to create accounts, confirm passwords and
//! rotate them without touching persistence or hashing directly.

use async_trait::async_trait;

use crate::domain::{
    ConfirmationCredentials, Error, ImageInput, Password, PasswordChange, User, UserId,
    UserProfileDraft,
};

/// Registration payload after field-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Validated profile fields.
    pub profile: UserProfileDraft,
    /// Plain password, hashed by the service.
    pub password: Password,
    /// Optional avatar as a data URI or existing URL.
    pub avatar: Option<ImageInput>,
}

/// Account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account.
    ///
    /// Fails with `invalid_request` when the password resembles the username
    /// and with `conflict` when the email or username is taken.
    async fn register(&self, request: RegistrationRequest) -> Result<User, Error>;

    /// Check an `{email, password}` pair and return the matching user.
    ///
    /// Unknown emails fail with `not_found`; wrong passwords with
    /// `invalid_request` ("incorrect password").
    async fn confirm(&self, credentials: &ConfirmationCredentials) -> Result<User, Error>;

    /// Replace the caller's password after checking the current one.
    async fn change_password(&self, user: UserId, change: &PasswordChange) -> Result<(), Error>;
}
