//! Account domain service: registration, password confirmation and
//! password changes.
//!
//! Hashing runs on the blocking pool so Argon2 never stalls a worker.
//! Neither plaintext nor digests are ever passed to `tracing`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::port_error_mapping::{
    duplicate_field, map_image_store_error, map_user_repository_error,
};
use super::ports::{
    AccountCommand, ImageStore, MediaCategory, NewUserRecord, RegistrationRequest,
    StoredCredentials, UserRepository, UsersQuery,
};
use super::{
    ConfirmationCredentials, Error, ImageInput, MediaUrl, Password, PasswordChange,
    PasswordDigest, PasswordValidationError, TraceId, User, UserId,
};

/// Service implementing [`AccountCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct AccountService<U, S> {
    users: Arc<U>,
    images: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<U, S> AccountService<U, S> {
    /// Create a new service with the given adapters.
    #[must_use]
    pub const fn new(users: Arc<U>, images: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            images,
            clock,
        }
    }
}

fn password_error(field: &str, error: &PasswordValidationError) -> Error {
    Error::invalid_request(error.to_string()).for_field(field, error.code())
}

fn incorrect_password(field: &str) -> Error {
    Error::invalid_request("incorrect password").for_field(field, "incorrect_password")
}

async fn hash_password(password: Password) -> Result<PasswordDigest, Error> {
    TraceId::spawn_blocking(move || PasswordDigest::hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

async fn verify_password(digest: PasswordDigest, candidate: String) -> Result<bool, Error> {
    let secret = zeroize::Zeroizing::new(candidate);
    TraceId::spawn_blocking(move || digest.verify(secret.as_str()))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

impl<U, S> AccountService<U, S>
where
    U: UserRepository,
    S: ImageStore,
{
    async fn ensure_unique(&self, request: &RegistrationRequest) -> Result<(), Error> {
        let profile = &request.profile;
        if self
            .users
            .email_exists(&profile.email)
            .await
            .map_err(map_user_repository_error)?
        {
            return Err(duplicate_field(
                "email",
                "a user with this email already exists",
            ));
        }
        if self
            .users
            .username_exists(&profile.username)
            .await
            .map_err(map_user_repository_error)?
        {
            return Err(duplicate_field(
                "username",
                "a user with this username already exists",
            ));
        }
        Ok(())
    }

    async fn resolve_avatar(&self, avatar: Option<ImageInput>) -> Result<Option<MediaUrl>, Error> {
        match avatar {
            None => Ok(None),
            Some(ImageInput::Existing(url)) => Ok(Some(url)),
            Some(ImageInput::Inline(upload)) => self
                .images
                .store(MediaCategory::Avatars, &upload)
                .await
                .map(Some)
                .map_err(map_image_store_error),
        }
    }

    async fn credentials_for(&self, user: UserId) -> Result<StoredCredentials, Error> {
        self.users
            .find_credentials_by_id(user)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user} not found")))
    }
}

#[async_trait]
impl<U, S> AccountCommand for AccountService<U, S>
where
    U: UserRepository,
    S: ImageStore,
{
    async fn register(&self, request: RegistrationRequest) -> Result<User, Error> {
        if let Err(err) = request.password.ensure_unlike(&request.profile.username) {
            debug!("registration rejected: password resembles username");
            return Err(password_error("password", &err));
        }
        self.ensure_unique(&request).await?;

        let RegistrationRequest {
            profile,
            password,
            avatar,
        } = request;
        let record = NewUserRecord {
            profile,
            avatar: self.resolve_avatar(avatar).await?,
            password: hash_password(password).await?,
            date_joined: self.clock.utc(),
        };
        let user = self
            .users
            .create(&record)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    async fn confirm(&self, credentials: &ConfirmationCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                Error::not_found("no user with this email").for_field("email", "not_found")
            })?;

        if !verify_password(stored.password, credentials.password().to_owned()).await? {
            debug!(user_id = %stored.user.id, "password confirmation failed");
            return Err(incorrect_password("password"));
        }
        Ok(stored.user)
    }

    async fn change_password(&self, user: UserId, change: &PasswordChange) -> Result<(), Error> {
        let stored = self.credentials_for(user).await?;
        if !verify_password(stored.password, change.current().to_owned()).await? {
            debug!(user_id = %user, "password change rejected: current password mismatch");
            return Err(incorrect_password("current_password"));
        }
        change
            .new_password()
            .ensure_unlike(&stored.user.username)
            .map_err(|err| password_error("new_password", &err))?;

        let digest = hash_password(change.new_password().clone()).await?;
        self.users
            .update_password(user, &digest)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user, "password changed");
        Ok(())
    }
}

#[async_trait]
impl<U, S> UsersQuery for AccountService<U, S>
where
    U: UserRepository,
    S: ImageStore,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_repository_error)
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
