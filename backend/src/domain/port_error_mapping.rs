//! Translation of driven-port failures into domain [`Error`]s.
//!
//! Variants that encode a business outcome (duplicates, missing rows) are
//! mapped here; store failures fall through to the `into_domain_error`
//! generated alongside each port error. Ports without business variants call
//! that method directly.

use tracing::debug;

use super::Error;
use super::ports::{
    FollowRepositoryError, ImageStoreError, RecipeListRepositoryError, RecipeRepositoryError,
    UserRepositoryError,
};

/// Field-scoped `conflict` for a value that must be unique.
pub(crate) fn duplicate_field(field: &str, message: impl Into<String>) -> Error {
    Error::conflict(message).for_field(field, "duplicate")
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateEmail => {
            duplicate_field("email", "a user with this email already exists")
        }
        UserRepositoryError::DuplicateUsername => {
            duplicate_field("username", "a user with this username already exists")
        }
        other => other.into_domain_error(),
    }
}

pub(crate) fn map_recipe_repository_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::MissingReference { message } => {
            debug!(%message, "recipe write lost a reference race");
            Error::not_found("a referenced tag or ingredient no longer exists")
        }
        RecipeRepositoryError::NotFound { id } => Error::not_found(format!("recipe {id} not found")),
        other => other.into_domain_error(),
    }
}

pub(crate) fn map_follow_repository_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::Duplicate => {
            duplicate_field("author", "subscription must be unique")
        }
        other => other.into_domain_error(),
    }
}

pub(crate) fn map_recipe_list_repository_error(error: RecipeListRepositoryError) -> Error {
    match error {
        RecipeListRepositoryError::Duplicate => {
            Error::conflict("recipe is already on the list").for_field("recipe", "duplicate")
        }
        other => other.into_domain_error(),
    }
}

pub(crate) fn map_image_store_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Io { message } => {
            Error::internal(format!("image store error: {message}"))
        }
    }
}
