//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain value objects report failures as plain enums. The helpers here turn
//! them into `invalid_request` errors scoped to the request field that carried
//! the bad value, so every endpoint reports validation the same way:
//! `{"code": "invalid_request", "message": ..., "details": {"field": ..., "code": ...}}`.

use serde_json::json;

use crate::domain::{
    CommentValidationError, CredentialsError, Error, ImageValidationError, InvalidId,
    PasswordChangeError, PasswordValidationError, RecipeValidationError, UserValidationError,
};

/// Validation error codes raised by the adapter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: i64) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code,
        }))
    }

    fn with_index(self, code: &str, index: usize, value: i64) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value,
            "code": code,
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(name, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField.as_str())
}

fn invalid_id_error(field: FieldName, err: InvalidId) -> Error {
    let name = field.as_str();
    ValidationError::new(name, format!("{name} must be a positive integer"))
        .with_value(ErrorCode::InvalidId.as_str(), err.value)
}

/// Wrap a raw key in its typed id, scoping failures to `field`.
pub(crate) fn parse_id<T>(raw: i64, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64, Error = InvalidId>,
{
    T::try_from(raw).map_err(|err| invalid_id_error(field, err))
}

/// Wrap every raw key, reporting the position of the first bad one.
pub(crate) fn parse_id_list<T>(values: &[i64], field: FieldName) -> Result<Vec<T>, Error>
where
    T: TryFrom<i64, Error = InvalidId>,
{
    values
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            T::try_from(*raw).map_err(|err| {
                let name = field.as_str();
                ValidationError::new(name, format!("{name} must contain positive integers"))
                    .with_index(ErrorCode::InvalidId.as_str(), index, err.value)
            })
        })
        .collect()
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

/// Report a user field failure under a different request field, e.g. the
/// `author` of a follow.
pub(crate) fn user_validation_error_for(field: FieldName, err: UserValidationError) -> Error {
    ValidationError::new(field.as_str(), err.to_string()).with_code(err.code())
}

pub(crate) fn password_validation_error(field: FieldName, err: PasswordValidationError) -> Error {
    ValidationError::new(field.as_str(), err.to_string()).with_code(err.code())
}

pub(crate) fn credentials_error(err: CredentialsError) -> Error {
    match err {
        CredentialsError::Email(inner) => user_validation_error(inner),
        CredentialsError::Password(inner) => {
            password_validation_error(FieldName::new("password"), inner)
        }
    }
}

pub(crate) fn password_change_error(err: PasswordChangeError) -> Error {
    ValidationError::new(err.field(), err.reason().to_string()).with_code(err.reason().code())
}

pub(crate) fn image_validation_error(field: FieldName, err: ImageValidationError) -> Error {
    ValidationError::new(field.as_str(), err.to_string()).with_code(err.code())
}

pub(crate) fn recipe_validation_error(err: RecipeValidationError) -> Error {
    let builder = ValidationError::new(err.field(), err.to_string());
    match &err {
        RecipeValidationError::AmountOutOfRange { ingredient, .. }
        | RecipeValidationError::DuplicateIngredient { ingredient } => {
            builder.with_extra(err.code(), json!({ "ingredient": ingredient.get() }))
        }
        _ => builder.with_code(err.code()),
    }
}

pub(crate) fn comment_validation_error(err: CommentValidationError) -> Error {
    match err {
        CommentValidationError::EmptyText => {
            ValidationError::new("text", err.to_string()).with_code("required")
        }
    }
}

impl ValidationError {
    fn with_extra(self, code: &str, extra: serde_json::Value) -> Error {
        let mut details = json!({ "field": self.field, "code": code });
        if let (Some(target), Some(source)) = (details.as_object_mut(), extra.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        Error::invalid_request(self.message).with_details(details)
    }
}
