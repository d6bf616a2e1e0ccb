//! Authentication primitives: plaintext passwords, stored hashes and the
//! credential payloads used by the confirmation and password-change flows.
//!
//! Plaintext secrets live in [`Zeroizing`] buffers and none of the types here
//! print their secret in `Debug` output.

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use caseless::default_case_fold_str;
use zeroize::Zeroizing;

use super::{Email, UserValidationError, Username};

/// Maximum length of a plaintext password.
pub const PASSWORD_MAX: usize = 150;

/// Domain error returned when password or credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    /// Password was empty.
    EmptyPassword,
    /// Password exceeded [`PASSWORD_MAX`] characters.
    PasswordTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Password contains the username, ignoring case.
    TooSimilarToUsername,
}

impl PasswordValidationError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyPassword => "required",
            Self::PasswordTooLong { .. } => "too_long",
            Self::TooSimilarToUsername => "password_too_similar",
        }
    }
}

impl fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
            Self::TooSimilarToUsername => write!(f, "password is too similar to the username"),
        }
    }
}

impl std::error::Error for PasswordValidationError {}

/// Plaintext password supplied by a client.
///
/// ## Invariants
/// - Non-empty and at most [`PASSWORD_MAX`] characters.
/// - Caller-provided whitespace is retained.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a plaintext password.
    pub fn new(raw: &str) -> Result<Self, PasswordValidationError> {
        if raw.is_empty() {
            return Err(PasswordValidationError::EmptyPassword);
        }
        if raw.chars().count() > PASSWORD_MAX {
            return Err(PasswordValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Reject the password when it contains `username` under full Unicode
    /// case folding, so `ß` matches `SS`.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{Password, PasswordValidationError, Username};
    ///
    /// let username = Username::new("Chef").unwrap();
    /// let password = Password::new("my-CHEF-secret").unwrap();
    /// assert_eq!(
    ///     password.ensure_unlike(&username),
    ///     Err(PasswordValidationError::TooSimilarToUsername)
    /// );
    /// ```
    pub fn ensure_unlike(&self, username: &Username) -> Result<(), PasswordValidationError> {
        let needle = default_case_fold_str(username.as_ref());
        if needle.is_empty() {
            return Ok(());
        }
        let haystack = Zeroizing::new(default_case_fold_str(&self.0));
        if haystack.contains(needle.as_str()) {
            return Err(PasswordValidationError::TooSimilarToUsername);
        }
        Ok(())
    }

    /// Plaintext value for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Failure raised while hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Argon2 PHC string stored in place of the plaintext password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a password with a fresh random salt.
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a PHC string loaded from storage.
    #[must_use]
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a candidate password against this digest.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the stored
    /// string is not a valid PHC hash.
    pub fn verify(&self, candidate: &str) -> Result<bool, PasswordHashError> {
        let parsed = PhcHash::new(&self.0).map_err(|err| PasswordHashError {
            message: err.to_string(),
        })?;
        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }

    /// PHC string for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Validated `{email, password}` pair used to confirm a user's identity.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfirmationCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl ConfirmationCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// Only emptiness is checked for the password; stored hashes are the
    /// authority on whether it is correct.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let address = Email::new(email).map_err(CredentialsError::Email)?;
        if password.is_empty() {
            return Err(CredentialsError::Password(
                PasswordValidationError::EmptyPassword,
            ));
        }
        Ok(Self {
            email: address,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the lookup.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Candidate password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for ConfirmationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validation failure for a credentials payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// The email failed its format rules.
    Email(UserValidationError),
    /// The password was missing or too long.
    Password(PasswordValidationError),
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::Password(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Request to replace the caller's password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    new_password: Password,
}

impl PasswordChange {
    /// Validate the change request.
    ///
    /// The similarity rule needs the caller's username, so it is applied by
    /// the account service once the user is loaded.
    pub fn try_from_parts(
        current: &str,
        new_password: &str,
    ) -> Result<Self, PasswordChangeError> {
        if current.is_empty() {
            return Err(PasswordChangeError::Current(
                PasswordValidationError::EmptyPassword,
            ));
        }
        let replacement = Password::new(new_password).map_err(PasswordChangeError::New)?;
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            new_password: replacement,
        })
    }

    /// Password the caller claims to hold today.
    #[must_use]
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    /// Replacement password.
    #[must_use]
    pub const fn new_password(&self) -> &Password {
        &self.new_password
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange")
            .field("current", &"<redacted>")
            .field("new_password", &self.new_password)
            .finish()
    }
}

/// Validation failure for a password change payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordChangeError {
    /// Problem with `current_password`.
    Current(PasswordValidationError),
    /// Problem with `new_password`.
    New(PasswordValidationError),
}

impl PasswordChangeError {
    /// Request field the failure belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Current(_) => "current_password",
            Self::New(_) => "new_password",
        }
    }

    /// Underlying password failure.
    #[must_use]
    pub const fn reason(&self) -> &PasswordValidationError {
        match self {
            Self::Current(err) | Self::New(err) => err,
        }
    }
}

impl fmt::Display for PasswordChangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.reason())
    }
}

impl std::error::Error for PasswordChangeError {}
