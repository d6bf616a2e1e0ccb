//! User account model and field validators.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::{MediaUrl, UserId};

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 150;
/// Username reserved for the current-user endpoint.
pub const RESERVED_USERNAME: &str = "me";

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email is blank.
    EmptyEmail,
    /// Email exceeds [`EMAIL_MAX`] characters.
    EmailTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Email lacks a local part, an `@` or a dotted domain.
    InvalidEmail,
    /// Username is blank.
    EmptyUsername,
    /// Username exceeds [`USERNAME_MAX`] characters.
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Username contains characters outside `[\w.@+-]`.
    UsernameInvalidCharacters,
    /// Username equals [`RESERVED_USERNAME`].
    ReservedUsername,
    /// First name is blank.
    EmptyFirstName,
    /// Last name is blank.
    EmptyLastName,
    /// First name exceeds [`PERSON_NAME_MAX`] characters.
    FirstNameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Last name exceeds [`PERSON_NAME_MAX`] characters.
    LastNameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

impl UserValidationError {
    /// Request field the failure belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::EmptyUsername
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters
            | Self::ReservedUsername => "username",
            Self::EmptyFirstName | Self::FirstNameTooLong { .. } => "first_name",
            Self::EmptyLastName | Self::LastNameTooLong { .. } => "last_name",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyUsername | Self::EmptyFirstName | Self::EmptyLastName => {
                "required"
            }
            Self::EmailTooLong { .. }
            | Self::UsernameTooLong { .. }
            | Self::FirstNameTooLong { .. }
            | Self::LastNameTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::UsernameInvalidCharacters => "invalid_username",
            Self::ReservedUsername => "reserved_username",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits and @/./+/-/_ characters",
            ),
            Self::ReservedUsername => write!(f, "username '{RESERVED_USERNAME}' is reserved"),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::FirstNameTooLong { max } => {
                write!(f, "first name must be at most {max} characters")
            }
            Self::LastNameTooLong { max } => {
                write!(f, "last name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Email address used as the login identifier.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`EMAIL_MAX`] characters.
/// - Shaped like `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(value) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique public handle of a user.
///
/// Usernames double as the slug clients use to reference authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate a username supplied at registration.
    ///
    /// Rejects the reserved value `"me"` in addition to the shape checks of
    /// [`Username::parse`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let username = Self::parse(raw)?;
        if username.0 == RESERVED_USERNAME {
            return Err(UserValidationError::ReservedUsername);
        }
        Ok(username)
    }

    /// Validate the shape of a username used as a lookup key.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(value) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First or last name of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    fn new(
        raw: &str,
        empty: UserValidationError,
        too_long: UserValidationError,
    ) -> Result<Self, UserValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(empty);
        }
        if value.chars().count() > PERSON_NAME_MAX {
            return Err(too_long);
        }
        Ok(Self(value.to_owned()))
    }

    /// Validate a first name.
    pub fn first(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::new(
            raw.as_ref(),
            UserValidationError::EmptyFirstName,
            UserValidationError::FirstNameTooLong {
                max: PERSON_NAME_MAX,
            },
        )
    }

    /// Validate a last name.
    pub fn last(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::new(
            raw.as_ref(),
            UserValidationError::EmptyLastName,
            UserValidationError::LastNameTooLong {
                max: PERSON_NAME_MAX,
            },
        )
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Persisted user profile.
///
/// Never carries the password hash; credentials are fetched separately via
/// the repository so a profile can be rendered without touching secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: Email,
    /// Unique public handle.
    pub username: Username,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Avatar URL, if uploaded.
    pub avatar: Option<MediaUrl>,
    /// Free-form profile text.
    pub bio: Option<String>,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
}

/// Profile fields collected at registration, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileDraft {
    /// Login email.
    pub email: Email,
    /// Requested handle.
    pub username: Username,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Free-form profile text.
    pub bio: Option<String>,
}

impl UserProfileDraft {
    /// Validate raw registration profile fields.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{UserProfileDraft, UserValidationError};
    ///
    /// let err = UserProfileDraft::try_from_parts("a@b.io", "me", "Ada", "L", None)
    ///     .expect_err("reserved");
    /// assert_eq!(err, UserValidationError::ReservedUsername);
    /// ```
    pub fn try_from_parts(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        bio: Option<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            username: Username::new(username)?,
            first_name: PersonName::first(first_name)?,
            last_name: PersonName::last(last_name)?,
            bio: bio.filter(|text| !text.trim().is_empty()),
        })
    }
}
