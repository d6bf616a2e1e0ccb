//! Recipe comments.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{CommentId, RecipeId, UserId, Username};

/// Validation errors for comment writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    /// Comment text was blank.
    EmptyText,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "comment text must not be empty"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Non-blank comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate comment text.
    pub fn new(raw: impl Into<String>) -> Result<Self, CommentValidationError> {
        let text = raw.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Comment row content handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Recipe being discussed.
    pub recipe: RecipeId,
    /// Signed-in commenter.
    pub author: UserId,
    /// Validated body.
    pub text: CommentText,
    /// Server-assigned publication time.
    pub pub_date: DateTime<Utc>,
}

/// Stored comment; the author is rendered by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment identifier.
    pub id: CommentId,
    /// Recipe the comment belongs to.
    pub recipe: RecipeId,
    /// Commenter's username.
    pub author: Username,
    /// Body as submitted.
    pub text: String,
    /// Publication time.
    pub pub_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case(" \t\n")]
    fn blank_text_is_rejected(#[case] raw: &str) {
        assert_eq!(CommentText::new(raw), Err(CommentValidationError::EmptyText));
    }

    #[rstest]
    fn text_keeps_formatting() {
        let text = CommentText::new("  Lovely!\n").expect("valid text");
        assert_eq!(text.as_ref(), "  Lovely!\n");
    }
}
