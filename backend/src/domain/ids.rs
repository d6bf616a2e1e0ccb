//! Numeric primary-key newtypes shared by domain entities.
//!
//! Relational rows use positive `BIGSERIAL` keys. Each entity gets its own
//! wrapper so a tag id can never be passed where a recipe id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a raw key is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer, got {value}")]
pub struct InvalidId {
    /// Rejected raw value.
    pub value: i64,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(try_from = "i64", into = "i64")]
        #[schema(value_type = i64, example = 1)]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw key.
            ///
            /// # Errors
            ///
            /// Returns [`InvalidId`] unless `value` is positive.
            pub const fn new(value: i64) -> Result<Self, InvalidId> {
                if value <= 0 {
                    return Err(InvalidId { value });
                }
                Ok(Self(value))
            }

            /// Raw key as stored in the database.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidId;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id! {
    /// User primary key.
    UserId
}

define_id! {
    /// Recipe primary key.
    RecipeId
}

define_id! {
    /// Tag primary key.
    TagId
}

define_id! {
    /// Ingredient primary key.
    IngredientId
}

define_id! {
    /// Comment primary key.
    CommentId
}

define_id! {
    /// Primary key of a follow, favorite or cart row.
    RelationId
}
