//! Read-only reference data: tags and ingredients.

use super::{IngredientId, TagId};

/// Recipe classification label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Display name.
    pub name: String,
    /// URL-safe key used by the `tags` filter.
    pub slug: String,
}

/// Ingredient with its unit of measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient identifier.
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Unit amounts are given in, e.g. `g`.
    pub measurement_unit: String,
}

/// Case-insensitive name prefix used to narrow ingredient listings.
///
/// # Examples
/// ```
/// use recipe_backend::domain::IngredientNameFilter;
///
/// assert!(IngredientNameFilter::new("  ").is_none());
/// let filter = IngredientNameFilter::new("Sug").unwrap();
/// assert!(filter.matches("sugar"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientNameFilter(String);

impl IngredientNameFilter {
    /// Build a filter; blank input means "no filter".
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    /// Lower-cased prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `name` starts with the prefix, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().starts_with(self.0.as_str())
    }
}
