//! Recipe aggregate, its write draft and field validators.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    ImageInput, ImageValidationError, Ingredient, IngredientId, MediaUrl, RecipeFlags, RecipeId,
    Tag, TagId, User, UserId,
};

/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 200;

/// Validation errors for recipe writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    /// The name was blank.
    EmptyName,
    /// The name exceeded `max` characters.
    NameTooLong {
        /// Permitted length.
        max: usize,
    },
    /// The description was blank.
    EmptyText,
    /// Cooking time was under one minute or overflowed `i32`.
    CookingTimeOutOfRange {
        /// Rejected value.
        value: i64,
    },
    /// An ingredient amount was under one or overflowed `i32`.
    AmountOutOfRange {
        /// Ingredient the amount belongs to.
        ingredient: IngredientId,
        /// Rejected value.
        value: i64,
    },
    /// The ingredient list was empty.
    NoIngredients,
    /// An ingredient appeared twice.
    DuplicateIngredient {
        /// Repeated ingredient.
        ingredient: IngredientId,
    },
    /// The image payload could not be decoded.
    Image(ImageValidationError),
}

impl RecipeValidationError {
    /// Request field the failure belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::AmountOutOfRange { .. }
            | Self::NoIngredients
            | Self::DuplicateIngredient { .. } => "ingredients",
            Self::Image(_) => "image",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyText | Self::NoIngredients => "required",
            Self::NameTooLong { .. } => "too_long",
            Self::CookingTimeOutOfRange { .. } | Self::AmountOutOfRange { .. } => "min_value",
            Self::DuplicateIngredient { .. } => "duplicate_ingredient",
            Self::Image(err) => err.code(),
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "recipe name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "recipe name must be at most {max} characters")
            }
            Self::EmptyText => write!(f, "recipe text must not be empty"),
            Self::CookingTimeOutOfRange { value } => {
                write!(f, "cooking time must be at least 1 minute, got {value}")
            }
            Self::AmountOutOfRange { ingredient, value } => write!(
                f,
                "amount for ingredient {ingredient} must be at least 1, got {value}",
            ),
            Self::NoIngredients => write!(f, "a recipe needs at least one ingredient"),
            Self::DuplicateIngredient { ingredient } => {
                write!(f, "ingredient {ingredient} is listed more than once")
            }
            Self::Image(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

impl From<ImageValidationError> for RecipeValidationError {
    fn from(value: ImageValidationError) -> Self {
        Self::Image(value)
    }
}

/// Positive whole quantity stored in an `INTEGER` column.
fn positive_i32(value: i64) -> Option<i32> {
    i32::try_from(value).ok().filter(|v| *v >= 1)
}

/// Cooking time in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookingTime(i32);

impl CookingTime {
    /// Validate a cooking time; must be at least one minute.
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        positive_i32(minutes)
            .map(Self)
            .ok_or(RecipeValidationError::CookingTimeOutOfRange { value: minutes })
    }

    /// Minutes as stored.
    #[must_use]
    pub const fn minutes(self) -> i32 {
        self.0
    }
}

/// Quantity of one ingredient in a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(i32);

impl Amount {
    /// Validate an amount for `ingredient`; must be at least one.
    pub fn new(ingredient: IngredientId, value: i64) -> Result<Self, RecipeValidationError> {
        positive_i32(value)
            .map(Self)
            .ok_or(RecipeValidationError::AmountOutOfRange { ingredient, value })
    }

    /// Raw quantity.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// `{ingredient, amount}` entry of a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientLine {
    /// Referenced ingredient.
    pub ingredient: IngredientId,
    /// Quantity in the ingredient's unit.
    pub amount: Amount,
}

/// Validated recipe write payload.
///
/// ## Invariants
/// - `name` is trimmed, non-empty, at most [`RECIPE_NAME_MAX`] characters.
/// - `text` is non-empty once trimmed.
/// - `tags` is sorted and free of duplicates.
/// - `ingredients` is non-empty and names each ingredient once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    cooking_time: CookingTime,
    image: Option<ImageInput>,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientLine>,
}

/// Raw recipe fields before validation.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraftParts {
    /// Untrimmed name.
    pub name: String,
    /// Description.
    pub text: String,
    /// Minutes, range-checked by [`CookingTime::new`].
    pub cooking_time: i64,
    /// Data URI or stored URL; blank means none.
    pub image: Option<String>,
    /// Tag ids in request order.
    pub tags: Vec<TagId>,
    /// `(ingredient, amount)` pairs in request order.
    pub ingredients: Vec<(IngredientId, i64)>,
}

impl RecipeDraft {
    /// Validate raw fields into a draft.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{IngredientId, RecipeDraft, RecipeDraftParts, TagId};
    ///
    /// let tag = TagId::new(1).unwrap();
    /// let draft = RecipeDraft::try_from_parts(RecipeDraftParts {
    ///     name: "Tea".into(),
    ///     text: "Boil water".into(),
    ///     cooking_time: 3,
    ///     image: None,
    ///     tags: vec![tag, tag],
    ///     ingredients: vec![(IngredientId::new(7).unwrap(), 2)],
    /// })
    /// .unwrap();
    /// assert_eq!(draft.tags(), &[tag]);
    /// ```
    pub fn try_from_parts(parts: RecipeDraftParts) -> Result<Self, RecipeValidationError> {
        let RecipeDraftParts {
            name,
            text,
            cooking_time,
            image,
            tags,
            ingredients,
        } = parts;

        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if trimmed_name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        if text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        let minutes = CookingTime::new(cooking_time)?;
        let parsed_image = image
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(ImageInput::parse)
            .transpose()?;

        if ingredients.is_empty() {
            return Err(RecipeValidationError::NoIngredients);
        }
        let mut seen = HashSet::with_capacity(ingredients.len());
        let mut lines = Vec::with_capacity(ingredients.len());
        for (ingredient, raw_amount) in ingredients {
            if !seen.insert(ingredient) {
                return Err(RecipeValidationError::DuplicateIngredient { ingredient });
            }
            lines.push(IngredientLine {
                ingredient,
                amount: Amount::new(ingredient, raw_amount)?,
            });
        }

        let unique_tags: BTreeSet<TagId> = tags.into_iter().collect();

        Ok(Self {
            name: trimmed_name.to_owned(),
            text,
            cooking_time: minutes,
            image: parsed_image,
            tags: unique_tags.into_iter().collect(),
            ingredients: lines,
        })
    }

    /// Trimmed recipe name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Description.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Cooking time in minutes.
    #[must_use]
    pub const fn cooking_time(&self) -> CookingTime {
        self.cooking_time
    }

    /// Image as submitted, if any.
    #[must_use]
    pub const fn image(&self) -> Option<&ImageInput> {
        self.image.as_ref()
    }

    /// Sorted, deduplicated tag ids.
    #[must_use]
    pub fn tags(&self) -> &[TagId] {
        self.tags.as_slice()
    }

    /// Ingredient lines in request order.
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientLine] {
        self.ingredients.as_slice()
    }

    /// Ids of every referenced ingredient, in request order.
    #[must_use]
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients.iter().map(|line| line.ingredient).collect()
    }
}

/// Recipe row content handed to the repository once images are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWrite {
    /// Author of the recipe.
    pub author: UserId,
    /// Trimmed name.
    pub name: String,
    /// Description.
    pub text: String,
    /// Cooking time in minutes.
    pub cooking_time: CookingTime,
    /// Stored image URL.
    pub image: Option<MediaUrl>,
    /// Tag ids.
    pub tags: Vec<TagId>,
    /// Ingredient lines.
    pub ingredients: Vec<IngredientLine>,
    /// Publication time; kept unchanged on update.
    pub published_at: DateTime<Utc>,
}

/// Ingredient line of a stored recipe, joined with the ingredient row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Ingredient row.
    pub ingredient: Ingredient,
    /// Quantity in the ingredient's unit.
    pub amount: Amount,
}

/// Stored recipe with its related entities expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe identifier.
    pub id: RecipeId,
    /// Author profile.
    pub author: User,
    /// Recipe name.
    pub name: String,
    /// Description.
    pub text: String,
    /// Cooking time in minutes.
    pub cooking_time: CookingTime,
    /// Stored image URL.
    pub image: Option<MediaUrl>,
    /// Tags ordered by id.
    pub tags: Vec<Tag>,
    /// Ingredient lines.
    pub ingredients: Vec<RecipeIngredient>,
    /// Publication time, used for ordering.
    pub published_at: DateTime<Utc>,
}

/// Recipe as seen by one viewer, with the derived flags resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    /// Stored recipe.
    pub recipe: Recipe,
    /// Flags for the viewer.
    pub flags: RecipeFlags,
}

/// Filters accepted by the recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only recipes written by this user.
    pub author: Option<UserId>,
    /// Only recipes carrying at least one of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Only recipes the viewer favorited.
    pub is_favorited: bool,
    /// Only recipes in the viewer's cart.
    pub is_in_shopping_list: bool,
}

/// Row filter handed to the repository after viewer-dependent filters are
/// resolved to a concrete user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeSelection {
    /// Only recipes by this author.
    pub author: Option<UserId>,
    /// Only recipes carrying one of these tags.
    pub tag_slugs: Vec<String>,
    /// Only recipes this user favorited.
    pub favorited_by: Option<UserId>,
    /// Only recipes in this user's cart.
    pub in_cart_of: Option<UserId>,
}

#[cfg(test)]
mod tests;
