//! Follow relations, favorite and cart lists, and the aggregated shopping
//! list.

use super::{RecipeId, RelationId, Username};

/// Subscription of `user` to recipes written by `author`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    /// Relation identifier.
    pub id: RelationId,
    /// Subscriber.
    pub user: Username,
    /// Followed author.
    pub author: Username,
}

/// Per-user recipe collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeListKind {
    /// Recipes the user marked as favorite.
    Favorites,
    /// Recipes the user plans to shop for.
    ShoppingCart,
}

impl RecipeListKind {
    /// Name of the request field carrying the recipe id for this list.
    #[must_use]
    pub const fn recipe_field(self) -> &'static str {
        match self {
            Self::Favorites => "recipe",
            Self::ShoppingCart => "purchase",
        }
    }

    /// Human-readable list name used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

/// One favorite or cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeListEntry {
    /// Relation identifier.
    pub id: RelationId,
    /// List the entry belongs to.
    pub kind: RecipeListKind,
    /// List owner.
    pub user: Username,
    /// Listed recipe.
    pub recipe: RecipeId,
}

/// Total quantity of one ingredient across every recipe in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name.
    pub name: String,
    /// Unit of `total_amount`.
    pub measurement_unit: String,
    /// Sum of the amounts across the cart.
    pub total_amount: i64,
}
