//! Driving port for follows, favorites, the cart and the shopping list.

use async_trait::async_trait;

use crate::domain::{
    Error, Follow, RecipeId, RecipeListEntry, RecipeListKind, ShoppingListItem, UserId, Username,
};

/// Follows, favorites, cart and shopping list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialCommand: Send + Sync {
    /// Subscribe `user` to the author named `author`.
    ///
    /// Self-follows fail with `invalid_request`, repeats with `conflict`.
    async fn follow(&self, user: UserId, author: &Username) -> Result<Follow, Error>;

    /// Drop a subscription; `not_found` when there was none.
    async fn unfollow(&self, user: UserId, author: &Username) -> Result<(), Error>;

    /// Subscriptions held by `user`.
    async fn list_follows(&self, user: UserId) -> Result<Vec<Follow>, Error>;

    /// Put a recipe on one of `user`'s lists.
    ///
    /// Favoriting one's own recipe fails with `invalid_request`; the cart has
    /// no such rule. Repeats fail with `conflict`.
    async fn add_to_list(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeListEntry, Error>;

    /// Take a recipe off one of `user`'s lists; `not_found` when absent.
    async fn remove_from_list(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error>;

    /// Ingredient totals for everything in `user`'s cart.
    async fn shopping_list(&self, user: UserId) -> Result<Vec<ShoppingListItem>, Error>;
}
