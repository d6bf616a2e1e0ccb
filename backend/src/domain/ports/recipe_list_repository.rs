//! Port for the per-user favorite and shopping cart lists.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{RecipeId, RecipeListEntry, RecipeListKind, ShoppingListItem, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe list adapters.
    pub enum RecipeListRepositoryError for "recipe list repository" {
        /// The `(user, recipe)` pair is already on the list.
        Duplicate => "recipe is already on the list",
    }
}

/// Favorite and cart storage; each list holds unique `(user, recipe)` pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeListRepository: Send + Sync {
    /// Put `recipe` on `user`'s list.
    async fn add(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeListEntry, RecipeListRepositoryError>;

    /// Take `recipe` off `user`'s list; returns whether a row was deleted.
    async fn remove(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError>;

    /// Subset of `recipes` present on `user`'s list.
    async fn recipes_among(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipeListRepositoryError>;

    /// Ingredient totals over every recipe in `user`'s cart, ordered by name.
    async fn shopping_list(
        &self,
        user: UserId,
    ) -> Result<Vec<ShoppingListItem>, RecipeListRepositoryError>;
}
