//! Viewer identity and the per-viewer recipe flags.
//!
//! `is_favorite` and `is_in_shopping_list` depend on who is asking. They are
//! resolved for a whole page at once: one existence-set lookup per list kind
//! instead of one query per recipe.

use std::collections::HashSet;

use super::ports::{RecipeListRepository, RecipeListRepositoryError};
use super::{RecipeId, RecipeListKind, UserId};

/// Identity a read is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// No session.
    Anonymous,
    /// Signed-in user.
    User(UserId),
}

impl Viewer {
    /// Authenticated user id, if any.
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }
}

impl From<Option<UserId>> for Viewer {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::User)
    }
}

/// Derived booleans rendered alongside a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFlags {
    /// The viewer has favorited the recipe.
    pub is_favorite: bool,
    /// The recipe is in the viewer's cart.
    pub is_in_shopping_list: bool,
}

/// Flags resolved for one page of recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFlagSet {
    favorites: HashSet<RecipeId>,
    cart: HashSet<RecipeId>,
}

impl RecipeFlagSet {
    /// Flags for one recipe of the page.
    #[must_use]
    pub fn flags_for(&self, recipe: RecipeId) -> RecipeFlags {
        RecipeFlags {
            is_favorite: self.favorites.contains(&recipe),
            is_in_shopping_list: self.cart.contains(&recipe),
        }
    }
}

/// Resolve the flags of `recipes` for `viewer`.
///
/// Anonymous viewers and empty pages skip the repository entirely.
pub async fn resolve_flags<R>(
    lists: &R,
    viewer: Viewer,
    recipes: &[RecipeId],
) -> Result<RecipeFlagSet, RecipeListRepositoryError>
where
    R: RecipeListRepository + ?Sized,
{
    let Some(user) = viewer.user_id() else {
        return Ok(RecipeFlagSet::default());
    };
    if recipes.is_empty() {
        return Ok(RecipeFlagSet::default());
    }
    let favorites = lists
        .recipes_among(RecipeListKind::Favorites, user, recipes)
        .await?;
    let cart = lists
        .recipes_among(RecipeListKind::ShoppingCart, user, recipes)
        .await?;
    Ok(RecipeFlagSet { favorites, cart })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockRecipeListRepository;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn recipe(raw: i64) -> RecipeId {
        RecipeId::new(raw).expect("valid recipe id")
    }

    fn user(raw: i64) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_viewers_never_hit_the_repository() {
        let lists = MockRecipeListRepository::new();
        let flags = resolve_flags(&lists, Viewer::Anonymous, &[recipe(1)])
            .await
            .expect("flags resolve");
        assert_eq!(flags.flags_for(recipe(1)), RecipeFlags::default());
    }

    #[rstest]
    #[tokio::test]
    async fn one_lookup_per_list_for_the_whole_page() {
        let page = vec![recipe(1), recipe(2), recipe(3)];
        let mut lists = MockRecipeListRepository::new();
        lists
            .expect_recipes_among()
            .with(
                eq(RecipeListKind::Favorites),
                eq(user(9)),
                eq(page.clone()),
            )
            .times(1)
            .return_once(|_, _, _| Ok(HashSet::from([recipe(2)])));
        lists
            .expect_recipes_among()
            .with(
                eq(RecipeListKind::ShoppingCart),
                eq(user(9)),
                eq(page.clone()),
            )
            .times(1)
            .return_once(|_, _, _| Ok(HashSet::from([recipe(2), recipe(3)])));

        let flags = resolve_flags(&lists, Viewer::User(user(9)), &page)
            .await
            .expect("flags resolve");

        assert_eq!(flags.flags_for(recipe(1)), RecipeFlags::default());
        assert_eq!(
            flags.flags_for(recipe(2)),
            RecipeFlags {
                is_favorite: true,
                is_in_shopping_list: true
            }
        );
        assert_eq!(
            flags.flags_for(recipe(3)),
            RecipeFlags {
                is_favorite: false,
                is_in_shopping_list: true
            }
        );
    }
}
