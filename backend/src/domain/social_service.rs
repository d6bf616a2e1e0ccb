//! Follows, favorites, the cart and the shopping list.
//!
//! Referenced authors and recipes are resolved first so a missing target is
//! reported as `not_found` on the request field that named it. Duplicate rows
//! are checked before insert and again through the unique constraint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::port_error_mapping::{
    duplicate_field, map_follow_repository_error, map_recipe_list_repository_error,
    map_recipe_repository_error, map_user_repository_error,
};
use super::ports::{
    FollowRepository, FollowRepositoryError, RecipeListRepository, RecipeListRepositoryError,
    RecipeRepository, SocialCommand, UserRepository,
};
use super::{
    Error, Follow, RecipeId, RecipeListEntry, RecipeListKind, ShoppingListItem, User, UserId,
    Username,
};

const SUBSCRIPTION_MUST_BE_UNIQUE: &str = "subscription must be unique";

/// Service implementing [`SocialCommand`].
#[derive(Clone)]
pub struct SocialService<U, F, R, L> {
    users: Arc<U>,
    follows: Arc<F>,
    recipes: Arc<R>,
    lists: Arc<L>,
}

impl<U, F, R, L> SocialService<U, F, R, L> {
    /// Build the service over its four repositories.
    #[must_use]
    pub const fn new(users: Arc<U>, follows: Arc<F>, recipes: Arc<R>, lists: Arc<L>) -> Self {
        Self {
            users,
            follows,
            recipes,
            lists,
        }
    }
}

fn already_listed(kind: RecipeListKind) -> Error {
    duplicate_field(
        kind.recipe_field(),
        format!("recipe is already in your {}", kind.label()),
    )
}

impl<U, F, R, L> SocialService<U, F, R, L>
where
    U: UserRepository,
    F: FollowRepository,
    R: RecipeRepository,
    L: RecipeListRepository,
{
    async fn find_author(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("user '{username}' not found"))
                    .for_field("author", "not_found")
            })
    }

    async fn recipe_author(&self, kind: RecipeListKind, recipe: RecipeId) -> Result<UserId, Error> {
        self.recipes
            .author_of(recipe)
            .await
            .map_err(map_recipe_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("recipe {recipe} not found"))
                    .for_field(kind.recipe_field(), "not_found")
            })
    }
}

#[async_trait]
impl<U, F, R, L> SocialCommand for SocialService<U, F, R, L>
where
    U: UserRepository,
    F: FollowRepository,
    R: RecipeRepository,
    L: RecipeListRepository,
{
    async fn follow(&self, user: UserId, author: &Username) -> Result<Follow, Error> {
        let target = self.find_author(author).await?;
        if target.id == user {
            debug!(user_id = %user, "follow rejected: self-follow");
            return Err(
                Error::invalid_request("you cannot follow yourself")
                    .for_field("author", "self_follow"),
            );
        }
        if self
            .follows
            .exists(user, target.id)
            .await
            .map_err(map_follow_repository_error)?
        {
            return Err(duplicate_field("author", SUBSCRIPTION_MUST_BE_UNIQUE));
        }
        let follow = self
            .follows
            .create(user, target.id)
            .await
            .map_err(|err| match err {
                FollowRepositoryError::Duplicate => {
                    duplicate_field("author", SUBSCRIPTION_MUST_BE_UNIQUE)
                }
                other => map_follow_repository_error(other),
            })?;
        info!(user_id = %user, author_id = %target.id, "follow created");
        Ok(follow)
    }

    async fn unfollow(&self, user: UserId, author: &Username) -> Result<(), Error> {
        let target = self.find_author(author).await?;
        let deleted = self
            .follows
            .delete(user, target.id)
            .await
            .map_err(map_follow_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "you do not follow '{}'",
                target.username
            )));
        }
        info!(user_id = %user, author_id = %target.id, "follow removed");
        Ok(())
    }

    async fn list_follows(&self, user: UserId) -> Result<Vec<Follow>, Error> {
        self.follows
            .list_for_user(user)
            .await
            .map_err(map_follow_repository_error)
    }

    async fn add_to_list(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeListEntry, Error> {
        let author = self.recipe_author(kind, recipe).await?;
        // Only favorites forbid one's own recipes; the cart accepts them.
        if kind == RecipeListKind::Favorites && author == user {
            debug!(user_id = %user, recipe_id = %recipe, "favorite rejected: own recipe");
            return Err(
                Error::invalid_request("you cannot favorite your own recipe")
                    .for_field(kind.recipe_field(), "self_favorite"),
            );
        }
        let present = self
            .lists
            .recipes_among(kind, user, &[recipe])
            .await
            .map_err(map_recipe_list_repository_error)?;
        if present.contains(&recipe) {
            return Err(already_listed(kind));
        }
        let entry = self
            .lists
            .add(kind, user, recipe)
            .await
            .map_err(|err| match err {
                RecipeListRepositoryError::Duplicate => already_listed(kind),
                other => map_recipe_list_repository_error(other),
            })?;
        info!(user_id = %user, recipe_id = %recipe, list = kind.label(), "recipe listed");
        Ok(entry)
    }

    async fn remove_from_list(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        let removed = self
            .lists
            .remove(kind, user, recipe)
            .await
            .map_err(map_recipe_list_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!(
                "recipe {recipe} is not in your {}",
                kind.label()
            )));
        }
        info!(user_id = %user, recipe_id = %recipe, list = kind.label(), "recipe unlisted");
        Ok(())
    }

    async fn shopping_list(&self, user: UserId) -> Result<Vec<ShoppingListItem>, Error> {
        self.lists
            .shopping_list(user)
            .await
            .map_err(map_recipe_list_repository_error)
    }
}

#[cfg(test)]
#[path = "social_service_tests.rs"]
mod tests;
