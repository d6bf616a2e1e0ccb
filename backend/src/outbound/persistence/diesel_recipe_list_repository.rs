//! PostgreSQL-backed favorites and shopping cart lists.
//!
//! Both lists share the `(id, user_id, recipe_id)` shape in separate tables;
//! [`with_list_table!`] binds the right table module for a [`RecipeListKind`].

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecipeListRepository, RecipeListRepositoryError};
use crate::domain::{RecipeId, RecipeListEntry, RecipeListKind, ShoppingListItem, UserId, Username};

use super::error_mapping::{DieselFailure, classify, failure_message, map_pool_error};
use super::models::relation_id;
use super::pool::{DbPool, PoolError};
use super::schema::{cart_items, ingredients, recipe_ingredients, users};

/// Evaluate `$body` with `$table` naming the schema module for `$kind`.
macro_rules! with_list_table {
    ($kind:expr, $table:ident => $body:expr) => {
        match $kind {
            RecipeListKind::Favorites => {
                use super::schema::favorites as $table;
                $body
            }
            RecipeListKind::ShoppingCart => {
                use super::schema::cart_items as $table;
                $body
            }
        }
    };
}

fn unique_constraint(kind: RecipeListKind) -> &'static str {
    match kind {
        RecipeListKind::Favorites => "favorites_user_recipe_key",
        RecipeListKind::ShoppingCart => "cart_items_user_recipe_key",
    }
}

/// Diesel-backed implementation of the recipe list repository port.
#[derive(Clone)]
pub struct DieselRecipeListRepository {
    pool: DbPool,
}

impl DieselRecipeListRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> RecipeListRepositoryError {
    map_pool_error(error, RecipeListRepositoryError::connection)
}

fn map_diesel(kind: RecipeListKind) -> impl FnOnce(diesel::result::Error) -> RecipeListRepositoryError {
    move |error| {
        let failure = classify(&error);
        if failure.is_unique(unique_constraint(kind)) {
            return RecipeListRepositoryError::duplicate();
        }
        match failure {
            DieselFailure::Connection => {
                RecipeListRepositoryError::connection(failure_message(&failure))
            }
            _ => RecipeListRepositoryError::query(failure_message(&failure)),
        }
    }
}

fn to_recipe_ids(raw: Vec<i64>) -> Result<HashSet<RecipeId>, RecipeListRepositoryError> {
    raw.into_iter()
        .map(|id| {
            RecipeId::new(id).map_err(|err| RecipeListRepositoryError::query(err.to_string()))
        })
        .collect()
}

fn to_item(
    (name, measurement_unit, total): (String, String, Option<i64>),
) -> ShoppingListItem {
    ShoppingListItem {
        name,
        measurement_unit,
        total_amount: total.unwrap_or_default(),
    }
}

#[async_trait]
impl RecipeListRepository for DieselRecipeListRepository {
    async fn add(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeListEntry, RecipeListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let id: i64 = with_list_table!(kind, list => {
            diesel::insert_into(list::table)
                .values((list::user_id.eq(user.get()), list::recipe_id.eq(recipe.get())))
                .returning(list::id)
                .get_result(&mut conn)
                .await
        })
        .map_err(map_diesel(kind))?;
        let username: String = users::table
            .find(user.get())
            .select(users::username)
            .first(&mut conn)
            .await
            .map_err(map_diesel(kind))?;
        Ok(RecipeListEntry {
            id: relation_id(id).map_err(RecipeListRepositoryError::query)?,
            kind,
            user: Username::parse(&username)
                .map_err(|err| RecipeListRepositoryError::query(err.to_string()))?,
            recipe,
        })
    }

    async fn remove(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = with_list_table!(kind, list => {
            diesel::delete(
                list::table
                    .filter(list::user_id.eq(user.get()))
                    .filter(list::recipe_id.eq(recipe.get())),
            )
            .execute(&mut conn)
            .await
        })
        .map_err(map_diesel(kind))?;
        Ok(deleted > 0)
    }

    async fn recipes_among(
        &self,
        kind: RecipeListKind,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipeListRepositoryError> {
        if recipes.is_empty() {
            return Ok(HashSet::new());
        }
        let raw: Vec<i64> = recipes.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let listed: Vec<i64> = with_list_table!(kind, list => {
            list::table
                .filter(list::user_id.eq(user.get()))
                .filter(list::recipe_id.eq_any(&raw))
                .select(list::recipe_id)
                .load(&mut conn)
                .await
        })
        .map_err(map_diesel(kind))?;
        to_recipe_ids(listed)
    }

    async fn shopping_list(
        &self,
        user: UserId,
    ) -> Result<Vec<ShoppingListItem>, RecipeListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<(String, String, Option<i64>)> = cart_items::table
            .inner_join(
                recipe_ingredients::table
                    .on(recipe_ingredients::recipe_id.eq(cart_items::recipe_id)),
            )
            .inner_join(
                ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)),
            )
            .filter(cart_items::user_id.eq(user.get()))
            .group_by((ingredients::name, ingredients::measurement_unit))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                diesel::dsl::sum(recipe_ingredients::amount),
            ))
            .order_by((ingredients::name, ingredients::measurement_unit))
            .load(&mut conn)
            .await
            .map_err(map_diesel(RecipeListKind::ShoppingCart))?;
        Ok(rows.into_iter().map(to_item).collect())
    }
}
