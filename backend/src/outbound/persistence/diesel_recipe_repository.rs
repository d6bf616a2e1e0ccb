//! PostgreSQL-backed recipe repository.
//!
//! A recipe row owns its tag links and ingredient lines. Writes replace both
//! link sets inside the same transaction as the row itself; reads load a page
//! of rows and then expand authors, tags and ingredients with one query each.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Ingredient, MediaUrl, Recipe, RecipeId, RecipeIngredient, RecipeSelection, RecipeWrite, Tag,
    User, UserId,
};

use super::error_mapping::{DieselFailure, classify, failure_message, map_pool_error};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, RecipeChangeset, RecipeRow, RecipeTagRow, TagRow,
    UserRow, stored_amount,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    cart_items, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> RecipeRepositoryError {
    map_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel(error: DieselError) -> RecipeRepositoryError {
    let failure = classify(&error);
    match failure {
        DieselFailure::Connection => RecipeRepositoryError::connection(failure_message(&failure)),
        DieselFailure::ForeignKeyViolation(ref constraint) => {
            RecipeRepositoryError::missing_reference(
                constraint
                    .clone()
                    .unwrap_or_else(|| failure_message(&failure).to_owned()),
            )
        }
        _ => RecipeRepositoryError::query(failure_message(&failure)),
    }
}

/// Like [`map_diesel`], but a `NotFound` raised inside a write names `id`.
fn map_write(id: RecipeId) -> impl FnOnce(DieselError) -> RecipeRepositoryError {
    move |error| match error {
        DieselError::NotFound => RecipeRepositoryError::not_found(id.get()),
        other => map_diesel(other),
    }
}

fn changeset(recipe: &RecipeWrite) -> RecipeChangeset<'_> {
    RecipeChangeset {
        author_id: recipe.author.get(),
        name: &recipe.name,
        text: &recipe.text,
        cooking_time: recipe.cooking_time.minutes(),
        image: recipe.image.as_ref().map(AsRef::as_ref),
        published_at: recipe.published_at,
    }
}

fn tag_links(recipe_id: i64, recipe: &RecipeWrite) -> Vec<RecipeTagRow> {
    recipe
        .tags
        .iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect()
}

fn ingredient_lines(recipe_id: i64, recipe: &RecipeWrite) -> Vec<NewRecipeIngredientRow> {
    recipe
        .ingredients
        .iter()
        .map(|line| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: line.ingredient.get(),
            amount: line.amount.get(),
        })
        .collect()
}

async fn insert_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    recipe: &RecipeWrite,
) -> Result<(), DieselError> {
    let tags = tag_links(recipe_id, recipe);
    if !tags.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&tags)
            .execute(conn)
            .await?;
    }
    let lines = ingredient_lines(recipe_id, recipe);
    if !lines.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&lines)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Related rows for a page of recipes, keyed by recipe id.
#[derive(Default)]
struct Expansion {
    authors: HashMap<i64, User>,
    tags: HashMap<i64, Vec<Tag>>,
    ingredients: HashMap<i64, Vec<RecipeIngredient>>,
}

impl Expansion {
    fn assemble(&mut self, row: RecipeRow) -> Result<Recipe, String> {
        let author = self
            .authors
            .get(&row.author_id)
            .cloned()
            .ok_or_else(|| format!("recipe {} has no author row", row.id))?;
        Ok(Recipe {
            id: RecipeId::new(row.id).map_err(|err| err.to_string())?,
            author,
            cooking_time: row.cooking_time()?,
            tags: self.tags.remove(&row.id).unwrap_or_default(),
            ingredients: self.ingredients.remove(&row.id).unwrap_or_default(),
            name: row.name,
            text: row.text,
            image: row.image.map(MediaUrl::new),
            published_at: row.published_at,
        })
    }
}

fn ingredient_line(amount: i32, row: IngredientRow) -> Result<RecipeIngredient, String> {
    let ingredient = Ingredient::try_from(row)?;
    Ok(RecipeIngredient {
        amount: stored_amount(ingredient.id, amount)?,
        ingredient,
    })
}

async fn expand(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut author_ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let author_rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel)?;
    let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .order_by(tags::id)
        .load(conn)
        .await
        .map_err(map_diesel)?;
    let line_rows: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .order_by(recipe_ingredients::id)
        .load(conn)
        .await
        .map_err(map_diesel)?;

    let mut expansion = Expansion::default();
    for row in author_rows {
        let id = row.id;
        let user = User::try_from(row).map_err(RecipeRepositoryError::query)?;
        expansion.authors.insert(id, user);
    }
    for (recipe_id, row) in tag_rows {
        let tag = Tag::try_from(row).map_err(RecipeRepositoryError::query)?;
        expansion.tags.entry(recipe_id).or_default().push(tag);
    }
    for (recipe_id, amount, row) in line_rows {
        let line = ingredient_line(amount, row).map_err(RecipeRepositoryError::query)?;
        expansion.ingredients.entry(recipe_id).or_default().push(line);
    }

    rows.into_iter()
        .map(|row| expansion.assemble(row).map_err(RecipeRepositoryError::query))
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &RecipeWrite) -> Result<RecipeId, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let id: i64 = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&changeset(recipe))
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    insert_links(conn, id, recipe).await?;
                    Ok::<_, DieselError>(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;
        RecipeId::new(id).map_err(|err| RecipeRepositoryError::query(err.to_string()))
    }

    async fn update(
        &self,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let raw = id.get();
        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(recipes::table.find(raw))
                    .set(&changeset(recipe))
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(DieselError::NotFound);
                }
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(raw)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(raw)),
                )
                .execute(conn)
                .await?;
                insert_links(conn, raw, recipe).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_write(id))
    }

    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        if deleted == 0 {
            return Err(RecipeRepositoryError::not_found(id.get()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut expanded = expand(&mut conn, vec![row]).await?;
        Ok(expanded.pop())
    }

    async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let author: Option<i64> = recipes::table
            .find(id.get())
            .select(recipes::author_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        author
            .map(|raw| {
                UserId::new(raw).map_err(|err| RecipeRepositoryError::query(err.to_string()))
            })
            .transpose()
    }

    async fn list(&self, selection: &RecipeSelection) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let mut query = recipes::table
            .select(RecipeRow::as_select())
            .order_by((recipes::published_at.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(author) = selection.author {
            query = query.filter(recipes::author_id.eq(author.get()));
        }
        if !selection.tag_slugs.is_empty() {
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .inner_join(tags::table)
                        .filter(tags::slug.eq_any(selection.tag_slugs.clone()))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if let Some(user) = selection.favorited_by {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user.get()))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if let Some(user) = selection.in_cart_of {
            query = query.filter(
                recipes::id.eq_any(
                    cart_items::table
                        .filter(cart_items::user_id.eq(user.get()))
                        .select(cart_items::recipe_id),
                ),
            );
        }
        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel)?;
        expand(&mut conn, rows).await
    }
}
