//! Recipe read and write endpoints.
//!
//! ```text
//! GET    /api/v1/recipes?author=3&tags=breakfast,lunch&is_favorited=1
//! POST   /api/v1/recipes {"name":"Tea","text":"...","cooking_time":3,...}
//! GET    /api/v1/recipes/{id}
//! PUT    /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! ```
//!
//! Reads are open to anonymous callers; `is_favorite` and
//! `is_in_shopping_list` are then always `false`. Writes need a session and,
//! for update and delete, authorship of the recipe.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, IngredientId, RecipeDraft, RecipeDraftParts, RecipeFilter, RecipeId, TagId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::RecipeResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_id_list, recipe_validation_error,
};

/// Query string for the recipe listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipeListQuery {
    /// Only recipes by this author id.
    pub author: Option<i64>,
    /// Comma-separated tag slugs; a recipe matches when it carries any of them.
    #[param(example = "breakfast,lunch")]
    pub tags: Option<String>,
    /// `1`/`true` restricts to the caller's favorites.
    pub is_favorited: Option<String>,
    /// `1`/`true` restricts to the caller's cart.
    pub is_in_shopping_list: Option<String>,
}

impl RecipeListQuery {
    fn into_filter(self) -> Result<RecipeFilter, Error> {
        let author = self
            .author
            .map(|raw| parse_id::<UserId>(raw, FieldName::new("author")))
            .transpose()?;
        let tag_slugs = self
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|slug| !slug.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(RecipeFilter {
            author,
            tag_slugs,
            is_favorited: parse_flag(self.is_favorited.as_deref(), "is_favorited")?,
            is_in_shopping_list: parse_flag(
                self.is_in_shopping_list.as_deref(),
                "is_in_shopping_list",
            )?,
        })
    }
}

fn parse_flag(raw: Option<&str>, field: &'static str) -> Result<bool, Error> {
    match raw.map(str::trim) {
        None | Some("" | "0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => Err(
            Error::invalid_request(format!("{field} must be 0, 1, true or false, got {other}"))
                .for_field(field, "invalid_flag"),
        ),
    }
}

/// One ingredient line of a recipe write.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient id.
    #[schema(example = 7)]
    pub id: i64,
    /// Quantity, at least one.
    #[schema(example = 200)]
    pub amount: i64,
}

/// Body for recipe create and update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecipeRequest {
    /// Recipe name.
    #[schema(example = "Porridge")]
    pub name: String,
    /// Description.
    pub text: String,
    /// Minutes, at least one.
    #[schema(example = 10)]
    pub cooking_time: i64,
    /// `data:image/<format>;base64,<payload>` or an existing image URL.
    /// Omitted on update to keep the current image.
    pub image: Option<String>,
    /// Tag ids; may be empty.
    #[serde(default)]
    pub tags: Vec<i64>,
    /// At least one ingredient line.
    pub ingredients: Vec<IngredientAmountRequest>,
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = Error;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        let tags: Vec<TagId> = parse_id_list(&value.tags, FieldName::new("tags"))?;
        let raw_ids: Vec<i64> = value.ingredients.iter().map(|line| line.id).collect();
        let ingredient_ids: Vec<IngredientId> =
            parse_id_list(&raw_ids, FieldName::new("ingredients"))?;
        let ingredients = ingredient_ids
            .into_iter()
            .zip(value.ingredients.iter().map(|line| line.amount))
            .collect();
        Self::try_from_parts(RecipeDraftParts {
            name: value.name,
            text: value.text,
            cooking_time: value.cooking_time,
            image: value.image,
            tags,
            ingredients,
        })
        .map_err(recipe_validation_error)
    }
}

fn draft_from(payload: web::Json<RecipeRequest>) -> Result<RecipeDraft, Error> {
    RecipeDraft::try_from(payload.into_inner()).inspect_err(|err| {
        debug!(field = err.field(), "recipe write rejected");
    })
}

/// Recipes newest first, narrowed by the query filters.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let filter = query.into_inner().into_filter()?;
    let viewer = session.viewer()?;
    let recipes = state.recipes.list_recipes(viewer, filter).await?;
    Ok(web::Json(
        recipes.into_iter().map(RecipeResponse::from).collect(),
    ))
}

/// Publish a recipe as the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe published", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown tag or ingredient", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.signed_in_user()?;
    let draft = draft_from(payload)?;
    let view = state.recipe_commands.create_recipe(author, draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(view)))
}

/// One recipe with the caller's flags.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id: RecipeId = parse_id(path.into_inner(), FieldName::new("id"))?;
    let viewer = session.viewer()?;
    let view = state.recipes.get_recipe(viewer, id).await?;
    Ok(web::Json(view.into()))
}

/// Replace a recipe the caller wrote.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[put("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let editor = session.signed_in_user()?;
    let id: RecipeId = parse_id(path.into_inner(), FieldName::new("id"))?;
    let draft = draft_from(payload)?;
    let view = state.recipe_commands.update_recipe(editor, id, draft).await?;
    Ok(web::Json(view.into()))
}

/// Delete a recipe the caller wrote.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let editor = session.signed_in_user()?;
    let id: RecipeId = parse_id(path.into_inner(), FieldName::new("id"))?;
    state.recipe_commands.delete_recipe(editor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
