//! Favorites, the shopping cart and the aggregated shopping list.
//!
//! ```text
//! POST   /api/v1/favorites {"recipe":10}
//! DELETE /api/v1/favorites/{recipe_id}
//! POST   /api/v1/cart {"purchase":10}
//! DELETE /api/v1/cart/{recipe_id}
//! GET    /api/v1/cart/shopping_list
//! ```
//!
//! Both lists belong to the caller; the body never names a user.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, RecipeId, RecipeListKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    CartResponse, FavoriteResponse, RecipeListEntryResponse, ShoppingListItemResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Body for `POST /api/v1/favorites`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FavoriteRequest {
    /// Recipe to favorite.
    #[schema(example = 10)]
    pub recipe: i64,
}

/// Body for `POST /api/v1/cart`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CartRequest {
    /// Recipe to add.
    #[schema(example = 10)]
    pub purchase: i64,
}

async fn add_entry(
    state: &HttpState,
    session: &SessionContext,
    kind: RecipeListKind,
    raw_recipe: i64,
    field: FieldName,
) -> ApiResult<HttpResponse> {
    let user = session.signed_in_user()?;
    let recipe: RecipeId = parse_id(raw_recipe, field)?;
    let entry = state.social.add_to_list(kind, user, recipe).await?;
    Ok(HttpResponse::Created().json(RecipeListEntryResponse::from(entry)))
}

async fn remove_entry(
    state: &HttpState,
    session: &SessionContext,
    kind: RecipeListKind,
    raw_recipe: i64,
) -> ApiResult<HttpResponse> {
    let user = session.signed_in_user()?;
    let recipe: RecipeId = parse_id(raw_recipe, FieldName::new("recipe_id"))?;
    state.social.remove_from_list(kind, user, recipe).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Favorite a recipe.
#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 201, description = "Added to favorites", body = FavoriteResponse),
        (status = 400, description = "Invalid id or own recipe", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such recipe", body = Error),
        (status = 409, description = "Already a favorite", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/favorites")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FavoriteRequest>,
) -> ApiResult<HttpResponse> {
    add_entry(
        &state,
        &session,
        RecipeListKind::Favorites,
        payload.recipe,
        FieldName::new("recipe"),
    )
    .await
}

/// Remove a recipe from the caller's favorites.
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{recipe_id}",
    params(("recipe_id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not a favorite", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/favorites/{recipe_id}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_entry(
        &state,
        &session,
        RecipeListKind::Favorites,
        path.into_inner(),
    )
    .await
}

/// Put a recipe in the caller's cart.
#[utoipa::path(
    post,
    path = "/api/v1/cart",
    request_body = CartRequest,
    responses(
        (status = 201, description = "Added to the cart", body = CartResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such recipe", body = Error),
        (status = 409, description = "Already in the cart", body = Error)
    ),
    tags = ["cart"],
    operation_id = "addToCart"
)]
#[post("/cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CartRequest>,
) -> ApiResult<HttpResponse> {
    add_entry(
        &state,
        &session,
        RecipeListKind::ShoppingCart,
        payload.purchase,
        FieldName::new("purchase"),
    )
    .await
}

/// Ingredient totals across the caller's cart.
#[utoipa::path(
    get,
    path = "/api/v1/cart/shopping_list",
    responses(
        (status = 200, description = "Ingredient totals across the cart",
            body = [ShoppingListItemResponse]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["cart"],
    operation_id = "shoppingList"
)]
#[get("/cart/shopping_list")]
pub async fn shopping_list(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ShoppingListItemResponse>>> {
    let user = session.signed_in_user()?;
    let items = state.social.shopping_list(user).await?;
    Ok(web::Json(
        items
            .into_iter()
            .map(ShoppingListItemResponse::from)
            .collect(),
    ))
}

/// Take a recipe out of the caller's cart.
#[utoipa::path(
    delete,
    path = "/api/v1/cart/{recipe_id}",
    params(("recipe_id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the cart"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not in the cart", body = Error)
    ),
    tags = ["cart"],
    operation_id = "removeFromCart"
)]
#[delete("/cart/{recipe_id}")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_entry(
        &state,
        &session,
        RecipeListKind::ShoppingCart,
        path.into_inner(),
    )
    .await
}
