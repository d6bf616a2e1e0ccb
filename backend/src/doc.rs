//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together with
//! the request and response DTOs, the error envelope and the session cookie
//! security scheme.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::ConfirmRequest;
use crate::inbound::http::comments::CommentRequest;
use crate::inbound::http::dto::{
    CartResponse, CommentResponse, FavoriteResponse, FollowResponse, IngredientResponse,
    RecipeIngredientResponse, RecipeResponse, ShoppingListItemResponse, TagResponse,
    UserResponse,
};
use crate::inbound::http::follows::FollowRequest;
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::recipe_lists::{CartRequest, FavoriteRequest};
use crate::inbound::http::recipes::{IngredientAmountRequest, RecipeRequest};
use crate::inbound::http::users::{RegisterRequest, SetPasswordRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/confirm.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Users, recipes, comments, follows, favorites and the shopping cart.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::set_password,
        crate::inbound::http::auth::confirm,
        crate::inbound::http::auth::logout,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::follows::list_follows,
        crate::inbound::http::follows::follow,
        crate::inbound::http::follows::unfollow,
        crate::inbound::http::recipe_lists::add_favorite,
        crate::inbound::http::recipe_lists::remove_favorite,
        crate::inbound::http::recipe_lists::add_to_cart,
        crate::inbound::http::recipe_lists::remove_from_cart,
        crate::inbound::http::recipe_lists::shopping_list,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserResponse,
        TagResponse,
        IngredientResponse,
        RecipeIngredientResponse,
        RecipeResponse,
        CommentResponse,
        FollowResponse,
        FavoriteResponse,
        CartResponse,
        ShoppingListItemResponse,
        RegisterRequest,
        SetPasswordRequest,
        ConfirmRequest,
        RecipeRequest,
        IngredientAmountRequest,
        CommentRequest,
        FollowRequest,
        FavoriteRequest,
        CartRequest,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Registration and profiles"),
        (name = "auth", description = "Credential confirmation and sessions"),
        (name = "catalogue", description = "Tags and ingredients"),
        (name = "recipes", description = "Recipe publishing and discovery"),
        (name = "comments", description = "Recipe comments"),
        (name = "follows", description = "Author subscriptions"),
        (name = "favorites", description = "Favorite recipes"),
        (name = "cart", description = "Shopping cart and shopping list"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
