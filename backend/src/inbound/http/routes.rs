//! Route table for the `/api/v1` scope.

use actix_web::web;

use super::auth::{confirm, logout};
use super::catalogue::{get_ingredient, get_tag, list_ingredients, list_tags};
use super::comments::{add_comment, list_comments};
use super::follows::{follow, list_follows, unfollow};
use super::recipe_lists::{
    add_favorite, add_to_cart, remove_favorite, remove_from_cart, shopping_list,
};
use super::recipes::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe};
use super::users::{current_user, get_user, list_users, register_user, set_password};

/// Register every API handler.
///
/// Paths are relative to the scope the caller mounts, normally `/api/v1`.
/// `users/me` is registered ahead of `users/{id}` so it is never read as
/// an id.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::routes::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(confirm).service(logout);
    cfg.service(register_user)
        .service(list_users)
        .service(current_user)
        .service(set_password)
        .service(get_user);
    cfg.service(list_tags)
        .service(get_tag)
        .service(list_ingredients)
        .service(get_ingredient);
    cfg.service(list_recipes)
        .service(create_recipe)
        .service(get_recipe)
        .service(update_recipe)
        .service(delete_recipe)
        .service(list_comments)
        .service(add_comment);
    cfg.service(list_follows).service(follow).service(unfollow);
    cfg.service(add_favorite)
        .service(remove_favorite)
        .service(add_to_cart)
        .service(shopping_list)
        .service(remove_from_cart);
}
