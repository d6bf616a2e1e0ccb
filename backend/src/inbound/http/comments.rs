//! Recipe comments.
//!
//! ```text
//! GET  /api/v1/recipes/{id}/comments
//! POST /api/v1/recipes/{id}/comments {"text":"Lovely with lemon."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CommentText, Error, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::CommentResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, comment_validation_error, parse_id};

/// Body for `POST /api/v1/recipes/{id}/comments`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentRequest {
    /// Comment body.
    #[schema(example = "Lovely with lemon.")]
    pub text: String,
}

/// Comments on a recipe, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/comments",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Comments, oldest first", body = [CommentResponse]),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/recipes/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let recipe: RecipeId = parse_id(path.into_inner(), FieldName::new("id"))?;
    let comments = state.comments.list_comments(recipe).await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// Comment on a recipe as the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/comments",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Empty text", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/recipes/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.signed_in_user()?;
    let recipe: RecipeId = parse_id(path.into_inner(), FieldName::new("id"))?;
    let text = CommentText::new(payload.into_inner().text).map_err(comment_validation_error)?;
    let comment = state.comments.add_comment(author, recipe, text).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}
