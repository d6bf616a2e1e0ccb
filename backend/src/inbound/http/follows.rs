//! Author subscriptions of the signed-in user.
//!
//! ```text
//! GET    /api/v1/follows
//! POST   /api/v1/follows {"author":"charles"}
//! DELETE /api/v1/follows/{username}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::FollowResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, user_validation_error_for};

/// Body for `POST /api/v1/follows`. The follower is always the caller.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FollowRequest {
    /// Username of the author to follow.
    #[schema(example = "charles")]
    pub author: String,
}

fn author_username(raw: &str) -> Result<Username, Error> {
    Username::parse(raw).map_err(|err| user_validation_error_for(FieldName::new("author"), err))
}

/// Authors the caller follows.
#[utoipa::path(
    get,
    path = "/api/v1/follows",
    responses(
        (status = 200, description = "Subscriptions", body = [FollowResponse]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["follows"],
    operation_id = "listFollows"
)]
#[get("/follows")]
pub async fn list_follows(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<FollowResponse>>> {
    let user = session.signed_in_user()?;
    let follows = state.social.list_follows(user).await?;
    Ok(web::Json(
        follows.into_iter().map(FollowResponse::from).collect(),
    ))
}

/// Follow an author by username.
#[utoipa::path(
    post,
    path = "/api/v1/follows",
    request_body = FollowRequest,
    responses(
        (status = 201, description = "Subscribed", body = FollowResponse),
        (status = 400, description = "Invalid author or self-follow", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such author", body = Error),
        (status = 409, description = "Already subscribed", body = Error)
    ),
    tags = ["follows"],
    operation_id = "follow"
)]
#[post("/follows")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FollowRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.signed_in_user()?;
    let author = author_username(&payload.author)?;
    let follow = state.social.follow(user, &author).await?;
    Ok(HttpResponse::Created().json(FollowResponse::from(follow)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/v1/follows/{username}",
    params(("username" = String, Path, description = "Author username")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not subscribed", body = Error)
    ),
    tags = ["follows"],
    operation_id = "unfollow"
)]
#[delete("/follows/{username}")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.signed_in_user()?;
    let author = author_username(&path.into_inner())?;
    state.social.unfollow(user, &author).await?;
    Ok(HttpResponse::NoContent().finish())
}
