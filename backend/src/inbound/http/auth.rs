//! Credential confirmation and session lifecycle.
//!
//! ```text
//! POST /api/v1/auth/confirm {"email":"ada@example.com","password":"..."}
//! POST /api/v1/auth/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ConfirmationCredentials, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_error;

/// Body for `POST /api/v1/auth/confirm`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct ConfirmRequest {
    /// Login email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Candidate password.
    pub password: String,
}

/// Check an email/password pair and start a session for the matching user.
#[utoipa::path(
    post,
    path = "/api/v1/auth/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Credentials confirmed", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request or incorrect password", body = Error),
        (status = 404, description = "No account for this email", body = Error)
    ),
    tags = ["auth"],
    operation_id = "confirmCredentials",
    security([])
)]
#[post("/auth/confirm")]
pub async fn confirm(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ConfirmRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let ConfirmRequest { email, password } = payload.into_inner();
    let credentials =
        ConfirmationCredentials::try_from_parts(&email, &password).map_err(credentials_error)?;
    let user = state.accounts.confirm(&credentials).await?;
    session.sign_in(user.id)?;
    info!(user_id = %user.id, "session started");
    Ok(web::Json(user.into()))
}

/// End the current session. Succeeds for anonymous callers too.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.sign_out();
    HttpResponse::NoContent().finish()
}
