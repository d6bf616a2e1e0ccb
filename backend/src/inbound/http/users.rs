//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"ada@example.com","username":"ada",...}
//! GET  /api/v1/users
//! GET  /api/v1/users/me
//! GET  /api/v1/users/{id}
//! POST /api/v1/users/set_password {"current_password":"...","new_password":"..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::RegistrationRequest;
use crate::domain::{Error, ImageInput, Password, PasswordChange, UserId, UserProfileDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, image_validation_error, parse_id, password_change_error,
    password_validation_error, user_validation_error,
};

/// Registration body for `POST /api/v1/users`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Login email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Requested handle.
    #[schema(example = "ada")]
    pub username: String,
    /// Given name.
    #[schema(example = "Ada")]
    pub first_name: String,
    /// Family name.
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Write-only; never echoed back.
    pub password: String,
    /// `data:image/<format>;base64,<payload>` or an existing image URL.
    pub avatar: Option<String>,
    /// Profile text.
    pub bio: Option<String>,
}

impl TryFrom<RegisterRequest> for RegistrationRequest {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let profile = UserProfileDraft::try_from_parts(
            &value.email,
            &value.username,
            &value.first_name,
            &value.last_name,
            value.bio,
        )
        .map_err(user_validation_error)?;
        let password = Password::new(&value.password)
            .map_err(|err| password_validation_error(FieldName::new("password"), err))?;
        let avatar = value
            .avatar
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| ImageInput::parse(&raw))
            .transpose()
            .map_err(|err| image_validation_error(FieldName::new("avatar"), err))?;
        Ok(Self {
            profile,
            password,
            avatar,
        })
    }
}

/// Body for `POST /api/v1/users/set_password`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct SetPasswordRequest {
    /// Password held today.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = RegistrationRequest::try_from(payload.into_inner()).inspect_err(|err| {
        debug!(field = err.field(), "registration rejected");
    })?;
    let user = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.signed_in_user()?;
    let user = state.users.get_user(user_id).await?;
    Ok(web::Json(user.into()))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id(path.into_inner(), FieldName::new("id"))?;
    let user = state.users.get_user(id).await?;
    Ok(web::Json(user.into()))
}

/// Change the signed-in user's password.
#[utoipa::path(
    post,
    path = "/api/v1/users/set_password",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request or wrong current password", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "setPassword"
)]
#[post("/users/set_password")]
pub async fn set_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.signed_in_user()?;
    let SetPasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    let change = PasswordChange::try_from_parts(&current_password, &new_password)
        .map_err(password_change_error)?;
    state.accounts.change_password(user_id, &change).await?;
    Ok(HttpResponse::NoContent().finish())
}
