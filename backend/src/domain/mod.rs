//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Value objects validate on construction and document their invariants in
//! Rustdoc; inbound adapters map their validation errors to field-scoped
//! [`Error`]s.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User, Recipe, Tag, Ingredient, Comment, Follow: read models.
//! - RecipeDraft, UserProfileDraft, Password: validated write inputs.
//! - AccountService, CatalogueService, RecipeService, CommentService,
//!   SocialService: driving port implementations.

pub mod error;
pub mod ports;

mod account_service;
mod auth;
mod catalogue_service;
mod comment;
mod comment_service;
mod flags;
mod ids;
mod image;
mod port_error_mapping;
mod recipe;
mod recipe_service;
mod reference;
mod social;
mod social_service;
mod trace_id;
mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    ConfirmationCredentials, CredentialsError, PASSWORD_MAX, Password, PasswordChange,
    PasswordChangeError, PasswordDigest, PasswordHashError, PasswordValidationError,
};
pub use self::catalogue_service::CatalogueService;
pub use self::comment::{Comment, CommentText, CommentValidationError, NewComment};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::flags::{RecipeFlagSet, RecipeFlags, Viewer, resolve_flags};
pub use self::ids::{CommentId, IngredientId, InvalidId, RecipeId, RelationId, TagId, UserId};
pub use self::image::{
    IMAGE_MAX_BYTES, ImageFormat, ImageInput, ImageUpload, ImageValidationError, MediaUrl,
};
pub use self::recipe::{
    Amount, CookingTime, IngredientLine, RECIPE_NAME_MAX, Recipe, RecipeDraft, RecipeDraftParts,
    RecipeFilter, RecipeIngredient, RecipeSelection, RecipeValidationError, RecipeView,
    RecipeWrite,
};
pub use self::recipe_service::RecipeService;
pub use self::reference::{Ingredient, IngredientNameFilter, Tag};
pub use self::social::{Follow, RecipeListEntry, RecipeListKind, ShoppingListItem};
pub use self::social_service::SocialService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, Email, PERSON_NAME_MAX, PersonName, RESERVED_USERNAME, USERNAME_MAX, User,
    UserProfileDraft, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
