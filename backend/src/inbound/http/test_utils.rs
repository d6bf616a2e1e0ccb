//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, Route, test::TestRequest, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockAccountCommand, MockCatalogueQuery, MockCommentCommand, MockRecipeCommand,
    MockRecipeQuery, MockSocialCommand, MockUsersQuery,
};
use crate::domain::{Email, Error, PersonName, User, UserId, Username};
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Route template for [`sign_in_route`].
pub const SIGN_IN_PATH: &str = "/__test/sign-in/{id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Route that signs in the user named in the path, bypassing credentials.
pub fn sign_in_route() -> Route {
    web::get().to(|session: SessionContext, id: web::Path<i64>| async move {
        let user_id = UserId::new(id.into_inner())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        session.sign_in(user_id)?;
        Ok::<_, Error>(HttpResponse::Ok().finish())
    })
}

/// App mounting `configure` under `/api/v1` with sessions, extractor
/// configuration and the sign-in helper route.
pub fn test_app(
    state: web::Data<HttpState>,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config(64 * 1024))
        .app_data(query_config())
        .app_data(path_config())
        .wrap(test_session_middleware())
        .route(SIGN_IN_PATH, sign_in_route())
        .service(web::scope("/api/v1").configure(configure))
}

/// Request hitting [`sign_in_route`] for `user_id`.
pub fn sign_in_request(user_id: i64) -> TestRequest {
    TestRequest::get().uri(&format!("/__test/sign-in/{user_id}"))
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Fixed timestamp used by fixtures.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Builds a valid fixture user with the given id and username.
pub fn fixture_user(id: i64, username: &str) -> User {
    User {
        id: UserId::new(id).expect("valid user id"),
        email: Email::new(format!("{username}@example.com")).expect("valid email"),
        username: Username::new(username).expect("valid username"),
        first_name: PersonName::first("Ada").expect("valid name"),
        last_name: PersonName::last("Lovelace").expect("valid name"),
        avatar: None,
        bio: None,
        date_joined: fixture_timestamp(),
    }
}

/// Mock driving ports; tests set expectations on the ones they exercise.
#[derive(Default)]
pub struct MockPorts {
    /// Account command port.
    pub accounts: MockAccountCommand,
    /// Users query port.
    pub users: MockUsersQuery,
    /// Catalogue query port.
    pub catalogue: MockCatalogueQuery,
    /// Recipe query port.
    pub recipes: MockRecipeQuery,
    /// Recipe command port.
    pub recipe_commands: MockRecipeCommand,
    /// Comment command port.
    pub comments: MockCommentCommand,
    /// Social command port.
    pub social: MockSocialCommand,
}

impl MockPorts {
    /// Wraps the mocks into shared HTTP state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            catalogue: Arc::new(self.catalogue),
            recipes: Arc::new(self.recipes),
            recipe_commands: Arc::new(self.recipe_commands),
            comments: Arc::new(self.comments),
            social: Arc::new(self.social),
        }))
    }
}
