//! In-process API harness over the in-memory backend.
//!
//! Every request builds a fresh service around the shared [`HttpState`] and a
//! fixed session key, so cookies issued by one request remain valid for the
//! next. Actix needs a system runtime, which the harness owns.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use actix_rt::SystemRunner;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::{App, test, web};
use recipe_backend::Trace;
use recipe_backend::domain::{Ingredient, TRACE_ID_HEADER, Tag};
use recipe_backend::inbound::http::error::{json_config, path_config, query_config};
use recipe_backend::inbound::http::routes::configure_api;
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::test_support::{InMemoryBackend, TickingClock};
use serde_json::{Value, json};

pub(crate) const PASSWORD: &str = "oat-milk-42";

/// Status, trace id and JSON body of one response.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub(crate) status: u16,
    pub(crate) trace_id: Option<String>,
    pub(crate) body: Value,
}

pub(crate) struct ApiHarness {
    runner: SystemRunner,
    key: Key,
    backend: InMemoryBackend,
    state: web::Data<HttpState>,
    cookies: RefCell<HashMap<String, Cookie<'static>>>,
}

fn api_app(
    state: web::Data<HttpState>,
    key: Key,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    let api = web::scope("/api/v1").wrap(session).configure(configure_api);
    App::new()
        .app_data(state)
        .app_data(json_config(1024 * 1024))
        .app_data(query_config())
        .app_data(path_config())
        .wrap(Trace)
        .service(api)
}

impl ApiHarness {
    pub(crate) fn new() -> Self {
        let backend = InMemoryBackend::new();
        let state = backend.http_state(Arc::new(TickingClock::default()));
        Self {
            runner: actix_rt::System::new(),
            key: Key::generate(),
            backend,
            state,
            cookies: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn seed_tag(&self, name: &str, slug: &str) -> Tag {
        self.backend.seed_tag(name, slug).expect("seeded tag")
    }

    pub(crate) fn seed_ingredient(&self, name: &str, unit: &str) -> Ingredient {
        self.backend
            .seed_ingredient(name, unit)
            .expect("seeded ingredient")
    }

    /// Send a request, attaching the session cookie held for `as_user`.
    pub(crate) fn send(
        &self,
        as_user: Option<&str>,
        method: Method,
        path: &str,
        payload: Option<Value>,
    ) -> Captured {
        let cookie = as_user.and_then(|user| self.cookies.borrow().get(user).cloned());
        let (captured, issued) = self.runner.block_on(async {
            let app = test::init_service(api_app(self.state.clone(), self.key.clone())).await;
            let mut request = test::TestRequest::default().method(method).uri(path);
            if let Some(cookie) = cookie {
                request = request.cookie(cookie);
            }
            if let Some(payload) = payload {
                request = request.set_json(payload);
            }
            let response = test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(ToOwned::to_owned);
            let issued = response
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .map(Cookie::into_owned);
            let bytes = test::read_body(response).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("JSON response body")
            };
            (
                Captured {
                    status,
                    trace_id,
                    body,
                },
                issued,
            )
        });
        if let (Some(user), Some(cookie)) = (as_user, issued) {
            self.cookies.borrow_mut().insert(user.to_owned(), cookie);
        }
        captured
    }

    /// Register `username` with the shared test password.
    pub(crate) fn register(&self, username: &str) -> Captured {
        self.send(
            None,
            Method::POST,
            "/api/v1/users",
            Some(json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "first_name": "Test",
                "last_name": "Cook",
                "password": PASSWORD,
            })),
        )
    }

    /// Confirm credentials for `username` and keep the issued cookie.
    pub(crate) fn sign_in(&self, username: &str) -> Captured {
        self.send(
            Some(username),
            Method::POST,
            "/api/v1/auth/confirm",
            Some(json!({
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            })),
        )
    }
}

pub(crate) fn id_of(body: &Value) -> i64 {
    body.get("id")
        .and_then(Value::as_i64)
        .expect("response carries an id")
}
