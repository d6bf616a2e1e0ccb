//! Tests for the application bootstrap: readiness signalling and session
//! settings read from the process environment.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use env_lock::lock_env;
use mockable::DefaultEnv;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use recipe_backend::test_support::{InMemoryBackend, TickingClock};
use rstest::{fixture, rstest};

use super::server::{ServerConfig, create_server};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn server_config() -> ServerConfig {
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl_hours: 2,
    };
    let bind_addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    ServerConfig::new(session, bind_addr)
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    server_config: ServerConfig,
) {
    assert!(!health_state.is_ready(), "state should start unready");
    let http_state = InMemoryBackend::new().http_state(Arc::new(TickingClock::default()));

    let _server = create_server(health_state.clone(), http_state, server_config)
        .expect("server should bind an ephemeral port");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
fn server_config_keeps_the_bind_address(server_config: ServerConfig) {
    assert_eq!(
        server_config.bind_addr(),
        SocketAddr::from(([127, 0, 0, 1], 0))
    );
}

#[rstest]
fn session_settings_come_from_the_process_environment() {
    let _guard = lock_env([
        ("SESSION_KEY_FILE", None),
        ("SESSION_COOKIE_SECURE", Some("0")),
        ("SESSION_SAMESITE", Some("Strict")),
        ("SESSION_ALLOW_EPHEMERAL", None),
        ("SESSION_TTL_HOURS", Some("6")),
    ]);

    let settings = session_settings_from_env(&DefaultEnv::new(), BuildMode::Debug)
        .expect("debug settings resolve");

    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl_hours, 6);
}
