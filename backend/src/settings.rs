//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `RECIPES_*` environment variables and an
//! optional configuration file. Session cookie settings are read separately
//! by [`crate::inbound::http::session_config`].

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/recipes";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL_PREFIX: &str = "/media";
const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// Directory uploaded images are written to.
    pub media_root: Option<PathBuf>,
    /// URL prefix under which `media_root` is served.
    pub media_url_prefix: Option<String>,
    /// Apply pending schema migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Upper bound on pooled database connections.
    pub max_connections: Option<u32>,
}

impl AppSettings {
    /// Connection string, or the local development default.
    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    /// Listen address; `0.0.0.0:8080` unless overridden.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Directory uploads are written beneath.
    #[must_use]
    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    /// URL prefix stored images are served from.
    #[must_use]
    pub fn media_url_prefix(&self) -> &str {
        self.media_url_prefix
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_URL_PREFIX)
    }
}
