//! Embedded PostgreSQL bootstrap for the Diesel adapter suites.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` unless told otherwise.
//! When `PG_RUNTIME_DIR` or `PG_DATA_DIR` is missing both are pointed at a
//! fresh directory under `target/pg-embed` for the duration of the bootstrap,
//! with environment mutation serialised through `env-lock`.
//!
//! Each test gets its own migrated database on the shared cluster, dropped
//! when the returned [`TemporaryDatabase`] goes out of scope.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use recipe_backend::outbound::persistence::run_pending_migrations;
use uuid::Uuid;

static CLUSTER: OnceLock<Result<&'static ClusterHandle, String>> = OnceLock::new();

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

fn create_unique_pg_embed_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let base = pg_embed_target_dir().join(format!(
        "bootstrap-{}-{}",
        std::process::id(),
        Uuid::new_v4().simple()
    ));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((runtime_dir, data_dir))
}

/// Whether `err` looks like a flaky download rather than a hard failure.
fn is_transient_error(err: &str) -> bool {
    const PATTERNS: [&str; 7] = [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "temporarily unavailable",
        "dns error",
        "failed to lookup",
    ];
    let lowered = err.to_lowercase();
    PATTERNS.iter().any(|pattern| lowered.contains(pattern))
}

/// Process-wide cluster, booted on first use.
///
/// Download failures that look transient are retried with a doubling delay.
/// The outcome of the first bootstrap is reused by every later caller.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    CLUSTER.get_or_init(bootstrap_cluster).clone()
}

fn bootstrap_cluster() -> Result<&'static ClusterHandle, String> {
    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env_guard = if needs_override {
        let (runtime_dir, data_dir) =
            create_unique_pg_embed_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir.to_string_lossy().into_owned())),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == MAX_RETRIES || !is_transient_error(&last_error) {
                    break;
                }
                let delay = Duration::from_millis(RETRY_DELAY_MS * (1 << attempt));
                eprintln!("pg-embed: transient bootstrap failure, retrying in {delay:?}");
                std::thread::sleep(delay);
            }
        }
    }
    Err(last_error)
}

/// Create an empty database on `cluster` and apply every migration to it.
pub fn migrated_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let name = format!("recipes_test_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name)
        .map_err(|err| format!("create database: {err:?}"))?;
    run_pending_migrations(database.url()).map_err(|err| err.to_string())?;
    Ok(database)
}
