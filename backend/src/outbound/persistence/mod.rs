//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations of the domain ports backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Validation and authorization live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and the table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic writes**: a recipe row and its tag and ingredient links are
//!   written in one transaction.
//! - **Strongly typed errors**: database failures map onto each port's error
//!   enum; driver detail is logged at `debug` and kept out of responses.
//!
//! # Example
//!
//! ```ignore
//! use recipe_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_comment_repository;
mod diesel_follow_repository;
mod diesel_recipe_list_repository;
mod diesel_recipe_repository;
mod diesel_reference_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_recipe_list_repository::DieselRecipeListRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_reference_repository::DieselReferenceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_async,
};
pub use pool::{DbPool, PoolConfig, PoolError};
