//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **media**: filesystem storage for uploaded images
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod persistence;
