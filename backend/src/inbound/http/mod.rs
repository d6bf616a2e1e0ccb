//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers parse and validate request bodies into domain value objects, call
//! the driving ports held in [`state::HttpState`], and render responses from
//! the DTOs in [`dto`]. Every failure leaves as the shared error envelope.

pub mod auth;
pub mod catalogue;
pub mod comments;
pub mod dto;
pub mod error;
pub mod follows;
pub mod health;
pub mod recipe_lists;
pub mod recipes;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
