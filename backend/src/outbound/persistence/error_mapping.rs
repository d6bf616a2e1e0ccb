//! Shared Diesel error mapping for the repository adapters.
//!
//! Each repository supplies constructors for its own port error; these helpers
//! only decide which one applies and log the driver detail at `debug`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Classification of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection,
    /// A unique constraint rejected the row; carries the constraint name.
    UniqueViolation(Option<String>),
    /// A foreign key pointed at a missing row; carries the constraint name.
    ForeignKeyViolation(Option<String>),
    /// Anything else.
    Query,
}

impl DieselFailure {
    /// Whether this is a unique violation on `constraint`.
    pub(crate) fn is_unique(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation(Some(name)) if name == constraint)
    }
}

/// Inspect a Diesel error, logging its detail.
pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation(constraint),
                DatabaseErrorKind::ForeignKeyViolation => {
                    DieselFailure::ForeignKeyViolation(constraint)
                }
                DatabaseErrorKind::ClosedConnection => DieselFailure::Connection,
                _ => DieselFailure::Query,
            }
        }
        other => {
            debug!(
                error_type = %std::any::type_name_of_val(other),
                "diesel operation failed"
            );
            DieselFailure::Query
        }
    }
}

/// Message safe to surface in port errors; driver text stays in the log.
pub(crate) fn failure_message(failure: &DieselFailure) -> &'static str {
    match failure {
        DieselFailure::Connection => "database connection error",
        DieselFailure::UniqueViolation(_) => "unique constraint violated",
        DieselFailure::ForeignKeyViolation(_) => "referenced row is missing",
        DieselFailure::Query => "database error",
    }
}

/// Map common Diesel failures into query/connection constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    let failure = classify(&error);
    match failure {
        DieselFailure::Connection => connection(failure_message(&failure)),
        _ => query(failure_message(&failure)),
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(%error, "connection checkout failed");
    connection(error.into_message())
}
