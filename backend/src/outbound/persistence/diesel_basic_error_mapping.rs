//! Shared Diesel error mapping for the repositories.
//!
//! Diesel and pool failures are first classified into [`StoreFailure`], then
//! each repository turns that into its own port error. Constraint violations
//! are kept apart because the domain gives them meaning (taken email,
//! dangling reference).

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Classified persistence failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
    UniqueViolation(String),
    ForeignKeyViolation(String),
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error, logging driver detail at debug level only.
pub(crate) fn classify_diesel_error(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreFailure::UniqueViolation(info.constraint_name().unwrap_or("unique").to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreFailure::ForeignKeyViolation(
                info.constraint_name().unwrap_or("foreign key").to_owned(),
            )
        }
        _ => StoreFailure::Query("database error".to_owned()),
    }
}
