//! Translation of pool and Diesel failures into [`RepositoryError`].

use tracing::debug;

use crate::domain::ports::{Referrer, RepositoryError};

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors, logging the database detail without leaking it.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => RepositoryError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::duplicate(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            RepositoryError::query("referenced row is missing or still in use")
        }
        _ => RepositoryError::query("database error"),
    }
}

/// Map the failure of a delete, reporting a foreign key violation as the
/// table whose rows still link to the deleted one.
pub(crate) fn map_delete_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            debug!(constraint = info.constraint_name(), "delete blocked by link");
            RepositoryError::still_referenced(referrer(info.constraint_name()))
        }
        other => map_diesel_error(other),
    }
}

/// Table owning a violated foreign key, from its default constraint name.
fn referrer(constraint: Option<&str>) -> Referrer {
    match constraint {
        Some(name) if name.starts_with("expense") => Referrer::Expenses,
        _ => Referrer::Activities,
    }
}

/// Fail an update that matched no row.
pub(crate) fn require_row(affected: usize, entity: &str, id: i64) -> Result<(), RepositoryError> {
    if affected == 0 {
        return Err(RepositoryError::query(format!("{entity} {id} does not exist")));
    }
    Ok(())
}
