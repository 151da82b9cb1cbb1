//! PostgreSQL implementations of the store traits.

pub mod principal;
pub mod session;

pub use principal::PgCredentialStore;
pub use session::PgSessionRepository;

use identity_core::error::{AppError, ErrorKind};

/// Map a sqlx error into the application taxonomy.
///
/// Constraint violations are caller mistakes; everything else means the
/// store could not serve the request.
pub(crate) fn store_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| {
        let (unique, foreign_key) = err
            .as_database_error()
            .map(|db| (db.is_unique_violation(), db.is_foreign_key_violation()))
            .unwrap_or((false, false));

        if unique {
            AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), err)
        } else if foreign_key {
            AppError::with_source(
                ErrorKind::NotFound,
                format!("{context}: referenced record not found"),
                err,
            )
        } else {
            AppError::with_source(ErrorKind::StoreUnavailable, context, err)
        }
    }
}
