//! Wallet Core is a REST API for managing personal finances.
//!
//! Records come in two families, income and expense. Each family has
//! projections (expected future entries, optionally repeated monthly) and
//! materialized records (what actually happened). A projection can be turned
//! into a materialized record exactly once.
//!
//! This library provides the JSON API and the services behind it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod family;
mod logging;
mod memory_store;
mod owner;
mod pagination;
mod period;
mod projection;
mod record;
mod routing;
mod timezone;

pub use app_state::AppState;
pub use auth::{ClaimsIdentityProvider, IdentityProvider, StaticIdentityProvider};
pub use category::{Category, Label, PaymentMethod, create_category, create_payment_method};
pub use database_id::{CategoryId, PaymentMethodId, ProjectionId, RecordId};
pub use db::initialize as initialize_db;
pub use family::Family;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use memory_store::{InMemoryProjectionStore, InMemoryRecordStore, InMemoryStore};
pub use owner::OwnerId;
pub use pagination::{Page, PaginationConfig};
pub use period::MonthPeriod;
pub use projection::{
    MaterializeOverride, Materialization, Projection, ProjectionResponse, ProjectionStore,
    SQLiteProjectionStore,
};
pub use record::{MaterializedRecord, RecordResponse, RecordStore, SQLiteRecordStore};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Services report a missing projection or record as `None`. This
    /// variant is for stores asked to change a row that no longer exists and
    /// for request handlers turning `None` into a 404 response.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The category or payment method ID did not refer to an existing row.
    #[error("the category or payment method does not exist")]
    InvalidReference,

    /// A category or payment method was given an empty label.
    #[error("labels cannot be empty")]
    EmptyLabel,

    /// The projection has already been turned into a materialized record.
    ///
    /// Stores return this when a second materialization of the same
    /// projection loses the race to the first one.
    #[error("the projection {0} has already been materialized")]
    AlreadyMaterialized(ProjectionId),

    /// A projection or record with the same ID already exists.
    #[error("an entry with the same ID already exists")]
    DuplicateId,

    /// A materialized record was handed to a projection store without the ID
    /// of the projection it came from.
    #[error("the materialized record does not reference a projection")]
    MissingProjectionReference,

    /// The month in a filter was not between 1 and 12.
    #[error("the month {0} is invalid, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// The year in a filter was not between 1 and 9999.
    #[error("the year {0} is invalid, expected a number from 1 to 9999")]
    InvalidYear(i32),

    /// The page number and page size address entries past the largest supported offset.
    #[error("page {0} with a page size of {1} is out of range")]
    InvalidPage(u64, u64),

    /// Date arithmetic produced a date outside the supported range.
    #[error("{0} plus {1} months is outside the supported date range")]
    DateOutOfRange(time::Date, u32),

    /// The request did not include an access token.
    #[error("the access token is missing")]
    MissingAccessToken,

    /// The access token could not be resolved to an owner.
    #[error("the access token is invalid: {0}")]
    InvalidAccessToken(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidReference,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
                },
                _,
            ) => Error::DuplicateId,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidReference
            | Error::EmptyLabel
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::InvalidPage(_, _)
            | Error::DateOutOfRange(_, _) => StatusCode::BAD_REQUEST,
            Error::AlreadyMaterialized(_) | Error::DuplicateId => StatusCode::CONFLICT,
            Error::MissingAccessToken | Error::InvalidAccessToken(_) => StatusCode::UNAUTHORIZED,
            Error::MissingProjectionReference
            | Error::InvalidTimezoneError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are only meant for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            return render_message(
                status,
                "An unexpected error occurred, check the server logs for more details.",
            );
        }

        render_message(status, &self.to_string())
    }
}

/// Render the JSON body `{"status": <code>, "message": <text>}` used for
/// errors and acknowledgements.
pub(crate) fn render_message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "status": status.as_u16(), "message": message })),
    )
        .into_response()
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::date;

    use crate::Error;

    #[test]
    fn foreign_key_failure_maps_to_invalid_reference() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            Some("FOREIGN KEY constraint failed".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::InvalidReference);
    }

    #[test]
    fn primary_key_failure_maps_to_duplicate_id() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY),
            Some("UNIQUE constraint failed: income_projection.id".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::DuplicateId);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::AlreadyMaterialized("abc".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::InvalidMonth(13).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InvalidPage(u64::MAX, 2).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::DuplicateId.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::DateOutOfRange(date!(9999 - 12 - 01), 1).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::MissingAccessToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::DatabaseLockError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = Error::MissingProjectionReference.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
