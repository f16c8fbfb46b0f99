//! Sales Ledger is a web app for browsing and maintaining a table of store
//! sales transactions.
//!
//! This library provides an HTTP server that directly serves HTML pages for
//! the CRUD workflow and JSON serializations of the ledger data.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod database_id;
mod dates;
mod db;
mod endpoints;
mod html;
mod money;
mod not_found;
mod notice;
mod pagination;
mod routing;
mod sale;

pub use app_state::AppState;
pub use database_id::SaleId;
pub use db::initialize as initialize_db;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use sale::{Sale, count_sales, create_sale};

use crate::notice::notice_redirect;

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
    /// Tried to insert a sale whose ID is already present in the ledger.
    #[error("a sale with ID {0} already exists in the ledger")]
    DuplicateSaleId(SaleId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested sale could not be found")]
    NotFound,

    /// Tried to update a sale that does not exist.
    #[error("tried to update a sale that is not in the ledger")]
    UpdateMissingSale,

    /// Tried to delete a sale that does not exist.
    #[error("tried to delete a sale that is not in the ledger")]
    DeleteMissingSale,

    /// A date string from a form or query parameter could not be parsed.
    ///
    /// Callers should pass in the original input string.
    #[error("could not parse \"{0}\" as a calendar date")]
    InvalidDate(String),

    /// An amount string from a form could not be parsed as money.
    #[error("could not parse \"{0}\" as a sale amount")]
    InvalidAmount(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match &self {
            Error::DuplicateSaleId(id) => format!(
                "The ID {id} is already in the ledger. \
                Choose a different ID, or edit or delete the existing entry."
            ),
            Error::NotFound => "The requested entry could not be found.".to_owned(),
            Error::UpdateMissingSale => "Could not update the entry: it could not be found. \
                Refresh the page to see the current entries."
                .to_owned(),
            Error::DeleteMissingSale => "Could not delete the entry: it could not be found. \
                Refresh the page to see if it has already been deleted."
                .to_owned(),
            Error::InvalidDate(input) => format!("\"{input}\" is not a valid date."),
            Error::InvalidAmount(input) => format!("\"{input}\" is not a valid sale amount."),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                "Something went wrong. Try again later or check the server logs.".to_owned()
            }
        };

        notice_redirect(&message).into_response()
    }
}
