//! Defines the endpoint for deleting a ledger entry.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::SaleId, notice::notice_redirect};

use super::core::delete_sale;

/// The state needed to delete a sale.
#[derive(Debug, Clone)]
pub struct DeleteSaleState {
    /// The database connection for managing sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteSaleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a ledger entry by its ID.
///
/// A delete that affects no rows is reported as a failure notice, not an
/// error status.
pub async fn delete_sale_endpoint(
    State(state): State<DeleteSaleState>,
    Path(sale_id): Path<SaleId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_sale(sale_id, &connection) {
        Ok(0) => Error::DeleteMissingSale.into_response(),
        Ok(_) => notice_redirect("Your entry has been deleted!").into_response(),
        Err(error) => {
            tracing::error!("Could not delete sale {sale_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        sale::{
            Sale,
            core::{create_sale, get_sale},
        },
    };

    use super::{DeleteSaleState, delete_sale_endpoint};

    fn get_test_state() -> DeleteSaleState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        DeleteSaleState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_the_entry() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_sale(
                Sale {
                    id: 1,
                    store_code: "S001".to_owned(),
                    amount: 123450,
                    date: date!(2023 - 01 - 05),
                },
                &connection,
            )
            .unwrap();
        }

        let response = delete_sale_endpoint(State(state.clone()), Path(1)).await;

        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(
            location.contains("notice="),
            "want a success notice, got {location}"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_sale(1, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn delete_of_missing_entry_reports_failure() {
        let state = get_test_state();

        let response = delete_sale_endpoint(State(state), Path(42)).await;

        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(
            location.contains("notice="),
            "want a failure notice, got {location}"
        );
    }
}
