//! Defines the endpoint for adding a new entry to the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, dates::parse_form_date, money::parse_amount, notice::notice_redirect,
};

use super::{Sale, core::create_sale};

/// The state needed to create a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleState {
    /// The database connection for managing sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSaleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or updating a ledger entry.
#[derive(Debug, Deserialize)]
pub struct SaleForm {
    /// The user-chosen ID of the sale.
    pub id: i64,
    /// The code of the store the sale was made at.
    pub store_code: String,
    /// The value of the sale as submitted, e.g. "1234.5".
    pub total_sale: String,
    /// The date of the sale in `YYYY-MM-DD` form.
    pub transaction_date: String,
}

/// Parse the text fields of `form` into a [Sale].
///
/// # Errors
/// Returns [Error::InvalidAmount] or [Error::InvalidDate] when the respective
/// field does not parse.
pub(crate) fn sale_from_form(form: SaleForm) -> Result<Sale, Error> {
    Ok(Sale {
        id: form.id,
        store_code: form.store_code,
        amount: parse_amount(&form.total_sale)?,
        date: parse_form_date(&form.transaction_date)?,
    })
}

/// A route handler for adding an entry to the ledger.
///
/// Every outcome redirects back to the listing page: success and duplicate or
/// malformed input all differ only in the notice they carry.
pub async fn create_sale_endpoint(
    State(state): State<CreateSaleState>,
    Form(form): Form<SaleForm>,
) -> Response {
    let sale = match sale_from_form(form) {
        Ok(sale) => sale,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    if let Err(error) = create_sale(sale, &connection) {
        tracing::error!("could not create sale: {error}");

        return error.into_response();
    }

    notice_redirect("Your entry has been added to the ledger!").into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, extract::State, http::Response};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        sale::{
            Sale,
            core::{create_sale, get_sale},
        },
    };

    use super::{CreateSaleState, SaleForm, create_sale_endpoint};

    fn get_test_state() -> CreateSaleState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        CreateSaleState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn test_form() -> SaleForm {
        SaleForm {
            id: 1,
            store_code: "S001".to_owned(),
            total_sale: "1234.5".to_owned(),
            transaction_date: "2023-01-05".to_owned(),
        }
    }

    #[track_caller]
    fn notice_from_redirect(response: &Response<Body>) -> String {
        let location = response
            .headers()
            .get("location")
            .expect("expected a redirect with a location header")
            .to_str()
            .unwrap();
        let (path, query) = location
            .split_once('?')
            .expect("expected a query string in the redirect location");
        assert_eq!(path, "/");

        let params: Vec<(String, String)> =
            serde_urlencoded::from_str(query).expect("Could not parse redirect query");
        params
            .into_iter()
            .find_map(|(name, value)| (name == "notice").then_some(value))
            .expect("expected a notice parameter in the redirect")
    }

    #[tokio::test]
    async fn can_create_sale() {
        let state = get_test_state();

        let response = create_sale_endpoint(State(state.clone()), Form(test_form())).await;

        let notice = notice_from_redirect(&response);
        assert!(notice.contains("added"), "unexpected notice: {notice}");

        let connection = state.db_connection.lock().unwrap();
        let sale = get_sale(1, &connection).unwrap();
        assert_eq!(sale.store_code, "S001");
        assert_eq!(sale.amount, 123450);
        assert_eq!(sale.date, date!(2023 - 01 - 05));
    }

    #[tokio::test]
    async fn rejects_duplicate_id() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_sale(
                Sale {
                    id: 1,
                    store_code: "S002".to_owned(),
                    amount: 500,
                    date: date!(2023 - 01 - 01),
                },
                &connection,
            )
            .unwrap();
        }

        let response = create_sale_endpoint(State(state.clone()), Form(test_form())).await;

        let notice = notice_from_redirect(&response);
        assert!(
            notice.contains("already in the ledger"),
            "unexpected notice: {notice}"
        );

        // The original row is untouched.
        let connection = state.db_connection.lock().unwrap();
        let sale = get_sale(1, &connection).unwrap();
        assert_eq!(sale.store_code, "S002");
    }

    #[tokio::test]
    async fn rejects_malformed_amount() {
        let state = get_test_state();
        let form = SaleForm {
            total_sale: "lots".to_owned(),
            ..test_form()
        };

        let response = create_sale_endpoint(State(state.clone()), Form(form)).await;

        let notice = notice_from_redirect(&response);
        assert!(
            notice.contains("not a valid sale amount"),
            "unexpected notice: {notice}"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_sale(1, &connection),
            Err(crate::Error::NotFound),
            "no sale should have been created"
        );
    }

    #[tokio::test]
    async fn rejects_malformed_date() {
        let state = get_test_state();
        let form = SaleForm {
            transaction_date: "1/5/2023".to_owned(),
            ..test_form()
        };

        let response = create_sale_endpoint(State(state), Form(form)).await;

        let notice = notice_from_redirect(&response);
        assert!(
            notice.contains("not a valid date"),
            "unexpected notice: {notice}"
        );
    }
}
