//! Defines the page and endpoint for editing an existing ledger entry.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base},
    notice::notice_redirect,
};

use super::{
    core::{get_sale, update_sale},
    create_endpoint::{SaleForm, sale_from_form},
    view::{SaleFormValues, sale_form_fields},
};

/// The state needed to edit a sale.
#[derive(Debug, Clone)]
pub struct EditSaleState {
    /// The database connection for managing sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditSaleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the edit page.
#[derive(Debug, Deserialize)]
pub struct EditEntryQuery {
    /// The ID of the entry to edit.
    pub id: Option<i64>,
}

/// Render the page for editing the ledger entry named in the query parameters.
pub async fn get_edit_sale_page(
    State(state): State<EditSaleState>,
    Query(query): Query<EditEntryQuery>,
) -> Result<Response, Error> {
    let Some(sale_id) = query.id else {
        return Err(Error::NotFound);
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let sale = get_sale(sale_id, &connection)
        .inspect_err(|error| tracing::error!("could not get sale {sale_id}: {error}"))?;

    let amount = format!("{:.2}", sale.amount as f64 / 100.0);
    let date = sale.date.to_string();

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-md"
            {
                h1 class="text-xl font-bold" { "Edit Entry " (sale.id) }

                form method="post" action=(endpoints::EDIT_ENTRY) class="space-y-4"
                {
                    (sale_form_fields(&SaleFormValues {
                        id: Some(sale.id),
                        store_code: &sale.store_code,
                        total_sale: &amount,
                        transaction_date: &date,
                    }))

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                }

                a href=(endpoints::SALES_VIEW) class="underline" { "Cancel" }
            }
        }
    };

    Ok(base("Edit Entry", &content).into_response())
}

/// A route handler for saving an edited ledger entry.
///
/// Overwrites every field of the entry except its ID. An update that affects
/// no rows means the entry has disappeared and is reported as a failure.
pub async fn update_sale_endpoint(
    State(state): State<EditSaleState>,
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

    match update_sale(&sale, &connection) {
        Ok(0) => Error::UpdateMissingSale.into_response(),
        Ok(_) => notice_redirect("Your entry has been updated!").into_response(),
        Err(error) => {
            tracing::error!("could not update sale {}: {error}", sale.id);
            error.into_response()
        }
    }
}
