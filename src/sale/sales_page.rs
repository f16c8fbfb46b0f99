//! Defines the route handler for the page that displays the ledger as a table.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{PAGE_CONTAINER_STYLE, base, pagination_nav},
    notice::notice_banner,
    pagination::{PaginationConfig, paginate},
};

use super::{
    Sale,
    core::get_all_sales,
    view::{add_entry_form, data_type_picker, date_filter_form, sales_table},
};

/// The state needed for the ledger page.
#[derive(Debug, Clone)]
pub struct SalesPageState {
    /// The database connection for reading sales.
    db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for SalesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by the ledger page.
#[derive(Debug, Deserialize)]
pub struct SalesPageQuery {
    /// The page of the ledger to display. Defaults to the first page.
    pub page: Option<u64>,
    /// A transient notice from a redirect to render as a banner.
    pub notice: Option<String>,
}

/// Render the paginated ledger table.
pub async fn get_sales_page(
    State(state): State<SalesPageState>,
    Query(query): Query<SalesPageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let sales = get_all_sales(&connection)
        .inspect_err(|error| tracing::error!("could not get sales: {error}"))?;

    let config = &state.pagination_config;
    let slice = paginate(
        sales.len(),
        query.page.unwrap_or(config.default_page),
        config.page_size,
    );
    let items_on_page = &sales[slice.start..slice.end];

    Ok(sales_page_view(
        items_on_page,
        pagination_nav(&slice, config.max_pages, |page| {
            format!("{}?page={page}", endpoints::SALES_VIEW)
        }),
        query.notice.as_deref(),
    )
    .into_response())
}

fn sales_page_view(sales: &[Sale], nav: Markup, notice: Option<&str>) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(message) = notice
            {
                (notice_banner(message))
            }

            section class="space-y-4 w-full lg:max-w-5xl" id="sales-content"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Sales Ledger" }
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                {
                    (sales_table(sales))

                    (nav)
                }

                (add_entry_form())

                (date_filter_form())

                (data_type_picker(endpoints::DATA_TYPE_PICKER, &[]))
            }
        }
    };

    base("Ledger", &content)
}
