//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    sale::{
        create_sale_endpoint, delete_sale_endpoint, get_edit_sale_page, get_filtered_sales_page,
        get_sales_as_columns, get_sales_as_columns_between, get_sales_as_records,
        get_sales_as_records_between, get_sales_as_rows, get_sales_as_rows_between, get_sales_page,
        pick_data_type, pick_data_type_between, select_between_dates, update_sale_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SALES_VIEW, get(get_sales_page))
        .route(
            endpoints::FILTERED_SALES_VIEW,
            get(get_filtered_sales_page).post(select_between_dates),
        )
        .route(endpoints::ADD_ENTRY, post(create_sale_endpoint))
        .route(
            endpoints::EDIT_ENTRY,
            get(get_edit_sale_page).post(update_sale_endpoint),
        )
        .route(endpoints::DELETE_ENTRY, get(delete_sale_endpoint))
        .route(endpoints::DATA_TYPE_PICKER, post(pick_data_type))
        .route(
            endpoints::DATA_TYPE_PICKER_BETWEEN,
            post(pick_data_type_between),
        )
        .route(endpoints::SALES_AS_RECORDS, get(get_sales_as_records))
        .route(endpoints::SALES_AS_ROWS, get(get_sales_as_rows))
        .route(endpoints::SALES_AS_COLUMNS, get(get_sales_as_columns))
        .route(
            endpoints::SALES_AS_RECORDS_BETWEEN,
            get(get_sales_as_records_between),
        )
        .route(
            endpoints::SALES_AS_ROWS_BETWEEN,
            get(get_sales_as_rows_between),
        )
        .route(
            endpoints::SALES_AS_COLUMNS_BETWEEN,
            get(get_sales_as_columns_between),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
