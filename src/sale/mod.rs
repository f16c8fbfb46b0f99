//! Sales management for the ledger application.
//!
//! This module contains everything related to sales:
//! - The `Sale` model and the database functions for storing and querying it
//! - The route handlers for the ledger pages and the CRUD endpoints
//! - The serialization endpoints that expose the ledger as data

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod filter_page;
mod sales_page;
mod serializations;
mod view;

pub use self::core::{Sale, count_sales, create_sale, create_sales_table};
pub use create_endpoint::create_sale_endpoint;
pub use delete_endpoint::delete_sale_endpoint;
pub use edit_endpoint::{get_edit_sale_page, update_sale_endpoint};
pub use filter_page::{get_filtered_sales_page, select_between_dates};
pub use sales_page::get_sales_page;
pub use serializations::{
    get_sales_as_columns, get_sales_as_columns_between, get_sales_as_records,
    get_sales_as_records_between, get_sales_as_rows, get_sales_as_rows_between, pick_data_type,
    pick_data_type_between,
};
