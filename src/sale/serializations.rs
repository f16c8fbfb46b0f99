//! The serialization endpoints that expose the ledger as data.
//!
//! There are three shapes (records, rows, columnar split), each in an
//! unfiltered and a date-filtered variant. All six endpoints page at the same
//! size and return the same envelope: the page of data, the page count, the
//! current page, and `prev`/`next` hyperlinks so a client can walk the pages
//! from the response alone.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::Redirect,
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    database_id::SaleId,
    dates::{format_ledger_date, parse_form_date},
    endpoints,
    money::format_amount,
    pagination::{PageLinks, PageSlice, PaginationConfig, paginate},
};

use super::{
    Sale,
    core::{get_all_sales, get_sales_in_range},
};

/// The state needed by the serialization endpoints.
#[derive(Debug, Clone)]
pub struct SerializationState {
    /// The database connection for reading sales.
    db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for SerializationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

// ============================================================================
// RESPONSE SHAPES
// ============================================================================

/// The response envelope shared by every serialization endpoint.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    /// The page of serialized sales.
    pub data: T,
    /// The minimum number of pages needed to return every matching sale.
    #[serde(rename = "total pages")]
    pub total_pages: u64,
    /// The page this response holds.
    #[serde(rename = "current page")]
    pub current_page: u64,
    /// Hyperlinks to the neighboring pages.
    pub links: PageLinks,
}

/// One sale as a field-name to value mapping, with the amount and date in the
/// ledger's interchange text forms.
#[derive(Debug, PartialEq, Serialize)]
pub struct SaleRecord {
    /// The ID of the sale.
    pub id: SaleId,
    /// The code of the store the sale was made at.
    pub store_code: String,
    /// The amount as currency text, e.g. `$1,234.50`.
    pub total_sale: String,
    /// The date as ledger text, e.g. `1/5/2023`.
    pub transaction_date: String,
}

/// One sale as a fixed-order value list.
///
/// The order matches [COLUMNS]; clients of the row and columnar shapes rely
/// on it instead of field names.
pub type SaleRow = (SaleId, String, String, String);

/// The column names of the row-shaped serializations, in emission order.
pub const COLUMNS: [&str; 4] = ["id", "store_code", "total_sale", "transaction_date"];

/// The ledger page in columnar form: row offsets, column names, and row
/// values split into three parallel fields.
#[derive(Debug, Serialize)]
pub struct ColumnarSales {
    /// The absolute offset of each returned row within the full result set.
    pub index: Vec<u64>,
    /// The column names, in the same order as the row values.
    pub columns: [&'static str; 4],
    /// The rows of the page.
    pub data: Vec<SaleRow>,
}

fn sale_record(sale: &Sale) -> SaleRecord {
    SaleRecord {
        id: sale.id,
        store_code: sale.store_code.clone(),
        total_sale: format_amount(sale.amount),
        transaction_date: format_ledger_date(sale.date),
    }
}

fn sale_row(sale: &Sale) -> SaleRow {
    (
        sale.id,
        sale.store_code.clone(),
        format_amount(sale.amount),
        format_ledger_date(sale.date),
    )
}

fn records_shape(sales: &[Sale], _: &PageSlice) -> Vec<SaleRecord> {
    sales.iter().map(sale_record).collect()
}

fn rows_shape(sales: &[Sale], _: &PageSlice) -> Vec<SaleRow> {
    sales.iter().map(sale_row).collect()
}

fn columnar_shape(sales: &[Sale], slice: &PageSlice) -> ColumnarSales {
    ColumnarSales {
        index: (slice.start..slice.start + sales.len())
            .map(|offset| offset as u64)
            .collect(),
        columns: COLUMNS,
        data: sales.iter().map(sale_row).collect(),
    }
}

// ============================================================================
// SHARED PAGING
// ============================================================================

/// Slice out the requested page of `sales` and wrap it in the envelope.
///
/// This is the one place the serialization endpoints page and link their
/// responses; the endpoints differ only in where the sales come from, how a
/// page URL is rendered, and which shape function is applied to the page.
fn paged_json<T: Serialize>(
    sales: Vec<Sale>,
    page: u64,
    page_size: u64,
    url_for_page: impl Fn(u64) -> String,
    shape: impl FnOnce(&[Sale], &PageSlice) -> T,
) -> Json<PageEnvelope<T>> {
    let slice = paginate(sales.len(), page, page_size);
    let links = PageLinks::for_slice(&slice, url_for_page);
    let items_on_page = &sales[slice.start..slice.end];

    Json(PageEnvelope {
        data: shape(items_on_page, &slice),
        total_pages: slice.total_pages,
        current_page: slice.current_page,
        links,
    })
}

fn fetch_all_sales(state: &SerializationState) -> Result<Vec<Sale>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_sales(&connection)
        .inspect_err(|error| tracing::error!("could not get sales: {error}"))
}

fn fetch_sales_in_range(
    state: &SerializationState,
    start: Date,
    end: Date,
) -> Result<Vec<Sale>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_sales_in_range(start, end, &connection)
        .inspect_err(|error| tracing::error!("could not get sales in range: {error}"))
}

/// The query parameters accepted by the unfiltered serialization endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// The page to return. Defaults to the first page.
    pub page: Option<u64>,
}

/// The query parameters accepted by the date-filtered serialization endpoints.
#[derive(Debug, Deserialize)]
pub struct RangePageQuery {
    /// The start of the range in `YYYY-MM-DD` form.
    pub start_date: Option<String>,
    /// The end of the range in `YYYY-MM-DD` form.
    pub end_date: Option<String>,
    /// The page to return. Defaults to the first page.
    pub page: Option<u64>,
}

fn parse_range(query: &RangePageQuery) -> Result<(Date, Date), Error> {
    let start = parse_form_date(query.start_date.as_deref().unwrap_or_default())?;
    let end = parse_form_date(query.end_date.as_deref().unwrap_or_default())?;

    Ok((start, end))
}

fn range_page_url(route: &str, start: Date, end: Date, page: u64) -> String {
    format!("{route}?start_date={start}&end_date={end}&page={page}")
}

// ============================================================================
// ENDPOINTS
// ============================================================================

/// Serialize the full ledger as a paged list of field-name to value mappings.
pub async fn get_sales_as_records(
    State(state): State<SerializationState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope<Vec<SaleRecord>>>, Error> {
    let sales = fetch_all_sales(&state)?;
    let config = &state.pagination_config;

    Ok(paged_json(
        sales,
        query.page.unwrap_or(config.default_page),
        config.api_page_size,
        |page| format!("{}?page={page}", endpoints::SALES_AS_RECORDS),
        records_shape,
    ))
}

/// Serialize the full ledger as a paged list of fixed-order value lists.
pub async fn get_sales_as_rows(
    State(state): State<SerializationState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope<Vec<SaleRow>>>, Error> {
    let sales = fetch_all_sales(&state)?;
    let config = &state.pagination_config;

    Ok(paged_json(
        sales,
        query.page.unwrap_or(config.default_page),
        config.api_page_size,
        |page| format!("{}?page={page}", endpoints::SALES_AS_ROWS),
        rows_shape,
    ))
}

/// Serialize the full ledger in paged columnar form.
pub async fn get_sales_as_columns(
    State(state): State<SerializationState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope<ColumnarSales>>, Error> {
    let sales = fetch_all_sales(&state)?;
    let config = &state.pagination_config;

    Ok(paged_json(
        sales,
        query.page.unwrap_or(config.default_page),
        config.api_page_size,
        |page| format!("{}?page={page}", endpoints::SALES_AS_COLUMNS),
        columnar_shape,
    ))
}

/// Serialize the date-filtered ledger as a paged list of field-name to value
/// mappings.
pub async fn get_sales_as_records_between(
    State(state): State<SerializationState>,
    Query(query): Query<RangePageQuery>,
) -> Result<Json<PageEnvelope<Vec<SaleRecord>>>, Error> {
    let (start, end) = parse_range(&query)?;
    let sales = fetch_sales_in_range(&state, start, end)?;
    let config = &state.pagination_config;

    Ok(paged_json(
        sales,
        query.page.unwrap_or(config.default_page),
        config.api_page_size,
        |page| range_page_url(endpoints::SALES_AS_RECORDS_BETWEEN, start, end, page),
        records_shape,
    ))
}

/// Serialize the date-filtered ledger as a paged list of fixed-order value
/// lists.
pub async fn get_sales_as_rows_between(
    State(state): State<SerializationState>,
    Query(query): Query<RangePageQuery>,
) -> Result<Json<PageEnvelope<Vec<SaleRow>>>, Error> {
    let (start, end) = parse_range(&query)?;
    let sales = fetch_sales_in_range(&state, start, end)?;
    let config = &state.pagination_config;

    Ok(paged_json(
        sales,
        query.page.unwrap_or(config.default_page),
        config.api_page_size,
        |page| range_page_url(endpoints::SALES_AS_ROWS_BETWEEN, start, end, page),
        rows_shape,
    ))
}

/// Serialize the date-filtered ledger in paged columnar form.
pub async fn get_sales_as_columns_between(
    State(state): State<SerializationState>,
    Query(query): Query<RangePageQuery>,
) -> Result<Json<PageEnvelope<ColumnarSales>>, Error> {
    let (start, end) = parse_range(&query)?;
    let sales = fetch_sales_in_range(&state, start, end)?;
    let config = &state.pagination_config;

    Ok(paged_json(
        sales,
        query.page.unwrap_or(config.default_page),
        config.api_page_size,
        |page| range_page_url(endpoints::SALES_AS_COLUMNS_BETWEEN, start, end, page),
        columnar_shape,
    ))
}

// ============================================================================
// PICKER DISPATCHERS
// ============================================================================

/// The form data submitted by the serialization picker.
#[derive(Debug, Deserialize)]
pub struct DataTypeForm {
    /// The chosen shape: "records", "rows", or "columnar".
    pub data_type: String,
}

/// Redirect to the serialization of the full ledger chosen in the picker.
///
/// An unknown choice falls back to the listing page.
pub async fn pick_data_type(Form(form): Form<DataTypeForm>) -> Redirect {
    match form.data_type.as_str() {
        "records" => Redirect::to(endpoints::SALES_AS_RECORDS),
        "rows" => Redirect::to(endpoints::SALES_AS_ROWS),
        "columnar" => Redirect::to(endpoints::SALES_AS_COLUMNS),
        _ => Redirect::to(endpoints::SALES_VIEW),
    }
}

/// The form data submitted by the serialization picker on the filtered page.
#[derive(Debug, Deserialize)]
pub struct DataTypeBetweenForm {
    /// The chosen shape: "records", "rows", or "columnar".
    pub data_type: String,
    /// The start of the range in `YYYY-MM-DD` form, forwarded as a hidden field.
    pub start_date: String,
    /// The end of the range in `YYYY-MM-DD` form, forwarded as a hidden field.
    pub end_date: String,
}

/// Redirect to the date-filtered serialization chosen in the picker,
/// forwarding the range as query parameters.
///
/// An unknown choice falls back to the filtered listing page.
pub async fn pick_data_type_between(Form(form): Form<DataTypeBetweenForm>) -> Redirect {
    let route = match form.data_type.as_str() {
        "records" => endpoints::SALES_AS_RECORDS_BETWEEN,
        "rows" => endpoints::SALES_AS_ROWS_BETWEEN,
        "columnar" => endpoints::SALES_AS_COLUMNS_BETWEEN,
        _ => endpoints::FILTERED_SALES_VIEW,
    };

    match serde_urlencoded::to_string([
        ("start_date", &form.start_date),
        ("end_date", &form.end_date),
    ]) {
        Ok(query) => Redirect::to(&format!("{route}?{query}")),
        Err(error) => {
            tracing::error!("Could not encode date range query: {error}");
            Redirect::to(route)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
