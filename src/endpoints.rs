//! The application's endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete_entry/{id}', use [format_endpoint].

/// The root route which displays the paginated sales table.
pub const SALES_VIEW: &str = "/";
/// The page for displaying sales filtered by an inclusive date range.
pub const FILTERED_SALES_VIEW: &str = "/select_between_dates";
/// The route for creating a new ledger entry from the add-entry form.
pub const ADD_ENTRY: &str = "/add_entry";
/// The page for editing an existing ledger entry (GET) and saving it (POST).
pub const EDIT_ENTRY: &str = "/edit_entry";
/// The route for deleting a ledger entry by its ID.
pub const DELETE_ENTRY: &str = "/delete_entry/{id}";

/// The route that redirects to the chosen serialization of the full ledger.
pub const DATA_TYPE_PICKER: &str = "/get_data_type";
/// The route that redirects to the chosen serialization of a date-filtered ledger.
pub const DATA_TYPE_PICKER_BETWEEN: &str = "/get_data_type_between";

/// The full ledger as a list of field-name to value mappings.
pub const SALES_AS_RECORDS: &str = "/as_records";
/// The full ledger as a list of fixed-order value lists.
pub const SALES_AS_ROWS: &str = "/as_rows";
/// The full ledger in columnar form: column names split from row values.
pub const SALES_AS_COLUMNS: &str = "/as_columns";
/// The date-filtered ledger as a list of field-name to value mappings.
pub const SALES_AS_RECORDS_BETWEEN: &str = "/as_records_between";
/// The date-filtered ledger as a list of fixed-order value lists.
pub const SALES_AS_ROWS_BETWEEN: &str = "/as_rows_between";
/// The date-filtered ledger in columnar form.
pub const SALES_AS_COLUMNS_BETWEEN: &str = "/as_columns_between";

/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete_entry/{id}', '{id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
