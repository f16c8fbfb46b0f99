//! Defines the route handlers for filtering the ledger by a date range.
//!
//! The filter form POSTs here and is redirected to a GET URL that carries the
//! range as explicit query parameters; nothing about the range is kept on the
//! server between requests.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    dates::parse_form_date,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, pagination_nav},
    notice::{notice_banner, notice_redirect},
    pagination::{PaginationConfig, paginate},
};

use super::{
    Sale,
    core::get_sales_in_range,
    view::{data_type_picker, sales_table},
};

/// The state needed for the filtered ledger page.
#[derive(Debug, Clone)]
pub struct FilteredSalesPageState {
    /// The database connection for reading sales.
    db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for FilteredSalesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The form data submitted by the date filter form.
#[derive(Debug, Deserialize)]
pub struct DateRangeForm {
    /// The start of the range in `YYYY-MM-DD` form.
    pub start_date: String,
    /// The end of the range in `YYYY-MM-DD` form.
    pub end_date: String,
}

/// A route handler that turns the submitted date range into query parameters.
///
/// Redirects to the GET view of this page with `start_date` and `end_date` in
/// the URL. A start date after today is allowed but flagged with a notice,
/// matching the ledger's treatment of future dates as suspect but not fatal.
pub async fn select_between_dates(Form(form): Form<DateRangeForm>) -> Response {
    let start_date = match parse_form_date(&form.start_date) {
        Ok(date) => date,
        Err(error) => return error.into_response(),
    };
    let end_date = match parse_form_date(&form.end_date) {
        Ok(date) => date,
        Err(error) => return error.into_response(),
    };

    let mut params = vec![
        ("start_date", start_date.to_string()),
        ("end_date", end_date.to_string()),
    ];

    if start_date > OffsetDateTime::now_utc().date() {
        params.push((
            "notice",
            "Start date cannot be later than today's date!".to_owned(),
        ));
    }

    match serde_urlencoded::to_string(&params) {
        Ok(query) => {
            Redirect::to(&format!("{}?{query}", endpoints::FILTERED_SALES_VIEW)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not encode date range query: {error}");
            Redirect::to(endpoints::SALES_VIEW).into_response()
        }
    }
}

/// The query parameters accepted by the filtered ledger page.
#[derive(Debug, Deserialize)]
pub struct FilteredSalesQuery {
    /// The start of the range in `YYYY-MM-DD` form.
    pub start_date: Option<String>,
    /// The end of the range in `YYYY-MM-DD` form.
    pub end_date: Option<String>,
    /// The page of the filtered ledger to display. Defaults to the first page.
    pub page: Option<u64>,
    /// A transient notice from a redirect to render as a banner.
    pub notice: Option<String>,
}

/// Render the ledger table filtered to the date range in the query parameters.
pub async fn get_filtered_sales_page(
    State(state): State<FilteredSalesPageState>,
    Query(query): Query<FilteredSalesQuery>,
) -> Result<Response, Error> {
    let (Some(raw_start), Some(raw_end)) = (&query.start_date, &query.end_date) else {
        return Ok(notice_redirect("Choose a date range first.").into_response());
    };

    let start_date = parse_form_date(raw_start)?;
    let end_date = parse_form_date(raw_end)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let sales = get_sales_in_range(start_date, end_date, &connection)
        .inspect_err(|error| tracing::error!("could not get sales in range: {error}"))?;

    let config = &state.pagination_config;
    let slice = paginate(
        sales.len(),
        query.page.unwrap_or(config.default_page),
        config.page_size,
    );
    let items_on_page = &sales[slice.start..slice.end];

    let nav = pagination_nav(&slice, config.max_pages, |page| {
        filtered_page_url(start_date, end_date, page)
    });

    Ok(filtered_page_view(
        items_on_page,
        start_date,
        end_date,
        nav,
        query.notice.as_deref(),
    )
    .into_response())
}

fn filtered_page_url(start_date: Date, end_date: Date, page: u64) -> String {
    format!(
        "{}?start_date={start_date}&end_date={end_date}&page={page}",
        endpoints::FILTERED_SALES_VIEW
    )
}

fn filtered_page_view(
    sales: &[Sale],
    start_date: Date,
    end_date: Date,
    nav: Markup,
    notice: Option<&str>,
) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(message) = notice
            {
                (notice_banner(message))
            }

            section class="space-y-4 w-full lg:max-w-5xl" id="filtered-sales-content"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold"
                    {
                        "Sales from " (start_date) " to " (end_date)
                    }

                    a href=(endpoints::SALES_VIEW) class="underline" { "Back to the full ledger" }
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                {
                    (sales_table(sales))

                    (nav)
                }

                (data_type_picker(
                    endpoints::DATA_TYPE_PICKER_BETWEEN,
                    &[
                        ("start_date", start_date.to_string()),
                        ("end_date", end_date.to_string()),
                    ],
                ))
            }
        }
    };

    base("Filtered Ledger", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::Response,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        db::initialize,
        pagination::PaginationConfig,
        sale::{Sale, core::create_sale},
    };

    use super::{
        DateRangeForm, FilteredSalesPageState, FilteredSalesQuery, get_filtered_sales_page,
        select_between_dates,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn get_test_state(conn: Connection) -> FilteredSalesPageState {
        FilteredSalesPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
        }
    }

    async fn parse_html(response: Response) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Could not get response body");
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[tokio::test]
    async fn post_redirects_to_range_in_query_parameters() {
        let form = DateRangeForm {
            start_date: "2023-01-01".to_owned(),
            end_date: "2023-01-31".to_owned(),
        };

        let response = select_between_dates(Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(
            location,
            "/select_between_dates?start_date=2023-01-01&end_date=2023-01-31"
        );
    }

    #[tokio::test]
    async fn post_flags_future_start_date_with_notice() {
        let form = DateRangeForm {
            start_date: "2999-01-01".to_owned(),
            end_date: "2999-01-31".to_owned(),
        };

        let response = select_between_dates(Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(
            location.contains("notice="),
            "want a notice for a future start date, got {location}"
        );
    }

    #[tokio::test]
    async fn post_rejects_malformed_date_with_notice_redirect() {
        let form = DateRangeForm {
            start_date: "01/05/2023".to_owned(),
            end_date: "2023-01-31".to_owned(),
        };

        let response = select_between_dates(Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(location.starts_with("/?notice="));
    }

    #[tokio::test]
    async fn get_displays_only_sales_in_range() {
        let conn = get_test_connection();
        let in_range = [
            (1, date!(2023 - 01 - 01)),
            (2, date!(2023 - 01 - 15)),
            (3, date!(2023 - 01 - 31)),
        ];
        let out_of_range = [(4, date!(2022 - 12 - 31)), (5, date!(2023 - 02 - 01))];
        for (id, date) in in_range.iter().chain(&out_of_range) {
            create_sale(
                Sale {
                    id: *id,
                    store_code: "S001".to_owned(),
                    amount: 1000,
                    date: *date,
                },
                &conn,
            )
            .unwrap();
        }
        let state = get_test_state(conn);

        let response = get_filtered_sales_page(
            State(state),
            Query(FilteredSalesQuery {
                start_date: Some("2023-01-01".to_owned()),
                end_date: Some("2023-01-31".to_owned()),
                page: None,
                notice: None,
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let rows: Vec<_> = html
            .select(&Selector::parse("tbody tr[data-sale-row='true']").unwrap())
            .collect();
        assert_eq!(rows.len(), in_range.len());
    }

    #[tokio::test]
    async fn get_without_range_redirects_with_notice() {
        let conn = get_test_connection();
        let state = get_test_state(conn);

        let response = get_filtered_sales_page(
            State(state),
            Query(FilteredSalesQuery {
                start_date: None,
                end_date: None,
                page: None,
                notice: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn page_links_keep_the_date_range() {
        let conn = get_test_connection();
        for id in 1..=30 {
            create_sale(
                Sale {
                    id,
                    store_code: "S001".to_owned(),
                    amount: 1000,
                    date: date!(2023 - 01 - 15),
                },
                &conn,
            )
            .unwrap();
        }
        let state = get_test_state(conn);

        let response = get_filtered_sales_page(
            State(state),
            Query(FilteredSalesQuery {
                start_date: Some("2023-01-01".to_owned()),
                end_date: Some("2023-01-31".to_owned()),
                page: None,
                notice: None,
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let next_href = html
            .select(&Selector::parse("nav.pagination a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .find(|href| href.contains("page=2"))
            .expect("No link to page 2 found");
        assert_eq!(
            next_href,
            "/select_between_dates?start_date=2023-01-01&end_date=2023-01-31&page=2"
        );
    }
}
