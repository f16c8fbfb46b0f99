//! Shared HTML building blocks and style constants for the maud views.

use maud::{DOCTYPE, Markup, html};

use crate::pagination::{PageSlice, PaginationIndicator, create_pagination_indicators};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_SELECT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Wrap `content` in the shared page shell: doctype, head, and body.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Sales Ledger" }
                link href="/static/main.css" rel="stylesheet";
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// A full-page error view with a heading and a suggested fix.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to the Ledger"
                    }
                }
            }
        }
    );

    base(title, &content)
}

/// Render the numbered page navigation for the page described by `slice`.
///
/// `url_for_page` renders the href of a page number so the filtered view can
/// keep its date range parameters in the links.
pub fn pagination_nav(
    slice: &PageSlice,
    max_pages: u64,
    url_for_page: impl Fn(u64) -> String,
) -> Markup {
    let indicators = create_pagination_indicators(slice, max_pages);

    html! {
        nav class="pagination" aria-label="Page navigation"
        {
            ul class="pagination inline-flex -space-x-px text-sm"
            {
                @for indicator in &indicators
                {
                    li
                    {
                        @match indicator
                        {
                            PaginationIndicator::BackButton(page) =>
                            {
                                a href=(url_for_page(*page)) class=(LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) =>
                            {
                                a href=(url_for_page(*page)) class=(LINK_STYLE) { "Next" }
                            }
                            PaginationIndicator::Page(page) =>
                            {
                                a href=(url_for_page(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) =>
                            {
                                span aria-current="page" class="font-bold" { (page) }
                            }
                            PaginationIndicator::Ellipsis =>
                            {
                                span { "…" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::pagination::paginate;

    use super::pagination_nav;

    #[test]
    fn renders_current_page_and_links() {
        let slice = paginate(75, 2, 25);

        let markup = pagination_nav(&slice, 5, |page| format!("/?page={page}")).into_string();

        let html = Html::parse_fragment(&markup);
        let current = html
            .select(&Selector::parse("[aria-current='page']").unwrap())
            .next()
            .expect("no current page indicator");
        assert_eq!(current.text().collect::<String>(), "2");

        let hrefs: Vec<_> = html
            .select(&Selector::parse("a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert!(hrefs.contains(&"/?page=1"));
        assert!(hrefs.contains(&"/?page=3"));
    }
}
