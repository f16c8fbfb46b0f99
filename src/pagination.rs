//! This module defines the common functionality for paging data.
//!
//! Paging happens after the full result set has been fetched: the listing
//! pages and the serialization endpoints all fetch the matching sales and
//! then slice out the requested page.

use serde::Serialize;

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of sales to display per page in the HTML table views.
    pub page_size: u64,
    /// The number of sales to return per page from the serialization endpoints.
    pub api_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            page_size: 25,
            api_page_size: 50,
            max_pages: 5,
        }
    }
}

/// The bounds of one page within a larger result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// The index of the first item on the page.
    pub start: usize,
    /// One past the index of the last item on the page.
    pub end: usize,
    /// The minimum number of pages needed to display every item.
    pub total_pages: u64,
    /// The requested page, clamped to a minimum of 1.
    pub current_page: u64,
}

/// Compute the slice bounds and page count for page `page` of `item_count` items.
///
/// `total_pages` is `item_count / page_size` rounded up. Requesting a page
/// past the end yields an empty slice rather than an error, and pages below 1
/// are treated as page 1.
pub fn paginate(item_count: usize, page: u64, page_size: u64) -> PageSlice {
    let current_page = page.max(1);
    let total_pages = (item_count as u64).div_ceil(page_size);

    let start = usize::try_from((current_page - 1).saturating_mul(page_size))
        .unwrap_or(usize::MAX)
        .min(item_count);
    let end = start
        .saturating_add(usize::try_from(page_size).unwrap_or(usize::MAX))
        .min(item_count);

    PageSlice {
        start,
        end,
        total_pages,
        current_page,
    }
}

/// Hyperlinks to the neighboring pages of a paged response.
///
/// `prev` is present only when there is a page before the current one, and
/// `next` only when there is a page after it.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Link to the previous page, when the current page is not the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Link to the next page, when the current page is not the last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PageLinks {
    /// Build the prev/next links for `slice`, using `url_for_page` to render
    /// the target URL of a page number.
    pub fn for_slice(slice: &PageSlice, url_for_page: impl Fn(u64) -> String) -> Self {
        Self {
            prev: (slice.current_page > 1).then(|| url_for_page(slice.current_page - 1)),
            next: (slice.current_page < slice.total_pages)
                .then(|| url_for_page(slice.current_page + 1)),
        }
    }
}

/// One element of the numbered page navigation under the HTML table views.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page currently displayed.
    CurrPage(u64),
    /// A gap between the page window and the first/last page.
    Ellipsis,
    /// A link to the next page.
    NextButton(u64),
    /// A link to the previous page.
    BackButton(u64),
}

/// Build the indicator row for the page described by `slice`, showing a
/// window of at most `max_pages` numbered pages around the current one.
pub fn create_pagination_indicators(
    slice: &PageSlice,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let page_count = slice.total_pages;
    if page_count == 0 {
        return Vec::new();
    }

    // A page past the end still renders a sensible indicator row.
    let curr_page = slice.current_page.min(page_count);

    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

#[cfg(test)]
mod paginate_tests {
    use super::{PageSlice, paginate};

    #[test]
    fn empty_set_has_zero_pages() {
        let want = PageSlice {
            start: 0,
            end: 0,
            total_pages: 0,
            current_page: 1,
        };

        let got = paginate(0, 1, 25);

        assert_eq!(want, got);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(paginate(100, 1, 25).total_pages, 4);
        assert_eq!(paginate(101, 1, 25).total_pages, 5);
        assert_eq!(paginate(24, 1, 25).total_pages, 1);
    }

    #[test]
    fn slices_interior_page() {
        let want = PageSlice {
            start: 25,
            end: 50,
            total_pages: 3,
            current_page: 2,
        };

        let got = paginate(60, 2, 25);

        assert_eq!(want, got);
    }

    #[test]
    fn final_page_is_short() {
        let got = paginate(60, 3, 25);

        assert_eq!(got.start, 50);
        assert_eq!(got.end, 60);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let got = paginate(60, 7, 25);

        assert_eq!(got.start, got.end);
        assert_eq!(got.current_page, 7);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let got = paginate(60, 0, 25);

        assert_eq!(got.start, 0);
        assert_eq!(got.end, 25);
        assert_eq!(got.current_page, 1);
    }

    #[test]
    fn page_length_never_exceeds_page_size() {
        for item_count in [0, 1, 24, 25, 26, 49, 50, 60, 101] {
            for page in 1..=6 {
                let slice = paginate(item_count, page, 25);

                assert!(
                    slice.end - slice.start <= 25,
                    "page {page} of {item_count} items has {} items",
                    slice.end - slice.start
                );
            }
        }
    }
}
