//! Transient user notices.
//!
//! Every CRUD outcome, success or failure, redirects back to the listing page
//! with a `notice` query parameter that the page renders as a banner. The
//! notice travels in the redirect URL rather than in server-side session
//! state.

use axum::response::Redirect;
use maud::{Markup, html};

use crate::endpoints;

/// Redirect to the listing page with `message` as a transient notice.
pub fn notice_redirect(message: &str) -> Redirect {
    match serde_urlencoded::to_string([("notice", message)]) {
        Ok(query) => Redirect::to(&format!("{}?{}", endpoints::SALES_VIEW, query)),
        Err(error) => {
            tracing::error!("Could not encode notice {message:?}: {error}");
            Redirect::to(endpoints::SALES_VIEW)
        }
    }
}

/// Render `message` as a dismissible banner at the top of a page.
pub fn notice_banner(message: &str) -> Markup {
    html! {
        div
            role="status"
            data-notice="true"
            class="w-full max-w-3xl mb-4 px-4 py-3 rounded border
                border-blue-300 bg-blue-50 text-blue-800
                dark:border-blue-800 dark:bg-gray-800 dark:text-blue-300"
        {
            span { (message) }

            a href=(endpoints::SALES_VIEW) class="float-right font-bold" aria-label="Dismiss"
            {
                "✕"
            }
        }
    }
}
