//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that htmx swaps into the `#alert-container`
//! element rendered by [crate::html::base].

use maud::{Markup, html};

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded.
    Success {
        /// The headline.
        message: String,
        /// Extra information shown under the headline.
        details: String,
    },
    /// The action failed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and, ideally, how to fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as a dismissable HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "p-4 mb-4 text-sm text-green-800 border border-green-300 rounded-lg \
                bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 border border-red-300 rounded-lg \
                bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                details,
            ),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                id="alert"
                role="alert"
                class=(container_style)
            {
                div class="flex items-center justify-between"
                {
                    span class="font-semibold" { (message) }

                    button
                        type="button"
                        aria-label="Close"
                        class="ms-4 font-bold"
                        onclick="this.closest('#alert').remove()"
                    {
                        "×"
                    }
                }

                @if !details.is_empty() {
                    p class="mt-1" { (details) }
                }
            }
        }
    }
}
