pub mod auth_handlers;
pub mod choice_handlers;
pub mod poll_handlers;
pub mod snippet_handlers;
pub mod user_handlers;
pub mod vote_handlers;

use chrono::Utc;

/// Creation timestamp shared by poll and snippet handlers.
pub(crate) fn utc_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
