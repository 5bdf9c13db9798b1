//! CLI command handlers. Each command is in its own file.

mod action;
mod completions;
mod encodings;
mod filter;
mod rewrite;
mod status;

pub use action::run_user_action;
pub use completions::run_completions;
pub use encodings::run_encodings;
pub use filter::run_filter;
pub use rewrite::run_rewrite;
pub use status::run_status;
