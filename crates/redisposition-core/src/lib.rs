//! ReDisposition core: rewrites `Content-Disposition` response headers so that
//! attachment filenames are read in a chosen charset, or forces inline display.

pub mod catalog;
pub mod config;
pub mod disposition;
pub mod host;
pub mod interceptor;
pub mod lifecycle;
pub mod logging;
pub mod prefs;
pub mod settings;
pub mod ui;

pub use disposition::{decide, Mode, RewriteOutcome};
pub use lifecycle::{Extension, HostServices};
