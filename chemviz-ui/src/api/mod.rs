//! API access from the browser.

pub mod client;

pub use client::{bytes_to_blob, get_api_base, log_failure, set_api_base, BrowserGateway};
