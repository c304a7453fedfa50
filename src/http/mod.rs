//! HTTP client module with status classification.

mod client;
mod status;

pub use client::HttpClient;
pub use status::{RequestError, check_status, classify_status};
