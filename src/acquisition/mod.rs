//! Fetching the hosting page and the monitored bundle.

pub mod http_client;
pub mod locator;
