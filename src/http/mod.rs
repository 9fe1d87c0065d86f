//! HTTP transport adapter
//!
//! The parser never performs I/O. This module is the thin edge that turns a
//! live request into the [`Response`] record the parser consumes, for the
//! CLI and for end-to-end tests.
//!
//! [`Response`]: crate::parser::Response

mod fetcher;

pub use fetcher::{build_http_client, cookie_header, fetch_response};
