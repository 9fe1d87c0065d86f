//! Webscope: page analysis core for a web vulnerability scanner
//!
//! This crate turns a fetched HTTP response into a [`Page`] of auditable
//! elements (links, forms, cookies, headers) and decides which discovered
//! URLs a crawler is allowed to follow.

pub mod config;
pub mod http;
pub mod parser;
pub mod scope;
pub mod url;

use thiserror::Error;

/// Main error type for Webscope operations
#[derive(Debug, Error)]
pub enum WebscopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Response from {url} is not text ({content_type})")]
    NonText { url: String, content_type: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid scope pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Webscope operations
pub type Result<T> = std::result::Result<T, WebscopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{ParserConfig, ScanConfig};
pub use parser::{Auditable, Cookie, ElementKind, Form, Header, Link, Page, Parser, Response};
pub use scope::{Scope, ScopeDecision};
pub use crate::url::{depth, domain, query_params, resolve};
