//! Configuration module for Webscope
//!
//! This module handles loading, parsing, and validating TOML scan profiles,
//! and compiling them into the read-only [`ParserConfig`] the parser and the
//! scope engine consume.
//!
//! # Example
//!
//! ```no_run
//! use webscope::config::{load_config, ParserConfig};
//! use std::path::Path;
//!
//! let scan = load_config(Path::new("scan.toml")).unwrap();
//! let config = ParserConfig::from_scan_config(&scan).unwrap();
//! println!("Depth limit: {}", config.depth_limit);
//! ```

mod options;
mod parser;
mod types;
mod validation;

// Re-export types
pub use options::ParserConfig;
pub use types::{AuditConfig, RequestConfig, ScanConfig, ScopeConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
