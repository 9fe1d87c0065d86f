//! URL handling module for Webscope
//!
//! This module provides relative-reference resolution, query-string parsing,
//! path depth computation and domain extraction. Every URL that leaves the
//! parser passes through here, so nothing relative escapes into a [`Page`].
//!
//! [`Page`]: crate::parser::Page

mod domain;
mod path;
mod query;
mod resolve;

// Re-export main functions
pub use domain::{domain, extract_host};
pub use path::depth;
pub use query::{link_vars, query_params};
pub use resolve::{parse_absolute, resolve, to_absolute};
