//! Page parsing
//!
//! A [`Response`] goes through three stages:
//! - [`Document`] extracts raw structure (anchors, forms, base, meta cookies)
//! - [`Parser`] builds typed elements from it and from response metadata
//! - [`Page`] merges those with elements synthesized from the request
//!   context (the page's own query string, the cookie jar)
//!
//! Nothing here performs I/O or keeps state between calls, so pages can be
//! parsed from many workers at once with a shared [`ParserConfig`].
//!
//! [`ParserConfig`]: crate::config::ParserConfig

mod builder;
mod document;
mod element;
mod page;
mod response;

pub use builder::Parser;
pub use document::{is_text_content, Document, Field, FieldTag, FormRaw, RawForm};
pub use element::{Auditable, Cookie, ElementId, ElementKind, Form, Header, Link};
pub use page::Page;
pub use response::Response;
