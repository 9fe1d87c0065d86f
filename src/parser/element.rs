//! Typed audit elements
//!
//! Every element carries the page it was found on (`url`), the URL its
//! inputs are submitted to (`action`), the HTTP method, and the ordered
//! `auditable` inputs the scanner mutates. Both URLs are always absolute.

use crate::parser::document::FormRaw;
use crate::url::query_params;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// The four element variants a page is broken into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Link,
    Form,
    Cookie,
    Header,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Link => "link",
            Self::Form => "form",
            Self::Cookie => "cookie",
            Self::Header => "header",
        };
        f.write_str(name)
    }
}

/// Capability shared by every element the scanner can audit
pub trait Auditable {
    fn kind(&self) -> ElementKind;

    /// Absolute URL the inputs are submitted to
    fn action(&self) -> &str;

    /// Absolute URL of the page the element was found on
    fn url(&self) -> &str;

    fn method(&self) -> &str;

    /// Ordered input name -> value pairs
    fn auditable(&self) -> &IndexMap<String, String>;

    /// Structural identity used for de-duplication
    fn id(&self) -> ElementId {
        ElementId::of(self)
    }
}

/// Structural identity of an element: kind, action, method and inputs
///
/// Input order does not take part in identity, so two links differing only
/// in query parameter order are the same element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId {
    kind: ElementKind,
    action: String,
    method: String,
    inputs: Vec<(String, String)>,
}

impl ElementId {
    pub fn of<T: Auditable + ?Sized>(element: &T) -> Self {
        let mut inputs: Vec<(String, String)> = element
            .auditable()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        inputs.sort();

        Self {
            kind: element.kind(),
            action: element.action().to_string(),
            method: element.method().to_string(),
            inputs,
        }
    }
}

/// A hyperlink whose query parameters are its inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub action: String,
    pub auditable: IndexMap<String, String>,
}

impl Link {
    /// Creates a link found on `page_url` pointing at `action`
    pub fn new(page_url: &Url, action: &Url) -> Self {
        Self {
            url: page_url.to_string(),
            action: action.to_string(),
            auditable: query_params(action),
        }
    }
}

impl Auditable for Link {
    fn kind(&self) -> ElementKind {
        ElementKind::Link
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        "get"
    }

    fn auditable(&self) -> &IndexMap<String, String> {
        &self.auditable
    }
}

/// An HTML form
///
/// `auditable` holds only the named fields; `raw` keeps every field,
/// including unnamed submit buttons, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub url: String,
    pub action: String,
    pub method: String,
    pub auditable: IndexMap<String, String>,
    pub raw: FormRaw,
}

impl Auditable for Form {
    fn kind(&self) -> ElementKind {
        ElementKind::Form
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn auditable(&self) -> &IndexMap<String, String> {
        &self.auditable
    }
}

/// A single cookie; cookies have no action of their own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cookie {
    pub url: String,
    pub action: String,
    pub auditable: IndexMap<String, String>,

    /// Cookie attributes (path, domain, expires, ...), lower-cased names.
    /// Flags such as `secure` map to an empty value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Cookie {
    pub fn new(page_url: &Url, name: &str, value: &str) -> Self {
        let mut auditable = IndexMap::new();
        auditable.insert(name.to_string(), value.to_string());

        Self {
            url: page_url.to_string(),
            action: page_url.to_string(),
            auditable,
            attributes: BTreeMap::new(),
        }
    }

    /// Parses a `Set-Cookie` header value (or the content of a
    /// `<meta http-equiv="set-cookie">` tag)
    ///
    /// Only the leading `name=value` pair becomes the input; the value is
    /// unquoted and percent-decoded. Returns None when there is no usable
    /// name.
    ///
    /// # Example
    ///
    /// ```
    /// use url::Url;
    /// use webscope::parser::{Auditable, Cookie};
    ///
    /// let page = Url::parse("http://localhost/").unwrap();
    /// let cookie = Cookie::from_set_cookie(&page, "sid=a%20b; Path=/; HttpOnly").unwrap();
    /// assert_eq!(cookie.auditable()["sid"], "a b");
    /// assert_eq!(cookie.attributes["path"], "/");
    /// ```
    pub fn from_set_cookie(page_url: &Url, header_value: &str) -> Option<Self> {
        let mut parts = header_value.split(';');

        let (name, value) = split_pair(parts.next()?)?;
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self::new(page_url, name, &decode_value(value));

        for attribute in parts {
            let attribute = attribute.trim();
            if attribute.is_empty() {
                continue;
            }

            let (key, value) = split_pair(attribute).unwrap_or((attribute, ""));
            cookie
                .attributes
                .insert(key.to_ascii_lowercase(), value.to_string());
        }

        Some(cookie)
    }

    pub fn name(&self) -> &str {
        self.auditable.keys().next().map(String::as_str).unwrap_or("")
    }

    pub fn value(&self) -> &str {
        self.auditable.values().next().map(String::as_str).unwrap_or("")
    }
}

/// Splits `name=value`, trimming both sides
fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (name, value) = pair.split_once('=')?;
    Some((name.trim(), value.trim()))
}

fn decode_value(value: &str) -> String {
    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    percent_decode_str(unquoted).decode_utf8_lossy().into_owned()
}

impl Auditable for Cookie {
    fn kind(&self) -> ElementKind {
        ElementKind::Cookie
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        "cookie"
    }

    fn auditable(&self) -> &IndexMap<String, String> {
        &self.auditable
    }
}

/// A request header the scanner will mutate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub url: String,
    pub action: String,
    pub auditable: IndexMap<String, String>,
}

impl Header {
    pub fn new(page_url: &Url, name: &str, value: &str) -> Self {
        let mut auditable = IndexMap::new();
        auditable.insert(name.to_string(), value.to_string());

        Self {
            url: page_url.to_string(),
            action: page_url.to_string(),
            auditable,
        }
    }
}

impl Auditable for Header {
    fn kind(&self) -> ElementKind {
        ElementKind::Header
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        "get"
    }

    fn auditable(&self) -> &IndexMap<String, String> {
        &self.auditable
    }
}
