//! Element building
//!
//! [`Parser`] turns the raw descriptors of a [`Document`] plus response
//! metadata into typed elements, honoring the `audit_*` toggles.

use crate::config::ParserConfig;
use crate::parser::document::{Document, FormRaw, RawForm};
use crate::parser::element::{Cookie, Form, Header, Link};
use crate::parser::page::{dedup_elements, Page};
use crate::parser::response::Response;
use indexmap::IndexMap;
use tracing::debug;
use url::Url;

/// Request headers the scanner audits, with their fixed values
const AUDITED_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("accept-charset", "ISO-8859-1,utf-8;q=0.7,*;q=0.7"),
    ("accept-language", "en-gb,en;q=0.5"),
    ("accept-encoding", "gzip,deflate"),
];

/// Parses one response under one configuration
///
/// # Example
///
/// ```
/// use webscope::config::ParserConfig;
/// use webscope::parser::{Parser, Response};
///
/// let response = Response::new("http://localhost/", 200)
///     .with_html(r#"<a href="/link?link_input=link_val">x</a>"#);
/// let config = ParserConfig::default();
///
/// let parser = Parser::new(&response, &config);
/// assert_eq!(parser.links().len(), 1);
/// ```
pub struct Parser<'a> {
    response: &'a Response,
    config: &'a ParserConfig,
    document: Document,
}

impl<'a> Parser<'a> {
    pub fn new(response: &'a Response, config: &'a ParserConfig) -> Self {
        Self {
            response,
            config,
            document: Document::new(response),
        }
    }

    /// Effective URL of the response
    pub fn url(&self) -> &str {
        &self.response.url
    }

    pub fn config(&self) -> &ParserConfig {
        self.config
    }

    pub fn response(&self) -> &Response {
        self.response
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_text(&self) -> bool {
        self.document.is_text()
    }

    pub fn base(&self) -> Option<&Url> {
        self.document.base()
    }

    pub fn to_absolute(&self, reference: &str) -> Option<Url> {
        self.document.to_absolute(reference)
    }

    /// Links from every anchor on the page
    pub fn links(&self) -> Vec<Link> {
        let Some(page_url) = self.page_url() else {
            return Vec::new();
        };
        if !self.config.audit_links {
            return Vec::new();
        }

        dedup_elements(
            self.document
                .anchors()
                .iter()
                .map(|anchor| Link::new(page_url, anchor)),
        )
    }

    /// Forms, with only their named fields auditable
    pub fn forms(&self) -> Vec<Form> {
        let Some(page_url) = self.page_url() else {
            return Vec::new();
        };
        if !self.config.audit_forms {
            return Vec::new();
        }

        dedup_elements(
            self.document
                .forms()
                .iter()
                .map(|form| build_form(page_url, form)),
        )
    }

    /// Cookies from `Set-Cookie` headers, then from `<meta>` tags
    pub fn cookies(&self) -> Vec<Cookie> {
        let Some(page_url) = self.page_url() else {
            return Vec::new();
        };
        if !self.config.audit_cookies {
            return Vec::new();
        }

        let meta = self.document.meta_cookies();
        let from_headers = self.response.header_values("set-cookie");
        let from_meta = meta.iter().map(String::as_str);

        dedup_elements(from_headers.chain(from_meta).filter_map(|value| {
            let cookie = Cookie::from_set_cookie(page_url, value);
            if cookie.is_none() {
                debug!("Ignoring malformed cookie '{}'", value);
            }
            cookie
        }))
    }

    /// One element per audited request header
    pub fn headers(&self) -> Vec<Header> {
        let Some(page_url) = self.page_url() else {
            return Vec::new();
        };
        if !self.config.audit_headers {
            return Vec::new();
        }

        let mut headers: Vec<Header> = AUDITED_HEADERS
            .iter()
            .map(|(name, value)| Header::new(page_url, name, value))
            .collect();

        headers.push(Header::new(page_url, "from", &self.config.authed_by));
        headers.push(Header::new(page_url, "user-agent", &self.config.user_agent));
        headers.push(Header::new(page_url, "referer", page_url.as_str()));
        headers.push(Header::new(page_url, "pragma", "no-cache"));

        headers
    }

    /// Every same-origin URL found on the page
    pub fn paths(&self) -> Vec<String> {
        self.document
            .paths()
            .iter()
            .map(Url::to_string)
            .collect()
    }

    /// Assembles the page
    pub fn run(&self) -> Page {
        Page::assemble(self)
    }

    pub(crate) fn page_url(&self) -> Option<&Url> {
        self.document.url()
    }
}

fn build_form(page_url: &Url, form: &RawForm) -> Form {
    let mut auditable = IndexMap::new();
    for field in &form.fields {
        if let Some(name) = &field.name {
            auditable.insert(name.clone(), field.value.clone().unwrap_or_default());
        }
    }

    Form {
        url: page_url.to_string(),
        action: form.action.to_string(),
        method: form.method.clone(),
        auditable,
        raw: FormRaw::from(form),
    }
}
