use crate::config::ParserConfig;
use crate::parser::builder::Parser;
use crate::parser::element::{Auditable, Cookie, ElementId, Form, Header, Link};
use crate::parser::response::Response;
use crate::url::{link_vars, query_params};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Everything the scanner needs to know about one response
///
/// A page is built once and never changes afterwards; all fields are
/// read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    url: String,
    code: u16,
    method: String,
    query_vars: IndexMap<String, String>,
    #[serde(serialize_with = "serialize_body")]
    body: Vec<u8>,
    response_headers: Vec<(String, String)>,
    paths: Vec<String>,
    links: Vec<Link>,
    forms: Vec<Form>,
    cookies: Vec<Cookie>,
    headers: Vec<Header>,
    cookiejar: IndexMap<String, String>,
}

impl Page {
    /// Parses a response and assembles its page
    ///
    /// This is a pure function of its inputs: the same response and config
    /// always produce an equal page.
    ///
    /// # Example
    ///
    /// ```
    /// use webscope::config::ParserConfig;
    /// use webscope::parser::{Auditable, Page, Response};
    ///
    /// let response = Response::new("http://localhost/?q=v", 200).with_html("");
    /// let page = Page::from_response(&response, &ParserConfig::default());
    ///
    /// assert_eq!(page.links().len(), 1);
    /// assert_eq!(page.links()[0].auditable()["q"], "v");
    /// ```
    pub fn from_response(response: &Response, config: &ParserConfig) -> Self {
        Parser::new(response, config).run()
    }

    pub(crate) fn assemble(parser: &Parser<'_>) -> Self {
        let response = parser.response();
        let config = parser.config();

        let mut links = parser.links();
        let mut cookies = parser.cookies();

        if let Some(page_url) = parser.page_url() {
            if config.audit_links && !query_params(page_url).is_empty() {
                links = union(links, [Link::new(page_url, page_url)]);
            }

            if config.audit_cookies {
                let jar = config
                    .cookies
                    .iter()
                    .map(|(name, value)| Cookie::new(page_url, name, value));
                cookies = union(cookies, jar);
            }
        }

        let mut cookiejar = IndexMap::new();
        for cookie in &cookies {
            for (name, value) in cookie.auditable() {
                cookiejar.insert(name.clone(), value.clone());
            }
        }

        let url = parser
            .page_url()
            .map(Url::to_string)
            .unwrap_or_else(|| response.url.clone());

        let page = Self {
            query_vars: link_vars(&url),
            url,
            code: response.code,
            method: response.method.clone(),
            body: response.body.clone(),
            response_headers: response.headers.clone(),
            paths: parser.paths(),
            links,
            forms: parser.forms(),
            cookies,
            headers: parser.headers(),
            cookiejar,
        };

        debug!(
            "Assembled page {} ({} links, {} forms, {} cookies, {} headers, {} paths)",
            page.url,
            page.links.len(),
            page.forms.len(),
            page.cookies.len(),
            page.headers.len(),
            page.paths.len()
        );

        page
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn query_vars(&self) -> &IndexMap<String, String> {
        &self.query_vars
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn response_headers(&self) -> &[(String, String)] {
        &self.response_headers
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn cookiejar(&self) -> &IndexMap<String, String> {
        &self.cookiejar
    }

    /// Every element on the page: links, forms, cookies, then headers
    pub fn elements(&self) -> impl Iterator<Item = &dyn Auditable> + '_ {
        let links = self.links.iter().map(|e| e as &dyn Auditable);
        let forms = self.forms.iter().map(|e| e as &dyn Auditable);
        let cookies = self.cookies.iter().map(|e| e as &dyn Auditable);
        let headers = self.headers.iter().map(|e| e as &dyn Auditable);

        links.chain(forms).chain(cookies).chain(headers)
    }
}

fn serialize_body<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}

/// Drops structurally identical elements, keeping the first occurrence
pub(crate) fn dedup_elements<T: Auditable>(elements: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen: HashSet<ElementId> = HashSet::new();
    elements
        .into_iter()
        .filter(|element| seen.insert(element.id()))
        .collect()
}

/// Appends `extra` to `base`, skipping elements already present
pub(crate) fn union<T: Auditable>(base: Vec<T>, extra: impl IntoIterator<Item = T>) -> Vec<T> {
    dedup_elements(base.into_iter().chain(extra))
}
