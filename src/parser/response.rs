use std::borrow::Cow;

/// A fetched HTTP response, as handed over by the transport
///
/// Headers keep their original order and repeated headers (such as several
/// `Set-Cookie` lines) are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Effective URL after redirects
    pub url: String,
    pub code: u16,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Declared content type; falls back to the `Content-Type` header
    pub content_type: Option<String>,
}

impl Response {
    /// Creates an empty GET response
    pub fn new(url: &str, code: u16) -> Self {
        Self {
            url: url.to_string(),
            code,
            method: "get".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            content_type: None,
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_lowercase();
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Sets an HTML body and a `text/html` content type
    pub fn with_html(self, html: &str) -> Self {
        self.with_content_type("text/html")
            .with_body(html.as_bytes().to_vec())
    }

    /// Every value of a header, matched case-insensitively, in order
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The declared content type, or the first `Content-Type` header
    pub fn content_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .or_else(|| self.header_values("content-type").next())
    }

    /// The body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
