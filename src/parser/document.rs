//! Structural extraction from HTML
//!
//! This module handles parsing a response body and extracting:
//! - anchors (`<a href>`)
//! - forms and their fields
//! - the first `<base href>`
//! - cookies set through `<meta http-equiv="set-cookie">`
//! - every other path reference used for crawling
//!
//! Everything is resolved to absolute URLs here. Malformed markup never
//! aborts extraction: html5ever recovers what it can and references that do
//! not resolve are dropped.

use crate::parser::response::Response;
use crate::url::to_absolute;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use url::{Position, Url};

/// Extra references that only feed `paths`, as (selector, attribute)
const PATH_SOURCES: &[(&str, &str)] = &[
    ("link[href]", "href"),
    ("area[href]", "href"),
    ("frame[src]", "src"),
    ("iframe[src]", "src"),
    ("script[src]", "src"),
];

/// Which element a form field came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTag {
    Input,
    Select,
    Textarea,
}

/// One form field as written in the markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    #[serde(skip)]
    pub tag: FieldTag,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Option values, for `<select>` only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A form as found in the document, before it becomes a [`Form`]
///
/// [`Form`]: crate::parser::Form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawForm {
    pub action: Url,
    pub method: String,
    /// Form attributes, with `action` replaced by its absolute form
    pub attrs: BTreeMap<String, String>,
    /// Fields in document order
    pub fields: Vec<Field>,
}

/// Full structural record of a form, kept on the element for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormRaw {
    pub attrs: BTreeMap<String, String>,
    pub input: Vec<Field>,
    pub select: Vec<Field>,
    pub textarea: Vec<Field>,
}

impl From<&RawForm> for FormRaw {
    fn from(form: &RawForm) -> Self {
        let mut raw = FormRaw {
            attrs: form.attrs.clone(),
            ..FormRaw::default()
        };

        for field in &form.fields {
            match field.tag {
                FieldTag::Input => raw.input.push(field.clone()),
                FieldTag::Select => raw.select.push(field.clone()),
                FieldTag::Textarea => raw.textarea.push(field.clone()),
            }
        }

        raw
    }
}

/// Returns true if the content type names an HTML/text family type
///
/// Parameters such as `charset` are ignored. A missing or empty content type
/// is not text.
pub fn is_text_content(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type.starts_with("text/")
        || media_type == "application/xhtml+xml"
        || media_type == "application/xml"
        || media_type.ends_with("+xml")
}

/// A parsed response ready for extraction
///
/// Non-text responses (and responses whose effective URL is not a valid
/// absolute URL) are never parsed; every extraction method then returns an
/// empty collection.
pub struct Document {
    url: Option<Url>,
    text: bool,
    html: Option<Html>,
    base: Option<Url>,
}

impl Document {
    pub fn new(response: &Response) -> Self {
        let text = is_text_content(response.content_type());

        let url = match Url::parse(&response.url) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Unparseable effective URL '{}': {}", response.url, e);
                None
            }
        };

        let html = match (&url, text) {
            (Some(_), true) => Some(Html::parse_document(&response.body_text())),
            _ => {
                debug!(
                    "Not parsing {} (content type: {:?})",
                    response.url,
                    response.content_type()
                );
                None
            }
        };

        let base = match (&html, &url) {
            (Some(html), Some(url)) => extract_base(html, url),
            _ => None,
        };

        Self {
            url,
            text,
            html,
            base,
        }
    }

    /// Returns true if the response is text/markup
    pub fn is_text(&self) -> bool {
        self.text
    }

    /// The effective URL of the response, if it parsed
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The first `<base href>`, resolved against the effective URL
    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Resolves a reference the way references on this page are resolved
    pub fn to_absolute(&self, reference: &str) -> Option<Url> {
        to_absolute(reference, self.url.as_ref()?, self.base.as_ref())
    }

    /// Absolute targets of every `<a href>`, in document order
    pub fn anchors(&self) -> Vec<Url> {
        self.resolve_attr("a[href]", "href")
    }

    /// Every form with its fields, in document order
    pub fn forms(&self) -> Vec<RawForm> {
        let (Some(html), Some(url)) = (&self.html, &self.url) else {
            return Vec::new();
        };

        let Ok(form_selector) = Selector::parse("form") else {
            return Vec::new();
        };
        let Ok(field_selector) = Selector::parse("input, select, textarea") else {
            return Vec::new();
        };

        let mut forms = Vec::new();

        for form in html.select(&form_selector) {
            let action = match form.value().attr("action").map(str::trim) {
                Some(action) if !action.is_empty() => match self.to_absolute(action) {
                    Some(action) => action,
                    None => {
                        debug!("Dropping form with unusable action '{}'", action);
                        continue;
                    }
                },
                _ => {
                    let mut own = url.clone();
                    own.set_fragment(None);
                    own
                }
            };

            let method = form
                .value()
                .attr("method")
                .map(|m| m.trim().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "get".to_string());

            let mut attrs: BTreeMap<String, String> = form
                .value()
                .attrs()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect();
            attrs.insert("action".to_string(), action.to_string());
            attrs.insert("method".to_string(), method.clone());

            let fields = form.select(&field_selector).filter_map(parse_field).collect();

            forms.push(RawForm {
                action,
                method,
                attrs,
                fields,
            });
        }

        forms
    }

    /// Content of every `<meta http-equiv="set-cookie">` tag
    pub fn meta_cookies(&self) -> Vec<String> {
        let Some(html) = &self.html else {
            return Vec::new();
        };

        let Ok(selector) = Selector::parse("meta[http-equiv]") else {
            return Vec::new();
        };

        html.select(&selector)
            .filter(|meta| {
                meta.value()
                    .attr("http-equiv")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("set-cookie"))
            })
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::to_string)
            .collect()
    }

    /// Every same-origin URL referenced by the page, de-duplicated
    ///
    /// Sources are the base tag, anchors, form actions, and the
    /// `PATH_SOURCES` references. URLs on another origin than the page or
    /// its base are left out.
    pub fn paths(&self) -> Vec<Url> {
        let Some(url) = &self.url else {
            return Vec::new();
        };

        let mut candidates: Vec<Url> = Vec::new();
        candidates.extend(self.base.iter().cloned());
        candidates.extend(self.anchors());
        candidates.extend(self.forms().into_iter().map(|form| form.action));
        for (selector, attr) in PATH_SOURCES {
            candidates.extend(self.resolve_attr(selector, attr));
        }

        let origins: Vec<&str> = std::iter::once(url)
            .chain(self.base.iter())
            .map(|u| &u[..Position::BeforePath])
            .collect();

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| origins.contains(&&candidate[..Position::BeforePath]))
            .filter(|candidate| seen.insert(candidate.to_string()))
            .collect()
    }

    fn resolve_attr(&self, selector: &str, attr: &str) -> Vec<Url> {
        let Some(html) = &self.html else {
            return Vec::new();
        };

        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };

        html.select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .filter_map(|reference| {
                let resolved = self.to_absolute(reference);
                if resolved.is_none() {
                    debug!("Dropping reference '{}'", reference);
                }
                resolved
            })
            .collect()
    }
}

/// Finds the first `<base href>` and resolves it against the page URL
fn extract_base(html: &Html, url: &Url) -> Option<Url> {
    let selector = Selector::parse("base[href]").ok()?;
    let href = html.select(&selector).next()?.value().attr("href")?;
    to_absolute(href, url, None)
}

fn parse_field(element: ElementRef<'_>) -> Option<Field> {
    let value = element.value();
    let name = value.attr("name").map(str::to_string);

    let field = match value.name() {
        "input" => Field {
            tag: FieldTag::Input,
            field_type: value.attr("type").map(|t| t.to_ascii_lowercase()),
            name,
            value: value.attr("value").map(str::to_string),
            options: Vec::new(),
        },
        "select" => {
            let options = select_options(element);
            let selected = select_value(element).or_else(|| options.first().cloned());

            Field {
                tag: FieldTag::Select,
                field_type: None,
                name,
                value: selected,
                options,
            }
        }
        "textarea" => Field {
            tag: FieldTag::Textarea,
            field_type: None,
            name,
            value: Some(element.text().collect()),
            options: Vec::new(),
        },
        _ => return None,
    };

    Some(field)
}

fn option_value(option: ElementRef<'_>) -> String {
    option
        .value()
        .attr("value")
        .map(str::to_string)
        .unwrap_or_else(|| option.text().collect::<String>().trim().to_string())
}

fn select_options(select: ElementRef<'_>) -> Vec<String> {
    let Ok(selector) = Selector::parse("option") else {
        return Vec::new();
    };
    select.select(&selector).map(option_value).collect()
}

fn select_value(select: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("option[selected]").ok()?;
    select.select(&selector).next().map(option_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "http://localhost/?query_var_input=query_var_val";

    fn document(body: &str) -> Document {
        Document::new(&Response::new(PAGE, 200).with_html(body))
    }

    #[test]
    fn test_is_text_content() {
        assert!(is_text_content(Some("text/html")));
        assert!(is_text_content(Some("text/html; charset=utf-8")));
        assert!(is_text_content(Some("TEXT/PLAIN")));
        assert!(is_text_content(Some("application/xhtml+xml")));
        assert!(is_text_content(Some("image/svg+xml")));

        assert!(!is_text_content(None));
        assert!(!is_text_content(Some("")));
        assert!(!is_text_content(Some("image/png")));
        assert!(!is_text_content(Some("application/octet-stream")));
    }

    #[test]
    fn test_non_text_short_circuits() {
        let response = Response::new(PAGE, 200)
            .with_content_type("application/octet-stream")
            .with_body(vec![0x00, 0xff, 0xfe, b'<', b'a']);
        let doc = Document::new(&response);

        assert!(!doc.is_text());
        assert!(doc.anchors().is_empty());
        assert!(doc.forms().is_empty());
        assert!(doc.meta_cookies().is_empty());
        assert!(doc.paths().is_empty());
        assert!(doc.base().is_none());
    }

    #[test]
    fn test_missing_content_type_is_not_text() {
        let response = Response::new(PAGE, 200).with_body(b"<a href='/x'>x</a>".to_vec());
        assert!(!Document::new(&response).is_text());
    }

    #[test]
    fn test_invalid_effective_url() {
        let response = Response::new("not a url", 200).with_html("<a href='/x'>x</a>");
        let doc = Document::new(&response);

        assert!(doc.is_text());
        assert!(doc.url().is_none());
        assert!(doc.anchors().is_empty());
        assert!(doc.paths().is_empty());
    }

    #[test]
    fn test_anchors_resolved() {
        let doc = document(
            r#"<a href="/link?link_input=link_val">1</a>
               <a href="relative">2</a>
               <a href="javascript:void(0)">3</a>
               <a>no href</a>"#,
        );

        let anchors: Vec<String> = doc.anchors().iter().map(Url::to_string).collect();
        assert_eq!(
            anchors,
            vec![
                "http://localhost/link?link_input=link_val",
                "http://localhost/relative"
            ]
        );
    }

    #[test]
    fn test_base_changes_resolution() {
        let doc = document(
            r#"<html><head><base href="/this_is_the_base/"></head>
               <body><a href="link_with_base?link_input=link_val">x</a></body></html>"#,
        );

        assert_eq!(
            doc.base().map(Url::as_str),
            Some("http://localhost/this_is_the_base/")
        );
        assert_eq!(
            doc.to_absolute("relative/path").unwrap().as_str(),
            "http://localhost/this_is_the_base/relative/path"
        );
        assert_eq!(
            doc.anchors()[0].as_str(),
            "http://localhost/this_is_the_base/link_with_base?link_input=link_val"
        );
    }

    #[test]
    fn test_first_base_wins() {
        let doc = document(r#"<base href="http://localhost/one/"><base href="http://localhost/two/">"#);
        assert_eq!(doc.base().map(Url::as_str), Some("http://localhost/one/"));
    }

    #[test]
    fn test_form_fields() {
        let doc = document(
            r#"<form method="POST" action="/form" name="my_form">
                <input type="text" name="form_input_1" value="form_val_1">
                <input type="text" name="form_input_2" value="form_val_2">
                <input type="submit">
            </form>"#,
        );

        let forms = doc.forms();
        assert_eq!(forms.len(), 1);

        let form = &forms[0];
        assert_eq!(form.action.as_str(), "http://localhost/form");
        assert_eq!(form.method, "post");
        assert_eq!(form.attrs["name"], "my_form");
        assert_eq!(form.attrs["action"], "http://localhost/form");
        assert_eq!(form.fields.len(), 3);
        assert_eq!(form.fields[2].field_type.as_deref(), Some("submit"));
        assert_eq!(form.fields[2].name, None);
    }

    #[test]
    fn test_form_defaults() {
        let doc = document(r#"<form><input name="q"></form>"#);
        let form = &doc.forms()[0];

        assert_eq!(form.method, "get");
        assert_eq!(form.action.as_str(), PAGE);
    }

    #[test]
    fn test_form_with_javascript_action_dropped() {
        let doc = document(r#"<form action="javascript:go()"><input name="q"></form>"#);
        assert!(doc.forms().is_empty());
    }

    #[test]
    fn test_select_and_textarea() {
        let doc = document(
            r#"<form action="/f">
                <select name="color">
                    <option value="red">Red</option>
                    <option value="blue" selected>Blue</option>
                </select>
                <select name="size"><option>Small</option><option>Large</option></select>
                <textarea name="comment">hello</textarea>
            </form>"#,
        );

        let form = &doc.forms()[0];
        let raw = FormRaw::from(form);

        assert!(raw.input.is_empty());
        assert_eq!(raw.select.len(), 2);
        assert_eq!(raw.select[0].value.as_deref(), Some("blue"));
        assert_eq!(raw.select[0].options, vec!["red", "blue"]);
        assert_eq!(raw.select[1].value.as_deref(), Some("Small"));
        assert_eq!(raw.textarea.len(), 1);
        assert_eq!(raw.textarea[0].value.as_deref(), Some("hello"));
    }

    #[test]
    fn test_meta_cookies() {
        let doc = document(
            r#"<head>
                <meta http-equiv="Set-Cookie" content="http_equiv_cookie_name=http_equiv_cookie_val">
                <meta http-equiv="refresh" content="5">
                <meta name="description" content="x">
            </head>"#,
        );

        assert_eq!(
            doc.meta_cookies(),
            vec!["http_equiv_cookie_name=http_equiv_cookie_val"]
        );
    }

    #[test]
    fn test_paths() {
        let doc = document(
            r#"<a href="/link?link_input=link_val">1</a>
               <a href="/link?link_input=link_val#again">dup</a>
               <a href="http://elsewhere.com/">off-site</a>
               <form action="/form"></form>
               <form action="/form_2"></form>
               <script src="/app.js"></script>
               <iframe src="/frame"></iframe>"#,
        );

        let paths: Vec<String> = doc.paths().iter().map(Url::to_string).collect();
        assert_eq!(
            paths,
            vec![
                "http://localhost/link?link_input=link_val",
                "http://localhost/form",
                "http://localhost/form_2",
                "http://localhost/frame",
                "http://localhost/app.js",
            ]
        );
    }

    #[test]
    fn test_paths_include_base() {
        let doc = document(
            r#"<base href="/this_is_the_base/"><a href="link_with_base?link_input=link_val">x</a>"#,
        );

        let paths: Vec<String> = doc.paths().iter().map(Url::to_string).collect();
        assert_eq!(
            paths,
            vec![
                "http://localhost/this_is_the_base/",
                "http://localhost/this_is_the_base/link_with_base?link_input=link_val",
            ]
        );
    }

    #[test]
    fn test_unparseable_references_dropped() {
        let doc = document(
            r#"<a href="http://[bad/x">bad host</a>
               <a href="http://exa mple.com/">space in host</a>
               <a href="/ok?b=2">ok</a>"#,
        );

        let anchors: Vec<String> = doc.anchors().iter().map(Url::to_string).collect();
        assert_eq!(anchors, vec!["http://localhost/ok?b=2"]);

        let paths: Vec<String> = doc.paths().iter().map(Url::to_string).collect();
        assert_eq!(paths, vec!["http://localhost/ok?b=2"]);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let doc = document(
            r#"<html><body><div><a href="/ok">ok<form action="/f"><input name="a" value="1"
               <p>unclosed <a href="/also-ok">x</a>"#,
        );

        let anchors: Vec<String> = doc.anchors().iter().map(Url::to_string).collect();
        assert!(anchors.contains(&"http://localhost/ok".to_string()));
        assert!(!doc.forms().is_empty());
    }
}
