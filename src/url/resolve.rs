use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes that never point at a crawlable resource
const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a reference against a base URL
///
/// Implements standard relative-reference resolution: scheme, host, path and
/// query are inherited from `base` according to the shape of `reference`.
/// Absolute references are returned as-is (after parsing).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscope::url::resolve;
///
/// let base = Url::parse("http://example.com/dir/page").unwrap();
/// assert_eq!(resolve(&base, "other").unwrap().as_str(), "http://example.com/dir/other");
/// assert_eq!(resolve(&base, "/root").unwrap().as_str(), "http://example.com/root");
/// assert_eq!(resolve(&base, "?q=1").unwrap().as_str(), "http://example.com/dir/page?q=1");
/// ```
pub fn resolve(base: &Url, reference: &str) -> UrlResult<Url> {
    base.join(reference.trim())
        .map_err(|e| UrlError::Parse(format!("'{}' against '{}': {}", reference, base, e)))
}

/// Parses a string that must already be an absolute http(s) URL
pub fn parse_absolute(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Converts a reference found on a page into an absolute URL
///
/// When the page declares a `<base href>`, that base (not the page URL) is
/// the resolution base. The fragment is dropped so that `/a#top` and `/a`
/// are the same resource.
///
/// Returns None if the reference should be dropped:
/// - empty or fragment-only references
/// - javascript:, mailto:, tel: and data: schemes
/// - references that fail to resolve
/// - anything that does not end up as http(s)
pub fn to_absolute(reference: &str, page_url: &Url, base: Option<&Url>) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let lowered = reference.to_ascii_lowercase();
    if IGNORED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let mut absolute = resolve(base.unwrap_or(page_url), reference).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.host_str()?;

    absolute.set_fragment(None);
    Some(absolute)
}
