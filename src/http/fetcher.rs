use crate::parser::Response;
use crate::WebscopeError;
use indexmap::IndexMap;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Builds an HTTP client for fetching pages to parse
///
/// Redirects are followed, so the response URL is the effective URL.
///
/// # Example
///
/// ```no_run
/// use webscope::http::build_http_client;
///
/// let client = build_http_client("webscope/0.1").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats a cookie jar as a `Cookie` request header value
pub fn cookie_header(cookies: &IndexMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Fetches a URL with a GET request and captures it as a [`Response`]
///
/// The cookie jar is sent along. Headers keep their order and repeated
/// headers stay separate. No retries are attempted.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `cookies` - Cookie-jar snapshot to send
pub async fn fetch_response(
    client: &Client,
    url: &str,
    cookies: &IndexMap<String, String>,
) -> Result<Response, WebscopeError> {
    let mut request = client.get(url);
    if let Some(cookie) = cookie_header(cookies) {
        request = request.header(COOKIE, cookie);
    }

    let response = request.send().await.map_err(|source| WebscopeError::Http {
        url: url.to_string(),
        source,
    })?;

    let effective_url = response.url().to_string();
    let code = response.status().as_u16();

    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .await
        .map_err(|source| WebscopeError::Http {
            url: effective_url.clone(),
            source,
        })?
        .to_vec();

    debug!(
        "Fetched {} -> {} ({} bytes, {:?})",
        url,
        code,
        body.len(),
        content_type
    );

    Ok(Response {
        url: effective_url,
        code,
        method: "get".to_string(),
        headers,
        body,
        content_type,
    })
}
