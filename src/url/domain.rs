use url::{Host, Url};

/// Extracts the host from a URL
///
/// The host is lower-cased. URLs without a host (which shouldn't happen for
/// valid HTTP(S) URLs) return None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscope::url::extract_host;
///
/// let url = Url::parse("https://Sub.Example.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the domain used for domain-membership comparison
///
/// The leading subdomain labels are stripped so that only the last two
/// labels remain (`test.bar.com` becomes `bar.com`). Single-label hosts such
/// as `localhost` and IP addresses are returned unchanged.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscope::url::domain;
///
/// let url = Url::parse("http://test.bar.com/x").unwrap();
/// assert_eq!(domain(&url), Some("bar.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(domain(&url), Some("localhost".to_string()));
/// ```
pub fn domain(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(host) => {
            let host = host.to_lowercase();
            let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

            if labels.len() <= 2 {
                Some(labels.join("."))
            } else {
                Some(labels[labels.len() - 2..].join("."))
            }
        }
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}
