use indexmap::IndexMap;
use serde::Deserialize;

/// Scan profile as written in the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    /// Cookie-jar seed, sent with requests and synthesized into every page
    #[serde(default)]
    pub cookies: IndexMap<String, String>,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Which element categories get extracted
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "enabled")]
    pub links: bool,

    #[serde(default = "enabled")]
    pub forms: bool,

    #[serde(default = "enabled")]
    pub cookies: bool,

    #[serde(default = "enabled")]
    pub headers: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            links: true,
            forms: true,
            cookies: true,
            headers: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Crawl scope policy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    /// Maximum path depth to follow (0 = unlimited)
    #[serde(rename = "depth-limit", default)]
    pub depth_limit: usize,

    /// Whether hosts sharing the page's domain are in scope
    #[serde(rename = "follow-subdomains", default)]
    pub follow_subdomains: bool,

    /// Regex patterns; a matching URL is never followed
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Regex patterns; when non-empty, only matching URLs are followed
    #[serde(default)]
    pub include: Vec<String>,
}

/// Values the scanner sends with its requests
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Contact address sent in the `From` header
    #[serde(rename = "authed-by", default)]
    pub authed_by: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            authed_by: String::new(),
        }
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("webscope/{}", env!("CARGO_PKG_VERSION"))
}
