use crate::config::types::{default_user_agent, ScanConfig};
use crate::config::validation::{
    compile_patterns, validate, validate_cookie_name, validate_cookie_value,
};
use crate::ConfigError;
use indexmap::IndexMap;
use regex::Regex;

/// Read-only settings consumed by the parser and the scope engine
///
/// Built once per scan (from a [`ScanConfig`] or programmatically) and then
/// shared across crawl workers. Patterns are compiled up front so that page
/// parsing and scope evaluation never fail on configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub audit_links: bool,
    pub audit_forms: bool,
    pub audit_cookies: bool,
    pub audit_headers: bool,

    /// Cookie-jar snapshot (name -> value)
    pub cookies: IndexMap<String, String>,

    /// Maximum path depth (0 = unlimited)
    pub depth_limit: usize,
    pub follow_subdomains: bool,
    pub exclude: Vec<Regex>,
    pub include: Vec<Regex>,

    pub user_agent: String,
    pub authed_by: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            audit_links: true,
            audit_forms: true,
            audit_cookies: true,
            audit_headers: true,
            cookies: IndexMap::new(),
            depth_limit: 0,
            follow_subdomains: false,
            exclude: Vec::new(),
            include: Vec::new(),
            user_agent: default_user_agent(),
            authed_by: String::new(),
        }
    }
}

impl ParserConfig {
    /// Validates a scan profile and compiles it
    pub fn from_scan_config(scan: &ScanConfig) -> Result<Self, ConfigError> {
        validate(scan)?;

        Ok(Self {
            audit_links: scan.audit.links,
            audit_forms: scan.audit.forms,
            audit_cookies: scan.audit.cookies,
            audit_headers: scan.audit.headers,
            cookies: scan.cookies.clone(),
            depth_limit: scan.scope.depth_limit,
            follow_subdomains: scan.scope.follow_subdomains,
            exclude: compile_patterns(&scan.scope.exclude)?,
            include: compile_patterns(&scan.scope.include)?,
            user_agent: scan.request.user_agent.clone(),
            authed_by: scan.request.authed_by.clone(),
        })
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_follow_subdomains(mut self, follow: bool) -> Self {
        self.follow_subdomains = follow;
        self
    }

    /// Appends an exclude pattern
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.exclude.extend(compile_patterns(&[pattern.to_string()])?);
        Ok(self)
    }

    /// Appends an include pattern
    pub fn with_include(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.include.extend(compile_patterns(&[pattern.to_string()])?);
        Ok(self)
    }

    /// Adds (or replaces) a cookie-jar entry
    pub fn with_cookie(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        validate_cookie_name(name)?;
        validate_cookie_value(name, value)?;
        self.cookies.insert(name.to_string(), value.to_string());
        Ok(self)
    }

    /// Disables every audit category, for callers that only need scope checks
    pub fn without_audits(mut self) -> Self {
        self.audit_links = false;
        self.audit_forms = false;
        self.audit_cookies = false;
        self.audit_headers = false;
        self
    }
}
