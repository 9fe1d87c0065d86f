//! Crawl scope decisions
//!
//! Decides whether a URL discovered on a page may be followed. Checks run in
//! a fixed priority order and the first failing one decides:
//! 1. Depth limit
//! 2. Domain membership
//! 3. Exclude patterns
//! 4. Include patterns (only when any are configured)
//!
//! Depth, domain and exclude are absolute: no include pattern can bring a
//! URL back into scope once one of them rejects it.

use crate::config::ParserConfig;
use crate::url::{depth, domain, extract_host, parse_absolute};
use crate::UrlResult;
use std::fmt;
use tracing::trace;
use url::Url;

/// Outcome of a scope check, naming the rule that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeDecision {
    /// The URL may be followed
    Follow,
    /// Path depth exceeds the depth limit
    TooDeep,
    /// Host is outside the current domain (or the URL does not parse)
    OutOfDomain,
    /// An exclude pattern matched
    Excluded,
    /// Include patterns are configured and none matched
    NotIncluded,
}

impl ScopeDecision {
    /// Returns true if the crawler may follow the URL
    pub fn is_follow(&self) -> bool {
        matches!(self, Self::Follow)
    }

    /// Returns true if the crawler must skip the URL
    pub fn is_skip(&self) -> bool {
        !self.is_follow()
    }
}

impl fmt::Display for ScopeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Follow => "follow",
            Self::TooDeep => "too deep",
            Self::OutOfDomain => "out of domain",
            Self::Excluded => "excluded",
            Self::NotIncluded => "not included",
        };
        f.write_str(reason)
    }
}

/// Scope rules bound to the page the candidates were found on
///
/// # Example
///
/// ```
/// use url::Url;
/// use webscope::config::ParserConfig;
/// use webscope::scope::{Scope, ScopeDecision};
///
/// let config = ParserConfig::default().with_exclude("logout").unwrap();
/// let current = Url::parse("http://bar.com/").unwrap();
/// let scope = Scope::new(&config, &current);
///
/// assert_eq!(scope.decide("http://bar.com/account"), ScopeDecision::Follow);
/// assert_eq!(scope.decide("http://bar.com/logout"), ScopeDecision::Excluded);
/// assert_eq!(scope.decide("http://google.com/"), ScopeDecision::OutOfDomain);
/// ```
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    config: &'a ParserConfig,
    current_host: Option<String>,
    current_domain: Option<String>,
}

impl<'a> Scope<'a> {
    pub fn new(config: &'a ParserConfig, current_url: &Url) -> Self {
        Self {
            config,
            current_host: extract_host(current_url),
            current_domain: domain(current_url),
        }
    }

    /// Builds a scope from the current page's URL string
    pub fn for_url(config: &'a ParserConfig, current_url: &str) -> UrlResult<Self> {
        let url = parse_absolute(current_url)?;
        Ok(Self::new(config, &url))
    }

    /// Returns true if the URL's path is deeper than the depth limit
    ///
    /// A limit of 0 disables the check. Unparseable URLs are never too deep.
    pub fn too_deep(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(url) => self.too_deep_url(&url),
            Err(_) => false,
        }
    }

    /// Returns true if the URL belongs to the current domain
    ///
    /// Without `follow_subdomains` the host must match the current host
    /// exactly; with it, any host sharing the current domain matches.
    pub fn in_domain(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(url) => self.in_domain_url(&url),
            Err(_) => false,
        }
    }

    /// Returns true if any exclude pattern matches the URL string
    pub fn excluded(&self, url: &str) -> bool {
        self.config.exclude.iter().any(|re| re.is_match(url))
    }

    /// Returns true if any include pattern matches the URL string
    ///
    /// With no include patterns this is false; [`Scope::decide`] only
    /// consults it when patterns exist.
    pub fn included(&self, url: &str) -> bool {
        self.config.include.iter().any(|re| re.is_match(url))
    }

    /// Runs every check in priority order and reports the first that fails
    pub fn decide(&self, url: &str) -> ScopeDecision {
        let decision = match Url::parse(url) {
            Ok(parsed) => self.decide_url(url, &parsed),
            Err(_) => ScopeDecision::OutOfDomain,
        };

        trace!("Scope decision for {}: {}", url, decision);
        decision
    }

    /// Returns true if the crawler must not follow the URL
    pub fn skip(&self, url: &str) -> bool {
        self.decide(url).is_skip()
    }

    fn decide_url(&self, raw: &str, url: &Url) -> ScopeDecision {
        if self.too_deep_url(url) {
            return ScopeDecision::TooDeep;
        }

        if !self.in_domain_url(url) {
            return ScopeDecision::OutOfDomain;
        }

        if self.excluded(raw) {
            return ScopeDecision::Excluded;
        }

        if !self.config.include.is_empty() && !self.included(raw) {
            return ScopeDecision::NotIncluded;
        }

        ScopeDecision::Follow
    }

    fn too_deep_url(&self, url: &Url) -> bool {
        self.config.depth_limit > 0 && depth(url) > self.config.depth_limit
    }

    fn in_domain_url(&self, url: &Url) -> bool {
        let Some(current_domain) = &self.current_domain else {
            return false;
        };

        if domain(url).as_ref() != Some(current_domain) {
            return false;
        }

        if self.config.follow_subdomains {
            return true;
        }

        extract_host(url) == self.current_host
    }
}
