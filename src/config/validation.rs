use crate::config::types::{RequestConfig, ScanConfig, ScopeConfig};
use crate::ConfigError;
use indexmap::IndexMap;
use regex::Regex;

/// Validates the entire scan profile
pub fn validate(config: &ScanConfig) -> Result<(), ConfigError> {
    validate_scope_config(&config.scope)?;
    validate_cookies(&config.cookies)?;
    validate_request_config(&config.request)?;
    Ok(())
}

/// Compiles a list of scope patterns, reporting the first one that fails
pub(crate) fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Validates scope configuration
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    compile_patterns(&config.exclude)?;
    compile_patterns(&config.include)?;
    Ok(())
}

/// Validates the cookie-jar seed
fn validate_cookies(cookies: &IndexMap<String, String>) -> Result<(), ConfigError> {
    for (name, value) in cookies {
        validate_cookie_name(name)?;
        validate_cookie_value(name, value)?;
    }

    Ok(())
}

/// Validates a cookie value: no `;` and no line breaks
pub(crate) fn validate_cookie_value(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.contains(';') || has_line_break(value) {
        return Err(ConfigError::Validation(format!(
            "Cookie '{}' has a value containing ';' or a line break",
            name
        )));
    }

    Ok(())
}

/// Validates a cookie name: a non-empty token
pub(crate) fn validate_cookie_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "Cookie name cannot be empty".to_string(),
        ));
    }

    if name
        .chars()
        .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(ConfigError::Validation(format!(
            "Cookie name '{}' contains invalid characters",
            name
        )));
    }

    Ok(())
}

/// Validates request header values
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if has_line_break(&config.user_agent) {
        return Err(ConfigError::Validation(
            "user-agent cannot contain line breaks".to_string(),
        ));
    }

    if has_line_break(&config.authed_by) {
        return Err(ConfigError::Validation(
            "authed-by cannot contain line breaks".to_string(),
        ));
    }

    Ok(())
}

fn has_line_break(value: &str) -> bool {
    value.contains('\r') || value.contains('\n')
}
