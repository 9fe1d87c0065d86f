use crate::config::types::ScanConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a scan profile from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML scan profile
///
/// # Returns
///
/// * `Ok(ScanConfig)` - Successfully loaded and validated profile
/// * `Err(ConfigError)` - Failed to load, parse, or validate the profile
pub fn load_config(path: &Path) -> Result<ScanConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: ScanConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the scan profile content
///
/// Logged at startup so that scan results can be tied to the exact scope
/// rules that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a scan profile and returns both the profile and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(ScanConfig, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
