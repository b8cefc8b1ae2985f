use crate::config::types::Config;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding the User-Agent header
pub const ENV_USER_AGENT: &str = "SCRAPER_USER_AGENT";
/// Environment variable overriding the Accept-Language header
pub const ENV_ACCEPT_LANGUAGE: &str = "SCRAPER_ACCEPT_LANGUAGE";
/// Environment variable overriding the HTTP timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "SCRAPER_TIMEOUT_SECS";
/// Environment variable overriding the delay between requests (seconds)
pub const ENV_DELAY_SECONDS: &str = "SCRAPER_DELAY_SECONDS";
/// Environment variable overriding the corpus budget (bytes)
pub const ENV_MAX_TOTAL_BYTES: &str = "SCRAPER_MAX_TOTAL_BYTES";

/// Loads and parses a configuration file from the given path
///
/// Every section is optional; missing keys keep their defaults. The result
/// is not validated, since environment and command-line layers may still
/// override it; call [`validate`](crate::config::validate) once all layers
/// are applied.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use corpus_scraper::config::load_config;
///
/// let config = load_config(Path::new("scraper.toml")).unwrap();
/// println!("Budget: {} bytes", config.scraper.max_total_bytes);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = read_file(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that runs can be matched to the settings they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = read_file(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies `SCRAPER_*` environment overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Applies `SCRAPER_*` overrides using an arbitrary variable lookup
///
/// Empty values are ignored. Numeric values that fail to parse are errors
/// rather than silently falling back to the previous setting.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(user_agent) = get(ENV_USER_AGENT) {
        config.user_agent.user_agent = user_agent.trim().to_string();
    }

    if let Some(language) = get(ENV_ACCEPT_LANGUAGE) {
        config.user_agent.accept_language = language.trim().to_string();
    }

    if let Some(value) = get(ENV_TIMEOUT_SECS) {
        config.scraper.timeout_seconds = parse_env(ENV_TIMEOUT_SECS, &value)?;
    }

    if let Some(value) = get(ENV_DELAY_SECONDS) {
        config.scraper.delay_seconds = parse_env(ENV_DELAY_SECONDS, &value)?;
    }

    if let Some(value) = get(ENV_MAX_TOTAL_BYTES) {
        config.scraper.max_total_bytes = parse_env(ENV_MAX_TOTAL_BYTES, &value)?;
    }

    Ok(())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}
