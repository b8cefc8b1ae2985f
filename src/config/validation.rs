use crate::config::types::{
    Config, CrawlConfig, OutputConfig, RobotsConfig, ScraperConfig, UserAgentConfig,
    WikipediaConfig,
};
use crate::ConfigError;

/// Upper bound for every configured delay (seconds)
pub const MAX_DELAY_SECONDS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_robots_config(&config.robots)?;
    validate_wikipedia_config(&config.wikipedia)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates budget and politeness settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_total_bytes == 0 {
        return Err(ConfigError::Validation(
            "max_total_bytes must be greater than 0".to_string(),
        ));
    }

    validate_seconds("delay_seconds", config.delay_seconds)?;
    validate_seconds("jitter_seconds", config.jitter_seconds)?;

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout_seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }

    if value > MAX_DELAY_SECONDS {
        return Err(ConfigError::Validation(format!(
            "{} must be at most {} seconds, got {}",
            name, MAX_DELAY_SECONDS, value
        )));
    }

    Ok(())
}

/// Validates robots.txt handling
fn validate_robots_config(config: &RobotsConfig) -> Result<(), ConfigError> {
    validate_seconds("max_crawl_delay_seconds", config.max_crawl_delay_seconds)
}

/// Validates crawl settings
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.enabled && config.max_follow == 0 {
        tracing::warn!("Crawling is enabled but max_follow is 0; no links will be followed");
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values must be visible ASCII
    if !config
        .user_agent
        .chars()
        .all(|c| c.is_ascii_graphic() || c == ' ')
    {
        return Err(ConfigError::Validation(format!(
            "user_agent must contain only printable ASCII characters, got '{}'",
            config.user_agent
        )));
    }

    if !config
        .accept_language
        .chars()
        .all(|c| c.is_ascii_graphic() || c == ' ')
    {
        return Err(ConfigError::Validation(format!(
            "accept_language must contain only printable ASCII characters, got '{}'",
            config.accept_language
        )));
    }

    Ok(())
}

/// Validates the Wikipedia host patterns
fn validate_wikipedia_config(config: &WikipediaConfig) -> Result<(), ConfigError> {
    for pattern in &config.domains {
        validate_domain_pattern(pattern)?;
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.out_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("out_dir cannot be empty".to_string()));
    }

    if config.log_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(domain) => validate_domain_string(domain),
        None => validate_domain_string(pattern),
    }
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    // Single labels such as "localhost" are accepted
    Ok(())
}
