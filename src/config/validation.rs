use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 || config.parallelism > 100 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and 100, got {}",
            config.parallelism
        )));
    }

    if config.retry_delay_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "retry_delay_ms must be >= 1ms, got {}ms",
            config.retry_delay_ms
        )));
    }

    // random_delay_ms = 0 simply disables the jitter; max_attempts = 0 means unlimited

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Header values must be visible ASCII
    if !config.value.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        return Err(ConfigError::Validation(format!(
            "user agent must contain only printable ASCII characters, got '{}'",
            config.value
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
