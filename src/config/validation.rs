use crate::config::types::{CheckpointConfig, Config, CrawlerConfig, MAX_DELAY_SECS};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_start_url(&config.crawler.start_url)?;
    validate_crawler_config(&config.crawler)?;
    validate_checkpoint_config(&config.checkpoint)?;

    if config.output.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL: absolute, http(s), with a host
pub fn validate_start_url(start_url: &str) -> Result<Url, ConfigError> {
    if start_url.trim().is_empty() {
        return Err(ConfigError::InvalidUrl(
            "a start URL is required".to_string(),
        ));
    }

    let url = Url::parse(start_url.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use http or https",
            start_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' has no host",
            start_url
        )));
    }

    Ok(url)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !(0.0..=MAX_DELAY_SECS).contains(&config.delay) {
        return Err(ConfigError::Validation(format!(
            "delay must be between 0 and {} seconds, got {}",
            MAX_DELAY_SECS, config.delay
        )));
    }

    if !(0.0..=MAX_DELAY_SECS).contains(&config.jitter) {
        return Err(ConfigError::Validation(format!(
            "jitter must be between 0 and {} seconds, got {}",
            MAX_DELAY_SECS, config.jitter
        )));
    }

    if config.page_timeout == 0 || config.asset_timeout == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be at least one second".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_checkpoint_config(config: &CheckpointConfig) -> Result<(), ConfigError> {
    if config.save_every < 1 {
        return Err(ConfigError::Validation(format!(
            "save_every must be >= 1, got {}",
            config.save_every
        )));
    }

    Ok(())
}
