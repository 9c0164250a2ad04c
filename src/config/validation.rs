use crate::config::types::{
    CacheConfig, Config, CrawlerConfig, FetchStrategy, RenderConfig, RetryConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_render_config(config.crawler.fetch_strategy, config.render.as_ref())?;
    validate_user_agent_config(&config.user_agent)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("catalog_root", &config.catalog_root)?;

    if config.max_concurrent_pages_open < 1 || config.max_concurrent_pages_open > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages_open must be between 1 and 32, got {}",
            config.max_concurrent_pages_open
        )));
    }

    if config.deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "deadline_secs must be greater than 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.base_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "base_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.base_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates the render section against the chosen fetch strategy
fn validate_render_config(
    strategy: FetchStrategy,
    render: Option<&RenderConfig>,
) -> Result<(), ConfigError> {
    let render = match (strategy, render) {
        (FetchStrategy::Rendered, None) => {
            return Err(ConfigError::Validation(
                "fetch_strategy \"rendered\" requires a [render] section".to_string(),
            ));
        }
        (_, None) => return Ok(()),
        (_, Some(render)) => render,
    };

    validate_http_url("render endpoint", &render.endpoint)?;

    if render.settle_min_ms > render.settle_max_ms {
        return Err(ConfigError::Validation(format!(
            "settle_min_ms ({}) must not exceed settle_max_ms ({})",
            render.settle_min_ms, render.settle_max_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "cache path cannot be empty".to_string(),
        ));
    }

    if config.max_age_days == 0 {
        return Err(ConfigError::Validation(
            "max_age_days must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a value parses as an HTTP(S) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    Ok(())
}
