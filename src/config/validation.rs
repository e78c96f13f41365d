use crate::config::types::{
    ClassifierConfig, Config, CrawlerConfig, OutputConfig, ScopeConfig, SiteConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent page fetches
const MAX_PARALLEL_REQUESTS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_scope_config(&config.scope)?;
    validate_classifier_config(&config.classifier)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site under test
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use the http or https scheme",
            config.base_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must have a host",
            config.base_url
        )));
    }

    if config.seed.trim().is_empty() {
        return Err(ConfigError::Validation("seed cannot be empty".to_string()));
    }

    if config.password.is_some() && config.user.is_none() {
        return Err(ConfigError::Validation(
            "password is set but user is missing".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_parallel_requests < 1 || config.max_parallel_requests > MAX_PARALLEL_REQUESTS {
        return Err(ConfigError::Validation(format!(
            "max-parallel-requests must be between 1 and {}, got {}",
            MAX_PARALLEL_REQUESTS, config.max_parallel_requests
        )));
    }

    if config.max_depth < -1 {
        return Err(ConfigError::Validation(format!(
            "max-depth must be -1 (unbounded) or >= 0, got {}",
            config.max_depth
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be > 0 when set".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates scope exclusions
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    for path in &config.blocked_paths {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "blocked path '{}' must start with '/'",
                path
            )));
        }
    }

    if config.blocked_markers.iter().any(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "blocked markers cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates classifier markers: each must be a single non-empty token
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    let markers = [
        ("login-form-id", &config.login_form_id),
        ("stack-trace-id", &config.stack_trace_id),
        ("error-class", &config.error_class),
        ("message-error-class", &config.message_error_class),
    ];

    for (name, value) in markers {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-empty name without whitespace, got '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(&config.summary_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    if config.stats_prefix_len < 1 {
        return Err(ConfigError::Validation(
            "stats-prefix-len must be >= 1".to_string(),
        ));
    }

    Ok(())
}
