use crate::config::types::{CacheConfig, Config, RedisConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_redis_config(&config.redis)?;
    validate_storage_config(&config.storage)?;
    if let Some(cache) = &config.cache {
        validate_cache_config(cache)?;
    }
    Ok(())
}

/// Validates store connection configuration
fn validate_redis_config(config: &RedisConfig) -> Result<(), ConfigError> {
    if let Some(raw) = &config.url {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid redis url: {}", e)))?;

        if !matches!(url.scheme(), "redis" | "rediss") {
            return Err(ConfigError::InvalidUrl(format!(
                "redis url must use the redis or rediss scheme, got '{}'",
                url.scheme()
            )));
        }
        return Ok(());
    }

    validate_address(&config.address)?;

    if config.db < 0 {
        return Err(ConfigError::Validation(format!(
            "db must be >= 0, got {}",
            config.db
        )));
    }

    Ok(())
}

/// Validates crawl state storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    validate_prefix("storage.prefix", &config.prefix)
}

/// Validates response cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    validate_prefix("cache.prefix", &config.prefix)?;

    if config.expiration_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "cache.expiration-secs must be >= 1, got {}",
            config.expiration_secs
        )));
    }

    Ok(())
}

/// Validates a `host:port` address
fn validate_address(address: &str) -> Result<(), ConfigError> {
    let Some((host, port)) = address.rsplit_once(':') else {
        return Err(ConfigError::Validation(format!(
            "address must be host:port, got '{}'",
            address
        )));
    };

    if host.is_empty() {
        return Err(ConfigError::Validation(format!(
            "address is missing a host: '{}'",
            address
        )));
    }

    if port.parse::<u16>().is_err() {
        return Err(ConfigError::Validation(format!(
            "address has an invalid port: '{}'",
            address
        )));
    }

    Ok(())
}

/// Validates a namespace prefix
fn validate_prefix(field: &str, prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    Ok(())
}
