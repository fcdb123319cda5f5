use crate::config::types::{Config, CrawlerConfig, LinkEntry, SeedEntry};
use crate::stack::MAX_DEPTH_LIMIT;
use crate::url::CrawlUrl;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_seeds(&config.seeds)?;
    validate_links(&config.links)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth as usize > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates seed entries
fn validate_seeds(seeds: &[SeedEntry]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        validate_url("seed", &seed.url)?;
    }

    Ok(())
}

/// Validates link map entries
fn validate_links(links: &[LinkEntry]) -> Result<(), ConfigError> {
    for entry in links {
        validate_url("link source", &entry.from)?;
        for target in &entry.to {
            validate_url("link target", target)?;
        }
    }
    Ok(())
}

fn validate_url(kind: &str, url: &str) -> Result<(), ConfigError> {
    CrawlUrl::parse(url)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} URL '{}': {}", kind, url, e)))
}
