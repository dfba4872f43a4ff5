use crate::config::types::{
    CategoryEntry, Config, CrawlerConfig, OutputConfig, PacingMode, RegionEntry, SiteConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent(&config.user_agent.value)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_regions(&config.regions)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.target_count < 1 {
        return Err(ConfigError::Validation(format!(
            "target_count must be >= 1, got {}",
            config.target_count
        )));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint_interval must be >= 1, got {}",
            config.checkpoint_interval
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.pacing == PacingMode::TokenBucket && config.min_delay_ms == 0 {
        return Err(ConfigError::Validation(
            "token-bucket pacing needs min_delay_ms > 0".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_user_agent(value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the site layout templates
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if !config.origin_template.contains("{region}") {
        return Err(ConfigError::Validation(format!(
            "origin_template must contain '{{region}}', got '{}'",
            config.origin_template
        )));
    }

    // Any region code that passes validate_code must yield a usable origin
    let sample = config.origin_template.replace("{region}", "region");
    let url = Url::parse(&sample).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "origin_template '{}' does not form a URL: {}",
            config.origin_template, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "origin_template '{}' must use http or https",
            config.origin_template
        )));
    }

    if !config.listing_path.contains("{category}") {
        return Err(ConfigError::Validation(format!(
            "listing_path must contain '{{category}}', got '{}'",
            config.listing_path
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records_path cannot be empty".to_string(),
        ));
    }

    if config.progress_path.is_empty() {
        return Err(ConfigError::Validation(
            "progress_path cannot be empty".to_string(),
        ));
    }

    if config.records_path == config.progress_path {
        return Err(ConfigError::Validation(format!(
            "progress_path must differ from records_path ('{}')",
            config.records_path
        )));
    }

    Ok(())
}

fn validate_regions(regions: &[RegionEntry]) -> Result<(), ConfigError> {
    if regions.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[region]] is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for region in regions {
        validate_code("region", &region.code)?;
        if !seen.insert(region.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate region code '{}'",
                region.code
            )));
        }
    }
    Ok(())
}

fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[category]] is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in categories {
        validate_code("category", &category.code)?;
        if category.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' must have a label",
                category.code
            )));
        }
        if !seen.insert(category.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category code '{}'",
                category.code
            )));
        }
    }
    Ok(())
}

/// Codes are substituted into hostnames and paths, so keep them to [a-z0-9-]
fn validate_code(kind: &str, code: &str) -> Result<(), ConfigError> {
    if code.is_empty() {
        return Err(ConfigError::Validation(format!("{} code cannot be empty", kind)));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "{} code '{}' must contain only lowercase letters, digits and hyphens",
            kind, code
        )));
    }

    if code.starts_with('-') || code.ends_with('-') {
        return Err(ConfigError::Validation(format!(
            "{} code '{}' cannot start or end with '-'",
            kind, code
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> CrawlerConfig {
        CrawlerConfig {
            target_count: 20,
            checkpoint_interval: 25,
            min_delay_ms: 2000,
            max_delay_ms: 7000,
            request_timeout_secs: 30,
            pacing: PacingMode::RandomDelay,
        }
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("region", "chicago").is_ok());
        assert!(validate_code("region", "new-york2").is_ok());

        assert!(validate_code("region", "").is_err());
        assert!(validate_code("region", "Chicago").is_err());
        assert!(validate_code("region", "-sfbay").is_err());
        assert!(validate_code("region", "sf bay").is_err());
        assert!(validate_code("category", "sof/").is_err());
    }

    #[test]
    fn test_delay_range_must_be_ordered() {
        let mut config = crawler();
        config.min_delay_ms = 8000;
        assert!(validate_crawler_config(&config).is_err());

        config.min_delay_ms = 7000;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_zero_checkpoint_interval_rejected() {
        let mut config = crawler();
        config.checkpoint_interval = 0;
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let categories = vec![
            CategoryEntry {
                code: "eng".to_string(),
                label: "engineering".to_string(),
            },
            CategoryEntry {
                code: "eng".to_string(),
                label: "internet engineering".to_string(),
            },
        ];
        assert!(validate_categories(&categories).is_err());
    }

    #[test]
    fn test_site_templates() {
        let good = SiteConfig {
            origin_template: "https://{region}.craigslist.org".to_string(),
            listing_path: "/search/{category}".to_string(),
        };
        assert!(validate_site_config(&good).is_ok());

        let no_region = SiteConfig {
            origin_template: "https://craigslist.org".to_string(),
            ..good.clone()
        };
        assert!(validate_site_config(&no_region).is_err());

        let bad_scheme = SiteConfig {
            origin_template: "ftp://{region}.craigslist.org".to_string(),
            ..good.clone()
        };
        assert!(matches!(
            validate_site_config(&bad_scheme),
            Err(ConfigError::InvalidUrl(_))
        ));

        let no_category = SiteConfig {
            listing_path: "/search".to_string(),
            ..good
        };
        assert!(validate_site_config(&no_category).is_err());
    }

    #[test]
    fn test_output_paths_must_differ() {
        let same = OutputConfig {
            records_path: "jobs.csv".to_string(),
            progress_path: "jobs.csv".to_string(),
        };
        assert!(validate_output_config(&same).is_err());
    }
}
