//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use pustaka_core::{Config, DatabaseBackend};

/// Run the hard checks from [`Config::validate`] and warn about risky but legal settings.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.database_backend == DatabaseBackend::Memory {
        tracing::warn!("In-memory catalog selected in production - every restart empties the catalog");
    }

    if !is_production && config.cors_origins().iter().any(|o| o == "*") {
        tracing::debug!("CORS allows all origins (development)");
    }

    if config.catalog.max_page_length > 1000 {
        tracing::warn!(
            max_page_length = config.catalog.max_page_length,
            "LIST_MAX_PAGE_LENGTH is very high - large pages load every row into memory"
        );
    }

    tracing::debug!("Configuration validation passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn wildcard_cors_fails_in_production() {
        let config = Config::from_lookup(|key| match key {
            "ENVIRONMENT" => Some("production".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(validate_config(&config).is_err());
    }
}
