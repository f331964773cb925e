//! Configuration module

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use honeypot_analyzer_core::AnalyzerConfig;

/// Default upload cap (10 MiB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Emit logs as JSON lines
    pub log_json: bool,

    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,

    /// Model hyperparameters (operator overrides only)
    pub analyzer: AnalyzerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            log_json: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults; set-but-invalid analyzer
    /// overrides are an error so a typo never silently changes the model.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let mut analyzer = defaults.analyzer.clone();

        if let Some(v) = parse_var("ANALYZER_CLUSTERS")? { analyzer.clusters = v; }
        if let Some(v) = parse_var("ANALYZER_CONTAMINATION")? { analyzer.contamination = v; }
        if let Some(v) = parse_var("ANALYZER_SEED")? { analyzer.seed = v; }
        if let Some(v) = parse_var("ANALYZER_TREES")? { analyzer.trees = v; }
        if let Some(v) = parse_var("ANALYZER_PREVIEW_ROWS")? { analyzer.preview_rows = v; }
        if let Some(v) = parse_var("ANALYZER_USE_CLUSTER_FEATURE")? { analyzer.anomaly_uses_cluster = v; }

        analyzer
            .validate()
            .context("Invalid ANALYZER_* configuration")?;

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),

            analyzer,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Parse an optional environment variable, failing on malformed values
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_unset_is_none() {
        let value: Option<usize> = parse_var("HONEYPOT_TEST_SURELY_UNSET_VAR").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("HONEYPOT_TEST_BAD_CLUSTERS", "three");
        let result: Result<Option<usize>> = parse_var("HONEYPOT_TEST_BAD_CLUSTERS");
        assert!(result.is_err());
        env::remove_var("HONEYPOT_TEST_BAD_CLUSTERS");
    }

    #[test]
    fn test_parse_var_reads_bool() {
        env::set_var("HONEYPOT_TEST_FLAG", "false");
        let value: Option<bool> = parse_var("HONEYPOT_TEST_FLAG").unwrap();
        assert_eq!(value, Some(false));
        env::remove_var("HONEYPOT_TEST_FLAG");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.is_production());
        assert_eq!(config.analyzer, AnalyzerConfig::default());
    }
}
