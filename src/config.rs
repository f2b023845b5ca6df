//! Configuration loading for the analyzer.

use serde::Deserialize;
use std::path::Path;

use crate::analyzer::LoyaltyCriteria;

/// Loyalty thresholds read from a TOML file.
///
/// ```toml
/// min-days = 2
/// min-distinct-pages = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Distinct days a user must appear on
    pub min_days: usize,
    /// Distinct pages a user must visit across all days (1 disables the check)
    pub min_distinct_pages: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_days: LoyaltyCriteria::DEFAULT_MIN_DAYS,
            min_distinct_pages: LoyaltyCriteria::DEFAULT_MIN_DISTINCT_PAGES,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config file
    ///
    /// # Returns
    /// * `Ok(AnalyzerConfig)` if the file was successfully loaded and parsed
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.min_days == 0 {
            return Err("min-days must be at least 1".to_string());
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, min_days: Option<usize>, min_distinct_pages: Option<usize>) -> Result<Self, String> {
        if let Some(days) = min_days {
            self.min_days = days;
        }
        if let Some(pages) = min_distinct_pages {
            self.min_distinct_pages = pages;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn criteria(&self) -> LoyaltyCriteria {
        LoyaltyCriteria {
            min_days: self.min_days,
            min_distinct_pages: self.min_distinct_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalyzerConfig::parse("").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.criteria(), LoyaltyCriteria::default());
    }

    #[test]
    fn test_partial_config() {
        let config = AnalyzerConfig::parse("min-distinct-pages = 1\n").unwrap();
        assert_eq!(config.min_days, 2);
        assert_eq!(config.min_distinct_pages, 1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = AnalyzerConfig::parse("min_pages = 3\n").unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_zero_days_rejected() {
        assert!(AnalyzerConfig::parse("min-days = 0\n").is_err());
        assert!(AnalyzerConfig::default().with_overrides(Some(0), None).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AnalyzerConfig::parse("min-days = 3\nmin-distinct-pages = 4\n")
            .unwrap()
            .with_overrides(None, Some(2))
            .unwrap();
        assert_eq!(config.min_days, 3);
        assert_eq!(config.min_distinct_pages, 2);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loyalty.toml");
        std::fs::write(&path, "min-days = 3\n").unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(config.min_days, 3);

        let err = AnalyzerConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }
}
