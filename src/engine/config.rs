use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::segmenter::OverflowPolicy;
use crate::error::{Result, SearchError};
use crate::query::builder::DEFAULT_FIELD;

/// Default minimum score a hit needs to be returned.
pub const DEFAULT_MIN_SCORE: f32 = 0.5;

/// Default maximum number of hits requested from the search client.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Configuration for the [`Engine`](crate::Engine).
///
/// Every key is optional when deserializing:
///
/// ```
/// use searchable::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "index": "tweets", "min_score": 0.2 }"#).unwrap();
/// assert_eq!(config.index, "tweets");
/// assert_eq!(config.max_results, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the index holding every document type.
    pub index: String,
    /// Field every query clause matches against.
    pub default_field: String,
    /// Maximum number of hits requested per search.
    pub max_results: usize,
    /// Hits scoring below this are dropped.
    pub min_score: f32,
    /// What to do with CJK runs longer than a phrase.
    pub overflow_policy: OverflowPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index: "default".to_string(),
            default_field: DEFAULT_FIELD.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            min_score: DEFAULT_MIN_SCORE,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(SearchError::invalid_config("index must not be empty"));
        }
        if self.default_field.trim().is_empty() {
            return Err(SearchError::invalid_config(
                "default_field must not be empty",
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::invalid_config(
                "max_results must be greater than zero",
            ));
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(SearchError::invalid_config(format!(
                "min_score must be a non-negative number, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.config.index = index.into();
        self
    }

    pub fn default_field(mut self, field: impl Into<String>) -> Self {
        self.config.default_field = field.into();
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    pub fn min_score(mut self, min_score: f32) -> Self {
        self.config.min_score = min_score;
        self
    }

    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow_policy = policy;
        self
    }

    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.index, "default");
        assert_eq!(config.default_field, "_all");
        assert_eq!(config.max_results, 100);
        assert_eq!(config.min_score, 0.5);
        assert_eq!(config.overflow_policy, OverflowPolicy::Truncate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validates() {
        let config = EngineConfig::builder()
            .index("testidx")
            .max_results(10)
            .min_score(0.1)
            .overflow_policy(OverflowPolicy::Chunk)
            .build()
            .unwrap();
        assert_eq!(config.index, "testidx");
        assert_eq!(config.overflow_policy, OverflowPolicy::Chunk);

        let err = EngineConfig::builder().max_results(0).build().unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));

        let err = EngineConfig::builder()
            .min_score(f32::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_str() {
        let config =
            EngineConfig::from_json_str(r#"{ "overflow_policy": "chunk", "max_results": 5 }"#)
                .unwrap();
        assert_eq!(config.overflow_policy, OverflowPolicy::Chunk);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.index, "default");

        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "index": "" }"#),
            Err(SearchError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(SearchError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "index": "tweets", "min_score": 0.0 }}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.index, "tweets");
        assert_eq!(config.min_score, 0.0);

        assert!(matches!(
            EngineConfig::from_file(file.path().with_extension("missing")),
            Err(SearchError::Io(_))
        ));
    }
}
