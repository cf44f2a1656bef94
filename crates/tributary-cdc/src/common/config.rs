//! Deserializer configuration
//!
//! Fixed at construction and never mutated afterwards.
//!
//! ```yaml
//! changelog_mode: upsert
//! server_time_zone: Asia/Shanghai
//! include_schema_changes: true
//! ```

use crate::common::{CdcError, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Which row images an update emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangelogMode {
    /// Updates carry before and after images
    #[default]
    All,
    /// Updates carry only the after image
    Upsert,
}

/// Envelope deserializer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeserializerConfig {
    /// Changelog mode
    #[serde(default)]
    pub changelog_mode: ChangelogMode,
    /// IANA name of the database server time zone
    #[serde(default = "default_server_time_zone")]
    pub server_time_zone: String,
    /// Whether schema-change records are turned into events
    #[serde(default = "default_true")]
    pub include_schema_changes: bool,
}

fn default_server_time_zone() -> String {
    "UTC".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DeserializerConfig {
    fn default() -> Self {
        Self {
            changelog_mode: ChangelogMode::default(),
            server_time_zone: default_server_time_zone(),
            include_schema_changes: true,
        }
    }
}

impl DeserializerConfig {
    /// Create a new builder.
    pub fn builder() -> DeserializerConfigBuilder {
        DeserializerConfigBuilder::default()
    }

    /// Load and validate a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the server time zone.
    pub fn time_zone(&self) -> Result<Tz> {
        self.server_time_zone.parse::<Tz>().map_err(|_| {
            CdcError::config(format!(
                "unknown server time zone '{}'",
                self.server_time_zone
            ))
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.time_zone().map(|_| ())
    }
}

/// Builder for DeserializerConfig.
#[derive(Debug, Default)]
pub struct DeserializerConfigBuilder {
    config: DeserializerConfig,
}

impl DeserializerConfigBuilder {
    /// Set changelog mode.
    pub fn changelog_mode(mut self, mode: ChangelogMode) -> Self {
        self.config.changelog_mode = mode;
        self
    }

    /// Set server time zone (IANA name).
    pub fn server_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.config.server_time_zone = tz.into();
        self
    }

    /// Turn schema-change records into events.
    pub fn include_schema_changes(mut self, include: bool) -> Self {
        self.config.include_schema_changes = include;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<DeserializerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeserializerConfig::default();
        assert_eq!(config.changelog_mode, ChangelogMode::All);
        assert_eq!(config.server_time_zone, "UTC");
        assert!(config.include_schema_changes);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_builder() {
        let config = DeserializerConfig::builder()
            .changelog_mode(ChangelogMode::Upsert)
            .server_time_zone("Europe/Berlin")
            .include_schema_changes(false)
            .build()
            .unwrap();

        assert_eq!(config.changelog_mode, ChangelogMode::Upsert);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::Europe::Berlin);
        assert!(!config.include_schema_changes);
    }

    #[test]
    fn test_builder_rejects_unknown_zone() {
        let err = DeserializerConfig::builder()
            .server_time_zone("Mars/Olympus")
            .build()
            .unwrap_err();
        assert!(matches!(err, CdcError::Config(_)));
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
changelog_mode: upsert
server_time_zone: Asia/Shanghai
include_schema_changes: false
"#;
        let config = DeserializerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.changelog_mode, ChangelogMode::Upsert);
        assert_eq!(config.server_time_zone, "Asia/Shanghai");
        assert!(!config.include_schema_changes);
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = DeserializerConfig::from_yaml("changelog_mode: all").unwrap();
        assert_eq!(config, DeserializerConfig::default());
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(matches!(
            DeserializerConfig::from_yaml("changelog_mode: sometimes"),
            Err(CdcError::Yaml(_))
        ));
        assert!(matches!(
            DeserializerConfig::from_yaml("server_time_zone: Nowhere"),
            Err(CdcError::Config(_))
        ));
    }
}
