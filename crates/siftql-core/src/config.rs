//! Compiler configuration.
//!
//! Explicit values passed to the compiler at construction; there is no
//! process-wide default instance.

use serde::{Deserialize, Deserializer, de::Error as _};
use thiserror::Error as ThisError;
use time::{
    Date,
    macros::{date, format_description},
};

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid compiler config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid compiler config: {0}")]
    Invalid(String),
}

///
/// CompilerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Maximum number of selector segments walked, aliases included.
    pub max_path_depth: usize,

    /// Wildcard marker inside textual equality operands.
    pub wildcard: char,

    /// Lower sentinel for widened calendar ranges.
    #[serde(deserialize_with = "deserialize_date")]
    pub range_floor: Date,

    /// Upper sentinel for widened calendar ranges.
    #[serde(deserialize_with = "deserialize_date")]
    pub range_ceiling: Date,

    /// Fail on propagation names that are not root associations.
    pub strict_propagation: bool,
}

impl CompilerConfig {
    pub const DEFAULT_MAX_PATH_DEPTH: usize = 32;
    pub const DEFAULT_WILDCARD: char = '*';
    pub const DEFAULT_RANGE_FLOOR: Date = date!(0005 - 01 - 01);
    pub const DEFAULT_RANGE_CEILING: Date = date!(9999 - 12 - 31);

    /// Parse a TOML document; absent keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_path_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_path_depth must be at least 1".to_string(),
            ));
        }
        if self.range_floor > self.range_ceiling {
            return Err(ConfigError::Invalid(format!(
                "range_floor {} is after range_ceiling {}",
                self.range_floor, self.range_ceiling
            )));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_wildcard(mut self, wildcard: char) -> Self {
        self.wildcard = wildcard;
        self
    }

    #[must_use]
    pub const fn with_strict_propagation(mut self, strict: bool) -> Self {
        self.strict_propagation = strict;
        self
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_path_depth: Self::DEFAULT_MAX_PATH_DEPTH,
            wildcard: Self::DEFAULT_WILDCARD,
            range_floor: Self::DEFAULT_RANGE_FLOOR,
            range_ceiling: Self::DEFAULT_RANGE_CEILING,
            strict_propagation: false,
        }
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Date::parse(&raw, format_description!("[year]-[month]-[day]")).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.range_floor, date!(0005 - 01 - 01));
        assert_eq!(config.range_ceiling, date!(9999 - 12 - 31));
    }

    #[test]
    fn overrides_are_applied() {
        let config = CompilerConfig::from_toml_str(
            r#"
            max_path_depth = 8
            wildcard = "%"
            range_floor = "1900-01-01"
            strict_propagation = true
            "#,
        )
        .unwrap();

        assert_eq!(config.max_path_depth, 8);
        assert_eq!(config.wildcard, '%');
        assert_eq!(config.range_floor, date!(1900 - 01 - 01));
        assert_eq!(config.range_ceiling, CompilerConfig::DEFAULT_RANGE_CEILING);
        assert!(config.strict_propagation);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CompilerConfig::from_toml_str("depth = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = CompilerConfig::from_toml_str(
            r#"
            range_floor = "2000-01-01"
            range_ceiling = "1999-12-31"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = CompilerConfig::from_toml_str("max_path_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
