//! minits_options: checker configuration.
//!
//! Options are read from a JSON config of the form
//! `{ "checkerOptions": { ... } }`. Every field is optional; absent fields
//! take their defaults.

use minits_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Accepted range for `maxRelationDepth`.
pub const MIN_RELATION_DEPTH: u32 = 1;
pub const MAX_RELATION_DEPTH: u32 = 1024;

/// Options controlling the checking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CheckerOptions {
    /// When off, `null` and `undefined` are assignable to every type.
    pub strict_null_checks: bool,
    /// Report parameters that have neither a type nor a contextual type.
    pub no_implicit_any: bool,
    /// Report unknown properties in fresh object literals.
    pub excess_property_checks: bool,
    /// Nesting limit for the assignability relation.
    pub max_relation_depth: u32,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            strict_null_checks: true,
            no_implicit_any: false,
            excess_property_checks: true,
            max_relation_depth: 64,
        }
    }
}

impl CheckerOptions {
    /// Check value ranges. Deserialization only checks types.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_RELATION_DEPTH..=MAX_RELATION_DEPTH).contains(&self.max_relation_depth) {
            return Err(Error::OptionOutOfRange {
                name: "maxRelationDepth",
                value: u64::from(self.max_relation_depth),
                min: u64::from(MIN_RELATION_DEPTH),
                max: u64::from(MAX_RELATION_DEPTH),
            });
        }
        Ok(())
    }

    /// Strict everything, including `noImplicitAny`.
    pub fn strict() -> Self {
        Self {
            no_implicit_any: true,
            ..Self::default()
        }
    }
}

/// The config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerConfig {
    pub checker_options: Option<CheckerOptions>,
}

impl CheckerConfig {
    /// The configured options, or the defaults when the section is absent.
    pub fn options(&self) -> CheckerOptions {
        self.checker_options.clone().unwrap_or_default()
    }
}

/// Parse and validate a config file from a string.
pub fn parse_config(content: &str) -> Result<CheckerConfig> {
    let config: CheckerConfig =
        serde_json::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    if let Some(options) = &config.checker_options {
        options.validate()?;
    }
    Ok(config)
}

/// Parse and validate a config file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<CheckerConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}

/// Shorthand for `parse_config(content)?.options()`.
pub fn load_options(content: &str) -> Result<CheckerOptions> {
    Ok(parse_config(content)?.options())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CheckerOptions::default();
        assert!(options.strict_null_checks);
        assert!(!options.no_implicit_any);
        assert!(options.excess_property_checks);
        assert_eq!(options.max_relation_depth, 64);
    }

    #[test]
    fn test_parse_partial_options() {
        let options = load_options(r#"{ "checkerOptions": { "noImplicitAny": true } }"#).unwrap();
        assert!(options.no_implicit_any);
        assert!(options.strict_null_checks);
        assert_eq!(options.max_relation_depth, 64);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let options = load_options("{}").unwrap();
        assert_eq!(options, CheckerOptions::default());
    }

    #[test]
    fn test_strict_null_checks_off() {
        let options =
            load_options(r#"{ "checkerOptions": { "strictNullChecks": false } }"#).unwrap();
        assert!(!options.strict_null_checks);
    }

    #[test]
    fn test_depth_out_of_range() {
        let err = load_options(r#"{ "checkerOptions": { "maxRelationDepth": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::OptionOutOfRange {
                name: "maxRelationDepth",
                value: 0,
                ..
            }
        ));

        let err =
            load_options(r#"{ "checkerOptions": { "maxRelationDepth": 5000 } }"#).unwrap_err();
        assert!(err.to_string().contains("between 1 and 1024"));
    }

    #[test]
    fn test_invalid_json() {
        let err = load_options("{ checkerOptions: ").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = load_options(r#"{ "checkerOptions": { "strict": true } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file("/nonexistent/minits.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
