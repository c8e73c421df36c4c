//! Configuration schema (ddlaudit.toml)

use serde::{Deserialize, Serialize};
use crate::diagnostic::Category;

/// Which rule categories run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckToggles {
    #[serde(default = "enabled")]
    pub primary_keys: bool,

    #[serde(default = "enabled")]
    pub data_types: bool,

    #[serde(default = "enabled")]
    pub fk_indexes: bool,

    #[serde(default = "enabled")]
    pub naming: bool,
}

fn enabled() -> bool {
    true
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self {
            primary_keys: true,
            data_types: true,
            fk_indexes: true,
            naming: true,
        }
    }
}

impl CheckToggles {
    /// Check whether a category should run
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::PrimaryKey => self.primary_keys,
            Category::DataType => self.data_types,
            Category::FkIndex => self.fk_indexes,
            Category::Naming => self.naming,
        }
    }
}

/// Allowlist rules for specific tables or patterns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Tables whose foreign keys are never reported as unindexed (glob patterns)
    #[serde(default)]
    pub skip_fk_tables: Vec<String>,
}

impl AllowlistRules {
    /// Check if a table matches any pattern in the list
    fn matches_pattern(table: &str, patterns: &[String]) -> bool {
        let table = table.replace('"', "");
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, &table)
            } else {
                *pattern == table
            }
        })
    }

    /// Check if the FK-index check should ignore a table
    pub fn is_fk_table_skipped(&self, table: &str) -> bool {
        Self::matches_pattern(table, &self.skip_fk_tables)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Rule categories to run
    #[serde(default)]
    pub checks: CheckToggles,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Simple glob matching (single `*` wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_everything() {
        let config = Config::default();
        for category in Category::ALL {
            assert!(config.checks.is_enabled(category));
        }
        assert!(config.allowlist.skip_fk_tables.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [checks]
            naming = false
            "#,
        )
        .unwrap();

        assert!(!config.checks.is_enabled(Category::Naming));
        assert!(config.checks.is_enabled(Category::FkIndex));
        assert!(config.checks.is_enabled(Category::PrimaryKey));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml("[checks]\nnaming = \"nope\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn allowlist_pattern_matching() {
        let rules = AllowlistRules {
            skip_fk_tables: vec!["audit.*".to_string(), "events".to_string()],
        };

        assert!(rules.is_fk_table_skipped("audit.log"));
        assert!(rules.is_fk_table_skipped("\"audit\".\"log\""));
        assert!(rules.is_fk_table_skipped("events"));
        assert!(!rules.is_fk_table_skipped("public.events"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.checks.data_types = false;
        let toml = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("staging.*", "staging.users"));
        assert!(glob_match("*_log", "audit_log"));
        assert!(!glob_match("staging.*", "prod.users"));
        assert!(!glob_match("ab*ba", "aba"));
    }
}
