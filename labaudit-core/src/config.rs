use std::path::PathBuf;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AuditError, Result};

pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_OUTPUT_DIR: &str = "~/Documents/TechLabAudit/exports";

/// Raw configuration as read from the optional TOML file and the environment.
///
/// Keys are unprefixed and case-insensitive on the environment side, so
/// `NOTION_TOKEN` in the environment and `notion_token` in the file are the
/// same setting. Environment wins.
#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    #[serde(default)]
    pub notion_token: Option<String>,
    #[serde(default)]
    pub notion_db: Option<String>,
    #[serde(default = "default_base_url")]
    pub notion_base_url: String,
    #[serde(default = "default_timezone")]
    pub lab_timezone: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_first_name")]
    pub prop_first_name: String,
    #[serde(default = "default_last_name")]
    pub prop_last_name: String,
    #[serde(default = "default_console")]
    pub prop_console: String,
    #[serde(default = "default_entry")]
    pub prop_entry: String,
    #[serde(default = "default_exit")]
    pub prop_exit: String,
}

fn default_base_url() -> String {
    DEFAULT_NOTION_BASE_URL.to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_first_name() -> String {
    PropertyNames::default().first_name
}

fn default_last_name() -> String {
    PropertyNames::default().last_name
}

fn default_console() -> String {
    PropertyNames::default().console
}

fn default_entry() -> String {
    PropertyNames::default().entry
}

fn default_exit() -> String {
    PropertyNames::default().exit
}

/// Notion property (column header) names for the attendance database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub first_name: String,
    pub last_name: String,
    pub console: String,
    pub entry: String,
    pub exit: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            first_name: "FIRST NAME".to_string(),
            last_name: "LAST NAME".to_string(),
            console: "CONSOLE #".to_string(),
            entry: "DATE OF ENTRY".to_string(),
            exit: "DATE OF EXIT".to_string(),
        }
    }
}

/// Validated settings for one audit run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub database_id: String,
    pub base_url: String,
    pub timezone: Tz,
    pub output_dir: PathBuf,
    pub properties: PropertyNames,
}

impl AuditConfig {
    /// Load from `path` (missing file allowed) layered under the process environment.
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`AuditConfig::load`], but reads environment keys from `env`
    /// when given instead of the process environment.
    pub fn load_with_env(path: &str, env: Option<config::Map<String, String>>) -> Result<Self> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::default().source(env))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn validate(self) -> Result<Settings> {
        let token = required(self.notion_token, "NOTION_TOKEN")?;
        let database_id = required(self.notion_db, "NOTION_DB")?;

        let zone = self.lab_timezone.trim();
        let timezone: Tz = zone
            .parse()
            .map_err(|_| AuditError::InvalidTimezone(zone.to_string()))?;

        let output_dir = PathBuf::from(shellexpand::tilde(self.output_dir.trim()).into_owned());

        Ok(Settings {
            token,
            database_id,
            base_url: self.notion_base_url.trim_end_matches('/').to_string(),
            timezone,
            output_dir,
            properties: PropertyNames {
                first_name: self.prop_first_name,
                last_name: self.prop_last_name,
                console: self.prop_console,
                entry: self.prop_entry,
                exit: self.prop_exit,
            },
        })
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuditError::MissingSetting(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> AuditConfig {
        AuditConfig::load_with_env("does-not-exist.toml", Some(env(pairs)))
            .expect("config should load")
    }

    #[test]
    fn test_defaults_apply_when_only_secrets_are_set() {
        let settings = load(&[("NOTION_TOKEN", "secret"), ("NOTION_DB", "db123")])
            .validate()
            .unwrap();

        assert_eq!(settings.token, "secret");
        assert_eq!(settings.database_id, "db123");
        assert_eq!(settings.base_url, DEFAULT_NOTION_BASE_URL);
        assert_eq!(settings.timezone, chrono_tz::UTC);
        assert_eq!(settings.properties, PropertyNames::default());
        assert!(settings.output_dir.ends_with("Documents/TechLabAudit/exports"));
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = load(&[("NOTION_DB", "db123")]).validate();
        match result {
            Err(AuditError::MissingSetting(key)) => assert_eq!(key, "NOTION_TOKEN"),
            other => panic!("Expected MissingSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_database_id_is_fatal() {
        let result = load(&[("NOTION_TOKEN", "secret"), ("NOTION_DB", "   ")]).validate();
        assert!(matches!(result, Err(AuditError::MissingSetting("NOTION_DB"))));
    }

    #[test]
    fn test_timezone_and_property_overrides() {
        let settings = load(&[
            ("NOTION_TOKEN", "secret"),
            ("NOTION_DB", "db123"),
            ("LAB_TIMEZONE", "America/New_York"),
            ("PROP_CONSOLE", "STATION"),
            ("NOTION_BASE_URL", "http://127.0.0.1:9999/"),
            ("OUTPUT_DIR", "/tmp/labaudit"),
        ])
        .validate()
        .unwrap();

        assert_eq!(settings.timezone, chrono_tz::America::New_York);
        assert_eq!(settings.properties.console, "STATION");
        assert_eq!(settings.properties.entry, "DATE OF ENTRY");
        assert_eq!(settings.base_url, "http://127.0.0.1:9999");
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/labaudit"));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let result = load(&[
            ("NOTION_TOKEN", "secret"),
            ("NOTION_DB", "db123"),
            ("LAB_TIMEZONE", "Mars/Olympus_Mons"),
        ])
        .validate();
        assert!(matches!(result, Err(AuditError::InvalidTimezone(_))));
    }
}
