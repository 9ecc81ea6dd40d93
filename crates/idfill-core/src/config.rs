use anyhow::{Context, Result};
use jsonschema::{validator_for, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BATCH_SIZE: usize = 5000;
pub const DEFAULT_IDENTIFIER_LENGTH: usize = 12;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct StoreConfig {
    /// Path of the SQLite record store. Defaults to `<state_dir>/records.sqlite`.
    #[serde(default)]
    pub path: Option<String>,
    /// SQLite busy timeout in milliseconds.
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

/// Which column layout the import file follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// `name, identifier, gender`
    #[default]
    Base,
    /// `name, identifier, gender, birth_year`; also fills the date-of-birth field.
    Extended,
}

impl Variant {
    pub fn required_columns(&self) -> usize {
        match self {
            Variant::Base => 3,
            Variant::Extended => 4,
        }
    }

    pub fn birth_year_column(&self) -> Option<usize> {
        match self {
            Variant::Base => None,
            Variant::Extended => Some(3),
        }
    }

    pub fn fills_date_of_birth(&self) -> bool {
        matches!(self, Variant::Extended)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ImportConfig {
    /// Rows committed per store transaction (default 5000).
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub variant: Variant,
}

impl ImportConfig {
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct FillConfig {
    /// Length of a complete identifier after whitespace removal (default 12).
    #[serde(default)]
    pub identifier_length: Option<usize>,
    /// Delay before the deferred fill phase, in milliseconds (default 100).
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,
}

impl FillConfig {
    pub fn identifier_length(&self) -> usize {
        self.identifier_length
            .filter(|n| *n >= 4)
            .unwrap_or(DEFAULT_IDENTIFIER_LENGTH)
    }

    pub fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms.unwrap_or(DEFAULT_SETTLE_DELAY_MS)
    }
}

/// Optional overrides for the field classifier keyword lists.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct KeywordConfig {
    #[serde(default)]
    pub identifier: Option<Vec<String>>,
    #[serde(default)]
    pub name: Option<Vec<String>>,
    #[serde(default)]
    pub gender_option: Option<Vec<String>>,
    #[serde(default)]
    pub dob_placeholder: Option<Vec<String>>,
    #[serde(default)]
    pub dob_label: Option<Vec<String>>,
    #[serde(default)]
    pub sub_district: Option<Vec<String>>,
    #[serde(default)]
    pub block: Option<Vec<String>>,
    #[serde(default)]
    pub consent: Option<Vec<String>>,
}

/// Initial values for the two fill defaults when no preferences file exists yet.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub sub_district: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
}

static CONFIG_SCHEMA: Lazy<Option<Validator>> = Lazy::new(|| {
    let schema_value = serde_json::to_value(schemars::schema_for!(Config)).ok()?;
    validator_for(&schema_value).ok()
});

/// Returns the JSON schema describing the configuration structure.
pub fn config_schema_json() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
}

pub fn write_schema_file(path: &Path) -> std::io::Result<()> {
    let schema_json = config_schema_json();
    std::fs::write(path, serde_json::to_string_pretty(&schema_json)?)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)?;
    let json_value = serde_json::to_value(&raw)?;
    if let Some(validator) = CONFIG_SCHEMA.as_ref() {
        let validation_errors: Vec<_> = validator
            .iter_errors(&json_value)
            .map(|e| e.to_string())
            .collect();
        if !validation_errors.is_empty() {
            return Err(anyhow::anyhow!(validation_errors.join(", ")));
        }
    }
    let cfg: Config = toml::from_str(content)?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.import.batch_size(), 5000);
        assert_eq!(cfg.import.variant, Variant::Base);
        assert_eq!(cfg.fill.identifier_length(), 12);
        assert_eq!(cfg.fill.settle_delay_ms(), 100);
        assert!(cfg.store.path.is_none());
    }

    #[test]
    fn extended_variant_parses() {
        let cfg = parse_config(
            r#"
            [import]
            variant = "extended"
            batch_size = 250

            [fill]
            settle_delay_ms = 40

            [keywords]
            identifier = ["aadhaar", "uid"]

            [defaults]
            block = "Mohanpur"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.import.variant, Variant::Extended);
        assert_eq!(cfg.import.variant.required_columns(), 4);
        assert_eq!(cfg.import.variant.birth_year_column(), Some(3));
        assert_eq!(cfg.import.batch_size(), 250);
        assert_eq!(cfg.fill.settle_delay_ms(), 40);
        assert_eq!(
            cfg.keywords.identifier.as_deref(),
            Some(&["aadhaar".to_string(), "uid".to_string()][..])
        );
        assert_eq!(cfg.defaults.block.as_deref(), Some("Mohanpur"));
    }

    #[test]
    fn schema_rejects_wrong_types() {
        let err = parse_config(
            r#"
            [import]
            batch_size = "lots"
            "#,
        )
        .unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(parse_config("[import]\nvariant = \"wide\"\n").is_err());
    }

    #[test]
    fn zero_batch_size_falls_back_to_default() {
        let cfg = parse_config("[import]\nbatch_size = 0\n").unwrap();
        assert_eq!(cfg.import.batch_size(), DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn shipped_default_config_is_valid() {
        let cfg = parse_config(include_str!("../../../configs/default.toml")).unwrap();
        assert_eq!(cfg.import.variant, Variant::Base);
        assert_eq!(cfg.fill.identifier_length(), DEFAULT_IDENTIFIER_LENGTH);
        assert_eq!(
            cfg.keywords.sub_district.as_deref(),
            Some(&["sub-district".to_string(), "sub district".to_string()][..])
        );
    }

    #[test]
    fn schema_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        write_schema_file(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("settle_delay_ms"));
    }
}
