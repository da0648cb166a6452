use crate::error::Error;
use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub logger: LoggerConfig,
    pub formatter: FormatterConfig,
}

impl Config {
    pub fn from_yaml(s: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(s)?)
    }
}

/// Key/value logger settings.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggerConfig {
    /// Keys whose value becomes the event message instead of a field.
    pub message_keys: Vec<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            message_keys: vec!["msg".to_owned(), "message".to_owned()],
        }
    }
}

/// Leveled-entry formatter settings.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FormatterConfig {
    /// Name of the field carrying the entry's level.
    pub level_key: String,
    pub level_mapping: LevelMapping,
    /// Record the `tracing` target of each event under a `target` field.
    pub record_target: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            level_key: "level".to_owned(),
            level_mapping: LevelMapping::default(),
            record_target: false,
        }
    }
}

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LevelMapping {
    /// The entry's level ordinal as-is.
    #[default]
    #[serde(alias = "raw")]
    Verbatim,
    /// OpenTelemetry log severity numbers.
    #[serde(alias = "otel")]
    OpenTelemetry,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn kebab_case_keys() {
        let cfg = Config::from_yaml(
            r#"
logger:
  message-keys: [text]
formatter:
  level-key: severity
  level-mapping: otel
  record-target: true
"#,
        )
        .unwrap();
        assert_eq!(cfg.logger.message_keys, vec!["text".to_owned()]);
        assert_eq!(cfg.formatter.level_key, "severity");
        assert_eq!(cfg.formatter.level_mapping, LevelMapping::OpenTelemetry);
        assert!(cfg.formatter.record_target);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg = Config::from_yaml("formatter:\n  level-mapping: verbatim\n").unwrap();
        assert_eq!(cfg.logger, LoggerConfig::default());
        assert_eq!(cfg.formatter.level_key, "level");
    }

    #[test]
    fn unknown_mapping_is_a_config_error() {
        let err = Config::from_yaml("formatter:\n  level-mapping: bogus\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
