use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use goldflower_core::deal::{DayClock, ShuffleScheme, TimezonePolicy, UnknownScheme};

const DEFAULT_LOG_PATH: &str = "goldflower.log.jsonl";

/// Dealer configuration loaded from YAML. Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealerConfig {
    #[serde(default)]
    pub timezone: TimezonePolicy,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub card_style: CardStyle,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DealerConfig {
    fn default() -> Self {
        Self {
            timezone: TimezonePolicy::default(),
            scheme: default_scheme(),
            card_style: CardStyle::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DealerConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: DealerConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.shuffle_scheme()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn shuffle_scheme(&self) -> Result<ShuffleScheme, ValidationError> {
        self.scheme
            .parse()
            .map_err(|err: UnknownScheme| {
                ValidationError::InvalidField {
                    field: "scheme".to_string(),
                    message: err.to_string(),
                }
            })
    }

    /// Resolve the textual settings into the types the dealer works with.
    pub fn resolved(&self) -> Result<DealSettings, ValidationError> {
        Ok(DealSettings {
            clock: DayClock::new(self.timezone),
            scheme: self.shuffle_scheme()?,
            card_style: self.card_style,
        })
    }
}

fn default_scheme() -> String {
    ShuffleScheme::default().as_str().to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardStyle {
    #[default]
    Symbols,
    Ascii,
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }

        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }

        if self.enable_structured && self.path.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "logging.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

/// Settings resolved from a validated [`DealerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealSettings {
    pub clock: DayClock,
    pub scheme: ShuffleScheme,
    pub card_style: CardStyle,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASIC_YAML: &str = r#"
timezone: "+08:00"
scheme: "chacha20"
card_style: "ascii"
logging:
  enable_structured: true
  tracing_level: "debug"
  path: "logs/goldflower.jsonl"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: DealerConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        let settings = cfg.resolved().expect("resolve");
        assert_eq!(
            settings.clock.policy(),
            TimezonePolicy::fixed_hours(8).unwrap()
        );
        assert_eq!(settings.scheme, ShuffleScheme::ChaCha20);
        assert_eq!(settings.card_style, CardStyle::Ascii);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg: DealerConfig = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("defaults are valid");
        assert_eq!(cfg, DealerConfig::default());

        let settings = cfg.resolved().unwrap();
        assert_eq!(settings.clock.policy(), TimezonePolicy::Utc);
        assert_eq!(settings.scheme, ShuffleScheme::Mt19937);
        assert_eq!(settings.card_style, CardStyle::Symbols);
        assert!(!cfg.logging.enable_structured);
    }

    #[test]
    fn timezone_is_parsed_while_reading() {
        let yaml = BASIC_YAML.replace("+08:00", "local");
        let cfg: DealerConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert_eq!(cfg.timezone, TimezonePolicy::Local);

        let yaml = BASIC_YAML.replace("+08:00", "Atlantis");
        let err = serde_yaml::from_str::<DealerConfig>(&yaml).expect_err("should fail");
        assert!(err.to_string().contains("unrecognized timezone 'Atlantis'"));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let yaml = BASIC_YAML.replace("chacha20", "xorshift");
        let mut cfg: DealerConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "scheme"
        ));
    }

    #[test]
    fn rejects_unknown_tracing_level() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"chatty\"");
        let mut cfg: DealerConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.tracing_level"
        ));
    }

    #[test]
    fn blank_tracing_level_falls_back_to_info() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"  \"");
        let mut cfg: DealerConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }

    #[test]
    fn from_path_reports_file_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.yaml");
        let err = DealerConfig::from_path(&missing).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { ref path, .. } if path == &missing));

        let bad = dir.path().join("bad.yaml");
        let mut file = File::create(&bad).unwrap();
        writeln!(file, "scheme: \"dice\"").unwrap();
        let err = DealerConfig::from_path(&bad).expect_err("invalid scheme");
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let zone = dir.path().join("zone.yaml");
        std::fs::write(&zone, "timezone: \"+25:00\"\n").unwrap();
        let err = DealerConfig::from_path(&zone).expect_err("offset out of range");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("out of range"));

        let garbled = dir.path().join("garbled.yaml");
        std::fs::write(&garbled, "timezone: [unterminated").unwrap();
        let err = DealerConfig::from_path(&garbled).expect_err("bad yaml");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
