use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::allocation::ReservePolicy;
use crate::mining::MiningLimits;
use crate::scoring::ScoreWeights;

/// Engine-wide configuration: scoring weights, reserve carve-outs, mining
/// thresholds, and logging for the host process. Loaded from an optional
/// TOML file with environment overrides taking precedence.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub scoring: ScoreWeights,
    pub reserves: ReservePolicy,
    pub mining: MiningLimits,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoreWeights::default(),
            reserves: ReservePolicy::default(),
            mining: MiningLimits::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

/// Partial document as it appears on disk; absent keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    scoring: Option<ScoringPatch>,
    reserves: Option<ReservesPatch>,
    mining: Option<MiningPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    volume_lift: Option<f64>,
    roi: Option<f64>,
    sustainability: Option<f64>,
    efficiency: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ReservesPatch {
    contingency_pct: Option<Decimal>,
    opportunity_pct: Option<Decimal>,
    adjustment_pct: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct MiningPatch {
    min_results: Option<usize>,
    min_pattern_frequency: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl EngineConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let maybe_path = resolve_config_path(options.config_path.as_deref());
        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            return Err(ConfigError::MissingConfigFile(
                options.config_path.unwrap_or_else(|| PathBuf::from("tradespend.toml")),
            ));
        }

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(scoring) = patch.scoring {
            if let Some(value) = scoring.volume_lift {
                self.scoring.volume_lift = value;
            }
            if let Some(value) = scoring.roi {
                self.scoring.roi = value;
            }
            if let Some(value) = scoring.sustainability {
                self.scoring.sustainability = value;
            }
            if let Some(value) = scoring.efficiency {
                self.scoring.efficiency = value;
            }
        }
        if let Some(reserves) = patch.reserves {
            if let Some(value) = reserves.contingency_pct {
                self.reserves.contingency_pct = value;
            }
            if let Some(value) = reserves.opportunity_pct {
                self.reserves.opportunity_pct = value;
            }
            if let Some(value) = reserves.adjustment_pct {
                self.reserves.adjustment_pct = value;
            }
        }
        if let Some(mining) = patch.mining {
            if let Some(value) = mining.min_results {
                self.mining.min_results = value;
            }
            if let Some(value) = mining.min_pattern_frequency {
                self.mining.min_pattern_frequency = value;
            }
        }
        if let Some(logging) = patch.logging {
            if let Some(value) = logging.level {
                self.logging.level = value;
            }
            if let Some(value) = logging.format {
                self.logging.format = value;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = env::var("TRADESPEND_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Ok(value) = env::var("TRADESPEND_LOG_FORMAT") {
            self.logging.format = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "TRADESPEND_LOG_FORMAT".to_string(),
                value,
            })?;
        }
        if let Ok(value) = env::var("TRADESPEND_MINING_MIN_RESULTS") {
            self.mining.min_results =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "TRADESPEND_MINING_MIN_RESULTS".to_string(),
                    value,
                })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let weight_sum = self.scoring.volume_lift
            + self.scoring.roi
            + self.scoring.sustainability
            + self.scoring.efficiency;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Validation(format!(
                "scoring weights must sum to 1.0, got {weight_sum}"
            )));
        }
        for (name, value) in [
            ("reserves.contingency_pct", self.reserves.contingency_pct),
            ("reserves.opportunity_pct", self.reserves.opportunity_pct),
            ("reserves.adjustment_pct", self.reserves.adjustment_pct),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if self.mining.min_results == 0 || self.mining.min_pattern_frequency == 0 {
            return Err(ConfigError::Validation(
                "mining thresholds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Ok(path) = env::var("TRADESPEND_CONFIG") {
        let path = PathBuf::from(path);
        return path.exists().then_some(path);
    }
    let default = PathBuf::from("tradespend.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}
