//! TOML-based scenario configuration and weather presets.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Minimum forecast horizon (hours).
pub const MIN_HORIZON_HOURS: u32 = 12;
/// Maximum forecast horizon (hours, one week).
pub const MAX_HORIZON_HOURS: u32 = 168;
/// Allowed range for the average-temperature override (°C).
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-5.0, 45.0);

/// User-chosen scenario parameters for one forecast run.
///
/// All fields have defaults matching the normal-weather scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use a preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Hours to forecast, in `[12, 168]`.
    pub horizon_hours: u32,
    /// Weather scenario: `"normal"`, `"heatwave"`, or `"cold_snap"`.
    pub weather: String,
    /// Direct override of the weather scenario's average temperature (°C).
    pub average_temperature: Option<f64>,
    /// Whether a public holiday / special event boosts demand.
    pub event_active: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            horizon_hours: 48,
            weather: "normal".to_string(),
            average_temperature: None,
            event_active: false,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"scenario.horizon_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the normal-weather scenario (22 °C average).
    pub fn normal() -> Self {
        Self::default()
    }

    /// Returns the heatwave scenario (35 °C average).
    pub fn heatwave() -> Self {
        Self {
            weather: "heatwave".to_string(),
            ..Self::default()
        }
    }

    /// Returns the cold-snap scenario (5 °C average).
    pub fn cold_snap() -> Self {
        Self {
            weather: "cold_snap".to_string(),
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["normal", "heatwave", "cold_snap"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "normal" => Ok(Self::normal()),
            "heatwave" => Ok(Self::heatwave()),
            "cold_snap" => Ok(Self::cold_snap()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// The average temperature the pipeline should use: the direct override
    /// if set, otherwise the weather scenario's default.
    pub fn resolved_temperature(&self) -> f64 {
        if let Some(t) = self.average_temperature {
            return t;
        }
        match self.weather.as_str() {
            "heatwave" => 35.0,
            "cold_snap" => 5.0,
            _ => 22.0,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(MIN_HORIZON_HOURS..=MAX_HORIZON_HOURS).contains(&self.horizon_hours) {
            errors.push(ConfigError {
                field: "scenario.horizon_hours".into(),
                message: format!("must be in [{MIN_HORIZON_HOURS}, {MAX_HORIZON_HOURS}]"),
            });
        }

        if !Self::PRESETS.contains(&self.weather.as_str()) {
            errors.push(ConfigError {
                field: "scenario.weather".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    Self::PRESETS.join(", "),
                    self.weather
                ),
            });
        }

        if let Some(t) = self.average_temperature {
            let (lo, hi) = TEMPERATURE_RANGE_C;
            if !t.is_finite() || !(lo..=hi).contains(&t) {
                errors.push(ConfigError {
                    field: "scenario.average_temperature".into(),
                    message: format!("must be in [{lo}, {hi}]"),
                });
            }
        }

        errors
    }
}
