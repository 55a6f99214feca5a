//! Configuration loading and schema definitions.
//!
//! Every section and field is optional in the TOML file; missing values fall
//! back to the defaults below.

use crate::error::{ClassifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabimap_exif::RECOMMENDED_READ_LEN;
use tabimap_geo::{PHOTO_GROUP_RADIUS_M, PLACE_MATCH_RADIUS_M, TRIP_MATCH_RADIUS_M};

/// Standard locations searched when no explicit path is given.
pub const CONFIG_CANDIDATES: [&str; 3] = [".tabimap.toml", "tabimap.toml", ".config/tabimap.toml"];

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub classify: ClassifyConfig,

    #[serde(default)]
    pub grouping: GroupingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Radius for matching against all places, in meters
    #[serde(default = "default_place_radius")]
    pub place_radius_m: f64,

    /// Radius for matching against one trip's places, in meters
    #[serde(default = "default_trip_radius")]
    pub trip_radius_m: f64,

    /// Leading bytes of each photo handed to the EXIF parser
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: usize,

    /// Days before a trip's start and after its end still suggested for it
    #[serde(default = "default_trip_window_days")]
    pub trip_window_days: u32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            place_radius_m: default_place_radius(),
            trip_radius_m: default_trip_radius(),
            max_read_bytes: default_max_read_bytes(),
            trip_window_days: default_trip_window_days(),
        }
    }
}

fn default_place_radius() -> f64 {
    PLACE_MATCH_RADIUS_M
}

fn default_trip_radius() -> f64 {
    TRIP_MATCH_RADIUS_M
}

fn default_max_read_bytes() -> usize {
    RECOMMENDED_READ_LEN
}

fn default_trip_window_days() -> u32 {
    7
}

/// Photo map grouping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Photos closer than this share one marker, in meters
    #[serde(default = "default_photo_group_radius")]
    pub photo_group_radius_m: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            photo_group_radius_m: default_photo_group_radius(),
        }
    }
}

fn default_photo_group_radius() -> f64 {
    PHOTO_GROUP_RADIUS_M
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClassifierConfig {
    /// Reject values no search can use.
    pub fn validate(&self) -> Result<()> {
        let radii = [
            ("classify.place_radius_m", self.classify.place_radius_m),
            ("classify.trip_radius_m", self.classify.trip_radius_m),
            ("grouping.photo_group_radius_m", self.grouping.photo_group_radius_m),
        ];
        for (name, value) in radii {
            if !value.is_finite() || value < 0.0 {
                return Err(ClassifyError::config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.classify.max_read_bytes == 0 {
            return Err(ClassifyError::config("classify.max_read_bytes cannot be zero"));
        }

        Ok(())
    }
}

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ClassifierConfig,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path, a standard location, or defaults.
    ///
    /// The loaded schema is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ClassifierConfig::default(),
        };
        schema.validate()?;

        tracing::debug!(path = ?config_path, "configuration loaded");
        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ClassifierConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ClassifyError::config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        ClassifyError::config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}
