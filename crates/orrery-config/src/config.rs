//! Configuration structs with sensible defaults and RON persistence.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Camera projection and starting pose.
    pub camera: CameraConfig,
    /// Keyboard / mouse flight controls.
    pub controls: ControlsConfig,
    /// Astronomical body presentation and simulated time.
    pub space: SpaceConfig,
    /// Ephemeris batch loading.
    pub ephemeris: EphemerisConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    /// Near clip plane. Overwritten whenever the size scale changes.
    pub near: f64,
    /// Far clip plane.
    pub far: f64,
    /// Starting camera position in AU.
    pub initial_position: [f64; 3],
}

/// Flight controls configuration.
///
/// The effective translation and roll speeds are the base values times
/// `keyboard_speed_multiplier`; only the multiplier is meant to be user facing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Pitch/yaw radians per pixel of mouse motion.
    pub look_speed: f64,
    /// Forward/backward speed before the multiplier.
    pub base_z_speed: f64,
    /// Left/right/up/down speed before the multiplier.
    pub base_strafe_speed: f64,
    /// Roll speed before the multiplier.
    pub base_roll_speed: f64,
    /// User-facing keyboard speed multiplier.
    pub keyboard_speed_multiplier: f64,
}

/// Body presentation and simulated time configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpaceConfig {
    /// Julian days advanced per frame. 0 freezes simulated time.
    pub bodies_speed: u32,
    /// Spin bodies about their axes.
    pub rotate_bodies: bool,
    /// Show text labels near bodies.
    pub show_labels: bool,
    /// Show trailing orbit lines.
    pub show_orbits: bool,
    /// Visual size multiplier applied to every body.
    pub bodies_size_scale: SizeScale,
    /// Orbit line half-length in ephemeris days (the line has `2n + 1` vertices).
    pub orbit_line_segments: u32,
}

/// Ephemeris configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Directory holding `<julian>.json` batch files.
    pub data_dir: PathBuf,
    /// First Julian day of the dataset. Batch files start at
    /// `epoch_julian + k * batch_limit`.
    pub epoch_julian: i64,
    /// Julian day the simulated clock starts at.
    pub start_julian: i64,
    /// Number of days in each batch file.
    pub batch_limit: i64,
    /// Preload the next batch when this many days remain in the current one.
    pub preload_offset: i64,
    /// Load batches on a background worker thread.
    pub background_loading: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config.
    pub log_to_file: bool,
}

/// Visual size multiplier for bodies.
///
/// `Factor` keeps relative sizes; `Large` blows every body up to a size that
/// depends only on its kind, ignoring physical radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum SizeScale {
    /// Multiply every physical radius by this factor.
    Factor(f64),
    /// Fixed per-kind apparent size.
    Large,
}

impl SizeScale {
    /// Camera near plane for this scale. Bigger bodies tolerate a farther
    /// near plane, which reduces z-fighting.
    pub fn near_plane(&self) -> f64 {
        match self {
            SizeScale::Factor(factor) => 0.00001 * factor,
            SizeScale::Large => 0.01,
        }
    }
}

impl Default for SizeScale {
    fn default() -> Self {
        SizeScale::Factor(1.0)
    }
}

impl fmt::Display for SizeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeScale::Factor(factor) => write!(f, "{factor}x"),
            SizeScale::Large => write!(f, "large"),
        }
    }
}

impl FromStr for SizeScale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("large") {
            return Ok(SizeScale::Large);
        }
        let number = trimmed.strip_suffix('x').unwrap_or(trimmed);
        match number.parse::<f64>() {
            Ok(factor) if factor.is_finite() && factor > 0.0 => Ok(SizeScale::Factor(factor)),
            _ => Err(ConfigError::InvalidSizeScale(s.to_string())),
        }
    }
}

impl ControlsConfig {
    /// Effective forward/backward speed.
    pub fn z_speed(&self) -> f64 {
        self.base_z_speed * self.keyboard_speed_multiplier
    }

    /// Effective strafe speed.
    pub fn strafe_speed(&self) -> f64 {
        self.base_strafe_speed * self.keyboard_speed_multiplier
    }

    /// Effective roll speed.
    pub fn roll_speed(&self) -> f64 {
        self.base_roll_speed * self.keyboard_speed_multiplier
    }
}

// --- Default implementations ---

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.001,
            far: 150_000.0,
            initial_position: [0.0, 0.0, -5.0],
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            look_speed: 0.001,
            base_z_speed: 1.0,
            base_strafe_speed: 0.5,
            base_roll_speed: 0.05,
            keyboard_speed_multiplier: 1.0,
        }
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            bodies_speed: 0,
            rotate_bodies: true,
            show_labels: true,
            show_orbits: true,
            bodies_size_scale: SizeScale::default(),
            orbit_line_segments: 365,
        }
    }
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/de405"),
            epoch_julian: 2_451_545,
            start_julian: 2_456_658,
            batch_limit: 4000,
            preload_offset: 1000,
            background_loading: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
