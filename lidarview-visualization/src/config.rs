//! Navigation tuning loaded from JSON

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use lidarview_core::{Error, Result};

/// Which camera model a viewer navigates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraModelKind {
    #[default]
    Orbit,
    FreeFlight,
}

/// Orbit model tuning. Angles are degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Degrees per tick for arrow keys
    pub rotation_speed: f64,
    /// Units per tick for Z/X/A/D/W/S
    pub translation_speed: f64,
    pub wheel_scale: f64,
    pub fov: f64,
    /// Above this |elevation| primary drags pan in the upright frame
    pub upright_threshold: f64,
    pub initial_distance: f64,
    pub initial_elevation: f64,
    pub initial_azimuth: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.5,
            translation_speed: 0.2,
            wheel_scale: 0.1,
            fov: 60.0,
            upright_threshold: 45.0,
            initial_distance: 40.0,
            initial_elevation: 30.0,
            initial_azimuth: 45.0,
        }
    }
}

/// Free-flight model tuning. Angles are radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeFlightConfig {
    pub rotation_speed: f64,
    pub translation_speed: f64,
    /// Below this rig height key translation slows down
    pub altitude_threshold: f64,
    /// Speed per unit of height under the threshold
    pub altitude_scale: f64,
    pub drag_rotation_scale: f64,
    pub drag_translation_scale: f64,
    pub wheel_scale: f64,
    pub initial_height: f64,
    /// Downward look angle of the camera inside the rig
    pub initial_tilt: f64,
    pub fov: f64,
}

impl Default for FreeFlightConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.01,
            translation_speed: 1.0,
            altitude_threshold: 20.0,
            altitude_scale: 0.05,
            drag_rotation_scale: 0.005,
            drag_translation_scale: 0.05,
            wheel_scale: 0.03,
            initial_height: 10.0,
            initial_tilt: std::f64::consts::FRAC_PI_4,
            fov: 60.0,
        }
    }
}

/// Complete navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub model: CameraModelKind,
    pub tick_period_ms: u64,
    /// Ticks run per update at most, so a stalled host does not jump the camera
    pub max_ticks_per_update: u32,
    pub orbit: OrbitConfig,
    pub free_flight: FreeFlightConfig,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            model: CameraModelKind::Orbit,
            tick_period_ms: 20,
            max_ticks_per_update: 5,
            orbit: OrbitConfig::default(),
            free_flight: FreeFlightConfig::default(),
        }
    }
}

impl NavigationConfig {
    /// Default configuration for the given camera model
    pub fn for_model(model: CameraModelKind) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded navigation config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be positive".to_string()));
        }
        if self.max_ticks_per_update == 0 {
            return Err(Error::Config("max_ticks_per_update must be positive".to_string()));
        }
        for (name, fov) in [("orbit.fov", self.orbit.fov), ("free_flight.fov", self.free_flight.fov)] {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(Error::Config(format!("{} must be within (0, 180), got {}", name, fov)));
            }
        }
        if self.orbit.initial_distance <= 0.0 {
            return Err(Error::Config(format!(
                "orbit.initial_distance must be positive, got {}",
                self.orbit.initial_distance
            )));
        }
        Ok(())
    }
}
