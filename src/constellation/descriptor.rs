use serde::{Deserialize, Serialize};

use super::error::DescriptorError;
use crate::czml::{Rgba, DEFAULT_SWATH_COLOR, DEFAULT_TRACK_COLOR};

/// Identity and styling of one tracked satellite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteDescriptor {
    /// Propagator lookup key, also the document and response key
    pub name: String,
    /// Clock multiplier of the resulting document
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_orbit_count")]
    pub orbit_count: u32,
    /// Corridor width in meters
    #[serde(default = "default_swath_width")]
    pub swath_width: f64,
    #[serde(default = "default_swath_color")]
    pub swath_color: Rgba,
    #[serde(default = "default_track_color")]
    pub track_color: Rgba,
    /// Overrides the constellation-wide sample count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_steps: Option<usize>,
}

fn default_speed() -> f64 {
    60.0
}

fn default_orbit_count() -> u32 {
    1
}

fn default_swath_width() -> f64 {
    10_000.0
}

fn default_swath_color() -> Rgba {
    DEFAULT_SWATH_COLOR
}

fn default_track_color() -> Rgba {
    DEFAULT_TRACK_COLOR
}

impl SatelliteDescriptor {
    /// Descriptor with every optional field at its default
    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            speed: default_speed(),
            orbit_count: default_orbit_count(),
            swath_width: default_swath_width(),
            swath_color: default_swath_color(),
            track_color: default_track_color(),
            num_steps: None,
        }
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::MissingName);
        }
        if self.orbit_count < 1 {
            return Err(DescriptorError::OrbitCount(self.name.clone()));
        }
        if self.num_steps == Some(0) {
            return Err(DescriptorError::NumSteps(self.name.clone()));
        }
        if !self.speed.is_finite() {
            return Err(DescriptorError::Speed(self.name.clone()));
        }
        if !self.swath_width.is_finite() || self.swath_width <= 0.0 {
            return Err(DescriptorError::SwathWidth(self.name.clone()));
        }
        Ok(())
    }
}
