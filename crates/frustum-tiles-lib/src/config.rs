//! Configuration shared by the enumerator, the tiler session and the level-of-detail helper

use crate::{Result, TilingError, utils};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Deepest grid the `u32` tile indices can address
const MAX_SUPPORTED_LEVELS: u32 = 31;

/// Configuration for tile enumeration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TilingConfig {
    /// Number of detail levels; valid footprint levels are `0..max_levels`.
    /// Default: 20
    pub max_levels: u32,
    /// Width of the tiled ground area in the camera's ground units.
    /// Footprints are scaled by `2 / ground_width` into the normalized model square.
    /// Default: 2.0 (ground units are already normalized)
    pub ground_width: f64,
    /// Height of the tiled ground area, see `ground_width`
    pub ground_height: f64,
    /// Lowest accepted camera elevation, where detail is finest. Must be above 0.
    pub elevation_min: f64,
    /// Highest accepted camera elevation; level 0 from half of it upwards
    pub elevation_max: f64,
    /// Shape of the elevation-to-level curve (higher = detail rises later when descending)
    pub level_exponent: f64,
    /// Classify candidate tiles on the rayon thread pool
    pub parallel_culling: bool,
    /// Minimum number of candidates before culling goes parallel
    pub parallel_threshold: usize,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_levels: utils::MAX_LEVELS,
            ground_width: 2.0,
            ground_height: 2.0,
            elevation_min: 0.1,
            elevation_max: 4.8,
            level_exponent: 4.0,
            parallel_culling: true,
            parallel_threshold: 256,
        }
    }
}

impl TilingConfig {
    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.max_levels == 0 || self.max_levels > MAX_SUPPORTED_LEVELS {
            return Err(TilingError::InvalidConfig(format!(
                "max_levels must be in 1..={}, got {}",
                MAX_SUPPORTED_LEVELS, self.max_levels
            )));
        }
        for (name, value) in [
            ("ground_width", self.ground_width),
            ("ground_height", self.ground_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TilingError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !self.elevation_min.is_finite()
            || !self.elevation_max.is_finite()
            || self.elevation_min <= 0.0
            || self.elevation_min >= self.elevation_max
        {
            return Err(TilingError::InvalidConfig(format!(
                "elevation range [{}, {}] must be non-empty and above the ground",
                self.elevation_min, self.elevation_max
            )));
        }
        if !self.level_exponent.is_finite() || self.level_exponent <= 0.0 {
            return Err(TilingError::InvalidConfig(format!(
                "level_exponent must be positive, got {}",
                self.level_exponent
            )));
        }
        Ok(())
    }
}
