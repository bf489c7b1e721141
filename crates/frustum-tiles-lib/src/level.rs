//! Detail level from camera elevation
//!
//! Closeness is `u = 1 - 2 * elevation / elevation_max`, so the upper half of the elevation
//! range stays at level 0 and `u` rises towards 1 as the camera nears the ground. The level is
//! `floor(max_levels * u^level_exponent)`, which keeps detail coarse through most of the descent
//! and raises it quickly near the ground.

use crate::{Result, TilingConfig, TilingError};

/// Detail level for a camera at `elevation`
///
/// # Arguments
/// * `elevation` - Camera height above the ground plane
/// * `config` - Elevation range, curve exponent and level count
///
/// # Returns
/// A level in `0..config.max_levels`, or `ElevationOutOfRange` when `elevation` is not a finite
/// value inside `[elevation_min, elevation_max]`
pub fn level_for_elevation(elevation: f64, config: &TilingConfig) -> Result<u32> {
    let (min, max) = (config.elevation_min, config.elevation_max);
    if !elevation.is_finite() || elevation < min || elevation > max {
        return Err(TilingError::ElevationOutOfRange {
            elevation,
            min,
            max,
        });
    }

    // Zero across the upper half of the range
    let closeness = (1.0 - 2.0 * elevation / max).max(0.0);
    let level =
        (config.max_levels as f64 * closeness.powf(config.level_exponent)).floor() as u32;

    tracing::trace!(elevation, closeness, level, "Level from elevation");
    // elevation_min > 0 keeps closeness below 1; rounding may still land on max_levels
    Ok(level.min(config.max_levels.saturating_sub(1)))
}
