//! Numeric helpers and constants shared by the geometry and tiling modules

use std::f64::consts::PI;

/// Tolerance (in normalized model units) under which two coordinates are treated as coincident.
///
/// The deepest supported grid (level 19) has tiles `2 / 2^19 ≈ 3.8e-6` wide, so this stays
/// several orders of magnitude below any tile edge spacing.
pub const EPSILON: f64 = 1e-9;

/// Tolerance for comparing folded segment directions when testing for parallel lines
pub const ANGLE_EPSILON: f64 = 1e-12;

/// Number of detail levels available to the camera (levels `0..MAX_LEVELS`)
pub const MAX_LEVELS: u32 = 20;

/// Lower corner of the normalized model square
pub const MODEL_MIN: f64 = -1.0;

/// Upper corner of the normalized model square
pub const MODEL_MAX: f64 = 1.0;

/// Sign of a value as -1, 0 or 1
#[inline(always)]
pub fn signum(value: f64) -> i32 {
    if value == 0.0 {
        0
    } else if value < 0.0 {
        -1
    } else {
        1
    }
}

/// Check whether two values lie within [`EPSILON`] of each other
#[inline(always)]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// Fold a directed angle from `atan2` into `[0, PI)`.
///
/// Two segments pointing in opposite directions along the same line fold to the same value.
#[inline(always)]
pub fn fold_theta(theta: f64) -> f64 {
    let folded = if theta < 0.0 { theta + PI } else { theta };
    if folded >= PI { folded - PI } else { folded }
}

/// Check whether two directed angles describe parallel lines
#[inline(always)]
pub fn thetas_parallel(a: f64, b: f64) -> bool {
    let diff = (fold_theta(a) - fold_theta(b)).abs();
    diff <= ANGLE_EPSILON || (PI - diff) <= ANGLE_EPSILON
}
