//! Frustum Tiles Library - Footprint Geometry and Tile Culling
//!
//! This library decides which cells of a quadtree tile grid a perspective camera can see. The
//! camera's view frustum is projected onto the ground as a quadrilateral footprint; the library
//! selects the candidate tiles under the footprint's bounding box at the requested detail level
//! and culls those that lie outside the footprint polygon.
//!
//! # Architecture
//!
//! - **[`PolyLine`]**: Vertex sequence with cached per-segment bounds and angles
//! - **[`lines_intersect`]**: Segment intersection (none / collinear / point)
//! - **[`polygon_contains_bounds`]**: Outside / inside / overlap classification of a box
//! - **[`TileEnumerator`]**: Candidate generation and culling for one footprint
//! - **[`FrustumTiler`]**: Last-write-wins session handing tile batches to a renderer
//!
//! # Performance Characteristics
//!
//! - **Classification**: O(E×F) per tile (E, F = edge counts, 4 for tiles and footprints)
//! - **Enumeration**: O(C) classifications where C = candidate tiles in the footprint's bounds,
//!   parallel over tiles above a configurable threshold

mod config;
mod containment;
mod geometry;
mod intersect;
mod level;
mod tiler;
mod tiling;
pub mod utils;

// Public API exports
pub use config::TilingConfig;
pub use containment::{
    Classification, PointLocation, bounds_contains_bounds, bounds_contains_point,
    bounds_contains_polyline, locate_point, polygon_contains_bounds, polygon_contains_point,
    polygon_contains_polyline,
};
pub use geometry::{PolyLine, Segment, Vertices, bounds_of, bounds_union};
pub use intersect::{Intersection, crosses_properly, lines_intersect};
pub use level::level_for_elevation;
pub use tiler::{FrustumTiler, TileBatch};
pub use tiling::{
    EnumerationStats, Footprint, Tile, TileEnumerator, TileGrid, VisibleTile,
    corners_in_model_square, normalize_corners,
};

/// Error types for the tiling library
#[derive(Debug, thiserror::Error)]
pub enum TilingError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Level {level} out of range (max levels: {max_levels})")]
    LevelOutOfRange { level: u32, max_levels: u32 },

    #[error("Elevation {elevation} outside [{min}, {max}]")]
    ElevationOutOfRange { elevation: f64, min: f64, max: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TilingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(TilingConfig) -> Result<TileEnumerator> = TileEnumerator::new;
        let _: fn(TilingConfig) -> Result<FrustumTiler> = FrustumTiler::new;
        let _: fn() -> TilingConfig = TilingConfig::default;
        let _: fn(f64, &TilingConfig) -> Result<u32> = level_for_elevation;
    }

    #[test]
    fn test_error_messages() {
        let err = TilingError::LevelOutOfRange {
            level: 25,
            max_levels: 20,
        };
        assert_eq!(err.to_string(), "Level 25 out of range (max levels: 20)");

        let err = TilingError::InvalidGeometry("need at least 2 vertices".to_string());
        assert!(err.to_string().starts_with("Invalid geometry"));
    }
}
