//! Tile enumeration for a camera frustum footprint
//!
//! A footprint is the ground-plane quadrilateral seen by the perspective camera, tagged with the
//! detail level it should be drawn at. Enumeration runs in two passes: the footprint's bounding
//! box selects a candidate range of tiles from the `2^level × 2^level` grid, then each candidate
//! is classified against the footprint polygon and dropped when it lies outside.

use crate::containment::{Classification, polygon_contains_bounds};
use crate::geometry::PolyLine;
use crate::{Result, TilingConfig, TilingError, utils};
use geo::{Coord, Point, Rect};
use rayon::prelude::*;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One cell of the grid at a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tile {
    pub level: u32,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    pub fn new(level: u32, x: u32, y: u32) -> Self {
        Self { level, x, y }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}

/// Mapping between the normalized model square `[-1, 1]²` and tile indices at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    level: u32,
    size: u32,
}

impl TileGrid {
    /// Grid for `level`, which must be below `max_levels`
    pub fn new(level: u32, max_levels: u32) -> Result<Self> {
        if level >= max_levels {
            return Err(TilingError::LevelOutOfRange { level, max_levels });
        }
        Ok(Self {
            level,
            size: 1u32 << level,
        })
    }

    #[inline(always)]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Tiles per side (`2^level`)
    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Index of the tile column/row containing model coordinate `value` (unclamped)
    #[inline(always)]
    pub fn model_to_tile(&self, value: f64) -> i64 {
        (self.size as f64 * (1.0 + value) / 2.0).floor() as i64
    }

    /// Model coordinate of the lower edge of tile column/row `index`
    #[inline(always)]
    pub fn tile_to_model(&self, index: i64) -> f64 {
        2.0 * index as f64 / self.size as f64 - 1.0
    }

    /// Model-space box covered by tile `(x, y)`
    pub fn tile_bounds(&self, x: u32, y: u32) -> Rect<f64> {
        let (x, y) = (x as i64, y as i64);
        Rect::new(
            Coord {
                x: self.tile_to_model(x),
                y: self.tile_to_model(y),
            },
            Coord {
                x: self.tile_to_model(x + 1),
                y: self.tile_to_model(y + 1),
            },
        )
    }

    /// Column and row ranges of tiles touched by `bounds`, clamped to the grid
    pub fn candidate_range(&self, bounds: &Rect<f64>) -> (Range<u32>, Range<u32>) {
        let clamp = |index: i64| index.clamp(0, self.size as i64) as u32;
        let xs = clamp(self.model_to_tile(bounds.min().x))
            ..clamp(self.model_to_tile(bounds.max().x) + 1);
        let ys = clamp(self.model_to_tile(bounds.min().y))
            ..clamp(self.model_to_tile(bounds.max().y) + 1);
        (xs, ys)
    }
}

/// Ground projection of the camera frustum with its detail level
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Footprint {
    /// Corners in drawing order (bottom-left, bottom-right, top-right, top-left as projected)
    pub corners: [Point<f64>; 4],
    pub level: u32,
}

impl Footprint {
    pub fn new(corners: [Point<f64>; 4], level: u32) -> Self {
        Self { corners, level }
    }

    /// Closed polygon through the corners
    pub fn polygon(&self) -> Result<PolyLine> {
        PolyLine::new(&self.corners, true)
    }

    /// Footprint with corners scaled from ground units into the normalized model square
    pub fn normalized(&self, ground_width: f64, ground_height: f64) -> Self {
        Self {
            corners: normalize_corners(self.corners, ground_width, ground_height),
            level: self.level,
        }
    }
}

/// A tile that survived culling, ready for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisibleTile {
    pub tile: Tile,
    /// Model-space extent of the tile
    pub bounds: Rect<f64>,
    /// Either `Inside` or `Overlap`
    pub classification: Classification,
}

/// Counters collected during one enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumerationStats {
    /// Tiles inside the footprint's bounding-box range
    pub candidates: usize,
    pub inside: usize,
    pub overlap: usize,
    /// Candidates classified outside and dropped
    pub culled: usize,
}

/// Stateless tile enumerator; every call is an independent computation
#[derive(Debug, Clone)]
pub struct TileEnumerator {
    config: TilingConfig,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TileEnumerator {
    /// Create an enumerator, validating the configuration
    pub fn new(config: TilingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Visible tiles for `footprint`, in row-major tile-index order
    pub fn enumerate(&self, footprint: &Footprint) -> Result<Vec<VisibleTile>> {
        self.enumerate_with_stats(footprint).map(|(tiles, _)| tiles)
    }

    /// Visible tiles together with the counters of the pass
    ///
    /// # Arguments
    /// * `footprint` - Corners in ground units and the requested level
    ///
    /// # Returns
    /// The surviving tiles, or `LevelOutOfRange` / `InvalidGeometry` for malformed input
    pub fn enumerate_with_stats(
        &self,
        footprint: &Footprint,
    ) -> Result<(Vec<VisibleTile>, EnumerationStats)> {
        #[cfg(feature = "profiling")]
        profiling::scope!("tiling::enumerate");

        let grid = TileGrid::new(footprint.level, self.config.max_levels)?;
        let normalized =
            footprint.normalized(self.config.ground_width, self.config.ground_height);
        let polygon = normalized.polygon()?;

        // The single root tile covers everything
        if grid.level() == 0 {
            let tiles = vec![VisibleTile {
                tile: Tile::new(0, 0, 0),
                bounds: grid.tile_bounds(0, 0),
                classification: Classification::Overlap,
            }];
            let stats = EnumerationStats {
                candidates: 1,
                overlap: 1,
                ..Default::default()
            };
            tracing::debug!(level = 0, "Root tile emitted without culling");
            return Ok((tiles, stats));
        }

        let (xs, ys) = grid.candidate_range(&polygon.bounds());
        if xs.is_empty() || ys.is_empty() {
            tracing::warn!(
                level = grid.level(),
                "Footprint lies completely outside the model square"
            );
            return Ok((Vec::new(), EnumerationStats::default()));
        }

        let candidates: Vec<Tile> = ys
            .clone()
            .flat_map(|y| xs.clone().map(move |x| Tile::new(grid.level(), x, y)))
            .collect();

        let classify = |tile: &Tile| {
            let bounds = grid.tile_bounds(tile.x, tile.y);
            VisibleTile {
                tile: *tile,
                bounds,
                classification: polygon_contains_bounds(&polygon, &bounds),
            }
        };

        // Indexed parallel collect keeps candidate order
        let classified: Vec<VisibleTile> = if self.config.parallel_culling
            && candidates.len() >= self.config.parallel_threshold
        {
            candidates.par_iter().map(classify).collect()
        } else {
            candidates.iter().map(classify).collect()
        };

        let mut stats = EnumerationStats {
            candidates: candidates.len(),
            ..Default::default()
        };
        let tiles: Vec<VisibleTile> = classified
            .into_iter()
            .filter(|visible| match visible.classification {
                Classification::Inside => {
                    stats.inside += 1;
                    true
                }
                Classification::Overlap => {
                    stats.overlap += 1;
                    true
                }
                Classification::Outside => {
                    stats.culled += 1;
                    tracing::trace!(tile = %visible.tile, "Culled tile outside footprint");
                    false
                }
            })
            .collect();

        tracing::debug!(
            level = grid.level(),
            x_range = ?xs,
            y_range = ?ys,
            candidates = stats.candidates,
            inside = stats.inside,
            overlap = stats.overlap,
            culled = stats.culled,
            "Enumerated tiles"
        );

        Ok((tiles, stats))
    }
}

/// Scale corners from ground units into the normalized model square
pub fn normalize_corners(
    corners: [Point<f64>; 4],
    ground_width: f64,
    ground_height: f64,
) -> [Point<f64>; 4] {
    let (sx, sy) = (2.0 / ground_width, 2.0 / ground_height);
    corners.map(|c| Point::new(c.x() * sx, c.y() * sy))
}

/// Check whether every normalized corner lies within the model square
pub fn corners_in_model_square(corners: &[Point<f64>]) -> bool {
    corners.iter().all(|c| {
        (utils::MODEL_MIN..=utils::MODEL_MAX).contains(&c.x())
            && (utils::MODEL_MIN..=utils::MODEL_MAX).contains(&c.y())
    })
}
