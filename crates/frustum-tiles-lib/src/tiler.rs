//! FrustumTiler - Last-write-wins tiling session between a camera and a renderer
//!
//! The camera pushes a new footprint on every frustum change; the renderer takes the most recent
//! batch when it is ready to draw. A batch the renderer never took is discarded as soon as a
//! newer footprint arrives, so stale tile lists are never merged or queued.

use crate::{
    EnumerationStats, Footprint, Result, TileEnumerator, TilingConfig, VisibleTile,
    level_for_elevation,
};
use geo::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tiles computed for one footprint update
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileBatch {
    /// Update counter the batch was produced by (starts at 1)
    pub generation: u64,
    pub level: u32,
    /// Surviving tiles in row-major order
    pub tiles: Vec<VisibleTile>,
    pub stats: EnumerationStats,
}

/// Session state owned by the camera/view layer
#[derive(Debug, Clone)]
pub struct FrustumTiler {
    enumerator: TileEnumerator,
    generation: u64,
    /// Last footprint accepted by `update`
    footprint: Option<Footprint>,
    /// Batch not yet taken by the renderer
    pending: Option<TileBatch>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FrustumTiler {
    /// Create an empty session, validating the configuration
    pub fn new(config: TilingConfig) -> Result<Self> {
        Ok(Self {
            enumerator: TileEnumerator::new(config)?,
            generation: 0,
            footprint: None,
            pending: None,
        })
    }

    /// Enumerate tiles for a new footprint, superseding any batch not yet taken
    ///
    /// A footprint that fails validation leaves the session unchanged.
    ///
    /// # Returns
    /// The generation of the stored batch
    pub fn update(&mut self, footprint: &Footprint) -> Result<u64> {
        #[cfg(feature = "profiling")]
        profiling::scope!("tiler::update");

        let (tiles, stats) = self.enumerator.enumerate_with_stats(footprint)?;

        if let Some(stale) = self.pending.take() {
            tracing::debug!(
                generation = stale.generation,
                tiles = stale.tiles.len(),
                "Superseded untaken tile batch"
            );
        }

        self.generation += 1;
        self.footprint = Some(*footprint);
        self.pending = Some(TileBatch {
            generation: self.generation,
            level: footprint.level,
            tiles,
            stats,
        });
        Ok(self.generation)
    }

    /// Like [`update`](Self::update), deriving the level from the camera elevation
    pub fn update_from_elevation(
        &mut self,
        corners: [Point<f64>; 4],
        elevation: f64,
    ) -> Result<u64> {
        let level = level_for_elevation(elevation, self.enumerator.config())?;
        self.update(&Footprint::new(corners, level))
    }

    /// Hand the latest batch to the renderer, leaving nothing pending
    pub fn take(&mut self) -> Option<TileBatch> {
        self.pending.take()
    }

    /// Peek at the batch waiting for the renderer
    pub fn latest(&self) -> Option<&TileBatch> {
        self.pending.as_ref()
    }

    /// Number of accepted updates so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Level of the last accepted footprint
    pub fn current_level(&self) -> Option<u32> {
        self.footprint.map(|f| f.level)
    }

    pub fn last_footprint(&self) -> Option<&Footprint> {
        self.footprint.as_ref()
    }

    pub fn config(&self) -> &TilingConfig {
        self.enumerator.config()
    }

    /// Forget the last footprint and any pending batch. The generation counter keeps counting.
    pub fn clear(&mut self) {
        self.footprint = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TilingError;

    fn square(half: f64, level: u32) -> Footprint {
        Footprint::new(
            [
                Point::new(-half, -half),
                Point::new(half, -half),
                Point::new(half, half),
                Point::new(-half, half),
            ],
            level,
        )
    }

    #[test]
    fn test_new_session_is_empty() {
        let tiler = FrustumTiler::new(TilingConfig::default()).unwrap();
        assert_eq!(tiler.generation(), 0);
        assert!(tiler.latest().is_none());
        assert!(tiler.current_level().is_none());
    }

    #[test]
    fn test_update_then_take() {
        let mut tiler = FrustumTiler::new(TilingConfig::default()).unwrap();
        let generation = tiler.update(&square(1.0, 2)).unwrap();
        assert_eq!(generation, 1);
        assert_eq!(tiler.current_level(), Some(2));

        let batch = tiler.take().unwrap();
        assert_eq!(batch.generation, 1);
        assert_eq!(batch.level, 2);
        assert_eq!(batch.tiles.len(), 16);
        assert_eq!(batch.stats.inside, 16);

        // Nothing left after taking
        assert!(tiler.take().is_none());
        assert_eq!(tiler.current_level(), Some(2));
    }

    #[test]
    fn test_last_write_wins() {
        let mut tiler = FrustumTiler::new(TilingConfig::default()).unwrap();
        tiler.update(&square(1.0, 2)).unwrap();
        tiler.update(&square(0.5, 3)).unwrap();

        let batch = tiler.take().unwrap();
        assert_eq!(batch.generation, 2);
        assert_eq!(batch.level, 3);
        assert!(batch.tiles.iter().all(|t| t.tile.level == 3));
        assert!(tiler.take().is_none());
    }

    #[test]
    fn test_failed_update_keeps_state() {
        let mut tiler = FrustumTiler::new(TilingConfig::default()).unwrap();
        tiler.update(&square(1.0, 1)).unwrap();

        let result = tiler.update(&square(1.0, 20));
        assert!(matches!(
            result,
            Err(TilingError::LevelOutOfRange {
                level: 20,
                max_levels: 20
            })
        ));
        assert_eq!(tiler.generation(), 1);
        assert_eq!(tiler.latest().map(|b| b.level), Some(1));
    }

    #[test]
    fn test_update_from_elevation() {
        let mut tiler = FrustumTiler::new(TilingConfig::default()).unwrap();
        let corners = square(1.0, 0).corners;

        tiler.update_from_elevation(corners, 4.8).unwrap();
        assert_eq!(tiler.current_level(), Some(0));
        assert_eq!(tiler.latest().map(|b| b.tiles.len()), Some(1));

        // Keep the finest level's candidate range small
        let close = square(1e-5, 0).corners;
        tiler.update_from_elevation(close, 0.1).unwrap();
        assert_eq!(tiler.current_level(), Some(16));
        assert!(!tiler.latest().unwrap().tiles.is_empty());

        assert!(matches!(
            tiler.update_from_elevation(corners, 10.0),
            Err(TilingError::ElevationOutOfRange { .. })
        ));
        assert_eq!(tiler.generation(), 2);
    }

    #[test]
    fn test_clear() {
        let mut tiler = FrustumTiler::new(TilingConfig::default()).unwrap();
        tiler.update(&square(1.0, 2)).unwrap();
        tiler.clear();
        assert!(tiler.latest().is_none());
        assert!(tiler.last_footprint().is_none());
        assert_eq!(tiler.update(&square(1.0, 2)).unwrap(), 2);
    }
}
