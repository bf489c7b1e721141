//! Text and JSON rendering of a tile batch

use frustum_tiles_lib::TileBatch;
use std::fmt::Write;

/// One line per tile: `level/x/y classification [min_x, min_y, max_x, max_y]`
pub fn render_text(batch: &TileBatch, with_stats: bool) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "tiles: {}", batch.tiles.len());
    for visible in &batch.tiles {
        let (min, max) = (visible.bounds.min(), visible.bounds.max());
        let _ = writeln!(
            out,
            "{} {} [{}, {}, {}, {}]",
            visible.tile, visible.classification, min.x, min.y, max.x, max.y
        );
    }
    if with_stats {
        let stats = &batch.stats;
        let _ = writeln!(
            out,
            "candidates: {} inside: {} overlap: {} culled: {}",
            stats.candidates, stats.inside, stats.overlap, stats.culled
        );
    }
    out
}

pub fn render_json(batch: &TileBatch) -> serde_json::Result<String> {
    serde_json::to_string_pretty(batch)
}
