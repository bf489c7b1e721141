//! Command-line front end: one footprint in, the visible tile list out

mod logging;
mod output;
mod settings;

use frustum_tiles_lib::{
    Footprint, FrustumTiler, TilingError, corners_in_model_square, normalize_corners,
};
use settings::Settings;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Tiling(#[from] TilingError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected 4 footprint corners, got {0}")]
    CornerCount(usize),

    #[error("Either a level or an elevation is required")]
    MissingDetail,
}

fn run(settings: &Settings) -> Result<String, CliError> {
    let config = settings.tiling_config();
    let corners = settings
        .footprint_corners()
        .ok_or(CliError::CornerCount(settings.corners.len()))?;

    let normalized = normalize_corners(corners, config.ground_width, config.ground_height);
    if !corners_in_model_square(&normalized) {
        tracing::warn!("Footprint extends past the ground area; outer tiles are clipped");
    }

    let mut tiler = FrustumTiler::new(config)?;
    match (settings.level, settings.elevation) {
        (Some(level), _) => tiler.update(&Footprint::new(corners, level))?,
        (None, Some(elevation)) => tiler.update_from_elevation(corners, elevation)?,
        (None, None) => return Err(CliError::MissingDetail),
    };
    tracing::info!(level = ?tiler.current_level(), "Footprint tiled");

    let Some(batch) = tiler.take() else {
        return Ok(String::new());
    };
    if settings.json {
        Ok(output::render_json(&batch)?)
    } else {
        Ok(output::render_text(&batch, settings.stats))
    }
}

fn main() -> ExitCode {
    logging::setup_logging();
    let settings = Settings::from_cli();

    match run(&settings) {
        Ok(out) => {
            print!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_elevation() {
        let settings = Settings::try_parse_from(["frustum-tiles", "--elevation", "4.8"]).unwrap();
        let out = run(&settings).unwrap();
        assert!(out.starts_with("tiles: 1\n0/0/0 overlap"));
    }

    #[test]
    fn test_run_rejects_level() {
        let settings = Settings::try_parse_from(["frustum-tiles", "--level", "20"]).unwrap();
        assert!(matches!(
            run(&settings),
            Err(CliError::Tiling(TilingError::LevelOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_run_uses_given_level() {
        let settings = Settings::try_parse_from(["frustum-tiles", "--level", "1"]).unwrap();
        let out = run(&settings).unwrap();
        assert!(out.starts_with("tiles: 4\n1/0/0 inside"));
    }

    #[test]
    fn test_run_without_detail() {
        let mut settings = Settings::try_parse_from(["frustum-tiles", "--level", "1"]).unwrap();
        settings.level = None;
        assert!(matches!(run(&settings), Err(CliError::MissingDetail)));
    }

    #[test]
    fn test_run_rejects_corner_count() {
        let settings =
            Settings::try_parse_from(["frustum-tiles", "-c", "0,0", "-l", "1"]).unwrap();
        assert!(matches!(run(&settings), Err(CliError::CornerCount(1))));
    }
}
