use clap::{ArgGroup, Parser};
use frustum_tiles_lib::TilingConfig;
use geo::Point;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
#[clap(group(ArgGroup::new("detail").required(true).args(["level", "elevation"])))]
/// Frustum Tiles - List the grid tiles a camera footprint can see
pub struct Settings {
    /// Footprint corner in ground units, given four times in drawing order.
    /// Defaults to the whole ground area.
    #[clap(short, long = "corner", value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
    pub corners: Vec<Point<f64>>,

    /// Detail level of the footprint (0 = single root tile)
    #[clap(short, long)]
    pub level: Option<u32>,

    /// Camera elevation; the detail level is derived from it
    #[clap(short, long)]
    pub elevation: Option<f64>,

    /// Number of detail levels
    #[clap(long, default_value = "20")]
    pub max_levels: u32,

    /// Width of the tiled ground area
    #[clap(long, default_value = "2.0")]
    pub ground_width: f64,

    /// Height of the tiled ground area
    #[clap(long, default_value = "2.0")]
    pub ground_height: f64,

    /// Lowest accepted camera elevation
    #[clap(long, default_value = "0.1")]
    pub elevation_min: f64,

    /// Highest accepted camera elevation (level 0 from half of it upwards)
    #[clap(long, default_value = "4.8")]
    pub elevation_max: f64,

    /// Cull tiles on a single thread
    #[clap(long, default_value = "false")]
    pub sequential: bool,

    /// Minimum candidate count before culling goes parallel
    #[clap(long, default_value = "256")]
    pub parallel_threshold: usize,

    /// Print the tile batch as JSON
    #[clap(long, default_value = "false")]
    pub json: bool,

    /// Print enumeration counters after the tile list
    #[clap(long, default_value = "false")]
    pub stats: bool,
}

impl Settings {
    /// Parse from the process arguments, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn tiling_config(&self) -> TilingConfig {
        TilingConfig {
            max_levels: self.max_levels,
            ground_width: self.ground_width,
            ground_height: self.ground_height,
            elevation_min: self.elevation_min,
            elevation_max: self.elevation_max,
            parallel_culling: !self.sequential,
            parallel_threshold: self.parallel_threshold,
            ..TilingConfig::default()
        }
    }

    /// The four footprint corners, or the ground area's corners when none were given
    pub fn footprint_corners(&self) -> Option<[Point<f64>; 4]> {
        if self.corners.is_empty() {
            let (hw, hh) = (self.ground_width / 2.0, self.ground_height / 2.0);
            return Some([
                Point::new(-hw, -hh),
                Point::new(hw, -hh),
                Point::new(hw, hh),
                Point::new(-hw, hh),
            ]);
        }
        self.corners.as_slice().try_into().ok()
    }
}

/// Parse an `X,Y` pair
fn parse_point(value: &str) -> Result<Point<f64>, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", s.trim(), e))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("-1,0.5").unwrap(), Point::new(-1.0, 0.5));
        assert_eq!(parse_point(" 2 , 3 ").unwrap(), Point::new(2.0, 3.0));
        assert!(parse_point("1;2").is_err());
        assert!(parse_point("a,2").is_err());
    }

    #[test]
    fn test_parse_corners_and_level() {
        let settings = Settings::try_parse_from([
            "frustum-tiles",
            "--corner",
            "-1,-1",
            "--corner",
            "1,-1",
            "--corner",
            "1,1",
            "--corner",
            "-1,1",
            "--level",
            "2",
        ])
        .unwrap();
        assert_eq!(settings.level, Some(2));
        let corners = settings.footprint_corners().unwrap();
        assert_eq!(corners[0], Point::new(-1.0, -1.0));
        assert_eq!(corners[2], Point::new(1.0, 1.0));
    }

    #[test]
    fn test_detail_is_required_and_exclusive() {
        assert!(Settings::try_parse_from(["frustum-tiles"]).is_err());
        assert!(
            Settings::try_parse_from(["frustum-tiles", "--level", "1", "--elevation", "2.0"])
                .is_err()
        );
    }

    #[test]
    fn test_default_corners_cover_ground() {
        let settings = Settings::try_parse_from([
            "frustum-tiles",
            "--level",
            "1",
            "--ground-width",
            "200",
            "--ground-height",
            "100",
        ])
        .unwrap();
        let corners = settings.footprint_corners().unwrap();
        assert_eq!(corners[0], Point::new(-100.0, -50.0));
        assert_eq!(corners[2], Point::new(100.0, 50.0));
    }

    #[test]
    fn test_wrong_corner_count() {
        let settings =
            Settings::try_parse_from(["frustum-tiles", "-c", "0,0", "-c", "1,0", "-l", "1"])
                .unwrap();
        assert!(settings.footprint_corners().is_none());
    }

    #[test]
    fn test_tiling_config_mapping() {
        let settings =
            Settings::try_parse_from(["frustum-tiles", "-l", "3", "--sequential", "--max-levels", "10"])
                .unwrap();
        let config = settings.tiling_config();
        assert!(!config.parallel_culling);
        assert_eq!(config.max_levels, 10);
        assert!(config.validate().is_ok());
    }
}
