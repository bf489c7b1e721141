//! 2D geometry primitives: segments and polylines with cached per-segment data
//!
//! A [`PolyLine`] computes every segment's direction (`theta`) and bounding box once, at
//! construction, so the intersection and containment tests can reuse them without recomputing
//! trigonometry per query.

use crate::{Result, TilingError, utils};
use geo::{Coord, Point, Rect};
use smallvec::SmallVec;

/// Vertex storage; footprints and tiles are quadrilaterals, so four stay inline
pub type Vertices = SmallVec<[Point<f64>; 4]>;

/// Axis-aligned box spanning two points
#[inline(always)]
pub fn bounds_of(a: Point<f64>, b: Point<f64>) -> Rect<f64> {
    Rect::new(a.0, b.0)
}

/// Smallest box containing both `a` and `b`
#[inline(always)]
pub fn bounds_union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

/// A single edge of a polyline, with the data cached at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point<f64>,
    pub end: Point<f64>,
    /// Bounding box of the two endpoints
    pub bounds: Rect<f64>,
    /// Directed angle from `start` to `end`, in radians
    pub theta: f64,
}

impl Segment {
    /// Build a standalone segment between two points
    pub fn new(start: Point<f64>, end: Point<f64>) -> Self {
        Self {
            start,
            end,
            bounds: bounds_of(start, end),
            theta: (end.y() - start.y()).atan2(end.x() - start.x()),
        }
    }

    /// Zero vertical extent. Covers both directions (theta 0 and PI) and zero-length segments.
    #[inline(always)]
    pub fn is_horizontal(&self) -> bool {
        self.bounds.min().y == self.bounds.max().y
    }

    /// Zero horizontal extent with a non-zero vertical one
    #[inline(always)]
    pub fn is_vertical(&self) -> bool {
        !self.is_horizontal() && self.bounds.min().x == self.bounds.max().x
    }

    /// Slope of the infinite line through the segment, `None` when vertical
    pub fn slope(&self) -> Option<f64> {
        if self.is_horizontal() {
            Some(0.0)
        } else if self.is_vertical() {
            None
        } else {
            Some(self.theta.tan())
        }
    }

    /// Y coordinate where the infinite line crosses `x = 0`, `None` when vertical
    pub fn y_intercept(&self) -> Option<f64> {
        self.slope()
            .map(|slope| self.start.y() - self.start.x() * slope)
    }

    pub fn midpoint(&self) -> Point<f64> {
        Point::new(
            (self.start.x() + self.end.x()) / 2.0,
            (self.start.y() + self.end.y()) / 2.0,
        )
    }

    /// Check whether `point` coincides with either endpoint (within [`utils::EPSILON`])
    pub fn has_endpoint(&self, point: Point<f64>) -> bool {
        let near = |v: Point<f64>| {
            utils::approx_eq(v.x(), point.x()) && utils::approx_eq(v.y(), point.y())
        };
        near(self.start) || near(self.end)
    }
}

/// Ordered vertex sequence with cached segment angles and bounding boxes.
///
/// An open polyline of `n` vertices has `n - 1` segments; a closed one has `n`, the last
/// joining the final vertex back to the first. The cached data is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyLine {
    vertices: Vertices,
    segment_bounds: SmallVec<[Rect<f64>; 4]>,
    segment_thetas: SmallVec<[f64; 4]>,
    closed: bool,
    /// Union of all segment bounds
    bounds: Rect<f64>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PolyLine {
    /// Build a polyline from at least two finite vertices
    ///
    /// # Arguments
    /// * `vertices` - Vertices in drawing order
    /// * `closed` - Whether a closing edge joins the last vertex to the first
    ///
    /// # Returns
    /// The polyline, or `InvalidGeometry` for fewer than two vertices or non-finite coordinates
    pub fn new(vertices: &[Point<f64>], closed: bool) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(TilingError::InvalidGeometry(format!(
                "a polyline needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v.x().is_finite() || !v.y().is_finite())
        {
            return Err(TilingError::InvalidGeometry(format!(
                "non-finite vertex ({}, {})",
                bad.x(),
                bad.y()
            )));
        }

        Ok(Self::build(vertices.iter().copied().collect(), closed))
    }

    /// Closed rectangle for `bounds`, wound lower-left, lower-right, upper-right, upper-left
    pub fn rect(bounds: Rect<f64>) -> Self {
        let min = bounds.min();
        let max = bounds.max();
        let vertices: Vertices = SmallVec::from_buf([
            Point::new(min.x, min.y),
            Point::new(max.x, min.y),
            Point::new(max.x, max.y),
            Point::new(min.x, max.y),
        ]);
        Self::build(vertices, true)
    }

    /// Deep copy with its own backing storage
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    fn build(vertices: Vertices, closed: bool) -> Self {
        let count = vertices.len();
        let segment_count = if closed { count } else { count - 1 };

        let mut segment_bounds = SmallVec::with_capacity(segment_count);
        let mut segment_thetas = SmallVec::with_capacity(segment_count);

        for i in 0..segment_count {
            let start = vertices[i];
            let end = vertices[(i + 1) % count];
            let dy = end.y() - start.y();
            let dx = end.x() - start.x();
            segment_thetas.push(dy.atan2(dx));
            segment_bounds.push(bounds_of(start, end));
        }

        // Seeded from the first segment
        let bounds = segment_bounds
            .iter()
            .skip(1)
            .fold(segment_bounds[0], |acc, b| bounds_union(acc, *b));

        Self {
            vertices,
            segment_bounds,
            segment_thetas,
            closed,
            bounds,
        }
    }

    /// Number of vertices
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.vertices.len()
    }

    #[inline(always)]
    pub fn segment_count(&self) -> usize {
        self.segment_thetas.len()
    }

    #[inline(always)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline(always)]
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    pub fn vertices(&self) -> &[Point<f64>] {
        &self.vertices
    }

    pub fn segment_bounds(&self) -> &[Rect<f64>] {
        &self.segment_bounds
    }

    pub fn segment_thetas(&self) -> &[f64] {
        &self.segment_thetas
    }

    /// Segment `index`, from vertex `index` to the next one (wrapping when closed)
    ///
    /// # Panics
    /// If `index >= self.segment_count()`
    pub fn segment(&self, index: usize) -> Segment {
        Segment {
            start: self.vertices[index],
            end: self.vertices[(index + 1) % self.vertices.len()],
            bounds: self.segment_bounds[index],
            theta: self.segment_thetas[index],
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count()).map(move |i| self.segment(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn square() -> PolyLine {
        PolyLine::new(
            &[
                Point::new(-1.0, -1.0),
                Point::new(1.0, -1.0),
                Point::new(1.0, 1.0),
                Point::new(-1.0, 1.0),
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_closed_polyline_segments() {
        let poly = square();
        assert_eq!(poly.count(), 4);
        assert_eq!(poly.segment_count(), 4);
        assert!(poly.is_closed());

        // Closing edge runs from the last vertex back to the first
        let closing = poly.segment(3);
        assert_eq!(closing.start, Point::new(-1.0, 1.0));
        assert_eq!(closing.end, Point::new(-1.0, -1.0));
        assert!((closing.theta + PI / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_open_polyline_omits_closing_edge() {
        let poly = PolyLine::new(
            &[
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ],
            false,
        )
        .unwrap();
        assert_eq!(poly.segment_count(), 2);
        assert_eq!(poly.segment_thetas().len(), 2);
        assert_eq!(poly.segment_bounds().len(), 2);
    }

    #[test]
    fn test_cached_thetas_and_bounds() {
        let poly = square();
        let thetas = poly.segment_thetas();
        assert_eq!(thetas[0], 0.0);
        assert!((thetas[1] - PI / 2.0).abs() < 1e-15);
        assert!((thetas[2] - PI).abs() < 1e-15);

        let b = poly.segment_bounds()[1];
        assert_eq!(b.min(), Coord { x: 1.0, y: -1.0 });
        assert_eq!(b.max(), Coord { x: 1.0, y: 1.0 });

        assert_eq!(poly.bounds().min(), Coord { x: -1.0, y: -1.0 });
        assert_eq!(poly.bounds().max(), Coord { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_horizontal_and_vertical_detection() {
        let poly = square();
        assert!(poly.segment(0).is_horizontal());
        // Leftwards edge has theta = PI but is still horizontal
        assert!(poly.segment(2).is_horizontal());
        assert!(poly.segment(1).is_vertical());
        assert!(!poly.segment(1).is_horizontal());
        assert_eq!(poly.segment(1).slope(), None);
        assert_eq!(poly.segment(2).slope(), Some(0.0));
    }

    #[test]
    fn test_degenerate_segment() {
        let poly = PolyLine::new(&[Point::new(0.5, 0.5), Point::new(0.5, 0.5)], false).unwrap();
        let seg = poly.segment(0);
        assert_eq!(seg.theta, 0.0);
        assert!(seg.is_horizontal());
        assert!(!seg.is_vertical());
        assert_eq!(seg.bounds.width(), 0.0);
        assert_eq!(seg.bounds.height(), 0.0);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            PolyLine::new(&[Point::new(0.0, 0.0)], true),
            Err(TilingError::InvalidGeometry(_))
        ));
        assert!(matches!(
            PolyLine::new(&[Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)], false),
            Err(TilingError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_rect_round_trip_bounds() {
        let bounds = Rect::new(Coord { x: -0.75, y: 0.125 }, Coord { x: 0.3, y: 0.9 });
        let rect = PolyLine::rect(bounds);
        assert_eq!(rect.bounds(), bounds);
        assert_eq!(rect.count(), 4);
        assert!(rect.is_closed());
        assert_eq!(rect.vertices()[0], Point::new(-0.75, 0.125));
        assert_eq!(rect.vertices()[1], Point::new(0.3, 0.125));
        assert_eq!(rect.vertices()[2], Point::new(0.3, 0.9));
        assert_eq!(rect.vertices()[3], Point::new(-0.75, 0.9));
    }

    #[test]
    fn test_duplicate_is_independent() {
        let original = square();
        let copy = original.duplicate();
        assert_eq!(copy, original);
        assert_ne!(
            copy.vertices().as_ptr(),
            original.vertices().as_ptr(),
            "duplicate must not share vertex storage"
        );
    }

    #[test]
    fn test_segment_helpers() {
        let seg = Segment::new(Point::new(0.0, 1.0), Point::new(2.0, 3.0));
        assert!((seg.slope().unwrap() - 1.0).abs() < 1e-12);
        assert!((seg.y_intercept().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(seg.midpoint(), Point::new(1.0, 2.0));
        assert!(seg.has_endpoint(Point::new(2.0, 3.0 + 1e-12)));
        assert!(!seg.has_endpoint(Point::new(1.0, 2.0)));
    }
}
