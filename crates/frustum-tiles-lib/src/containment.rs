//! Containment tests between points, boxes and polylines
//!
//! All composite tests answer with a [`Classification`] (outside / inside / overlap). For areas
//! (`polygon_contains_bounds`, `polygon_contains_polyline`) only interiors matter: a tile that
//! shares an edge or a corner with the footprint but does not extend past it is `Inside`, and
//! one that only touches it from outside is `Outside`.

use crate::geometry::{PolyLine, Segment};
use crate::intersect::{Intersection, crosses_properly, lines_intersect};
use crate::utils::{self, EPSILON};
use geo::{Point, Rect};
use smallvec::{SmallVec, smallvec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ternary outcome of a containment test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Classification {
    Outside,
    Inside,
    Overlap,
}

impl Classification {
    /// Integer status code: 0 = outside, 1 = inside, -1 = overlap
    pub fn status(&self) -> i8 {
        match self {
            Classification::Outside => 0,
            Classification::Inside => 1,
            Classification::Overlap => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Outside => "outside",
            Classification::Inside => "inside",
            Classification::Overlap => "overlap",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a point lies relative to a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    /// On an edge or vertex (within [`utils::EPSILON`])
    Boundary,
    Inside,
}

/// Inclusive range test on both axes
#[inline(always)]
pub fn bounds_contains_point(bounds: &Rect<f64>, point: Point<f64>) -> bool {
    point.x() >= bounds.min().x
        && point.x() <= bounds.max().x
        && point.y() >= bounds.min().y
        && point.y() <= bounds.max().y
}

/// Classify box `b` against box `a`: outside if disjoint, inside if `b` lies within `a`
/// (edges inclusive), overlap otherwise. Boxes sharing only an edge overlap.
pub fn bounds_contains_bounds(a: &Rect<f64>, b: &Rect<f64>) -> Classification {
    let (amin, amax) = (a.min(), a.max());
    let (bmin, bmax) = (b.min(), b.max());

    if amax.x < bmin.x || bmax.x < amin.x || amax.y < bmin.y || bmax.y < amin.y {
        return Classification::Outside;
    }

    if bmin.x >= amin.x && bmax.x <= amax.x && bmin.y >= amin.y && bmax.y <= amax.y {
        Classification::Inside
    } else {
        Classification::Overlap
    }
}

#[inline(always)]
fn bounds_contains_point_approx(bounds: &Rect<f64>, point: Point<f64>) -> bool {
    point.x() >= bounds.min().x - EPSILON
        && point.x() <= bounds.max().x + EPSILON
        && point.y() >= bounds.min().y - EPSILON
        && point.y() <= bounds.max().y + EPSILON
}

/// Locate a point against a closed polygon with a signed crossing (winding) count.
///
/// A ray is cast towards +x; every edge it crosses adds the sign of its direction. Crossings use
/// a half-open `[min.y, max.y)` span so a ray through a shared vertex counts once. Open
/// polylines have no interior and always yield `Outside`.
pub fn locate_point(polygon: &PolyLine, point: Point<f64>) -> PointLocation {
    if !polygon.is_closed() || !bounds_contains_point_approx(&polygon.bounds(), point) {
        return PointLocation::Outside;
    }

    let (px, py) = (point.x(), point.y());
    let mut winds = 0;

    for segment in polygon.segments() {
        let bounds = segment.bounds;
        if py < bounds.min().y - EPSILON || py > bounds.max().y + EPSILON {
            continue;
        }
        let counts = py >= bounds.min().y && py < bounds.max().y;

        if segment.is_horizontal() {
            if utils::approx_eq(py, segment.start.y())
                && px >= bounds.min().x - EPSILON
                && px <= bounds.max().x + EPSILON
            {
                return PointLocation::Boundary;
            }
            continue;
        }

        if segment.is_vertical() {
            let x = segment.start.x();
            if utils::approx_eq(px, x) {
                return PointLocation::Boundary;
            }
            if px < x && counts {
                winds += utils::signum(segment.theta);
            }
            continue;
        }

        // X where the edge crosses the ray's height
        let x = segment.start.x() + (py - segment.start.y()) / segment.theta.tan();
        if utils::approx_eq(x, px) {
            return PointLocation::Boundary;
        }
        if x < px {
            continue;
        }
        if counts {
            winds += utils::signum(segment.theta);
        }
    }

    if winds != 0 {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// Whether a closed polygon contains `point`, boundary included
pub fn polygon_contains_point(polygon: &PolyLine, point: Point<f64>) -> bool {
    locate_point(polygon, point) != PointLocation::Outside
}

/// Classify a polyline against a box, treating any contact as overlap.
///
/// When the polyline is closed and encloses a box corner the two overlap even if no edges meet.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn bounds_contains_polyline(bounds: &Rect<f64>, polyline: &PolyLine) -> Classification {
    let fast = bounds_contains_bounds(bounds, &polyline.bounds());
    if fast != Classification::Overlap {
        return fast;
    }

    let rect = PolyLine::rect(*bounds);
    for (corner, edge) in rect.vertices().iter().zip(rect.segments()) {
        if polyline.is_closed() && polygon_contains_point(polyline, *corner) {
            return Classification::Overlap;
        }
        if polyline
            .segments()
            .any(|segment| lines_intersect(&edge, &segment).is_hit())
        {
            return Classification::Overlap;
        }
    }

    Classification::Outside
}

/// Classify a box against a closed polygon
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn polygon_contains_bounds(polygon: &PolyLine, bounds: &Rect<f64>) -> Classification {
    if !polygon.is_closed()
        || bounds_contains_bounds(&polygon.bounds(), bounds) == Classification::Outside
    {
        return Classification::Outside;
    }

    classify_in_polygon(polygon, &PolyLine::rect(*bounds))
}

/// Classify an arbitrary polyline against a closed polygon
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn polygon_contains_polyline(polygon: &PolyLine, polyline: &PolyLine) -> Classification {
    if !polygon.is_closed()
        || bounds_contains_bounds(&polygon.bounds(), &polyline.bounds()) == Classification::Outside
    {
        return Classification::Outside;
    }

    classify_in_polygon(polygon, polyline)
}

/// Shared classification of `polyline` against the interior of `polygon`.
///
/// Every polyline segment is cut at its contacts with the polygon boundary, so each piece lies
/// wholly inside, wholly outside or along the boundary, and its midpoint tells which. A piece
/// strictly inside together with one strictly outside is an overlap, as is a proper edge
/// crossing or, for a closed polyline, a piece of the polygon boundary running through its
/// interior. Otherwise the side of the strict pieces decides; a polyline lying entirely on the
/// polygon boundary counts as inside.
fn classify_in_polygon(polygon: &PolyLine, polyline: &PolyLine) -> Classification {
    let mut inside = false;
    let mut outside = false;

    for segment in polyline.segments() {
        for probe in piece_midpoints(&segment, polygon) {
            match locate_point(polygon, probe) {
                PointLocation::Inside => inside = true,
                PointLocation::Outside => outside = true,
                PointLocation::Boundary => {}
            }
            if inside && outside {
                return Classification::Overlap;
            }
        }
    }

    let crossing = polyline.segments().any(|a| {
        polygon
            .segments()
            .any(|b| crosses_properly(&a, &b))
    });
    if crossing {
        return Classification::Overlap;
    }

    if polyline.is_closed() && reaches_into(polyline, polygon) {
        return Classification::Overlap;
    }

    if outside {
        Classification::Outside
    } else {
        Classification::Inside
    }
}

/// Whether any piece of `other`'s boundary runs strictly inside `container`
fn reaches_into(container: &PolyLine, other: &PolyLine) -> bool {
    other.segments().any(|segment| {
        piece_midpoints(&segment, container)
            .into_iter()
            .any(|p| locate_point(container, p) == PointLocation::Inside)
    })
}

/// Midpoints of the pieces `segment` is cut into by its contacts with `other`'s edges.
///
/// Between two consecutive contacts a piece cannot change sides. A zero-length segment yields
/// its single point.
fn piece_midpoints(segment: &Segment, other: &PolyLine) -> SmallVec<[Point<f64>; 4]> {
    let (sx, sy) = (segment.start.x(), segment.start.y());
    let (dx, dy) = (segment.end.x() - sx, segment.end.y() - sy);
    let length_sq = dx * dx + dy * dy;
    if length_sq <= EPSILON * EPSILON {
        return smallvec![segment.start];
    }
    let param = |p: Point<f64>| ((p.x() - sx) * dx + (p.y() - sy) * dy) / length_sq;

    let mut cuts: SmallVec<[f64; 8]> = smallvec![0.0, 1.0];
    for edge in other.segments() {
        match lines_intersect(segment, &edge) {
            Intersection::Point(p) => cuts.push(param(p)),
            Intersection::Collinear => {
                cuts.push(param(edge.start));
                cuts.push(param(edge.end));
            }
            Intersection::None => {}
        }
    }
    cuts.retain(|t| (0.0..=1.0).contains(&*t));
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);

    cuts.windows(2)
        .map(|w| {
            let t = (w[0] + w[1]) / 2.0;
            Point::new(sx + t * dx, sy + t * dy)
        })
        .collect()
}
