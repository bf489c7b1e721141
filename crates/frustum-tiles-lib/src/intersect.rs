//! Pairwise line-segment intersection
//!
//! Works from the cached segment angles: parallel segments (equal folded direction) reduce to a
//! 1D interval overlap, vertical segments are handled by evaluating the other line at their `x`,
//! and everything else is solved through slope/intercept form. Interval comparisons are closed
//! on both ends and widened by [`utils::EPSILON`].

use crate::geometry::Segment;
use crate::utils::{self, EPSILON};
use geo::Point;

/// Result of intersecting two segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// The segments do not touch
    None,
    /// The segments lie on the same line and their extents overlap
    Collinear,
    /// The segments meet in exactly one point
    Point(Point<f64>),
}

impl Intersection {
    /// Integer status code: 0 = none, -1 = collinear overlap, 1 = single point
    pub fn status(&self) -> i8 {
        match self {
            Intersection::None => 0,
            Intersection::Collinear => -1,
            Intersection::Point(_) => 1,
        }
    }

    /// Whether the segments touch at all
    #[inline(always)]
    pub fn is_hit(&self) -> bool {
        !matches!(self, Intersection::None)
    }
}

/// Intersect two segments
pub fn lines_intersect(a: &Segment, b: &Segment) -> Intersection {
    if let Some(result) = parallel_overlap(a, b) {
        return result;
    }

    match (a.is_vertical(), b.is_vertical()) {
        (true, _) => vertical_crossing(a, b),
        (_, true) => vertical_crossing(b, a),
        _ => general_crossing(a, b),
    }
}

/// Check whether two segments cross away from all four endpoints.
///
/// Touching at an endpoint, T-junctions and collinear overlap are not proper crossings.
pub fn crosses_properly(a: &Segment, b: &Segment) -> bool {
    match lines_intersect(a, b) {
        Intersection::Point(p) => !a.has_endpoint(p) && !b.has_endpoint(p),
        _ => false,
    }
}

#[inline(always)]
fn intervals_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    a_max >= b_min - EPSILON && b_max >= a_min - EPSILON
}

#[inline(always)]
fn within(value: f64, min: f64, max: f64) -> bool {
    value >= min - EPSILON && value <= max + EPSILON
}

/// Handle segments sharing a direction. `None` means they are not parallel.
fn parallel_overlap(a: &Segment, b: &Segment) -> Option<Intersection> {
    let (ab, bb) = (a.bounds, b.bounds);

    let same_line = match (a.is_horizontal(), b.is_horizontal()) {
        (true, true) => {
            utils::approx_eq(ab.min().y, bb.min().y)
                && intervals_overlap(ab.min().x, ab.max().x, bb.min().x, bb.max().x)
        }
        (true, false) | (false, true) => return None,
        (false, false) => match (a.is_vertical(), b.is_vertical()) {
            (true, true) => {
                utils::approx_eq(ab.min().x, bb.min().x)
                    && intervals_overlap(ab.min().y, ab.max().y, bb.min().y, bb.max().y)
            }
            (true, false) | (false, true) => return None,
            (false, false) => {
                if !utils::thetas_parallel(a.theta, b.theta) {
                    return None;
                }
                match (a.y_intercept(), b.y_intercept()) {
                    (Some(ya), Some(yb)) => {
                        utils::approx_eq(ya, yb)
                            && intervals_overlap(ab.min().x, ab.max().x, bb.min().x, bb.max().x)
                    }
                    _ => false,
                }
            }
        },
    };

    Some(if same_line {
        Intersection::Collinear
    } else {
        Intersection::None
    })
}

/// Cross a vertical segment with a non-vertical one
fn vertical_crossing(vertical: &Segment, other: &Segment) -> Intersection {
    let x = vertical.start.x();
    let ob = other.bounds;
    if !within(x, ob.min().x, ob.max().x) {
        return Intersection::None;
    }

    let y = match other.slope() {
        Some(slope) => other.start.y() + (x - other.start.x()) * slope,
        None => return Intersection::None,
    };

    let vb = vertical.bounds;
    if !within(y, vb.min().y, vb.max().y) || !within(y, ob.min().y, ob.max().y) {
        return Intersection::None;
    }

    Intersection::Point(Point::new(x, y))
}

/// Cross two non-parallel, non-vertical segments through slope/intercept form
fn general_crossing(a: &Segment, b: &Segment) -> Intersection {
    let (Some(slope_a), Some(slope_b)) = (a.slope(), b.slope()) else {
        return Intersection::None;
    };
    let y_a = a.start.y() - a.start.x() * slope_a;
    let y_b = b.start.y() - b.start.x() * slope_b;

    let x = (y_b - y_a) / (slope_a - slope_b);
    if !x.is_finite() {
        return Intersection::None;
    }

    if !within(x, a.bounds.min().x, a.bounds.max().x)
        || !within(x, b.bounds.min().x, b.bounds.max().x)
    {
        return Intersection::None;
    }

    let y = slope_a * x + y_a;
    Intersection::Point(Point::new(x, y))
}
