//! Freehand stroke element.

use super::{ElementId, Paint, points_bounds};
use kurbo::{BezPath, Point, Rect};
use uuid::Uuid;

/// Default simplification tolerance in canvas units.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 2.0;

/// Strokes with at most this many points are stored verbatim.
const VERBATIM_POINT_LIMIT: usize = 10;

/// Target spacing between resampled points, in multiples of the tolerance.
const SPACING_FACTOR: f64 = 5.0;

/// A freehand polyline (pen or eraser stroke).
#[derive(Debug, Clone)]
pub struct Freehand {
    id: ElementId,
    points: Vec<Point>,
    paint: Paint,
}

impl Freehand {
    /// Build a stroke from raw pointer samples, simplifying long input.
    pub fn new(raw_points: &[Point], paint: Paint, tolerance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: simplify_stroke(raw_points, tolerance),
            paint,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Points of the (possibly simplified) polyline.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    /// Polyline path: move to the first point, line to the rest.
    pub fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }
}

pub(crate) fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    if points.len() == 1 {
        // Zero-length segment so round caps still render a dot.
        path.line_to(*first);
    }
    for point in points.iter().skip(1) {
        path.line_to(*point);
    }
    path
}

/// Arc-length resampling of a freehand stroke.
///
/// Input with ten points or fewer is kept as is. Otherwise the stroke is
/// resampled to `max(2, floor(L / (tolerance * 5)))` points spaced evenly
/// along its length `L`, unless that would not reduce the point count.
/// The first and last points always survive unchanged.
pub fn simplify_stroke(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= VERBATIM_POINT_LIMIT {
        return points.to_vec();
    }

    let tolerance = if tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_SIMPLIFY_TOLERANCE
    };

    // Cumulative arc length at every input point.
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        cumulative.push(total);
    }

    let target = ((total / (tolerance * SPACING_FACTOR)).floor() as usize).max(2);
    if target > points.len() {
        return points.to_vec();
    }

    let step = total / (target - 1) as f64;
    let mut result = Vec::with_capacity(target);
    result.push(points[0]);

    let mut segment = 0;
    for i in 1..target - 1 {
        let distance = step * i as f64;
        while segment + 1 < points.len() - 1 && cumulative[segment + 1] < distance {
            segment += 1;
        }
        let seg_start = cumulative[segment];
        let seg_len = cumulative[segment + 1] - seg_start;
        let t = if seg_len > f64::EPSILON {
            ((distance - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        result.push(points[segment].lerp(points[segment + 1], t));
    }

    result.push(points[points.len() - 1]);
    result
}
