use serde::{Deserialize, Serialize};

use crate::global_variables::ROUTE_ARC_LIFT;
use crate::network::BusStop;

/// A point on the map canvas, in percent of width and height (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<&BusStop> for Point {
    fn from(stop: &BusStop) -> Self {
        Point::new(stop.x, stop.y)
    }
}

/// Evaluates the quadratic Bézier curve through `p0`, control `p1`, `p2` at `t`.
pub fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

/// The arc a route is drawn along, from its first stop to its last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl RouteCurve {
    /// Curve between two end points, bowed upwards by the standard lift.
    pub fn between(start: Point, end: Point) -> Self {
        let mid = start.midpoint(end);
        Self {
            start,
            control: Point::new(mid.x, mid.y - ROUTE_ARC_LIFT),
            end,
        }
    }

    /// Needs at least two stops; intermediate stops do not bend the curve.
    pub fn from_stops(stops: &[BusStop]) -> Option<Self> {
        match stops {
            [first, .., last] => Some(Self::between(first.into(), last.into())),
            _ => None,
        }
    }

    pub fn point_at(&self, progress: f64) -> Point {
        quadratic_bezier(self.start, self.control, self.end, progress.clamp(0.0, 1.0))
    }

    /// SVG path data in the same form as the map draws it (`%` units).
    pub fn svg_path(&self) -> String {
        format!(
            "M {}% {}% Q {}% {}% {}% {}%",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}
