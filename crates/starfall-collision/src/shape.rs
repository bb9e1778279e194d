//! 2D shapes

use starfall_core::Vec3;
use std::fmt;

/// Endpoints closer than this make a degenerate segment
const DEGENERATE_LENGTH: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Vec3> for Point2d {
    /// Project onto the XY plane
    fn from(v: Vec3) -> Self {
        Self::new(v.x() as f64, v.y() as f64)
    }
}

impl From<(f64, f64)> for Point2d {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linesegment2d {
    pub point1: Point2d,
    pub point2: Point2d,
    direction: Point2d,
}

impl Linesegment2d {
    pub fn new(point1: Point2d, point2: Point2d) -> Self {
        let dx = point2.x - point1.x;
        let dy = point2.y - point1.y;
        let length = (dx * dx + dy * dy).sqrt();
        let direction = if length < DEGENERATE_LENGTH {
            log::warn!(
                "degenerate line segment at ({}, {}), direction set to zero",
                point1.x,
                point1.y
            );
            Point2d::default()
        } else {
            Point2d::new(dx / length, dy / length)
        };
        Self {
            point1,
            point2,
            direction,
        }
    }

    /// Unit vector from `point1` to `point2`; zero for degenerate segments
    pub fn direction(&self) -> Point2d {
        self.direction
    }
}

/// Closed polygon. Edge `i` runs from `points[i]` to `points[i - 1]`,
/// wrapping around, so there are as many edges as points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2d {
    points: Vec<Point2d>,
    segments: Vec<Linesegment2d>,
}

impl Polygon2d {
    pub fn new(points: Vec<Point2d>) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| {
                let j = if i == 0 { n - 1 } else { i - 1 };
                Linesegment2d::new(points[i], points[j])
            })
            .collect();
        Self { points, segments }
    }

    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    pub fn segments(&self) -> &[Linesegment2d] {
        &self.segments
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle2d {
    pub center: Point2d,
    pub radius: f64,
}

impl Circle2d {
    pub fn new(center: Point2d, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Shape kind, used to route queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    Linesegment,
    Polygon,
    Circle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Point => "point",
            ShapeKind::Linesegment => "linesegment",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Circle => "circle",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry2d {
    Point(Point2d),
    Linesegment(Linesegment2d),
    Polygon(Polygon2d),
    Circle(Circle2d),
}

impl Geometry2d {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry2d::Point(_) => ShapeKind::Point,
            Geometry2d::Linesegment(_) => ShapeKind::Linesegment,
            Geometry2d::Polygon(_) => ShapeKind::Polygon,
            Geometry2d::Circle(_) => ShapeKind::Circle,
        }
    }
}

/// A shape plus the caller's bookkeeping payload.
///
/// The payload is how query results are traced back to game entities,
/// e.g. the particle that produced a bullet segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape2d<D> {
    pub geometry: Geometry2d,
    pub data: D,
}

impl<D> Shape2d<D> {
    pub fn new(geometry: Geometry2d, data: D) -> Self {
        Self { geometry, data }
    }

    pub fn point(point: Point2d, data: D) -> Self {
        Self::new(Geometry2d::Point(point), data)
    }

    pub fn linesegment(point1: Point2d, point2: Point2d, data: D) -> Self {
        Self::new(Geometry2d::Linesegment(Linesegment2d::new(point1, point2)), data)
    }

    pub fn polygon(points: Vec<Point2d>, data: D) -> Self {
        Self::new(Geometry2d::Polygon(Polygon2d::new(points)), data)
    }

    pub fn circle(center: Point2d, radius: f64, data: D) -> Self {
        Self::new(Geometry2d::Circle(Circle2d::new(center, radius)), data)
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}
