//! Inside/test queries and the pair routing behind them

use crate::error::CollisionError;
use crate::shape::{Circle2d, Geometry2d, Linesegment2d, Point2d, Polygon2d, Shape2d};

/// Rejection tolerance for segment intersection. Touching is not crossing.
pub const EPSILON: f64 = 1e-8;

/// `shape1` and `shape2` meet at `point`.
///
/// `shape1` is always the queried shape and `shape2` the target.
#[derive(Debug)]
pub struct CollisionResult<'a, D> {
    pub point: Point2d,
    pub shape1: &'a Shape2d<D>,
    pub shape2: &'a Shape2d<D>,
}

/// `shape1` lies inside `shape2`
#[derive(Debug)]
pub struct InsideResult<'a, D> {
    pub shape1: &'a Shape2d<D>,
    pub shape2: &'a Shape2d<D>,
}

/// Collision query entry points
pub struct Collision2d;

impl Collision2d {
    /// One containment flag per target.
    ///
    /// An unsupported pair anywhere in `targets` is logged and the whole
    /// query yields an empty vector.
    pub fn inside<'a, D: 'a>(
        shape: &'a Shape2d<D>,
        targets: impl IntoIterator<Item = &'a Shape2d<D>>,
    ) -> Vec<bool> {
        Self::try_inside(shape, targets).unwrap_or_else(|e| {
            log::warn!("inside query aborted: {}", e);
            Vec::new()
        })
    }

    pub fn try_inside<'a, D: 'a>(
        shape: &'a Shape2d<D>,
        targets: impl IntoIterator<Item = &'a Shape2d<D>>,
    ) -> Result<Vec<bool>, CollisionError> {
        targets
            .into_iter()
            .map(|target| route_inside(shape, target).map(|(inside, _)| inside))
            .collect()
    }

    /// The contained pairs, oriented so `shape1` is the inner shape.
    pub fn inside_pairs<'a, D: 'a>(
        shape: &'a Shape2d<D>,
        targets: impl IntoIterator<Item = &'a Shape2d<D>>,
    ) -> Vec<InsideResult<'a, D>> {
        let mut result = Vec::new();
        for target in targets {
            match route_inside(shape, target) {
                Ok((false, _)) => {}
                Ok((true, false)) => result.push(InsideResult {
                    shape1: shape,
                    shape2: target,
                }),
                Ok((true, true)) => result.push(InsideResult {
                    shape1: target,
                    shape2: shape,
                }),
                Err(e) => {
                    log::warn!("inside query aborted: {}", e);
                    return Vec::new();
                }
            }
        }
        result
    }

    /// Intersection points of `shape` with every target, concatenated.
    ///
    /// An unsupported pair anywhere in `targets` is logged and the whole
    /// query yields an empty vector.
    pub fn test<'a, D: 'a>(
        shape: &'a Shape2d<D>,
        targets: impl IntoIterator<Item = &'a Shape2d<D>>,
    ) -> Vec<CollisionResult<'a, D>> {
        Self::try_test(shape, targets).unwrap_or_else(|e| {
            log::warn!("test query aborted: {}", e);
            Vec::new()
        })
    }

    pub fn try_test<'a, D: 'a>(
        shape: &'a Shape2d<D>,
        targets: impl IntoIterator<Item = &'a Shape2d<D>>,
    ) -> Result<Vec<CollisionResult<'a, D>>, CollisionError> {
        let mut result = Vec::new();
        for target in targets {
            let points = route_test(shape, target)?;
            result.extend(points.into_iter().map(|point| CollisionResult {
                point,
                shape1: shape,
                shape2: target,
            }));
        }
        Ok(result)
    }
}

/// Containment for one pair, plus whether the pair was evaluated flipped
/// (target inside shape rather than shape inside target).
fn route_inside<D>(
    shape: &Shape2d<D>,
    target: &Shape2d<D>,
) -> Result<(bool, bool), CollisionError> {
    use Geometry2d::*;
    match (&shape.geometry, &target.geometry) {
        (Point(p), Polygon(poly)) => Ok((point_polygon_inside(p, poly), false)),
        (Point(p), Circle(c)) => Ok((point_circle_inside(p, c), false)),
        (Linesegment(s), Polygon(poly)) => Ok((linesegment_polygon_inside(s, poly), false)),
        (Polygon(poly), Point(p)) => Ok((point_polygon_inside(p, poly), true)),
        (Polygon(poly), Linesegment(s)) => Ok((linesegment_polygon_inside(s, poly), true)),
        _ => Err(CollisionError::UnsupportedPair(shape.kind(), target.kind())),
    }
}

/// Intersection points for one pair. Both implemented pairs are symmetric
/// in their point output, so the flipped entry only swaps arguments.
fn route_test<D>(shape: &Shape2d<D>, target: &Shape2d<D>) -> Result<Vec<Point2d>, CollisionError> {
    use Geometry2d::*;
    match (&shape.geometry, &target.geometry) {
        (Linesegment(a), Linesegment(b)) => {
            Ok(linesegment_linesegment_test(a, b).into_iter().collect())
        }
        (Linesegment(s), Polygon(poly)) => Ok(linesegment_polygon_test(s, poly)),
        (Polygon(poly), Linesegment(s)) => Ok(linesegment_polygon_test(s, poly)),
        _ => Err(CollisionError::UnsupportedPair(shape.kind(), target.kind())),
    }
}

/// Even-odd ray casting against every edge
fn point_polygon_inside(p: &Point2d, polygon: &Polygon2d) -> bool {
    let mut inside = false;
    for segment in polygon.segments() {
        let pi = segment.point1;
        let pj = segment.point2;
        if (pi.y > p.y) != (pj.y > p.y)
            && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
    }
    inside
}

fn point_circle_inside(p: &Point2d, circle: &Circle2d) -> bool {
    let dx = p.x - circle.center.x;
    let dy = p.y - circle.center.y;
    dx * dx + dy * dy < circle.radius * circle.radius
}

/// No boundary crossings and both endpoints inside
fn linesegment_polygon_inside(line: &Linesegment2d, polygon: &Polygon2d) -> bool {
    if !linesegment_polygon_test(line, polygon).is_empty() {
        return false;
    }
    point_polygon_inside(&line.point1, polygon) && point_polygon_inside(&line.point2, polygon)
}

fn linesegment_linesegment_test(l1: &Linesegment2d, l2: &Linesegment2d) -> Option<Point2d> {
    let (a, b) = (l1.point1, l1.point2);
    let (c, d) = (l2.point1, l2.point2);

    // A and B must lie strictly on opposite sides of CD
    let n2x = d.y - c.y;
    let n2y = c.x - d.x;
    let dist_c_n2 = c.x * n2x + c.y * n2y;
    let dist_a_n2 = a.x * n2x + a.y * n2y;
    let dist_b_n2 = b.x * n2x + b.y * n2y;
    if (dist_a_n2 - dist_c_n2) * (dist_b_n2 - dist_c_n2) >= -EPSILON {
        return None;
    }

    // and C and D strictly on opposite sides of AB
    let n1x = b.y - a.y;
    let n1y = a.x - b.x;
    let dist_a_n1 = a.x * n1x + a.y * n1y;
    let dist_c_n1 = c.x * n1x + c.y * n1y;
    let dist_d_n1 = d.x * n1x + d.y * n1y;
    if (dist_c_n1 - dist_a_n1) * (dist_d_n1 - dist_a_n1) >= -EPSILON {
        return None;
    }

    let denominator = n1x * n2y - n1y * n2x;
    let fraction = (dist_a_n2 - dist_c_n2) / denominator;
    Some(Point2d::new(a.x + fraction * n1y, a.y - fraction * n1x))
}

fn linesegment_polygon_test(line: &Linesegment2d, polygon: &Polygon2d) -> Vec<Point2d> {
    polygon
        .segments()
        .iter()
        .filter_map(|edge| linesegment_linesegment_test(line, edge))
        .collect()
}
