//! Starfall Collision - narrow-phase 2D queries
//!
//! Typed shapes (point, line segment, polygon, circle) carrying a caller
//! payload, and two query families routed by shape-kind pair:
//! - `inside`: containment, one boolean per target
//! - `test`: intersection points, zero or more per target
//!
//! Only the pairs the game needs are implemented. Querying any other pair
//! logs a warning and yields an empty result; the `try_*` variants report
//! it as [`CollisionError::UnsupportedPair`] instead.

mod error;
mod query;
mod shape;

pub use error::CollisionError;
pub use query::{Collision2d, CollisionResult, InsideResult, EPSILON};
pub use shape::{Circle2d, Geometry2d, Linesegment2d, Point2d, Polygon2d, Shape2d, ShapeKind};
