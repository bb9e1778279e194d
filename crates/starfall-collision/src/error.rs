use crate::shape::ShapeKind;
use starfall_core::StarfallError;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    #[error("unsupported shape pair: {0} vs {1}")]
    UnsupportedPair(ShapeKind, ShapeKind),
}

impl From<CollisionError> for StarfallError {
    fn from(e: CollisionError) -> Self {
        StarfallError::CollisionError(e.to_string())
    }
}
