//! Animatable fields and the values they hold

use serde::{Deserialize, Serialize};
use starfall_core::Vec3;

/// Which node field an animation drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimateField {
    Position,
    Rotation,
    Scale,
    Color,
    Opacity,
}

/// Value of an animatable field, or an operand applied to one.
///
/// Vector fields (position, rotation, scale, color) hold `Vec3`; opacity holds
/// a `Scalar`. Arithmetic between the two treats the scalar as a vector with
/// all components equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Vec3(Vec3),
    Scalar(f32),
}

impl FieldValue {
    pub fn zero_like(&self) -> FieldValue {
        match self {
            FieldValue::Vec3(_) => FieldValue::Vec3(Vec3::new(0.0, 0.0, 0.0)),
            FieldValue::Scalar(_) => FieldValue::Scalar(0.0),
        }
    }

    pub fn scaled(&self, s: f32) -> FieldValue {
        match self {
            FieldValue::Vec3(v) => FieldValue::Vec3(v.scaled(s)),
            FieldValue::Scalar(x) => FieldValue::Scalar(x * s),
        }
    }

    pub fn added(&self, other: &FieldValue) -> FieldValue {
        match (self, other) {
            (FieldValue::Vec3(a), FieldValue::Vec3(b)) => FieldValue::Vec3(*a + *b),
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => FieldValue::Scalar(a + b),
            (FieldValue::Vec3(a), FieldValue::Scalar(b)) => FieldValue::Vec3(*a + Vec3::splat(*b)),
            (FieldValue::Scalar(a), FieldValue::Vec3(b)) => FieldValue::Vec3(Vec3::splat(*a) + *b),
        }
    }

    /// Read as a vector, splatting scalars
    pub fn as_vec3(&self) -> Vec3 {
        match self {
            FieldValue::Vec3(v) => *v,
            FieldValue::Scalar(x) => Vec3::splat(*x),
        }
    }

    /// Read as a scalar, taking the x component of vectors
    pub fn as_scalar(&self) -> f32 {
        match self {
            FieldValue::Vec3(v) => v.x(),
            FieldValue::Scalar(x) => *x,
        }
    }
}

impl From<Vec3> for FieldValue {
    fn from(v: Vec3) -> Self {
        FieldValue::Vec3(v)
    }
}

impl From<f32> for FieldValue {
    fn from(x: f32) -> Self {
        FieldValue::Scalar(x)
    }
}
