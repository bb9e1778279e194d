//! Mutable numeric values with change tracking
//!
//! Every write goes through a setter that raises the value's dirty flag. The
//! presentation layer clears the flag after it has reacted to the change.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Lengths at or below this are treated as zero when normalizing.
const LENGTH_EPSILON: f32 = 1e-8;

/// A 3-component vector with a dirty flag.
///
/// Equality compares components only; the dirty flag is bookkeeping.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
    dirty: bool,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        dirty: false,
    };
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
        dirty: false,
    };

    /// Create a vector. Fresh vectors start dirty.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, dirty: true }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
        self.dirty = true;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
        self.dirty = true;
    }

    pub fn set_z(&mut self, z: f32) {
        self.z = z;
        self.dirty = true;
    }

    /// Overwrite all three components
    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
        self.dirty = true;
    }

    /// Copy the components of `other` into this vector
    pub fn set_vec3(&mut self, other: &Vec3) {
        self.set(other.x, other.y, other.z);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn clear_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn length_sqr(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> f32 {
        self.length_sqr().sqrt()
    }

    /// Rescale to `target` length, keeping the direction.
    ///
    /// A (near) zero vector has no direction and becomes exactly zero.
    pub fn set_length(&mut self, target: f32) {
        let len = self.length();
        if len > LENGTH_EPSILON {
            let scale = target / len;
            self.set(self.x * scale, self.y * scale, self.z * scale);
        } else {
            self.set(0.0, 0.0, 0.0);
        }
    }

    pub fn normalize_self(&mut self) {
        self.set_length(1.0);
    }

    /// Uniform scale, returning a new vector
    pub fn scaled(&self, n: f32) -> Vec3 {
        Vec3::new(self.x * n, self.y * n, self.z * n)
    }

    /// Rotate about the Z axis, returning a new vector.
    ///
    /// Uses `x' = x·cosθ + y·sinθ`, `y' = -x·sinθ + y·cosθ`: screen Y points
    /// down, so this is the mirrored form of the textbook rotation.
    pub fn rotate_z(&self, theta: f32) -> Vec3 {
        let (sin, cos) = theta.sin_cos();
        Vec3::new(
            self.x * cos + self.y * sin,
            -self.x * sin + self.y * cos,
            self.z,
        )
    }

    /// In-place variant of [`Vec3::rotate_z`]
    pub fn rotate_z_set(&mut self, theta: f32) {
        let rotated = self.rotate_z(theta);
        self.set_vec3(&rotated);
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(arr: [f32; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        self.scaled(scalar)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// A single tracked value, used for opacity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Scalar {
    value: f32,
    dirty: bool,
}

impl Scalar {
    pub const fn new(value: f32) -> Self {
        Self { value, dirty: true }
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self {
            value: 0.0,
            dirty: false,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Scalar> for f32 {
    fn from(s: Scalar) -> Self {
        s.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_vec3_operations() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v2 - v1, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(v1 * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(v1.scaled(-1.0), -v1);
    }

    #[test]
    fn writes_raise_dirty_flag() {
        let mut v = Vec3::ZERO;
        assert!(!v.is_dirty());

        v.set_y(2.0);
        assert!(v.is_dirty());
        assert!(v.clear_dirty());
        assert!(!v.is_dirty());
        assert!(!v.clear_dirty());

        v.set_vec3(&Vec3::ONE);
        assert!(v.is_dirty());
    }

    #[test]
    fn set_length_rescales_magnitude() {
        let mut v = Vec3::new(3.0, 4.0, 0.0);
        v.set_length(10.0);
        assert!(approx(v.x(), 6.0));
        assert!(approx(v.y(), 8.0));
        assert!(approx(v.length(), 10.0));
    }

    #[test]
    fn set_length_of_zero_vector_stays_zero() {
        let mut v = Vec3::new(0.0, 0.0, 0.0);
        v.clear_dirty();
        v.set_length(5.0);
        assert_eq!(v, Vec3::ZERO);
        assert!(v.x().is_finite());
        assert!(v.is_dirty());
    }

    #[test]
    fn rotate_z_uses_screen_convention() {
        // (0, 1) rotated by +90° lands on +x under the mirrored convention
        let v = Vec3::new(0.0, 1.0, 0.0).rotate_z(FRAC_PI_2);
        assert!(approx(v.x(), 1.0));
        assert!(approx(v.y(), 0.0));

        let mut w = Vec3::new(1.0, 0.0, 5.0);
        w.rotate_z_set(FRAC_PI_2);
        assert!(approx(w.x(), 0.0));
        assert!(approx(w.y(), -1.0));
        assert!(approx(w.z(), 5.0));
    }

    #[test]
    fn length_sqr_matches_length() {
        let v = Vec3::new(1.0, 2.0, 2.0);
        assert!(approx(v.length_sqr(), 9.0));
        assert!(approx(v.length(), 3.0));
    }

    #[test]
    fn deserialize_from_array() {
        #[derive(Deserialize)]
        struct Holder {
            v: Vec3,
            o: Scalar,
        }
        let h: Holder = toml::from_str("v = [1, 2.5, -3]\no = 0.5").unwrap();
        assert_eq!(h.v, Vec3::new(1.0, 2.5, -3.0));
        assert!((h.o.get() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scalar_tracks_writes() {
        let mut s = Scalar::new(1.0);
        assert!(s.clear_dirty());
        s.set(0.25);
        assert!(s.is_dirty());
        assert_eq!(s.get(), 0.25);
    }
}
