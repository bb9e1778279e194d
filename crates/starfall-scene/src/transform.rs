//! Local and world transform matrices

use starfall_core::Vec3;

/// Column-major 4x4 matrix
pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Build a local matrix from position, Euler rotation (radians, ZYX order)
/// and scale.
pub fn local_matrix(position: &Vec3, rotation: &Vec3, scale: &Vec3) -> Mat4 {
    let (sx, cx) = rotation.x().sin_cos();
    let (sy, cy) = rotation.y().sin_cos();
    let (sz, cz) = rotation.z().sin_cos();

    let (r00, r01, r02) = (cy * cz, sx * sy * cz - cx * sz, cx * sy * cz + sx * sz);
    let (r10, r11, r12) = (cy * sz, sx * sy * sz + cx * cz, cx * sy * sz - sx * cz);
    let (r20, r21, r22) = (-sy, sx * cy, cx * cy);

    [
        [r00 * scale.x(), r10 * scale.x(), r20 * scale.x(), 0.0],
        [r01 * scale.y(), r11 * scale.y(), r21 * scale.y(), 0.0],
        [r02 * scale.z(), r12 * scale.z(), r22 * scale.z(), 0.0],
        [position.x(), position.y(), position.z(), 1.0],
    ]
}

/// Multiply two column-major matrices (`a * b`)
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform() {
        let m = local_matrix(&Vec3::ZERO, &Vec3::ZERO, &Vec3::ONE);
        assert_eq!(m, IDENTITY);
    }

    #[test]
    fn parent_translation_applies_to_child() {
        let parent = local_matrix(&Vec3::new(10.0, 0.0, 0.0), &Vec3::ZERO, &Vec3::ONE);
        let child = local_matrix(&Vec3::new(1.0, 2.0, 0.0), &Vec3::ZERO, &Vec3::ONE);
        let world = mat4_mul(&parent, &child);
        assert!((world[3][0] - 11.0).abs() < 1e-6);
        assert!((world[3][1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn parent_scale_flips_child() {
        let parent = local_matrix(&Vec3::ZERO, &Vec3::ZERO, &Vec3::new(1.0, -1.0, 1.0));
        let child = local_matrix(&Vec3::new(0.0, 5.0, 0.0), &Vec3::ZERO, &Vec3::ONE);
        let world = mat4_mul(&parent, &child);
        assert!((world[3][1] + 5.0).abs() < 1e-6);
    }
}
