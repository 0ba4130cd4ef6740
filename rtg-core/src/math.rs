//! Linear algebra primitives shared by the whole workspace.
//!
//! Everything is `f32` and column-vector based: matrices multiply vectors on
//! the right, so `a * b * v` applies `b` first. Storage is column-major, as
//! nalgebra (and OpenGL-style shaders) expect.

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

use crate::error::{Error, Result};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Vec4 = Vector4<f32>;
pub type Mat4 = Matrix4<f32>;

/// Lengths below this are treated as zero when normalizing
pub const EPSILON: f32 = 1e-6;

/// World up axis used by the camera and its controls
pub fn world_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Normalize `v`, refusing vectors too short to have a direction
pub fn try_normalize(v: &Vec3) -> Result<Vec3> {
    v.try_normalize(EPSILON).ok_or(Error::ZeroLengthVector)
}

/// Lift a point into homogeneous coordinates (w = 1)
pub fn point(v: &Vec3) -> Vec4 {
    Vec4::new(v.x, v.y, v.z, 1.0)
}

/// Lift a direction into homogeneous coordinates (w = 0)
pub fn direction(v: &Vec3) -> Vec4 {
    Vec4::new(v.x, v.y, v.z, 0.0)
}

/// Transform a point by `m`, dividing through by w
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    let h = m * point(p);
    if h.w.abs() < EPSILON {
        h.xyz()
    } else {
        h.xyz() / h.w
    }
}

pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
