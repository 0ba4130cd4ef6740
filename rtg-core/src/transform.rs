//! Model matrix construction from position, Euler rotation and scale

use crate::error::{Error, Result};
use crate::math::{self, Mat4, Vec3};

/// Create a translation matrix
pub fn translate(t: &Vec3) -> Mat4 {
    Mat4::new_translation(t)
}

/// Create a (possibly non-uniform) scale matrix
pub fn scale(s: &Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(s)
}

/// Rotation around the X axis (pitch), in radians
pub fn rotate_x(rad: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::new(rad, 0.0, 0.0))
}

/// Rotation around the Y axis (yaw), in radians
pub fn rotate_y(rad: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::new(0.0, rad, 0.0))
}

/// Rotation around the Z axis (roll), in radians
pub fn rotate_z(rad: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::new(0.0, 0.0, rad))
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
    projection * view * model
}

/// Placement of one renderable object in the world.
///
/// `rotation` holds Euler angles in degrees. The model matrix is
/// `T(position) * Ry(y) * Rx(x) * Rz(z) * S(scale)`: the object is scaled,
/// rolled, pitched and yawed in place, then moved to `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vec3::new(dx, dy, dz);
    }

    /// Object-to-world matrix, rebuilt from the current fields on every call
    pub fn model_matrix(&self) -> Mat4 {
        translate(&self.position)
            * rotate_y(self.rotation.y.to_radians())
            * rotate_x(self.rotation.x.to_radians())
            * rotate_z(self.rotation.z.to_radians())
            * scale(&self.scale)
    }

    /// Reject NaN or infinite components, and zero scale components, which
    /// collapse the object and make the matrix singular
    pub fn validate(&self) -> Result<()> {
        let fields = [&self.position, &self.rotation, &self.scale];
        if !fields.iter().all(|v| math::is_finite(v)) {
            return Err(Error::NonFiniteTransform);
        }
        if self.scale.iter().any(|s| *s == 0.0) {
            return Err(Error::SingularScale);
        }
        Ok(())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}
