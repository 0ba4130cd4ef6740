//! Camera, view and projection matrices
//!
//! All projections use the OpenGL clip convention: the camera looks down -Z
//! in view space and depth lands in NDC [-1, 1], near plane at -1.

use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::math::{self, Mat4, Vec3, EPSILON};

/// Right-handed look-at view matrix
pub fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    Mat4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
}

/// Perspective projection from a vertical field of view in degrees
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4> {
    validate_fov(fov)?;
    validate_aspect(aspect)?;
    validate_clip_planes(near, far)?;
    Ok(perspective_unchecked(fov, aspect, near, far))
}

/// Orthographic projection of a frustum `height` units tall
pub fn orthographic(height: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4> {
    validate_ortho_size(height)?;
    validate_aspect(aspect)?;
    validate_clip_planes(near, far)?;
    Ok(orthographic_unchecked(height, aspect, near, far))
}

#[rustfmt::skip]
fn perspective_unchecked(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let t = (fov.to_radians() / 2.0).tan();
    Mat4::new(
        1.0 / (t * aspect), 0.0, 0.0, 0.0,
        0.0, 1.0 / t, 0.0, 0.0,
        0.0, 0.0, (near + far) / (near - far), (2.0 * far * near) / (near - far),
        0.0, 0.0, -1.0, 0.0,
    )
}

#[rustfmt::skip]
fn orthographic_unchecked(height: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let width = height * aspect;
    let (r, t) = (width / 2.0, height / 2.0);
    let (l, b) = (-r, -t);
    Mat4::new(
        2.0 / (r - l), 0.0, 0.0, -(r + l) / (r - l),
        0.0, 2.0 / (t - b), 0.0, -(t + b) / (t - b),
        0.0, 0.0, -2.0 / (far - near), -(far + near) / (far - near),
        0.0, 0.0, 0.0, 1.0,
    )
}

fn validate_clip_planes(near: f32, far: f32) -> Result<()> {
    if !(near > 0.0 && far > near && far.is_finite()) {
        return Err(Error::InvalidClipPlanes { near, far });
    }
    Ok(())
}

fn validate_aspect(aspect: f32) -> Result<()> {
    if !(aspect > 0.0 && aspect.is_finite()) {
        return Err(Error::InvalidAspectRatio(aspect));
    }
    Ok(())
}

fn validate_fov(fov: f32) -> Result<()> {
    if !(fov > 0.0 && fov < 180.0) {
        return Err(Error::InvalidFov(fov));
    }
    Ok(())
}

fn validate_ortho_size(size: f32) -> Result<()> {
    if !(size > 0.0 && size.is_finite()) {
        return Err(Error::InvalidOrthoSize(size));
    }
    Ok(())
}

fn rejected(err: Error) -> Error {
    log::warn!("Rejected camera change: {}", err);
    err
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering.
///
/// `position` and `target` are free to change every frame. The remaining
/// parameters carry invariants (`0 < near < far`, positive aspect ratio and
/// ortho size, fov inside (0, 180) degrees) and are only changed through the
/// validating setters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub mode: ProjectionMode,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    ortho_size: f32,
}

impl Camera {
    pub const DEFAULT_FOV: f32 = 60.0;
    pub const DEFAULT_ORTHO_SIZE: f32 = 6.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 100.0;

    /// Camera at (0, 0, 5) looking at the origin, sized for a `width` x `height` viewport
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_aspect(aspect_of(width, height))
    }

    pub fn with_aspect(aspect: f32) -> Result<Self> {
        validate_aspect(aspect)?;
        Ok(Self {
            aspect,
            ..Self::default()
        })
    }

    /// Restore the default placement and lens, keeping the current aspect ratio
    pub fn reset(&mut self) {
        log::debug!("Resetting camera");
        *self = Self {
            aspect: self.aspect,
            ..Self::default()
        };
    }

    /// Track a framebuffer resize
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.set_aspect_ratio(aspect_of(width, height))
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) -> Result<()> {
        validate_fov(fov).map_err(rejected)?;
        self.fov = fov;
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) -> Result<()> {
        validate_aspect(aspect).map_err(rejected)?;
        self.aspect = aspect;
        Ok(())
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<()> {
        validate_clip_planes(near, far).map_err(rejected)?;
        self.near = near;
        self.far = far;
        Ok(())
    }

    pub fn ortho_size(&self) -> f32 {
        self.ortho_size
    }

    pub fn set_ortho_size(&mut self, size: f32) -> Result<()> {
        validate_ortho_size(size).map_err(rejected)?;
        self.ortho_size = size;
        Ok(())
    }

    pub fn is_orthographic(&self) -> bool {
        self.mode == ProjectionMode::Orthographic
    }

    pub fn set_orthographic(&mut self, orthographic: bool) {
        self.mode = if orthographic {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        };
    }

    pub fn toggle_projection(&mut self) {
        self.set_orthographic(!self.is_orthographic());
    }

    /// Fixed world up vector the view is built against
    pub fn up(&self) -> Vec3 {
        math::world_up()
    }

    /// Create the view matrix (world -> view).
    ///
    /// Looking straight along the up axis yields a degenerate matrix; use
    /// [`Camera::try_view_matrix`] when that has to be detected.
    pub fn view_matrix(&self) -> Mat4 {
        look_at(&self.position, &self.target, &self.up())
    }

    /// View matrix, or [`Error::DegenerateView`] when the look direction is
    /// zero or parallel to up
    pub fn try_view_matrix(&self) -> Result<Mat4> {
        let forward =
            math::try_normalize(&(self.target - self.position)).map_err(|_| Error::DegenerateView)?;
        if forward.cross(&self.up()).norm() < EPSILON {
            return Err(Error::DegenerateView);
        }
        Ok(self.view_matrix())
    }

    /// Create the projection matrix (view -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => {
                perspective_unchecked(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                orthographic_unchecked(self.ortho_size, self.aspect, self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a 3D point to 2D screen space.
    ///
    /// Returns pixel coordinates (origin top-left) and NDC depth, or `None`
    /// when the point lies behind the camera or outside the depth range.
    /// Points off the sides of the screen are still returned so triangles
    /// crossing the border can be clipped by the rasterizer.
    pub fn project_to_screen(
        &self,
        point: &Vec3,
        model_matrix: &Mat4,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection() * model_matrix;
        let clip = mvp * math::point(point);

        // Prevent division by near-zero or negative w
        if clip.w < EPSILON {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::zeros(),
            mode: ProjectionMode::Perspective,
            fov: Self::DEFAULT_FOV,
            aspect: 4.0 / 3.0,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            ortho_size: Self::DEFAULT_ORTHO_SIZE,
        }
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    if height == 0 {
        0.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, transform_point, Vec4};

    fn ndc(m: &Mat4, p: &Vec3) -> Vec3 {
        let clip = m * point(p);
        clip.xyz() / clip.w
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600).unwrap();
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.fov(), 60.0);
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 100.0);
    }

    #[test]
    fn test_zero_height_viewport_is_rejected() {
        assert_eq!(Camera::new(800, 0), Err(Error::InvalidAspectRatio(0.0)));
        let mut camera = Camera::default();
        assert!(camera.resize(0, 0).is_err());
        assert!((camera.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
        camera.resize(1080, 720).unwrap();
        assert!((camera.aspect_ratio() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut camera = Camera::default();
        assert!(camera.set_clip_planes(0.0, 10.0).is_err());
        assert!(camera.set_clip_planes(5.0, 5.0).is_err());
        assert!(camera.set_clip_planes(10.0, 1.0).is_err());
        assert!(camera.set_aspect_ratio(-1.0).is_err());
        assert!(camera.set_fov(0.0).is_err());
        assert!(camera.set_fov(180.0).is_err());
        assert!(camera.set_ortho_size(0.0).is_err());
        assert!(camera.set_aspect_ratio(f32::NAN).is_err());

        // Rejected values leave the camera untouched
        assert_eq!(camera, Camera::default());

        camera.set_clip_planes(1.0, 50.0).unwrap();
        assert_eq!((camera.near(), camera.far()), (1.0, 50.0));
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600).unwrap();
        let view = camera.view_matrix();

        // The target ends up straight ahead (-Z) at the eye distance
        let target = transform_point(&view, &camera.target);
        assert!((target - Vec3::new(0.0, 0.0, -5.0)).norm() < 1e-5);

        // The eye sits at the view-space origin
        let eye = transform_point(&view, &camera.position);
        assert!(eye.norm() < 1e-5);
    }

    #[test]
    fn test_view_matrix_is_rigid() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(3.0, 2.0, -4.0);
        camera.target = Vec3::new(-1.0, 0.5, 2.0);
        let view = camera.try_view_matrix().unwrap();

        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-2.0, 0.0, 1.0);
        let before = (a - b).norm();
        let after = (transform_point(&view, &a) - transform_point(&view, &b)).norm();
        assert!((before - after).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_view_is_reported() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 5.0, 0.0);
        camera.target = Vec3::zeros();
        assert_eq!(camera.try_view_matrix(), Err(Error::DegenerateView));

        camera.target = camera.position;
        assert_eq!(camera.try_view_matrix(), Err(Error::DegenerateView));
    }

    #[test]
    fn test_perspective_depth_range() {
        let projection = perspective(90.0, 1.0, 0.1, 100.0).unwrap();

        let near = ndc(&projection, &Vec3::new(0.0, 0.0, -0.1));
        let far = ndc(&projection, &Vec3::new(0.0, 0.0, -100.0));
        assert!((near.z + 1.0).abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);

        // With a 90 degree fov the frustum edge at depth d sits at x = d
        let edge = ndc(&projection, &Vec3::new(2.0, 0.0, -2.0));
        assert!((edge.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_camera_perspective_matches_free_function() {
        let mut camera = Camera::with_aspect(1.0).unwrap();
        camera.set_fov(90.0).unwrap();
        let expected = perspective(90.0, 1.0, 0.1, 100.0).unwrap();
        assert!((camera.projection_matrix() - expected).norm() < 1e-6);

        let clip = camera.projection_matrix() * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_orthographic_depth_range() {
        let mut camera = Camera::with_aspect(2.0).unwrap();
        camera.set_orthographic(true);
        let projection = camera.projection_matrix();

        let near = ndc(&projection, &Vec3::new(0.0, 0.0, -camera.near()));
        let far = ndc(&projection, &Vec3::new(0.0, 0.0, -camera.far()));
        assert!((near.z + 1.0).abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);

        // Height 6, width 12: the corner (6, 3) maps to (1, 1) at any depth
        let corner = ndc(&projection, &Vec3::new(6.0, 3.0, -42.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_free_functions_validate() {
        assert!(perspective(60.0, 1.0, 10.0, 1.0).is_err());
        assert!(perspective(60.0, 0.0, 0.1, 1.0).is_err());
        assert!(orthographic(-1.0, 1.0, 0.1, 1.0).is_err());
    }

    #[test]
    fn test_toggle_projection_and_reset() {
        let mut camera = Camera::new(1080, 720).unwrap();
        camera.toggle_projection();
        assert!(camera.is_orthographic());
        camera.position = Vec3::new(9.0, 9.0, 9.0);
        camera.set_fov(30.0).unwrap();

        camera.reset();
        assert!(!camera.is_orthographic());
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.fov(), Camera::DEFAULT_FOV);
        assert!((camera.aspect_ratio() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_project_to_screen() {
        let camera = Camera::new(800, 600).unwrap();
        let model = Mat4::identity();

        let (x, y, depth) = camera
            .project_to_screen(&Vec3::zeros(), &model, 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);

        // Up in the world is up on screen, which is a smaller row index
        let (_, y_up, _) = camera
            .project_to_screen(&Vec3::new(0.0, 1.0, 0.0), &model, 800, 600)
            .unwrap();
        assert!(y_up < y);

        // Behind the camera
        assert!(camera
            .project_to_screen(&Vec3::new(0.0, 0.0, 10.0), &model, 800, 600)
            .is_none());
    }
}
