//! Scene configuration loaded from TOML.
//!
//! Every field is optional; a missing file or section falls back to the
//! defaults below, which match the camera assignment's reset values.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rtg_core::{math, Camera, CameraControls, Vec3};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Which assignment preset to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Four cubes on a grid, free-flying camera
    Camera,
    /// The procedural shapes side by side
    Shapes,
    /// A pond disc under a skybox
    Pond,
}

impl Default for SceneKind {
    fn default() -> Self {
        Self::Shapes
    }
}

impl FromStr for SceneKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "camera" => Ok(Self::Camera),
            "shapes" => Ok(Self::Shapes),
            "pond" => Ok(Self::Pond),
            other => Err(AppError::UnknownScene(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub orthographic: bool,
    pub ortho_size: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov: Camera::DEFAULT_FOV,
            near: Camera::DEFAULT_NEAR,
            far: Camera::DEFAULT_FAR,
            orthographic: false,
            ortho_size: Camera::DEFAULT_ORTHO_SIZE,
        }
    }
}

impl CameraConfig {
    /// Build a validated camera for a viewport with the given aspect ratio
    pub fn build(&self, aspect: f32) -> rtg_core::Result<Camera> {
        let mut camera = Camera::with_aspect(aspect)?;
        camera.position = Vec3::from(self.position);
        camera.target = Vec3::from(self.target);
        camera.set_fov(self.fov)?;
        camera.set_clip_planes(self.near, self.far)?;
        camera.set_ortho_size(self.ortho_size)?;
        camera.set_orthographic(self.orthographic);
        Ok(camera)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Degrees per terminal cell of pointer motion
    pub mouse_sensitivity: f32,
    pub move_speed: f32,
    pub sprint_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        // Terminal cells are much coarser than pixels
        Self {
            mouse_sensitivity: 2.0,
            move_speed: 5.0,
            sprint_speed: 10.0,
        }
    }
}

impl ControlsConfig {
    pub fn build(&self) -> CameraControls {
        CameraControls {
            mouse_sensitivity: self.mouse_sensitivity,
            move_speed: self.move_speed,
            sprint_speed: self.sprint_speed,
            ..CameraControls::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Direction pointing from the surface toward the light
    pub direction: [f32; 3],
    /// Brightness floor for faces turned away from the light, 0..1
    pub ambient: f32,
    /// Optional point light position
    pub point: Option<[f32; 3]>,
    /// Highlight strength, 0..1
    pub specular: f32,
    pub shininess: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.4, 1.0, 0.6],
            ambient: 0.15,
            point: None,
            specular: 0.5,
            shininess: 128.0,
        }
    }
}

impl LightConfig {
    pub fn direction(&self) -> rtg_core::Result<Vec3> {
        math::try_normalize(&Vec3::from(self.direction))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub scene: SceneKind,
    pub target_fps: u32,
    /// Yaw animation applied to spinning objects, degrees per second
    pub spin: f32,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub light: LightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            target_fps: 30,
            spin: 20.0,
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            light: LightConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml(source: &str) -> AppResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml(&source)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Check everything that would otherwise only fail once the app is running
    pub fn validate(&self) -> AppResult<()> {
        self.camera.build(1.0)?;
        self.light.direction()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SceneConfig::from_toml("").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let config = SceneConfig::from_toml(
            r#"
            scene = "pond"
            spin = 0.0

            [camera]
            position = [0.0, 2.0, 8.0]
            orthographic = true

            [controls]
            move_speed = 2.5

            [light]
            point = [0.0, -1.0, 0.0]
            specular = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.scene, SceneKind::Pond);
        assert_eq!(config.spin, 0.0);
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.camera.position, [0.0, 2.0, 8.0]);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.controls.move_speed, 2.5);
        assert_eq!(config.controls.sprint_speed, 10.0);
        assert_eq!(config.light.point, Some([0.0, -1.0, 0.0]));
        assert_eq!(config.light.specular, 0.8);
        assert_eq!(config.light.shininess, 128.0);

        let camera = config.camera.build(2.0).unwrap();
        assert!(camera.is_orthographic());
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 8.0));
    }

    #[test]
    fn test_invalid_camera_is_rejected() {
        let config = SceneConfig::from_toml(
            r#"
            [camera]
            near = 10.0
            far = 1.0
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AppError::Geometry(rtg_core::Error::InvalidClipPlanes { .. }))
        ));
    }

    #[test]
    fn test_zero_light_is_rejected() {
        let config = SceneConfig::from_toml("[light]\ndirection = [0.0, 0.0, 0.0]").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            SceneConfig::from_toml("scene = \"mars\""),
            Err(AppError::Config(_))
        ));
        assert!(SceneConfig::from_toml("target_fps = \"fast\"").is_err());
    }

    #[test]
    fn test_scene_kind_from_str() {
        assert_eq!("Camera".parse::<SceneKind>().unwrap(), SceneKind::Camera);
        assert_eq!("pond".parse::<SceneKind>().unwrap(), SceneKind::Pond);
        assert!(matches!(
            "teapot".parse::<SceneKind>(),
            Err(AppError::UnknownScene(name)) if name == "teapot"
        ));
    }

    #[test]
    fn test_controls_build() {
        let controls = ControlsConfig {
            mouse_sensitivity: 0.5,
            move_speed: 1.0,
            sprint_speed: 3.0,
        }
        .build();
        assert_eq!(controls.mouse_sensitivity, 0.5);
        assert_eq!(controls.sprint_speed, 3.0);
        assert!(controls.first_mouse);
    }
}
