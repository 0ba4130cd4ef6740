//! RTG Core Library - Shared transform, camera and mesh generation logic
//!
//! This library provides the stateless math behind a real-time renderer:
//! model/view/projection matrix construction, a first-person camera
//! controller and procedural mesh generation. It never touches a graphics API.

pub mod controls;
pub mod error;
pub mod geometry;
pub mod math;
pub mod procgen;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use controls::{update_camera_controls, CameraControls, CursorMode, InputState, MoveKey};
pub use error::{Error, Result};
pub use geometry::{MeshData, Vertex};
pub use math::{Mat4, Vec2, Vec3, Vec4};
pub use projection::{Camera, ProjectionMode};
pub use transform::Transform;
