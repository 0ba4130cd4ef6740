//! First-person fly camera driven by raw pointer and key polling

use std::collections::HashSet;

use crate::error::Result;
use crate::math::{self, Vec3};
use crate::projection::Camera;

/// Pitch is kept strictly inside +-90 degrees so forward never lines up with world up
pub const PITCH_LIMIT: f32 = 89.0;

/// Movement keys the controls react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Sprint,
}

/// Snapshot of the raw input for one frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Whether the "look" button (right mouse in most frontends) is held
    pub look_held: bool,
    /// Pointer position in screen units
    pub cursor: (f64, f64),
    keys_down: HashSet<MoveKey>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: MoveKey) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.keys_down.remove(&key);
    }

    pub fn key_down(&self, key: MoveKey) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }
}

/// What the frontend should do with the pointer after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Hide and lock the pointer while looking around
    Captured,
    /// Give the pointer back to the user
    Released,
}

/// Yaw/pitch state and tuning for [`update_camera_controls`]
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControls {
    /// Degrees, 0 looks down -Z
    pub yaw: f32,
    /// Degrees, positive looks up
    pub pitch: f32,
    /// Degrees per screen unit of pointer motion
    pub mouse_sensitivity: f32,
    /// World units per second
    pub move_speed: f32,
    /// World units per second while [`MoveKey::Sprint`] is held
    pub sprint_speed: f32,
    pub prev_mouse: (f64, f64),
    /// Set while the next pointer sample should only seed `prev_mouse`
    pub first_mouse: bool,
}

impl CameraControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look straight ahead again and forget the last pointer sample
    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.first_mouse = true;
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_angles(self.yaw, self.pitch)
    }

    /// Take yaw and pitch from where `camera` currently looks, so the first
    /// grab continues from the existing view instead of snapping to -Z.
    pub fn aim_at(&mut self, camera: &Camera) -> Result<()> {
        let dir = math::try_normalize(&(camera.target - camera.position))?;
        self.yaw = dir.x.atan2(-dir.z).to_degrees();
        self.pitch = dir.y.asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.first_mouse = true;
        Ok(())
    }
}

impl Default for CameraControls {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            mouse_sensitivity: 0.1,
            move_speed: 5.0,
            sprint_speed: 10.0,
            prev_mouse: (0.0, 0.0),
            first_mouse: true,
        }
    }
}

/// Unit view direction for yaw/pitch in degrees
pub fn forward_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

/// Advance the fly camera by one frame.
///
/// Nothing moves unless the look button is held. The first sample after the
/// button goes down only records the pointer position, so grabbing the view
/// never makes it jump. `dt` must be the real time since the previous frame.
pub fn update_camera_controls(
    input: &InputState,
    camera: &mut Camera,
    controls: &mut CameraControls,
    dt: f32,
) -> CursorMode {
    if !input.look_held {
        controls.first_mouse = true;
        return CursorMode::Released;
    }

    let (mouse_x, mouse_y) = input.cursor;
    if controls.first_mouse {
        controls.first_mouse = false;
        controls.prev_mouse = (mouse_x, mouse_y);
    }

    let sensitivity = f64::from(controls.mouse_sensitivity);
    controls.yaw += ((mouse_x - controls.prev_mouse.0) * sensitivity) as f32;
    controls.pitch -= ((mouse_y - controls.prev_mouse.1) * sensitivity) as f32;
    controls.pitch = controls.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    controls.prev_mouse = (mouse_x, mouse_y);

    let forward = controls.forward();
    // Pitch never reaches +-90, so neither cross product can vanish
    let right = forward.cross(&math::world_up()).normalize();
    let up = right.cross(&forward).normalize();

    let speed = if input.key_down(MoveKey::Sprint) {
        controls.sprint_speed
    } else {
        controls.move_speed
    };
    let step = speed * dt;

    let moves = [
        (MoveKey::Forward, forward),
        (MoveKey::Backward, -forward),
        (MoveKey::Right, right),
        (MoveKey::Left, -right),
        (MoveKey::Up, up),
        (MoveKey::Down, -up),
    ];
    for (key, direction) in moves {
        if input.key_down(key) {
            camera.position += direction * step;
        }
    }

    camera.target = camera.position + forward;
    CursorMode::Captured
}
