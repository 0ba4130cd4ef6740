//! Preset scenes built from the procedural generators

use rtg_core::{procgen, MeshData, Transform, Vec3};

use crate::config::SceneKind;

/// Skybox half-extent; stays inside the default far plane from any corner view
const SKYBOX_SCALE: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: MeshData,
    pub transform: Transform,
    /// Rotate around Y over time
    pub spins: bool,
    /// Re-centre on the camera every frame, like a skybox with the view
    /// translation stripped
    pub follows_camera: bool,
}

impl SceneObject {
    fn new(name: &'static str, mesh: MeshData, transform: Transform) -> Self {
        Self {
            name,
            mesh,
            transform,
            spins: false,
            follows_camera: false,
        }
    }

    fn spinning(mut self) -> Self {
        self.spins = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub kind: SceneKind,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn build(kind: SceneKind) -> rtg_core::Result<Self> {
        let objects = match kind {
            SceneKind::Camera => cube_grid()?,
            SceneKind::Shapes => shapes()?,
            SceneKind::Pond => pond()?,
        };
        for object in &objects {
            object.transform.validate()?;
        }

        let triangles: usize = objects.iter().map(|o| o.mesh.triangle_count()).sum();
        log::debug!(
            "Built {:?} scene: {} objects, {} triangles",
            kind,
            objects.len(),
            triangles
        );
        Ok(Self { kind, objects })
    }

    /// Advance the spin animation by `degrees` of yaw
    pub fn spin(&mut self, degrees: f32) {
        for object in self.objects.iter_mut().filter(|o| o.spins) {
            object.transform.rotate(0.0, degrees, 0.0);
            object.transform.rotation.y %= 360.0;
        }
    }
}

// Four unit-half cubes on a 2x2 grid centred on the origin
fn cube_grid() -> rtg_core::Result<Vec<SceneObject>> {
    let cube = procgen::cube(0.5)?;
    Ok((0..4)
        .map(|i| {
            let position = Vec3::new((i % 2) as f32 - 0.5, (i / 2) as f32 - 0.5, 0.0);
            SceneObject::new("cube", cube.clone(), Transform::from_position(position)).spinning()
        })
        .collect())
}

fn shapes() -> rtg_core::Result<Vec<SceneObject>> {
    Ok(vec![
        SceneObject::new(
            "sphere",
            procgen::sphere(0.8, 16)?,
            Transform::from_position(Vec3::new(-3.0, 0.0, 0.0)),
        )
        .spinning(),
        SceneObject::new(
            "cylinder",
            procgen::cylinder(1.5, 0.6, 16)?,
            Transform::from_position(Vec3::new(-1.0, 0.0, 0.0)).with_rotation(Vec3::new(
                20.0, 0.0, 0.0,
            )),
        )
        .spinning(),
        // Tilted toward the camera so the top face is visible
        SceneObject::new(
            "disc",
            procgen::disc(0.8, 16)?,
            Transform::from_position(Vec3::new(1.0, 0.0, 0.0)).with_rotation(Vec3::new(
                60.0, 0.0, 0.0,
            )),
        ),
        // The plane grows toward +X and -Z from its origin
        SceneObject::new(
            "plane",
            procgen::plane(1.6, 4)?,
            Transform::from_position(Vec3::new(2.2, -0.8, 0.8)).with_rotation(Vec3::new(
                30.0, 0.0, 0.0,
            )),
        ),
    ])
}

fn pond() -> rtg_core::Result<Vec<SceneObject>> {
    let mut sky = SceneObject::new(
        "skybox",
        procgen::skybox(SKYBOX_SCALE)?,
        Transform::new(),
    );
    sky.follows_camera = true;

    Ok(vec![
        sky,
        SceneObject::new(
            "pond",
            procgen::disc(3.0, 24)?,
            Transform::from_position(Vec3::new(0.0, -1.0, 0.0)),
        ),
    ])
}
