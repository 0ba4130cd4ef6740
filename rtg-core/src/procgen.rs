//! Procedural mesh generators.
//!
//! All shapes share one winding convention: triangles are counter-clockwise
//! when viewed from the side their normals face, so a single back-face cull
//! setting works for every mesh. Ring-based shapes emit `segments + 1`
//! vertices per ring; the first and last coincide in space but carry
//! different texture coordinates so the UV seam stays clean.

use std::f32::consts::{PI, TAU};

use crate::error::{Error, Result};
use crate::geometry::{MeshData, Vertex};
use crate::math::{Vec2, Vec3};

/// Fewest segments that still enclose a volume
pub const MIN_SEGMENTS: u32 = 3;
pub const MIN_SUBDIVISIONS: u32 = 1;
/// Upper bound for segments and subdivisions. A `(n + 1)^2` grid at this size
/// still has every vertex and index count well inside `u32`.
pub const MAX_SEGMENTS: u32 = 4096;

fn check_segments(shape: &'static str, got: u32, min: u32) -> Result<()> {
    if got < min {
        return Err(Error::TooFewSegments { shape, got, min });
    }
    if got > MAX_SEGMENTS {
        return Err(Error::TooManySegments {
            shape,
            got,
            max: MAX_SEGMENTS,
        });
    }
    Ok(())
}

fn check_dimension(shape: &'static str, name: &'static str, value: f32) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(Error::InvalidDimension { shape, name, value });
    }
    Ok(())
}

fn log_generated(shape: &str, mesh: &MeshData) {
    log::debug!(
        "Generated {}: {} vertices, {} triangles",
        shape,
        mesh.vertices.len(),
        mesh.triangle_count()
    );
}

/// Planar texture coordinates for a point on a unit circle
fn cap_uv(theta: f32) -> Vec2 {
    Vec2::new((theta.cos() + 1.0) / 2.0, (theta.sin() + 1.0) / 2.0)
}

/// Push a horizontal ring of `segments + 1` vertices and return the first index.
///
/// `attributes` maps (angle, ring position) to the vertex normal and UV.
fn push_ring<F>(mesh: &mut MeshData, segments: u32, radius: f32, y: f32, attributes: F) -> u32
where
    F: Fn(f32, u32) -> (Vec3, Vec2),
{
    let start = mesh.vertices.len() as u32;
    let theta_step = TAU / segments as f32;
    for i in 0..=segments {
        let theta = i as f32 * theta_step;
        let position = Vec3::new(theta.cos() * radius, y, theta.sin() * radius);
        let (normal, uv) = attributes(theta, i);
        mesh.push_vertex(Vertex::new(position, normal, uv));
    }
    start
}

/// UV sphere centered on the origin.
///
/// `(segments + 1)^2` vertices on a latitude/longitude grid, row 0 at the +Y
/// pole. The pole rows are closed with triangle fans, the rows in between with
/// two triangles per quad, for `6 * segments * (segments - 1)` indices.
pub fn sphere(radius: f32, segments: u32) -> Result<MeshData> {
    check_dimension("sphere", "radius", radius)?;
    check_segments("sphere", segments, MIN_SEGMENTS)?;

    let n = segments;
    let columns = n + 1;
    let mut mesh =
        MeshData::with_capacity((columns * columns) as usize, (6 * n * (n - 1)) as usize);

    let theta_step = TAU / n as f32;
    let phi_step = PI / n as f32;
    for row in 0..=n {
        let phi = row as f32 * phi_step;
        for col in 0..=n {
            let theta = col as f32 * theta_step;
            let normal = Vec3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            let uv = Vec2::new(col as f32 / n as f32, 1.0 - row as f32 / n as f32);
            mesh.push_vertex(Vertex::new(normal * radius, normal, uv));
        }
    }

    // Top pole: row 0 holds one pole vertex per column
    for col in 0..n {
        let ring = columns + col;
        mesh.push_triangle(ring, col, ring + 1);
    }

    for row in 1..n - 1 {
        for col in 0..n {
            let start = row * columns + col;
            mesh.push_triangle(start, start + 1, start + columns);
            mesh.push_triangle(start + 1, start + columns + 1, start + columns);
        }
    }

    // Bottom pole
    let ring_start = (n - 1) * columns;
    let pole_start = n * columns;
    for col in 0..n {
        let ring = ring_start + col;
        mesh.push_triangle(ring, ring + 1, pole_start + col);
    }

    log_generated("sphere", &mesh);
    Ok(mesh)
}

/// Capped cylinder centered on the origin, axis along Y.
///
/// Vertex layout: top center, top cap ring, top side ring, bottom side ring,
/// bottom cap ring, bottom center, `4 * (segments + 1) + 2` in total. Cap and
/// side rings are separate because their normals differ. Indices: a fan of
/// `segments` triangles per cap plus two triangles per side quad, `12 * segments`.
pub fn cylinder(height: f32, radius: f32, segments: u32) -> Result<MeshData> {
    check_dimension("cylinder", "height", height)?;
    check_dimension("cylinder", "radius", radius)?;
    check_segments("cylinder", segments, MIN_SEGMENTS)?;

    let n = segments;
    let top_y = height / 2.0;
    let bottom_y = -top_y;
    let mut mesh = MeshData::with_capacity((4 * (n + 1) + 2) as usize, (12 * n) as usize);

    let up = Vec3::y();
    let down = -Vec3::y();
    let side_normal = |theta: f32| Vec3::new(theta.cos(), 0.0, theta.sin());
    let side_u = |i: u32| i as f32 / n as f32;

    let top_center =
        mesh.push_vertex(Vertex::new(Vec3::new(0.0, top_y, 0.0), up, Vec2::new(0.5, 0.5)));
    let top_cap = push_ring(&mut mesh, n, radius, top_y, |theta, _| (up, cap_uv(theta)));
    let top_side = push_ring(&mut mesh, n, radius, top_y, |theta, i| {
        (side_normal(theta), Vec2::new(side_u(i), 1.0))
    });
    let bottom_side = push_ring(&mut mesh, n, radius, bottom_y, |theta, i| {
        (side_normal(theta), Vec2::new(side_u(i), 0.0))
    });
    let bottom_cap = push_ring(&mut mesh, n, radius, bottom_y, |theta, _| (down, cap_uv(theta)));
    let bottom_center =
        mesh.push_vertex(Vertex::new(Vec3::new(0.0, bottom_y, 0.0), down, Vec2::new(0.5, 0.5)));

    for i in 0..n {
        mesh.push_triangle(top_cap + i, top_center, top_cap + i + 1);
    }

    for i in 0..n {
        let top = top_side + i;
        let bottom = bottom_side + i;
        mesh.push_triangle(top, top + 1, bottom);
        mesh.push_triangle(top + 1, bottom + 1, bottom);
    }

    for i in 0..n {
        mesh.push_triangle(bottom_cap + i, bottom_cap + i + 1, bottom_center);
    }

    log_generated("cylinder", &mesh);
    Ok(mesh)
}

/// Flat grid on the XZ plane facing +Y.
///
/// Spans from the origin to `(size, 0, -size)` with `(subdivisions + 1)^2`
/// vertices and two triangles per cell.
pub fn plane(size: f32, subdivisions: u32) -> Result<MeshData> {
    check_dimension("plane", "size", size)?;
    check_segments("plane", subdivisions, MIN_SUBDIVISIONS)?;

    let s = subdivisions;
    let columns = s + 1;
    let mut mesh = MeshData::with_capacity((columns * columns) as usize, (6 * s * s) as usize);

    for row in 0..=s {
        for col in 0..=s {
            let u = col as f32 / s as f32;
            let v = row as f32 / s as f32;
            let position = Vec3::new(size * u, 0.0, -size * v);
            mesh.push_vertex(Vertex::new(position, Vec3::y(), Vec2::new(u, v)));
        }
    }

    for row in 0..s {
        for col in 0..s {
            let start = row * columns + col;
            mesh.push_triangle(start, start + 1, start + columns + 1);
            mesh.push_triangle(start, start + columns + 1, start + columns);
        }
    }

    log_generated("plane", &mesh);
    Ok(mesh)
}

/// Flat disc on the XZ plane facing +Y, e.g. a pond surface.
///
/// One center vertex plus a ring of `segments + 1`, closed with a fan of
/// `segments` triangles.
pub fn disc(radius: f32, segments: u32) -> Result<MeshData> {
    check_dimension("disc", "radius", radius)?;
    check_segments("disc", segments, MIN_SEGMENTS)?;

    let n = segments;
    let mut mesh = MeshData::with_capacity((n + 2) as usize, (3 * n) as usize);

    let center = mesh.push_vertex(Vertex::new(Vec3::zeros(), Vec3::y(), Vec2::new(0.5, 0.5)));
    let ring = push_ring(&mut mesh, n, radius, 0.0, |theta, _| (Vec3::y(), cap_uv(theta)));

    for i in 0..n {
        mesh.push_triangle(ring + i, center, ring + i + 1);
    }

    log_generated("disc", &mesh);
    Ok(mesh)
}

/// Axis-aligned cube of edge length `size`, centered on the origin.
///
/// Each face has its own four vertices so normals stay flat: 24 vertices,
/// 36 indices.
pub fn cube(size: f32) -> Result<MeshData> {
    check_dimension("cube", "size", size)?;

    // (normal, u axis, v axis) with u x v == normal
    let faces = [
        (Vec3::x(), -Vec3::z(), Vec3::y()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::x(), -Vec3::z()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), -Vec3::x(), Vec3::y()),
    ];
    let corners: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let half = size / 2.0;
    let mut mesh = MeshData::with_capacity(24, 36);
    for (normal, u, v) in faces {
        let start = mesh.vertices.len() as u32;
        for (cu, cv) in corners {
            let position = (normal + u * cu + v * cv) * half;
            let uv = Vec2::new((cu + 1.0) / 2.0, (cv + 1.0) / 2.0);
            mesh.push_vertex(Vertex::new(position, normal, uv));
        }
        mesh.push_triangle(start, start + 1, start + 2);
        mesh.push_triangle(start, start + 2, start + 3);
    }

    log_generated("cube", &mesh);
    Ok(mesh)
}

/// Cube seen from the inside, extending `scale` units from the origin on every axis.
///
/// Winding and normals face inward so the box survives back-face culling
/// with the camera at its center.
pub fn skybox(scale: f32) -> Result<MeshData> {
    check_dimension("skybox", "scale", scale)?;

    let mut mesh = cube(scale * 2.0)?;
    for vertex in &mut mesh.vertices {
        vertex.normal = -vertex.normal;
    }
    for triangle in mesh.indices.chunks_exact_mut(3) {
        triangle.swap(1, 2);
    }

    log_generated("skybox", &mesh);
    Ok(mesh)
}
