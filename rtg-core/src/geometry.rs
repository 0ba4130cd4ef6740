//! Geometry primitives for 3D rendering

use crate::math::{Vec2, Vec3};

/// A 3D vertex with position, normal and texture coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle list, as uploaded to a vertex/index buffer pair.
///
/// Every three indices form one triangle, wound counter-clockwise when seen
/// from the side its normals point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over the triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Calculate the face normal of a triangle from its winding.
///
/// Returns the zero vector for degenerate (zero-area) triangles.
pub fn face_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1
        .cross(&edge2)
        .try_normalize(crate::math::EPSILON)
        .unwrap_or_else(Vec3::zeros)
}
