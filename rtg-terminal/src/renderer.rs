//! ASCII rasterizer for terminal rendering

use std::io::Write;

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use rtg_core::{geometry::face_normal, math, Camera, Mat4, MeshData, Vec3, Vec4};

use crate::config::LightConfig;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Directional light plus an optional point light, shaded Blinn-Phong style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Unit vector from the surface toward the light
    pub direction: Vec3,
    pub ambient: f32,
    /// World-space position of the point light
    pub point: Option<Vec3>,
    /// Highlight strength, 0..1
    pub specular: f32,
    pub shininess: f32,
}

impl Light {
    /// Diffuse-only directional light
    pub fn new(direction: &Vec3, ambient: f32) -> rtg_core::Result<Self> {
        Ok(Self {
            direction: math::try_normalize(direction)?,
            ambient: ambient.clamp(0.0, 1.0),
            point: None,
            specular: 0.0,
            shininess: 1.0,
        })
    }

    pub fn with_point(mut self, position: Vec3) -> Self {
        self.point = Some(position);
        self
    }

    pub fn with_specular(mut self, specular: f32, shininess: f32) -> Self {
        self.specular = specular.clamp(0.0, 1.0);
        self.shininess = shininess.max(1.0);
        self
    }

    pub fn from_config(config: &LightConfig) -> rtg_core::Result<Self> {
        let light = Self::new(&Vec3::from(config.direction), config.ambient)?
            .with_specular(config.specular, config.shininess);
        Ok(match config.point {
            Some(position) => light.with_point(Vec3::from(position)),
            None => light,
        })
    }

    /// Brightness in 0..=1 for a surface point with unit normal `normal`,
    /// seen from `eye`
    pub fn brightness(&self, normal: &Vec3, surface: &Vec3, eye: &Vec3) -> f32 {
        let to_eye = math::try_normalize(&(eye - surface)).ok();
        let to_point = self
            .point
            .and_then(|p| math::try_normalize(&(p - surface)).ok());

        let mut diffuse = 0.0;
        let mut highlight = 0.0;
        for to_light in std::iter::once(self.direction).chain(to_point) {
            diffuse += normal.dot(&to_light).max(0.0);
            if let Some(half) = to_eye.and_then(|v| math::try_normalize(&(to_light + v)).ok()) {
                highlight += normal.dot(&half).max(0.0).powf(self.shininess);
            }
        }

        let lit = self.ambient + (1.0 - self.ambient) * diffuse.min(1.0);
        (lit + self.specular * highlight).min(1.0)
    }
}

/// Screen-space vertex: column, row, NDC depth
type ScreenPoint = (f32, f32, f32);

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    clip_coords: Vec<Vec4>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            clip_coords: Vec::new(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.char_buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Rasterize every front-facing triangle of `mesh` placed by `model_matrix`.
    ///
    /// Triangles are clipped against the near and far planes before the
    /// perspective divide, so geometry around the camera keeps the part in
    /// front of it.
    pub fn render_mesh(
        &mut self,
        mesh: &MeshData,
        model_matrix: &Mat4,
        camera: &Camera,
        light: &Light,
    ) {
        let mvp = camera.view_projection() * model_matrix;
        let mut clip_coords = std::mem::take(&mut self.clip_coords);
        clip_coords.clear();
        clip_coords.extend(mesh.vertices.iter().map(|v| mvp * math::point(&v.position)));

        let mut polygon = Vec::with_capacity(8);
        let mut scratch = Vec::with_capacity(8);
        let mut screen = Vec::with_capacity(8);
        for tri in mesh.indices.chunks_exact(3) {
            let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            polygon.clear();
            polygon.extend(corners.iter().map(|&i| clip_coords[i]));
            clip_polygon(&mut polygon, &mut scratch);
            if polygon.len() < 3 || polygon.iter().any(|p| p.w < math::EPSILON) {
                continue;
            }

            screen.clear();
            screen.extend(polygon.iter().map(|p| self.to_screen(p)));
            if !is_front_facing(&screen) {
                continue;
            }

            // Shade from the world-space face so non-uniform scale stays correct
            let world =
                corners.map(|i| math::transform_point(model_matrix, &mesh.vertices[i].position));
            let normal = face_normal(&world[0], &world[1], &world[2]);
            let centroid = (world[0] + world[1] + world[2]) / 3.0;
            let character = shade(light.brightness(&normal, &centroid, &camera.position));

            // Clipped polygons are convex, so a fan covers them
            for i in 1..screen.len() - 1 {
                self.rasterize_triangle(&[screen[0], screen[i], screen[i + 1]], character);
            }
        }

        self.clip_coords = clip_coords;
    }

    fn to_screen(&self, clip: &Vec4) -> ScreenPoint {
        let ndc = clip.xyz() / clip.w;
        (
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
            ndc.z,
        )
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    /// Queue the frame, starting each row with an explicit cursor move since
    /// raw mode does not translate newlines.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];
                let color = color_of(c);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn color_of(c: char) -> Color {
    match c {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        '#' | '%' | '@' => Color::Cyan,
        _ => Color::White,
    }
}

fn shade(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = ((brightness * last as f32).round() as usize).min(last);
    LUMINOSITY_RAMP[index]
}

/// Counter-clockwise in NDC is clockwise on screen, where rows grow downward
fn is_front_facing(polygon: &[ScreenPoint]) -> bool {
    let mut area = 0.0;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        area += a.0 * b.1 - b.0 * a.1;
    }
    area < 0.0
}

/// Signed distance to the near plane in clip space (z >= -w)
fn near_distance(p: &Vec4) -> f32 {
    p.z + p.w
}

/// Signed distance to the far plane in clip space (z <= w)
fn far_distance(p: &Vec4) -> f32 {
    p.w - p.z
}

/// Sutherland-Hodgman clip of a convex polygon against the near and far
/// planes. Leaves `polygon` empty when nothing remains.
fn clip_polygon(polygon: &mut Vec<Vec4>, scratch: &mut Vec<Vec4>) {
    let planes: [fn(&Vec4) -> f32; 2] = [near_distance, far_distance];
    for distance in planes {
        scratch.clear();
        for (i, a) in polygon.iter().enumerate() {
            let b = &polygon[(i + 1) % polygon.len()];
            let (da, db) = (distance(a), distance(b));
            if da >= 0.0 {
                scratch.push(*a);
            }
            if (da >= 0.0) != (db >= 0.0) {
                scratch.push(a + (b - a) * (da / (da - db)));
            }
        }
        std::mem::swap(polygon, scratch);
        if polygon.len() < 3 {
            polygon.clear();
            return;
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
