use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position: position.to_array(), normal: normal.to_array(), uv: uv.to_array() }
    }

    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
                wgpu::VertexAttribute { offset: 24, shader_location: 2, format: wgpu::VertexFormat::Float32x2 },
            ],
        }
    }
}

/// Parametric shapes the kitchen is assembled from. Orientation follows the usual
/// scene-graph conventions: cylinders stand along +Y, planes and rings face +Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Box { size: Vec3 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, segments: u32 },
    Plane { width: f32, height: f32 },
    Ring { inner_radius: f32, outer_radius: f32, segments: u32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
}

/// Hashable identity of a primitive's parameters, used to share GPU buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveKey([u32; 5]);

const PLANE_HALF_THICKNESS: f32 = 1e-3;

impl Primitive {
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Primitive::Box { size: Vec3::new(x, y, z) }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Primitive::Cylinder { radius_top, radius_bottom, height, segments }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Primitive::Plane { width, height }
    }

    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Self {
        Primitive::Ring { inner_radius, outer_radius, segments }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Primitive::Sphere { radius, width_segments, height_segments }
    }

    pub fn key(&self) -> PrimitiveKey {
        PrimitiveKey(match *self {
            Primitive::Box { size } => [0, size.x.to_bits(), size.y.to_bits(), size.z.to_bits(), 0],
            Primitive::Cylinder { radius_top, radius_bottom, height, segments } => {
                [1, radius_top.to_bits(), radius_bottom.to_bits(), height.to_bits(), segments]
            }
            Primitive::Plane { width, height } => [2, width.to_bits(), height.to_bits(), 0, 0],
            Primitive::Ring { inner_radius, outer_radius, segments } => {
                [3, inner_radius.to_bits(), outer_radius.to_bits(), segments, 0]
            }
            Primitive::Sphere { radius, width_segments, height_segments } => {
                [4, radius.to_bits(), width_segments, height_segments, 0]
            }
        })
    }

    /// Local-space axis-aligned extents, computed analytically.
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        let half = match *self {
            Primitive::Box { size } => size * 0.5,
            Primitive::Cylinder { radius_top, radius_bottom, height, .. } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            Primitive::Plane { width, height } => Vec3::new(width * 0.5, height * 0.5, PLANE_HALF_THICKNESS),
            Primitive::Ring { outer_radius, .. } => Vec3::new(outer_radius, outer_radius, PLANE_HALF_THICKNESS),
            Primitive::Sphere { radius, .. } => Vec3::splat(radius),
        };
        (-half, half)
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub bounds: MeshBounds,
}

#[derive(Clone, Debug)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub radius: f32,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let bounds = MeshBounds::from_vertices(&vertices);
        Self { vertices, indices, bounds }
    }

    pub fn from_primitive(primitive: &Primitive) -> Self {
        match *primitive {
            Primitive::Box { size } => Self::cuboid(size),
            Primitive::Cylinder { radius_top, radius_bottom, height, segments } => {
                Self::cylinder(radius_top, radius_bottom, height, segments)
            }
            Primitive::Plane { width, height } => Self::plane(width, height),
            Primitive::Ring { inner_radius, outer_radius, segments } => {
                Self::ring(inner_radius, outer_radius, segments)
            }
            Primitive::Sphere { radius, width_segments, height_segments } => {
                Self::sphere(radius, width_segments, height_segments)
            }
        }
    }

    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let positions = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let uv_quad = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
        let mut vertices = Vec::with_capacity(24);
        let mut write_face = |indices: [usize; 4], normal: Vec3| {
            for (i, &index) in indices.iter().enumerate() {
                vertices.push(MeshVertex::new(positions[index], normal, uv_quad[i]));
            }
        };

        write_face([0, 3, 2, 1], Vec3::NEG_Z); // back
        write_face([4, 5, 6, 7], Vec3::Z); // front
        write_face([0, 4, 7, 3], Vec3::NEG_X); // left
        write_face([1, 2, 6, 5], Vec3::X); // right
        write_face([3, 7, 6, 2], Vec3::Y); // top
        write_face([0, 1, 5, 4], Vec3::NEG_Y); // bottom

        let mut indices = Vec::with_capacity(36);
        for face in 0..6 {
            let base = face * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(vertices, indices)
    }

    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let vertices = vec![
            MeshVertex::new(Vec3::new(-hw, -hh, 0.0), Vec3::Z, Vec2::new(0.0, 0.0)),
            MeshVertex::new(Vec3::new(hw, -hh, 0.0), Vec3::Z, Vec2::new(1.0, 0.0)),
            MeshVertex::new(Vec3::new(hw, hh, 0.0), Vec3::Z, Vec2::new(1.0, 1.0)),
            MeshVertex::new(Vec3::new(-hw, hh, 0.0), Vec3::Z, Vec2::new(0.0, 1.0)),
        ];
        Self::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height * 0.5;
        let slope = if height > 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            vertices.push(MeshVertex::new(
                Vec3::new(radius_top * sin, half, radius_top * cos),
                normal,
                Vec2::new(u, 1.0),
            ));
            vertices.push(MeshVertex::new(
                Vec3::new(radius_bottom * sin, -half, radius_bottom * cos),
                normal,
                Vec2::new(u, 0.0),
            ));
        }
        for i in 0..segments {
            let top = i * 2;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;
            indices.extend_from_slice(&[top, bottom, next_bottom, top, next_bottom, next_top]);
        }

        for (radius, y, normal) in [(radius_top, half, Vec3::Y), (radius_bottom, -half, Vec3::NEG_Y)] {
            if radius <= 0.0 {
                continue;
            }
            let center = vertices.len() as u32;
            vertices.push(MeshVertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5)));
            for i in 0..=segments {
                let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
                vertices.push(MeshVertex::new(
                    Vec3::new(radius * sin, y, radius * cos),
                    normal,
                    Vec2::new(0.5 + sin * 0.5, 0.5 + cos * 0.5),
                ));
            }
            for i in 0..segments {
                indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
            }
        }
        Self::new(vertices, indices)
    }

    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity(((segments + 1) * 2) as usize);
        let mut indices = Vec::with_capacity((segments * 6) as usize);
        for i in 0..=segments {
            let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
            for radius in [inner_radius, outer_radius] {
                let position = Vec3::new(radius * cos, radius * sin, 0.0);
                let uv = Vec2::new(position.x / outer_radius + 1.0, position.y / outer_radius + 1.0) * 0.5;
                vertices.push(MeshVertex::new(position, Vec3::Z, uv));
            }
        }
        for i in 0..segments {
            let inner = i * 2;
            let outer = inner + 1;
            indices.extend_from_slice(&[inner, outer, outer + 2, inner, outer + 2, inner + 2]);
        }
        Self::new(vertices, indices)
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for y in 0..=height_segments {
            let v = y as f32 / height_segments as f32;
            let (sin_theta, cos_theta) = (v * std::f32::consts::PI).sin_cos();
            for x in 0..=width_segments {
                let u = x as f32 / width_segments as f32;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                vertices.push(MeshVertex::new(normal * radius, normal, Vec2::new(u, 1.0 - v)));
            }
        }
        let stride = width_segments + 1;
        for y in 0..height_segments {
            for x in 0..width_segments {
                let a = y * stride + x;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }
        Self::new(vertices, indices)
    }
}

impl MeshBounds {
    pub fn from_vertices(vertices: &[MeshVertex]) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for vertex in vertices {
            let pos = Vec3::from_array(vertex.position);
            min = min.min(pos);
            max = max.max(pos);
        }
        if vertices.is_empty() {
            return MeshBounds { min: Vec3::ZERO, max: Vec3::ZERO, center: Vec3::ZERO, radius: 0.0 };
        }
        let center = (min + max) * 0.5;
        let mut radius: f32 = 0.0;
        for vertex in vertices {
            let pos = Vec3::from_array(vertex.position);
            radius = radius.max((pos - center).length());
        }
        MeshBounds { min, max, center, radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &Mesh) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count), "index out of range");
    }

    #[test]
    fn generated_bounds_match_analytic_bounds() {
        let primitives = [
            Primitive::cuboid(1.0, 2.0, 0.5),
            Primitive::cylinder(0.05, 0.05, 0.03, 32),
            Primitive::cylinder(0.1, 0.08, 0.12, 16),
            Primitive::sphere(0.08, 16, 16),
        ];
        for primitive in primitives {
            let mesh = Mesh::from_primitive(&primitive);
            assert_indices_in_range(&mesh);
            let (min, max) = primitive.local_bounds();
            assert!((mesh.bounds.min - min).abs().max_element() < 1e-4, "{primitive:?} min");
            assert!((mesh.bounds.max - max).abs().max_element() < 1e-4, "{primitive:?} max");
        }
    }

    #[test]
    fn flat_primitives_face_positive_z() {
        for mesh in [Mesh::plane(2.0, 1.0), Mesh::ring(0.05, 0.13, 32)] {
            assert_indices_in_range(&mesh);
            assert!(mesh.vertices.iter().all(|v| v.position[2] == 0.0 && v.normal == [0.0, 0.0, 1.0]));
        }
    }

    #[test]
    fn keys_distinguish_parameters() {
        assert_eq!(Primitive::cuboid(1.0, 1.0, 1.0).key(), Primitive::cuboid(1.0, 1.0, 1.0).key());
        assert_ne!(Primitive::cuboid(1.0, 1.0, 1.0).key(), Primitive::cuboid(1.0, 1.0, 2.0).key());
        assert_ne!(Primitive::plane(1.0, 1.0).key(), Primitive::ring(1.0, 1.0, 0).key());
    }
}
