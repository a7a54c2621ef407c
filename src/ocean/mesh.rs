//! Planar grid mesh consumed by the displacement and preview passes.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex data for ocean mesh (base position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn base_position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }

    /// Vertex buffer layout (`@location(0)` position, `@location(1)` uv)
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Flat square grid centered on the origin in the XZ plane, +Y up
pub struct OceanGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    subdivisions: usize,
    size: f32,
}

impl OceanGrid {
    /// Create a grid of `subdivisions × subdivisions` quads spanning `size` world units
    pub fn new(subdivisions: usize, size: f32) -> Self {
        let subdivisions = subdivisions.max(1);
        let spacing = size / subdivisions as f32;
        let half_size = size / 2.0;

        let mut vertices = Vec::with_capacity((subdivisions + 1).pow(2));
        let mut indices = Vec::with_capacity(subdivisions.pow(2) * 6);

        // Generate flat XZ plane grid
        for z in 0..=subdivisions {
            for x in 0..=subdivisions {
                let x_pos = x as f32 * spacing - half_size;
                let z_pos = z as f32 * spacing - half_size;

                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    uv: [x as f32 / subdivisions as f32, z as f32 / subdivisions as f32],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding seen from +Y)
        for z in 0..subdivisions {
            for x in 0..subdivisions {
                let top_left = (z * (subdivisions + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (subdivisions + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            subdivisions,
            size,
        }
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
