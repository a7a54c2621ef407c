//! Displaced, lit ocean surface sampling the heightmap in the vertex stage.

use glam::{Mat4, Vec3};

use super::consumer::{create_mesh_pipeline, GridBuffers, HeightmapBinding};
use super::target::HeightmapTarget;
use super::uniforms::SurfaceUniforms;
use crate::ocean::OceanGrid;
use crate::params::SurfaceStyle;

pub struct DisplacementPass {
    binding: HeightmapBinding,
    pipeline: wgpu::RenderPipeline,
    mesh: GridBuffers,
    model: Mat4,
}

impl DisplacementPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        target: &HeightmapTarget,
        grid: &OceanGrid,
        offset: Vec3,
    ) -> Self {
        let model = Mat4::from_translation(offset);
        let initial = SurfaceUniforms::new(Mat4::IDENTITY, model, &SurfaceStyle::default());
        let binding = HeightmapBinding::new(device, target, &initial, "Displacement");
        let pipeline = create_mesh_pipeline(
            device,
            "Displacement",
            include_str!("../shaders/displacement.wgsl"),
            &binding,
            color_format,
        );

        Self {
            binding,
            pipeline,
            mesh: GridBuffers::new(device, grid, "Displacement"),
            model,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, view_proj: Mat4, style: &SurfaceStyle) {
        self.binding
            .write(queue, &SurfaceUniforms::new(view_proj, self.model, style));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.binding.bind_group, &[]);
        self.mesh.draw(pass);
    }
}
