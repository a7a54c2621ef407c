//! Flat plane colored by the reconstructed heightmap normal.

use glam::{Mat4, Vec3};

use super::consumer::{create_mesh_pipeline, GridBuffers, HeightmapBinding};
use super::target::HeightmapTarget;
use super::uniforms::PreviewUniforms;
use crate::ocean::OceanGrid;

pub struct NormalPreviewPass {
    binding: HeightmapBinding,
    pipeline: wgpu::RenderPipeline,
    mesh: GridBuffers,
    model: Mat4,
}

impl NormalPreviewPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        target: &HeightmapTarget,
        grid: &OceanGrid,
        offset: Vec3,
    ) -> Self {
        let model = Mat4::from_translation(offset);
        let initial = PreviewUniforms::new(Mat4::IDENTITY, model, 1.0);
        let binding = HeightmapBinding::new(device, target, &initial, "Normal Preview");
        let pipeline = create_mesh_pipeline(
            device,
            "Normal Preview",
            include_str!("../shaders/normal_preview.wgsl"),
            &binding,
            color_format,
        );

        Self {
            binding,
            pipeline,
            mesh: GridBuffers::new(device, grid, "Normal Preview"),
            model,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, view_proj: Mat4, strength: f32) {
        self.binding
            .write(queue, &PreviewUniforms::new(view_proj, self.model, strength));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.binding.bind_group, &[]);
        self.mesh.draw(pass);
    }
}
