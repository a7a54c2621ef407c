//! False-color quad showing the raw heightmap.

use glam::{Mat4, Vec3};

use super::consumer::{create_mesh_pipeline, GridBuffers, HeightmapBinding};
use super::target::HeightmapTarget;
use super::uniforms::DebugUniforms;
use crate::ocean::OceanGrid;

pub struct DebugViewPass {
    binding: HeightmapBinding,
    pipeline: wgpu::RenderPipeline,
    mesh: GridBuffers,
    model: Mat4,
}

impl DebugViewPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        target: &HeightmapTarget,
        plane_size: f32,
        offset: Vec3,
    ) -> Self {
        // Colors come from the fragment stage, so one quad is enough
        let quad = OceanGrid::new(1, plane_size);
        let model = Mat4::from_translation(offset);
        let binding = HeightmapBinding::new(
            device,
            target,
            &DebugUniforms::new(Mat4::IDENTITY, model),
            "Debug View",
        );
        let pipeline = create_mesh_pipeline(
            device,
            "Debug View",
            include_str!("../shaders/debug_view.wgsl"),
            &binding,
            color_format,
        );

        Self {
            binding,
            pipeline,
            mesh: GridBuffers::new(device, &quad, "Debug View"),
            model,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, view_proj: Mat4) {
        self.binding
            .write(queue, &DebugUniforms::new(view_proj, self.model));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.binding.bind_group, &[]);
        self.mesh.draw(pass);
    }
}
