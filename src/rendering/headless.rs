//! Offscreen renderer for recording, heightmap export and GPU tests.

use std::path::Path;

use glam::Mat4;

use super::consumer::create_depth_view;
use super::context::GpuContext;
use super::pipeline::HeightmapPipeline;
use super::readback::{read_heightmap, read_texture};
use crate::error::OceanResult;
use crate::heightmap::{Heightmap, TexelMapping};
use crate::ocean::HeightmapView;
use crate::params::{SceneLayout, SimulationParameters, SurfaceStyle};

/// Color format of captured frames
pub const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct HeadlessRenderer {
    pipeline: HeightmapPipeline,
    context: GpuContext,
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl HeadlessRenderer {
    pub fn new(
        context: GpuContext,
        width: u32,
        height: u32,
        layout: &SceneLayout,
        style: SurfaceStyle,
        mapping: TexelMapping,
    ) -> OceanResult<Self> {
        let pipeline = HeightmapPipeline::new(&context, CAPTURE_FORMAT, layout, style, mapping)?;

        let color_texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Capture Color Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CAPTURE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = create_depth_view(&context.device, width, height);

        Ok(Self {
            pipeline,
            context,
            color_texture,
            color_view,
            depth_view,
        })
    }

    /// Render and submit one frame
    pub fn render_frame(
        &mut self,
        params: &SimulationParameters,
        view_proj: Mat4,
    ) -> OceanResult<HeightmapView> {
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Headless Frame Encoder"),
            });

        let view = self.pipeline.encode_frame(
            &self.context.queue,
            &mut encoder,
            &self.color_view,
            &self.depth_view,
            params,
            view_proj,
        )?;

        self.context.queue.submit(std::iter::once(encoder.finish()));
        Ok(view)
    }

    /// Save the last rendered frame as a PNG
    pub fn capture_png(&self, path: impl AsRef<Path>) -> OceanResult<()> {
        let pixels = read_texture(
            &self.context.device,
            &self.context.queue,
            &self.color_texture,
            4,
        )?;
        image::save_buffer(
            path,
            &pixels,
            self.color_texture.width(),
            self.color_texture.height(),
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }

    /// Current heightmap contents
    pub fn heightmap(&self) -> OceanResult<Heightmap> {
        read_heightmap(
            &self.context.device,
            &self.context.queue,
            self.pipeline.target(),
        )
    }

    pub fn pipeline(&self) -> &HeightmapPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut HeightmapPipeline {
        &mut self.pipeline
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    /// Width over height of the capture target
    pub fn aspect_ratio(&self) -> f32 {
        self.color_texture.width() as f32 / self.color_texture.height() as f32
    }
}
