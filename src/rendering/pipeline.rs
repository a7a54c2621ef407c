//! Per-frame orchestration: simulate into the heightmap, then draw every consumer.

use glam::{Mat4, Vec3};

use super::context::GpuContext;
use super::debug_view::DebugViewPass;
use super::displacement::DisplacementPass;
use super::normal_preview::NormalPreviewPass;
use super::simulation::SimulationPass;
use super::target::HeightmapTarget;
use crate::error::OceanResult;
use crate::heightmap::TexelMapping;
use crate::ocean::{FrameSequencer, HeightmapView, OceanGrid};
use crate::params::{SceneLayout, SimulationParameters, SurfaceStyle};

/// Background of the main pass
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.03,
    b: 0.05,
    a: 1.0,
};

/// Owns the heightmap target, its single writer and its three readers
pub struct HeightmapPipeline {
    target: HeightmapTarget,
    simulation: SimulationPass,
    displacement: DisplacementPass,
    normal_preview: NormalPreviewPass,
    debug_view: DebugViewPass,
    sequencer: FrameSequencer,
    mapping: TexelMapping,
    style: SurfaceStyle,
}

impl HeightmapPipeline {
    pub fn new(
        context: &GpuContext,
        color_format: wgpu::TextureFormat,
        layout: &SceneLayout,
        style: SurfaceStyle,
        mapping: TexelMapping,
    ) -> OceanResult<Self> {
        let device = &context.device;
        let target = HeightmapTarget::new(context)?;

        // Zero the target so consumers read a flat map until the first write
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Heightmap Clear Encoder"),
        });
        target.clear(&mut encoder);
        context.queue.submit(std::iter::once(encoder.finish()));

        let grid = OceanGrid::new(layout.subdivisions, layout.plane_size);
        log::debug!(
            "surface grid: {} vertices, {} indices",
            grid.vertices.len(),
            grid.indices.len()
        );

        let simulation = SimulationPass::new(device, target.format());
        let displacement = DisplacementPass::new(
            device,
            color_format,
            &target,
            &grid,
            Vec3::from_array(layout.displaced_offset),
        );
        let normal_preview = NormalPreviewPass::new(
            device,
            color_format,
            &target,
            &grid,
            Vec3::from_array(layout.normal_preview_offset),
        );
        let debug_view = DebugViewPass::new(
            device,
            color_format,
            &target,
            layout.plane_size,
            Vec3::from_array(layout.debug_offset),
        );

        Ok(Self {
            target,
            simulation,
            displacement,
            normal_preview,
            debug_view,
            sequencer: FrameSequencer::new(),
            mapping,
            style,
        })
    }

    /// Record one frame: the simulation write first, then the debug quad, the
    /// displaced surface and the normal preview into `color_view`.
    ///
    /// A skipped write (target unavailable or invalid parameters) is logged and
    /// the consumers draw the previous contents.
    pub fn encode_frame(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        params: &SimulationParameters,
        view_proj: Mat4,
    ) -> OceanResult<HeightmapView> {
        self.sequencer.begin_frame()?;

        let write = params.validate().and_then(|()| {
            self.simulation.write_uniforms(queue, params, self.mapping);
            self.simulation.encode(encoder, &self.target)
        });
        let view = self.sequencer.finish_simulation(write)?;

        self.debug_view.update(queue, view_proj);
        self.displacement.update(queue, view_proj, &self.style);
        self.normal_preview
            .update(queue, view_proj, self.style.normal_preview_strength);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // A destroyed texture must not be bound
        if !self.target.is_released() {
            self.debug_view.draw(&mut pass);
            self.displacement.draw(&mut pass);
            self.normal_preview.draw(&mut pass);
        }

        Ok(view)
    }

    pub fn target(&self) -> &HeightmapTarget {
        &self.target
    }

    pub fn sequencer(&self) -> &FrameSequencer {
        &self.sequencer
    }

    pub fn mapping(&self) -> TexelMapping {
        self.mapping
    }

    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    /// Tear down the heightmap; later frames only clear the screen
    pub fn release(&mut self) {
        self.target.release();
    }
}
