//! Windowed renderer presenting the heightmap scene to a winit surface.

use std::sync::Arc;

use glam::Mat4;

use super::consumer::create_depth_view;
use super::context::GpuContext;
use super::pipeline::HeightmapPipeline;
use crate::error::{OceanError, OceanResult};
use crate::heightmap::TexelMapping;
use crate::ocean::HeightmapView;
use crate::params::{SceneLayout, SimulationParameters, SurfaceStyle};

/// sRGB format if the surface offers one, else its first format
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> OceanResult<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .ok_or_else(|| OceanError::device("surface reports no supported formats"))
}

/// Rendering system managing the surface, depth buffer and heightmap pipeline
pub struct RenderSystem {
    pipeline: HeightmapPipeline,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    context: GpuContext,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: Arc<winit::window::Window>,
        layout: &SceneLayout,
        style: SurfaceStyle,
        mapping: TexelMapping,
    ) -> OceanResult<Self> {
        let size = window.inner_size();
        let (context, surface) = GpuContext::for_window(window).await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&context.adapter);
        let surface_format = pick_surface_format(&surface_caps.formats)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);

        let depth_view = create_depth_view(&context.device, config.width, config.height);
        let pipeline = HeightmapPipeline::new(&context, surface_format, layout, style, mapping)?;

        log::info!(
            "Surface {:?} {}x{}",
            surface_format,
            config.width,
            config.height
        );

        Ok(Self {
            pipeline,
            surface,
            config,
            depth_view,
            context,
        })
    }

    /// Reconfigure the surface and depth buffer (zero sizes are ignored)
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.context.device, &self.config);
        self.depth_view = create_depth_view(&self.context.device, width, height);
    }

    /// Reconfigure at the current size (after `SurfaceError::Lost` / `Outdated`)
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    /// Simulate, draw and present one frame
    pub fn render(
        &mut self,
        params: &SimulationParameters,
        view_proj: Mat4,
    ) -> OceanResult<HeightmapView> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

        let heightmap_view = self.pipeline.encode_frame(
            &self.context.queue,
            &mut encoder,
            &view,
            &self.depth_view,
            params,
            view_proj,
        )?;

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(heightmap_view)
    }

    pub fn pipeline(&self) -> &HeightmapPipeline {
        &self.pipeline
    }

    pub fn adapter_name(&self) -> String {
        self.context.adapter_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_format_prefers_srgb() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            pick_surface_format(&formats).unwrap(),
            wgpu::TextureFormat::Bgra8UnormSrgb
        );
        assert_eq!(
            pick_surface_format(&formats[..1]).unwrap(),
            wgpu::TextureFormat::Bgra8Unorm
        );
    }

    #[test]
    fn test_surface_without_formats_is_a_device_error() {
        assert!(matches!(
            pick_surface_format(&[]),
            Err(OceanError::Device(_))
        ));
    }
}
