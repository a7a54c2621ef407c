//! Tidewell - animated ocean heightmap computed on the GPU
//!
//! A noise field is rendered into an offscreen float texture every frame,
//! then sampled by a displaced lit surface, a normal preview and a
//! false-color debug quad.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use tidewell::camera::CameraSystem;
use tidewell::cli::Args;
use tidewell::heightmap::TexelMapping;
use tidewell::params::*;
use tidewell::rendering::{GpuContext, HeadlessRenderer, RenderSystem};
use tidewell::OceanError;

/// Scene clock that can be paused without jumping on resume
struct Clock {
    start: Instant,
    paused_at: Option<Instant>,
    paused_total: f32,
}

impl Clock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            paused_at: None,
            paused_total: 0.0,
        }
    }

    fn elapsed(&self) -> f32 {
        let now = self.paused_at.unwrap_or_else(Instant::now);
        (now - self.start).as_secs_f32() - self.paused_total
    }

    fn toggle_pause(&mut self) -> bool {
        match self.paused_at.take() {
            Some(at) => {
                self.paused_total += at.elapsed().as_secs_f32();
                false
            }
            None => {
                self.paused_at = Some(Instant::now());
                true
            }
        }
    }
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation inputs
    controls: WaveControls,
    camera: CameraSystem,

    // Configuration
    render_config: RenderConfig,
    layout: SceneLayout,
    style: SurfaceStyle,
    mapping: TexelMapping,

    clock: Clock,
}

impl App {
    fn new(args: &Args, controls: WaveControls) -> Self {
        Self {
            window: None,
            render_system: None,
            controls,
            camera: CameraSystem::new(args.parse_camera_preset()),
            render_config: RenderConfig::default(),
            layout: args.scene_layout(),
            style: args.surface_style(),
            mapping: args.parse_texel_mapping(),
            clock: Clock::new(),
        }
    }

    /// Map a key to a control change
    fn knob_for_key(code: KeyCode) -> Option<(WaveKnob, f32)> {
        let change = match code {
            KeyCode::ArrowUp => (WaveKnob::Elevation, 0.05),
            KeyCode::ArrowDown => (WaveKnob::Elevation, -0.05),
            KeyCode::ArrowRight => (WaveKnob::Frequency, 0.1),
            KeyCode::ArrowLeft => (WaveKnob::Frequency, -0.1),
            KeyCode::KeyW => (WaveKnob::Speed, 0.05),
            KeyCode::KeyS => (WaveKnob::Speed, -0.05),
            KeyCode::KeyZ => (WaveKnob::NoiseRangeLow, -0.05),
            KeyCode::KeyX => (WaveKnob::NoiseRangeLow, 0.05),
            KeyCode::KeyC => (WaveKnob::NoiseRangeHigh, -0.05),
            KeyCode::KeyV => (WaveKnob::NoiseRangeHigh, 0.05),
            _ => return None,
        };
        Some(change)
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => {
                let paused = self.clock.toggle_pause();
                log::info!("{}", if paused { "Paused" } else { "Resumed" });
            }
            _ => {
                let Some((knob, delta)) = Self::knob_for_key(code) else {
                    return;
                };
                match self.controls.adjust(knob, delta) {
                    Ok(p) => log::debug!(
                        "elevation {:.2} frequency {:.2} speed {:.2} range [{:.2}, {:.2}]",
                        p.elevation,
                        p.frequency,
                        p.speed,
                        p.noise_range_low,
                        p.noise_range_high
                    ),
                    Err(e) => log::warn!("{:?} change rejected: {}", knob, e),
                }
            }
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let time_s = self.clock.elapsed();
        let params = self.controls.snapshot(time_s);
        let (view_proj, _) = self.camera.view_proj_for_aspect(
            time_s,
            &self.render_config,
            render_system.aspect_ratio(),
        );

        match render_system.render(&params, view_proj) {
            Ok(view) => {
                if view.is_empty() {
                    log::trace!("frame {}: heightmap not written yet", view.frame);
                }
            }
            Err(OceanError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                render_system.reconfigure();
            }
            Err(OceanError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Tidewell - GPU Heightmap Ocean")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.layout,
            self.style.clone(),
            self.mapping,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Tidewell is running on {}", render_system.adapter_name());
        log::info!("Arrows: elevation/frequency, W/S: speed, Z/X C/V: noise range");
        log::info!("Space pauses, Esc quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Headless renderer at the default window size
fn headless_renderer(args: &Args) -> anyhow::Result<HeadlessRenderer> {
    let context = pollster::block_on(GpuContext::headless())?;
    log::info!("Headless on {}", context.adapter_name());
    let config = RenderConfig::default();
    let renderer = HeadlessRenderer::new(
        context,
        config.window_width,
        config.window_height,
        &args.scene_layout(),
        args.surface_style(),
        args.parse_texel_mapping(),
    )?;
    Ok(renderer)
}

/// Render one frame at `--time` and write the heightmap as a grayscale PNG
fn export_heightmap(
    args: &Args,
    params: SimulationParameters,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let mut renderer = headless_renderer(args)?;
    let camera = CameraSystem::new(args.parse_camera_preset());
    let (view_proj, _) = camera.create_view_proj_matrix(args.time, &RenderConfig::default());

    let view = renderer.render_frame(&params.at_time(args.time), view_proj)?;
    let heightmap = renderer.heightmap()?;
    let (min, max) = heightmap.min_max();
    heightmap
        .save_png(path)
        .with_context(|| format!("writing {}", path.display()))?;

    log::info!(
        "Exported heightmap of frame {} to {} (min {:.4}, max {:.4})",
        view.frame,
        path.display(),
        min,
        max
    );
    Ok(())
}

/// Render `config.total_frames()` frames headless at a fixed timestep
fn record(
    args: &Args,
    params: SimulationParameters,
    config: &RecordingConfig,
) -> anyhow::Result<()> {
    let mut renderer = headless_renderer(args)?;
    let camera = CameraSystem::new(args.parse_camera_preset());
    let render_config = RenderConfig::default();
    let total = config.total_frames();

    log::info!(
        "Recording {} frames to {}",
        total,
        config.frames_dir().display()
    );

    for frame in 0..total {
        let time_s = config.frame_time(frame);
        let (view_proj, _) = camera.create_view_proj_matrix(time_s, &render_config);
        renderer.render_frame(&params.at_time(time_s), view_proj)?;
        renderer
            .capture_png(config.frame_path(frame))
            .with_context(|| format!("capturing frame {}", frame))?;

        if frame % config.fps as usize == 0 {
            log::info!("Recorded {}/{} frames", frame, total);
        }
    }

    log::info!("Recording complete");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = args.simulation_parameters()?;

    if let Some(path) = &args.export_heightmap {
        return export_heightmap(&args, params, path);
    }

    if let Some(config) = args.create_recording_config()? {
        return record(&args, params, &config);
    }

    log::info!("Tidewell - GPU heightmap ocean");
    let controls = WaveControls::new(params, WaveLimits::default())?;
    let mut app = App::new(&args, controls);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
