//! wgpu side of the heightmap pipeline.
//!
//! Per frame, one command encoder records the simulation pass into the
//! offscreen [`HeightmapTarget`] and then a single scene pass in which the
//! debug quad, the displaced surface and the normal preview sample it.
//! Submission order on the queue is what makes the write visible to the reads.

mod consumer;
mod context;
mod debug_view;
mod displacement;
mod headless;
mod normal_preview;
mod pipeline;
mod readback;
mod simulation;
mod target;
mod uniforms;
mod window;

pub use consumer::{create_depth_view, DEPTH_FORMAT};
pub use context::GpuContext;
pub use debug_view::DebugViewPass;
pub use displacement::DisplacementPass;
pub use headless::{HeadlessRenderer, CAPTURE_FORMAT};
pub use normal_preview::NormalPreviewPass;
pub use pipeline::HeightmapPipeline;
pub use readback::{decode_heights, read_heightmap, read_texture};
pub use simulation::SimulationPass;
pub use target::{
    choose_heightmap_format, HeightmapTarget, HEIGHTMAP_FALLBACK_FORMAT, HEIGHTMAP_FORMAT,
};
pub use uniforms::{DebugUniforms, PreviewUniforms, SimulationUniforms, SurfaceUniforms};
pub use window::RenderSystem;
