//! Parameter definitions with units and documented semantics.
//!
//! Every tunable number lives here with:
//! - Units (world units, seconds, radians)
//! - Documented ranges and meanings
//! - Defaults matching the reference scene

mod camera;
mod ocean;
mod render;

// Re-export all types
pub use camera::{CameraPreset, FixedCamera, OrbitCamera};
pub use ocean::{SimulationParameters, WaveControls, WaveKnob, WaveLimits};
pub use render::{RecordingConfig, RenderConfig, SceneLayout, SurfaceStyle};
