//! Rendering, scene layout and recording configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 60.0,
            near_plane: 0.1,
            far_plane: 100.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Shading inputs of the three heightmap consumers
#[derive(Debug, Clone)]
pub struct SurfaceStyle {
    /// Height multiplier for the displaced surface (also scales its normals)
    pub displacement_strength: f32,

    /// Gradient multiplier for the normal preview
    pub normal_preview_strength: f32,

    /// Base color of the displaced surface (linear RGB)
    pub surface_color: [f32; 3],

    /// Point light position (world units)
    pub light_position: [f32; 3],

    /// Ambient term added to the diffuse light
    pub ambient: f32,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            displacement_strength: 1.0,
            normal_preview_strength: 20.0,
            surface_color: [0.4, 0.6, 0.8],
            light_position: [5.0, 5.0, 5.0],
            ambient: 0.3,
        }
    }
}

/// Placement of the three output surfaces (all lie in the XZ plane, +Y up)
#[derive(Debug, Clone)]
pub struct SceneLayout {
    /// Side length of each surface (world units)
    pub plane_size: f32,

    /// Grid subdivisions per side for the displaced surface and the normal preview
    pub subdivisions: usize,

    /// Center of the displaced, lit surface
    pub displaced_offset: [f32; 3],

    /// Center of the false-color debug quad
    pub debug_offset: [f32; 3],

    /// Center of the normal preview surface
    pub normal_preview_offset: [f32; 3],
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            plane_size: 2.0,
            subdivisions: 256,
            displaced_offset: [-2.5, 0.0, 0.0],
            debug_offset: [2.5, 0.0, 0.0],
            normal_preview_offset: [0.0, 0.0, -2.5],
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil().max(0.0) as usize
    }

    /// Clock time of a frame
    pub fn frame_time(&self, frame: usize) -> f32 {
        frame as f32 / self.fps as f32
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of one captured frame
    pub fn frame_path(&self, frame: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame))
    }
}
