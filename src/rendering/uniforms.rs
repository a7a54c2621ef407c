//! Uniform blocks, laid out to match the WGSL structs byte for byte.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::heightmap::{TexelMapping, HEIGHTMAP_SIZE, TEXEL_SIZE};
use crate::params::{SimulationParameters, SurfaceStyle};

/// Uniform buffer for the simulation shader (parameter snapshot + target size)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SimulationUniforms {
    pub time: f32,
    pub elevation: f32,
    pub frequency: f32,
    pub speed: f32,
    pub noise_range_low: f32,
    pub noise_range_high: f32,
    pub size: f32,
    pub mapping: u32,
}

impl SimulationUniforms {
    pub fn new(params: &SimulationParameters, mapping: TexelMapping) -> Self {
        Self {
            time: params.elapsed_time,
            elevation: params.elevation,
            frequency: params.frequency,
            speed: params.speed,
            noise_range_low: params.noise_range_low,
            noise_range_high: params.noise_range_high,
            size: HEIGHTMAP_SIZE as f32,
            mapping: mapping.shader_code(),
        }
    }
}

/// Uniform buffer for the displaced surface
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` (mat4 to dodge mat3 column padding)
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb surface color, ambient term in w
    pub color: [f32; 4],
    pub light_position: [f32; 4],
    pub displacement_strength: f32,
    pub texel_size: f32,
    pub _padding: [f32; 2], // Padding for alignment
}

impl SurfaceUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, style: &SurfaceStyle) -> Self {
        let [r, g, b] = style.surface_color;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: [r, g, b, style.ambient],
            light_position: Vec3::from_array(style.light_position).extend(1.0).to_array(),
            displacement_strength: style.displacement_strength,
            texel_size: TEXEL_SIZE,
            _padding: [0.0; 2],
        }
    }
}

/// Uniform buffer for the normal preview
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PreviewUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub strength: f32,
    pub texel_size: f32,
    pub _padding: [f32; 2],
}

impl PreviewUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, strength: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            strength,
            texel_size: TEXEL_SIZE,
            _padding: [0.0; 2],
        }
    }
}

/// Uniform buffer for the false-color debug quad
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DebugUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl DebugUniforms {
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}
