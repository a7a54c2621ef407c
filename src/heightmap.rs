//! CPU-side heightmap grid: reference simulation, texel addressing and export.
//!
//! The GPU target is the source of truth at runtime; this mirror is what a
//! readback produces and what the tests compare against.

use std::path::Path;

use glam::{Vec2, Vec3};
use image::{GrayImage, Luma};

use crate::error::{OceanError, OceanResult};
use crate::noise::wave_height;
use crate::ocean::remap_height;
use crate::params::SimulationParameters;

/// Side length of the heightmap (texels)
pub const HEIGHTMAP_SIZE: u32 = 256;

/// One texel in uv units, the finite-difference step
pub const TEXEL_SIZE: f32 = 1.0 / HEIGHTMAP_SIZE as f32;

/// How a texel's uv becomes the 3D position fed to the noise field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexelMapping {
    /// `(u, 0, v)`: the sheet lies on the XZ plane, envelope sees y = 0 everywhere
    #[default]
    XzPlane,

    /// `(2u - 1, 2v - 1, 0)`: the 2×2 plane's own model coordinates, envelope varies with v
    LocalPlane,
}

impl TexelMapping {
    pub fn position(self, uv: Vec2) -> Vec3 {
        match self {
            TexelMapping::XzPlane => Vec3::new(uv.x, 0.0, uv.y),
            TexelMapping::LocalPlane => Vec3::new(uv.x * 2.0 - 1.0, uv.y * 2.0 - 1.0, 0.0),
        }
    }

    /// Selector value understood by the simulation shader
    pub fn shader_code(self) -> u32 {
        match self {
            TexelMapping::XzPlane => 0,
            TexelMapping::LocalPlane => 1,
        }
    }
}

/// uv of a texel center
pub fn texel_uv(x: u32, y: u32) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / HEIGHTMAP_SIZE as f32,
        (y as f32 + 0.5) / HEIGHTMAP_SIZE as f32,
    )
}

/// Square grid of heights, row-major (`y * size + x`), x along u and y along v
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    size: u32,
    values: Vec<f32>,
}

impl Default for Heightmap {
    fn default() -> Self {
        Self::flat()
    }
}

impl Heightmap {
    /// All-zero heightmap (the state before the first simulation write)
    pub fn flat() -> Self {
        Self {
            size: HEIGHTMAP_SIZE,
            values: vec![0.0; (HEIGHTMAP_SIZE * HEIGHTMAP_SIZE) as usize],
        }
    }

    /// Evaluate the noise field at every texel center (CPU twin of the simulation pass)
    pub fn simulate(params: &SimulationParameters, mapping: TexelMapping) -> Self {
        let mut values = Vec::with_capacity((HEIGHTMAP_SIZE * HEIGHTMAP_SIZE) as usize);
        for y in 0..HEIGHTMAP_SIZE {
            for x in 0..HEIGHTMAP_SIZE {
                let position = mapping.position(texel_uv(x, y));
                values.push(wave_height(position, params));
            }
        }
        Self {
            size: HEIGHTMAP_SIZE,
            values,
        }
    }

    /// Wrap texel values produced elsewhere (e.g. a GPU readback)
    pub fn from_values(values: Vec<f32>) -> OceanResult<Self> {
        let expected = (HEIGHTMAP_SIZE * HEIGHTMAP_SIZE) as usize;
        if values.len() != expected {
            return Err(OceanError::readback(format!(
                "expected {} texels, got {}",
                expected,
                values.len()
            )));
        }
        Ok(Self {
            size: HEIGHTMAP_SIZE,
            values,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.size - 1);
        let y = y.min(self.size - 1);
        self.values[(y * self.size + x) as usize]
    }

    /// Nearest-texel lookup with clamp-to-edge addressing
    pub fn sample(&self, uv: Vec2) -> f32 {
        let max = (self.size - 1) as f32;
        let x = (uv.x * self.size as f32).floor().clamp(0.0, max);
        let y = (uv.y * self.size as f32).floor().clamp(0.0, max);
        self.get(x as u32, y as u32)
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// True when every texel is within `tolerance` of the first one
    pub fn is_uniform(&self, tolerance: f32) -> bool {
        let first = self.values[0];
        self.values.iter().all(|v| (v - first).abs() <= tolerance)
    }

    /// Largest absolute texel difference to another heightmap
    pub fn max_abs_diff(&self, other: &Heightmap) -> f32 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }

    /// Grayscale image using the debug remap (`h * 0.5 + 0.5`)
    pub fn to_gray_image(&self) -> GrayImage {
        let mut img = GrayImage::new(self.size, self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                let gray = (remap_height(self.get(x, y)) * 255.0).clamp(0.0, 255.0) as u8;
                img.put_pixel(x, y, Luma([gray]));
            }
        }
        img
    }

    /// Save as a grayscale PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> OceanResult<()> {
        self.to_gray_image().save(path)?;
        Ok(())
    }
}
