//! Tidewell library - GPGPU ocean heightmap simulation and visualization

pub mod camera;
pub mod cli;
pub mod error;
pub mod heightmap;
pub mod noise;
pub mod ocean;
pub mod params;
pub mod rendering;

pub use error::{OceanError, OceanResult};
