//! Error taxonomy for the heightmap pipeline and its host glue.

/// Errors raised by the heightmap pipeline, its GPU setup and the export paths
#[derive(thiserror::Error, Debug)]
pub enum OceanError {
    /// Offscreen heightmap target could not be bound for writing (stale frame follows)
    #[error("heightmap target unavailable: {0}")]
    ResourceAcquisition(String),

    /// Noise window is inverted (`low > high`)
    #[error("invalid noise range: low {low} is above high {high}")]
    InvalidParameterRange { low: f32, high: f32 },

    /// A frame phase transition was requested out of order
    #[error("frame phase error: {0}")]
    FrameOrder(String),

    #[error("device error: {0}")]
    Device(String),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("readback error: {0}")]
    Readback(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OceanError {
    pub fn device<T: ToString>(msg: T) -> Self {
        OceanError::Device(msg.to_string())
    }

    pub fn readback<T: ToString>(msg: T) -> Self {
        OceanError::Readback(msg.to_string())
    }
}

/// Result alias used throughout the crate
pub type OceanResult<T> = Result<T, OceanError>;
