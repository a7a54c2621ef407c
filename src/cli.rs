//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::OceanResult;
use crate::heightmap::TexelMapping;
use crate::params::{
    CameraPreset, FixedCamera, OrbitCamera, RecordingConfig, SceneLayout, SimulationParameters,
    SurfaceStyle,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Tidewell")]
#[command(about = "GPU heightmap ocean: simulate, displace, inspect", long_about = None)]
pub struct Args {
    /// Wave height multiplier
    #[arg(long, default_value_t = 0.35, allow_hyphen_values = true)]
    pub elevation: f32,

    /// Spatial noise frequency
    #[arg(long, default_value_t = 3.4)]
    pub frequency: f32,

    /// Noise scroll speed
    #[arg(long, default_value_t = 0.4, allow_hyphen_values = true)]
    pub speed: f32,

    /// Lower edge of the noise window
    #[arg(long, default_value_t = -1.3, allow_hyphen_values = true)]
    pub noise_range_low: f32,

    /// Upper edge of the noise window
    #[arg(long, default_value_t = 1.3, allow_hyphen_values = true)]
    pub noise_range_high: f32,

    /// Height multiplier of the displaced surface
    #[arg(long, default_value_t = 1.0)]
    pub displacement_strength: f32,

    /// Gradient multiplier of the normal preview
    #[arg(long, default_value_t = 20.0)]
    pub normal_strength: f32,

    /// Grid subdivisions of the displaced surface
    #[arg(long, default_value_t = 256)]
    pub subdivisions: usize,

    /// Texel to noise position mapping: xz (default), plane
    #[arg(long, value_name = "MAPPING", default_value = "xz")]
    pub mapping: String,

    /// Camera preset: orbit (default), fixed
    #[arg(long, value_name = "PRESET", default_value = "orbit")]
    pub camera_preset: String,

    /// Render headless frames to recording/frames (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Render one frame headless and write the heightmap as a grayscale PNG
    #[arg(long, value_name = "PATH")]
    pub export_heightmap: Option<PathBuf>,

    /// Clock time used by --export-heightmap (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f32,
}

impl Args {
    /// Initial simulation parameters; an inverted noise window is an error
    pub fn simulation_parameters(&self) -> OceanResult<SimulationParameters> {
        let params = SimulationParameters {
            elevation: self.elevation,
            frequency: self.frequency,
            speed: self.speed,
            noise_range_low: self.noise_range_low,
            noise_range_high: self.noise_range_high,
            elapsed_time: 0.0,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parse texel mapping from command-line arguments
    pub fn parse_texel_mapping(&self) -> TexelMapping {
        match self.mapping.to_lowercase().as_str() {
            "xz" => TexelMapping::XzPlane,
            "plane" | "local" => TexelMapping::LocalPlane,
            other => {
                log::warn!("Unknown mapping '{}', using xz", other);
                TexelMapping::XzPlane
            }
        }
    }

    /// Parse camera preset from command-line arguments
    pub fn parse_camera_preset(&self) -> CameraPreset {
        match self.camera_preset.to_lowercase().as_str() {
            "orbit" => {
                log::info!("Camera: Orbit");
                CameraPreset::Orbit(OrbitCamera::default())
            }
            "fixed" => {
                log::info!("Camera: Fixed");
                CameraPreset::Fixed(FixedCamera::default())
            }
            other => {
                log::warn!("Unknown camera preset '{}', using orbit", other);
                CameraPreset::Orbit(OrbitCamera::default())
            }
        }
    }

    pub fn surface_style(&self) -> SurfaceStyle {
        SurfaceStyle {
            displacement_strength: self.displacement_strength,
            normal_preview_strength: self.normal_strength,
            ..Default::default()
        }
    }

    pub fn scene_layout(&self) -> SceneLayout {
        SceneLayout {
            subdivisions: self.subdivisions,
            ..Default::default()
        }
    }

    /// Create recording configuration (and its output directories) if recording mode is enabled
    pub fn create_recording_config(&self) -> OceanResult<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        let config = RecordingConfig::new(duration);
        std::fs::create_dir_all(config.frames_dir())?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OceanError;

    #[test]
    fn test_defaults_match_parameter_defaults() {
        let args = Args::parse_from(["tidewell"]);
        assert_eq!(
            args.simulation_parameters().unwrap(),
            SimulationParameters::default()
        );
        assert_eq!(args.parse_texel_mapping(), TexelMapping::XzPlane);
        assert!(matches!(args.parse_camera_preset(), CameraPreset::Orbit(_)));
        assert!(args.create_recording_config().unwrap().is_none());
    }

    #[test]
    fn test_negative_values_parse() {
        let args = Args::parse_from([
            "tidewell",
            "--elevation",
            "-0.5",
            "--noise-range-low",
            "-0.2",
            "--noise-range-high",
            "0.4",
        ]);
        let params = args.simulation_parameters().unwrap();
        assert_eq!(params.elevation, -0.5);
        assert_eq!(params.noise_range_low, -0.2);
    }

    #[test]
    fn test_inverted_noise_range_rejected() {
        let args = Args::parse_from([
            "tidewell",
            "--noise-range-low",
            "0.5",
            "--noise-range-high",
            "0.1",
        ]);
        assert!(matches!(
            args.simulation_parameters(),
            Err(OceanError::InvalidParameterRange { .. })
        ));
    }

    #[test]
    fn test_unknown_presets_fall_back() {
        let args = Args::parse_from(["tidewell", "--mapping", "sphere", "--camera-preset", "x"]);
        assert_eq!(args.parse_texel_mapping(), TexelMapping::XzPlane);
        assert!(matches!(args.parse_camera_preset(), CameraPreset::Orbit(_)));
    }

    #[test]
    fn test_plane_mapping_and_styles() {
        let args = Args::parse_from([
            "tidewell",
            "--mapping",
            "plane",
            "--displacement-strength",
            "2",
            "--subdivisions",
            "64",
        ]);
        assert_eq!(args.parse_texel_mapping(), TexelMapping::LocalPlane);
        assert_eq!(args.surface_style().displacement_strength, 2.0);
        assert_eq!(args.surface_style().normal_preview_strength, 20.0);
        assert_eq!(args.scene_layout().subdivisions, 64);
    }
}
