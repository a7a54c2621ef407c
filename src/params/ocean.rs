//! Wave simulation parameters and the shared control store.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{OceanError, OceanResult};

/// Per-frame inputs of the heightmap simulation
///
/// Mutated only through [`WaveControls`]; the pipeline reads a copied snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Wave height multiplier (world units per unit of raw noise)
    pub elevation: f32,

    /// Spatial frequency applied to the texel position (cycles per unit)
    pub frequency: f32,

    /// Time scroll rate of the noise field (units per second)
    pub speed: f32,

    /// Lower edge of the noise window along the position's Y axis
    pub noise_range_low: f32,

    /// Upper edge of the noise window along the position's Y axis
    pub noise_range_high: f32,

    /// Clock time of this frame (seconds)
    pub elapsed_time: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            elevation: 0.35,
            frequency: 3.4,
            speed: 0.4,
            noise_range_low: -1.3,
            noise_range_high: 1.3,
            elapsed_time: 0.0,
        }
    }
}

impl SimulationParameters {
    /// Reject an inverted noise window
    pub fn validate(&self) -> OceanResult<()> {
        if self.noise_range_low > self.noise_range_high {
            return Err(OceanError::InvalidParameterRange {
                low: self.noise_range_low,
                high: self.noise_range_high,
            });
        }
        Ok(())
    }

    /// Copy with a different clock time
    pub fn at_time(mut self, elapsed_time: f32) -> Self {
        self.elapsed_time = elapsed_time;
        self
    }
}

/// Bounds the interactive controls are clamped to
#[derive(Debug, Clone)]
pub struct WaveLimits {
    pub elevation: (f32, f32),
    pub frequency: (f32, f32),
    pub speed: (f32, f32),
    pub noise_range_low: (f32, f32),
    pub noise_range_high: (f32, f32),
}

impl Default for WaveLimits {
    fn default() -> Self {
        Self {
            elevation: (-5.0, 5.0),
            frequency: (0.0, 30.0),
            speed: (-5.0, 5.0),
            noise_range_low: (-1.3, 0.0),
            noise_range_high: (0.0, 1.3),
        }
    }
}

/// A single adjustable control value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveKnob {
    Elevation,
    Frequency,
    Speed,
    NoiseRangeLow,
    NoiseRangeHigh,
}

/// Thread-safe parameter store shared between the control surface and the frame loop
#[derive(Debug, Clone)]
pub struct WaveControls {
    params: Arc<Mutex<SimulationParameters>>,
    limits: WaveLimits,
}

impl WaveControls {
    pub fn new(initial: SimulationParameters, limits: WaveLimits) -> OceanResult<Self> {
        initial.validate()?;
        Ok(Self {
            params: Arc::new(Mutex::new(initial)),
            limits,
        })
    }

    /// Consistent copy of all values, stamped with the frame's clock time
    pub fn snapshot(&self, elapsed_time: f32) -> SimulationParameters {
        let params = *self.params.lock().unwrap_or_else(PoisonError::into_inner);
        params.at_time(elapsed_time)
    }

    /// Nudge one control by `delta`, clamped to its limits
    ///
    /// A change that would invert the noise window is rejected and leaves the
    /// store untouched.
    pub fn adjust(&self, knob: WaveKnob, delta: f32) -> OceanResult<SimulationParameters> {
        let mut guard = self.params.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = *guard;
        let (value, (min, max)) = match knob {
            WaveKnob::Elevation => (&mut next.elevation, self.limits.elevation),
            WaveKnob::Frequency => (&mut next.frequency, self.limits.frequency),
            WaveKnob::Speed => (&mut next.speed, self.limits.speed),
            WaveKnob::NoiseRangeLow => (&mut next.noise_range_low, self.limits.noise_range_low),
            WaveKnob::NoiseRangeHigh => (&mut next.noise_range_high, self.limits.noise_range_high),
        };
        *value = (*value + delta).clamp(min, max);
        next.validate()?;
        *guard = next;
        Ok(next)
    }

    /// Replace the noise window in one step
    pub fn set_noise_range(&self, low: f32, high: f32) -> OceanResult<()> {
        let mut guard = self.params.lock().unwrap_or_else(PoisonError::into_inner);
        let next = SimulationParameters {
            noise_range_low: low,
            noise_range_high: high,
            ..*guard
        };
        next.validate()?;
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimulationParameters::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let params = SimulationParameters {
            noise_range_low: 0.5,
            noise_range_high: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(OceanError::InvalidParameterRange { .. })
        ));
        assert!(WaveControls::new(params, WaveLimits::default()).is_err());
    }

    #[test]
    fn test_set_noise_range_keeps_previous_on_error() {
        let controls =
            WaveControls::new(SimulationParameters::default(), WaveLimits::default()).unwrap();
        assert!(controls.set_noise_range(0.4, -0.4).is_err());
        let snap = controls.snapshot(0.0);
        assert_eq!(snap.noise_range_low, -1.3);
        assert_eq!(snap.noise_range_high, 1.3);

        controls.set_noise_range(-0.2, 0.6).unwrap();
        let snap = controls.snapshot(0.0);
        assert_eq!((snap.noise_range_low, snap.noise_range_high), (-0.2, 0.6));
    }

    #[test]
    fn test_adjust_clamps_to_limits() {
        let controls =
            WaveControls::new(SimulationParameters::default(), WaveLimits::default()).unwrap();
        let next = controls.adjust(WaveKnob::Elevation, 100.0).unwrap();
        assert_eq!(next.elevation, 5.0);
        let next = controls.adjust(WaveKnob::Frequency, -100.0).unwrap();
        assert_eq!(next.frequency, 0.0);
        let next = controls.adjust(WaveKnob::NoiseRangeHigh, 10.0).unwrap();
        assert_eq!(next.noise_range_high, 1.3);
    }

    #[test]
    fn test_snapshot_stamps_time_without_mutating_store() {
        let controls =
            WaveControls::new(SimulationParameters::default(), WaveLimits::default()).unwrap();
        let snap = controls.snapshot(4.25);
        assert_eq!(snap.elapsed_time, 4.25);
        assert_eq!(controls.snapshot(0.0).elapsed_time, 0.0);
    }

    #[test]
    fn test_shared_between_clones() {
        let controls =
            WaveControls::new(SimulationParameters::default(), WaveLimits::default()).unwrap();
        let panel = controls.clone();
        panel.adjust(WaveKnob::Speed, 0.1).unwrap();
        assert!((controls.snapshot(0.0).speed - 0.5).abs() < 1e-6);
    }
}
