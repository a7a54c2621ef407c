//! Camera presets.

/// Camera circling the scene center
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal distance from the target (world units)
    pub radius: f32,

    /// Height above the target (world units)
    pub height: f32,

    /// Orbit rate (radians per second, 0 = stationary)
    pub angular_speed: f32,

    /// Look-at point
    pub target: [f32; 3],
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 7.0,
            height: 4.0,
            angular_speed: 0.15,
            target: [0.0, 0.0, -0.5],
        }
    }
}

/// Fixed camera position (for inspection and recordings)
#[derive(Debug, Clone)]
pub struct FixedCamera {
    /// Camera position
    pub position: [f32; 3],

    /// Look-at target
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 6.0],
            target: [0.0, 0.0, -0.5],
        }
    }
}

/// Camera preset selection
#[derive(Debug, Clone)]
pub enum CameraPreset {
    /// Slow orbit around the three surfaces
    Orbit(OrbitCamera),

    /// Stationary camera
    Fixed(FixedCamera),
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::Orbit(OrbitCamera::default())
    }
}
