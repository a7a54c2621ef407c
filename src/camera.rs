//! Viewer camera for the three heightmap surfaces.

use glam::{Mat4, Vec3};

use crate::params::{CameraPreset, FixedCamera, OrbitCamera, RenderConfig};

/// Camera system driven by a preset and the scene clock
pub struct CameraSystem {
    preset: CameraPreset,
}

impl CameraSystem {
    /// Create new camera system with specified preset
    pub fn new(preset: CameraPreset) -> Self {
        Self { preset }
    }

    /// Compute camera position and look-at target for given time
    ///
    /// # Returns
    /// Tuple of (eye_position, target_position)
    pub fn compute_position_and_target(&self, time_s: f32) -> (Vec3, Vec3) {
        match &self.preset {
            CameraPreset::Orbit(params) => Self::compute_orbit_path(params, time_s),
            CameraPreset::Fixed(params) => Self::compute_fixed_path(params),
        }
    }

    fn compute_fixed_path(p: &FixedCamera) -> (Vec3, Vec3) {
        (Vec3::from_array(p.position), Vec3::from_array(p.target))
    }

    /// Circle the target at constant radius and height, starting on +Z
    fn compute_orbit_path(p: &OrbitCamera, time_s: f32) -> (Vec3, Vec3) {
        let target = Vec3::from_array(p.target);
        let angle = time_s * p.angular_speed;
        let eye = target + Vec3::new(angle.sin() * p.radius, p.height, angle.cos() * p.radius);
        (eye, target)
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn create_view_proj_matrix(
        &self,
        time_s: f32,
        render_config: &RenderConfig,
    ) -> (Mat4, Vec3) {
        self.view_proj_for_aspect(time_s, render_config, render_config.aspect_ratio())
    }

    /// Same as [`Self::create_view_proj_matrix`] with an explicit aspect ratio (live window size)
    pub fn view_proj_for_aspect(
        &self,
        time_s: f32,
        render_config: &RenderConfig,
        aspect: f32,
    ) -> (Mat4, Vec3) {
        let (eye, target) = self.compute_position_and_target(time_s);

        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect,
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_keeps_radius_and_height() {
        let params = OrbitCamera::default();
        let camera = CameraSystem::new(CameraPreset::Orbit(params.clone()));
        let target = Vec3::from_array(params.target);

        for t in 0..50 {
            let (eye, look_at) = camera.compute_position_and_target(t as f32 * 0.7);
            let offset = eye - target;

            assert_eq!(look_at, target);
            assert!((offset.y - params.height).abs() < 1e-5);
            assert!((Vec3::new(offset.x, 0.0, offset.z).length() - params.radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_orbit_starts_in_front() {
        let camera = CameraSystem::new(CameraPreset::default());
        let (eye, target) = camera.compute_position_and_target(0.0);
        assert!(eye.z > target.z);
        assert!(eye.y > target.y);
    }

    #[test]
    fn test_fixed_camera_ignores_time() {
        let camera = CameraSystem::new(CameraPreset::Fixed(FixedCamera::default()));
        assert_eq!(
            camera.compute_position_and_target(0.0),
            camera.compute_position_and_target(42.0)
        );
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = CameraSystem::new(CameraPreset::default());
        let render_config = RenderConfig::default();

        let (view_proj, eye_pos) = camera.create_view_proj_matrix(0.0, &render_config);

        // Matrix should not be identity or zero
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);

        assert!(eye_pos.is_finite());
    }

    #[test]
    fn test_scene_center_projects_inside_clip_volume() {
        let camera = CameraSystem::new(CameraPreset::default());
        let (view_proj, _) = camera.create_view_proj_matrix(3.0, &RenderConfig::default());

        let clip = view_proj * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
