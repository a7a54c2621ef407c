//! Height-derived surface math shared by the displacement, normal preview and
//! debug passes. The WGSL in `shaders/heightmap_common.wgsl` mirrors these.

use glam::{Vec2, Vec3};

use crate::heightmap::{Heightmap, TEXEL_SIZE};

/// The four one-texel neighbours of a uv
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightGradient {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl HeightGradient {
    /// Sample `(u-ε, v)`, `(u+ε, v)`, `(u, v+ε)`, `(u, v-ε)` with ε one texel.
    /// Out-of-range neighbours clamp to the edge texel.
    pub fn sample(heightmap: &Heightmap, uv: Vec2) -> Self {
        Self {
            left: heightmap.sample(uv - Vec2::new(TEXEL_SIZE, 0.0)),
            right: heightmap.sample(uv + Vec2::new(TEXEL_SIZE, 0.0)),
            top: heightmap.sample(uv + Vec2::new(0.0, TEXEL_SIZE)),
            bottom: heightmap.sample(uv - Vec2::new(0.0, TEXEL_SIZE)),
        }
    }

    /// Object-space normal of the displaced sheet (+Y up)
    pub fn surface_normal(&self, strength: f32) -> Vec3 {
        Vec3::new(
            (self.left - self.right) * strength,
            2.0,
            (self.bottom - self.top) * strength,
        )
        .normalize()
    }

    /// Same gradient in the preview plane's tangent frame (+Z up)
    pub fn tangent_normal(&self, strength: f32) -> Vec3 {
        Vec3::new(
            -(self.right - self.left) * strength,
            -(self.top - self.bottom) * strength,
            1.0,
        )
        .normalize()
    }
}

/// Base position pushed along +Y by the height under `uv`
pub fn displace(base: Vec3, uv: Vec2, heightmap: &Heightmap, strength: f32) -> Vec3 {
    base + Vec3::Y * heightmap.sample(uv) * strength
}

/// Map a unit normal into displayable color range
pub fn normal_color(normal: Vec3) -> Vec3 {
    normal * 0.5 + Vec3::splat(0.5)
}

/// Signed height to `[0, 1]` (for heights within ±1)
pub fn remap_height(height: f32) -> f32 {
    height * 0.5 + 0.5
}

/// Inverse of [`remap_height`]
pub fn unmap_height(remapped: f32) -> f32 {
    (remapped - 0.5) * 2.0
}

/// Three-band false color: blue for the low third, green for the middle, red for the top
pub fn debug_color(height: f32) -> Vec3 {
    let r = remap_height(height);
    let mut color = Vec3::splat(r);
    if r < 0.33 {
        color.z = r * 3.0;
    } else if r < 0.66 {
        color.y = (r - 0.33) * 3.0;
    } else {
        color.x = (r - 0.66) * 3.0;
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::{texel_uv, TexelMapping};
    use crate::params::SimulationParameters;

    fn ramp_u() -> Heightmap {
        // h = x / 256, rising along u
        let values = (0..256 * 256).map(|i| (i % 256) as f32 / 256.0).collect();
        Heightmap::from_values(values).unwrap()
    }

    #[test]
    fn test_flat_normals() {
        let flat = Heightmap::flat();
        let grad = HeightGradient::sample(&flat, Vec2::splat(0.5));

        assert_eq!(grad.surface_normal(1.0), Vec3::Y);
        assert_eq!(grad.tangent_normal(20.0), Vec3::Z);
        assert_eq!(normal_color(grad.tangent_normal(20.0)), Vec3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_boundary_normals_are_finite() {
        let params = SimulationParameters::default().at_time(3.0);
        let map = Heightmap::simulate(&params, TexelMapping::LocalPlane);

        for uv in [Vec2::ZERO, Vec2::ONE] {
            let grad = HeightGradient::sample(&map, uv);
            assert!(grad.surface_normal(1.0).is_finite());
            assert!(grad.tangent_normal(20.0).is_finite());
        }
    }

    #[test]
    fn test_boundary_clamps_to_edge_texel() {
        let map = ramp_u();
        let grad = HeightGradient::sample(&map, Vec2::ZERO);

        // u - ε falls off the left edge and reads texel 0
        assert_eq!(grad.left, map.get(0, 0));
        assert_eq!(grad.right, map.get(1, 0));
        // v ± ε stays on a constant column
        assert_eq!(grad.top, grad.bottom);
    }

    #[test]
    fn test_slope_tilts_normal_downhill() {
        let map = ramp_u();
        let grad = HeightGradient::sample(&map, texel_uv(128, 128));

        let n = grad.surface_normal(10.0);
        assert!(n.x < 0.0, "height rises along +u, normal leans toward -x");
        assert!(n.y > 0.0);
        assert!(n.z.abs() < 1e-6);

        let t = grad.tangent_normal(10.0);
        assert!(t.x < 0.0);
        assert!(t.z > 0.0);
    }

    #[test]
    fn test_zero_elevation_leaves_mesh_undisplaced() {
        let params = SimulationParameters {
            elevation: 0.0,
            ..Default::default()
        };
        let map = Heightmap::simulate(&params.at_time(5.0), TexelMapping::XzPlane);
        let base = Vec3::new(0.3, 0.0, -0.7);

        assert_eq!(displace(base, Vec2::new(0.65, 0.15), &map, 1.0), base);
    }

    #[test]
    fn test_remap_round_trip() {
        for h in [-1.0, -0.35, 0.0, 0.12, 0.999] {
            assert!((unmap_height(remap_height(h)) - h).abs() < 1e-6);
        }
    }

    #[test]
    fn test_debug_color_bands() {
        // r = 0.1
        let low = debug_color(-0.8);
        assert!((low.z - 0.3).abs() < 1e-5);
        assert!((low.x - 0.1).abs() < 1e-5);

        // r = 0.5
        let mid = debug_color(0.0);
        assert!((mid.y - 0.51).abs() < 1e-5);
        assert_eq!(mid.x, 0.5);

        // r = 0.9
        let high = debug_color(0.8);
        assert!((high.x - 0.72).abs() < 1e-5);
        assert!((high.z - 0.9).abs() < 1e-5);
    }
}
