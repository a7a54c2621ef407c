//! Classic 3D gradient noise and the windowed wave envelope.
//!
//! CPU reference for the simulation shader. The permutation polynomial
//! (`mod((x * 34 + 1) * x, 289)`), the fade curve and the gradient folding
//! match `shaders/noise.wgsl` term for term, so CPU heights and GPU texels
//! agree to within f32 rounding.

use std::f32::consts::PI;

use glam::{Vec3, Vec4};

use crate::params::SimulationParameters;

/// WGSL implementation of the same noise field, prepended to the simulation shader
pub const NOISE_WGSL: &str = include_str!("shaders/noise.wgsl");

/// Lattice period; coordinates wrap here to keep precision at large times
const LATTICE_PERIOD: f32 = 289.0;

// Divisions by constants are written as reciprocal multiplies on both sides.
// Multiplication rounds identically on CPU and GPU, division does not.
const INV_LATTICE_PERIOD: f32 = 1.0 / 289.0;
const INV_SEVEN: f32 = 1.0 / 7.0;

/// Output scale of the classic noise (brings the range close to [-1, 1])
const NOISE_SCALE: f32 = 2.2;

fn mod289(x: Vec4) -> Vec4 {
    x - (x * INV_LATTICE_PERIOD).floor() * LATTICE_PERIOD
}

fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * INV_LATTICE_PERIOD).floor() * LATTICE_PERIOD
}

/// GLSL-style `fract` (always in [0, 1), also for negative input)
fn fract(x: Vec4) -> Vec4 {
    x - x.floor()
}

fn permute(x: Vec4) -> Vec4 {
    mod289(((x * 34.0) + Vec4::ONE) * x)
}

fn taylor_inv_sqrt(r: Vec4) -> Vec4 {
    Vec4::splat(1.792_842_9) - r * 0.853_734_73
}

fn fade(t: Vec3) -> Vec3 {
    t * t * t * (t * (t * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0))
}

/// `step(edge, x)` per lane: 1.0 where `x >= edge`
fn step(edge: Vec4, x: Vec4) -> Vec4 {
    Vec4::select(x.cmpge(edge), Vec4::ONE, Vec4::ZERO)
}

/// Unnormalized gradients for four hashed lattice corners
fn corner_gradients(ixy: Vec4) -> (Vec4, Vec4, Vec4) {
    let gx = ixy * INV_SEVEN;
    let gy = fract(gx.floor() * INV_SEVEN) - Vec4::splat(0.5);
    let gx = fract(gx);
    let gz = Vec4::splat(0.5) - gx.abs() - gy.abs();
    let sz = step(gz, Vec4::ZERO);
    let gx = gx - sz * (step(Vec4::ZERO, gx) - Vec4::splat(0.5));
    let gy = gy - sz * (step(Vec4::ZERO, gy) - Vec4::splat(0.5));
    (gx, gy, gz)
}

/// Classic 3D gradient noise at `p`
///
/// Zero at every integer lattice point, roughly within [-1, 1] elsewhere.
pub fn cnoise(p: Vec3) -> f32 {
    let pi0 = mod289_3(p.floor());
    let pi1 = mod289_3(p.floor() + Vec3::ONE);
    let pf0 = p - p.floor();
    let pf1 = pf0 - Vec3::ONE;

    let ix = Vec4::new(pi0.x, pi1.x, pi0.x, pi1.x);
    let iy = Vec4::new(pi0.y, pi0.y, pi1.y, pi1.y);
    let iz0 = Vec4::splat(pi0.z);
    let iz1 = Vec4::splat(pi1.z);

    let ixy = permute(permute(ix) + iy);
    let ixy0 = permute(ixy + iz0);
    let ixy1 = permute(ixy + iz1);

    let (gx0, gy0, gz0) = corner_gradients(ixy0);
    let (gx1, gy1, gz1) = corner_gradients(ixy1);

    let mut g000 = Vec3::new(gx0.x, gy0.x, gz0.x);
    let mut g100 = Vec3::new(gx0.y, gy0.y, gz0.y);
    let mut g010 = Vec3::new(gx0.z, gy0.z, gz0.z);
    let mut g110 = Vec3::new(gx0.w, gy0.w, gz0.w);
    let mut g001 = Vec3::new(gx1.x, gy1.x, gz1.x);
    let mut g101 = Vec3::new(gx1.y, gy1.y, gz1.y);
    let mut g011 = Vec3::new(gx1.z, gy1.z, gz1.z);
    let mut g111 = Vec3::new(gx1.w, gy1.w, gz1.w);

    let norm0 = taylor_inv_sqrt(Vec4::new(
        g000.length_squared(),
        g010.length_squared(),
        g100.length_squared(),
        g110.length_squared(),
    ));
    g000 *= norm0.x;
    g010 *= norm0.y;
    g100 *= norm0.z;
    g110 *= norm0.w;

    let norm1 = taylor_inv_sqrt(Vec4::new(
        g001.length_squared(),
        g011.length_squared(),
        g101.length_squared(),
        g111.length_squared(),
    ));
    g001 *= norm1.x;
    g011 *= norm1.y;
    g101 *= norm1.z;
    g111 *= norm1.w;

    let n000 = g000.dot(pf0);
    let n100 = g100.dot(Vec3::new(pf1.x, pf0.y, pf0.z));
    let n010 = g010.dot(Vec3::new(pf0.x, pf1.y, pf0.z));
    let n110 = g110.dot(Vec3::new(pf1.x, pf1.y, pf0.z));
    let n001 = g001.dot(Vec3::new(pf0.x, pf0.y, pf1.z));
    let n101 = g101.dot(Vec3::new(pf1.x, pf0.y, pf1.z));
    let n011 = g011.dot(Vec3::new(pf0.x, pf1.y, pf1.z));
    let n111 = g111.dot(pf1);

    let fade_xyz = fade(pf0);
    let n_z = Vec4::new(n000, n100, n010, n110).lerp(Vec4::new(n001, n101, n011, n111), fade_xyz.z);
    let n_y0 = n_z.x + (n_z.z - n_z.x) * fade_xyz.y;
    let n_y1 = n_z.y + (n_z.w - n_z.y) * fade_xyz.y;
    let n_xyz = n_y0 + (n_y1 - n_y0) * fade_xyz.x;

    NOISE_SCALE * n_xyz
}

/// Raw animated noise: `cnoise(position * frequency + time * speed)`
pub fn wave_noise(position: Vec3, frequency: f32, speed: f32, time: f32) -> f32 {
    cnoise(position * frequency + Vec3::splat(time * speed))
}

/// Hermite smoothstep between `edge0` and `edge1` (requires `edge0 < edge1`)
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Window factor `sin(smoothstep(low, high, y) * PI)`
///
/// Exactly 0 at or outside the window, 1 at its midpoint. A degenerate or
/// inverted window (`low >= high`, or NaN bounds) yields 0.
pub fn envelope(low: f32, high: f32, y: f32) -> f32 {
    if !(low < high) {
        return 0.0;
    }
    let s = smoothstep(low, high, y);
    if s <= 0.0 || s >= 1.0 {
        return 0.0;
    }
    (s * PI).sin()
}

/// Final height at `position` for a parameter snapshot
pub fn wave_height(position: Vec3, params: &SimulationParameters) -> f32 {
    let raw = wave_noise(position, params.frequency, params.speed, params.elapsed_time);
    raw * params.elevation * envelope(params.noise_range_low, params.noise_range_high, position.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permute_constants() {
        let p = permute(Vec4::new(0.0, 1.0, 2.0, 288.0));
        // (x * 34 + 1) * x mod 289
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 35.0);
        assert_eq!(p.z, 138.0);
        // 288 ≡ -1 (mod 289): (-34 + 1) * -1 = 33
        assert_eq!(p.w, 33.0);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let p = Vec3::new(0.37, -1.25, 4.5);
        let a = wave_noise(p, 3.4, 0.4, 12.75);
        let b = wave_noise(p, 3.4, 0.4, 12.75);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_noise_zero_on_lattice() {
        for p in [Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 7.0, -11.0)] {
            assert!(cnoise(p).abs() < 1e-6, "noise at lattice point {:?} = {}", p, cnoise(p));
        }
    }

    #[test]
    fn test_noise_bounded_and_varied() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..2000 {
            let t = i as f32 * 0.173;
            let v = cnoise(Vec3::new(t.sin() * 9.1, t * 0.31, t.cos() * 5.7));
            assert!(v.is_finite());
            min = min.min(v);
            max = max.max(v);
        }
        assert!(max <= 1.5 && min >= -1.5, "range [{}, {}]", min, max);
        assert!(max - min > 0.5, "noise should vary, got [{}, {}]", min, max);
    }

    #[test]
    fn test_noise_stable_at_large_time() {
        // Lattice wrap keeps values finite and bounded far from the origin
        let v = wave_noise(Vec3::new(0.5, 0.0, 0.5), 3.4, 0.4, 86_400.0);
        assert!(v.is_finite());
        assert!(v.abs() <= 1.5);
    }

    #[test]
    fn test_envelope_zero_at_and_outside_window() {
        let (low, high) = (-0.6, 0.9);
        for y in [low, high, low - 0.001, high + 0.001, -10.0, 10.0] {
            assert_eq!(envelope(low, high, y), 0.0, "envelope at y={}", y);
        }
    }

    #[test]
    fn test_envelope_peaks_at_midpoint() {
        let (low, high) = (-1.3, 1.3);
        let mid = (low + high) / 2.0;
        assert!((envelope(low, high, mid) - 1.0).abs() < 1e-6);

        let (low, high) = (0.2, 0.8);
        assert!((envelope(low, high, 0.5) - 1.0).abs() < 1e-6);
        assert!(envelope(low, high, 0.35) < 1.0);
    }

    #[test]
    fn test_envelope_guards_inverted_range() {
        assert_eq!(envelope(0.5, -0.5, 0.0), 0.0);
        assert_eq!(envelope(0.3, 0.3, 0.3), 0.0);
        assert_eq!(envelope(f32::NAN, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_height_collapses_outside_window() {
        let params = SimulationParameters {
            elevation: 2.0,
            noise_range_low: 0.25,
            noise_range_high: 0.75,
            elapsed_time: 3.0,
            ..Default::default()
        };
        let inside = wave_height(Vec3::new(0.31, 0.5, 0.77), &params);
        let below = wave_height(Vec3::new(0.31, 0.1, 0.77), &params);
        let above = wave_height(Vec3::new(0.31, 0.9, 0.77), &params);
        assert_eq!(below, 0.0);
        assert_eq!(above, 0.0);
        assert!(inside.is_finite());
    }

    #[test]
    fn test_zero_elevation_is_flat() {
        let params = SimulationParameters {
            elevation: 0.0,
            ..Default::default()
        };
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.02, 0.0, 1.0 - i as f32 * 0.02);
            assert_eq!(wave_height(p, &params), 0.0);
        }
    }
}
