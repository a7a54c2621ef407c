//! End-to-end frames on a real adapter. Each test returns early when no GPU
//! adapter is available (CI without a GPU or software rasterizer) or when the
//! adapter cannot render to any float heightmap format.

use glam::Mat4;

use tidewell::heightmap::{Heightmap, TexelMapping};
use tidewell::params::{SceneLayout, SimulationParameters, SurfaceStyle};
use tidewell::rendering::{
    GpuContext, HeadlessRenderer, HEIGHTMAP_FALLBACK_FORMAT, HEIGHTMAP_FORMAT,
};
use tidewell::OceanError;

fn renderer(mapping: TexelMapping) -> Option<HeadlessRenderer> {
    let context = match pollster::block_on(GpuContext::headless()) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("skipping GPU test: {}", e);
            return None;
        }
    };
    let layout = SceneLayout {
        subdivisions: 32,
        ..Default::default()
    };
    match HeadlessRenderer::new(context, 64, 64, &layout, SurfaceStyle::default(), mapping) {
        Ok(renderer) => Some(renderer),
        Err(e @ OceanError::ResourceAcquisition(_)) => {
            eprintln!("skipping GPU test: {}", e);
            None
        }
        Err(e) => panic!("renderer setup failed: {}", e),
    }
}

/// Share of texels within `tolerance` of the CPU reference
fn matching_fraction(gpu: &Heightmap, cpu: &Heightmap, tolerance: f32) -> f32 {
    let matching = gpu
        .values()
        .iter()
        .zip(cpu.values())
        .filter(|(g, c)| (*g - *c).abs() <= tolerance)
        .count();
    matching as f32 / gpu.values().len() as f32
}

#[test]
fn test_heightmap_target_is_renderable_on_adapter() {
    let Ok(context) = pollster::block_on(GpuContext::headless()) else {
        return;
    };
    let layout = SceneLayout {
        subdivisions: 4,
        ..Default::default()
    };
    let result = HeadlessRenderer::new(
        context,
        16,
        16,
        &layout,
        SurfaceStyle::default(),
        TexelMapping::XzPlane,
    );

    // Without a renderable float format setup fails cleanly instead of panicking
    let renderer = match result {
        Ok(renderer) => renderer,
        Err(OceanError::ResourceAcquisition(_)) => return,
        Err(e) => panic!("unexpected setup error: {}", e),
    };
    let format = renderer.pipeline().target().format();
    let usages = |format: wgpu::TextureFormat| {
        renderer
            .context()
            .adapter
            .get_texture_format_features(format)
            .allowed_usages
    };
    assert!(usages(format).contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
    if !usages(HEIGHTMAP_FORMAT).contains(wgpu::TextureUsages::RENDER_ATTACHMENT) {
        assert_eq!(format, HEIGHTMAP_FALLBACK_FORMAT);
    } else {
        assert_eq!(format, HEIGHTMAP_FORMAT);
    }
}

#[test]
fn test_heightmap_is_zero_before_first_frame() {
    let Some(renderer) = renderer(TexelMapping::XzPlane) else {
        return;
    };
    let heightmap = renderer.heightmap().unwrap();
    assert!(heightmap.values().iter().all(|&h| h == 0.0));
    assert!(renderer.pipeline().sequencer().observe().is_empty());
}

#[test]
fn test_frame_output_matches_cpu_reference() {
    for mapping in [TexelMapping::XzPlane, TexelMapping::LocalPlane] {
        let Some(mut renderer) = renderer(mapping) else {
            return;
        };
        let params = SimulationParameters::default().at_time(2.75);

        let view = renderer.render_frame(&params, Mat4::IDENTITY).unwrap();
        assert_eq!(view.frame, 1);
        assert!(view.is_current());

        let gpu = renderer.heightmap().unwrap();
        let cpu = Heightmap::simulate(&params, mapping);

        // Half-float fallback targets round to ~5e-4 at these heights
        let fraction = matching_fraction(&gpu, &cpu, 2e-3);
        assert!(fraction > 0.99, "{:?}: only {} of texels match", mapping, fraction);
    }
}

#[test]
fn test_zero_elevation_writes_flat_heightmap() {
    let Some(mut renderer) = renderer(TexelMapping::LocalPlane) else {
        return;
    };
    let params = SimulationParameters {
        elevation: 0.0,
        ..Default::default()
    };
    renderer
        .render_frame(&params.at_time(11.0), Mat4::IDENTITY)
        .unwrap();

    let heightmap = renderer.heightmap().unwrap();
    assert!(heightmap.values().iter().all(|&h| h == 0.0));
}

#[test]
fn test_each_frame_observes_its_own_write() {
    let Some(mut renderer) = renderer(TexelMapping::XzPlane) else {
        return;
    };

    for frame in 1..=3u64 {
        let params = SimulationParameters::default().at_time(frame as f32 * 0.5);
        let view = renderer.render_frame(&params, Mat4::IDENTITY).unwrap();
        assert_eq!(view.generation, Some(frame));

        let cpu = Heightmap::simulate(&params, TexelMapping::XzPlane);
        let gpu = renderer.heightmap().unwrap();
        assert!(matching_fraction(&gpu, &cpu, 2e-3) > 0.99);
    }
}

#[test]
fn test_inverted_range_reuses_previous_frame() {
    let Some(mut renderer) = renderer(TexelMapping::XzPlane) else {
        return;
    };
    let good = SimulationParameters::default().at_time(1.0);
    renderer.render_frame(&good, Mat4::IDENTITY).unwrap();
    let before = renderer.heightmap().unwrap();

    let inverted = SimulationParameters {
        noise_range_low: 0.4,
        noise_range_high: -0.4,
        ..good.at_time(5.0)
    };
    let view = renderer.render_frame(&inverted, Mat4::IDENTITY).unwrap();

    assert!(view.is_stale());
    assert_eq!(renderer.heightmap().unwrap(), before);
    assert_eq!(renderer.pipeline().sequencer().stale_frames(), 1);
}

#[test]
fn test_released_target_skips_writes() {
    let Some(mut renderer) = renderer(TexelMapping::XzPlane) else {
        return;
    };
    renderer
        .render_frame(&SimulationParameters::default(), Mat4::IDENTITY)
        .unwrap();
    renderer.pipeline_mut().release();

    let view = renderer
        .render_frame(&SimulationParameters::default().at_time(1.0), Mat4::IDENTITY)
        .unwrap();
    assert!(view.is_stale());
    assert!(renderer.heightmap().is_err());
}
