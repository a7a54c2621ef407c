//! Blocking texture readback for heightmap export, frame capture and tests.

use std::sync::mpsc;

use super::target::HeightmapTarget;
use crate::error::{OceanError, OceanResult};
use crate::heightmap::Heightmap;

/// Copy a whole 2D texture into host memory, row padding removed
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    bytes_per_pixel: u32,
) -> OceanResult<Vec<u8>> {
    let width = texture.width();
    let height = texture.height();
    let unpadded_bytes_per_row = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: (padded_bytes_per_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });

    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);

    rx.recv()
        .map_err(|_| OceanError::readback("map callback dropped"))?
        .map_err(OceanError::readback)?;

    let data = slice.get_mapped_range();
    let mut bytes = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);

    // Remove padding
    for row in data.chunks_exact(padded_bytes_per_row as usize) {
        bytes.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
    }

    drop(data);
    buffer.unmap();

    Ok(bytes)
}

/// Heights (`r` channel) of tightly packed texels in a heightmap format
pub fn decode_heights(bytes: &[u8], format: wgpu::TextureFormat) -> OceanResult<Vec<f32>> {
    match format {
        wgpu::TextureFormat::Rgba32Float => Ok(bytes
            .chunks_exact(16)
            .map(|texel| bytemuck::pod_read_unaligned::<f32>(&texel[..4]))
            .collect()),
        wgpu::TextureFormat::Rgba16Float => Ok(bytes
            .chunks_exact(8)
            .map(|texel| {
                half::f16::from_bits(bytemuck::pod_read_unaligned::<u16>(&texel[..2])).to_f32()
            })
            .collect()),
        other => Err(OceanError::readback(format!(
            "{:?} is not a heightmap format",
            other
        ))),
    }
}

/// Read the heightmap's `r` channel back as a [`Heightmap`]
pub fn read_heightmap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    target: &HeightmapTarget,
) -> OceanResult<Heightmap> {
    if target.is_released() {
        return Err(OceanError::readback("heightmap target was released"));
    }

    let format = target.format();
    let bytes_per_texel = format
        .block_copy_size(None)
        .ok_or_else(|| OceanError::readback(format!("{:?} has no copy size", format)))?;
    let bytes = read_texture(device, queue, target.texture(), bytes_per_texel)?;

    Heightmap::from_values(decode_heights(&bytes, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_float32_texels() {
        let texels: [f32; 8] = [0.25, 9.0, 9.0, 9.0, -1.5, 9.0, 9.0, 9.0];
        let heights =
            decode_heights(bytemuck::cast_slice(&texels), wgpu::TextureFormat::Rgba32Float)
                .unwrap();
        assert_eq!(heights, vec![0.25, -1.5]);
    }

    #[test]
    fn test_decode_half_float_texels() {
        let texels: Vec<u16> = [0.25f32, 9.0, 9.0, 9.0, -0.3125, 9.0, 9.0, 9.0]
            .iter()
            .map(|&v| half::f16::from_f32(v).to_bits())
            .collect();
        let heights =
            decode_heights(bytemuck::cast_slice(&texels), wgpu::TextureFormat::Rgba16Float)
                .unwrap();
        assert_eq!(heights, vec![0.25, -0.3125]);
    }

    #[test]
    fn test_decode_rejects_color_formats() {
        assert!(decode_heights(&[0; 4], wgpu::TextureFormat::Rgba8Unorm).is_err());
    }
}
