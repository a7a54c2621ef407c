//! Offscreen float render target holding the heightmap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::context::GpuContext;
use crate::error::{OceanError, OceanResult};
use crate::heightmap::HEIGHTMAP_SIZE;

/// Preferred texel format of the heightmap (height in `r`)
pub const HEIGHTMAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Used when the adapter cannot render to [`HEIGHTMAP_FORMAT`] (GL / downlevel)
pub const HEIGHTMAP_FALLBACK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Usages the heightmap texture is created with
const HEIGHTMAP_USAGES: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT
    .union(wgpu::TextureUsages::TEXTURE_BINDING)
    .union(wgpu::TextureUsages::COPY_SRC);

/// First heightmap format for which `allowed_usages` covers every usage the target needs
pub fn choose_heightmap_format(
    allowed_usages: impl Fn(wgpu::TextureFormat) -> wgpu::TextureUsages,
) -> OceanResult<wgpu::TextureFormat> {
    [HEIGHTMAP_FORMAT, HEIGHTMAP_FALLBACK_FORMAT]
        .into_iter()
        .find(|&format| allowed_usages(format).contains(HEIGHTMAP_USAGES))
        .ok_or_else(|| {
            OceanError::ResourceAcquisition(format!(
                "adapter cannot render to {:?} or {:?}",
                HEIGHTMAP_FORMAT, HEIGHTMAP_FALLBACK_FORMAT
            ))
        })
}

/// Binding slots used by every consumer shader
pub const HEIGHTMAP_TEXTURE_BINDING: u32 = 1;
pub const HEIGHTMAP_SAMPLER_BINDING: u32 = 2;

/// 256×256 float texture written by the simulation pass and sampled by the consumers.
///
/// Nearest filtering, clamp-to-edge addressing, no depth buffer, no mipmaps.
pub struct HeightmapTarget {
    format: wgpu::TextureFormat,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    device_lost: Arc<AtomicBool>,
    released: bool,
}

impl HeightmapTarget {
    /// Create the target in the best float format the adapter can render to
    pub fn new(context: &GpuContext) -> OceanResult<Self> {
        let format = choose_heightmap_format(|format| {
            context
                .adapter
                .get_texture_format_features(format)
                .allowed_usages
        })?;
        if format != HEIGHTMAP_FORMAT {
            log::warn!(
                "{:?} is not renderable on {}, heightmap falls back to {:?}",
                HEIGHTMAP_FORMAT,
                context.adapter_name(),
                format
            );
        }

        let device = &context.device;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Heightmap Target"),
            size: wgpu::Extent3d {
                width: HEIGHTMAP_SIZE,
                height: HEIGHTMAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: HEIGHTMAP_USAGES,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Heightmap Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            format,
            texture,
            view,
            sampler,
            device_lost: context.lost_flag(),
            released: false,
        })
    }

    /// Record a pass that zeroes every texel (what consumers see before the first write)
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Heightmap Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }

    /// Bind the target as a render destination for this frame
    pub fn begin_write(&self) -> OceanResult<&wgpu::TextureView> {
        if self.released {
            return Err(OceanError::ResourceAcquisition(
                "heightmap target was released".into(),
            ));
        }
        if self.device_lost.load(Ordering::SeqCst) {
            return Err(OceanError::ResourceAcquisition("GPU device lost".into()));
        }
        Ok(&self.view)
    }

    /// Free the GPU memory; later writes fail and consumers must stop sampling
    pub fn release(&mut self) {
        if !self.released {
            self.texture.destroy();
            self.released = true;
            log::debug!("heightmap target released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn size(&self) -> u32 {
        HEIGHTMAP_SIZE
    }

    /// Layout entries for the texture and sampler (bindings 1 and 2)
    pub fn layout_entries(visibility: wgpu::ShaderStages) -> [wgpu::BindGroupLayoutEntry; 2] {
        [
            wgpu::BindGroupLayoutEntry {
                binding: HEIGHTMAP_TEXTURE_BINDING,
                visibility,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: HEIGHTMAP_SAMPLER_BINDING,
                visibility,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                count: None,
            },
        ]
    }

    /// Read-only bind group entries matching [`Self::layout_entries`]
    pub fn bind_group_entries(&self) -> [wgpu::BindGroupEntry<'_>; 2] {
        [
            wgpu::BindGroupEntry {
                binding: HEIGHTMAP_TEXTURE_BINDING,
                resource: wgpu::BindingResource::TextureView(&self.view),
            },
            wgpu::BindGroupEntry {
                binding: HEIGHTMAP_SAMPLER_BINDING,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            },
        ]
    }
}

impl Drop for HeightmapTarget {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float32_preferred_when_renderable() {
        let format = choose_heightmap_format(|_| wgpu::TextureUsages::all()).unwrap();
        assert_eq!(format, HEIGHTMAP_FORMAT);
    }

    #[test]
    fn test_downlevel_adapter_falls_back_to_half_float() {
        // GL adapters sample and copy Rgba32Float but cannot render to it
        let format = choose_heightmap_format(|format| match format {
            wgpu::TextureFormat::Rgba32Float => {
                wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::STORAGE_BINDING
            }
            _ => wgpu::TextureUsages::all(),
        })
        .unwrap();
        assert_eq!(format, HEIGHTMAP_FALLBACK_FORMAT);
    }

    #[test]
    fn test_no_renderable_float_format_is_an_acquisition_error() {
        let result = choose_heightmap_format(|_| wgpu::TextureUsages::TEXTURE_BINDING);
        assert!(matches!(result, Err(OceanError::ResourceAcquisition(_))));
    }
}
