//! Ocean surface geometry, height-derived surface math and frame sequencing.

mod mesh;
mod surface;
mod system;

pub use mesh::{OceanGrid, Vertex};
pub use surface::{
    debug_color, displace, normal_color, remap_height, unmap_height, HeightGradient,
};
pub use system::{FramePhase, FrameSequencer, HeightmapView, OceanSystem};
