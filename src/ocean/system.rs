//! Frame sequencing for the heightmap pipeline, plus a CPU reference system
//! that runs the same write-then-read cycle without a GPU.

use glam::{Vec2, Vec3};

use super::mesh::{OceanGrid, Vertex};
use super::surface::{displace, HeightGradient};
use crate::error::{OceanError, OceanResult};
use crate::heightmap::{Heightmap, TexelMapping};
use crate::params::SimulationParameters;

/// Where the current frame is in its write-then-read cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// No frame started yet
    Idle,
    /// The heightmap is being written
    Simulating,
    /// Consumers are reading the heightmap
    Visualizing,
}

/// What a consumer pass sees when it samples the heightmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightmapView {
    /// Frame being drawn
    pub frame: u64,
    /// Frame whose simulation last wrote the heightmap (`None`: never written, reads as zero)
    pub generation: Option<u64>,
}

impl HeightmapView {
    /// The heightmap holds this frame's simulation output
    pub fn is_current(&self) -> bool {
        self.generation == Some(self.frame)
    }

    /// The heightmap holds an earlier frame's output
    pub fn is_stale(&self) -> bool {
        matches!(self.generation, Some(g) if g < self.frame)
    }

    /// Nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.generation.is_none()
    }
}

/// Two-phase frame state machine with a heightmap generation counter
#[derive(Debug)]
pub struct FrameSequencer {
    phase: FramePhase,
    frame: u64,
    heightmap_generation: Option<u64>,
    stale_frames: u64,
}

impl Default for FrameSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self {
            phase: FramePhase::Idle,
            frame: 0,
            heightmap_generation: None,
            stale_frames: 0,
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of the frame in progress (0 before the first frame)
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn heightmap_generation(&self) -> Option<u64> {
        self.heightmap_generation
    }

    /// Frames whose simulation write was skipped
    pub fn stale_frames(&self) -> u64 {
        self.stale_frames
    }

    /// Enter `Simulating` for a new frame, returning its number (first frame is 1)
    pub fn begin_frame(&mut self) -> OceanResult<u64> {
        match self.phase {
            FramePhase::Idle | FramePhase::Visualizing => {
                self.frame += 1;
                self.phase = FramePhase::Simulating;
                Ok(self.frame)
            }
            FramePhase::Simulating => Err(OceanError::FrameOrder(format!(
                "frame {} is still simulating",
                self.frame
            ))),
        }
    }

    /// Close the write phase with the outcome of the simulation write and enter
    /// `Visualizing`.
    ///
    /// A write skipped because the target was unavailable or the noise range
    /// was inverted is not fatal: the frame proceeds on the previous contents.
    /// Any other error is returned.
    pub fn finish_simulation(&mut self, write: OceanResult<()>) -> OceanResult<HeightmapView> {
        if self.phase != FramePhase::Simulating {
            return Err(OceanError::FrameOrder(format!(
                "finish_simulation called in {:?}",
                self.phase
            )));
        }

        match write {
            Ok(()) => self.heightmap_generation = Some(self.frame),
            Err(
                e @ (OceanError::ResourceAcquisition(_) | OceanError::InvalidParameterRange { .. }),
            ) => {
                self.stale_frames += 1;
                log::warn!(
                    "frame {}: skipped heightmap write ({}), reusing generation {:?}",
                    self.frame,
                    e,
                    self.heightmap_generation
                );
            }
            Err(e) => return Err(e),
        }

        self.phase = FramePhase::Visualizing;
        Ok(self.observe())
    }

    /// The generation a consumer sampling right now would see
    pub fn observe(&self) -> HeightmapView {
        HeightmapView {
            frame: self.frame,
            generation: self.heightmap_generation,
        }
    }
}

/// CPU twin of the GPU pipeline: simulate into a [`Heightmap`], then displace a grid from it
pub struct OceanSystem {
    pub grid: OceanGrid,
    heightmap: Heightmap,
    sequencer: FrameSequencer,
    mapping: TexelMapping,
}

impl OceanSystem {
    pub fn new(grid: OceanGrid, mapping: TexelMapping) -> Self {
        Self {
            grid,
            heightmap: Heightmap::flat(),
            sequencer: FrameSequencer::new(),
            mapping,
        }
    }

    /// Run one frame's write phase
    pub fn simulate(&mut self, params: &SimulationParameters) -> OceanResult<HeightmapView> {
        self.sequencer.begin_frame()?;
        // An inverted window never reaches the heightmap
        let write = params.validate().map(|()| {
            self.heightmap = Heightmap::simulate(params, self.mapping);
        });
        self.sequencer.finish_simulation(write)
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }

    pub fn sequencer(&self) -> &FrameSequencer {
        &self.sequencer
    }

    /// Grid vertices displaced by the current heightmap
    pub fn displace_grid(&self, strength: f32) -> Vec<Vertex> {
        self.grid
            .vertices
            .iter()
            .map(|v| Vertex {
                position: displace(v.base_position(), v.uv(), &self.heightmap, strength)
                    .to_array(),
                uv: v.uv,
            })
            .collect()
    }

    /// Object-space normal at `uv` of the displaced surface
    pub fn surface_normal(&self, uv: Vec2, strength: f32) -> Vec3 {
        HeightGradient::sample(&self.heightmap, uv).surface_normal(strength)
    }
}
