//! Flat water plane mesh, displaced on the GPU every frame.

use bytemuck::{Pod, Zeroable};

use crate::params::RenderConfig;

/// Vertex data for the water plane (rest position, y = 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Finest grid whose index buffer (`6 * n^2` u32) fits wgpu's default
/// `max_buffer_size` of 256 MiB
pub const MAX_SEGMENTS: u32 = 2048;

/// Square XZ grid centred on the origin
pub struct WaterMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    extent: f32,
    segments: u32,
}

impl WaterMesh {
    /// Build a grid of `segments` cells per side spanning `extent` world units
    ///
    /// `segments` is clamped to `1..=MAX_SEGMENTS`.
    pub fn new(extent: f32, segments: u32) -> Self {
        let segments = Self::clamp_segments(segments);
        let cell = extent / segments as f32;
        let half_size = extent / 2.0;
        let row = segments + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);

        for z in 0..=segments {
            for x in 0..=segments {
                vertices.push(Vertex {
                    position: [
                        x as f32 * cell - half_size,
                        0.0,
                        z as f32 * cell - half_size,
                    ],
                });
            }
        }

        // Two triangles per cell
        for z in 0..segments {
            for x in 0..segments {
                let top_left = z * row + x;
                let top_right = top_left + 1;
                let bottom_left = (z + 1) * row + x;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            extent,
            segments,
        }
    }

    pub fn clamp_segments(segments: u32) -> u32 {
        segments.clamp(1, MAX_SEGMENTS)
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.mesh_extent, config.mesh_segments)
    }

    /// Distance between neighbouring vertices; used as the normal
    /// reconstruction step so normals resolve what the mesh can show
    pub fn cell_size(&self) -> f32 {
        self.extent / self.segments as f32
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }
}
