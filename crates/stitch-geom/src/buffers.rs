// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Flat vertex buffers handed to the renderer.

use glam::Vec3;
use serde::Serialize;

use crate::bounds::Aabb;

/// How the renderer should assemble the vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Indexed triangle list (quad ribbon).
    TriangleList,
    /// Unindexed connected polyline.
    LineStrip,
}

/// Output of one geometry build.
///
/// All attribute arrays are flattened: `positions`, `colors` and `normals`
/// hold 3 floats per vertex, `uvs` 2. Line strips carry no normals, UVs or
/// indices. A new set is built on every regeneration; it is never edited in
/// place once handed out.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeometryBuffers {
    /// Primitive assembly.
    pub topology: Topology,
    /// Vertex positions (x, y, z).
    pub positions: Vec<f32>,
    /// Vertex colors (r, g, b).
    pub colors: Vec<f32>,
    /// Vertex normals, triangle lists only.
    pub normals: Vec<f32>,
    /// Texture coordinates, triangle lists only.
    pub uvs: Vec<f32>,
    /// Triangle indices, triangle lists only.
    pub indices: Vec<u32>,
}

/// Visible slice of the buffers, in indices (indexed) or vertices (unindexed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DrawRange {
    /// First visible element.
    pub start: usize,
    /// Number of visible elements.
    pub count: usize,
}

impl GeometryBuffers {
    /// Empty buffers for the given topology.
    pub fn empty(topology: Topology) -> Self {
        Self {
            topology,
            positions: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles (0 for line strips).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the renderer should use the index buffer.
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of drawable elements: indices when indexed, else vertices.
    pub fn element_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len()
        } else {
            self.vertex_count()
        }
    }

    /// Scales the drawable element count by `fraction` (clamped to `[0, 1]`,
    /// truncated). NaN shows everything.
    pub fn draw_range(&self, fraction: f64) -> DrawRange {
        let f = if fraction.is_nan() { 1.0 } else { fraction.clamp(0.0, 1.0) };
        DrawRange {
            start: 0,
            count: (f * self.element_count() as f64) as usize,
        }
    }

    /// Whole triangles inside `range` (0 for line strips).
    pub fn visible_triangles(&self, range: DrawRange) -> usize {
        match self.topology {
            Topology::TriangleList => range.count.min(self.indices.len()) / 3,
            Topology::LineStrip => 0,
        }
    }

    /// Bounds of all vertex positions, `None` when there are none.
    pub fn bounds(&self) -> Option<Aabb> {
        let points: Vec<Vec3> = self
            .positions
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .collect();
        Aabb::from_points(&points)
    }

    /// Raw position bytes for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw color bytes for upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw normal bytes for upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw UV bytes for upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Raw index bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
