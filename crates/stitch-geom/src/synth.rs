// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Geometry synthesis from stitch events.
//!
//! Quad mode extrudes each segment sideways into a ribbon quad: the segment
//! direction is rotated 90° and scaled by the thread thickness, giving four
//! corners `from + o`, `from - o`, `to - o`, `to + o`. Line mode emits one
//! vertex per event at its destination.

use std::time::Instant;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stitch_codec::{ColorSource, StitchEvent, StitchWalker, WalkSummary};
use tracing::debug;

use crate::buffers::{GeometryBuffers, Topology};

/// Segment length (device units) covered by one V repeat of the thread texture.
pub const UV_LENGTH_SCALE: f32 = 80.0;
/// Upper bound (exclusive) of the random V offset given to each segment.
pub const UV_JITTER_MAX: f32 = 0.5;

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];
const UP: [f32; 3] = [0.0, 0.0, 1.0];

/// Inputs to synthesis that come from the render parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryParams {
    /// Quad ribbon (`true`) or polyline (`false`).
    pub quads: bool,
    /// Ribbon offset for ordinary stitches.
    pub thread_thickness: f32,
    /// Ribbon offset for segments following a jump or stop.
    pub jump_thread_thickness: f32,
}

impl GeometryParams {
    /// Thickness for a segment given whether the record before it was a jump/stop.
    pub fn thickness_for(&self, after_jump_or_stop: bool) -> f32 {
        if after_jump_or_stop {
            self.jump_thread_thickness
        } else {
            self.thread_thickness
        }
    }
}

/// Result of a full build: geometry plus what the walk saw.
#[derive(Clone, Debug, PartialEq)]
pub struct Build {
    /// Freshly built buffers.
    pub geometry: GeometryBuffers,
    /// Walk totals and anomalies.
    pub summary: WalkSummary,
}

/// Turns an event sequence into buffers. `rng` drives the per-segment UV
/// jitter in quad mode and is not touched in line mode.
pub fn synthesize<I, R>(events: I, params: &GeometryParams, rng: &mut R) -> GeometryBuffers
where
    I: IntoIterator<Item = StitchEvent>,
    R: Rng + ?Sized,
{
    if params.quads {
        let mut out = GeometryBuffers::empty(Topology::TriangleList);
        for event in events {
            push_quad(&mut out, &event, params.thickness_for(event.after_jump_or_stop), rng);
        }
        out
    } else {
        let mut out = GeometryBuffers::empty(Topology::LineStrip);
        for event in events {
            out.positions.extend_from_slice(&[event.to.x, event.to.y, 0.0]);
            out.colors.extend_from_slice(&event.color.to_array());
        }
        out
    }
}

fn push_quad<R: Rng + ?Sized>(
    out: &mut GeometryBuffers,
    event: &StitchEvent,
    thickness: f32,
    rng: &mut R,
) {
    let base = out.vertex_count() as u32;
    let segment = event.to - event.from;
    let length = segment.length();
    // Zero-length segments collapse to a degenerate quad.
    let offset: Vec2 = segment.perp().normalize_or_zero() * thickness;

    for corner in [
        event.from + offset,
        event.from - offset,
        event.to - offset,
        event.to + offset,
    ] {
        out.positions.extend_from_slice(&[corner.x, corner.y, 0.0]);
        out.colors.extend_from_slice(&event.color.to_array());
        out.normals.extend_from_slice(&UP);
    }

    let v0 = rng.gen::<f32>() * UV_JITTER_MAX;
    let v1 = length / UV_LENGTH_SCALE + v0;
    out.uvs.extend_from_slice(&[0.0, v0, 1.0, v0, 1.0, v1, 0.0, v1]);
    out.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
}

/// Walks `bytes` and synthesizes geometry in one pass.
///
/// UV jitter is drawn from a generator seeded with `jitter_seed`, so the same
/// bytes, colors, parameters and seed always give identical buffers.
pub fn build(
    bytes: &[u8],
    colors: ColorSource<'_>,
    params: &GeometryParams,
    jitter_seed: u64,
) -> Build {
    let started = Instant::now();
    let mut walker = StitchWalker::new(bytes, colors);
    let mut rng = StdRng::seed_from_u64(jitter_seed);
    let geometry = synthesize(walker.by_ref(), params, &mut rng);
    let summary = walker.finish();
    debug!(
        vertices = geometry.vertex_count(),
        triangles = geometry.triangle_count(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "geometry built"
    );
    Build { geometry, summary }
}
