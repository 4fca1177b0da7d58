// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Renderable geometry for decoded DST stitch paths.

This crate provides:
- Flat vertex/index buffers (`GeometryBuffers`) with draw-range helpers.
- Quad-ribbon and polyline synthesis from `stitch_codec::StitchEvent`s.
- Axis-aligned bounds of a design (`Aabb`).

Design notes:
- Deterministic: the only randomness (UV jitter) comes from a caller seed.
- Float32 throughout, in device units (0.1 mm); renderers apply `MODEL_SCALE`.
- Buffers are rebuilt whole, never patched.
"]

/// Vertex and index buffers.
pub mod buffers;
/// Bounding boxes.
pub mod bounds;
/// Event-to-geometry synthesis.
pub mod synth;

pub use bounds::Aabb;
pub use buffers::{DrawRange, GeometryBuffers, Topology};
pub use synth::{build, synthesize, Build, GeometryParams, UV_JITTER_MAX, UV_LENGTH_SCALE};

/// Uniform scale renderers apply to device-unit geometry.
pub const MODEL_SCALE: f32 = 0.01;
