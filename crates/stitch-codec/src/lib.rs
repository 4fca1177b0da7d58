// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tajima DST embroidery codec.
//!
//! A DST file is a 512-byte ASCII header followed by 3-byte stitch records and
//! a `00 00 F3` end marker. This crate turns those bytes into an ordered stream
//! of [`StitchEvent`]s: absolute segments tagged with a thread color and the
//! jump/stop state of the record before them.
//!
//! # Design Principles
//!
//! - **Never fails on readable input**: odd headers, missing end markers and
//!   trailing bytes become [`FormatAnomaly`] values, not errors.
//! - **Deterministic**: the only randomness is palette fill-in, and the
//!   random source is always injected.
//! - **Single pass**: the walker carries O(1) state and never backtracks.

pub mod anomaly;
pub mod color;
pub mod decode;
pub mod header;
pub mod palette;
pub mod walker;

pub use anomaly::FormatAnomaly;
pub use color::{Color, ColorParseError};
pub use decode::{decode, decode_word, BitEffect, StitchDelta, BIT_TABLE};
pub use header::{Extents, Header};
pub use palette::{random_unit_color, Palette};
pub use walker::{ColorSource, EndReason, PenState, StitchEvent, StitchWalker, WalkState, WalkSummary};

/// Size of the ASCII header block; records start at this offset.
pub const HEADER_LEN: usize = 512;
/// Size of one stitch record.
pub const RECORD_LEN: usize = 3;
/// End-of-pattern record.
pub const SENTINEL: [u8; RECORD_LEN] = [0x00, 0x00, 0xF3];
