// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Non-fatal format anomalies.
//!
//! Nothing in this crate fails on malformed-but-readable input. Anything odd
//! is recorded as a [`FormatAnomaly`], logged, and parsing carries on with a
//! best-effort result.

use thiserror::Error;

/// A deviation from the expected DST layout that was absorbed during parsing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatAnomaly {
    /// The buffer is shorter than the fixed header block.
    #[error("buffer is {len} bytes, shorter than the 512-byte header")]
    ShortHeader {
        /// Actual buffer length.
        len: usize,
    },
    /// No `CO:` tag in the header; the color-change count defaults to 0.
    #[error("header has no CO: tag; assuming no color changes")]
    MissingColorCount,
    /// The `CO:` tag was present but its value did not parse.
    #[error("header CO: value {raw:?} is not a number; assuming no color changes")]
    UnparsableColorCount {
        /// The raw characters that followed the tag.
        raw: String,
    },
    /// The stream ran out before the `00 00 F3` end marker.
    #[error("stitch stream ended at byte {offset} without an end marker")]
    MissingSentinel {
        /// Offset at which the walk stopped.
        offset: usize,
    },
    /// Bytes left over after the last whole record.
    #[error("{len} trailing byte(s) after the last whole record")]
    TrailingBytes {
        /// Number of leftover bytes.
        len: usize,
    },
}
