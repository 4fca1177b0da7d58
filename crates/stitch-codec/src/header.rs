// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The fixed 512-byte ASCII header block.
//!
//! The header is a run of `TAG:value` fields padded with spaces and carriage
//! returns. Only `CO:` matters for decoding (it sizes the palette); the other
//! fields are informational and surfaced when present.

use tracing::warn;

use crate::anomaly::FormatAnomaly;
use crate::HEADER_LEN;

const COLOR_COUNT_TAG: &[u8] = b"CO:";
const COLOR_COUNT_WIDTH: usize = 4;

/// Declared design extents from the `+X:`, `-X:`, `+Y:` and `-Y:` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extents {
    /// Maximum reach in +X (device units).
    pub plus_x: u32,
    /// Maximum reach in -X.
    pub minus_x: u32,
    /// Maximum reach in +Y.
    pub plus_y: u32,
    /// Maximum reach in -Y.
    pub minus_y: u32,
}

/// Parsed view of the header block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Declared number of color changes. Advisory; 0 when absent.
    pub color_change_count: u32,
    /// Design label (`LA:`), trimmed.
    pub label: Option<String>,
    /// Declared stitch count (`ST:`).
    pub stitch_count: Option<u32>,
    /// Declared extents, when all four fields parse.
    pub extents: Option<Extents>,
    /// Anomalies found while reading the header.
    pub anomalies: Vec<FormatAnomaly>,
}

impl Header {
    /// Reads the header from the start of `bytes`. Never fails.
    pub fn parse(bytes: &[u8]) -> Self {
        let block = &bytes[..bytes.len().min(HEADER_LEN)];
        let mut header = Self::default();

        if bytes.len() < HEADER_LEN {
            header.anomalies.push(FormatAnomaly::ShortHeader { len: bytes.len() });
        }

        match field(block, COLOR_COUNT_TAG, COLOR_COUNT_WIDTH) {
            None => header.anomalies.push(FormatAnomaly::MissingColorCount),
            Some(raw) => match lenient_int(&raw) {
                Some(n) if n >= 0 => header.color_change_count = u32::try_from(n).unwrap_or(0),
                _ => header.anomalies.push(FormatAnomaly::UnparsableColorCount { raw }),
            },
        }

        header.label = field(block, b"LA:", 16)
            .map(|s| s.split('\r').next().unwrap_or_default().trim().to_owned())
            .filter(|s| !s.is_empty());
        header.stitch_count = numeric_field(block, b"ST:", 7);
        header.extents = match (
            numeric_field(block, b"+X:", 5),
            numeric_field(block, b"-X:", 5),
            numeric_field(block, b"+Y:", 5),
            numeric_field(block, b"-Y:", 5),
        ) {
            (Some(plus_x), Some(minus_x), Some(plus_y), Some(minus_y)) => Some(Extents {
                plus_x,
                minus_x,
                plus_y,
                minus_y,
            }),
            _ => None,
        };

        for anomaly in &header.anomalies {
            warn!(%anomaly, "dst header");
        }
        header
    }
}

/// Returns up to `width` characters following the first `tag` in `block`.
///
/// Bytes map straight to code points (Latin-1), so any byte sequence reads.
fn field(block: &[u8], tag: &[u8], width: usize) -> Option<String> {
    let at = block.windows(tag.len()).position(|w| w == tag)?;
    let start = at + tag.len();
    let end = (start + width).min(block.len());
    Some(block[start..end].iter().copied().map(char::from).collect())
}

fn numeric_field(block: &[u8], tag: &[u8], width: usize) -> Option<u32> {
    field(block, tag, width)
        .and_then(|raw| lenient_int(&raw))
        .and_then(|n| u32::try_from(n).ok())
}

/// Parses a leading decimal integer: leading whitespace is skipped, an
/// optional sign is accepted, and parsing stops at the first non-digit.
/// Returns `None` when no digit follows.
pub fn lenient_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}
