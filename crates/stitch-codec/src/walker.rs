// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single forward pass over the stitch records.
//!
//! The walker owns the pen state (absolute position, current color, and the
//! jump/stop flag of the previous record) and yields one [`StitchEvent`] per
//! record until the `00 00 F3` marker or the end of the buffer.

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::anomaly::FormatAnomaly;
use crate::color::Color;
use crate::decode::{decode, StitchDelta};
use crate::palette::{random_unit_color, Palette};
use crate::{HEADER_LEN, RECORD_LEN, SENTINEL};

/// Where each block's color comes from.
#[derive(Debug)]
pub enum ColorSource<'a> {
    /// Colors are looked up in a resolved palette, starting at entry 0.
    Palette(&'a Palette),
    /// No palette: start white and draw a fresh unit color at each stop.
    Random(StdRng),
}

/// Pen accumulator carried from record to record. Never reset mid-file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PenState {
    /// Absolute X in device units.
    pub x: f32,
    /// Absolute Y in device units.
    pub y: f32,
    /// Index of the current color block.
    pub color_index: usize,
    /// Whether the last processed record was a jump or a color stop.
    pub was_jump_or_stop: bool,
}

/// Why the walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The `00 00 F3` end marker was read.
    Sentinel,
    /// Fewer than 3 bytes were left.
    EndOfBuffer,
}

/// Walker state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkState {
    /// Still reading records.
    Streaming,
    /// Terminal.
    Ended(EndReason),
}

/// One processed record, as consumed by geometry synthesis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StitchEvent {
    /// Pen position before the record.
    pub from: Vec2,
    /// Pen position after the record.
    pub to: Vec2,
    /// Thread color in effect after the record (a stop switches it first).
    pub color: Color,
    /// Color block index after the record.
    pub color_index: usize,
    /// Whether the *previous* record was a jump or stop. Segments that follow
    /// one are drawn with the jump thickness.
    pub after_jump_or_stop: bool,
    /// The decoded record itself.
    pub delta: StitchDelta,
}

/// Totals gathered over a walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Events emitted.
    pub events: usize,
    /// Records flagged as jumps.
    pub jumps: usize,
    /// Records flagged as color stops.
    pub color_stops: usize,
    /// How the walk ended, once it has.
    pub end: Option<EndReason>,
    /// Anomalies hit in the stitch stream.
    pub anomalies: Vec<FormatAnomaly>,
}

/// Iterator over the stitch records of a DST buffer.
#[derive(Debug)]
pub struct StitchWalker<'a> {
    bytes: &'a [u8],
    offset: usize,
    pen: PenState,
    color: Color,
    colors: ColorSource<'a>,
    state: WalkState,
    summary: WalkSummary,
}

impl<'a> StitchWalker<'a> {
    /// Starts a walk at the first record after the header.
    pub fn new(bytes: &'a [u8], colors: ColorSource<'a>) -> Self {
        let color = match &colors {
            ColorSource::Palette(p) => p.get(0),
            ColorSource::Random(_) => Color::WHITE,
        };
        Self {
            bytes,
            offset: HEADER_LEN,
            pen: PenState::default(),
            color,
            colors,
            state: WalkState::Streaming,
            summary: WalkSummary::default(),
        }
    }

    /// Current state of the walk.
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Current pen state.
    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Totals so far.
    pub fn summary(&self) -> &WalkSummary {
        &self.summary
    }

    /// Runs the walk to the end and returns its totals.
    pub fn finish(mut self) -> WalkSummary {
        while self.next().is_some() {}
        self.summary
    }

    fn end(&mut self, reason: EndReason) {
        self.state = WalkState::Ended(reason);
        self.summary.end = Some(reason);
        if reason == EndReason::EndOfBuffer {
            let remaining = self.bytes.len().saturating_sub(self.offset);
            if remaining > 0 {
                self.summary.anomalies.push(FormatAnomaly::TrailingBytes { len: remaining });
            }
            self.summary.anomalies.push(FormatAnomaly::MissingSentinel {
                offset: self.offset.min(self.bytes.len()),
            });
            for anomaly in &self.summary.anomalies {
                warn!(%anomaly, "dst stitch stream");
            }
        }
        debug!(
            events = self.summary.events,
            jumps = self.summary.jumps,
            color_stops = self.summary.color_stops,
            ?reason,
            "stitch walk ended"
        );
    }

    fn next_color(&mut self) {
        self.pen.color_index += 1;
        self.color = match &mut self.colors {
            ColorSource::Palette(p) => {
                self.pen.color_index %= p.len();
                p.get(self.pen.color_index)
            }
            ColorSource::Random(rng) => random_unit_color(rng),
        };
    }
}

impl Iterator for StitchWalker<'_> {
    type Item = StitchEvent;

    fn next(&mut self) -> Option<StitchEvent> {
        if self.state != WalkState::Streaming {
            return None;
        }
        let Some(record) = self
            .bytes
            .get(self.offset..self.offset + RECORD_LEN)
            .and_then(|r| <[u8; RECORD_LEN]>::try_from(r).ok())
        else {
            self.end(EndReason::EndOfBuffer);
            return None;
        };
        if record == SENTINEL {
            self.end(EndReason::Sentinel);
            return None;
        }
        self.offset += RECORD_LEN;

        let delta = decode(record);
        let from = Vec2::new(self.pen.x, self.pen.y);
        self.pen.x += delta.dx as f32;
        self.pen.y += delta.dy as f32;
        if delta.color_stop {
            self.next_color();
        }

        let event = StitchEvent {
            from,
            to: Vec2::new(self.pen.x, self.pen.y),
            color: self.color,
            color_index: self.pen.color_index,
            after_jump_or_stop: self.pen.was_jump_or_stop,
            delta,
        };
        self.pen.was_jump_or_stop = delta.is_jump_or_stop();

        self.summary.events += 1;
        self.summary.jumps += usize::from(delta.jump);
        self.summary.color_stops += usize::from(delta.color_stop);
        Some(event)
    }
}
