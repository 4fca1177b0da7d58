// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bit-level decoding of a single 3-byte stitch record.
//!
//! A record is read as a 24-bit command word, most-significant byte first.
//! Every bit position maps to exactly one [`BitEffect`]; the decoded delta is
//! the sum of the effects of all set bits. The end-of-pattern marker sets
//! both `y += 81` and `y -= 81`, which cancel; that is part of the format.

/// What a single set bit contributes to a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitEffect {
    /// Bit carries no meaning (bits 0 and 1 are always set by writers).
    Unused,
    /// Adds the value to the X delta.
    Dx(i32),
    /// Adds the value to the Y delta.
    Dy(i32),
    /// Marks the record as a jump (needle moves without stitching).
    Jump,
    /// Marks the record as a color change or end of pattern.
    ColorStop,
}

/// Effect of each bit of the command word, indexed by bit position.
pub const BIT_TABLE: [BitEffect; 24] = [
    BitEffect::Unused,    // 0
    BitEffect::Unused,    // 1
    BitEffect::Dx(81),    // 2
    BitEffect::Dx(-81),   // 3
    BitEffect::Dy(-81),   // 4
    BitEffect::Dy(81),    // 5
    BitEffect::ColorStop, // 6
    BitEffect::Jump,      // 7
    BitEffect::Dx(3),     // 8
    BitEffect::Dx(-3),    // 9
    BitEffect::Dx(27),    // 10
    BitEffect::Dx(-27),   // 11
    BitEffect::Dy(-27),   // 12
    BitEffect::Dy(27),    // 13
    BitEffect::Dy(-3),    // 14
    BitEffect::Dy(3),     // 15
    BitEffect::Dx(1),     // 16
    BitEffect::Dx(-1),    // 17
    BitEffect::Dx(9),     // 18
    BitEffect::Dx(-9),    // 19
    BitEffect::Dy(-9),    // 20
    BitEffect::Dy(9),     // 21
    BitEffect::Dy(-1),    // 22
    BitEffect::Dy(1),     // 23
];

/// Decoded motion of one stitch record, in device units (0.1 mm).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StitchDelta {
    /// Relative X motion.
    pub dx: i32,
    /// Relative Y motion.
    pub dy: i32,
    /// Jump stitch: the needle moves without engaging thread.
    pub jump: bool,
    /// Color change (or end of pattern).
    pub color_stop: bool,
}

impl StitchDelta {
    /// Whether this record breaks the thread run (jump or color stop).
    pub fn is_jump_or_stop(&self) -> bool {
        self.jump || self.color_stop
    }
}

/// Packs three record bytes into a command word, first byte most significant.
pub fn command_word(bytes: [u8; 3]) -> u32 {
    (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
}

/// Decodes a 24-bit command word. Bits above 23 are ignored.
pub fn decode_word(word: u32) -> StitchDelta {
    let mut delta = StitchDelta::default();
    for (bit, effect) in BIT_TABLE.iter().enumerate() {
        if word & (1 << bit) == 0 {
            continue;
        }
        match *effect {
            BitEffect::Unused => {}
            BitEffect::Dx(v) => delta.dx += v,
            BitEffect::Dy(v) => delta.dy += v,
            BitEffect::Jump => delta.jump = true,
            BitEffect::ColorStop => delta.color_stop = true,
        }
    }
    delta
}

/// Decodes one record given in stream order (first byte most significant).
pub fn decode(bytes: [u8; 3]) -> StitchDelta {
    decode_word(command_word(bytes))
}
