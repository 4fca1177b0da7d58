// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Thread colors.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Linear RGB thread color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

/// Error returned when a color string is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognized color {0:?} (expected #rgb, #rrggbb, or a named color)")]
pub struct ColorParseError(pub String);

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("blue", 0x0000ff),
    ("navy", 0x000080),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("silver", 0xc0c0c0),
    ("yellow", 0xffff00),
    ("gold", 0xffd700),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("pink", 0xffc0cb),
    ("brown", 0xa52a2a),
    ("cyan", 0x00ffff),
    ("magenta", 0xff00ff),
    ("teal", 0x008080),
    ("maroon", 0x800000),
    ("olive", 0x808000),
];

impl Color {
    /// Pure white; the starting thread when no palette is available.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Builds a color from float components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    pub fn from_hex(rgb: u32) -> Self {
        let channel = |shift: u32| f32::from(((rgb >> shift) & 0xff) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Packs the color as `0xRRGGBB`, rounding each channel to 8 bits.
    pub fn to_hex(self) -> u32 {
        let q = |c: f32| u32::from((c.clamp(0.0, 1.0) * 255.0).round() as u8);
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    /// Components as an array, in buffer order.
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ColorParseError(s.to_owned());
        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
            return match hex.len() {
                6 => Ok(Self::from_hex(value)),
                3 => {
                    let expand = |n: u32| (n & 0xf) * 0x11;
                    Ok(Self::from_hex(
                        (expand(value >> 8) << 16) | (expand(value >> 4) << 8) | expand(value),
                    ))
                }
                _ => Err(err()),
            };
        }
        let lower = trimmed.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, rgb)| Self::from_hex(rgb))
            .ok_or_else(err)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
