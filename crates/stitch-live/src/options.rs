// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render parameters, load options, and their validation.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stitch_codec::Color;
use stitch_geom::GeometryParams;

use crate::error::ConfigError;

/// Names of the live parameters, as used by string-keyed setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// `quads`
    Quads,
    /// `threadThickness`
    ThreadThickness,
    /// `jumpThreadThickness`
    JumpThreadThickness,
    /// `palette`
    Palette,
    /// `drawRange`
    DrawRange,
}

impl ParamKey {
    /// Every key, in display order.
    pub const ALL: [Self; 5] = [
        Self::Quads,
        Self::ThreadThickness,
        Self::JumpThreadThickness,
        Self::Palette,
        Self::DrawRange,
    ];

    /// Canonical (camelCase) name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quads => "quads",
            Self::ThreadThickness => "threadThickness",
            Self::JumpThreadThickness => "jumpThreadThickness",
            Self::Palette => "palette",
            Self::DrawRange => "drawRange",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = ConfigError;

    /// Accepts camelCase, snake_case and kebab-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(&folded))
            .or_else(|| (folded == "drawrangefraction").then_some(Self::DrawRange))
            .ok_or_else(|| ConfigError::UnknownKey(s.to_owned()))
    }
}

/// The live, user-adjustable rendering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderParameters {
    /// Quad ribbon (`true`) or polyline.
    pub quads: bool,
    /// Ribbon offset for ordinary stitches; `> 0`.
    pub thread_thickness: f32,
    /// Ribbon offset after jumps and stops; `>= 0`.
    pub jump_thread_thickness: f32,
    /// User palette; `None` means fully generated.
    pub palette: Option<Vec<Color>>,
    /// Visible fraction of the stitch sequence, `[0, 1]`. Kept in double
    /// precision so decimal inputs like `0.7` truncate to the expected count.
    pub draw_range_fraction: f64,
}

impl RenderParameters {
    /// Defaults applied before any options are merged.
    pub const DEFAULT: Self = Self {
        quads: true,
        thread_thickness: 2.0,
        jump_thread_thickness: 0.01,
        palette: None,
        draw_range_fraction: 1.0,
    };

    /// The subset that drives geometry synthesis.
    pub fn geometry(&self) -> GeometryParams {
        GeometryParams {
            quads: self.quads,
            thread_thickness: self.thread_thickness,
            jump_thread_thickness: self.jump_thread_thickness,
        }
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Caller overrides for [`crate::load`]; unset fields keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LoadOptions {
    /// Overrides [`RenderParameters::quads`].
    pub quads: Option<bool>,
    /// Overrides [`RenderParameters::thread_thickness`].
    pub thread_thickness: Option<f32>,
    /// Overrides [`RenderParameters::jump_thread_thickness`].
    pub jump_thread_thickness: Option<f32>,
    /// Overrides [`RenderParameters::palette`].
    pub palette: Option<Vec<Color>>,
}

impl LoadOptions {
    /// Parses options from JSON, e.g. `{"quads": false, "palette": ["red"]}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merges onto [`RenderParameters::DEFAULT`], validating every override.
    pub fn merge(&self) -> Result<RenderParameters, ConfigError> {
        let mut params = RenderParameters::DEFAULT;
        if let Some(quads) = self.quads {
            params.quads = quads;
        }
        if let Some(t) = self.thread_thickness {
            params.thread_thickness = check_thread_thickness(t)?;
        }
        if let Some(t) = self.jump_thread_thickness {
            params.jump_thread_thickness = check_jump_thread_thickness(t)?;
        }
        if let Some(palette) = &self.palette {
            params.palette = Some(palette.clone());
        }
        Ok(params)
    }
}

/// Tuning for the live controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Delay between the first change and the rebuild it triggers.
    pub debounce: Duration,
    /// UV jitter seed; random per controller when `None`.
    pub jitter_seed: Option<u64>,
    /// Seed for generated palette entries; entropy when `None`.
    pub palette_seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(10),
            jitter_seed: None,
            palette_seed: None,
        }
    }
}

pub(crate) fn check_thread_thickness(v: f32) -> Result<f32, ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(ConfigError::OutOfRange {
            key: ParamKey::ThreadThickness,
            value: f64::from(v),
            expected: "a finite number > 0",
        })
    }
}

pub(crate) fn check_jump_thread_thickness(v: f32) -> Result<f32, ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(ConfigError::OutOfRange {
            key: ParamKey::JumpThreadThickness,
            value: f64::from(v),
            expected: "a finite number >= 0",
        })
    }
}

pub(crate) fn check_draw_range(v: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(ConfigError::OutOfRange {
            key: ParamKey::DrawRange,
            value: v,
            expected: "0..=1",
        })
    }
}

pub(crate) fn parse_number<T: FromStr>(key: ParamKey, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_owned(),
    })
}

pub(crate) fn parse_bool(key: ParamKey, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_owned(),
        }),
    }
}

/// Parses a comma-separated color list. Blank input means "no user palette".
pub fn parse_palette(raw: &str) -> Result<Option<Vec<Color>>, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let colors = raw
        .split(',')
        .map(str::parse)
        .collect::<Result<Vec<Color>, _>>()?;
    Ok(Some(colors))
}
