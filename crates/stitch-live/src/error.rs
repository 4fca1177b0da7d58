// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for loading and live parameter changes.

use std::path::PathBuf;

use stitch_codec::ColorParseError;
use thiserror::Error;

use crate::options::ParamKey;

/// The raw bytes could not be obtained. Parsing never starts.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Reading a file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A custom source reported a failure.
    #[error("byte source unavailable: {0}")]
    Unavailable(String),
}

/// A parameter value was rejected. State is left untouched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No parameter by that name.
    #[error("unknown parameter {0:?}")]
    UnknownKey(String),
    /// Value did not parse as a number.
    #[error("{key}: {value:?} is not a number")]
    InvalidNumber {
        /// Parameter being set.
        key: ParamKey,
        /// Raw input.
        value: String,
    },
    /// Value did not parse as a boolean.
    #[error("{key}: {value:?} is not a boolean")]
    InvalidBool {
        /// Parameter being set.
        key: ParamKey,
        /// Raw input.
        value: String,
    },
    /// Number parsed but is outside the accepted range.
    #[error("{key}: {value} is out of range (expected {expected})")]
    OutOfRange {
        /// Parameter being set.
        key: ParamKey,
        /// Rejected value.
        value: f64,
        /// Human-readable accepted range.
        expected: &'static str,
    },
    /// A palette entry is not a color.
    #[error(transparent)]
    Color(#[from] ColorParseError),
    /// Options JSON did not deserialize.
    #[error("options json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of [`crate::load`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bytes could not be fetched.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    /// Options were invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
