// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Live DST rendering state.
//!
//! [`load`] fetches a DST buffer, merges caller options onto the defaults, and
//! returns a [`LiveController`] holding the decoded geometry. The controller
//! is the only mutable surface: parameter changes mark the geometry stale and
//! a background task rebuilds it, coalescing bursts of changes into one build.
//!
//! # Design Principles
//!
//! - **Only retrieval fails**: malformed files still yield (possibly empty)
//!   geometry; bad parameter values are rejected before touching state.
//! - **Replace, don't mutate**: consumers hold `Arc`s to installed buffers.
//! - **Draw range stays out of the rebuild path**: it is a per-frame
//!   projection; rebuilds run on their own task.

use tracing::{info, instrument};

mod controller;
mod error;
mod options;
mod source;

pub use controller::{Frame, Installed, LiveController};
pub use error::{ConfigError, LoadError, RetrievalError};
pub use options::{parse_palette, ControllerConfig, LoadOptions, ParamKey, RenderParameters};
pub use source::{ByteSource, FileSource, MemorySource};

/// Loads a DST file with default controller tuning.
pub async fn load<S: ByteSource>(source: &S, options: &LoadOptions) -> Result<LiveController, LoadError> {
    load_with(source, options, ControllerConfig::default()).await
}

/// Loads a DST file.
///
/// Options are validated before any bytes are fetched. The parse and initial
/// build run to completion before this returns.
#[instrument(skip_all, fields(source = %source.describe()))]
pub async fn load_with<S: ByteSource>(
    source: &S,
    options: &LoadOptions,
    config: ControllerConfig,
) -> Result<LiveController, LoadError> {
    let params = options.merge()?;
    let bytes = source.fetch().await?;
    info!(len = bytes.len(), "dst bytes fetched");
    Ok(LiveController::spawn(bytes, params, config))
}
