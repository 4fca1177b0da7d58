// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Byte sources: the only I/O boundary in front of the parser.

use std::future::Future;
use std::path::PathBuf;

use crate::error::RetrievalError;

/// Something that can produce the raw bytes of a DST file.
///
/// Network fetchers, asset bundles and the like live outside this crate and
/// implement this trait; failures surface as [`RetrievalError`].
pub trait ByteSource {
    /// Fetches the whole buffer.
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, RetrievalError>> + Send;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Reads a file from disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ByteSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| RetrievalError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Bytes already in memory.
#[derive(Clone, Debug)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Wraps an owned buffer.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ByteSource for MemorySource {
    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }
}
