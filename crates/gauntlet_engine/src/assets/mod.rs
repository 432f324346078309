//! Asset management: content-addressed cache and shared handles
//!
//! The cache is the single creation authority for shared resources: asking
//! for the same path twice yields the same underlying record. Decoding of
//! mesh/texture/shader payloads belongs to the rendering collaborator; the
//! types here are the CPU-side descriptors components attach to.
//!
//! Load failures never abort scene construction. A failed load produces a
//! placeholder handle that remembers why it is missing, so authoring can
//! proceed with visibly-broken-but-running content.

pub mod cache;
pub mod types;

pub use cache::{cache, create_asset, AssetCache, AssetHandle};
pub use types::{MeshResource, ShaderProgram, ShaderStages, Texture1D, Texture2D, Texture3D, TextureCube};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reported by the resource-loader boundary
#[derive(Debug, Error)]
pub enum AssetError {
    /// The content address does not resolve to a file
    #[error("asset not found: {path}")]
    NotFound {
        /// Content address that failed to resolve
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("failed to read asset {path}: {source}")]
    Io {
        /// Content address of the unreadable file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file was read but its descriptor content is invalid
    #[error("malformed {kind} descriptor {path}: {reason}")]
    Malformed {
        /// Asset kind being parsed
        kind: &'static str,
        /// Content address of the malformed file
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// A cached placeholder was resolved where a loaded asset was required
    #[error("asset load failed for {path}: {reason}")]
    LoadFailed {
        /// Content address of the placeholder record
        path: PathBuf,
        /// The original load failure, preserved as text
        reason: String,
    },
}

/// A loadable, shareable resource descriptor
///
/// Implementors are cheap CPU-side records (paths, stage lists); the heavy
/// decode happens in the collaborator that consumes them.
pub trait Asset: Sized + Send + Sync + 'static {
    /// Human-readable asset kind used in logs and errors
    const KIND: &'static str;

    /// Load the descriptor from its content address
    fn load(path: &Path) -> Result<Self, AssetError>;
}

pub(crate) fn require_file(path: &Path) -> Result<(), AssetError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AssetError::NotFound {
            path: path.to_path_buf(),
        })
    }
}
