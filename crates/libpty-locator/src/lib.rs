//! Native pty library resolution.
//!
//! This crate answers a single question at process start: given the host
//! operating system, CPU architecture and the installation layout of the
//! surrounding package, where is the native pty shared library? It provides
//! host introspection (`HostPlatform`, `SystemHost`), the `PTY_LIB_FOLDER`
//! override (`LocatorConfig`), installation root discovery
//! (`ExecutableLocator`, `ArchiveLocator`) and the candidate search itself
//! (`LibraryResolver`). Loading the library is left to the caller.

pub mod config;
pub mod platform;
pub mod resolver;
pub mod root;

pub use config::{LocatorConfig, LIB_FOLDER_ENV};
pub use platform::{
    native_file_name, platform_folder_name, HostPlatform, PlatformKind, StaticHost, SystemHost,
};
pub use resolver::{Candidate, CandidateLayout, LayoutKind, LibraryResolver, NESTED_DIR};
pub use root::{archive_parent_dir, ArchiveLocator, ExecutableLocator, InstallationRootLocator};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("installation root not found: {reason}")]
    RootNotFound { reason: String },
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },
    #[error("could not find {file_name}, searched from {}", .base.display())]
    LibraryNotFound {
        file_name: String,
        base: PathBuf,
        attempted: Vec<PathBuf>,
    },
}

impl LocatorError {
    pub(crate) fn root_not_found(reason: impl Into<String>) -> Self {
        Self::RootNotFound {
            reason: reason.into(),
        }
    }

    /// Every file path probed before giving up, in priority order.
    /// Empty for errors raised before the search started.
    pub fn attempted(&self) -> &[PathBuf] {
        match self {
            Self::LibraryNotFound { attempted, .. } => attempted,
            _ => &[],
        }
    }
}

/// Resolve the native pty library for this process.
///
/// Uses the process-wide `PTY_LIB_FOLDER` override when set, otherwise the
/// directory of the running executable.
pub fn resolve_native_library() -> Result<PathBuf, LocatorError> {
    LibraryResolver::from_process().resolve_native_library()
}

/// Resolve an auxiliary native file shipped next to the pty library.
pub fn resolve_native_file(file_name: &str) -> Result<PathBuf, LocatorError> {
    LibraryResolver::from_process().resolve_native_file(file_name)
}
