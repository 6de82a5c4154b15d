//! Installation root discovery.
//!
//! The installation root is the directory that holds the package's own
//! artifacts; bundled native libraries are searched relative to it. A
//! `PTY_LIB_FOLDER` override bypasses these locators entirely.

use crate::LocatorError;
use std::path::{Path, PathBuf};
use url::Url;

const ARCHIVE_SCHEME: &str = "jar:";
const ENTRY_SEPARATOR: char = '!';

pub trait InstallationRootLocator: Send + Sync {
    fn locate_installation_root(&self) -> Result<PathBuf, LocatorError>;
}

impl<F> InstallationRootLocator for F
where
    F: Fn() -> Result<PathBuf, LocatorError> + Send + Sync,
{
    fn locate_installation_root(&self) -> Result<PathBuf, LocatorError> {
        self()
    }
}

/// Locates the directory containing the running executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutableLocator;

impl InstallationRootLocator for ExecutableLocator {
    fn locate_installation_root(&self) -> Result<PathBuf, LocatorError> {
        let exe = std::env::current_exe().map_err(|e| {
            LocatorError::root_not_found(format!("cannot determine current executable: {e}"))
        })?;
        // Installed binaries are often symlinked into a bin directory; the
        // native libraries live next to the real file.
        let exe = std::fs::canonicalize(&exe).unwrap_or(exe);
        parent_dir(&exe)
    }
}

/// Locates the directory containing an archive, given an archive-relative
/// location such as `jar:file:/opt/app/lib/pty.jar!/native/Entry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLocator {
    location: String,
}

impl ArchiveLocator {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_owned(),
        }
    }
}

impl InstallationRootLocator for ArchiveLocator {
    fn locate_installation_root(&self) -> Result<PathBuf, LocatorError> {
        archive_parent_dir(&self.location)
    }
}

/// Parse an archive-relative location and return the directory holding the
/// archive.
///
/// The entry part after `!` is discarded, an optional `jar:` prefix is
/// stripped and the remainder must be a percent-encoded `file:` URL.
pub fn archive_parent_dir(location: &str) -> Result<PathBuf, LocatorError> {
    let (archive, _entry) = location.split_once(ENTRY_SEPARATOR).ok_or_else(|| {
        LocatorError::root_not_found(format!("location is not within an archive: {location}"))
    })?;
    let archive = archive.strip_prefix(ARCHIVE_SCHEME).unwrap_or(archive);

    let url = Url::parse(archive).map_err(|e| {
        LocatorError::root_not_found(format!("invalid archive location '{archive}': {e}"))
    })?;
    let archive_path = url.to_file_path().map_err(|()| {
        LocatorError::root_not_found(format!("archive is not a local file: {archive}"))
    })?;
    parent_dir(&archive_path)
}

fn parent_dir(path: &Path) -> Result<PathBuf, LocatorError> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            LocatorError::root_not_found(format!("{} has no parent directory", path.display()))
        })
}
