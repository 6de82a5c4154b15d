use crate::config::LocatorConfig;
use crate::platform::{HostPlatform, SystemHost};
use crate::root::{ExecutableLocator, InstallationRootLocator};
use crate::LocatorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Subdirectory name used by the nested and sibling layouts.
pub const NESTED_DIR: &str = "libpty";

/// Where a candidate base sits relative to the installation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// `root`
    Flat,
    /// `root/libpty`
    Nested,
    /// `parent(root)/libpty`
    Sibling,
}

/// Ordered base directories searched for native files.
///
/// Recomputed for every resolution; the first base is always the
/// installation root itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLayout {
    bases: Vec<(LayoutKind, PathBuf)>,
}

impl CandidateLayout {
    /// Flat, nested and sibling bases, in that priority order. The sibling
    /// base is omitted when the root has no parent.
    pub fn for_library(root: &Path) -> Self {
        let mut layout = Self::for_file(root);
        if let Some(parent) = root.parent().filter(|p| !p.as_os_str().is_empty()) {
            layout
                .bases
                .push((LayoutKind::Sibling, parent.join(NESTED_DIR)));
        }
        layout
    }

    /// Flat and nested bases only, as searched for auxiliary files.
    pub fn for_file(root: &Path) -> Self {
        Self {
            bases: vec![
                (LayoutKind::Flat, root.to_path_buf()),
                (LayoutKind::Nested, root.join(NESTED_DIR)),
            ],
        }
    }

    pub fn bases(&self) -> impl Iterator<Item = (LayoutKind, &Path)> {
        self.bases.iter().map(|(kind, base)| (*kind, base.as_path()))
    }

    pub fn first_base(&self) -> &Path {
        &self.bases[0].1
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// A probed file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub layout: LayoutKind,
    pub base: PathBuf,
    pub path: PathBuf,
    pub exists: bool,
}

/// Resolves native pty files for a host.
///
/// Holds no state between calls: every resolution determines the root,
/// maps the platform and probes the file system again.
pub struct LibraryResolver {
    config: LocatorConfig,
    host: Box<dyn HostPlatform>,
    locator: Box<dyn InstallationRootLocator>,
}

impl LibraryResolver {
    /// Resolver for the running system, rooted by `config` or, without an
    /// override, by the executable's directory.
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            config,
            host: Box::new(SystemHost),
            locator: Box::new(ExecutableLocator),
        }
    }

    /// Resolver using the process-wide `PTY_LIB_FOLDER` snapshot.
    pub fn from_process() -> Self {
        Self::new(LocatorConfig::process().clone())
    }

    #[must_use]
    pub fn with_host(mut self, host: impl HostPlatform + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    #[must_use]
    pub fn with_locator(mut self, locator: impl InstallationRootLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn HostPlatform {
        self.host.as_ref()
    }

    /// The override when configured, otherwise whatever the locator reports.
    pub fn installation_root(&self) -> Result<PathBuf, LocatorError> {
        if let Some(folder) = self.config.lib_folder() {
            debug!("using {} override: {}", crate::LIB_FOLDER_ENV, folder.display());
            return Ok(folder.to_path_buf());
        }
        let root = self.locator.locate_installation_root()?;
        debug!("located installation root: {}", root.display());
        Ok(root)
    }

    /// Every candidate for the platform's native library, in priority order.
    pub fn library_candidates(&self) -> Result<Vec<Candidate>, LocatorError> {
        let root = self.installation_root()?;
        let kind = self.host.platform_kind()?;
        let layout = CandidateLayout::for_library(&root);
        let candidates = self
            .probes(&layout, kind.folder_name(), kind.native_file_name())
            .collect();
        Ok(candidates)
    }

    /// Every candidate for an auxiliary native file, in priority order.
    pub fn file_candidates(&self, file_name: &str) -> Result<Vec<Candidate>, LocatorError> {
        let root = self.installation_root()?;
        let kind = self.host.platform_kind()?;
        let layout = CandidateLayout::for_file(&root);
        let candidates = self.probes(&layout, kind.folder_name(), file_name).collect();
        Ok(candidates)
    }

    pub fn resolve_native_library(&self) -> Result<PathBuf, LocatorError> {
        let root = self.installation_root()?;
        let kind = self.host.platform_kind()?;
        let layout = CandidateLayout::for_library(&root);
        self.first_existing(&layout, kind.folder_name(), kind.native_file_name())
    }

    /// Like [`resolve_native_library`](Self::resolve_native_library) for a
    /// caller-chosen file name, searching only the flat and nested bases.
    pub fn resolve_native_file(&self, file_name: &str) -> Result<PathBuf, LocatorError> {
        let root = self.installation_root()?;
        let kind = self.host.platform_kind()?;
        let layout = CandidateLayout::for_file(&root);
        self.first_existing(&layout, kind.folder_name(), file_name)
    }

    fn first_existing(
        &self,
        layout: &CandidateLayout,
        platform_folder: &str,
        file_name: &str,
    ) -> Result<PathBuf, LocatorError> {
        let mut attempted = Vec::with_capacity(layout.len());
        for candidate in self.probes(layout, platform_folder, file_name) {
            if candidate.exists {
                debug!(
                    layout = ?candidate.layout,
                    "resolved {file_name}: {}",
                    candidate.path.display()
                );
                return Ok(candidate.path);
            }
            attempted.push(candidate.path);
        }
        Err(LocatorError::LibraryNotFound {
            file_name: file_name.to_owned(),
            base: layout.first_base().to_path_buf(),
            attempted,
        })
    }

    fn probes<'a>(
        &'a self,
        layout: &'a CandidateLayout,
        platform_folder: &'a str,
        file_name: &'a str,
    ) -> impl Iterator<Item = Candidate> + 'a {
        let arch = self.host.architecture_tag();
        layout.bases().map(move |(kind, base)| {
            let path = probe_candidate(base, platform_folder, arch, file_name);
            let exists = path.exists();
            trace!(layout = ?kind, exists, "probed {}", path.display());
            Candidate {
                layout: kind,
                base: base.to_path_buf(),
                path,
                exists,
            }
        })
    }
}

/// File path to probe under `base`.
///
/// An architecture directory directly under the base takes precedence over
/// the platform-nested `base/<platform>/<arch>` arrangement.
fn probe_candidate(base: &Path, platform_folder: &str, arch: &str, file_name: &str) -> PathBuf {
    let arch_dir = base.join(arch);
    if arch_dir.is_dir() {
        arch_dir.join(file_name)
    } else {
        base.join(platform_folder).join(arch).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticHost;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn linux_resolver(root: &Path) -> LibraryResolver {
        LibraryResolver::new(LocatorConfig::new().with_lib_folder(root))
            .with_host(StaticHost::new("linux", "x86-64"))
    }

    #[test]
    fn library_layout_order() {
        let layout = CandidateLayout::for_library(Path::new("/opt/app/lib"));
        let bases: Vec<_> = layout.bases().collect();
        assert_eq!(
            bases,
            vec![
                (LayoutKind::Flat, Path::new("/opt/app/lib")),
                (LayoutKind::Nested, Path::new("/opt/app/lib/libpty")),
                (LayoutKind::Sibling, Path::new("/opt/app/libpty")),
            ]
        );
    }

    #[test]
    fn file_layout_has_no_sibling() {
        let layout = CandidateLayout::for_file(Path::new("/opt/app/lib"));
        assert_eq!(layout.len(), 2);
        assert!(layout.bases().all(|(kind, _)| kind != LayoutKind::Sibling));
    }

    #[cfg(unix)]
    #[test]
    fn filesystem_root_drops_sibling() {
        let layout = CandidateLayout::for_library(Path::new("/"));
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.first_base(), Path::new("/"));
    }

    #[test]
    fn relative_root_without_parent_drops_sibling() {
        let layout = CandidateLayout::for_library(Path::new("lib"));
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn probe_prefers_arch_dir_under_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x86-64")).unwrap();
        fs::create_dir_all(dir.path().join("linux/x86-64")).unwrap();
        let path = probe_candidate(dir.path(), "linux", "x86-64", "libpty.so");
        assert_eq!(path, dir.path().join("x86-64/libpty.so"));
    }

    #[test]
    fn probe_falls_back_to_platform_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = probe_candidate(dir.path(), "linux", "x86-64", "libpty.so");
        assert_eq!(path, dir.path().join("linux/x86-64/libpty.so"));
    }

    #[test]
    fn arch_dir_without_file_shadows_platform_layout() {
        // An empty `<arch>` directory still selects the flat probe path, so a
        // file under `<platform>/<arch>` in the same base is not considered.
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("lib");
        fs::create_dir_all(root.join("x86-64")).unwrap();
        touch(&root.join("linux/x86-64/libpty.so"));

        let err = linux_resolver(&root).resolve_native_library().unwrap_err();
        assert!(matches!(err, LocatorError::LibraryNotFound { .. }));
        assert_eq!(err.attempted()[0], root.join("x86-64/libpty.so"));
    }

    #[test]
    fn candidates_report_existence() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("lib");
        touch(&root.join("libpty/linux/x86-64/libpty.so"));

        let candidates = linux_resolver(&root).library_candidates().unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(
            candidates.iter().map(|c| c.exists).collect::<Vec<_>>(),
            vec![false, true, false]
        );
        assert_eq!(candidates[1].layout, LayoutKind::Nested);
        assert_eq!(candidates[2].base, dir.path().join("libpty"));
    }

    #[test]
    fn root_is_resolved_before_platform() {
        let resolver = LibraryResolver::new(LocatorConfig::new())
            .with_host(StaticHost::new("plan9", "x86-64"))
            .with_locator(|| -> Result<PathBuf, LocatorError> {
                Err(LocatorError::RootNotFound {
                    reason: "not packaged".to_owned(),
                })
            });
        assert!(matches!(
            resolver.resolve_native_library(),
            Err(LocatorError::RootNotFound { .. })
        ));
    }

    #[test]
    fn unsupported_platform_fails_file_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = LibraryResolver::new(LocatorConfig::new().with_lib_folder(dir.path()))
            .with_host(StaticHost::new("solaris", "sparcv9"));
        let err = resolver.resolve_native_file("winpty-agent.exe").unwrap_err();
        assert!(matches!(err, LocatorError::UnsupportedPlatform { ref os } if os == "solaris"));
    }
}
