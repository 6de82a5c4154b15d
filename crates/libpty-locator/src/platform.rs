use crate::LocatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system families with a packaged native pty library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    MacOs,
    Windows,
    Linux,
    FreeBsd,
    OpenBsd,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 5] = [
        Self::MacOs,
        Self::Windows,
        Self::Linux,
        Self::FreeBsd,
        Self::OpenBsd,
    ];

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(Self::MacOs),
            "windows" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            "freebsd" => Some(Self::FreeBsd),
            "openbsd" => Some(Self::OpenBsd),
            _ => None,
        }
    }

    /// Folder that groups per-architecture builds in the platform-nested layout.
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::MacOs => "macosx",
            Self::Windows => "win",
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
        }
    }

    pub fn native_file_name(self) -> &'static str {
        match self {
            Self::MacOs => "libpty.dylib",
            Self::Windows => "winpty.dll",
            Self::Linux | Self::FreeBsd | Self::OpenBsd => "libpty.so",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
        })
    }
}

/// Host introspection consumed by the resolver.
///
/// `SystemHost` answers for the running process; tests substitute a
/// [`StaticHost`] to exercise other platforms.
pub trait HostPlatform: Send + Sync {
    /// OS name in `std::env::consts::OS` spelling.
    fn os_name(&self) -> &str;

    /// Architecture tag used verbatim as a path segment.
    fn architecture_tag(&self) -> &str;

    fn platform_kind(&self) -> Result<PlatformKind, LocatorError> {
        PlatformKind::from_os_name(self.os_name()).ok_or_else(|| {
            LocatorError::UnsupportedPlatform {
                os: self.os_name().to_owned(),
            }
        })
    }
}

/// The platform this process runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostPlatform for SystemHost {
    fn os_name(&self) -> &str {
        std::env::consts::OS
    }

    fn architecture_tag(&self) -> &str {
        packaged_arch_name(std::env::consts::ARCH, cfg!(target_endian = "little"))
    }
}

/// A host with fixed answers, independent of the running system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHost {
    os: String,
    arch: String,
}

impl StaticHost {
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_owned(),
            arch: arch.to_owned(),
        }
    }
}

impl HostPlatform for StaticHost {
    fn os_name(&self) -> &str {
        &self.os
    }

    fn architecture_tag(&self) -> &str {
        &self.arch
    }
}

/// Architecture folder names as published native packages spell them.
///
/// Only the names that differ from Rust's target naming are rewritten.
fn packaged_arch_name(rust_arch: &str, little_endian: bool) -> &str {
    match rust_arch {
        "x86_64" => "x86-64",
        "powerpc" => "ppc",
        "powerpc64" if little_endian => "ppc64le",
        "powerpc64" => "ppc64",
        "mips64" if little_endian => "mips64el",
        other => other,
    }
}

/// Platform folder for the given OS name.
pub fn platform_folder_name(os: &str) -> Result<&'static str, LocatorError> {
    PlatformKind::from_os_name(os)
        .map(PlatformKind::folder_name)
        .ok_or_else(|| LocatorError::UnsupportedPlatform { os: os.to_owned() })
}

/// Expected native library file name for the given OS name.
pub fn native_file_name(os: &str) -> Result<&'static str, LocatorError> {
    PlatformKind::from_os_name(os)
        .map(PlatformKind::native_file_name)
        .ok_or_else(|| LocatorError::UnsupportedPlatform { os: os.to_owned() })
}
