pub mod candidates;
pub mod completions;
pub mod file;
pub mod library;
pub mod platform;

use libpty_locator::{LocatorError, LIB_FOLDER_ENV};
use std::fmt::Write as _;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_UNSUPPORTED_PLATFORM: u8 = 2;
pub const EXIT_NOT_FOUND: u8 = 3;
pub const EXIT_ROOT_NOT_FOUND: u8 = 4;

/// Where the installation root override came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    Flag,
    Env,
    Discovered,
}

impl RootSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Flag => "--root",
            Self::Env => LIB_FOLDER_ENV,
            Self::Discovered => "executable",
        }
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Error text for the user, listing every attempted path after the first line.
pub fn describe_error(err: &LocatorError) -> String {
    let mut msg = err.to_string();
    for path in err.attempted() {
        let _ = write!(msg, "\n  tried: {}", path.display());
    }
    msg
}
