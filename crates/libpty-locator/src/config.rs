use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable that pins the installation root.
pub const LIB_FOLDER_ENV: &str = "PTY_LIB_FOLDER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Installation root override. When set, root discovery is skipped.
    #[serde(default)]
    pub lib_folder: Option<PathBuf>,
}

impl LocatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lib_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.lib_folder = non_empty(folder.into());
        self
    }

    /// Read `PTY_LIB_FOLDER` from the current environment.
    pub fn from_env() -> Self {
        Self {
            lib_folder: std::env::var_os(LIB_FOLDER_ENV)
                .map(PathBuf::from)
                .and_then(non_empty),
        }
    }

    /// The configuration captured the first time it is requested in this
    /// process. Later changes to the environment are not observed.
    pub fn process() -> &'static Self {
        static PROCESS: OnceLock<LocatorConfig> = OnceLock::new();
        PROCESS.get_or_init(Self::from_env)
    }

    pub fn lib_folder(&self) -> Option<&Path> {
        self.lib_folder.as_deref()
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_override() {
        assert_eq!(LocatorConfig::new().lib_folder(), None);
    }

    #[test]
    fn override_is_kept_verbatim() {
        let config = LocatorConfig::new().with_lib_folder("relative/lib");
        assert_eq!(config.lib_folder(), Some(Path::new("relative/lib")));
    }

    #[test]
    fn empty_override_counts_as_unset() {
        let config = LocatorConfig::new().with_lib_folder("");
        assert_eq!(config.lib_folder(), None);
    }

    #[test]
    fn process_config_is_stable() {
        let first = LocatorConfig::process();
        let second = LocatorConfig::process();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn config_json_roundtrip() {
        let config = LocatorConfig::new().with_lib_folder("/opt/app/lib");
        let json = serde_json::to_string(&config).unwrap();
        let loaded: LocatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);

        let empty: LocatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.lib_folder(), None);
    }
}
