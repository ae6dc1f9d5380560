//! Inspector configuration.

use std::path::PathBuf;

/// Default location of the container marker file.
pub const DEFAULT_MARKER_PATH: &str = "/tmp/container-id";
/// Default base path of the proc filesystem.
pub const DEFAULT_PROC_PATH: &str = "/proc";
/// Schema version reported as `version`.
pub const SCHEMA_VERSION: f64 = 0.2;
/// Implementation identifier reported as `lang`.
pub const LANG: &str = "rust";

/// Where an inspection reads from and how it identifies itself.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorConfig {
    /// Base path to proc filesystem.
    pub proc_path: PathBuf,
    /// Marker file used to recognise a warm container.
    pub marker_path: PathBuf,
    pub lang: String,
    pub version: f64,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from(DEFAULT_PROC_PATH),
            marker_path: PathBuf::from(DEFAULT_MARKER_PATH),
            lang: LANG.to_string(),
            version: SCHEMA_VERSION,
        }
    }
}

impl InspectorConfig {
    pub fn with_proc_path(mut self, proc_path: impl Into<PathBuf>) -> Self {
        self.proc_path = proc_path.into();
        self
    }

    pub fn with_marker_path(mut self, marker_path: impl Into<PathBuf>) -> Self {
        self.marker_path = marker_path.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}
