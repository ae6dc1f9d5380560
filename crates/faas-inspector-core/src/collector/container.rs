//! Container identity stamping.
//!
//! The first invocation in a fresh container writes a random UUID to a marker
//! file; later invocations in the same (warm) container read it back. The
//! check-then-create sequence is not locked: two concurrent first invocations
//! may both generate an id, and only one of them wins the exclusive create.

use crate::collector::CollectError;
use crate::collector::procfs::parser::parse_boot_time;
use crate::collector::traits::FileSystem;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of stamping the current container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStamp {
    /// Container id. Empty when an existing marker could not be read.
    pub uuid: String,
    /// `true` when the marker did not exist before this call.
    pub new_container: bool,
    /// `false` when a freshly generated id could not be written. The next
    /// invocation will then see no marker and report a new container again.
    pub persisted: bool,
}

/// Reads or creates the container marker, and reads the host boot time.
pub struct ContainerStamper<F: FileSystem> {
    fs: F,
    marker_path: PathBuf,
    proc_path: PathBuf,
}

impl<F: FileSystem> ContainerStamper<F> {
    /// Creates a new stamper.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `marker_path` - Marker file location (usually `/tmp/container-id`)
    /// * `proc_path` - Base path to proc filesystem (usually `/proc`)
    pub fn new(fs: F, marker_path: impl Into<PathBuf>, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            marker_path: marker_path.into(),
            proc_path: proc_path.into(),
        }
    }

    /// Loads the container id, creating the marker on first use.
    pub fn stamp(&self) -> ContainerStamp {
        if self.fs.exists(&self.marker_path) {
            let uuid = self.read_marker().unwrap_or_else(|e| {
                debug!(
                    "Could not read container marker {}: {e}",
                    self.marker_path.display()
                );
                String::new()
            });
            return ContainerStamp {
                uuid,
                new_container: false,
                persisted: true,
            };
        }

        let uuid = Uuid::new_v4().to_string();
        let persisted = match self.fs.create_new(&self.marker_path, &uuid) {
            Ok(()) => {
                debug!(
                    "Stamped new container {uuid} at {}",
                    self.marker_path.display()
                );
                true
            }
            Err(e) => {
                warn!(
                    "Could not persist container id to {}: {e}",
                    self.marker_path.display()
                );
                false
            }
        };

        ContainerStamp {
            uuid,
            new_container: true,
            persisted,
        }
    }

    /// The marker's first line is the id.
    fn read_marker(&self) -> Result<String, CollectError> {
        let content = self.fs.read_to_string(&self.marker_path)?;
        Ok(content.lines().next().unwrap_or_default().to_string())
    }

    /// Reads host boot time (seconds since epoch) from `/proc/stat`.
    pub fn boot_time(&self) -> Result<u64, CollectError> {
        let path = self.proc_path.join("stat");
        let content = self.fs.read_to_string(&path)?;
        Ok(parse_boot_time(&content)?)
    }
}
