//! Single-value version state persisted as a plain text file

use std::io::ErrorKind;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

use tracing::{debug, info, warn};

use crate::monitor::error::StoreError;

/// Trait for reading and writing the last known version
#[cfg_attr(test, automock)]
pub trait VersionStore: Send + Sync {
    /// Returns the stored version, or `None` when nothing has been stored yet
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the stored version
    fn write(&self, version: &str) -> Result<(), StoreError>;

    /// Location of the backing state, for log messages
    fn location(&self) -> String;
}

/// Stores the version as the sole content of a text file
pub struct FileVersionStore {
    path: PathBuf,
}

impl FileVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VersionStore for FileVersionStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        debug!("Reading stored version from {:?}", self.path);

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Version file {:?} does not exist", self.path);
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let version = content.trim();
        if version.is_empty() {
            warn!("Version file {:?} is empty", self.path);
            return Ok(None);
        }

        info!("Stored version: {}", version);
        Ok(Some(version.to_string()))
    }

    fn write(&self, version: &str) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        std::fs::write(&self.path, version.trim()).map_err(write_error)?;
        info!("Wrote version {} to {:?}", version.trim(), self.path);

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
