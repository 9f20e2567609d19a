//! Per-user directories for config, ephemeris data and logs.

use std::io;
use std::path::{Path, PathBuf};

/// Errors from resolving or creating the platform directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// OS-specific locations, following XDG on Linux, Known Folders on Windows
/// and Library on macOS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Base for relative ephemeris data directories.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "orrery";

impl PlatformDirs {
    /// Resolve directories without creating them.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);

        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| app_config.clone())
            .join(APP_NAME);

        Ok(Self {
            config_dir: app_config.join("config"),
            data_dir,
            log_dir: app_config.join("logs"),
        })
    }

    /// Directories for an explicit config directory, as given by `--config`.
    /// Data and logs sit next to it.
    pub fn from_config_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            data_dir: config_dir.join("data"),
            log_dir: config_dir.join("logs"),
        }
    }

    /// Directories rooted under `root`.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            data_dir: app_dir.join("data"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Create every directory.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if any directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// Where to read ephemeris batches from. Absolute paths are kept;
    /// relative ones are taken from the working directory if present there,
    /// else from [`data_dir`](Self::data_dir).
    pub fn ephemeris_dir(&self, configured: &Path) -> PathBuf {
        if configured.is_absolute() || configured.is_dir() {
            configured.to_path_buf()
        } else {
            self.data_dir.join(configured)
        }
    }
}
