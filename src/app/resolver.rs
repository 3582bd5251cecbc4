//! Working-directory and configuration-location resolution.
//!
//! ## Working directory precedence (highest to lowest)
//!
//! 1. `PRISMQ_WORKING_DIR` environment variable
//! 2. `WORKING_DIR` in the `.env` of the nearest marker directory
//! 3. `WORKING_DIR` in the `.env` of the current directory
//!
//! ## Config file location precedence (highest to lowest)
//!
//! 1. `PRISMQ_CONFIG_DIR` environment variable
//! 2. Nearest marker directory (current directory or an ancestor whose name
//!    contains the marker, case-insensitively)
//! 3. The resolved working directory

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::EnvFileConfigStore;
use crate::domain::config::{
    CONFIG_DIR_ENV, CONFIG_FILE_NAME, DEFAULT_MARKER, WORKING_DIR_ENV, WORKING_DIR_KEY,
};
use crate::domain::DomainError;
use crate::ports::ConfigStore;

/// Tracks where a resolved working directory came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingDirSource {
    /// Value from an environment variable
    EnvVar(String),
    /// `WORKING_DIR` from the config file in this marker directory
    MarkerConfig(PathBuf),
    /// `WORKING_DIR` from the config file in the current directory
    CurrentConfig(PathBuf),
}

impl std::fmt::Display for WorkingDirSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkingDirSource::EnvVar(name) => write!(f, "env:{}", name),
            WorkingDirSource::MarkerConfig(dir) => write!(f, "marker:{}", dir.display()),
            WorkingDirSource::CurrentConfig(dir) => write!(f, "current:{}", dir.display()),
        }
    }
}

/// A resolved working directory with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDir {
    pub path: PathBuf,
    pub source: WorkingDirSource,
}

/// Locates the working directory and the configuration file.
///
/// The current directory and environment overrides are injected so the
/// resolution is deterministic under test.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    cwd: PathBuf,
    marker: String,
    working_dir_override: Option<PathBuf>,
    config_dir_override: Option<PathBuf>,
}

impl DirectoryResolver {
    /// Resolver rooted at `cwd` with the default marker and no overrides.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            marker: DEFAULT_MARKER.to_string(),
            working_dir_override: None,
            config_dir_override: None,
        }
    }

    /// Resolver for this process: canonical current directory plus
    /// `PRISMQ_WORKING_DIR` / `PRISMQ_CONFIG_DIR` when set and non-empty.
    pub fn from_env() -> Result<Self, DomainError> {
        let cwd = env::current_dir().and_then(fs::canonicalize).map_err(|e| {
            DomainError::WorkingDirectory(format!("cannot read current directory: {}", e))
        })?;

        Ok(Self::new(cwd)
            .with_working_dir_override(non_empty_env(WORKING_DIR_ENV))
            .with_config_dir_override(non_empty_env(CONFIG_DIR_ENV)))
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_working_dir_override(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir_override = dir;
        self
    }

    pub fn with_config_dir_override(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir_override = dir;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Nearest directory, starting at the current one, whose name contains
    /// the marker.
    pub fn find_marker_directory(&self) -> Option<PathBuf> {
        find_marker_directory(&self.cwd, &self.marker)
    }

    /// Resolve the working directory, or `None` when nothing configures it.
    pub fn resolve_working_directory(&self) -> Option<ResolvedDir> {
        if let Some(dir) = &self.working_dir_override {
            return Some(ResolvedDir {
                path: dir.clone(),
                source: WorkingDirSource::EnvVar(WORKING_DIR_ENV.to_string()),
            });
        }

        if let Some(marker_dir) = self.find_marker_directory() {
            if let Some(path) = read_working_dir(&marker_dir) {
                return Some(ResolvedDir {
                    path,
                    source: WorkingDirSource::MarkerConfig(marker_dir),
                });
            }
        }

        read_working_dir(&self.cwd).map(|path| ResolvedDir {
            path,
            source: WorkingDirSource::CurrentConfig(self.cwd.clone()),
        })
    }

    /// Directory that should hold the config file for `working_dir`.
    pub fn config_location(&self, working_dir: &Path) -> PathBuf {
        if let Some(dir) = &self.config_dir_override {
            return self.absolutize(dir);
        }

        self.find_marker_directory()
            .unwrap_or_else(|| self.absolutize(working_dir))
    }

    /// Anchor a relative path at the current directory.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Return the first of `start` and its ancestors whose final component
/// contains `marker`, compared case-insensitively.
///
/// Pure path computation; nothing is read from disk.
pub fn find_marker_directory(start: &Path, marker: &str) -> Option<PathBuf> {
    let marker = marker.to_lowercase();

    start
        .ancestors()
        .find(|dir| {
            dir.file_name()
                .map(|name| name.to_string_lossy().to_lowercase().contains(&marker))
                .unwrap_or(false)
        })
        .map(Path::to_path_buf)
}

/// Read a non-empty `WORKING_DIR` from `dir/.env`, if that file exists.
fn read_working_dir(dir: &Path) -> Option<PathBuf> {
    if !dir.join(CONFIG_FILE_NAME).is_file() {
        return None;
    }

    let store = EnvFileConfigStore::open(dir).ok()?;
    let value = store.get(WORKING_DIR_KEY).filter(|v| !v.is_empty())?;

    debug!(dir = ?dir, working_dir = %value, "Found WORKING_DIR in config file");
    Some(PathBuf::from(value))
}

fn non_empty_env(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
