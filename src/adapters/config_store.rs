use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, error, warn};

use crate::domain::config::{
    parse_entries, render_entries, validate_entry, CONFIG_FILE_NAME, HEADER_APP_LABEL,
};
use crate::domain::DomainError;
use crate::ports::ConfigStore;

/// `.env` file backed configuration store.
///
/// The file is rewritten wholesale on every mutation, keys in sorted order
/// below a fixed header. Concurrent processes writing the same file race;
/// the last writer wins.
pub struct EnvFileConfigStore {
    base_dir: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl EnvFileConfigStore {
    /// Open the store for `base_dir`, loading `base_dir/.env` if it exists.
    /// The directory itself is only created on the first save.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base_dir = absolute_dir(base_dir.as_ref())?;

        let store = Self {
            base_dir,
            entries: RwLock::new(BTreeMap::new()),
        };
        let loaded = store.reload();

        debug!(
            path = ?store.config_path(),
            entries = loaded,
            "ConfigStore initialized"
        );

        Ok(store)
    }

    /// Re-read the backing file, replacing the in-memory entries.
    ///
    /// A missing file yields no entries. Read failures are logged and also
    /// yield no entries. Returns the number of entries loaded.
    pub fn reload(&self) -> usize {
        let config_path = self.config_path();
        let mut entries = self.entries.write();

        if !config_path.exists() {
            entries.clear();
            return 0;
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => {
                *entries = parse_entries(&content);
                debug!(path = ?config_path, entries = entries.len(), "Configuration loaded");
            }
            Err(e) => {
                warn!(path = ?config_path, error = %e, "Failed to load configuration file");
                entries.clear();
            }
        }

        entries.len()
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), DomainError> {
        let config_path = self.config_path();
        let content = render_entries(HEADER_APP_LABEL, entries);

        let result =
            fs::create_dir_all(&self.base_dir).and_then(|_| fs::write(&config_path, content));

        if let Err(e) = result {
            error!(path = ?config_path, error = %e, "Failed to save configuration file");
            return Err(DomainError::Io(format!(
                "failed to write {}: {}",
                config_path.display(),
                e
            )));
        }

        debug!(path = ?config_path, entries = entries.len(), "Configuration saved");
        Ok(())
    }
}

impl ConfigStore for EnvFileConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        validate_entry(key, value)?;

        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn update(&self, values: &BTreeMap<String, String>) -> Result<(), DomainError> {
        for (key, value) in values {
            validate_entry(key, value)?;
        }

        let mut entries = self.entries.write();
        entries.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.persist(&entries)
    }

    fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn entries(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }

    fn ensure_exists(&self) -> Result<(), DomainError> {
        if self.config_path().exists() {
            return Ok(());
        }

        debug!(path = ?self.config_path(), "Configuration file not found, creating it");
        let entries = self.entries.read();
        self.persist(&entries)
    }

    fn base_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }
}

/// Make `dir` absolute, resolving symlinks when it already exists.
fn absolute_dir(dir: &Path) -> Result<PathBuf, DomainError> {
    let resolved = if dir.exists() {
        fs::canonicalize(dir)
    } else {
        std::path::absolute(dir)
    };

    resolved.map_err(|e| {
        DomainError::WorkingDirectory(format!("cannot resolve {}: {}", dir.display(), e))
    })
}
