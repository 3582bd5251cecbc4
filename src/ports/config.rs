use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use crate::domain::DomainError;
use crate::ports::Prompter;

/// Key/value configuration store port.
///
/// Every mutating call persists the whole mapping before returning.
pub trait ConfigStore: Send + Sync {
    /// Get a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Get a stored value or the supplied default.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Set a value and persist the mapping.
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Set several values with a single save.
    fn update(&self, values: &BTreeMap<String, String>) -> Result<(), DomainError>;

    fn has(&self, key: &str) -> bool;

    /// Snapshot of all entries in key order.
    fn entries(&self) -> BTreeMap<String, String>;

    /// Write the backing file (header plus current entries) if it is absent.
    fn ensure_exists(&self) -> Result<(), DomainError>;

    /// Directory holding the backing file.
    fn base_dir(&self) -> PathBuf;

    /// Path to the backing file.
    fn config_path(&self) -> PathBuf;

    /// Return the value for `key`, asking for it when missing.
    ///
    /// Without an operator the default is stored and returned; with no
    /// default an empty string is returned and nothing is stored. With an
    /// operator a blank answer falls back to the default, and any non-empty
    /// result is stored.
    fn prompt_if_missing(
        &self,
        key: &str,
        message: &str,
        default: Option<&str>,
        prompter: &dyn Prompter,
    ) -> Result<String, DomainError> {
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }

        if !prompter.mode().is_interactive() {
            return match default {
                Some(default) => {
                    self.set(key, default)?;
                    Ok(default.to_string())
                }
                None => {
                    warn!(
                        key = key,
                        "Configuration key not set and running in non-interactive mode"
                    );
                    Ok(String::new())
                }
            };
        }

        let mut answer = prompter.read_line(message)?.trim().to_string();
        if answer.is_empty() {
            if let Some(default) = default {
                answer = default.to_string();
            }
        }

        if !answer.is_empty() {
            self.set(key, &answer)?;
        }

        Ok(answer)
    }
}
