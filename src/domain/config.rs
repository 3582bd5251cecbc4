use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Name of the configuration file kept in a working or marker directory.
pub const CONFIG_FILE_NAME: &str = ".env";

/// Label written into the generated header block.
pub const HEADER_APP_LABEL: &str = "PrismQ";

/// Key holding the name of the package that first configured the directory.
pub const APP_NAME_KEY: &str = "APP_NAME";

/// Key holding the absolute working directory.
pub const WORKING_DIR_KEY: &str = "WORKING_DIR";

/// Overrides the working directory directly.
pub const WORKING_DIR_ENV: &str = "PRISMQ_WORKING_DIR";

/// Overrides the directory holding the configuration file.
pub const CONFIG_DIR_ENV: &str = "PRISMQ_CONFIG_DIR";

/// Substring identifying a shared configuration root among ancestors.
pub const DEFAULT_MARKER: &str = "PrismQ";

pub const DEFAULT_PACKAGE_NAME: &str = "PrismQ.IdeaInspiration.Model";

/// Parse `.env` content into a key/value mapping.
///
/// Blank lines and lines starting with `#` are ignored. Every other line is
/// split on its first `=`; both halves are trimmed. Lines without `=` are
/// skipped silently. Later duplicates win.
pub fn parse_entries(content: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    entries
}

/// Render a mapping in the persisted `.env` layout: fixed header, blank line,
/// then one `KEY=VALUE` line per entry in ascending key order.
pub fn render_entries(app_label: &str, entries: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {} Module Configuration\n", app_label));
    out.push_str("# This file stores package-specific configuration\n");
    out.push_str("# Auto-generated - do not edit manually unless necessary\n\n");

    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }

    out
}

/// Reject entries the line format cannot carry through a write/reload cycle.
pub fn validate_entry(key: &str, value: &str) -> Result<(), DomainError> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.trim() != key {
        Some("key has surrounding whitespace")
    } else if key.starts_with('#') {
        Some("key starts with '#'")
    } else if key.contains('=') {
        Some("key contains '='")
    } else if key.contains(['\n', '\r']) {
        Some("key contains a line break")
    } else if value.contains(['\n', '\r']) {
        Some("value contains a line break")
    } else if value.trim() != value {
        Some("value has surrounding whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidEntry {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            max_files: 7,
        }
    }
}
