use std::path::{Component, Path};

use crate::config::DuoConfig;
use crate::error::{CliError, ConfigError, Result};

impl DuoConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(ConfigError::MissingField {
                field: "entries".to_string(),
                hint: "Add an entry such as {\"main\": \"src/main.js\"} or pass --entry main=src/main.js"
                    .to_string(),
            }
            .into());
        }

        for name in self.entries.keys() {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "entries".to_string(),
                    value: name.clone(),
                    hint: "Entry names become file names and must not be empty or contain slashes"
                        .to_string(),
                }
                .into());
            }
        }

        if let Some(legacy) = &self.legacy_entries {
            if let Some(unknown) = legacy.iter().find(|n| !self.entries.contains_key(*n)) {
                return Err(ConfigError::InvalidValue {
                    field: "legacyEntries".to_string(),
                    value: unknown.clone(),
                    hint: format!(
                        "Legacy entries must be configured entries ({})",
                        self.entries.keys().cloned().collect::<Vec<_>>().join(", ")
                    ),
                }
                .into());
            }
        }

        let mut components = self.static_dir.components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(ConfigError::InvalidValue {
                field: "staticDir".to_string(),
                value: self.static_dir.display().to_string(),
                hint: "Use a single relative directory name such as \"static\"".to_string(),
            }
            .into());
        }

        if self.legacy_target.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "legacyTarget".to_string(),
                value: String::new(),
                hint: "Use a target such as \"es2015\"".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Every entry file must exist under `project_root`.
    pub fn check_entries_exist(&self, project_root: &Path) -> Result<()> {
        for path in self.entries.values() {
            let resolved = project_root.join(path);
            if !resolved.is_file() {
                return Err(CliError::FileNotFound(resolved));
            }
        }
        Ok(())
    }
}
