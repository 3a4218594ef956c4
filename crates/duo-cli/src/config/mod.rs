//! Configuration for duo with multi-source loading.
//!
//! Priority: CLI > `DUO_*` environment > `duo.config.json` > defaults

mod loading;
mod validation;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use duo_bundler::pipeline::{
    DEFAULT_DYNAMIC_IMPORT_LOADER, DEFAULT_LEGACY_TARGET, DEFAULT_STATIC_DIR,
};
use duo_bundler::{EntryPoint, ExecutionMode, PipelineConfig};
use serde::{Deserialize, Serialize};

pub use loading::{CONFIG_FILE, ENV_PREFIX};

/// Contents of `duo.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DuoConfig {
    /// Entry points by logical name, e.g. `{"main": "src/main.js"}`
    #[serde(default)]
    pub entries: BTreeMap<String, PathBuf>,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default)]
    pub mode: ExecutionMode,

    /// Entries that get a legacy bundle; all entries when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_entries: Option<Vec<String>>,

    #[serde(default = "default_legacy_target")]
    pub legacy_target: String,

    #[serde(default = "default_dynamic_import_loader")]
    pub dynamic_import_loader: String,

    /// Project root, relative to the directory duo runs in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_DIR)
}

fn default_legacy_target() -> String {
    DEFAULT_LEGACY_TARGET.to_string()
}

fn default_dynamic_import_loader() -> String {
    DEFAULT_DYNAMIC_IMPORT_LOADER.to_string()
}

impl Default for DuoConfig {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            out_dir: default_out_dir(),
            static_dir: default_static_dir(),
            mode: ExecutionMode::default(),
            legacy_entries: None,
            legacy_target: default_legacy_target(),
            dynamic_import_loader: default_dynamic_import_loader(),
            cwd: None,
        }
    }
}

impl DuoConfig {
    /// Project root: `cwd` resolved against `base`.
    pub fn project_root(&self, base: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => base.join(cwd),
            None => base.to_path_buf(),
        }
    }

    /// Pipeline configuration rooted at `project_root`.
    pub fn to_pipeline_config(&self, project_root: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::new(project_root, &self.out_dir)
            .static_dir(&self.static_dir)
            .mode(self.mode)
            .legacy_target(&self.legacy_target)
            .dynamic_import_loader(&self.dynamic_import_loader);

        for (name, path) in &self.entries {
            config = config.entry(EntryPoint::new(name, path));
        }
        if let Some(names) = &self.legacy_entries {
            config = config.legacy_entries(names.iter().cloned());
        }
        config
    }

    /// Example `duo.config.json` content.
    pub fn example_json() -> String {
        let mut entries = BTreeMap::new();
        entries.insert("main".to_string(), PathBuf::from("src/main.js"));
        entries.insert("admin".to_string(), PathBuf::from("src/admin.js"));

        let example = Self {
            entries,
            mode: ExecutionMode::Release,
            legacy_entries: Some(vec!["main".to_string()]),
            ..Self::default()
        };
        serde_json::to_string_pretty(&example).unwrap_or_default()
    }
}
