use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;

use crate::cli::ProjectArgs;
use crate::config::DuoConfig;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "duo.config.json";
pub const ENV_PREFIX: &str = "DUO_";

/// Fields settable through `DUO_*` variables, in config-file spelling.
const ENV_FIELDS: &[&str] = &[
    "outDir",
    "staticDir",
    "mode",
    "legacyEntries",
    "legacyTarget",
    "dynamicImportLoader",
    "cwd",
];

/// Flags given on the command line. Absent flags are not serialized, so
/// they never override lower-priority sources.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliOverrides {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    entries: BTreeMap<String, PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    static_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<duo_bundler::ExecutionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legacy_entries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legacy_target: Option<String>,
}

impl CliOverrides {
    fn from_args(args: &ProjectArgs) -> Self {
        Self {
            entries: args
                .entries
                .iter()
                .map(|e| (e.name.clone(), e.path.clone()))
                .collect(),
            out_dir: args.out_dir.clone(),
            static_dir: args.static_dir.clone(),
            mode: args.mode,
            legacy_entries: (!args.legacy_entries.is_empty()).then(|| args.legacy_entries.clone()),
            legacy_target: args.legacy_target.clone(),
        }
    }
}

impl DuoConfig {
    /// Load configuration for a command invoked from `base_dir`.
    ///
    /// `--cwd` moves the directory the config file is looked up in. An
    /// explicit `--config` path must exist; the default file is optional.
    pub fn load(args: &ProjectArgs, base_dir: &Path) -> Result<Self> {
        let root = match &args.cwd {
            Some(cwd) => base_dir.join(cwd),
            None => base_dir.to_path_buf(),
        };

        let config_file = match &args.config {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = root.join(CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };

        let mut figment = Figment::from(Serialized::defaults(DuoConfig::default()));

        if let Some(path) = &config_file {
            tracing::debug!(path = %path.display(), "Loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .filter_map(|key| env_key_to_field(key.as_str()).map(Into::into)),
        );

        figment = figment.merge(Serialized::defaults(CliOverrides::from_args(args)));

        let mut config: DuoConfig = figment.extract().map_err(ConfigError::from)?;

        // `--cwd` wins over any configured project root.
        if args.cwd.is_some() {
            config.cwd = Some(root);
        }

        Ok(config)
    }
}

/// `OUT_DIR` -> `outDir`; `None` for variables that are not config fields.
pub(crate) fn env_key_to_field(key: &str) -> Option<String> {
    let mut field = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            field.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            field.push(c.to_ascii_lowercase());
        }
    }

    ENV_FIELDS.contains(&field.as_str()).then_some(field)
}
