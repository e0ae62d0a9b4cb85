//! Configuration for jira-util
//!
//! Every `.jira.d/config.yml` between the current directory and the root is
//! read, normalized and merged. The home directory copy has the lowest
//! precedence and the one nearest to cwd the highest.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::fsutil;
use crate::normalize::normalize;
use crate::paths;

/// Config file looked up in every parent directory
pub const CONFIG_FILE: &str = ".jira.d/config.yml";

/// Template directory looked up in every parent directory
pub const TEMPLATE_DIR: &str = ".jira.d/templates";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker base URL
    pub endpoint: Option<String>,

    /// Login name
    pub user: Option<String>,

    /// Default project key
    pub project: Option<String>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Extra directory searched for templates before `.jira.d/templates`
    #[serde(rename = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Files merged into this config, lowest precedence first
    #[serde(skip)]
    pub sources: Vec<PathBuf>,

    /// The merged, normalized document including keys not modelled above
    #[serde(skip)]
    pub document: Json,
}

impl Config {
    /// Load config from an explicit file, or merge every config found from cwd up
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_layers(&[path.to_path_buf()])
                .context(format!("Failed to load config from {}", path.display()));
        }

        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let home = dirs::home_dir();
        Self::discover_from(&cwd, home.as_deref())
    }

    /// Merge every config visible from `cwd`, with `home` as the fallback location
    pub fn discover_from(cwd: &Path, home: Option<&Path>) -> Result<Self> {
        let layers = paths::layered_parent_paths_from(cwd, home, CONFIG_FILE);
        if layers.is_empty() {
            info!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_layers(&layers)
    }

    /// Merge the given files in order, later files winning
    pub fn load_layers(layers: &[PathBuf]) -> Result<Self> {
        let mut document = Json::Object(Map::new());
        for path in layers {
            if let Some(layer) = read_layer(path)? {
                merge(&mut document, layer);
            }
            info!("Loaded config from: {}", path.display());
        }

        let mut config: Self = serde_json::from_value(document.clone()).context("Failed to parse config")?;
        config.sources = layers.to_vec();
        config.document = document;
        Ok(config)
    }

    /// Read just the log level so logging can be set up before the full load
    pub fn load_log_level(explicit: Option<&Path>) -> Option<String> {
        Self::load(explicit).ok().and_then(|c| c.log_level)
    }

    /// Resolve a template argument to a file
    ///
    /// Checked in order: the argument as a path, `template-dir`, then the
    /// `.jira.d/templates` directory closest to cwd.
    pub fn resolve_template(&self, name: &str) -> Result<PathBuf> {
        debug!(%name, "Config::resolve_template: called");
        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Ok(direct);
        }

        if let Some(dir) = &self.template_dir {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        let relative = format!("{}/{}", TEMPLATE_DIR, name);
        paths::find_closest_parent_path(&relative).context(format!("Template not found: {}", name))
    }
}

fn read_layer(path: &Path) -> Result<Option<Json>> {
    let content = fsutil::read_file(path)?;
    let raw: serde_yaml::Value =
        serde_yaml::from_str(&content).context(format!("Failed to parse YAML in {}", path.display()))?;
    let layer = normalize(&raw).context(format!("Invalid config in {}", path.display()))?;
    Ok(layer)
}

/// Deep-merge `overlay` into `base`; objects merge, everything else replaces
pub fn merge(base: &mut Json, overlay: Json) {
    match (base, overlay) {
        (Json::Object(base), Json::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
