// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::attributes::{LifecyclePhase, LifecyclePolicy};
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use crate::{ConfigMap, Value};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Daemon-wide configuration for module classes.
///
/// Holds the lifecycle defaults shared by every module and one entry per
/// module class the daemon hosts. It is typically loaded from a YAML file;
/// files ending in `.toml` are read as TOML.
///
/// # Fields
/// * `lifecycle` - Per-phase defaults applied to every module (optional)
/// * `modules` - Module class entries (optional, defaults empty)
///
/// # Example
/// ```yaml
/// lifecycle:
///   process:
///     timeout_seconds: 15
///     attempts: 2
/// modules:
///   - class: echo
///     lifecycle:
///       host:
///         timeout_seconds: 600
///     attributes:
///       seen_tags: []
///     options:
///       greeting: hello
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub lifecycle: HashMap<LifecyclePhase, PhaseConfig>,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// One module class hosted by the daemon.
///
/// # Fields
/// * `class` - Module class name, also the attribute namespace
/// * `lifecycle` - Per-phase overrides of the daemon defaults
/// * `attributes` - Extra attribute slots to seed; arrays seed sequence slots
/// * `options` - Configuration mapping handed to each instance
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModuleConfig {
    pub class: String,
    #[serde(default)]
    pub lifecycle: HashMap<LifecyclePhase, PhaseConfig>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub options: ConfigMap,
}

/// Timeout and attempts for one lifecycle phase. Unset halves inherit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PhaseConfig {
    pub timeout_seconds: Option<f64>,
    pub attempts: Option<u32>,
}

impl DaemonConfig {
    pub fn module(&self, class: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.class == class)
    }

    /// Effective policy for one module and phase.
    ///
    /// Each half resolves independently: module override, then daemon
    /// default, then the built-in default. A timeout that cannot be a
    /// `Duration` is skipped like an unset one; [`validate_config`] rejects
    /// those up front.
    ///
    /// [`validate_config`]: crate::config::validate_config
    pub fn lifecycle_policy(&self, module: &ModuleConfig, phase: LifecyclePhase) -> LifecyclePolicy {
        let layers = [module.lifecycle.get(&phase), self.lifecycle.get(&phase)];
        let defaults = phase.default_policy();

        let timeout = layers
            .iter()
            .flatten()
            .filter_map(|layer| layer.timeout_seconds)
            .find_map(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(defaults.timeout);
        let attempts = layers
            .iter()
            .flatten()
            .find_map(|layer| layer.attempts)
            .unwrap_or(defaults.attempts);

        LifecyclePolicy { timeout, attempts }
    }
}

enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
        }
    }
}

/// Load a daemon config from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DaemonConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ConfigFormat::for_path(path);
    let cfg: DaemonConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
        ConfigFormat::Toml => toml::from_str(&content)?,
    };

    ConfigLoaded {
        path: &path.display().to_string(),
        format: format.name(),
        module_count: cfg.modules.len(),
    }
    .log();

    Ok(cfg)
}

/// Load a daemon config and reject it if any validation rule fails
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<DaemonConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}
