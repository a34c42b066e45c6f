//! Configuration of the initial bank state.
//!
//! Configuration sources (highest priority first):
//! 1. Explicit path (`--config` flag or `BANKSAFE_CONFIG`)
//! 2. Project file (.banksafe/config.yaml)
//! 3. User file (<config dir>/banksafe/config.yaml)
//! 4. Built-in classic example (5 processes, 3 resource types)
//!
//! Config file discovery:
//! - Searches current directory and parents for .banksafe/config.yaml

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{default_resource_names, Bank};
use crate::domain::SystemSnapshot;

/// Config file schema version understood by this build
pub const CONFIG_VERSION: &str = "1.0";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    /// Declared process count (checked against the matrices when present)
    #[serde(default)]
    pub processes: Option<usize>,

    /// Declared resource type count (checked against `available` when present)
    #[serde(default)]
    pub resources: Option<usize>,

    /// Display names for resource types (defaults to A, B, C, ...)
    #[serde(default)]
    pub resource_names: Option<Vec<String>>,

    pub available: Vec<u32>,
    pub maximum: Vec<Vec<u32>>,
    pub allocation: Vec<Vec<u32>>,
}

impl ConfigFile {
    /// The textbook example: 5 processes, resource types A, B, C
    pub fn classic() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            processes: Some(5),
            resources: Some(3),
            resource_names: Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
            available: vec![3, 3, 2],
            maximum: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            allocation: vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
        }
    }

    /// Validate and turn into a snapshot plus resource names
    pub fn resolve(self) -> Result<(SystemSnapshot, Vec<String>)> {
        if self.version != CONFIG_VERSION {
            anyhow::bail!(
                "Unsupported config version '{}' (expected '{}')",
                self.version,
                CONFIG_VERSION
            );
        }

        if self.maximum.is_empty() {
            anyhow::bail!("At least one process is required");
        }

        if let Some(processes) = self.processes {
            if processes != self.maximum.len() {
                anyhow::bail!(
                    "Config declares {} processes but maximum has {} rows",
                    processes,
                    self.maximum.len()
                );
            }
        }

        if let Some(resources) = self.resources {
            if resources != self.available.len() {
                anyhow::bail!(
                    "Config declares {} resources but available has {} entries",
                    resources,
                    self.available.len()
                );
            }
        }

        let resource_count = self.available.len();
        let names = match self.resource_names {
            Some(names) => {
                validate_names(&names, resource_count)?;
                names
            }
            None => default_resource_names(resource_count),
        };

        let snapshot = SystemSnapshot::new(self.available, self.maximum, self.allocation)
            .context("Invalid initial state")?;

        Ok((snapshot, names))
    }
}

fn validate_names(names: &[String], resource_count: usize) -> Result<()> {
    if names.len() != resource_count {
        anyhow::bail!(
            "Expected {} resource names, got {}",
            resource_count,
            names.len()
        );
    }

    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            anyhow::bail!("Resource name {} is empty", i);
        }
        if names[..i].contains(name) {
            anyhow::bail!("Duplicate resource name '{}'", name);
        }
    }

    Ok(())
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag or `BANKSAFE_CONFIG`
    Explicit(PathBuf),
    /// `.banksafe/config.yaml` in the current directory or a parent
    Project(PathBuf),
    /// Per-user config directory
    User(PathBuf),
    /// Compiled-in classic example
    Builtin,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{} (explicit)", path.display()),
            ConfigSource::Project(path) => write!(f, "{} (project)", path.display()),
            ConfigSource::User(path) => write!(f, "{} (user)", path.display()),
            ConfigSource::Builtin => f.write_str("built-in classic example"),
        }
    }
}

/// Validated configuration ready to open a bank
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: ConfigSource,
    pub snapshot: SystemSnapshot,
    pub resource_names: Vec<String>,
}

impl ResolvedConfig {
    /// Open a bank session over the configured initial state
    pub fn into_bank(self) -> Result<Bank> {
        Bank::new(self.snapshot, self.resource_names)
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".banksafe").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Per-user config file, if it exists
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("banksafe").join("config.yaml");
    path.exists().then_some(path)
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Pick the highest-priority source that exists
fn locate(explicit: Option<&Path>, cwd: Option<&Path>, user: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = cwd.and_then(find_config_file) {
        return ConfigSource::Project(path);
    }
    match user {
        Some(path) => ConfigSource::User(path),
        None => ConfigSource::Builtin,
    }
}

fn resolve_source(source: ConfigSource) -> Result<ResolvedConfig> {
    let file = match &source {
        ConfigSource::Explicit(path) | ConfigSource::Project(path) | ConfigSource::User(path) => {
            load_config_file(path)?
        }
        ConfigSource::Builtin => ConfigFile::classic(),
    };

    let (snapshot, resource_names) = file
        .resolve()
        .with_context(|| format!("Invalid configuration from {}", source))?;

    Ok(ResolvedConfig {
        source,
        snapshot,
        resource_names,
    })
}

/// Load configuration from all sources
pub fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().ok();
    let source = locate(explicit, cwd.as_deref(), user_config_file());
    tracing::debug!(%source, "Loading configuration");
    resolve_source(source)
}
