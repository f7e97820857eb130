use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{
    controller::UndoFailurePolicy, domain::song::Song, playlist::PlaylistFormat,
    storage::repository::DuplicatePolicy,
};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub undo: UndoConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            repository: Default::default(),
            undo: Default::default(),
            playlist: Default::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_reject_duplicates")]
    pub reject_duplicates: bool,
    /// songs present at startup
    #[serde(default)]
    pub songs: Vec<Song>,
}

fn default_reject_duplicates() -> bool {
    true
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            reject_duplicates: default_reject_duplicates(),
            songs: Vec::new(),
        }
    }
}

impl RepositoryConfig {
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Allow
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UndoConfig {
    #[serde(default)]
    pub on_failure: UndoFailurePolicy,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlaylistConfig {
    #[serde(default)]
    pub format: PlaylistFormat,
    pub path: Option<PathBuf>,
}
