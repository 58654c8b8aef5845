use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::error::{Error, Result};

pub const BAR_WIDTH_ENV: &str = "LESSON_PROGRESS_BAR_WIDTH";
pub const UTC_OFFSET_ENV: &str = "LESSON_PROGRESS_UTC_OFFSET";

const MAX_BAR_WIDTH: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub settings: Settings,
}

/// One lesson row. Order in the config is display order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Topic {
    pub id: u32,
    pub week: String,
    pub title: String,
    /// Folder relative to the repository root.
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,

    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.to_path_buf()))?;

        let mut config = Self::from_json(&content)?;
        config.apply_env_overrides();
        config.validate()?;

        debug!("Loaded {} topics from {}", config.topics.len(), path.display());
        Ok(config)
    }

    /// Parse without touching the environment or validating.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut folders = HashSet::new();

        for topic in &self.topics {
            if !ids.insert(topic.id) {
                return Err(Error::Config(format!("Duplicate topic id: {}", topic.id)));
            }

            if topic.folder.trim().is_empty() {
                return Err(Error::Config(format!("Topic {} has an empty folder", topic.id)));
            }

            if Path::new(&topic.folder).is_absolute() {
                return Err(Error::Config(format!(
                    "Topic {} folder must be relative to the repository root: {}",
                    topic.id, topic.folder
                )));
            }

            if !folders.insert(topic.folder.as_str()) {
                return Err(Error::Config(format!("Duplicate topic folder: {}", topic.folder)));
            }
        }

        if self.settings.bar_width == 0 || self.settings.bar_width > MAX_BAR_WIDTH {
            return Err(Error::Config(format!(
                "Bar width must be between 1 and {}",
                MAX_BAR_WIDTH
            )));
        }

        if !(-12..=14).contains(&self.settings.utc_offset_hours) {
            return Err(Error::Config(format!(
                "UTC offset must be between -12 and +14 hours, got {}",
                self.settings.utc_offset_hours
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = lookup(BAR_WIDTH_ENV) {
            match width.trim().parse() {
                Ok(val) => self.settings.bar_width = val,
                Err(_) => warn!("Ignoring {}={}: not a number", BAR_WIDTH_ENV, width),
            }
        }

        if let Some(offset) = lookup(UTC_OFFSET_ENV) {
            match offset.trim().parse() {
                Ok(val) => self.settings.utc_offset_hours = val,
                Err(_) => warn!("Ignoring {}={}: not a number", UTC_OFFSET_ENV, offset),
            }
        }
    }
}

impl Topic {
    pub fn folder_path(&self, root: &Path) -> PathBuf {
        root.join(&self.folder)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_bar_width() -> usize { 20 }
fn default_utc_offset_hours() -> i32 { 7 }

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
