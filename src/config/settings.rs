//! Settings file backing the configuration snapshot

use anyhow::{Context, Result};
use duke_status_core::constants::keys;
use duke_status_core::{
    ConfigProvider, ConfigSnapshot, SourceInfo, DEFAULT_PRECISION, DEFAULT_SOURCE_TIMEOUT,
    DEFAULT_UPDATE_INTERVAL,
};
use duke_status_types::DEFAULT_COLOR;
use log::info;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// JSON settings file, read afresh for every snapshot
///
/// A missing file is not an error: every setting then takes its default.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `settings.json` in the platform configuration directory
    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("com", "github.duke_status", "duke-status")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(Self::new(dirs.config_dir().join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings written by [`SettingsFile::save_defaults`]
    pub fn default_settings(sources: &[SourceInfo]) -> Value {
        let mut settings = Map::new();
        for source in sources {
            settings.insert(
                format!("{}.{}", keys::SHOW_PREFIX, source.key),
                Value::from(source.shown_by_default),
            );
        }
        settings.insert(keys::PRECISION.to_string(), Value::from(DEFAULT_PRECISION));
        settings.insert(keys::ALIGN_LEFT.to_string(), Value::from(false));
        settings.insert(keys::COLOR.to_string(), Value::from(DEFAULT_COLOR));
        settings.insert(
            keys::UPDATE_FREQUENCY_MS.to_string(),
            Value::from(DEFAULT_UPDATE_INTERVAL.as_millis() as u64),
        );
        settings.insert(
            keys::SOURCE_TIMEOUT_MS.to_string(),
            Value::from(DEFAULT_SOURCE_TIMEOUT.as_millis() as u64),
        );
        Value::Object(settings)
    }

    /// Write a starter settings file; an existing file is left alone
    ///
    /// Returns whether a file was written.
    pub fn save_defaults(&self, sources: &[SourceInfo]) -> Result<bool> {
        if self.path.exists() {
            info!("Settings file {:?} already exists, not overwriting", self.path);
            return Ok(false);
        }

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(&Self::default_settings(sources))?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        info!("Wrote default settings to {:?}", self.path);
        Ok(true)
    }
}

impl ConfigProvider for SettingsFile {
    fn snapshot(&self) -> Result<ConfigSnapshot> {
        if !self.path.exists() {
            return Ok(ConfigSnapshot::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        if content.trim().is_empty() {
            return Ok(ConfigSnapshot::default());
        }
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", self.path))?;
        Ok(ConfigSnapshot::from_value(value))
    }
}
