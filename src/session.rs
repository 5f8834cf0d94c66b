//! Session context: persisted preferences and block bookkeeping.
//!
//! The context is an explicit value handed by `&mut` to whoever needs it.
//! Any `set` marks it dirty; only a dirty context is written back.

use crate::error::Result;
use crate::store::write_atomic;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name inside the data folder.
pub const CONFIG_FILE: &str = "config.json";

/// Keys stored in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    UsageName,
    DateFormat,
    DateInputMode,
    StartRow,
    LastStartRow,
    DeviceCount,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::UsageName => "usage_name",
            ConfigKey::DateFormat => "date_format",
            ConfigKey::DateInputMode => "date_input_mode",
            ConfigKey::StartRow => "start_row",
            ConfigKey::LastStartRow => "last_start_row",
            ConfigKey::DeviceCount => "device_count",
        }
    }
}

/// Config values for one run plus a dirty flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    values: Map<String, JsonValue>,
    dirty: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a typed value. Missing keys and values of the wrong shape are `None`.
    pub fn get<T: DeserializeOwned>(&self, key: ConfigKey) -> Option<T> {
        let raw = self.values.get(key.as_str())?;
        match serde_json::from_value(raw.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable config value '{}': {}", key.as_str(), e);
                None
            }
        }
    }

    /// Stores a value and marks the context dirty.
    pub fn set<T: Serialize>(&mut self, key: ConfigKey, value: T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                debug!("Config '{}' = {}", key.as_str(), json);
                self.values.insert(key.as_str().to_string(), json);
                self.dirty = true;
            }
            Err(e) => warn!("Could not store config value '{}': {}", key.as_str(), e),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// The JSON file a `SessionContext` is read from and written to.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the context. A missing or unreadable file yields an empty one.
    pub fn load(&self) -> Result<SessionContext> {
        if !self.path.exists() {
            info!("Config file {} not found, starting fresh", self.path.display());
            return Ok(SessionContext::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Map<String, JsonValue>>(&contents) {
            Ok(values) => {
                info!("Loaded config from {}", self.path.display());
                Ok(SessionContext {
                    values,
                    dirty: false,
                })
            }
            Err(e) => {
                warn!(
                    "Config file {} is corrupt ({}), starting fresh",
                    self.path.display(),
                    e
                );
                Ok(SessionContext::new())
            }
        }
    }

    /// Writes the context if it is dirty. Returns whether anything was written.
    pub fn save(&self, ctx: &mut SessionContext) -> Result<bool> {
        if !ctx.dirty {
            debug!("Config unchanged, skipping save");
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_atomic(&self.path, &serde_json::to_vec_pretty(&ctx.values)?)?;
        ctx.dirty = false;

        info!("Wrote config to {}", self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_marks_dirty() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.is_dirty());

        ctx.set(ConfigKey::StartRow, 2usize);
        assert!(ctx.is_dirty());
        assert_eq!(ctx.get::<usize>(ConfigKey::StartRow), Some(2));
        assert_eq!(ctx.get::<usize>(ConfigKey::LastStartRow), None);
    }

    #[test]
    fn test_wrong_shape_reads_as_none() {
        let mut ctx = SessionContext::new();
        ctx.set(ConfigKey::StartRow, "two");
        assert_eq!(ctx.get::<usize>(ConfigKey::StartRow), None);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("nested").join(CONFIG_FILE));

        let mut ctx = file.load().unwrap();
        ctx.set(ConfigKey::UsageName, "radiators_usage_2025-2026.csv");
        ctx.set(ConfigKey::StartRow, 6usize);
        assert!(file.save(&mut ctx).unwrap());
        assert!(!ctx.is_dirty());

        let reloaded = file.load().unwrap();
        assert!(!reloaded.is_dirty());
        assert_eq!(reloaded.get::<usize>(ConfigKey::StartRow), Some(6));
        assert_eq!(
            reloaded.get::<String>(ConfigKey::UsageName).as_deref(),
            Some("radiators_usage_2025-2026.csv")
        );
    }

    #[test]
    fn test_clean_context_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join(CONFIG_FILE));

        let mut ctx = SessionContext::new();
        assert!(!file.save(&mut ctx).unwrap());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_save_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ \"start_row\": 2, \"padding\": \"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx\" }")
            .unwrap();
        let file = ConfigFile::new(&path);

        let mut ctx = SessionContext::new();
        ctx.set(ConfigKey::StartRow, 9usize);
        assert!(file.save(&mut ctx).unwrap());

        let reloaded = file.load().unwrap();
        assert_eq!(reloaded.get::<usize>(ConfigKey::StartRow), Some(9));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let ctx = ConfigFile::new(path).load().unwrap();
        assert_eq!(ctx, SessionContext::new());
    }
}
