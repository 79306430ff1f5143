use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use windfield::field::FieldPayload;
use windfield::viewport::GeoBounds;
use windfield::{ConfigError, FieldError, WindConfig};

pub const CONFIG_PATH: &str = "windtrail.toml";

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    /// Geographic extent mapped onto the window
    pub view: GeoBounds,
    /// Seconds without a resize event before the new size is applied
    pub resize_settle_secs: f64,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    #[serde(default)]
    pub wind: WindConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// One file of the field catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Pressure level shown to the user, e.g. "850"
    pub level: String,
    /// Forecast step index
    pub step: u32,
    pub path: PathBuf,
}

#[derive(thiserror::Error, Debug)]
pub enum FieldFileError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("{path}: {source}")]
    Field { path: PathBuf, source: FieldError },
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings {
                title: "Windtrail".into(),
                width: 1280,
                height: 720,
            },
            view: GeoBounds::WORLD,
            resize_settle_secs: 0.25,
            fields: Vec::new(),
            wind: WindConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Config from `path`, or defaults when it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("using default viewer config, {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}

impl FieldEntry {
    pub fn read_payload(&self) -> Result<FieldPayload, FieldFileError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FieldFileError::Io {
            path: self.path.clone(),
            source,
        })?;
        FieldPayload::from_json(&text).map_err(|source| FieldFileError::Field {
            path: self.path.clone(),
            source,
        })
    }
}
