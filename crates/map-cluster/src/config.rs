//! Engine configuration
//!
//! Loaded from YAML. Path resolution order for `ConfigLoader::from_env`:
//! 1. `MAP_CLUSTER_CONFIG` environment variable
//! 2. `config/cluster.yaml` relative to the working directory
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cluster::ClusterParams;
use crate::error::ConfigError;

pub const CONFIG_ENV_VAR: &str = "MAP_CLUSTER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/cluster.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Markers closer than this (px) to a seed join its cluster
    pub grid_size_px: f64,
    /// Above this zoom every marker is drawn individually
    pub max_zoom: f64,
    /// Zoom levels added when drilling into a cluster
    pub drill_zoom_increment: f64,
    /// Overlay footprint edge length (px)
    pub footprint_px: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            grid_size_px: 60.0,
            max_zoom: 15.0,
            drill_zoom_increment: 2.0,
            footprint_px: 48.0,
        }
    }
}

impl ClusterConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("grid_size_px", self.grid_size_px)?;
        positive("drill_zoom_increment", self.drill_zoom_increment)?;
        positive("footprint_px", self.footprint_px)?;
        if !self.max_zoom.is_finite() {
            return Err(ConfigError::Invalid {
                field: "max_zoom",
                value: self.max_zoom,
                reason: "must be finite",
            });
        }
        Ok(())
    }

    pub fn params(&self) -> ClusterParams {
        ClusterParams {
            grid_size_px: self.grid_size_px,
            max_zoom: self.max_zoom,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be a positive number",
        })
    }
}

/// Locates and loads `ClusterConfig`
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loader that always yields defaults
    pub fn defaults() -> Self {
        Self { path: None }
    }

    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::new(path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::new(DEFAULT_CONFIG_PATH);
        }
        Self::defaults()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<ClusterConfig, ConfigError> {
        match &self.path {
            Some(path) => {
                let config = ClusterConfig::load(path)?;
                info!(path = %path.display(), ?config, "loaded cluster config");
                Ok(config)
            }
            None => Ok(ClusterConfig::default()),
        }
    }
}
