//! Error types for the clustering engine.

use crate::marker::MarkerId;
use crate::overlay::OverlayId;
use thiserror::Error;

/// Marker contract violations. These are logged and the marker is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkerError {
    #[error("Marker {id} has no position")]
    MissingPosition { id: MarkerId },

    #[error("Marker {id} has no category")]
    MissingCategory { id: MarkerId },

    #[error("Marker {id} has an invalid position ({lat}, {lng})")]
    InvalidPosition { id: MarkerId, lat: f64, lng: f64 },

    #[error("Marker {id} has an empty category")]
    EmptyCategory { id: MarkerId },

    #[error("Duplicate marker id {id}")]
    DuplicateId { id: MarkerId },
}

impl MarkerError {
    pub fn marker_id(&self) -> &MarkerId {
        match self {
            Self::MissingPosition { id }
            | Self::MissingCategory { id }
            | Self::InvalidPosition { id, .. }
            | Self::EmptyCategory { id }
            | Self::DuplicateId { id } => id,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingPosition { .. } => "MISSING_POSITION",
            Self::MissingCategory { .. } => "MISSING_CATEGORY",
            Self::InvalidPosition { .. } => "INVALID_POSITION",
            Self::EmptyCategory { .. } => "EMPTY_CATEGORY",
            Self::DuplicateId { .. } => "DUPLICATE_ID",
        }
    }
}

/// Clustering failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// The host cannot project yet. Recoverable: the pass is deferred.
    #[error("Projection unavailable")]
    ProjectionUnavailable,
}

/// Engine facade failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Overlay {0} is not attached")]
    UnknownOverlay(OverlayId),

    /// A pass never produces an empty cluster; kept distinct so a broken
    /// overlay is not reported as a stale id
    #[error("Overlay {0} has no members to activate")]
    EmptyCluster(OverlayId),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}
