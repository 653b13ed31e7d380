//! Marker fixture loading
//!
//! Fixtures are YAML documents with a top-level `markers` list of
//! `MarkerRecord`s. Records that cannot become a marker are logged and
//! skipped; the rest still load.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use map_cluster::{ActivateFn, MarkerError, MarkerRecord, MarkerSpec};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct MarkerFile {
    #[serde(default)]
    pub markers: Vec<MarkerRecord>,
}

/// Markers that converted plus the records that did not
#[derive(Debug, Default)]
pub struct LoadedMarkers {
    pub markers: Vec<MarkerSpec>,
    pub rejected: Vec<MarkerError>,
}

pub fn load_markers(path: &Path) -> Result<LoadedMarkers> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading marker file {}", path.display()))?;
    let loaded = parse_markers(&yaml)
        .with_context(|| format!("parsing marker file {}", path.display()))?;
    info!(
        path = %path.display(),
        markers = loaded.markers.len(),
        rejected = loaded.rejected.len(),
        "loaded marker fixture"
    );
    Ok(loaded)
}

pub fn parse_markers(yaml: &str) -> Result<LoadedMarkers> {
    let file: MarkerFile = serde_yaml::from_str(yaml)?;
    let mut loaded = LoadedMarkers::default();

    for record in file.markers {
        let title = record.title.clone();
        match record.into_spec(log_activation(title)) {
            Ok(spec) => loaded.markers.push(spec),
            Err(err) => {
                warn!(marker = %err.marker_id(), code = err.code(), %err, "skipping marker record");
                loaded.rejected.push(err);
            }
        }
    }
    Ok(loaded)
}

/// Activation callback that logs the marker's title
fn log_activation(title: Option<String>) -> ActivateFn {
    Rc::new(move || match &title {
        Some(title) => info!(%title, "marker activated"),
        None => info!("untitled marker activated"),
    })
}
