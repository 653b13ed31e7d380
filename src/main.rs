//! Event Map Viewer
//!
//! Loads a marker fixture and shows it on a clustered, pannable map.
//!
//! # Usage
//!
//! ```bash
//! event-map-viewer --markers config/markers.yaml
//! MAP_CLUSTER_CONFIG=config/cluster.yaml event-map-viewer
//! RUST_LOG=map_cluster=debug event-map-viewer --config my-cluster.yaml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use map_cluster::ConfigLoader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod markers;

use app::ViewerApp;

#[derive(Parser)]
#[command(name = "event-map-viewer")]
#[command(version)]
#[command(about = "Clustered event marker map")]
struct Cli {
    /// Marker fixture (YAML with a top-level `markers` list)
    #[arg(long, short, default_value = "config/markers.yaml")]
    markers: PathBuf,

    /// Cluster config; falls back to MAP_CLUSTER_CONFIG, then config/cluster.yaml
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_map=info,map_cluster=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let loader = match cli.config {
        Some(path) => ConfigLoader::new(path),
        None => ConfigLoader::from_env(),
    };
    let config = loader.load().context("loading cluster config")?;
    let loaded = markers::load_markers(&cli.markers)?;

    info!(
        markers = loaded.markers.len(),
        rejected = loaded.rejected.len(),
        grid_size_px = config.grid_size_px,
        max_zoom = config.max_zoom,
        "starting event map viewer"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Event Map")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    let app = ViewerApp::new(config, loaded.markers, loaded.rejected.len())
        .context("building viewer")?;
    eframe::run_native(
        "Event Map",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {e}"))
}
