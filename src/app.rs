//! Viewer application shell
//!
//! Top bar with marker counts and the last activation, the clustered map
//! filling the rest of the window.

use eframe::egui;
use map_cluster::{Activation, ClusterConfig, ConfigError, LatLng, MarkerSpec, PassOutcome};
use map_cluster_egui::ClusterMapWidget;
use tracing::info;

pub struct ViewerApp {
    map: ClusterMapWidget,
    rejected: usize,
    last_activation: Option<Activation>,
}

impl ViewerApp {
    pub fn new(
        config: ClusterConfig,
        markers: Vec<MarkerSpec>,
        rejected: usize,
    ) -> Result<Self, ConfigError> {
        let mut map = ClusterMapWidget::new(config, LatLng::new(20.0, 0.0), 2.0)?;
        let outcome = map.set_markers(markers);
        if let PassOutcome::Rebuilt { skipped, .. } = outcome {
            info!(skipped, "initial clustering pass");
        }
        Ok(Self {
            map,
            rejected,
            last_activation: None,
        })
    }

    fn status_line(&self) -> String {
        let engine = self.map.engine();
        let skipped = self.rejected + engine.registry().rejected().len();
        format!(
            "{} markers · {} overlays · {} skipped · zoom {:.1}",
            engine.markers().len(),
            engine.overlays().len(),
            skipped,
            self.map.camera().zoom(),
        )
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Event map");
                ui.separator();
                ui.label(self.status_line());
                if let Some(activation) = &self.last_activation {
                    ui.separator();
                    match activation {
                        Activation::Marker { id } => ui.label(format!("opened {}", id)),
                        Activation::DrillIn { zoom, .. } => {
                            ui.label(format!("zoomed into cluster (z{:.0})", zoom))
                        }
                    };
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(activation) = self.map.ui(ui) {
                    info!(?activation, "overlay activated");
                    self.last_activation = Some(activation);
                }
            });
    }
}
