//! egui host for the map clustering engine
//!
//! Provides a slippy-map camera, an overlay surface implementing the
//! engine's host traits, and a widget that ties input, reclustering and
//! painting together.
//!
//! # EGUI-RULES Compliance
//! - No callbacks: `ClusterMapWidget::ui` returns an `Activation`
//! - Camera changes are polled once per frame, not pushed
//! - Painting never mutates engine state

pub mod camera;
pub mod palette;
pub mod render;
pub mod surface;
pub mod widget;

pub use camera::MapCamera;
pub use surface::{MapSurface, OverlayElement};
pub use widget::ClusterMapWidget;
