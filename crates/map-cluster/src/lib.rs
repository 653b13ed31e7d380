//! Map marker clustering engine
//!
//! Groups point-of-interest markers by proximity in projected pixel space,
//! keeps one custom overlay per group attached to a host rendering layer,
//! and turns overlay activation into either a marker callback or a
//! drill-in (recenter + zoom).
//!
//! The host map is injected through the traits in [`projection`]; nothing
//! here depends on a particular map SDK or UI toolkit.
//!
//! ```
//! use map_cluster::{ClusterConfig, ClusterParams, FixedZoom, LatLng, MarkerSpec};
//!
//! let markers = vec![
//!     MarkerSpec::inert("a", LatLng::new(0.0, 0.0), "music"),
//!     MarkerSpec::inert("b", LatLng::new(0.0001, 0.0001), "music"),
//!     MarkerSpec::inert("c", LatLng::new(50.0, 50.0), "food"),
//! ];
//! let params = ClusterConfig::default().params();
//! let clusters = map_cluster::cluster(&markers, 10.0, params, &FixedZoom(10.0)).unwrap();
//! assert_eq!(clusters.len(), 2);
//! # let _: ClusterParams = params;
//! ```

pub mod cluster;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod geo;
pub mod marker;
pub mod overlay;
pub mod projection;
pub mod registry;
pub mod spatial;

pub use cluster::{cluster, Cluster, ClusterParams};
pub use config::{ClusterConfig, ConfigLoader};
pub use dispatch::{Activation, InteractionDispatcher};
pub use engine::{ClusterEngine, PassOutcome};
pub use error::{ClusterError, ConfigError, EngineError, MarkerError};
pub use geo::{GeoBounds, LatLng, PixelPoint};
pub use marker::{ActivateFn, Category, MarkerId, MarkerRecord, MarkerSpec};
pub use overlay::{Footprint, Glyph, Overlay, OverlayId, OverlayManager, OverlayVisual, RenderMode};
pub use projection::{
    zoom_scale, FixedZoom, MapHost, OverlayLayer, Projection, ViewportController, WebMercator,
};
pub use registry::MarkerRegistry;
