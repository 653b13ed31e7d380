//! End-to-end engine scenarios against a recording fake map host.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use map_cluster::{
    Activation, ClusterConfig, ClusterEngine, EngineError, Footprint, LatLng, MarkerSpec, Overlay,
    OverlayId, OverlayLayer, PassOutcome, PixelPoint, Projection, RenderMode, ViewportController,
    WebMercator,
};
use pretty_assertions::assert_eq;

const VIEWPORT: (f64, f64) = (800.0, 600.0);

/// Web Mercator map with a centered viewport that records every host call
struct FakeMap {
    zoom: Option<f64>,
    center: LatLng,
    attached: BTreeSet<OverlayId>,
    events: Vec<String>,
}

impl FakeMap {
    fn new(zoom: f64, center: LatLng) -> Self {
        Self {
            zoom: Some(zoom),
            center,
            attached: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    fn not_ready() -> Self {
        Self {
            zoom: None,
            ..Self::new(0.0, LatLng::new(0.0, 0.0))
        }
    }

    fn take_events(&mut self) -> Vec<String> {
        std::mem::take(&mut self.events)
    }
}

impl Projection for FakeMap {
    fn world_point(&self, position: LatLng) -> Option<PixelPoint> {
        self.zoom.map(|_| WebMercator::to_world(position))
    }

    fn current_zoom(&self) -> Option<f64> {
        self.zoom
    }
}

impl ViewportController for FakeMap {
    fn set_zoom(&mut self, zoom: f64) {
        self.events.push(format!("set_zoom {}", zoom));
        self.zoom = Some(zoom);
    }

    fn set_center(&mut self, center: LatLng) {
        self.events.push("set_center".to_string());
        self.center = center;
    }
}

impl OverlayLayer for FakeMap {
    fn layer_pixel(&self, position: LatLng) -> Option<PixelPoint> {
        let zoom = self.zoom?;
        let p = self.project(position, zoom)?;
        let c = self.project(self.center, zoom)?;
        Some(PixelPoint::new(
            p.x - c.x + VIEWPORT.0 / 2.0,
            p.y - c.y + VIEWPORT.1 / 2.0,
        ))
    }

    fn attach(&mut self, overlay: &Overlay) {
        assert!(self.attached.insert(overlay.id()), "double attach");
        self.events.push(format!("attach {}", overlay.id()));
    }

    fn detach(&mut self, id: OverlayId) {
        assert!(self.attached.remove(&id), "detach of unknown overlay");
        self.events.push(format!("detach {}", id));
    }

    fn place(&mut self, id: OverlayId, _footprint: Footprint) {
        assert!(self.attached.contains(&id), "place before attach");
    }
}

fn marker(id: &str, lat: f64, lng: f64, category: &str) -> MarkerSpec {
    MarkerSpec::inert(id, LatLng::new(lat, lng), category)
}

fn counting_marker(id: &str, lat: f64, lng: f64, hits: &Rc<Cell<u32>>) -> MarkerSpec {
    let hits = hits.clone();
    MarkerSpec::new(id, LatLng::new(lat, lng), "music", move || {
        hits.set(hits.get() + 1)
    })
}

/// Four markers on a square ~22px wide at zoom 10, ~87px at zoom 12
fn tight_square(hits: &Rc<Cell<u32>>) -> Vec<MarkerSpec> {
    vec![
        counting_marker("sw", 0.0, 0.0, hits),
        counting_marker("se", 0.0, 0.03, hits),
        counting_marker("nw", 0.03, 0.0, hits),
        counting_marker("ne", 0.03, 0.03, hits),
    ]
}

fn viewport_center() -> PixelPoint {
    PixelPoint::new(VIEWPORT.0 / 2.0, VIEWPORT.1 / 2.0)
}

#[test]
fn scenario_pair_and_outlier() {
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();

    let outcome = engine.set_markers(
        vec![
            marker("A", 0.0, 0.0, "music"),
            marker("B", 0.0001, 0.0001, "music"),
            marker("C", 50.0, 50.0, "food"),
        ],
        &mut host,
    );

    assert_eq!(
        outcome,
        PassOutcome::Rebuilt {
            zoom: 10.0,
            clusters: 2,
            overlays: 2,
            skipped: 0
        }
    );
    let modes: Vec<_> = engine.overlays().iter().map(Overlay::mode).collect();
    assert_eq!(modes, vec![RenderMode::DuplicateIcons, RenderMode::Single]);
    let members: Vec<Vec<&str>> = engine
        .clusters()
        .map(|c| c.members.iter().map(|m| m.id.as_str()).collect())
        .collect();
    assert_eq!(members, vec![vec!["A", "B"], vec!["C"]]);
}

#[test]
fn empty_marker_set_has_no_overlays() {
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();

    let outcome = engine.set_markers(vec![], &mut host);

    assert!(matches!(outcome, PassOutcome::Rebuilt { clusters: 0, overlays: 0, .. }));
    assert!(engine.overlays().is_empty());
    assert!(host.attached.is_empty());
}

#[test]
fn every_pass_clears_before_attaching() {
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();
    engine.set_markers(
        vec![marker("A", 0.0, 0.0, "music"), marker("C", 50.0, 50.0, "food")],
        &mut host,
    );
    host.take_events();

    // A pan-only notification still reclusters from scratch
    host.center = LatLng::new(0.01, 0.01);
    engine.on_viewport_changed(&mut host);

    assert_eq!(
        host.take_events(),
        vec![
            "detach overlay-1",
            "detach overlay-2",
            "attach overlay-3",
            "attach overlay-4",
        ]
    );
    assert_eq!(host.attached.len(), 2);
}

#[test]
fn pass_is_deferred_until_projection_ready() {
    let mut host = FakeMap::not_ready();
    let mut engine = ClusterEngine::default();

    let outcome = engine.set_markers(vec![marker("A", 0.0, 0.0, "music")], &mut host);
    assert_eq!(outcome, PassOutcome::Deferred);
    assert!(engine.is_pending());
    assert!(host.attached.is_empty());

    engine.draw(&mut host);
    assert!(host.events.is_empty());

    host.zoom = Some(8.0);
    let outcome = engine.on_viewport_changed(&mut host);
    assert!(matches!(outcome, PassOutcome::Rebuilt { overlays: 1, .. }));
    assert!(!engine.is_pending());
    assert_eq!(engine.last_zoom(), Some(8.0));
}

#[test]
fn deferred_pass_still_clears_replaced_overlays() {
    let old_hits = Rc::new(Cell::new(0));
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();
    engine.set_markers(vec![counting_marker("old", 0.0, 0.0, &old_hits)], &mut host);
    let stale = engine.overlays()[0].id();
    host.take_events();

    host.zoom = None;
    let outcome = engine.set_markers(vec![marker("new", 1.0, 1.0, "food")], &mut host);

    assert_eq!(outcome, PassOutcome::Deferred);
    assert!(engine.is_pending());
    assert!(engine.overlays().is_empty());
    assert!(host.attached.is_empty());
    assert_eq!(host.take_events(), vec![format!("detach {}", stale)]);
    assert_eq!(
        engine.activate(stale, &mut host),
        Err(EngineError::UnknownOverlay(stale))
    );
    assert_eq!(old_hits.get(), 0);
}

#[test]
fn malformed_markers_are_skipped_not_fatal() {
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();

    let outcome = engine.set_markers(
        vec![
            marker("ok", 0.0, 0.0, "music"),
            marker("bad", f64::INFINITY, 0.0, "music"),
        ],
        &mut host,
    );

    assert!(matches!(outcome, PassOutcome::Rebuilt { overlays: 1, skipped: 1, .. }));
    assert_eq!(engine.registry().rejected()[0].marker_id().as_str(), "bad");
}

#[test]
fn single_overlay_activation_runs_callback_only() {
    let hits = Rc::new(Cell::new(0));
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();
    engine.set_markers(vec![counting_marker("solo", 0.0, 0.0, &hits)], &mut host);
    engine.draw(&mut host);
    host.take_events();

    let id = engine.overlay_at(viewport_center()).expect("overlay at center");
    let activation = engine.activate(id, &mut host).unwrap();

    assert_eq!(activation, Activation::Marker { id: "solo".into() });
    assert_eq!(hits.get(), 1);
    assert!(host.take_events().is_empty());
    assert_eq!(host.zoom, Some(10.0));
}

#[test]
fn drill_in_then_recompute_splits_cluster() {
    let hits = Rc::new(Cell::new(0));
    let mut host = FakeMap::new(10.0, LatLng::new(0.015, 0.015));
    let mut engine = ClusterEngine::default();

    engine.set_markers(tight_square(&hits), &mut host);
    assert_eq!(engine.overlays().len(), 1);
    assert_eq!(engine.overlays()[0].mode(), RenderMode::DuplicateIcons);
    engine.draw(&mut host);
    host.take_events();

    let id = engine.overlay_at(viewport_center()).expect("cluster overlay");
    let activation = engine.activate(id, &mut host).unwrap();

    let (center, zoom) = match activation {
        Activation::DrillIn { center, zoom } => (center, zoom),
        other => panic!("expected drill-in, got {:?}", other),
    };
    assert_eq!(zoom, 12.0);
    assert!((center.lat - 0.015).abs() < 1e-12);
    assert!((center.lng - 0.015).abs() < 1e-12);
    assert_eq!(hits.get(), 0);
    assert_eq!(host.take_events(), vec!["set_center", "set_zoom 12"]);

    // The cluster is only resolved by the next viewport notification
    assert_eq!(engine.overlays().len(), 1);
    engine.on_viewport_changed(&mut host);
    assert_eq!(engine.overlays().len(), 4);
    assert!(engine.overlays().iter().all(|o| o.mode() == RenderMode::Single));
}

#[test]
fn above_max_zoom_everything_is_individual() {
    let hits = Rc::new(Cell::new(0));
    let config = ClusterConfig {
        max_zoom: 9.0,
        ..ClusterConfig::default()
    };
    let mut host = FakeMap::new(10.0, LatLng::new(0.015, 0.015));
    let mut engine = ClusterEngine::new(config).unwrap();

    engine.set_markers(tight_square(&hits), &mut host);

    assert_eq!(engine.overlays().len(), 4);
}

#[test]
fn stale_overlay_ids_are_rejected() {
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();
    engine.set_markers(vec![marker("A", 0.0, 0.0, "music")], &mut host);
    let stale = engine.overlays()[0].id();

    engine.on_viewport_changed(&mut host);

    assert_eq!(
        engine.activate(stale, &mut host),
        Err(EngineError::UnknownOverlay(stale))
    );
}

#[test]
fn draw_keeps_footprints_centered_on_anchor() {
    let mut host = FakeMap::new(10.0, LatLng::new(0.0, 0.0));
    let mut engine = ClusterEngine::default();
    engine.set_markers(vec![marker("A", 0.0, 0.0, "music")], &mut host);

    engine.draw(&mut host);
    let fp = engine.overlays()[0].footprint().unwrap();
    assert_eq!(fp.size, 48.0);
    assert_eq!(fp.center(), viewport_center());

    // Moving the viewport shifts the footprint on the next paint
    host.center = LatLng::new(0.0, -0.1);
    engine.draw(&mut host);
    let moved = engine.overlays()[0].footprint().unwrap();
    assert!(moved.center().x > viewport_center().x);
    assert!(engine.overlay_at(viewport_center()).is_none());
}
