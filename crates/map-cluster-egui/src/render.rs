//! Map painting
//!
//! Pure painter calls over the surface state. Nothing here mutates the
//! engine or the camera.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2};
use map_cluster::{OverlayId, RenderMode};

use crate::palette::{self, category_color, category_letter};
use crate::surface::{MapSurface, OverlayElement};

/// Graticule spacing in degrees for a zoom level
fn graticule_step(zoom: f64) -> f64 {
    match zoom {
        z if z < 4.0 => 30.0,
        z if z < 7.0 => 5.0,
        z if z < 10.0 => 1.0,
        z if z < 13.0 => 0.1,
        _ => 0.01,
    }
}

/// Paint the map background, graticule and every placed overlay
pub fn paint_map(painter: &Painter, rect: Rect, surface: &MapSurface, hovered: Option<OverlayId>) {
    painter.rect_filled(rect, 0.0, palette::MAP_BACKGROUND);
    paint_graticule(painter, rect, surface);

    for (id, element) in surface.elements() {
        paint_overlay(painter, rect.min, element, hovered == Some(id));
    }

    let label = format!("zoom {:.1}", surface.camera.zoom());
    painter.text(
        rect.right_bottom() - Vec2::new(8.0, 6.0),
        Align2::RIGHT_BOTTOM,
        label,
        FontId::monospace(11.0),
        palette::MAP_LABEL,
    );
}

fn paint_graticule(painter: &Painter, rect: Rect, surface: &MapSurface) {
    let Some(bounds) = surface.camera.visible_bounds() else {
        return;
    };
    let step = graticule_step(surface.camera.zoom());
    let stroke = Stroke::new(1.0, palette::GRATICULE);

    let mut lng = (bounds.south_west.lng / step).floor() * step;
    while lng <= bounds.north_east.lng {
        let top = map_cluster::LatLng::new(bounds.north_east.lat, lng);
        if let Some(p) = surface.camera.geo_to_screen(top) {
            let x = rect.min.x + p.x as f32;
            painter.line_segment([Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)], stroke);
        }
        lng += step;
    }

    let mut lat = (bounds.south_west.lat / step).floor() * step;
    while lat <= bounds.north_east.lat {
        let left = map_cluster::LatLng::new(lat, bounds.south_west.lng);
        if let Some(p) = surface.camera.geo_to_screen(left) {
            let y = rect.min.y + p.y as f32;
            painter.line_segment([Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)], stroke);
        }
        lat += step;
    }
}

fn paint_overlay(painter: &Painter, origin: Pos2, element: &OverlayElement, hovered: bool) {
    let Some(footprint) = element.footprint else {
        return;
    };
    let center = footprint.center();
    let center = origin + Vec2::new(center.x as f32, center.y as f32);
    let size = footprint.size as f32;

    if hovered {
        painter.circle_stroke(center, size * 0.5, Stroke::new(2.0, palette::HOVER_RING));
    }

    let radius = match element.visual.mode {
        RenderMode::DuplicateIcons => size * 0.2,
        RenderMode::Single | RenderMode::DominantIcon => size * 0.35,
    };

    for glyph in &element.visual.glyphs {
        let at = center + Vec2::new(glyph.offset[0] as f32, glyph.offset[1] as f32);
        painter.circle(
            at,
            radius,
            category_color(&glyph.category),
            Stroke::new(1.5, palette::GLYPH_OUTLINE),
        );
        painter.text(
            at,
            Align2::CENTER_CENTER,
            category_letter(&glyph.category),
            FontId::proportional(radius * 1.1),
            egui::Color32::WHITE,
        );
    }

    if let Some(count) = element.visual.badge {
        let badge_at = center + Vec2::new(size * 0.3, -size * 0.3);
        painter.circle_filled(badge_at, size * 0.17, palette::BADGE_FILL);
        painter.text(
            badge_at,
            Align2::CENTER_CENTER,
            count.to_string(),
            FontId::proportional(size * 0.2),
            egui::Color32::WHITE,
        );
    }
}
