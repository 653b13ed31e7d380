//! Color palette for marker categories
//!
//! Well-known event categories get fixed colors; anything else hashes into
//! the fallback palette so a category keeps its color across runs.

use egui::Color32;
use map_cluster::Category;

// =============================================================================
// CATEGORY COLORS
// =============================================================================

/// Get color for a marker category
pub fn category_color(category: &Category) -> Color32 {
    match category.as_str().trim().to_lowercase().as_str() {
        "music" | "concert" => Color32::from_rgb(156, 39, 176), // Purple
        "food" | "market" => Color32::from_rgb(255, 152, 0),    // Orange
        "sports" | "sport" => Color32::from_rgb(33, 150, 243),  // Blue
        "art" | "exhibition" => Color32::from_rgb(233, 30, 99), // Pink
        "community" => Color32::from_rgb(76, 175, 80),          // Green
        "" => Color32::from_rgb(158, 158, 158),                 // Gray
        other => FALLBACK[(fnv1a(other) % FALLBACK.len() as u64) as usize],
    }
}

const FALLBACK: [Color32; 6] = [
    Color32::from_rgb(0, 150, 136),  // Teal
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(63, 81, 181),  // Indigo
    Color32::from_rgb(205, 220, 57), // Lime
    Color32::from_rgb(255, 87, 34),  // Deep orange
    Color32::from_rgb(96, 125, 139), // Blue grey
];

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Single uppercase letter drawn inside a glyph
pub fn category_letter(category: &Category) -> String {
    category
        .as_str()
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

// =============================================================================
// MAP CHROME
// =============================================================================

pub const MAP_BACKGROUND: Color32 = Color32::from_rgb(232, 236, 229);
pub const GRATICULE: Color32 = Color32::from_rgb(210, 214, 206);
pub const MAP_LABEL: Color32 = Color32::from_rgb(97, 105, 92);
pub const GLYPH_OUTLINE: Color32 = Color32::WHITE;
pub const BADGE_FILL: Color32 = Color32::from_rgb(211, 47, 47);
pub const HOVER_RING: Color32 = Color32::from_rgb(255, 235, 59);
