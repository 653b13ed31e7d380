//! Marker registry - the flat working set for one clustering pass

use std::collections::HashSet;

use tracing::warn;

use crate::error::MarkerError;
use crate::marker::MarkerSpec;

/// The full set of currently visible markers
///
/// Callers always replace the whole set; there is no incremental add/remove.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: Vec<MarkerSpec>,
    rejected: Vec<MarkerError>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working set. Malformed markers are skipped with a warning
    /// so one bad marker never blanks the map. Returns the number skipped.
    pub fn replace(&mut self, markers: Vec<MarkerSpec>) -> usize {
        self.markers.clear();
        self.rejected.clear();

        let mut seen = HashSet::with_capacity(markers.len());
        for marker in markers {
            let check = marker.validate().and_then(|()| {
                if seen.insert(marker.id.clone()) {
                    Ok(())
                } else {
                    Err(MarkerError::DuplicateId {
                        id: marker.id.clone(),
                    })
                }
            });
            match check {
                Ok(()) => self.markers.push(marker),
                Err(err) => {
                    warn!(code = err.code(), marker = %err.marker_id(), "skipping marker: {}", err);
                    self.rejected.push(err);
                }
            }
        }

        self.rejected.len()
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    /// Markers skipped by the last `replace`
    pub fn rejected(&self) -> &[MarkerError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;

    #[test]
    fn test_replace_keeps_order() {
        let mut registry = MarkerRegistry::new();
        let skipped = registry.replace(vec![
            MarkerSpec::inert("b", LatLng::new(1.0, 1.0), "music"),
            MarkerSpec::inert("a", LatLng::new(2.0, 2.0), "food"),
        ]);
        assert_eq!(skipped, 0);
        let ids: Vec<_> = registry.markers().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_replace_skips_malformed_and_duplicates() {
        let mut registry = MarkerRegistry::new();
        let skipped = registry.replace(vec![
            MarkerSpec::inert("ok", LatLng::new(1.0, 1.0), "music"),
            MarkerSpec::inert("nan", LatLng::new(f64::NAN, 1.0), "music"),
            MarkerSpec::inert("ok", LatLng::new(3.0, 3.0), "music"),
            MarkerSpec::inert("blank", LatLng::new(3.0, 3.0), ""),
        ]);
        assert_eq!(skipped, 3);
        assert_eq!(registry.len(), 1);
        let codes: Vec<_> = registry.rejected().iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["INVALID_POSITION", "DUPLICATE_ID", "EMPTY_CATEGORY"]);
    }

    #[test]
    fn test_replace_clears_previous_set() {
        let mut registry = MarkerRegistry::new();
        registry.replace(vec![MarkerSpec::inert("a", LatLng::new(1.0, 1.0), "music")]);
        registry.replace(vec![]);
        assert!(registry.is_empty());
        assert!(registry.rejected().is_empty());
    }
}
