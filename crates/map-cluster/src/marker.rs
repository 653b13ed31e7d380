//! Marker specifications
//!
//! A `MarkerSpec` is what callers hand the registry: an id, a position, a
//! category and an activation callback. `MarkerRecord` is the loose serde
//! form used for fixtures and API payloads, where fields may be missing.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MarkerError;
use crate::geo::LatLng;

/// Opaque marker identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a random id for markers without a stable one
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Category tag, used for icon selection and homogeneity checks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Activation callback. Single-threaded, so `Rc` rather than `Arc`.
pub type ActivateFn = Rc<dyn Fn()>;

/// One point of interest
#[derive(Clone)]
pub struct MarkerSpec {
    pub id: MarkerId,
    pub position: LatLng,
    pub category: Category,
    on_activate: ActivateFn,
}

impl MarkerSpec {
    pub fn new(
        id: impl Into<MarkerId>,
        position: LatLng,
        category: impl Into<Category>,
        on_activate: impl Fn() + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            category: category.into(),
            on_activate: Rc::new(on_activate),
        }
    }

    /// Marker whose activation does nothing
    pub fn inert(id: impl Into<MarkerId>, position: LatLng, category: impl Into<Category>) -> Self {
        Self::new(id, position, category, || {})
    }

    pub fn activate(&self) {
        (self.on_activate)()
    }

    /// Contract check run by the registry before each pass
    pub fn validate(&self) -> Result<(), MarkerError> {
        if !self.position.is_valid() {
            return Err(MarkerError::InvalidPosition {
                id: self.id.clone(),
                lat: self.position.lat,
                lng: self.position.lng,
            });
        }
        if self.category.is_empty() {
            return Err(MarkerError::EmptyCategory {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for MarkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerSpec")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl From<String> for MarkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Serde form of a marker. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    #[serde(default)]
    pub id: Option<MarkerId>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    /// Display label, carried through for hosts that show one
    #[serde(default)]
    pub title: Option<String>,
}

impl MarkerRecord {
    /// Build a spec, minting an id when the record has none
    pub fn into_spec(self, on_activate: ActivateFn) -> Result<MarkerSpec, MarkerError> {
        let id = self.id.unwrap_or_else(MarkerId::generate);
        let (lat, lng) = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(MarkerError::MissingPosition { id }),
        };
        let category = match self.category {
            Some(c) => Category::new(c),
            None => return Err(MarkerError::MissingCategory { id }),
        };
        let spec = MarkerSpec {
            id,
            position: LatLng::new(lat, lng),
            category,
            on_activate,
        };
        spec.validate()?;
        Ok(spec)
    }
}
