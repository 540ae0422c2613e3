use crate::core::{constants::UNSET_LABEL, geo::LatLng};
use serde::{Deserialize, Serialize};

/// The single user-placed pin
///
/// `coordinate` only means something once `dropped` is true.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PinState {
    pub coordinate: LatLng,
    pub dropped: bool,
    pub name: String,
}

impl PinState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            coordinate: LatLng::default(),
            dropped: false,
            name: name.into(),
        }
    }

    /// The pin position, if one has been dropped
    pub fn position(&self) -> Option<LatLng> {
        self.dropped.then_some(self.coordinate)
    }

    /// Annotation the display layer should draw, if any
    pub fn annotation(&self) -> Option<PinAnnotation> {
        self.position().map(|coordinate| PinAnnotation {
            coordinate,
            name: self.name.clone(),
        })
    }

    /// Latitude and longitude labels, or a placeholder while nothing is dropped
    pub fn labels(&self) -> (String, String) {
        match self.position() {
            Some(coord) => (coord.lat.to_string(), coord.lng.to_string()),
            None => (UNSET_LABEL.to_string(), UNSET_LABEL.to_string()),
        }
    }

    pub(crate) fn drop_at(&mut self, coordinate: LatLng) {
        self.coordinate = coordinate;
        self.dropped = true;
    }

    pub(crate) fn clear(&mut self) {
        self.dropped = false;
    }
}

/// A pin as handed to the display layer for drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinAnnotation {
    pub coordinate: LatLng,
    pub name: String,
}

impl PinAnnotation {
    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.coordinate.lat,
                "lng": self.coordinate.lng
            },
            "name": self.name
        })
    }
}
