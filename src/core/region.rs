use crate::core::constants::{MAX_LATITUDE_DELTA, MAX_LONGITUDE_DELTA};
use crate::core::geo::LatLng;
use crate::{PinError, Result};
use serde::{Deserialize, Serialize};

/// Angular extent of a viewport, in degrees
///
/// The all-zero default only ever appears in the empty region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    pub(crate) latitude_delta: f64,
    pub(crate) longitude_delta: f64,
}

/// Unchecked wire form of a [`Span`]
#[derive(Deserialize)]
struct RawSpan {
    latitude_delta: f64,
    longitude_delta: f64,
}

impl TryFrom<RawSpan> for Span {
    type Error = PinError;

    fn try_from(raw: RawSpan) -> Result<Self> {
        if raw.latitude_delta == 0.0 && raw.longitude_delta == 0.0 {
            return Ok(Span::default());
        }
        Span::new(raw.latitude_delta, raw.longitude_delta)
    }
}

impl Span {
    /// Creates a span; both deltas must be positive and finite
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Result<Self> {
        let valid = |delta: f64| delta.is_finite() && delta > 0.0;
        if !valid(latitude_delta) || !valid(longitude_delta) {
            return Err(PinError::InvalidSpan(format!(
                "latitude_delta={latitude_delta}, longitude_delta={longitude_delta}"
            )));
        }
        Ok(Self {
            latitude_delta,
            longitude_delta,
        })
    }

    pub fn latitude_delta(&self) -> f64 {
        self.latitude_delta
    }

    pub fn longitude_delta(&self) -> f64 {
        self.longitude_delta
    }

    /// Converts a metric extent around `center` into degrees
    ///
    /// One degree of latitude and one degree of longitude are measured at the
    /// center's latitude with the haversine formula. Near the poles the
    /// longitude delta saturates at 360°.
    pub fn from_meters(center: LatLng, latitudinal_meters: f64, longitudinal_meters: f64) -> Result<Self> {
        if !(latitudinal_meters > 0.0 && longitudinal_meters > 0.0) {
            return Err(PinError::InvalidSpan(format!(
                "{latitudinal_meters}m x {longitudinal_meters}m"
            )));
        }

        let meters_per_lat_degree = LatLng::new(0.0, 0.0).distance_to(&LatLng::new(1.0, 0.0));
        let meters_per_lng_degree =
            LatLng::new(center.lat, 0.0).distance_to(&LatLng::new(center.lat, 1.0));

        let latitude_delta = (latitudinal_meters / meters_per_lat_degree).min(MAX_LATITUDE_DELTA);
        let longitude_delta = if meters_per_lng_degree > f64::EPSILON {
            (longitudinal_meters / meters_per_lng_degree).min(MAX_LONGITUDE_DELTA)
        } else {
            MAX_LONGITUDE_DELTA
        };

        Self::new(latitude_delta, longitude_delta)
    }
}

/// A map viewport: center coordinate plus angular span
///
/// Equality is exact on all four scalars. Change detection relies on that:
/// a region is only propagated when it differs bit-for-bit from the current
/// one, so echoing a value back never triggers another write.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub center: LatLng,
    pub span: Span,
}

impl Region {
    pub fn new(center: LatLng, span: Span) -> Self {
        Self { center, span }
    }

    /// Region centered on `center`, `meters` wide in both directions
    pub fn around(center: LatLng, meters: f64) -> Result<Self> {
        Ok(Self::new(center, Span::from_meters(center, meters, meters)?))
    }

    /// True for the default region nothing has written yet
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Same span, new center
    pub fn recentered(&self, center: LatLng) -> Self {
        Self::new(center, self.span)
    }
}
