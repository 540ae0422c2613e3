use crate::{PinError, Result};
use geo::HaversineDistance;
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a LatLng, rejecting values outside [-90, 90] / [-180, 180]
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        let coord = Self::new(lat, lng);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(PinError::InvalidCoordinates(format!("({lat}, {lng})")))
        }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Great-circle distance to another coordinate, in meters
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        geo_types::Point::from(*self).haversine_distance(&geo_types::Point::from(*other))
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<LatLng> for geo_types::Point<f64> {
    fn from(coord: LatLng) -> Self {
        geo_types::Point::new(coord.lng, coord.lat)
    }
}

/// Represents a point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(35.0, 135.0);
        assert_eq!(coord.lat, 35.0);
        assert_eq!(coord.lng, 135.0);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(LatLng::checked(90.5, 0.0).is_err());
        assert!(LatLng::checked(0.0, -180.5).is_err());
        assert!(LatLng::checked(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_lat_lng_distance() {
        let tokyo = LatLng::new(35.6762, 139.6503);
        let osaka = LatLng::new(34.6937, 135.5023);
        let distance = tokyo.distance_to(&osaka);

        // Roughly 397 km apart
        assert!((distance - 397_000.0).abs() < 5_000.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(225.0, 150.0);
        let b = Point::new(150.0, 100.0);
        assert_eq!(a.subtract(&b), Point::new(75.0, 50.0));
        assert_eq!(b.add(&Point::new(75.0, 50.0)), a);
    }
}
