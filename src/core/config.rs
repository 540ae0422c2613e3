//! Configuration for location sensing and pin placement
//!
//! Options are plain structs with sensible defaults. A [`LocationProfile`]
//! preset resolves to a full [`LocationConfig`], and a whole
//! [`SessionConfig`] can be loaded from JSON.

use crate::core::constants::{
    DEFAULT_DISTANCE_FILTER_METERS, DEFAULT_PIN_NAME, DEFAULT_REGION_METERS, DEFAULT_UPDATE_ONCE,
};
use crate::{PinError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum LocationProfile {
    /// Center on the user once, then stop sensing
    SnapOnce,
    /// Keep following the user at street level
    Tracking,
    Custom(LocationConfig),
}

impl LocationProfile {
    pub fn resolve(&self) -> LocationConfig {
        match self {
            Self::SnapOnce => LocationConfig {
                distance_filter: DEFAULT_DISTANCE_FILTER_METERS,
                region_meters: DEFAULT_REGION_METERS,
                update_once: true,
            },
            Self::Tracking => LocationConfig {
                distance_filter: 10.0,
                region_meters: 500.0,
                update_once: false,
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for LocationProfile {
    fn default() -> Self {
        Self::SnapOnce
    }
}

/// Location sensing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Meters the device must move before the provider reports a new fix
    pub distance_filter: f64,
    /// Extent of the region opened around each fix, in meters
    pub region_meters: f64,
    /// Stop sensing right after the first fix of each `start()`
    pub update_once: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            distance_filter: DEFAULT_DISTANCE_FILTER_METERS,
            region_meters: DEFAULT_REGION_METERS,
            update_once: DEFAULT_UPDATE_ONCE,
        }
    }
}

impl LocationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.distance_filter.is_finite() && self.distance_filter >= 0.0) {
            return Err(PinError::Config(format!(
                "distance_filter must be a non-negative number of meters, got {}",
                self.distance_filter
            )));
        }
        if !(self.region_meters.is_finite() && self.region_meters > 0.0) {
            return Err(PinError::Config(format!(
                "region_meters must be positive, got {}",
                self.region_meters
            )));
        }
        Ok(())
    }
}

/// Which placement tab is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// The pin follows the pointer during a press-and-drag gesture
    #[default]
    Drag,
    /// The pin is dropped at the viewport center
    Crosshair,
}

/// Everything a [`crate::MapSession`] needs at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub location: LocationConfig,
    pub pin_name: String,
    pub placement: PlacementMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            pin_name: DEFAULT_PIN_NAME.to_string(),
            placement: PlacementMode::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_profile(profile: LocationProfile) -> Self {
        Self {
            location: profile.resolve(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.location.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.location.distance_filter, 2.0);
        assert_eq!(config.location.region_meters, 1000.0);
        assert!(config.location.update_once);
        assert_eq!(config.placement, PlacementMode::Drag);
    }

    #[test]
    fn test_profiles_resolve() {
        assert_eq!(LocationProfile::SnapOnce.resolve(), LocationConfig::default());
        assert!(!LocationProfile::Tracking.resolve().update_once);

        let custom = LocationConfig {
            distance_filter: 0.0,
            region_meters: 250.0,
            update_once: false,
        };
        assert_eq!(LocationProfile::Custom(custom.clone()).resolve(), custom);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{ "location": { "update_once": false }, "placement": "crosshair" }"#,
        )
        .unwrap();
        assert!(!config.location.update_once);
        assert_eq!(config.location.region_meters, 1000.0);
        assert_eq!(config.placement, PlacementMode::Crosshair);
        assert_eq!(config.pin_name, "Pin");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SessionConfig::from_json_str(r#"{ "location": { "region_meters": 0 } }"#);
        assert!(matches!(err, Err(PinError::Config(_))));

        let err = SessionConfig::from_json_str("{ not json");
        assert!(matches!(err, Err(PinError::Serialization(_))));
    }
}
