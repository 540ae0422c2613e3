//! Core constants shared by the location feed and the viewport.
//! Keeping them in a single place makes it easier to tweak the defaults.

/// Sensing granularity: fixes closer than this are suppressed by the provider.
pub const DEFAULT_DISTANCE_FILTER_METERS: f64 = 2.0;

/// Extent of the viewport opened around each fix.
pub const DEFAULT_REGION_METERS: f64 = 1000.0;

/// Stop sensing after the first fix ("snap to my location").
pub const DEFAULT_UPDATE_ONCE: bool = true;

/// Display name given to a freshly created pin.
pub const DEFAULT_PIN_NAME: &str = "Pin";

/// Widest longitude span a region may carry.
pub const MAX_LONGITUDE_DELTA: f64 = 360.0;

/// Widest latitude span a region may carry.
pub const MAX_LATITUDE_DELTA: f64 = 180.0;

/// Label shown in place of a coordinate while no pin is dropped.
pub const UNSET_LABEL: &str = "(not set)";
