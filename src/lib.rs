//! # pindrop
//!
//! State core for "drop a pin on a map" interfaces.
//!
//! A live [`LocationFeed`] recenters a [`ViewportState`], and a
//! [`PinController`] places a single named pin either by dragging it across
//! the map or by confirming the viewport center under a crosshair.
//! [`MapSession`] wires the three together for one display session.
//!
//! Rendering, permission prompts and styling are left to the display layer;
//! this crate only owns the state that layer reads.

pub mod core;
pub mod input;
pub mod location;
pub mod pin;
pub mod prelude;
pub mod session;

// Re-export public API
pub use crate::core::{
    config::{LocationConfig, LocationProfile, PlacementMode, SessionConfig},
    frame::Frame,
    geo::{LatLng, Point},
    region::{Region, Span},
    sync::{RegionMirror, Side, TwoWayBinding},
    viewport::{InteractionMode, ViewportState},
};

pub use input::{
    events::{GestureEvent, InputEvent},
    gestures::DragRecognizer,
};

pub use location::{
    feed::{FeedState, FeedUpdate, LocationFeed},
    manual::{ManualHandle, ManualProvider},
    provider::{AuthorizationStatus, FeedMessage, Fix, FixSink, LocationProvider},
    simulated::SimulatedProvider,
};

pub use pin::{
    controller::{DragMode, PinController},
    state::{PinAnnotation, PinState},
};

pub use session::{MapSession, SessionEvent};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PinError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Config error: {0}")]
    Config(String),
}
