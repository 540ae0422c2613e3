//! Prelude module for common pindrop types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use pindrop::prelude::*;`

pub use crate::core::{
    config::{LocationConfig, LocationProfile, PlacementMode, SessionConfig},
    frame::Frame,
    geo::{LatLng, Point},
    region::{Region, Span},
    sync::{RegionMirror, Side, TwoWayBinding},
    viewport::{InteractionMode, ViewportState},
};

pub use crate::input::{
    events::{GestureEvent, InputEvent},
    gestures::DragRecognizer,
};

pub use crate::location::{
    AuthorizationStatus, FeedMessage, FeedState, FeedUpdate, Fix, FixSink, LocationFeed,
    LocationProvider, ManualHandle, ManualProvider, SimulatedProvider,
};

pub use crate::pin::{
    controller::{coordinate_at, DragMode, PinController},
    state::{PinAnnotation, PinState},
};

pub use crate::session::{MapSession, SessionEvent};

pub use crate::{PinError, Result};

pub use std::time::Duration;
