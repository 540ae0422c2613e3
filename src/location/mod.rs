//! Location sensing
//!
//! A [`LocationProvider`] wraps the platform sensor and posts fixes through a
//! [`FixSink`] from whatever thread it runs on. The [`LocationFeed`] drains
//! them on the display thread and turns each into a recentered region.

pub mod feed;
pub mod manual;
pub mod provider;
pub mod simulated;

pub use feed::{FeedState, FeedUpdate, LocationFeed, Updates};
pub use manual::{ManualHandle, ManualProvider};
pub use provider::{AuthorizationStatus, FeedMessage, Fix, FixSink, LocationProvider};
pub use simulated::SimulatedProvider;
