use crate::core::geo::LatLng;
use crossbeam_channel::Sender;
use instant::Instant;
use serde::{Deserialize, Serialize};

/// Whether the user allowed location access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    /// No answer yet; nothing has been delivered
    #[default]
    NotDetermined,
    Authorized,
    /// Access refused; no fixes will ever arrive
    Denied,
}

/// A single reported position sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub coordinate: LatLng,
    /// Horizontal accuracy radius in meters, as reported by the sensor
    pub accuracy: f64,
    pub timestamp: Instant,
}

impl Fix {
    pub fn new(coordinate: LatLng, accuracy: f64) -> Self {
        Self {
            coordinate,
            accuracy,
            timestamp: Instant::now(),
        }
    }
}

/// What a provider can post to the display thread
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Fix(Fix),
    Authorization(AuthorizationStatus),
}

/// A message tagged with the feed run it was posted for
pub(crate) type Envelope = (u64, FeedMessage);

/// Cloneable, thread-safe handle providers use to deliver messages
///
/// Each handle belongs to one run of the feed (one `start()`). Fixes posted
/// through a handle from an earlier run are dropped by the feed.
#[derive(Debug, Clone)]
pub struct FixSink {
    tx: Sender<Envelope>,
    run: u64,
}

impl FixSink {
    pub(crate) fn new(tx: Sender<Envelope>, run: u64) -> Self {
        Self { tx, run }
    }

    /// Run this handle posts for
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Posts a fix; returns false once the receiving feed is gone
    pub fn post_fix(&self, fix: Fix) -> bool {
        self.post(FeedMessage::Fix(fix))
    }

    pub fn post_authorization(&self, status: AuthorizationStatus) -> bool {
        self.post(FeedMessage::Authorization(status))
    }

    pub fn post(&self, message: FeedMessage) -> bool {
        self.tx.send((self.run, message)).is_ok()
    }
}

/// Platform location-sensing capability
///
/// Implementations may deliver on any thread, but only through the sink they
/// were handed. Every fix they deliver is treated as significant, so any
/// distance filtering happens here rather than in the feed.
pub trait LocationProvider: Send {
    /// Ask the user for access; the answer is posted to `sink`
    fn request_authorization(&mut self, sink: FixSink);

    /// Begin delivering fixes to `sink`
    fn start_updating(&mut self, sink: FixSink);

    /// Stop delivering fixes. Fixes already posted may still be in flight.
    fn stop_updating(&mut self);

    /// Minimum movement in meters between two delivered fixes
    fn set_distance_filter(&mut self, meters: f64);
}
