use crate::{
    core::geo::LatLng,
    location::provider::{AuthorizationStatus, Fix, FixSink, LocationProvider},
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ManualShared {
    sink: Option<FixSink>,
    authorization: AuthorizationStatus,
    distance_filter: f64,
    updating: bool,
    starts: usize,
    stops: usize,
}

/// Provider driven by hand through a [`ManualHandle`]
///
/// Useful for embedding the crate behind a sensor API that pushes fixes via
/// callbacks, and for tests. Authorization defaults to granted.
#[derive(Debug)]
pub struct ManualProvider {
    shared: Arc<Mutex<ManualShared>>,
}

/// Controls a [`ManualProvider`] after it has been moved into a feed
#[derive(Debug, Clone)]
pub struct ManualHandle {
    shared: Arc<Mutex<ManualShared>>,
}

impl ManualProvider {
    pub fn new() -> (Self, ManualHandle) {
        let shared = Arc::new(Mutex::new(ManualShared {
            authorization: AuthorizationStatus::Authorized,
            ..ManualShared::default()
        }));
        (
            Self {
                shared: shared.clone(),
            },
            ManualHandle { shared },
        )
    }

    fn with<R>(&self, f: impl FnOnce(&mut ManualShared) -> R) -> Option<R> {
        self.shared.lock().ok().map(|mut shared| f(&mut shared))
    }
}

impl LocationProvider for ManualProvider {
    fn request_authorization(&mut self, sink: FixSink) {
        self.with(|shared| {
            sink.post_authorization(shared.authorization);
            shared.sink = Some(sink);
        });
    }

    fn start_updating(&mut self, sink: FixSink) {
        self.with(|shared| {
            shared.starts += 1;
            shared.updating = true;
            shared.sink = Some(sink);
        });
    }

    fn stop_updating(&mut self) {
        self.with(|shared| {
            shared.stops += 1;
            shared.updating = false;
        });
    }

    fn set_distance_filter(&mut self, meters: f64) {
        self.with(|shared| shared.distance_filter = meters);
    }
}

impl ManualHandle {
    fn with<R: Default>(&self, f: impl FnOnce(&mut ManualShared) -> R) -> R {
        self.shared
            .lock()
            .map(|mut shared| f(&mut shared))
            .unwrap_or_default()
    }

    /// Answer given to the next authorization request
    pub fn set_authorization(&self, status: AuthorizationStatus) {
        self.with(|shared| shared.authorization = status);
    }

    /// Delivers a fix if the provider is currently updating
    pub fn deliver(&self, coordinate: LatLng) -> bool {
        self.with(|shared| match (&shared.sink, shared.updating) {
            (Some(sink), true) => sink.post_fix(Fix::new(coordinate, 5.0)),
            _ => false,
        })
    }

    pub fn is_updating(&self) -> bool {
        self.with(|shared| shared.updating)
    }

    pub fn start_count(&self) -> usize {
        self.with(|shared| shared.starts)
    }

    pub fn stop_count(&self) -> usize {
        self.with(|shared| shared.stops)
    }

    pub fn distance_filter(&self) -> f64 {
        self.with(|shared| shared.distance_filter)
    }
}
