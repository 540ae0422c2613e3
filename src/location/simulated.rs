use crate::{
    core::geo::LatLng,
    location::provider::{AuthorizationStatus, Fix, FixSink, LocationProvider},
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

/// Running replay thread and the channel that stops it
struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Replays a scripted route from a background thread
///
/// Stands in for a device sensor: fixes are posted from a worker thread at a
/// fixed interval, and fixes closer than the distance filter to the last
/// delivered one are skipped. Restarting resumes where the script left off.
/// Stopping waits for the worker, so nothing is posted once it returns.
pub struct SimulatedProvider {
    route: Arc<Vec<LatLng>>,
    interval: Duration,
    accuracy: f64,
    deny: bool,
    distance_filter: f64,
    cursor: Arc<AtomicUsize>,
    worker: Option<Worker>,
}

impl SimulatedProvider {
    pub fn new(route: Vec<LatLng>) -> Self {
        Self {
            route: Arc::new(route),
            interval: Duration::from_millis(100),
            accuracy: 5.0,
            deny: false,
            distance_filter: 0.0,
            cursor: Arc::new(AtomicUsize::new(0)),
            worker: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = meters;
        self
    }

    /// Answer authorization requests with a refusal
    pub fn denying(mut self) -> Self {
        self.deny = true;
        self
    }

    /// Index of the next scripted position
    pub fn position_in_route(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn authorization(&self) -> AuthorizationStatus {
        if self.deny {
            AuthorizationStatus::Denied
        } else {
            AuthorizationStatus::Authorized
        }
    }
}

impl LocationProvider for SimulatedProvider {
    fn request_authorization(&mut self, sink: FixSink) {
        sink.post_authorization(self.authorization());
    }

    fn start_updating(&mut self, sink: FixSink) {
        if self.deny {
            log::debug!("simulated provider: not authorized, no fixes will be delivered");
            return;
        }
        self.stop_updating();

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let route = self.route.clone();
        let cursor = self.cursor.clone();
        let interval = self.interval;
        let accuracy = self.accuracy;
        let distance_filter = self.distance_filter;

        let handle = std::thread::spawn(move || {
            let mut last_delivered: Option<LatLng> = None;
            loop {
                if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                    break;
                }
                let index = cursor.load(Ordering::SeqCst);
                let Some(&coordinate) = route.get(index) else {
                    break;
                };
                cursor.store(index + 1, Ordering::SeqCst);

                let filtered = last_delivered
                    .map(|last| last.distance_to(&coordinate) < distance_filter)
                    .unwrap_or(false);
                if !filtered {
                    if !sink.post_fix(Fix::new(coordinate, accuracy)) {
                        break;
                    }
                    last_delivered = Some(coordinate);
                }

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => break,
                }
            }
        });

        self.worker = Some(Worker { stop_tx, handle });
    }

    fn stop_updating(&mut self) {
        if let Some(Worker { stop_tx, handle }) = self.worker.take() {
            drop(stop_tx);
            if handle.join().is_err() {
                log::warn!("simulated provider worker panicked");
            }
        }
    }

    fn set_distance_filter(&mut self, meters: f64) {
        self.distance_filter = meters;
    }
}

impl Drop for SimulatedProvider {
    fn drop(&mut self) {
        self.stop_updating();
    }
}
