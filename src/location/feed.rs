use crate::{
    core::{config::LocationConfig, geo::LatLng, region::Region},
    location::provider::{AuthorizationStatus, Envelope, FeedMessage, Fix, FixSink, LocationProvider},
    Result,
};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Stopped,
    Running,
}

/// Result of applying one provider message on the display thread
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    /// A fix arrived; `region` is centered on it with the configured extent
    Recentered { fix: Fix, region: Region },
    Authorization(AuthorizationStatus),
}

/// Turns provider fixes into viewport regions
///
/// Owns the provider (injected, never global) and the receiving end of the
/// message queue. All draining happens on the thread that owns the feed.
pub struct LocationFeed {
    provider: Box<dyn LocationProvider>,
    config: LocationConfig,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    run: u64,
    state: FeedState,
    authorization: AuthorizationStatus,
    last_fix: Option<Fix>,
    fixes_applied: u64,
}

impl LocationFeed {
    pub fn new(mut provider: Box<dyn LocationProvider>, config: LocationConfig) -> Result<Self> {
        config.validate()?;
        let (tx, rx) = unbounded();
        provider.set_distance_filter(config.distance_filter);

        Ok(Self {
            provider,
            config,
            tx,
            rx,
            run: 0,
            state: FeedState::Stopped,
            authorization: AuthorizationStatus::NotDetermined,
            last_fix: None,
            fixes_applied: 0,
        })
    }

    /// Handle for posting messages into this feed's queue during the
    /// current run
    pub fn sink(&self) -> FixSink {
        FixSink::new(self.tx.clone(), self.run)
    }

    pub fn config(&self) -> &LocationConfig {
        &self.config
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FeedState::Running
    }

    pub fn authorization(&self) -> AuthorizationStatus {
        self.authorization
    }

    /// Most recent fix applied, for the "you are here" marker
    pub fn last_fix(&self) -> Option<Fix> {
        self.last_fix
    }

    pub fn fixes_applied(&self) -> u64 {
        self.fixes_applied
    }

    pub fn request_authorization(&mut self) {
        self.provider.request_authorization(self.sink());
    }

    /// Begins sensing; returns false if already running
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.run += 1;
        log::debug!("location feed starting (run {})", self.run);
        self.state = FeedState::Running;
        self.provider.start_updating(self.sink());
        true
    }

    /// Halts sensing; returns false if already stopped
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        log::debug!("location feed stopping");
        self.state = FeedState::Stopped;
        self.provider.stop_updating();
        true
    }

    /// Applies one message from the provider
    pub fn handle_message(&mut self, message: FeedMessage) -> Option<FeedUpdate> {
        match message {
            FeedMessage::Fix(fix) => self.apply_fix(fix),
            FeedMessage::Authorization(status) => {
                self.authorization = status;
                match status {
                    AuthorizationStatus::Denied => {
                        log::warn!("location access denied; the map will not recenter")
                    }
                    _ => log::debug!("location authorization: {:?}", status),
                }
                Some(FeedUpdate::Authorization(status))
            }
        }
    }

    fn handle_envelope(&mut self, (run, message): Envelope) -> Option<FeedUpdate> {
        if run != self.run && matches!(message, FeedMessage::Fix(_)) {
            log::debug!("dropping fix from run {} (current run {})", run, self.run);
            return None;
        }
        self.handle_message(message)
    }

    fn apply_fix(&mut self, fix: Fix) -> Option<FeedUpdate> {
        if !self.is_running() {
            log::debug!("dropping fix that arrived after stop");
            return None;
        }
        if !fix.coordinate.is_valid() {
            log::warn!(
                "discarding fix with invalid coordinate ({}, {})",
                fix.coordinate.lat,
                fix.coordinate.lng
            );
            return None;
        }

        let region = match Region::around(fix.coordinate, self.config.region_meters) {
            Ok(region) => region,
            Err(e) => {
                log::warn!("cannot build region around fix: {}", e);
                return None;
            }
        };

        self.last_fix = Some(fix);
        self.fixes_applied += 1;

        if self.config.update_once {
            self.stop();
        }

        Some(FeedUpdate::Recentered { fix, region })
    }

    /// Drains the queue until one message produces an update
    pub fn poll(&mut self) -> Option<FeedUpdate> {
        while let Ok(envelope) = self.rx.try_recv() {
            if let Some(update) = self.handle_envelope(envelope) {
                return Some(update);
            }
        }
        None
    }

    /// Blocks up to `timeout` for the next update
    pub fn wait_update(&mut self, timeout: Duration) -> Option<FeedUpdate> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(envelope) => {
                    if let Some(update) = self.handle_envelope(envelope) {
                        return Some(update);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Lazily applies queued messages, yielding each resulting update
    pub fn updates(&mut self) -> Updates<'_> {
        Updates { feed: self }
    }

    /// Coordinates of the fixes applied while draining the queue
    ///
    /// Authorization changes are applied along the way but not yielded.
    pub fn fixes(&mut self) -> impl Iterator<Item = LatLng> + '_ {
        self.updates().filter_map(|update| match update {
            FeedUpdate::Recentered { fix, .. } => Some(fix.coordinate),
            FeedUpdate::Authorization(_) => None,
        })
    }
}

impl Drop for LocationFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Iterator returned by [`LocationFeed::updates`]
pub struct Updates<'a> {
    feed: &'a mut LocationFeed,
}

impl Iterator for Updates<'_> {
    type Item = FeedUpdate;

    fn next(&mut self) -> Option<Self::Item> {
        self.feed.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::manual::ManualProvider;

    fn feed(update_once: bool) -> (LocationFeed, crate::location::manual::ManualHandle) {
        let (provider, handle) = ManualProvider::new();
        let config = LocationConfig {
            update_once,
            ..LocationConfig::default()
        };
        (LocationFeed::new(Box::new(provider), config).unwrap(), handle)
    }

    fn fix(lat: f64, lng: f64) -> Fix {
        Fix::new(LatLng::new(lat, lng), 5.0)
    }

    #[test]
    fn test_distance_filter_forwarded() {
        let (_feed, handle) = feed(true);
        assert_eq!(handle.distance_filter(), 2.0);
    }

    #[test]
    fn test_update_once_stops_after_first_fix() {
        let (mut feed, handle) = feed(true);
        feed.start();
        let sink = feed.sink();
        sink.post_fix(fix(35.0, 135.0));
        sink.post_fix(fix(35.1, 135.1));

        let applied: Vec<_> = feed.fixes().collect();
        assert_eq!(applied, vec![LatLng::new(35.0, 135.0)]);
        assert_eq!(feed.state(), FeedState::Stopped);
        assert_eq!(handle.stop_count(), 1);

        // Restartable
        feed.start();
        feed.sink().post_fix(fix(36.0, 136.0));
        assert_eq!(feed.fixes().collect::<Vec<_>>(), vec![LatLng::new(36.0, 136.0)]);
        assert_eq!(handle.start_count(), 2);
        assert_eq!(feed.fixes_applied(), 2);
    }

    #[test]
    fn test_continuous_tracking() {
        let (mut feed, _handle) = feed(false);
        feed.start();
        for i in 0..5 {
            feed.sink().post_fix(fix(35.0 + i as f64 * 0.01, 135.0));
        }
        assert_eq!(feed.fixes().count(), 5);
        assert!(feed.is_running());
    }

    #[test]
    fn test_region_centered_on_fix() {
        let (mut feed, _handle) = feed(true);
        feed.start();
        feed.sink().post_fix(fix(35.0, 135.0));

        match feed.poll() {
            Some(FeedUpdate::Recentered { region, .. }) => {
                assert_eq!(region.center, LatLng::new(35.0, 135.0));
                assert!(region.span.latitude_delta > 0.0);
                assert!(region.span.longitude_delta > region.span.latitude_delta);
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_and_late_fixes_dropped() {
        let (mut feed, _handle) = feed(false);
        feed.sink().post_fix(fix(35.0, 135.0));
        assert_eq!(feed.poll(), None);

        feed.start();
        feed.sink().post_fix(fix(120.0, 135.0));
        assert_eq!(feed.poll(), None);
        assert_eq!(feed.last_fix(), None);
    }

    #[test]
    fn test_fix_from_previous_run_dropped_after_restart() {
        let (mut feed, _handle) = feed(false);
        feed.start();
        let stale = feed.sink();
        feed.stop();
        feed.start();

        // Queued before the restarted feed drained anything
        stale.post_fix(fix(1.0, 1.0));
        feed.sink().post_fix(fix(2.0, 2.0));

        assert_eq!(feed.fixes().collect::<Vec<_>>(), vec![LatLng::new(2.0, 2.0)]);
        assert_eq!(feed.fixes_applied(), 1);

        // Authorization answers are never tied to a run
        stale.post_authorization(AuthorizationStatus::Denied);
        assert_eq!(
            feed.poll(),
            Some(FeedUpdate::Authorization(AuthorizationStatus::Denied))
        );
    }

    #[test]
    fn test_denial_is_observable() {
        let (mut feed, handle) = feed(true);
        handle.set_authorization(AuthorizationStatus::Denied);
        feed.request_authorization();

        assert_eq!(
            feed.poll(),
            Some(FeedUpdate::Authorization(AuthorizationStatus::Denied))
        );
        assert_eq!(feed.authorization(), AuthorizationStatus::Denied);
    }

    #[test]
    fn test_start_stop_idempotent() {
        let (mut feed, handle) = feed(true);
        assert!(feed.start());
        assert!(!feed.start());
        assert!(feed.stop());
        assert!(!feed.stop());
        assert_eq!(handle.start_count(), 1);
        assert_eq!(handle.stop_count(), 1);
    }
}
