//! One map display session: location feed, viewport and pin wired together
//!
//! Everything here runs on the display thread. Providers reach the session
//! only through the feed's message queue, which [`MapSession::process_events`]
//! drains.

use crate::{
    core::{
        config::{PlacementMode, SessionConfig},
        geo::LatLng,
        region::Region,
        viewport::{InteractionMode, ViewportState},
    },
    input::events::GestureEvent,
    location::{
        feed::{FeedUpdate, LocationFeed},
        provider::{AuthorizationStatus, Fix, FixSink, LocationProvider},
    },
    pin::{
        controller::{DragMode, PinController},
        state::{PinAnnotation, PinState},
    },
    Result,
};
use fxhash::FxHashMap;
use std::collections::VecDeque;
use std::time::Duration;

/// Session events that the display layer can listen to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The current region changed (feed recenter or user pan)
    RegionChanged { region: Region },
    /// The pin moved, was renamed, or was cleared
    PinChanged { pin: PinState },
    DragModeChanged { mode: DragMode },
    PlacementChanged { placement: PlacementMode },
    AuthorizationChanged { status: AuthorizationStatus },
}

impl SessionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::RegionChanged { .. } => "regionchanged",
            SessionEvent::PinChanged { .. } => "pinchanged",
            SessionEvent::DragModeChanged { .. } => "dragmodechanged",
            SessionEvent::PlacementChanged { .. } => "placementchanged",
            SessionEvent::AuthorizationChanged { .. } => "authorizationchanged",
        }
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Queues session events and dispatches them to listeners by type
#[derive(Default)]
struct EventManager {
    listeners: FxHashMap<String, Vec<EventCallback>>,
    event_queue: VecDeque<SessionEvent>,
}

impl EventManager {
    fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    fn emit(&mut self, event: SessionEvent) {
        self.event_queue.push_back(event);
    }

    fn process_events(&mut self) -> Vec<SessionEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }
}

/// State core behind one map display
pub struct MapSession {
    feed: LocationFeed,
    viewport: ViewportState,
    pins: PinController,
    placement: PlacementMode,
    events: EventManager,
}

impl MapSession {
    /// Builds the session, asks for location access and starts sensing
    pub fn new(config: SessionConfig, provider: Box<dyn LocationProvider>) -> Result<Self> {
        config.validate()?;
        let mut feed = LocationFeed::new(provider, config.location.clone())?;
        feed.request_authorization();
        feed.start();

        log::info!(
            "map session started (placement {:?}, update_once {})",
            config.placement,
            config.location.update_once
        );

        Ok(Self {
            feed,
            viewport: ViewportState::new(),
            pins: PinController::new(config.pin_name),
            placement: config.placement,
            events: EventManager::default(),
        })
    }

    pub fn region(&self) -> Region {
        self.viewport.current()
    }

    pub fn pin(&self) -> &PinState {
        self.pins.pin()
    }

    pub fn drag_mode(&self) -> DragMode {
        self.pins.mode()
    }

    pub fn placement(&self) -> PlacementMode {
        self.placement
    }

    /// Map interaction is locked while a pin drag is armed
    pub fn interaction_mode(&self) -> InteractionMode {
        self.viewport.interaction_mode()
    }

    /// Zero or one pin to draw
    pub fn annotations(&self) -> Vec<PinAnnotation> {
        self.pins.pin().annotation().into_iter().collect()
    }

    /// Latitude and longitude text for the pin readout
    pub fn pin_labels(&self) -> (String, String) {
        self.pins.pin().labels()
    }

    /// Where the user was last seen
    pub fn last_fix(&self) -> Option<Fix> {
        self.feed.last_fix()
    }

    pub fn authorization(&self) -> AuthorizationStatus {
        self.feed.authorization()
    }

    pub fn feed(&self) -> &LocationFeed {
        &self.feed
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Handle for posting fixes from a sensor callback on another thread
    ///
    /// Valid for the current run of the feed; fetch a new one after
    /// [`MapSession::locate_me`] restarts sensing.
    pub fn fix_sink(&self) -> FixSink {
        self.feed.sink()
    }

    /// Register an event listener, keyed by [`SessionEvent::event_type`]
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
    }

    /// Applies queued location messages, then dispatches pending events
    pub fn process_events(&mut self) -> Vec<SessionEvent> {
        while let Some(update) = self.feed.poll() {
            self.apply_feed_update(update);
        }
        self.events.process_events()
    }

    /// Waits up to `timeout` for one location update, then behaves like
    /// [`MapSession::process_events`]
    pub fn wait_for_events(&mut self, timeout: Duration) -> Vec<SessionEvent> {
        if let Some(update) = self.feed.wait_update(timeout) {
            self.apply_feed_update(update);
        }
        self.process_events()
    }

    fn apply_feed_update(&mut self, update: FeedUpdate) {
        match update {
            FeedUpdate::Recentered { region, .. } => {
                self.set_region(region);
            }
            FeedUpdate::Authorization(status) => {
                self.events.emit(SessionEvent::AuthorizationChanged { status });
            }
        }
    }

    /// Programmatic region write; bypasses the interaction lock
    pub fn set_region(&mut self, region: Region) -> bool {
        let changed = self.viewport.set(region);
        if changed {
            self.events.emit(SessionEvent::RegionChanged { region });
        }
        changed
    }

    /// Region reported by the display after a user pan or zoom
    pub fn user_region_changed(&mut self, region: Region) -> bool {
        let changed = self.viewport.apply_user_region(region);
        if changed {
            self.events.emit(SessionEvent::RegionChanged { region });
        }
        changed
    }

    /// Recenters on the user again ("show current location")
    pub fn locate_me(&mut self) -> bool {
        self.feed.start()
    }

    pub fn stop_location(&mut self) -> bool {
        self.feed.stop()
    }

    /// Switches placement tab; leaving the drag tab disarms dragging
    pub fn select_placement(&mut self, placement: PlacementMode) {
        if placement == self.placement {
            return;
        }
        self.placement = placement;
        if placement == PlacementMode::Crosshair && self.pins.disarm() {
            self.drag_mode_changed();
        }
        self.events.emit(SessionEvent::PlacementChanged { placement });
    }

    /// Arms drag placement; only meaningful on the drag tab
    pub fn arm_for_drag(&mut self) -> bool {
        if self.placement != PlacementMode::Drag {
            log::debug!("arm_for_drag ignored outside drag placement");
            return false;
        }
        let changed = self.pins.arm_for_drag();
        if changed {
            self.drag_mode_changed();
        }
        changed
    }

    /// Feeds a drag gesture from the display
    ///
    /// Movement only affects the pin while drag placement is armed; the end
    /// of any gesture disarms it.
    pub fn handle_gesture(&mut self, gesture: GestureEvent) -> Option<LatLng> {
        let was_armed = self.pins.is_armed();
        let region = self.viewport.current();
        let moved = self.pins.handle_gesture(&gesture, &region);

        if moved.is_some() {
            self.pin_changed();
        }
        if was_armed != self.pins.is_armed() {
            self.drag_mode_changed();
        }
        moved
    }

    /// Crosshair placement: drops the pin at the current center
    pub fn confirm_at_center(&mut self) -> Option<LatLng> {
        if self.placement != PlacementMode::Crosshair {
            log::debug!("confirm_at_center ignored outside crosshair placement");
            return None;
        }
        let name = self.pins.pin().name.clone();
        let region = self.viewport.current();
        let coordinate = self.pins.confirm_at_center(name, &region);
        self.pin_changed();
        Some(coordinate)
    }

    pub fn set_pin_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.pins.pin().name {
            return;
        }
        self.pins.set_name(name);
        self.pin_changed();
    }

    pub fn reset_pin(&mut self) {
        if self.pins.pin().dropped {
            self.pins.reset();
            self.pin_changed();
        }
    }

    fn pin_changed(&mut self) {
        self.events.emit(SessionEvent::PinChanged {
            pin: self.pins.pin().clone(),
        });
    }

    fn drag_mode_changed(&mut self) {
        let mode = self.pins.mode();
        self.viewport.set_interaction_mode(match mode {
            DragMode::ArmedForDrag => InteractionMode::Locked,
            DragMode::Idle => InteractionMode::All,
        });
        self.events.emit(SessionEvent::DragModeChanged { mode });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{frame::Frame, geo::Point, region::Span},
        location::manual::{ManualHandle, ManualProvider},
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn session(placement: PlacementMode) -> (MapSession, ManualHandle) {
        let (provider, handle) = ManualProvider::new();
        let config = SessionConfig {
            placement,
            ..SessionConfig::default()
        };
        (MapSession::new(config, Box::new(provider)).unwrap(), handle)
    }

    #[test]
    fn test_new_session_requests_access_and_starts() {
        let (mut session, handle) = session(PlacementMode::Drag);
        assert!(handle.is_updating());
        assert!(session.region().is_empty());

        let events = session.process_events();
        assert_eq!(
            events,
            vec![SessionEvent::AuthorizationChanged {
                status: AuthorizationStatus::Authorized
            }]
        );
    }

    #[test]
    fn test_fix_recenters_region_only() {
        let (mut session, handle) = session(PlacementMode::Drag);
        handle.deliver(LatLng::new(35.0, 135.0));
        session.process_events();

        assert_eq!(session.region().center, LatLng::new(35.0, 135.0));
        assert!(!session.pin().dropped);
        assert!(!handle.is_updating());
        assert_eq!(session.last_fix().map(|f| f.coordinate), Some(LatLng::new(35.0, 135.0)));
    }

    #[test]
    fn test_arming_locks_interaction() {
        let (mut session, _handle) = session(PlacementMode::Drag);
        assert!(session.arm_for_drag());
        assert_eq!(session.interaction_mode(), InteractionMode::Locked);

        let pan = Region::new(LatLng::new(1.0, 1.0), Span::new(0.1, 0.1).unwrap());
        assert!(!session.user_region_changed(pan));

        session.handle_gesture(GestureEvent::Ended);
        assert_eq!(session.drag_mode(), DragMode::Idle);
        assert_eq!(session.interaction_mode(), InteractionMode::All);
        assert!(session.user_region_changed(pan));
    }

    #[test]
    fn test_programmatic_region_write_is_published_once() {
        let (mut session, _handle) = session(PlacementMode::Drag);
        session.process_events();
        session.arm_for_drag();
        session.process_events();

        let region = Region::new(LatLng::new(34.0, 135.0), Span::new(0.1, 0.2).unwrap());
        assert!(session.set_region(region));
        assert!(!session.set_region(region));

        assert_eq!(session.process_events(), vec![SessionEvent::RegionChanged { region }]);
        assert_eq!(session.region(), region);
        assert_eq!(session.interaction_mode(), InteractionMode::Locked);
    }

    #[test]
    fn test_placement_gates_entry_points() {
        let (mut session, _handle) = session(PlacementMode::Drag);
        assert_eq!(session.confirm_at_center(), None);

        session.arm_for_drag();
        session.select_placement(PlacementMode::Crosshair);
        assert_eq!(session.drag_mode(), DragMode::Idle);
        assert!(!session.arm_for_drag());
        assert_eq!(session.confirm_at_center(), Some(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn test_listeners_by_type() {
        let (mut session, handle) = session(PlacementMode::Drag);
        let regions = Arc::new(AtomicUsize::new(0));
        let pins = Arc::new(AtomicUsize::new(0));
        let (r, p) = (regions.clone(), pins.clone());
        session.on("regionchanged", move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        });
        session.on("pinchanged", move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });

        handle.deliver(LatLng::new(35.0, 135.0));
        session.process_events();
        session.arm_for_drag();
        let frame = Frame::from_size(300.0, 200.0).unwrap();
        session.handle_gesture(GestureEvent::changed(Point::new(200.0, 120.0), frame));
        session.handle_gesture(GestureEvent::changed(Point::new(210.0, 130.0), frame));
        session.handle_gesture(GestureEvent::Ended);
        session.process_events();

        assert_eq!(regions.load(Ordering::SeqCst), 1);
        assert_eq!(pins.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rename_and_reset() {
        let (mut session, _handle) = session(PlacementMode::Crosshair);
        session.set_pin_name("Station");
        session.confirm_at_center();
        assert_eq!(session.annotations()[0].name, "Station");

        session.set_pin_name("Exit");
        assert_eq!(session.annotations()[0].name, "Exit");

        session.reset_pin();
        assert!(session.annotations().is_empty());
        assert_eq!(session.pin_labels().0, "(not set)");
    }
}
