use crate::core::region::Region;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Whether the user may pan and zoom the map display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Fully interactive
    #[default]
    All,
    /// Pan and zoom gestures are disabled (e.g. while dragging a pin)
    Locked,
}

/// Handle returned by [`ViewportState::subscribe`]
pub type ListenerId = u64;

/// Region listener callback type
pub type RegionCallback = Box<dyn Fn(&Region) + Send + Sync>;

/// Single source of truth for the region shown by a map display
///
/// Two writers share it: the location feed recenters it programmatically and
/// the display reports user pans and zooms. Subscribers are notified once per
/// actual change; writing the current value again is a no-op.
pub struct ViewportState {
    region: Region,
    interaction: InteractionMode,
    listeners: FxHashMap<ListenerId, RegionCallback>,
    next_listener: ListenerId,
    #[cfg(feature = "tokio-runtime")]
    watch_tx: tokio::sync::watch::Sender<Region>,
}

impl ViewportState {
    /// Creates a viewport holding the empty region
    pub fn new() -> Self {
        Self::with_region(Region::default())
    }

    pub fn with_region(region: Region) -> Self {
        #[cfg(feature = "tokio-runtime")]
        let (watch_tx, _) = tokio::sync::watch::channel(region);

        Self {
            region,
            interaction: InteractionMode::All,
            listeners: FxHashMap::default(),
            next_listener: 0,
            #[cfg(feature = "tokio-runtime")]
            watch_tx,
        }
    }

    pub fn current(&self) -> Region {
        self.region
    }

    /// Replaces the region; returns whether it changed
    pub fn set(&mut self, region: Region) -> bool {
        if region == self.region {
            return false;
        }

        log::debug!(
            "region -> center ({:.6}, {:.6}) span ({:.6}, {:.6})",
            region.center.lat,
            region.center.lng,
            region.span.latitude_delta,
            region.span.longitude_delta
        );
        self.region = region;

        for callback in self.listeners.values() {
            callback(&self.region);
        }

        #[cfg(feature = "tokio-runtime")]
        self.watch_tx.send_replace(region);

        true
    }

    /// Region reported by a user pan or zoom on the display
    ///
    /// Ignored while the display is [`InteractionMode::Locked`].
    pub fn apply_user_region(&mut self, region: Region) -> bool {
        match self.interaction {
            InteractionMode::All => self.set(region),
            InteractionMode::Locked => {
                log::debug!("ignoring user region change while interaction is locked");
                false
            }
        }
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.interaction = mode;
    }

    /// Register a listener called with every new region
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&Region) + Send + Sync + 'static,
    {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.insert(id, Box::new(callback));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Async view of the same region, for display layers running on tokio
    #[cfg(feature = "tokio-runtime")]
    pub fn watch(&self) -> tokio::sync::watch::Receiver<Region> {
        self.watch_tx.subscribe()
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportState")
            .field("region", &self.region)
            .field("interaction", &self.interaction)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
