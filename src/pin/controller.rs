use crate::{
    core::{
        frame::Frame,
        geo::{LatLng, Point},
        region::Region,
    },
    input::events::GestureEvent,
    pin::state::PinState,
};
use serde::{Deserialize, Serialize};

/// Drag-placement arming state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragMode {
    #[default]
    Idle,
    ArmedForDrag,
}

/// Coordinate under `location` for a display showing `region` in `frame`
///
/// The pointer's offset from the frame center, as a fraction of the frame
/// size, is scaled by the region span. Screen y grows downwards, so it is
/// subtracted from the latitude.
pub fn coordinate_at(location: Point, frame: &Frame, region: &Region) -> LatLng {
    let relative = frame.relative_offset(&location);
    let lng_offset = region.span.longitude_delta * relative.x;
    let lat_offset = region.span.latitude_delta * relative.y;

    LatLng::new(
        region.center.lat - lat_offset,
        region.center.lng + lng_offset,
    )
}

/// Owns the pin and decides when gestures may move it
///
/// The gesture handler stays attached at all times; [`DragMode`] gates
/// whether movement has any effect.
#[derive(Debug, Clone, Default)]
pub struct PinController {
    pin: PinState,
    mode: DragMode,
}

impl PinController {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            pin: PinState::new(name),
            mode: DragMode::Idle,
        }
    }

    pub fn pin(&self) -> &PinState {
        &self.pin
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn is_armed(&self) -> bool {
        self.mode == DragMode::ArmedForDrag
    }

    /// Arms drag placement; returns whether the mode changed
    pub fn arm_for_drag(&mut self) -> bool {
        let changed = self.mode != DragMode::ArmedForDrag;
        self.mode = DragMode::ArmedForDrag;
        changed
    }

    /// Leaves drag placement without a gesture; returns whether the mode changed
    pub fn disarm(&mut self) -> bool {
        let changed = self.mode != DragMode::Idle;
        self.mode = DragMode::Idle;
        changed
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.pin.name = name.into();
    }

    /// Crosshair placement: drops the pin at the region center
    ///
    /// Leaves [`DragMode`] untouched.
    pub fn confirm_at_center(&mut self, name: impl Into<String>, region: &Region) -> LatLng {
        self.pin.name = name.into();
        self.pin.drop_at(region.center);
        log::info!(
            "pin '{}' confirmed at ({}, {})",
            self.pin.name,
            region.center.lat,
            region.center.lng
        );
        region.center
    }

    /// Pointer moved during a drag; returns the new pin coordinate when armed
    pub fn drag_changed(&mut self, location: Point, frame: &Frame, region: &Region) -> Option<LatLng> {
        if !self.is_armed() {
            return None;
        }
        let coordinate = coordinate_at(location, frame, region);
        self.pin.drop_at(coordinate);
        Some(coordinate)
    }

    /// Drag finished, whether or not it moved the pin
    pub fn drag_ended(&mut self) -> bool {
        let changed = self.disarm();
        if changed {
            if let Some(coord) = self.pin.position() {
                log::info!(
                    "pin '{}' dragged to ({}, {})",
                    self.pin.name,
                    coord.lat,
                    coord.lng
                );
            }
        }
        changed
    }

    /// Dispatches a gesture event; returns the new pin coordinate, if it moved
    pub fn handle_gesture(&mut self, gesture: &GestureEvent, region: &Region) -> Option<LatLng> {
        match gesture {
            GestureEvent::Changed { location, frame } => self.drag_changed(*location, frame, region),
            GestureEvent::Ended => {
                self.drag_ended();
                None
            }
        }
    }

    /// Removes the pin; the name is kept for the next drop
    pub fn reset(&mut self) {
        self.pin.clear();
    }
}
