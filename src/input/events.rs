use crate::core::{frame::Frame, geo::Point};
use serde::{Deserialize, Serialize};

/// Raw pointer input as delivered by a display toolkit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Start of drag operation
    DragStart { position: Point },
    /// Drag in progress
    Drag { delta: Point },
    /// End of drag operation
    DragEnd,
    /// Viewport/window resize
    Resize { frame: Frame },
}

/// Drag gesture as seen by the pin controller
///
/// Positions are absolute, in the same local coordinates as `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// The pointer moved while pressed
    Changed { location: Point, frame: Frame },
    /// The pointer was released or the gesture was cancelled
    Ended,
}

impl GestureEvent {
    pub fn changed(location: Point, frame: Frame) -> Self {
        Self::Changed { location, frame }
    }

    /// Gets the pointer position, if any
    pub fn location(&self) -> Option<Point> {
        match self {
            Self::Changed { location, .. } => Some(*location),
            Self::Ended => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_location() {
        let frame = Frame::from_size(300.0, 200.0).unwrap();
        let changed = GestureEvent::changed(Point::new(10.0, 20.0), frame);
        assert_eq!(changed.location(), Some(Point::new(10.0, 20.0)));
        assert!(!changed.is_end());

        assert_eq!(GestureEvent::Ended.location(), None);
        assert!(GestureEvent::Ended.is_end());
    }

    #[test]
    fn test_zero_size_frame_never_reaches_gestures() {
        let json = r#"{"Changed":{"location":{"x":10.0,"y":10.0},"frame":{"width":0.0,"height":0.0}}}"#;
        assert!(serde_json::from_str::<GestureEvent>(json).is_err());

        let json = r#"{"Resize":{"frame":{"width":-1.0,"height":200.0}}}"#;
        assert!(serde_json::from_str::<InputEvent>(json).is_err());
    }
}
