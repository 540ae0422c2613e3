use crate::{
    core::{frame::Frame, geo::Point},
    input::events::{GestureEvent, InputEvent},
};

#[derive(Debug, Clone, Copy, Default)]
struct PointerState {
    is_pressed: bool,
    current_position: Option<Point>,
}

/// Turns raw drag input into absolute-position [`GestureEvent`]s
///
/// Toolkits usually report a press position followed by per-frame deltas.
/// The pin controller wants the absolute pointer location together with the
/// frame it is measured against, so this keeps the running position and the
/// latest frame.
#[derive(Debug, Clone)]
pub struct DragRecognizer {
    frame: Frame,
    pointer: PointerState,
}

impl DragRecognizer {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            pointer: PointerState::default(),
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_pressed
    }

    /// Processes one input event; returns the gesture it produces, if any
    pub fn process_input(&mut self, input: InputEvent) -> Option<GestureEvent> {
        match input {
            InputEvent::DragStart { position } => {
                self.pointer = PointerState {
                    is_pressed: true,
                    current_position: Some(position),
                };
                Some(GestureEvent::changed(position, self.frame))
            }
            InputEvent::Drag { delta } => {
                if !self.pointer.is_pressed {
                    return None;
                }
                let position = self.pointer.current_position?.add(&delta);
                self.pointer.current_position = Some(position);
                Some(GestureEvent::changed(position, self.frame))
            }
            InputEvent::DragEnd => {
                let was_pressed = self.pointer.is_pressed;
                self.pointer = PointerState::default();
                was_pressed.then_some(GestureEvent::Ended)
            }
            InputEvent::Resize { frame } => {
                self.frame = frame;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> DragRecognizer {
        DragRecognizer::new(Frame::from_size(300.0, 200.0).unwrap())
    }

    #[test]
    fn test_deltas_accumulate() {
        let mut rec = recognizer();
        let frame = rec.frame();

        assert_eq!(
            rec.process_input(InputEvent::DragStart {
                position: Point::new(150.0, 100.0)
            }),
            Some(GestureEvent::changed(Point::new(150.0, 100.0), frame))
        );
        rec.process_input(InputEvent::Drag {
            delta: Point::new(50.0, 20.0),
        });
        assert_eq!(
            rec.process_input(InputEvent::Drag {
                delta: Point::new(25.0, 30.0)
            }),
            Some(GestureEvent::changed(Point::new(225.0, 150.0), frame))
        );
        assert!(rec.is_dragging());

        assert_eq!(rec.process_input(InputEvent::DragEnd), Some(GestureEvent::Ended));
        assert!(!rec.is_dragging());
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let mut rec = recognizer();
        assert_eq!(
            rec.process_input(InputEvent::Drag {
                delta: Point::new(1.0, 1.0)
            }),
            None
        );
        assert_eq!(rec.process_input(InputEvent::DragEnd), None);
    }

    #[test]
    fn test_resize_updates_frame() {
        let mut rec = recognizer();
        let bigger = Frame::from_size(600.0, 400.0).unwrap();
        assert_eq!(rec.process_input(InputEvent::Resize { frame: bigger }), None);
        assert_eq!(rec.frame(), bigger);
    }
}
