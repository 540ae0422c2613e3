pub mod events;
pub mod gestures;

// Re-export the essential types
pub use events::{GestureEvent, InputEvent};
pub use gestures::DragRecognizer;
