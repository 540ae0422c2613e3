pub mod controller;
pub mod state;

pub use controller::{DragMode, PinController};
pub use state::{PinAnnotation, PinState};
