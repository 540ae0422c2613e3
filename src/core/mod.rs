pub mod config;
pub mod constants;
pub mod frame;
pub mod geo;
pub mod region;
pub mod sync;
pub mod viewport;
