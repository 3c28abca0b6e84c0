//! Cardlink Application
//!
//! Headless shell that feeds editor events into the diagram scene.

mod app;

pub use app::{App, AppError, ReplayReport};
