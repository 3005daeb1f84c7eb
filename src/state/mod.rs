/// State management module
///
/// This module handles all session state, including:
/// - Shared data structures (data.rs)
/// - The upload/edit/result state machine (session.rs)
/// - Preset instruction templates (preset.rs)

pub mod data;
pub mod preset;
pub mod session;

pub use data::{ImagePayload, ImageSource, Ticket};
pub use preset::Preset;
pub use session::{EditJob, Effect, Event, Session};
