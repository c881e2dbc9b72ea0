//! Drag-and-drop reordering of tracks from the navigation panel.

mod engine;
mod session;

pub use engine::{DragEngine, DragOutcome};
pub use session::{DragSession, DragState, HoverTarget};
