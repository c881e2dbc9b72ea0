//! Input handling: event types and the processor that converts raw window
//! events into renderer commands.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into renderer commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, PointerTarget};
