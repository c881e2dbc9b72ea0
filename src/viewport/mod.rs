//! Zoom and pan state of the sequence view.

mod controller;
mod transform;

pub use controller::{ZoomController, ZoomEvent};
pub use transform::ViewTransform;
