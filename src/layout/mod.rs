//! Track stacking, the residue axis and the navigation overlay.

mod axis;
mod engine;
mod navigation;
mod order;

pub use axis::ResidueAxis;
pub use engine::{LayoutPass, LayoutSnapshot, TrackLayout, TrackPlacement};
pub use navigation::{NavRow, NavigationPanel, RowOptions};
pub use order::TrackOrder;
