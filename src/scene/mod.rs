//! Primitive surface and scene graph.
//!
//! [`Surface`] creates and owns every graphic primitive; [`PrimitiveSet`]
//! groups handles into the logical units the layout and animation layers
//! move around.

mod path;
mod primitive;
mod set;
mod surface;
mod svg;

pub use primitive::{
    Attributes, BBox, Coord, GradientStop, Primitive, PrimitiveId, Shape,
    Visibility,
};
pub use set::{PrimitiveSet, SetId};
pub use surface::{Surface, SurfaceId, ViewBox};
