//! Graphic primitives and the per-kind translation of logical attributes.
//!
//! Callers speak in logical fields ("move to y", "set height"); each
//! [`Shape`] variant decides how that lands on its own geometry. A rect
//! writes its `y`, a path rewrites its command list, a circle moves its
//! centre and a group rewrites the translation of its transform.

use glam::{DAffine2, DVec2};

use super::path;
use crate::error::{finite, SeqViewError};

/// Handle to a primitive owned by a [`Surface`](super::Surface).
///
/// Handles are generational: once a primitive is removed its handle stops
/// resolving, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// A coordinate as handed to the surface.
///
/// Numbers are in scene units and get multiplied by the surface
/// resolution; strings are unit-suffixed values (`"50%"`, `"2em"`) used
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Coord {
    /// Numeric coordinate.
    Value(f64),
    /// Pre-unit string, never scaled.
    Unit(String),
}

impl Coord {
    /// Apply the surface resolution to numeric coordinates.
    #[must_use]
    pub fn scaled(self, resolution: f64) -> Self {
        match self {
            Self::Value(v) => Self::Value(v * resolution),
            unit @ Self::Unit(_) => unit,
        }
    }

    /// Numeric value, if this is not a unit string.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Unit(_) => None,
        }
    }
}

impl From<f64> for Coord {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl From<&str> for Coord {
    fn from(s: &str) -> Self {
        Self::Unit(s.to_owned())
    }
}

impl From<String> for Coord {
    fn from(s: String) -> Self {
        Self::Unit(s)
    }
}

/// Visibility of a primitive or a whole set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Drawn.
    #[default]
    Visible,
    /// Not drawn, still laid out.
    Hidden,
}

impl Visibility {
    /// SVG attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// One colour stop of a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 to 1.0.
    pub offset: f64,
    /// CSS colour.
    pub color: String,
}

/// Kind-specific geometry of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect {
        /// Left edge.
        x: Coord,
        /// Top edge.
        y: Coord,
        /// Width.
        width: Coord,
        /// Height.
        height: Coord,
    },
    /// Path described by SVG path data.
    Path {
        /// Path data (`M 0 0 L 10 0 ...`).
        data: String,
    },
    /// Circle positioned by its centre.
    Circle {
        /// Centre x.
        cx: Coord,
        /// Centre y.
        cy: Coord,
        /// Radius, already scaled.
        r: f64,
    },
    /// Text anchored at its baseline origin.
    Text {
        /// Anchor x.
        x: Coord,
        /// Anchor y.
        y: Coord,
        /// Text content.
        content: String,
    },
    /// Container; child order is paint order.
    Group {
        /// Children, painted first to last.
        children: Vec<PrimitiveId>,
        /// Transform applied to all children.
        transform: DAffine2,
    },
    /// Linear gradient definition.
    Gradient {
        /// Identifier referenced by `fill="url(#id)"`.
        name: String,
        /// Colour stops.
        stops: Vec<GradientStop>,
    },
}

/// Logical attributes applied to a primitive or a whole set.
///
/// Unset fields are left untouched. Positional fields are in scene units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    /// Logical left position.
    pub x: Option<f64>,
    /// Logical top position.
    pub y: Option<f64>,
    /// Logical height.
    pub height: Option<f64>,
    /// Visibility.
    pub visibility: Option<Visibility>,
    /// Opacity, 0.0 to 1.0.
    pub opacity: Option<f64>,
    /// Fill colour.
    pub fill: Option<String>,
    /// Whether the primitive receives pointer events.
    pub pointer_events: Option<bool>,
    /// Replacement group transform.
    pub transform: Option<DAffine2>,
}

impl Attributes {
    /// Empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logical left position.
    #[must_use]
    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Set the logical top position.
    #[must_use]
    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Set the logical height.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Set visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Set opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set fill colour.
    #[must_use]
    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Enable or disable pointer events.
    #[must_use]
    pub fn pointer_events(mut self, enabled: bool) -> Self {
        self.pointer_events = Some(enabled);
        self
    }

    /// Replace the group transform.
    #[must_use]
    pub fn transform(mut self, transform: DAffine2) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Whether the map moves anything vertically.
    #[must_use]
    pub fn has_positional_delta(&self) -> bool {
        self.y.is_some() || self.height.is_some()
    }

    /// Copy of this map without the positional fields.
    #[must_use]
    pub fn without_position(&self) -> Self {
        Self {
            y: None,
            height: None,
            ..self.clone()
        }
    }
}

/// A drawable element.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// Kind-specific geometry.
    pub shape: Shape,
    /// Visibility.
    pub visibility: Visibility,
    /// Opacity, 0.0 to 1.0.
    pub opacity: f64,
    /// Fill colour.
    pub fill: Option<String>,
    /// Stroke colour.
    pub stroke: Option<String>,
    /// Whether the primitive receives pointer events.
    pub pointer_events: bool,
    /// Containing group, `None` for the root and detached primitives.
    pub(crate) parent: Option<PrimitiveId>,
}

impl Primitive {
    /// A visible primitive with default styling.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            visibility: Visibility::Visible,
            opacity: 1.0,
            fill: None,
            stroke: None,
            pointer_events: true,
            parent: None,
        }
    }

    /// Short kind name, matching the SVG element.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.shape {
            Shape::Rect { .. } => "rect",
            Shape::Path { .. } => "path",
            Shape::Circle { .. } => "circle",
            Shape::Text { .. } => "text",
            Shape::Group { .. } => "g",
            Shape::Gradient { .. } => "linearGradient",
        }
    }

    /// Current logical top position, if this kind has a numeric one.
    #[must_use]
    pub fn logical_y(&self, resolution: f64) -> Option<f64> {
        let scaled = match &self.shape {
            Shape::Rect { y, .. } | Shape::Text { y, .. } => y.value()?,
            Shape::Path { data } => path::first_y(data).ok().flatten()?,
            Shape::Circle { cy, r, .. } => cy.value()? - r,
            Shape::Group { transform, .. } => transform.translation.y,
            Shape::Gradient { .. } => return None,
        };
        Some(scaled / resolution)
    }

    /// Current logical height, for kinds that have one.
    #[must_use]
    pub fn logical_height(&self, resolution: f64) -> Option<f64> {
        match &self.shape {
            Shape::Rect { height, .. } => Some(height.value()? / resolution),
            _ => None,
        }
    }

    /// Apply a logical attribute map.
    ///
    /// Positional values are validated before anything is written, so a
    /// malformed write leaves the primitive unchanged.
    pub fn apply(
        &mut self,
        attrs: &Attributes,
        resolution: f64,
    ) -> Result<(), SeqViewError> {
        let y = attrs.y.map(|v| finite("y", v)).transpose()?;
        let height = attrs.height.map(|v| finite("height", v)).transpose()?;
        let x = attrs.x.map(|v| finite("x", v)).transpose()?;

        if let Some(transform) = attrs.transform {
            self.set_transform(transform);
        }
        if let Some(x) = x {
            self.set_x(x * resolution);
        }
        if let Some(y) = y {
            self.set_y(y * resolution)?;
        }
        if let Some(height) = height {
            self.set_height(height * resolution);
        }
        if let Some(visibility) = attrs.visibility {
            self.visibility = visibility;
        }
        if let Some(opacity) = attrs.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(fill) = &attrs.fill {
            self.fill = Some(fill.clone());
        }
        if let Some(enabled) = attrs.pointer_events {
            self.pointer_events = enabled;
        }
        Ok(())
    }

    /// Move the primitive so its top sits at `y` (scaled units).
    fn set_y(&mut self, y: f64) -> Result<(), SeqViewError> {
        match &mut self.shape {
            Shape::Rect { y: top, .. } | Shape::Text { y: top, .. } => {
                *top = Coord::Value(y);
            }
            Shape::Path { data } => {
                *data = path::move_to_y(data, y)?;
            }
            Shape::Circle { cy, r, .. } => *cy = Coord::Value(y + *r),
            Shape::Group { transform, .. } => transform.translation.y = y,
            Shape::Gradient { .. } => {}
        }
        Ok(())
    }

    fn set_x(&mut self, x: f64) {
        match &mut self.shape {
            Shape::Rect { x: left, .. } | Shape::Text { x: left, .. } => {
                *left = Coord::Value(x);
            }
            Shape::Circle { cx, r, .. } => *cx = Coord::Value(x + *r),
            Shape::Group { transform, .. } => transform.translation.x = x,
            Shape::Path { .. } | Shape::Gradient { .. } => {}
        }
    }

    fn set_height(&mut self, h: f64) {
        if let Shape::Rect { height, .. } = &mut self.shape {
            *height = Coord::Value(h.max(0.0));
        }
    }

    fn set_transform(&mut self, new: DAffine2) {
        if let Shape::Group { transform, .. } = &mut self.shape {
            *transform = new;
        }
    }
}

/// Axis-aligned bounding box in scene units (after resolution scaling).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    /// Top-left corner.
    pub min: DVec2,
    /// Bottom-right corner.
    pub max: DVec2,
}

impl BBox {
    /// Box spanning two corners in any order.
    #[must_use]
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Whether `p` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    /// Smallest box covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box after applying an affine transform.
    #[must_use]
    pub fn transformed(&self, t: &DAffine2) -> Self {
        let corners = [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ];
        let mut out = Self::from_corners(
            t.transform_point2(corners[0]),
            t.transform_point2(corners[2]),
        );
        for c in corners {
            let p = t.transform_point2(c);
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
