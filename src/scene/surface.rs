//! The primitive surface: a factory and arena for graphic primitives.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::{DAffine2, DVec2};

use super::primitive::{
    Attributes, BBox, Coord, GradientStop, Primitive, PrimitiveId, Shape,
};
use crate::error::SeqViewError;

static NEXT_SURFACE_ID: AtomicU32 = AtomicU32::new(1);

/// Identifies a surface to the shared animation scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u32);

/// View bounds of the surface in scaled scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    primitive: Option<Primitive>,
}

/// Vector drawing surface.
///
/// Owns every primitive in an arena addressed by generational
/// [`PrimitiveId`]s. All numeric coordinates passed to the factory methods
/// are multiplied by the surface resolution; unit strings pass through.
/// Redraw can be suspended (nested) so batched updates present as a single
/// frame.
#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    resolution: f64,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: PrimitiveId,
    suspend_depth: u32,
    dirty: bool,
    frames: u64,
    animating: bool,
    view_box: ViewBox,
    container_size: Option<DVec2>,
    offset: DVec2,
}

impl Surface {
    /// Create an empty surface with a root group.
    #[must_use]
    pub fn new(resolution: f64) -> Self {
        let mut surface = Self {
            id: SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed)),
            resolution,
            slots: Vec::new(),
            free: Vec::new(),
            root: PrimitiveId {
                index: 0,
                generation: 0,
            },
            suspend_depth: 0,
            dirty: false,
            frames: 0,
            animating: false,
            view_box: ViewBox::default(),
            container_size: None,
            offset: DVec2::ZERO,
        };
        surface.root = surface.insert(Primitive::new(Shape::Group {
            children: Vec::new(),
            transform: DAffine2::IDENTITY,
        }));
        surface
    }

    /// Surface identity.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Coordinate scale factor.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Root group every attached primitive descends from.
    #[must_use]
    pub fn root(&self) -> PrimitiveId {
        self.root
    }

    /// Drop every primitive except a fresh root.
    pub fn clear(&mut self) {
        let resolution = self.resolution;
        let id = self.id;
        let animating = self.animating;
        *self = Self::new(resolution);
        self.id = id;
        self.animating = animating;
        self.mark_dirty();
    }

    fn insert(&mut self, primitive: Primitive) -> PrimitiveId {
        self.mark_dirty();
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.primitive = Some(primitive);
            PrimitiveId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                primitive: Some(primitive),
            });
            PrimitiveId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Create a detached primitive of any kind. Numeric coordinates are
    /// scaled by the resolution.
    pub fn create(&mut self, shape: Shape) -> PrimitiveId {
        let r = self.resolution;
        let shape = match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => Shape::Rect {
                x: x.scaled(r),
                y: y.scaled(r),
                width: width.scaled(r),
                height: height.scaled(r),
            },
            Shape::Circle { cx, cy, r: radius } => Shape::Circle {
                cx: cx.scaled(r),
                cy: cy.scaled(r),
                r: radius * r,
            },
            Shape::Text { x, y, content } => Shape::Text {
                x: x.scaled(r),
                y: y.scaled(r),
                content,
            },
            Shape::Path { data } => Shape::Path {
                data: super::path::scale(&data, r).unwrap_or(data),
            },
            other => other,
        };
        self.insert(Primitive::new(shape))
    }

    /// Rectangle.
    pub fn rect(
        &mut self,
        x: impl Into<Coord>,
        y: impl Into<Coord>,
        width: impl Into<Coord>,
        height: impl Into<Coord>,
    ) -> PrimitiveId {
        self.create(Shape::Rect {
            x: x.into(),
            y: y.into(),
            width: width.into(),
            height: height.into(),
        })
    }

    /// Path from SVG path data in scene units.
    pub fn path(&mut self, data: impl Into<String>) -> PrimitiveId {
        self.create(Shape::Path { data: data.into() })
    }

    /// Circle by centre and radius.
    pub fn circle(
        &mut self,
        cx: impl Into<Coord>,
        cy: impl Into<Coord>,
        r: f64,
    ) -> PrimitiveId {
        self.create(Shape::Circle {
            cx: cx.into(),
            cy: cy.into(),
            r,
        })
    }

    /// Text anchored at `(x, y)`.
    pub fn text(
        &mut self,
        x: impl Into<Coord>,
        y: impl Into<Coord>,
        content: impl Into<String>,
    ) -> PrimitiveId {
        self.create(Shape::Text {
            x: x.into(),
            y: y.into(),
            content: content.into(),
        })
    }

    /// Empty group container.
    pub fn group(&mut self) -> PrimitiveId {
        self.create(Shape::Group {
            children: Vec::new(),
            transform: DAffine2::IDENTITY,
        })
    }

    /// Linear gradient definition.
    pub fn gradient(
        &mut self,
        name: impl Into<String>,
        stops: Vec<GradientStop>,
    ) -> PrimitiveId {
        self.create(Shape::Gradient {
            name: name.into(),
            stops,
        })
    }

    /// Append `child` to `group`, detaching it from any previous parent.
    /// Later children paint over earlier ones.
    ///
    /// Returns `false` when either handle is stale, `group` is not a group,
    /// or the push would create a cycle.
    pub fn push(&mut self, group: PrimitiveId, child: PrimitiveId) -> bool {
        if self.get(child).is_none() || group == child {
            return false;
        }
        if !matches!(
            self.get(group).map(|p| &p.shape),
            Some(Shape::Group { .. })
        ) {
            return false;
        }
        // Refuse to push an ancestor into its own descendant.
        let mut cursor = Some(group);
        while let Some(id) = cursor {
            if id == child {
                return false;
            }
            cursor = self.get(id).and_then(|p| p.parent);
        }

        self.detach(child);
        if let Some(Primitive {
            shape: Shape::Group { children, .. },
            ..
        }) = self.get_mut(group)
        {
            children.push(child);
        }
        if let Some(p) = self.get_mut(child) {
            p.parent = Some(group);
        }
        self.mark_dirty();
        true
    }

    /// Push onto the root group.
    pub fn attach(&mut self, child: PrimitiveId) -> bool {
        let root = self.root;
        self.push(root, child)
    }

    fn detach(&mut self, child: PrimitiveId) {
        let Some(parent) = self.get(child).and_then(|p| p.parent) else {
            return;
        };
        if let Some(Primitive {
            shape: Shape::Group { children, .. },
            ..
        }) = self.get_mut(parent)
        {
            children.retain(|c| *c != child);
        }
        if let Some(p) = self.get_mut(child) {
            p.parent = None;
        }
    }

    /// Remove a primitive and, for groups, all descendants.
    pub fn remove(&mut self, id: PrimitiveId) {
        if id == self.root || self.get(id).is_none() {
            return;
        }
        self.detach(id);
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let slot = &mut self.slots[next.index as usize];
            if slot.generation != next.generation {
                continue;
            }
            if let Some(Primitive {
                shape: Shape::Group { children, .. },
                ..
            }) = slot.primitive.take()
            {
                pending.extend(children);
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(next.index);
        }
        self.mark_dirty();
    }

    /// Look up a primitive.
    #[must_use]
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.primitive.as_ref())
    }

    /// Mutable lookup. Marks the surface dirty.
    pub fn get_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.dirty = true;
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.primitive.as_mut())
    }

    /// Number of live primitives, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.primitive.is_some()).count()
    }

    /// Whether only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Apply logical attributes to one primitive. Stale handles are
    /// ignored.
    pub fn apply(
        &mut self,
        id: PrimitiveId,
        attrs: &Attributes,
    ) -> Result<(), SeqViewError> {
        let resolution = self.resolution;
        match self.get_mut(id) {
            Some(p) => p.apply(attrs, resolution),
            None => {
                log::trace!("attribute write on stale primitive {id:?}");
                Ok(())
            }
        }
    }

    /// Whether `id` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: PrimitiveId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.get(current).and_then(|p| p.parent);
        }
        false
    }

    /// Accumulated transform of every group above `id`.
    fn ancestor_transform(&self, id: PrimitiveId) -> DAffine2 {
        let mut transform = DAffine2::IDENTITY;
        let mut cursor = self.get(id).and_then(|p| p.parent);
        while let Some(parent) = cursor {
            let Some(p) = self.get(parent) else { break };
            if let Shape::Group { transform: t, .. } = &p.shape {
                transform = *t * transform;
            }
            cursor = p.parent;
        }
        transform
    }

    /// Bounding box in root coordinates.
    ///
    /// Fails for removed or detached primitives, and for primitives whose
    /// geometry uses unit strings.
    pub fn bbox(&self, id: PrimitiveId) -> Result<BBox, SeqViewError> {
        if !self.is_attached(id) {
            return Err(SeqViewError::GeometryUnavailable(id));
        }
        let local = self.local_bbox(id)?;
        Ok(local.transformed(&self.ancestor_transform(id)))
    }

    fn local_bbox(&self, id: PrimitiveId) -> Result<BBox, SeqViewError> {
        let unavailable = || SeqViewError::GeometryUnavailable(id);
        let p = self.get(id).ok_or_else(unavailable)?;
        match &p.shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => {
                let (x, y) = (
                    x.value().ok_or_else(unavailable)?,
                    y.value().ok_or_else(unavailable)?,
                );
                let (w, h) = (
                    width.value().ok_or_else(unavailable)?,
                    height.value().ok_or_else(unavailable)?,
                );
                Ok(BBox::from_corners(
                    DVec2::new(x, y),
                    DVec2::new(x + w, y + h),
                ))
            }
            Shape::Circle { cx, cy, r } => {
                let c = DVec2::new(
                    cx.value().ok_or_else(unavailable)?,
                    cy.value().ok_or_else(unavailable)?,
                );
                Ok(BBox::from_corners(c - *r, c + *r))
            }
            Shape::Text { x, y, .. } => {
                let p = DVec2::new(
                    x.value().ok_or_else(unavailable)?,
                    y.value().ok_or_else(unavailable)?,
                );
                Ok(BBox::from_corners(p, p))
            }
            Shape::Path { data } => {
                let points = super::path::points(data)?;
                let mut iter = points.into_iter();
                let first = iter.next().ok_or_else(unavailable)?;
                Ok(iter.fold(BBox::from_corners(first, first), |b, p| {
                    b.union(&BBox::from_corners(p, p))
                }))
            }
            Shape::Group {
                children,
                transform,
            } => {
                let mut acc: Option<BBox> = None;
                for child in children {
                    // Children without geometry do not contribute.
                    let Ok(b) = self.local_bbox(*child) else { continue };
                    let b = b.transformed(transform);
                    acc = Some(acc.map_or(b, |a| a.union(&b)));
                }
                acc.ok_or_else(unavailable)
            }
            Shape::Gradient { .. } => Err(unavailable()),
        }
    }

    // -- Redraw batching --

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Suspend redraw. Nested calls need matching resumes.
    pub fn suspend_redraw(&mut self) {
        self.suspend_depth += 1;
    }

    /// Resume redraw; presents one frame once the outermost suspension
    /// ends and something changed.
    pub fn resume_redraw(&mut self) {
        self.suspend_depth = self.suspend_depth.saturating_sub(1);
        self.present();
    }

    /// Present a frame if redraw is not suspended and the scene changed.
    pub fn present(&mut self) {
        if self.suspend_depth == 0 && self.dirty {
            self.dirty = false;
            self.frames += 1;
        }
    }

    /// Whether redraw is currently suspended.
    #[must_use]
    pub fn is_redraw_suspended(&self) -> bool {
        self.suspend_depth > 0
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Whether the shared scheduler reports a running animation.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub(crate) fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    // -- Placement --

    /// Current view bounds.
    #[must_use]
    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Replace the view bounds.
    pub fn set_view_box(&mut self, view_box: ViewBox) {
        self.view_box = view_box;
        self.mark_dirty();
    }

    /// Outer size imposed by the layout, `None` when growing to fit.
    #[must_use]
    pub fn container_size(&self) -> Option<DVec2> {
        self.container_size
    }

    /// Set or clear the outer size.
    pub fn set_container_size(&mut self, size: Option<DVec2>) {
        self.container_size = size;
        self.mark_dirty();
    }

    /// Direct placement offset of the whole surface, in screen pixels.
    #[must_use]
    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    /// Set the direct placement offset.
    pub fn set_offset(&mut self, offset: DVec2) {
        self.offset = offset;
        self.mark_dirty();
    }
}
