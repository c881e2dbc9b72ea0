//! Overlay panel listing tracks as draggable handles.
//!
//! The panel draws on its own [`Surface`] in pixel units and mirrors the
//! vertical layout of the main scene row for row.

use glam::{DAffine2, DVec2};
use rustc_hash::FxHashMap;
use web_time::Instant;

use crate::animation::AnimationScheduler;
use crate::error::SeqViewError;
use crate::registry::TrackId;
use crate::scene::{
    Attributes, PrimitiveId, PrimitiveSet, Shape, Surface, Visibility,
};

/// How a row should be drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowOptions {
    /// Label text.
    pub label: String,
    /// Handle colour.
    pub color: String,
    /// Group the row can be reordered within. Controllers use their own id.
    pub group: Option<TrackId>,
    /// Whether the row stands in for a whole group.
    pub is_controller: bool,
    /// Whether the row is shown.
    pub visible: bool,
}

/// One mirrored track.
#[derive(Debug, Clone)]
pub struct NavRow {
    container: PrimitiveId,
    handle: PrimitiveId,
    label: PrimitiveId,
    set: PrimitiveSet,
    y: f64,
    height: f64,
    options: RowOptions,
}

impl NavRow {
    /// Top in panel pixels.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Height in panel pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether the row is shown.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.options.visible
    }

    /// Reorder group.
    #[must_use]
    pub fn group(&self) -> Option<&TrackId> {
        self.options.group.as_ref()
    }

    /// Whether the row is a group controller.
    #[must_use]
    pub fn is_controller(&self) -> bool {
        self.options.is_controller
    }

    /// The handle rectangle hit tests run against.
    #[must_use]
    pub fn handle(&self) -> PrimitiveId {
        self.handle
    }
}

/// The navigation overlay.
#[derive(Debug)]
pub struct NavigationPanel {
    surface: Surface,
    width: f64,
    rows: FxHashMap<TrackId, NavRow>,
    to_screen: DAffine2,
}

impl NavigationPanel {
    /// Empty panel `width` pixels wide.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            surface: Surface::new(1.0),
            width,
            rows: FxHashMap::default(),
            to_screen: DAffine2::IDENTITY,
        }
    }

    /// Panel drawing surface.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable panel surface.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Panel width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Placement of the panel on screen.
    pub fn set_screen_transform(&mut self, to_screen: DAffine2) {
        self.to_screen = to_screen;
    }

    /// Screen point to panel coordinates.
    #[must_use]
    pub fn to_panel(&self, screen: DVec2) -> DVec2 {
        self.to_screen.inverse().transform_point2(screen)
    }

    /// Row for `id`.
    #[must_use]
    pub fn row(&self, id: &TrackId) -> Option<&NavRow> {
        self.rows.get(id)
    }

    /// Number of rows, shown or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn create_row(&mut self, height: f64, options: RowOptions) -> NavRow {
        let container = self.surface.group();
        let handle = self.surface.rect(0.0, 0.0, self.width, height);
        let label = self.surface.text(4.0, height * 0.75, options.label.clone());
        let _ = self.surface.push(container, handle);
        let _ = self.surface.push(container, label);
        let _ = self.surface.attach(container);
        NavRow {
            container,
            handle,
            label,
            set: PrimitiveSet::from_members([container]),
            y: 0.0,
            height,
            options,
        }
    }

    /// Place the row for `id` at `y` with `height` (panel pixels), creating
    /// it on first use.
    pub fn render_track(
        &mut self,
        scheduler: &mut AnimationScheduler,
        id: &TrackId,
        y: f64,
        height: f64,
        options: RowOptions,
        animated: Option<Instant>,
    ) -> Result<(), SeqViewError> {
        let created = !self.rows.contains_key(id);
        if created {
            let row = self.create_row(height, options.clone());
            let _ = self.rows.insert(id.clone(), row);
        }
        let Some(row) = self.rows.get_mut(id) else {
            return Ok(());
        };
        let visibility = if options.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        self.surface.apply(
            row.handle,
            &Attributes::new().height(height).fill(options.color.clone()),
        )?;
        self.surface
            .apply(row.label, &Attributes::new().y(height * 0.75))?;
        let attrs = Attributes::new().y(y).visibility(visibility);
        // New rows appear in place rather than sliding in from the top.
        match animated.filter(|_| !created) {
            Some(now) => row.set.animate(&mut self.surface, scheduler, &attrs, now)?,
            None => row.set.attr(&mut self.surface, scheduler, &attrs)?,
        }
        row.y = y;
        row.height = height;
        row.options = options;
        Ok(())
    }

    /// Hide the row for `id`.
    pub fn hide_track(
        &mut self,
        scheduler: &mut AnimationScheduler,
        id: &TrackId,
    ) -> Result<(), SeqViewError> {
        let Some(row) = self.rows.get_mut(id) else {
            return Ok(());
        };
        row.options.visible = false;
        row.set.hide(&mut self.surface, scheduler)
    }

    /// Drop the row for `id`.
    pub fn remove_track(&mut self, scheduler: &mut AnimationScheduler, id: &TrackId) {
        if let Some(mut row) = self.rows.remove(id) {
            row.set.remove_from(&mut self.surface, scheduler);
        }
    }

    /// Visible row whose handle contains `point` (panel coordinates),
    /// ignoring `exclude`. Rows whose geometry cannot be queried are
    /// skipped.
    #[must_use]
    pub fn hit_test(&self, point: DVec2, exclude: Option<&TrackId>) -> Option<&TrackId> {
        self.rows
            .iter()
            .filter(|(id, row)| Some(*id) != exclude && row.options.visible)
            .find(|(id, row)| match self.surface.bbox(row.handle) {
                Ok(bbox) => bbox.contains(point),
                Err(e) => {
                    log::debug!("skipping hit test for '{id}': {e}");
                    false
                }
            })
            .map(|(id, _)| id)
    }

    /// Bottom edge of the lowest visible row.
    #[must_use]
    pub fn content_bottom(&self) -> f64 {
        self.rows
            .values()
            .filter(|row| row.options.visible)
            .map(|row| row.y + row.height)
            .fold(0.0, f64::max)
    }

    /// Whether `point` lies in the drop zone below every row.
    #[must_use]
    pub fn is_below_rows(&self, point: DVec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y > self.content_bottom()
    }

    /// Lift a row for dragging: it stops receiving pointer events and is
    /// drawn `offset` away from its slot.
    pub fn follow_pointer(
        &mut self,
        scheduler: &mut AnimationScheduler,
        id: &TrackId,
        offset: DVec2,
    ) -> Result<(), SeqViewError> {
        let Some(row) = self.rows.get(id) else {
            return Ok(());
        };
        let attrs = Attributes::new()
            .pointer_events(false)
            .transform(DAffine2::from_translation(DVec2::new(
                offset.x,
                row.y + offset.y,
            )));
        row.set.attr(&mut self.surface, scheduler, &attrs)
    }

    /// Draw a row displaced by `dy` from its slot, for reorder previews.
    pub fn displace(
        &mut self,
        scheduler: &mut AnimationScheduler,
        id: &TrackId,
        dy: f64,
    ) -> Result<(), SeqViewError> {
        let Some(row) = self.rows.get(id) else {
            return Ok(());
        };
        row.set
            .attr(&mut self.surface, scheduler, &Attributes::new().y(row.y + dy))
    }

    /// Put a row back in its slot and re-enable pointer events.
    pub fn restore(
        &mut self,
        scheduler: &mut AnimationScheduler,
        id: &TrackId,
    ) -> Result<(), SeqViewError> {
        let Some(row) = self.rows.get(id) else {
            return Ok(());
        };
        let attrs = Attributes::new()
            .pointer_events(true)
            .transform(DAffine2::from_translation(DVec2::new(0.0, row.y)));
        row.set.attr(&mut self.surface, scheduler, &attrs)
    }

    /// Transform currently applied to a row's container.
    #[must_use]
    pub fn row_transform(&self, id: &TrackId) -> Option<DAffine2> {
        let row = self.rows.get(id)?;
        match &self.surface.get(row.container)?.shape {
            Shape::Group { transform, .. } => Some(*transform),
            _ => None,
        }
    }

    /// Whether a row currently receives pointer events.
    #[must_use]
    pub fn accepts_pointer(&self, id: &TrackId) -> bool {
        self.rows
            .get(id)
            .and_then(|row| self.surface.get(row.container))
            .is_some_and(|p| p.pointer_events)
    }
}
