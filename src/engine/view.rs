//! Zoom, panning, selection and screen-to-residue queries.

use glam::{DAffine2, DVec2};
use web_time::Instant;

use super::{DeferredOp, Selection, SequenceRenderer};
use crate::error::SeqViewError;
use crate::registry::TrackId;
use crate::scene::{Attributes, Coord, Shape};

/// Fill of the selection highlight.
const SELECTION_FILL: &str = "rgba(255, 214, 0, 0.35)";

impl SequenceRenderer {
    /// Canonical zoom.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom.zoom()
    }

    /// Zoom being transitioned to, or the canonical zoom when settled.
    #[must_use]
    pub fn target_zoom(&self) -> f64 {
        self.zoom.target_zoom()
    }

    /// Request a zoom level anchored at the viewport centre. Returns the
    /// clamped target.
    pub fn set_zoom(&mut self, level: f64, now: Instant) -> Result<f64, SeqViewError> {
        self.set_zoom_at(level, None, now)
    }

    /// Request a zoom level keeping `focal_residue` stationary on screen.
    pub fn set_zoom_at(
        &mut self,
        level: f64,
        focal_residue: Option<f64>,
        now: Instant,
    ) -> Result<f64, SeqViewError> {
        let op = DeferredOp::SetZoom {
            level,
            focal: focal_residue,
        };
        if self.readiness.defer(op) {
            return Ok(self.zoom.target_zoom());
        }
        let target = self.zoom.set_zoom(level, focal_residue, now);
        let transform = self
            .zoom
            .transition_transform(self.surface.resolution())
            .unwrap_or(DAffine2::IDENTITY);
        self.set_scene_transform(transform)?;
        self.collect_zoom_events();
        Ok(target)
    }

    /// Zoom by `delta` scroll units around the residue under
    /// `anchor_screen_x`.
    pub fn zoom_by(
        &mut self,
        delta: f64,
        anchor_screen_x: f64,
        now: Instant,
    ) -> Result<f64, SeqViewError> {
        let level = self.zoom.target_zoom()
            * (1.0 + self.options.zoom.scroll_speed).powf(delta);
        let focal = self.residue_at(anchor_screen_x);
        self.set_zoom_at(level, Some(focal), now)
    }

    /// Fold a settled transition into the scene: drop the transform, apply
    /// the translation directly and reflow.
    pub(super) fn finish_zoom(
        &mut self,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        self.set_scene_transform(DAffine2::IDENTITY)?;
        self.surface.set_offset(DVec2::new(self.zoom.offset(), 0.0));
        self.update_axis_letters()?;
        let _ = self.refresh(true, now)?;
        self.collect_zoom_events();
        Ok(())
    }

    /// A touch gesture started; in touch mode zoom waits for its end.
    pub fn begin_zoom_gesture(&mut self) {
        self.zoom.begin_gesture();
    }

    /// A touch gesture ended. Returns whether a transition settled.
    pub fn end_zoom_gesture(&mut self, now: Instant) -> Result<bool, SeqViewError> {
        if !self.zoom.end_gesture() {
            return Ok(false);
        }
        self.finish_zoom(now)?;
        Ok(true)
    }

    /// Translate the view by `dx` pixels. Returns the new translation.
    pub fn pan_by(&mut self, dx: f64) -> f64 {
        let offset = self.zoom.pan_by(dx);
        self.surface.set_offset(DVec2::new(offset, 0.0));
        offset
    }

    /// Set the translation directly. Returns the clamped value.
    pub fn set_translation(&mut self, x: f64) -> f64 {
        let offset = self.zoom.set_translation(x);
        self.surface.set_offset(DVec2::new(offset, 0.0));
        offset
    }

    /// Current translation in pixels.
    #[must_use]
    pub fn translation(&self) -> f64 {
        self.zoom.offset()
    }

    /// Resize the viewport.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.zoom.set_viewport_width(width);
        self.surface
            .set_offset(DVec2::new(self.zoom.offset(), 0.0));
    }

    /// First residue (0-based) at the left edge of the viewport.
    #[must_use]
    pub fn left_visible_residue(&self) -> usize {
        self.zoom.left_visible_residue()
    }

    /// Last residue (0-based) at the right edge of the viewport.
    #[must_use]
    pub fn right_visible_residue(&self) -> usize {
        self.zoom.right_visible_residue()
    }

    /// Fractional residue under a screen x.
    #[must_use]
    pub fn residue_at(&self, screen_x: f64) -> f64 {
        self.zoom.view(self.surface.resolution()).residue_at(screen_x)
    }

    /// Record the residue under the pointer; `None` off the sequence.
    pub fn hover(&mut self, screen_x: f64) -> Option<usize> {
        let r = self.residue_at(screen_x).floor();
        self.hovered_residue = (r >= 0.0 && r < self.sequence.len() as f64)
            .then(|| r as usize);
        self.hovered_residue
    }

    /// Residue last reported by [`hover`](Self::hover).
    #[must_use]
    pub fn hovered_residue(&self) -> Option<usize> {
        self.hovered_residue
    }

    /// Place the navigation panel on screen.
    pub fn set_navigation_transform(&mut self, to_screen: DAffine2) {
        self.layout
            .navigation_mut()
            .set_screen_transform(to_screen);
    }

    /// Track whose navigation handle is under `screen`.
    #[must_use]
    pub fn track_handle_at(&self, screen: DVec2) -> Option<TrackId> {
        let nav = self.layout.navigation();
        nav.hit_test(nav.to_panel(screen), None).cloned()
    }

    /// Highlight residues `from..=to` (1-based, clamped to the sequence),
    /// replacing any previous highlight.
    pub fn select(&mut self, from: usize, to: usize) -> Result<(), SeqViewError> {
        if self.readiness.defer(DeferredOp::Select { from, to }) {
            return Ok(());
        }
        self.clear_selection();
        let len = self.sequence.len();
        if len == 0 {
            return Ok(());
        }
        let (lo, hi) = (from.min(to).clamp(1, len), from.max(to).clamp(1, len));
        let rect = self.surface.create(Shape::Rect {
            x: Coord::Value((lo - 1) as f64),
            y: Coord::Value(0.0),
            width: Coord::Value((hi - lo + 1) as f64),
            height: Coord::from("100%"),
        });
        let _ = self.surface.push(self.groups.selection, rect);
        self.surface
            .apply(rect, &Attributes::new().fill(SELECTION_FILL))?;
        self.selection = Some(Selection {
            from: lo,
            to: hi,
            rect,
        });
        Ok(())
    }

    /// Remove the highlight.
    pub fn clear_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.surface.remove(selection.rect);
        }
    }

    /// Highlighted range, 1-based inclusive.
    #[must_use]
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection.map(|s| (s.from, s.to))
    }
}
