//! State of one drag gesture, from pointer-down to release.

use glam::DVec2;
use web_time::Instant;

use crate::registry::TrackId;

/// What the dragged row is hovering over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    /// Another row; the drop lands just before it.
    Track(TrackId),
    /// The empty area below every row; the drop appends and switches the
    /// track off.
    End,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No session.
    Idle,
    /// A row follows the pointer; no usable hover target.
    Dragging,
    /// Hovering a compatible target, waiting for it to settle or
    /// previewing the displacement.
    HoveringCandidate,
    /// Preview finished; releasing commits the reorder.
    SplicePending,
}

#[derive(Debug, Clone)]
pub(crate) struct Preview {
    pub(crate) shifts: Vec<(TrackId, f64)>,
    pub(crate) step: u32,
    pub(crate) next_at: Instant,
}

/// State of one pointer-down to pointer-up cycle.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub(crate) track: TrackId,
    pub(crate) origin: DVec2,
    pub(crate) hover: Option<HoverTarget>,
    pub(crate) hover_since: Option<Instant>,
    pub(crate) preview: Option<Preview>,
    pub(crate) splice_before: Option<HoverTarget>,
    pub(crate) track_to_splice: Option<TrackId>,
}

impl DragSession {
    pub(crate) fn new(track: TrackId, origin: DVec2) -> Self {
        Self {
            track,
            origin,
            hover: None,
            hover_since: None,
            preview: None,
            splice_before: None,
            track_to_splice: None,
        }
    }

    /// The dragged track.
    #[must_use]
    pub fn track(&self) -> &TrackId {
        &self.track
    }

    /// Pointer-down position in panel coordinates.
    #[must_use]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Current hover target.
    #[must_use]
    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    /// When the current hover settle timer started.
    #[must_use]
    pub fn hover_since(&self) -> Option<Instant> {
        self.hover_since
    }

    /// Target a release would splice before, once the preview finished.
    #[must_use]
    pub fn splice_before(&self) -> Option<&HoverTarget> {
        self.splice_before.as_ref()
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> DragState {
        if self.track_to_splice.is_some() && self.splice_before.is_some() {
            DragState::SplicePending
        } else if self.hover.is_some() {
            DragState::HoveringCandidate
        } else {
            DragState::Dragging
        }
    }

    /// Drop any preview and pending splice.
    pub(crate) fn reset_preview(&mut self) -> Vec<TrackId> {
        self.splice_before = None;
        self.track_to_splice = None;
        self.preview
            .take()
            .map(|p| p.shifts.into_iter().map(|(id, _)| id).collect())
            .unwrap_or_default()
    }
}
