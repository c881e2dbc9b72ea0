//! The renderer's interactive vocabulary.
//!
//! Every user-facing operation, whether it came from the pointer, a
//! widget button or a programmatic call, is a [`RendererCommand`] passed
//! to [`SequenceRenderer::execute`](super::SequenceRenderer::execute).

use glam::DVec2;
use web_time::Instant;

use super::SequenceRenderer;
use crate::error::SeqViewError;
use crate::registry::TrackId;

/// A discrete or parameterized operation the renderer can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererCommand {
    // ── Viewport ────────────────────────────────────────────────────
    /// Zoom by scroll units (positive zooms in) around a screen x.
    Zoom {
        /// Scroll amount.
        delta: f64,
        /// Screen x of the residue to keep stationary.
        anchor_x: f64,
    },
    /// Jump to a zoom level anchored at the viewport centre.
    SetZoom {
        /// Requested level.
        level: f64,
    },
    /// Translate the view horizontally.
    Pan {
        /// Pixels to move by.
        dx: f64,
    },
    /// A touch gesture started.
    BeginGesture,
    /// A touch gesture ended.
    EndGesture,
    /// The pointer is over a screen x.
    Hover {
        /// Screen x.
        x: f64,
    },

    // ── Track reordering ────────────────────────────────────────────
    /// Pick up a track by its navigation handle.
    BeginDrag {
        /// Track grabbed.
        track: TrackId,
        /// Pointer position on screen.
        position: DVec2,
    },
    /// Move the dragged track.
    DragTo {
        /// Pointer position on screen.
        position: DVec2,
    },
    /// Release the dragged track.
    EndDrag,
    /// Abort the drag.
    CancelDrag,

    // ── Tracks ──────────────────────────────────────────────────────
    /// Switch a track on and reflow.
    ShowTrack(TrackId),
    /// Switch a track off and reflow.
    HideTrack(TrackId),

    // ── Selection ───────────────────────────────────────────────────
    /// Highlight residues, 1-based inclusive.
    Select {
        /// First residue.
        from: usize,
        /// Last residue.
        to: usize,
    },
    /// Remove the highlight.
    ClearSelection,
}

impl SequenceRenderer {
    /// Perform `command` at `now`.
    pub fn execute(
        &mut self,
        command: RendererCommand,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        match command {
            RendererCommand::Zoom { delta, anchor_x } => {
                let _ = self.zoom_by(delta, anchor_x, now)?;
            }
            RendererCommand::SetZoom { level } => {
                let _ = self.set_zoom(level, now)?;
            }
            RendererCommand::Pan { dx } => {
                let _ = self.pan_by(dx);
            }
            RendererCommand::BeginGesture => self.begin_zoom_gesture(),
            RendererCommand::EndGesture => {
                let _ = self.end_zoom_gesture(now)?;
            }
            RendererCommand::Hover { x } => {
                let _ = self.hover(x);
            }
            RendererCommand::BeginDrag { track, position } => {
                let _ = self.begin_drag(&track, position)?;
            }
            RendererCommand::DragTo { position } => self.drag_to(position, now)?,
            RendererCommand::EndDrag => {
                let _ = self.end_drag(now)?;
            }
            RendererCommand::CancelDrag => self.cancel_drag()?,
            RendererCommand::ShowTrack(id) => {
                if self.show_track(&id) {
                    let _ = self.refresh(true, now)?;
                }
            }
            RendererCommand::HideTrack(id) => {
                if self.hide_track(&id) {
                    let _ = self.refresh(true, now)?;
                }
            }
            RendererCommand::Select { from, to } => self.select(from, to)?,
            RendererCommand::ClearSelection => self.clear_selection(),
        }
        Ok(())
    }
}
