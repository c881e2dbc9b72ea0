//! Navigation-panel drag gestures.

use glam::DVec2;
use web_time::Instant;

use super::{RendererEvent, SequenceRenderer};
use crate::drag::DragOutcome;
use crate::error::SeqViewError;
use crate::registry::TrackId;

impl SequenceRenderer {
    /// Pointer down on a track's navigation handle. Refused while another
    /// drag is in progress.
    pub fn begin_drag(
        &mut self,
        track: &TrackId,
        screen: DVec2,
    ) -> Result<bool, SeqViewError> {
        let mut scheduler = self.scheduler.borrow_mut();
        self.drag
            .pointer_down(&mut self.layout, &mut scheduler, track, screen)
    }

    /// Pointer moved during a drag.
    pub fn drag_to(&mut self, screen: DVec2, now: Instant) -> Result<(), SeqViewError> {
        let mut scheduler = self.scheduler.borrow_mut();
        self.drag
            .pointer_move(&mut self.layout, &mut scheduler, screen, now)
    }

    /// Pointer released: commit a pending reorder, or cancel.
    pub fn end_drag(&mut self, now: Instant) -> Result<DragOutcome, SeqViewError> {
        let outcome = {
            let mut scheduler = self.scheduler.borrow_mut();
            self.drag.pointer_up(&mut self.layout, &mut scheduler)?
        };
        if let DragOutcome::Committed { moved, before } = &outcome {
            if before.is_none() {
                self.events
                    .extend(moved.iter().map(|track| RendererEvent::VisibilityChanged {
                        track: track.clone(),
                        visible: false,
                    }));
            }
            self.events.push(RendererEvent::TrackOrderChanged(
                self.layout.order().ids().to_vec(),
            ));
            let _ = self.refresh(true, now)?;
        }
        Ok(outcome)
    }

    /// Abort a drag without reordering.
    pub fn cancel_drag(&mut self) -> Result<(), SeqViewError> {
        let mut scheduler = self.scheduler.borrow_mut();
        self.drag.cancel(&mut self.layout, &mut scheduler)
    }
}
