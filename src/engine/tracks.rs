//! Track management and layout passes.

use web_time::Instant;

use super::{DeferredOp, RendererEvent, SequenceRenderer};
use crate::error::SeqViewError;
use crate::layout::{LayoutPass, LayoutSnapshot, TrackOrder};
use crate::registry::{RegistryEvent, TrackId};
use crate::scene::{PrimitiveId, PrimitiveSet, Shape};

impl SequenceRenderer {
    /// Realize a known track in the scene; a bare group realizes its
    /// members. Returns `false` for unknown ids and tracks that already
    /// exist.
    pub(super) fn realize_track(&mut self, id: &TrackId) -> bool {
        let Some(info) = self.registry.track_info(id) else {
            if self.registry.is_group(id) {
                let members = self.registry.group_members(id);
                return members
                    .iter()
                    .filter(|member| *member != id)
                    .fold(false, |any, member| self.realize_track(member) || any);
            }
            log::warn!("ignoring unknown track '{id}'");
            return false;
        };
        self.layout
            .add_track(&mut self.surface, self.groups.tracks, id, &info)
    }

    /// Add a track to the bottom of the order. Before a sequence is set
    /// the request is queued. Returns whether the track was realized or
    /// queued.
    pub fn add_track(&mut self, id: &TrackId) -> bool {
        if self.readiness.defer(DeferredOp::AddTrack(id.clone())) {
            return true;
        }
        self.realize_track(id)
    }

    /// Drop a track's primitives and navigation row. The id stays in the
    /// order and later passes skip it.
    pub fn remove_track(&mut self, id: &TrackId) -> bool {
        self.readiness.forget_track(id);
        let removed = {
            let mut scheduler = self.scheduler.borrow_mut();
            self.layout
                .remove_track(&mut self.surface, &mut scheduler, id)
        };
        if removed {
            log::debug!("removed track '{id}'");
            self.events.push(RendererEvent::TrackRemoved(id.clone()));
        }
        removed
    }

    /// Whether `id` is realized.
    #[must_use]
    pub fn has_track(&self, id: &TrackId) -> bool {
        self.layout.has_track(id)
    }

    /// Draw a primitive into a track. `None` if the track is not realized.
    pub fn add_primitive(&mut self, id: &TrackId, shape: Shape) -> Option<PrimitiveId> {
        self.layout.add_primitive(&mut self.surface, id, shape)
    }

    /// Primitive set of a realized track, for readers adjusting its height
    /// or attaching tracers.
    pub fn track_set_mut(&mut self, id: &TrackId) -> Option<&mut PrimitiveSet> {
        self.layout.track_set_mut(id)
    }

    /// Switch a track on. Takes effect on the next refresh.
    pub fn show_track(&mut self, id: &TrackId) -> bool {
        self.set_track_visible(id, true)
    }

    /// Switch a track off. Takes effect on the next refresh.
    pub fn hide_track(&mut self, id: &TrackId) -> bool {
        self.set_track_visible(id, false)
    }

    fn set_track_visible(&mut self, id: &TrackId, visible: bool) -> bool {
        if !self.layout.has_track(id) || !self.layout.set_active(id, visible) {
            return false;
        }
        self.events.push(RendererEvent::VisibilityChanged {
            track: id.clone(),
            visible,
        });
        true
    }

    /// Whether a track is switched on.
    #[must_use]
    pub fn is_track_visible(&self, id: &TrackId) -> bool {
        self.layout.has_track(id) && self.layout.is_active(id)
    }

    /// Recompute the layout, animating the changes when `animated`.
    ///
    /// Returns `Ok(None)` when queued or when the sequence is empty.
    pub fn refresh(
        &mut self,
        animated: bool,
        now: Instant,
    ) -> Result<Option<LayoutSnapshot>, SeqViewError> {
        if self.readiness.defer(DeferredOp::Refresh { animated }) {
            return Ok(None);
        }
        let mut scheduler = self.scheduler.borrow_mut();
        self.layout.refresh(LayoutPass {
            surface: &mut self.surface,
            scheduler: &mut scheduler,
            registry: self.registry.as_ref(),
            zoom: self.zoom.zoom(),
            sequence_length: self.sequence.len(),
            animate_from: animated.then_some(now),
        })
    }

    /// Replace the track order. Group ids expand to their members, unknown
    /// ids are dropped and tracks left out are hidden. Returns the
    /// resolved order.
    pub fn set_track_order(
        &mut self,
        ids: &[TrackId],
        now: Instant,
    ) -> Result<Vec<TrackId>, SeqViewError> {
        if self.readiness.defer(DeferredOp::SetTrackOrder(ids.to_vec())) {
            return Ok(ids.to_vec());
        }
        let order = TrackOrder::resolve(ids, self.registry.as_ref());
        for id in order.iter() {
            if !self.layout.has_track(id) {
                let _ = self.realize_track(id);
            }
        }
        let resolved = order.ids().to_vec();
        let dropped = {
            let mut scheduler = self.scheduler.borrow_mut();
            self.layout
                .set_order(order, &mut self.surface, &mut scheduler)?
        };
        if !dropped.is_empty() {
            log::debug!("track order dropped {dropped:?}");
        }
        self.events
            .push(RendererEvent::TrackOrderChanged(resolved.clone()));
        let _ = self.refresh(true, now)?;
        Ok(resolved)
    }

    /// Current track order.
    #[must_use]
    pub fn track_order(&self) -> &[TrackId] {
        self.layout.order().ids()
    }

    /// React to a change in the host's registry.
    pub fn handle_registry_event(
        &mut self,
        event: RegistryEvent,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        match event {
            RegistryEvent::LayerRegistered(id) => {
                if self.add_track(&id) {
                    let _ = self.refresh(true, now)?;
                }
            }
            RegistryEvent::GroupRegistered(id) => {
                log::debug!("group '{id}' registered");
            }
            RegistryEvent::VisibilityChange { track, visible } => {
                if self.set_track_visible(&track, visible) {
                    let _ = self.refresh(true, now)?;
                }
            }
            RegistryEvent::Removed(id) => {
                if self.remove_track(&id) {
                    let _ = self.refresh(true, now)?;
                }
            }
        }
        Ok(())
    }
}
