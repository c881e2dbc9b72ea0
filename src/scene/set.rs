//! Primitive sets: batchable collections treated as one visual unit.

use std::sync::atomic::{AtomicU32, Ordering};

use web_time::Instant;

use super::primitive::{Attributes, PrimitiveId, Visibility};
use super::surface::Surface;
use crate::animation::{AnimationScheduler, AnimationTask};
use crate::error::{finite, SeqViewError};

static NEXT_SET_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a set, used by the scheduler to supersede tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetId(u32);

impl SetId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An ordered collection of primitives plus the layout fields the track
/// engine attaches to it.
#[derive(Debug, Clone)]
pub struct PrimitiveSet {
    id: SetId,
    members: Vec<PrimitiveId>,
    track_height: f64,
    fixed_track_height: Option<f64>,
    tracers: Option<Box<PrimitiveSet>>,
}

impl Default for PrimitiveSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SetId::next(),
            members: Vec::new(),
            track_height: 0.0,
            fixed_track_height: None,
            tracers: None,
        }
    }

    /// Set holding `members`.
    #[must_use]
    pub fn from_members(members: impl IntoIterator<Item = PrimitiveId>) -> Self {
        let mut set = Self::new();
        set.members.extend(members);
        set
    }

    /// Identity.
    #[must_use]
    pub fn id(&self) -> SetId {
        self.id
    }

    /// Members in paint order.
    #[must_use]
    pub fn members(&self) -> &[PrimitiveId] {
        &self.members
    }

    /// Append a member.
    pub fn push(&mut self, id: PrimitiveId) {
        self.members.push(id);
    }

    /// Drop a member. Returns whether it was present.
    pub fn remove(&mut self, id: PrimitiveId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        before != self.members.len()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Nominal row height assigned by the layout.
    #[must_use]
    pub fn track_height(&self) -> f64 {
        self.track_height
    }

    /// Set the nominal row height.
    pub fn set_track_height(&mut self, height: f64) {
        self.track_height = height;
    }

    /// Content-driven height overriding the uniform row height.
    #[must_use]
    pub fn fixed_track_height(&self) -> Option<f64> {
        self.fixed_track_height
    }

    /// Set or clear the content-driven height.
    pub fn set_fixed_track_height(&mut self, height: Option<f64>) {
        self.fixed_track_height = height;
    }

    /// Secondary indicator marks shown above the tracer zoom threshold.
    #[must_use]
    pub fn tracers(&self) -> Option<&PrimitiveSet> {
        self.tracers.as_deref()
    }

    /// Mutable tracers.
    pub fn tracers_mut(&mut self) -> Option<&mut PrimitiveSet> {
        self.tracers.as_deref_mut()
    }

    /// Attach or drop the tracer sub-set.
    pub fn set_tracers(&mut self, tracers: Option<PrimitiveSet>) {
        self.tracers = tracers.map(Box::new);
    }

    /// Logical top of the first member that has one.
    #[must_use]
    pub fn current_y(&self, surface: &Surface) -> Option<f64> {
        let resolution = surface.resolution();
        self.members
            .iter()
            .filter_map(|id| surface.get(*id))
            .find_map(|p| p.logical_y(resolution))
    }

    /// Logical height of the first member that has one.
    #[must_use]
    pub fn current_height(&self, surface: &Surface) -> Option<f64> {
        let resolution = surface.resolution();
        self.members
            .iter()
            .filter_map(|id| surface.get(*id))
            .find_map(|p| p.logical_height(resolution))
    }

    /// Apply attributes to every member immediately.
    ///
    /// Cancels any animation still running on this set, so the direct
    /// write is final. Fails on the first member that rejects the write.
    pub fn attr(
        &self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
        attrs: &Attributes,
    ) -> Result<(), SeqViewError> {
        if scheduler.cancel(self.id) {
            log::trace!("direct write cancelled animation on {:?}", self.id);
        }
        self.write(surface, attrs)
    }

    fn write(
        &self,
        surface: &mut Surface,
        attrs: &Attributes,
    ) -> Result<(), SeqViewError> {
        for id in &self.members {
            surface.apply(*id, attrs)?;
        }
        Ok(())
    }

    /// Transition to `attrs` on the scheduler's clock.
    ///
    /// Without a positional change this is [`attr`](Self::attr). Hiding is
    /// held back until the movement finishes; every other non-positional
    /// field is written straight away.
    pub fn animate(
        &self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
        attrs: &Attributes,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        if self.members.is_empty() {
            return Ok(());
        }
        if !attrs.has_positional_delta() || !scheduler.enabled() {
            return self.attr(surface, scheduler, attrs);
        }
        let target_y = attrs.y.map(|v| finite("y", v)).transpose()?;
        let target_h = attrs.height.map(|v| finite("height", v)).transpose()?;

        let changed = |target: Option<f64>, current: Option<f64>| match (
            target, current,
        ) {
            (Some(to), Some(from)) if to != from => Some((from, to)),
            _ => None,
        };
        let y = changed(target_y, self.current_y(surface));
        let height = changed(target_h, self.current_height(surface));
        if y.is_none() && height.is_none() {
            return self.attr(surface, scheduler, attrs);
        }

        let _ = scheduler.cancel(self.id);
        let mut immediate = attrs.without_position();
        let mut on_complete = Attributes::new();
        if immediate.visibility == Some(Visibility::Hidden) {
            immediate.visibility = None;
            on_complete.visibility = Some(Visibility::Hidden);
        }
        // Positional targets that are not animated are written directly.
        if y.is_none() {
            immediate.y = target_y;
        }
        if height.is_none() {
            immediate.height = target_h;
        }
        self.write(surface, &immediate)?;

        let magnitude = y
            .map_or(0.0, |(from, to)| (to - from).abs())
            .max(height.map_or(0.0, |(from, to)| (to - from).abs()))
            * surface.resolution();
        let mut task = AnimationTask::new(
            self.id,
            surface.id(),
            self.members.clone(),
            scheduler.steps_for(magnitude),
        )
        .with_easing(scheduler.easing())
        .on_complete(on_complete);
        if let Some((from, to)) = y {
            task = task.with_y(from, to);
        }
        if let Some((from, to)) = height {
            task = task.with_height(from, to);
        }
        scheduler.schedule(task, now);
        Ok(())
    }

    /// `Visible` if at least one member is visible.
    #[must_use]
    pub fn visibility(&self, surface: &Surface) -> Visibility {
        let any = self
            .members
            .iter()
            .filter_map(|id| surface.get(*id))
            .any(|p| p.visibility == Visibility::Visible);
        if any {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    /// Hide every member.
    pub fn hide(
        &self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
    ) -> Result<(), SeqViewError> {
        self.attr(
            surface,
            scheduler,
            &Attributes::new().visibility(Visibility::Hidden),
        )
    }

    /// Show every member.
    pub fn show(
        &self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
    ) -> Result<(), SeqViewError> {
        self.attr(
            surface,
            scheduler,
            &Attributes::new().visibility(Visibility::Visible),
        )
    }

    /// Remove every member (and tracer) from the surface and cancel any
    /// pending animation.
    pub fn remove_from(
        &mut self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
    ) {
        let _ = scheduler.cancel(self.id);
        for id in self.members.drain(..) {
            surface.remove(id);
        }
        if let Some(tracers) = self.tracers.as_deref_mut() {
            tracers.remove_from(surface, scheduler);
        }
        self.tracers = None;
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::options::AnimationOptions;

    fn fixture() -> (Surface, AnimationScheduler, PrimitiveSet) {
        let mut surface = Surface::new(1.0);
        let a = surface.rect(0.0, 0.0, 10.0, 2.0);
        let b = surface.path("M 0 0 L 10 0 L 10 2 Z");
        let _ = surface.attach(a);
        let _ = surface.attach(b);
        let scheduler = AnimationScheduler::new(&AnimationOptions::default());
        (surface, scheduler, PrimitiveSet::from_members([a, b]))
    }

    fn run(surface: &mut Surface, scheduler: &mut AnimationScheduler, start: Instant) {
        let mut now = start;
        for _ in 0..100 {
            now += Duration::from_millis(20);
            let _ = scheduler.tick(now, &mut [&mut *surface]);
            if !scheduler.is_running() {
                break;
            }
        }
    }

    #[test]
    fn test_attr_moves_every_kind() {
        let (mut surface, mut scheduler, set) = fixture();
        set.attr(&mut surface, &mut scheduler, &Attributes::new().y(7.0))
            .unwrap();
        for id in set.members() {
            assert_eq!(surface.get(*id).unwrap().logical_y(1.0), Some(7.0));
        }
    }

    #[test]
    fn test_animate_converges_to_target() {
        let (mut surface, mut scheduler, set) = fixture();
        let t0 = Instant::now();
        set.animate(&mut surface, &mut scheduler, &Attributes::new().y(100.0), t0)
            .unwrap();
        assert!(scheduler.has_task_for(set.id()));
        assert_eq!(set.current_y(&surface), Some(0.0));

        run(&mut surface, &mut scheduler, t0);
        assert!(!scheduler.has_task_for(set.id()));
        for id in set.members() {
            assert_eq!(surface.get(*id).unwrap().logical_y(1.0), Some(100.0));
        }
    }

    #[test]
    fn test_animate_to_current_position_writes_directly() {
        let (mut surface, mut scheduler, set) = fixture();
        set.animate(
            &mut surface,
            &mut scheduler,
            &Attributes::new().y(0.0).opacity(0.5),
            Instant::now(),
        )
        .unwrap();
        assert!(!scheduler.is_running());
        assert_eq!(surface.get(set.members()[0]).unwrap().opacity, 0.5);
    }

    #[test]
    fn test_animate_empty_set_is_a_no_op() {
        let (mut surface, mut scheduler, _) = fixture();
        let empty = PrimitiveSet::new();
        empty
            .animate(&mut surface, &mut scheduler, &Attributes::new().y(5.0), Instant::now())
            .unwrap();
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn test_hide_is_deferred_until_movement_ends() {
        let (mut surface, mut scheduler, set) = fixture();
        let t0 = Instant::now();
        let attrs = Attributes::new().y(50.0).visibility(Visibility::Hidden);
        set.animate(&mut surface, &mut scheduler, &attrs, t0).unwrap();
        assert_eq!(set.visibility(&surface), Visibility::Visible);
        run(&mut surface, &mut scheduler, t0);
        assert_eq!(set.visibility(&surface), Visibility::Hidden);
    }

    #[test]
    fn test_direct_write_cancels_animation() {
        let (mut surface, mut scheduler, set) = fixture();
        let t0 = Instant::now();
        set.animate(&mut surface, &mut scheduler, &Attributes::new().y(100.0), t0)
            .unwrap();
        set.attr(&mut surface, &mut scheduler, &Attributes::new().y(3.0))
            .unwrap();
        assert!(!scheduler.has_task_for(set.id()));
        run(&mut surface, &mut scheduler, t0);
        assert_eq!(set.current_y(&surface), Some(3.0));
    }

    #[test]
    fn test_visibility_is_any_member() {
        let (mut surface, mut scheduler, set) = fixture();
        surface
            .apply(set.members()[0], &Attributes::new().visibility(Visibility::Hidden))
            .unwrap();
        assert_eq!(set.visibility(&surface), Visibility::Visible);
        set.hide(&mut surface, &mut scheduler).unwrap();
        assert_eq!(set.visibility(&surface), Visibility::Hidden);
        set.show(&mut surface, &mut scheduler).unwrap();
        assert_eq!(set.visibility(&surface), Visibility::Visible);
        assert_eq!(PrimitiveSet::new().visibility(&surface), Visibility::Hidden);
    }

    #[test]
    fn test_non_finite_target_is_rejected() {
        let (mut surface, mut scheduler, set) = fixture();
        let err = set
            .animate(
                &mut surface,
                &mut scheduler,
                &Attributes::new().y(f64::INFINITY),
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, SeqViewError::MalformedCoordinate { .. }));
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn test_remove_from_clears_members_and_tracers() {
        let (mut surface, mut scheduler, mut set) = fixture();
        let tracer = surface.rect(0.0, 0.0, 1.0, 1.0);
        set.set_tracers(Some(PrimitiveSet::from_members([tracer])));
        let first = set.members()[0];
        set.remove_from(&mut surface, &mut scheduler);
        assert!(set.is_empty());
        assert!(set.tracers().is_none());
        assert!(surface.get(first).is_none());
        assert!(surface.get(tracer).is_none());
    }
}
