//! Drag-and-drop reordering of navigation rows.
//!
//! Dragging never touches the track order until release. Hovering a
//! compatible row for the settle delay plays a stepped preview of the rows
//! making room; only a finished preview arms the splice that release
//! commits.

use glam::DVec2;
use web_time::Instant;

use super::session::{DragSession, DragState, HoverTarget, Preview};
use crate::animation::AnimationScheduler;
use crate::error::SeqViewError;
use crate::layout::{NavRow, TrackLayout};
use crate::options::DragOptions;
use crate::registry::TrackId;

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag was in progress.
    Ignored,
    /// Released without an armed splice; the order is unchanged.
    Cancelled,
    /// The order changed.
    Committed {
        /// Ids moved, in their new relative order.
        moved: Vec<TrackId>,
        /// The track they now precede; `None` when appended (and switched
        /// off).
        before: Option<TrackId>,
    },
}

/// Gesture state machine for reordering tracks.
#[derive(Debug, Clone)]
pub struct DragEngine {
    options: DragOptions,
    session: Option<DragSession>,
}

/// Group a row competes within when reordering. A controller stands for
/// its whole group among the ungrouped tracks; members only swap with
/// siblings.
fn drop_group(row: &NavRow) -> Option<&TrackId> {
    if row.is_controller() {
        None
    } else {
        row.group()
    }
}

/// The dragged track plus, for a controller, its group's members in
/// current order.
fn moving_block(layout: &TrackLayout, track: &TrackId) -> Vec<TrackId> {
    let nav = layout.navigation();
    let mut block = vec![track.clone()];
    if nav.row(track).is_some_and(|row| row.is_controller()) {
        block.extend(
            layout
                .order()
                .iter()
                .filter(|id| *id != track)
                .filter(|id| nav.row(id).is_some_and(|row| row.group() == Some(track)))
                .cloned(),
        );
    }
    block
}

/// Rows displaced by moving the dragged block to `target`, with the
/// vertical shift each one previews.
fn shift_set(
    layout: &TrackLayout,
    track: &TrackId,
    target: &HoverTarget,
) -> Vec<(TrackId, f64)> {
    let nav = layout.navigation();
    let block = moving_block(layout, track);
    let height: f64 = block
        .iter()
        .filter_map(|id| nav.row(id))
        .filter(|row| row.visible())
        .map(|row| row.height())
        .sum();
    let visible: Vec<&TrackId> = layout
        .order()
        .iter()
        .filter(|id| nav.row(id).is_some_and(|row| row.visible()))
        .collect();
    let Some(from) = visible.iter().position(|id| *id == track) else {
        return Vec::new();
    };
    let (range, dy) = match target {
        HoverTarget::Track(t) => match visible.iter().position(|id| *id == t) {
            Some(to) if to < from => (to..from, height),
            Some(to) => (from + 1..to, -height),
            None => return Vec::new(),
        },
        HoverTarget::End => (from + 1..visible.len(), -height),
    };
    visible[range]
        .iter()
        .filter(|id| !block.contains(**id))
        .map(|id| ((*id).clone(), dy))
        .collect()
}

impl DragEngine {
    /// Idle engine.
    #[must_use]
    pub fn new(options: &DragOptions) -> Self {
        Self {
            options: options.clone(),
            session: None,
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Active session.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.session.as_ref().map_or(DragState::Idle, DragSession::state)
    }

    /// Next instant [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let session = self.session.as_ref()?;
        match &session.preview {
            Some(p) if p.step < self.options.preview_steps.max(1) => Some(p.next_at),
            Some(_) => None,
            None => session.hover_since.map(|t| t + self.options.hover_settle()),
        }
    }

    /// Start dragging `track` from `screen`. Refused while another drag is
    /// active or when the track has no visible row.
    pub fn pointer_down(
        &mut self,
        layout: &mut TrackLayout,
        scheduler: &mut AnimationScheduler,
        track: &TrackId,
        screen: DVec2,
    ) -> Result<bool, SeqViewError> {
        if let Some(active) = &self.session {
            log::debug!("ignoring drag of '{track}' while '{}' is dragged", active.track);
            return Ok(false);
        }
        if !layout.navigation().row(track).is_some_and(|row| row.visible()) {
            return Ok(false);
        }
        let origin = layout.navigation().to_panel(screen);
        layout
            .navigation_mut()
            .follow_pointer(scheduler, track, DVec2::ZERO)?;
        self.session = Some(DragSession::new(track.clone(), origin));
        Ok(true)
    }

    /// Follow the pointer and track the hover target.
    pub fn pointer_move(
        &mut self,
        layout: &mut TrackLayout,
        scheduler: &mut AnimationScheduler,
        screen: DVec2,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let nav = layout.navigation();
        let point = nav.to_panel(screen);
        let hit = match nav.hit_test(point, Some(&session.track)) {
            Some(id) => Some(HoverTarget::Track(id.clone())),
            None => nav.is_below_rows(point).then_some(HoverTarget::End),
        };
        let block = moving_block(layout, &session.track);
        let group_of = |id: &TrackId| nav.row(id).and_then(drop_group);
        let target = hit.filter(|t| {
            let ok = match t {
                HoverTarget::Track(id) => {
                    !block.contains(id)
                        && group_of(&session.track) == group_of(id)
                }
                HoverTarget::End => true,
            };
            if !ok {
                log::trace!("'{}' cannot be dropped on {t:?}", session.track);
            }
            ok
        });

        layout
            .navigation_mut()
            .follow_pointer(scheduler, &session.track, point - session.origin)?;

        if target != session.hover {
            for id in session.reset_preview() {
                layout.navigation_mut().restore(scheduler, &id)?;
            }
            session.hover_since = target.is_some().then_some(now);
            session.hover = target;
        } else if session.hover.is_some() && session.preview.is_none() {
            session.hover_since = Some(now);
        }
        Ok(())
    }

    /// Advance the hover settle timer and the displacement preview.
    pub fn tick(
        &mut self,
        layout: &mut TrackLayout,
        scheduler: &mut AnimationScheduler,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let steps = self.options.preview_steps.max(1);

        if session.preview.is_none() {
            let (Some(target), Some(since)) = (&session.hover, session.hover_since)
            else {
                return Ok(());
            };
            if now.saturating_duration_since(since) < self.options.hover_settle() {
                return Ok(());
            }
            session.preview = Some(Preview {
                shifts: shift_set(layout, &session.track, target),
                step: 0,
                next_at: now,
            });
        }

        let Some(preview) = session.preview.as_mut() else {
            return Ok(());
        };
        while preview.step < steps && now >= preview.next_at {
            preview.step += 1;
            let k = f64::from(preview.step) / f64::from(steps);
            for (id, dy) in &preview.shifts {
                layout.navigation_mut().displace(scheduler, id, dy * k)?;
            }
            preview.next_at += self.options.preview_step();
        }
        if preview.step >= steps && session.splice_before.is_none() {
            session.splice_before = session.hover.clone();
            session.track_to_splice = Some(session.track.clone());
        }
        Ok(())
    }

    /// Release: commit an armed splice or cancel. Visual state is restored
    /// either way.
    pub fn pointer_up(
        &mut self,
        layout: &mut TrackLayout,
        scheduler: &mut AnimationScheduler,
    ) -> Result<DragOutcome, SeqViewError> {
        let Some(mut session) = self.session.take() else {
            return Ok(DragOutcome::Ignored);
        };
        let splice = session.track_to_splice.take().zip(session.splice_before.take());
        let restored = Self::restore(layout, scheduler, &mut session);

        let outcome = match splice {
            Some((track, target)) => {
                let moved = moving_block(layout, &track);
                let before = match target {
                    HoverTarget::Track(id) => Some(id),
                    HoverTarget::End => None,
                };
                layout.order_mut().splice(&moved, before.as_ref());
                if before.is_none() {
                    for id in &moved {
                        let _ = layout.set_active(id, false);
                    }
                }
                log::debug!("reordered {moved:?} before {before:?}");
                DragOutcome::Committed { moved, before }
            }
            None => DragOutcome::Cancelled,
        };
        restored?;
        Ok(outcome)
    }

    /// Abort the drag without reordering.
    pub fn cancel(
        &mut self,
        layout: &mut TrackLayout,
        scheduler: &mut AnimationScheduler,
    ) -> Result<(), SeqViewError> {
        match self.session.take() {
            Some(mut session) => Self::restore(layout, scheduler, &mut session),
            None => Ok(()),
        }
    }

    fn restore(
        layout: &mut TrackLayout,
        scheduler: &mut AnimationScheduler,
        session: &mut DragSession,
    ) -> Result<(), SeqViewError> {
        let nav = layout.navigation_mut();
        let mut result = nav.restore(scheduler, &session.track);
        for id in session.reset_preview() {
            let restored = nav.restore(scheduler, &id);
            if result.is_ok() {
                result = restored;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::layout::{LayoutPass, TrackOrder};
    use crate::options::{AnimationOptions, LayoutOptions};
    use crate::registry::{MemoryRegistry, TrackInfo, TrackRegistry};
    use crate::scene::Surface;

    struct Fixture {
        surface: Surface,
        scheduler: AnimationScheduler,
        registry: MemoryRegistry,
        layout: TrackLayout,
        drag: DragEngine,
    }

    impl Fixture {
        /// Rows are 10px tall starting at y = 20.
        fn new(order: &[&str]) -> Self {
            let mut registry = MemoryRegistry::new();
            for id in ["a", "b", "c", "x", "g"] {
                registry.register_simple(id, "#888");
            }
            registry.register_group("g");
            for id in ["g1", "g2"] {
                registry.register_track(
                    id,
                    TrackInfo {
                        group: Some("g".into()),
                        ..TrackInfo::default()
                    },
                );
            }
            let options = LayoutOptions {
                track_height: 10.0,
                ..LayoutOptions::default()
            };
            let mut surface = Surface::new(1.0);
            let mut scheduler = AnimationScheduler::new(&AnimationOptions::default());
            let mut layout = TrackLayout::new(&options);
            let root = surface.root();
            let requested: Vec<TrackId> = order.iter().map(|s| TrackId::from(*s)).collect();
            let resolved = TrackOrder::resolve(&requested, &registry);
            for id in resolved.iter() {
                let info = registry.track_info(id).unwrap_or_default();
                let _ = layout.add_track(&mut surface, root, id, &info);
            }
            let _ = layout.set_order(resolved, &mut surface, &mut scheduler).unwrap();
            let mut f = Self {
                surface,
                scheduler,
                registry,
                layout,
                drag: DragEngine::new(&DragOptions::default()),
            };
            f.refresh();
            f
        }

        fn refresh(&mut self) {
            let _ = self
                .layout
                .refresh(LayoutPass {
                    surface: &mut self.surface,
                    scheduler: &mut self.scheduler,
                    registry: &self.registry,
                    zoom: 1.0,
                    sequence_length: 30,
                    animate_from: None,
                })
                .unwrap();
        }

        fn down(&mut self, track: &str, y: f64) -> bool {
            self.drag
                .pointer_down(&mut self.layout, &mut self.scheduler, &track.into(), DVec2::new(50.0, y))
                .unwrap()
        }

        fn move_to(&mut self, y: f64, now: Instant) {
            self.drag
                .pointer_move(&mut self.layout, &mut self.scheduler, DVec2::new(50.0, y), now)
                .unwrap();
        }

        fn tick(&mut self, now: Instant) {
            self.drag
                .tick(&mut self.layout, &mut self.scheduler, now)
                .unwrap();
        }

        fn up(&mut self) -> DragOutcome {
            self.drag
                .pointer_up(&mut self.layout, &mut self.scheduler)
                .unwrap()
        }

        fn order(&self) -> Vec<&str> {
            self.layout.order().iter().map(TrackId::as_str).collect()
        }
    }

    #[test]
    fn test_settled_hover_previews_then_commits() {
        let mut f = Fixture::new(&["a", "b", "c"]);
        let t0 = Instant::now();
        assert!(f.down("c", 45.0));
        assert_eq!(f.drag.state(), DragState::Dragging);

        f.move_to(25.0, t0);
        assert_eq!(f.drag.state(), DragState::HoveringCandidate);
        f.tick(t0 + Duration::from_millis(299));
        assert!(f.drag.session().unwrap().preview.is_none());

        f.tick(t0 + Duration::from_millis(300));
        assert_eq!(f.drag.state(), DragState::HoveringCandidate);
        f.tick(t0 + Duration::from_millis(420));
        assert_eq!(f.drag.state(), DragState::SplicePending);
        // a and b made room for c.
        let a = f.layout.navigation().row_transform(&"a".into()).unwrap();
        assert_eq!(a.translation.y, 30.0);
        assert_eq!(f.order(), vec!["a", "b", "c"]);

        let outcome = f.up();
        assert_eq!(
            outcome,
            DragOutcome::Committed {
                moved: vec!["c".into()],
                before: Some("a".into()),
            }
        );
        assert_eq!(f.order(), vec!["c", "a", "b"]);
        assert!(f.layout.navigation().accepts_pointer(&"c".into()));
        let a = f.layout.navigation().row_transform(&"a".into()).unwrap();
        assert_eq!(a.translation.y, 20.0);
    }

    #[test]
    fn test_release_before_preview_cancels() {
        let mut f = Fixture::new(&["a", "b", "c"]);
        let t0 = Instant::now();
        assert!(f.down("a", 25.0));
        f.move_to(35.0, t0);
        f.tick(t0 + Duration::from_millis(100));
        assert_eq!(f.up(), DragOutcome::Cancelled);
        assert_eq!(f.order(), vec!["a", "b", "c"]);
        let a = f.layout.navigation().row_transform(&"a".into()).unwrap();
        assert_eq!(a.translation.y, 20.0);
        assert!(f.layout.navigation().accepts_pointer(&"a".into()));
        assert_eq!(f.drag.state(), DragState::Idle);
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let mut f = Fixture::new(&["a", "b"]);
        assert!(f.down("a", 25.0));
        assert!(!f.down("b", 35.0));
        assert_eq!(f.drag.session().unwrap().track(), &TrackId::from("a"));
    }

    #[test]
    fn test_cross_group_hover_is_rejected() {
        let mut f = Fixture::new(&["x", "g"]);
        let t0 = Instant::now();
        assert!(f.down("x", 25.0));
        // g1's member row spans 40..50.
        f.move_to(45.0, t0);
        let session = f.drag.session().unwrap();
        assert!(session.hover().is_none());
        assert!(session.hover_since().is_none());
        assert_eq!(f.drag.next_deadline(), None);
        f.tick(t0 + Duration::from_secs(1));
        assert_eq!(f.up(), DragOutcome::Cancelled);
    }

    fn settle_on(f: &mut Fixture, y: f64, t0: Instant) -> DragOutcome {
        f.move_to(y, t0);
        f.tick(t0 + Duration::from_millis(300));
        f.tick(t0 + Duration::from_millis(500));
        f.up()
    }

    #[test]
    fn test_member_cannot_target_its_controller() {
        let mut f = Fixture::new(&["g", "a"]);
        assert_eq!(f.order(), vec!["g", "g1", "g2", "a"]);
        let t0 = Instant::now();
        assert!(f.down("g2", 45.0));
        f.move_to(25.0, t0);
        assert!(f.drag.session().unwrap().hover().is_none());
        assert_eq!(settle_on(&mut f, 25.0, t0), DragOutcome::Cancelled);
        assert_eq!(f.order(), vec!["g", "g1", "g2", "a"]);
    }

    #[test]
    fn test_controller_cannot_target_its_members() {
        let mut f = Fixture::new(&["g", "a"]);
        let t0 = Instant::now();
        assert!(f.down("g", 25.0));
        f.move_to(45.0, t0);
        assert!(f.drag.session().unwrap().hover().is_none());
        assert_eq!(settle_on(&mut f, 45.0, t0), DragOutcome::Cancelled);
        assert_eq!(f.order(), vec!["g", "g1", "g2", "a"]);
        assert!(f.layout.is_active(&"g".into()));
    }

    #[test]
    fn test_members_swap_within_their_group() {
        let mut f = Fixture::new(&["g", "a"]);
        let t0 = Instant::now();
        assert!(f.down("g2", 45.0));
        assert_eq!(
            settle_on(&mut f, 35.0, t0),
            DragOutcome::Committed {
                moved: vec!["g2".into()],
                before: Some("g1".into()),
            }
        );
        assert_eq!(f.order(), vec!["g", "g2", "g1", "a"]);
    }

    #[test]
    fn test_controller_swaps_with_ungrouped_tracks() {
        let mut f = Fixture::new(&["a", "g"]);
        let t0 = Instant::now();
        assert!(f.down("g", 35.0));
        assert_eq!(
            settle_on(&mut f, 25.0, t0),
            DragOutcome::Committed {
                moved: vec!["g".into(), "g1".into(), "g2".into()],
                before: Some("a".into()),
            }
        );
        assert_eq!(f.order(), vec!["g", "g1", "g2", "a"]);
        assert!(f.layout.is_active(&"g".into()));
    }

    #[test]
    fn test_controller_moves_with_its_group() {
        let mut f = Fixture::new(&["a", "b", "g"]);
        assert_eq!(f.order(), vec!["a", "b", "g", "g1", "g2"]);
        let t0 = Instant::now();
        // Dropped below the last row.
        assert!(f.down("g", 45.0));
        f.move_to(200.0, t0);
        f.tick(t0 + Duration::from_millis(300));
        f.tick(t0 + Duration::from_millis(500));
        let outcome = f.up();
        assert_eq!(
            outcome,
            DragOutcome::Committed {
                moved: vec!["g".into(), "g1".into(), "g2".into()],
                before: None,
            }
        );
        assert_eq!(f.order(), vec!["a", "b", "g", "g1", "g2"]);
        assert!(!f.layout.is_active(&"g".into()));
        assert!(!f.layout.is_active(&"g2".into()));
    }

    #[test]
    fn test_movement_restarts_settle_timer() {
        let mut f = Fixture::new(&["a", "b", "c"]);
        let t0 = Instant::now();
        assert!(f.down("c", 45.0));
        f.move_to(25.0, t0);
        f.move_to(26.0, t0 + Duration::from_millis(200));
        f.tick(t0 + Duration::from_millis(400));
        assert!(f.drag.session().unwrap().preview.is_none());
        f.tick(t0 + Duration::from_millis(500));
        assert!(f.drag.session().unwrap().preview.is_some());
    }

    #[test]
    fn test_new_target_discards_preview() {
        let mut f = Fixture::new(&["a", "b", "c"]);
        let t0 = Instant::now();
        assert!(f.down("c", 45.0));
        f.move_to(25.0, t0);
        f.tick(t0 + Duration::from_millis(500));
        assert_eq!(f.drag.state(), DragState::SplicePending);
        f.move_to(200.0, t0 + Duration::from_millis(600));
        assert_eq!(f.drag.state(), DragState::HoveringCandidate);
        assert_eq!(f.drag.session().unwrap().hover(), Some(&HoverTarget::End));
        let a = f.layout.navigation().row_transform(&"a".into()).unwrap();
        assert_eq!(a.translation.y, 20.0);
    }
}
