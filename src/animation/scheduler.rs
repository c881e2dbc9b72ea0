//! The shared, self-tuning animation clock.
//!
//! One scheduler drives every in-flight [`AnimationTask`] across all
//! participating surfaces. It is idle until the first task arrives, runs
//! while any task remains and returns to idle on its own. Each tick
//! advances tasks by the number of periods of *real* time that elapsed, so
//! a slow host and a fast host finish the same transition in the same wall
//! clock time; the host only changes how many intermediate frames it sees.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use web_time::{Duration, Instant};

use super::clock::{Clock, SystemClock};
use super::task::{AnimationTask, TaskState};
use crate::error::SeqViewError;
use crate::options::AnimationOptions;
use crate::scene::{Attributes, PrimitiveId, SetId, Surface, SurfaceId};
use crate::util::easing::Easing;
use crate::util::frame_timing::TickTiming;

/// Scheduler handle shared by every component that requests transitions.
pub type SharedScheduler = Rc<RefCell<AnimationScheduler>>;

/// What the scheduler needs from a drawing surface.
pub trait AnimationSurface {
    /// Identity used to match tasks to surfaces.
    fn surface_id(&self) -> SurfaceId;
    /// Batch the writes of one tick.
    fn suspend_redraw(&mut self);
    /// End the batch started by [`suspend_redraw`](Self::suspend_redraw).
    fn resume_redraw(&mut self);
    /// A burst of animation started.
    fn animation_began(&mut self);
    /// The last task finished.
    fn animation_ended(&mut self);
    /// Write logical attributes to one primitive.
    fn apply_attributes(
        &mut self,
        id: PrimitiveId,
        attrs: &Attributes,
    ) -> Result<(), SeqViewError>;
}

impl AnimationSurface for Surface {
    fn surface_id(&self) -> SurfaceId {
        self.id()
    }

    fn suspend_redraw(&mut self) {
        Surface::suspend_redraw(self);
    }

    fn resume_redraw(&mut self) {
        Surface::resume_redraw(self);
    }

    fn animation_began(&mut self) {
        self.set_animating(true);
    }

    fn animation_ended(&mut self) {
        self.set_animating(false);
    }

    fn apply_attributes(
        &mut self,
        id: PrimitiveId,
        attrs: &Attributes,
    ) -> Result<(), SeqViewError> {
        self.apply(id, attrs)
    }
}

/// Lifecycle notifications, drained by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Idle to running.
    Began,
    /// Running to idle.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
}

/// Outcome of one [`AnimationScheduler::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Whether any task was stepped.
    pub stepped: bool,
    /// Tasks advanced this tick.
    pub advanced: usize,
    /// Tasks that reached their target.
    pub finished: usize,
    /// Tasks dropped because a write failed.
    pub failed: usize,
}

/// Adaptive-rate scheduler for primitive-set transitions.
pub struct AnimationScheduler {
    clock: Box<dyn Clock>,
    nominal_period: Duration,
    period: Duration,
    slowdown_factor: f64,
    max_steps: u32,
    easing: Easing,
    enabled: bool,

    tasks: Vec<AnimationTask>,
    surfaces: FxHashSet<SurfaceId>,
    state: State,
    announced: FxHashSet<SurfaceId>,
    step_id: u64,
    carry: Duration,
    last_tick: Option<Instant>,
    slowed_this_burst: bool,
    timing: TickTiming,
    events: Vec<SchedulerEvent>,
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("period", &self.period)
            .field("tasks", &self.tasks.len())
            .field("state", &self.state)
            .field("step_id", &self.step_id)
            .finish_non_exhaustive()
    }
}

impl AnimationScheduler {
    /// Scheduler measuring tick cost with the system clock.
    #[must_use]
    pub fn new(options: &AnimationOptions) -> Self {
        Self::with_clock(options, Box::new(SystemClock))
    }

    /// Scheduler measuring tick cost with `clock`.
    #[must_use]
    pub fn with_clock(options: &AnimationOptions, clock: Box<dyn Clock>) -> Self {
        let period = options.tick_period();
        Self {
            clock,
            nominal_period: period,
            period,
            slowdown_factor: options.slowdown_factor.max(1.0),
            max_steps: options.max_steps.max(1),
            easing: options.easing,
            enabled: options.enabled,
            tasks: Vec::new(),
            surfaces: FxHashSet::default(),
            state: State::Idle,
            announced: FxHashSet::default(),
            step_id: 0,
            carry: Duration::ZERO,
            last_tick: None,
            slowed_this_burst: false,
            timing: TickTiming::new(),
            events: Vec::new(),
        }
    }

    /// Wrap in the shared handle.
    #[must_use]
    pub fn shared(self) -> SharedScheduler {
        Rc::new(RefCell::new(self))
    }

    /// Add a surface to the set notified on begin/end.
    pub fn register_surface(&mut self, surface: SurfaceId) {
        let _ = self.surfaces.insert(surface);
    }

    /// Remove a surface and drop its tasks.
    pub fn unregister_surface(&mut self, surface: SurfaceId) {
        let _ = self.surfaces.remove(&surface);
        let _ = self.announced.remove(&surface);
        self.tasks.retain(|t| t.surface() != surface);
    }

    /// Whether `surface` participates.
    #[must_use]
    pub fn is_registered(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains(&surface)
    }

    /// Whether transitions animate at all.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Curve new tasks use.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Current tick period, including any slowdown.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Period configured at construction.
    #[must_use]
    pub fn nominal_period(&self) -> Duration {
        self.nominal_period
    }

    /// Tick cost measurements.
    #[must_use]
    pub fn timing(&self) -> &TickTiming {
        &self.timing
    }

    /// Number of steps for a change of `magnitude` scaled units: coarser
    /// periods give fewer, larger steps.
    #[must_use]
    pub fn steps_for(&self, magnitude: f64) -> u32 {
        let period_ms = self.period.as_secs_f64() * 1000.0;
        if !magnitude.is_finite() || period_ms <= 0.0 {
            return 1;
        }
        let steps = (magnitude.abs() / period_ms).ceil();
        // Saturating float-to-int cast; clamped right after.
        (steps as u32).clamp(1, self.max_steps)
    }

    /// Enter the running state if idle.
    pub fn start(&mut self, now: Instant) {
        if self.state == State::Running {
            return;
        }
        log::debug!("animation scheduler started, period {:?}", self.period);
        self.state = State::Running;
        self.step_id = 0;
        self.carry = Duration::ZERO;
        self.last_tick = Some(now);
        self.events.push(SchedulerEvent::Began);
    }

    /// Queue a task, superseding any task already targeting the same set.
    pub fn schedule(&mut self, mut task: AnimationTask, now: Instant) {
        let _ = self.cancel(task.set());
        self.register_surface(task.surface());
        self.start(now);
        task.last_step = self.step_id;
        self.tasks.push(task);
    }

    /// Drop the task targeting `set`. Returns whether one existed.
    pub fn cancel(&mut self, set: SetId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.set() != set);
        before != self.tasks.len()
    }

    /// Drop every task, whichever surface it draws on, and return to idle.
    pub fn stop(&mut self, surfaces: &mut [&mut dyn AnimationSurface]) {
        self.tasks.clear();
        if self.state == State::Running {
            self.finish_burst(surfaces);
        }
    }

    /// Drop every task drawing on `surfaces`. Tasks on other surfaces keep
    /// running; the burst ends only when none are left.
    pub fn cancel_surfaces(
        &mut self,
        surfaces: &mut [&mut dyn AnimationSurface],
    ) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| {
            !surfaces.iter().any(|s| s.surface_id() == t.surface())
        });
        if self.state == State::Running && self.tasks.is_empty() {
            self.finish_burst(surfaces);
        }
        before - self.tasks.len()
    }

    /// Whether a burst is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Number of in-flight tasks.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether `set` has an in-flight task.
    #[must_use]
    pub fn has_task_for(&self, set: SetId) -> bool {
        self.tasks.iter().any(|t| t.set() == set)
    }

    /// When the next step is due, if running.
    #[must_use]
    pub fn next_tick_at(&self) -> Option<Instant> {
        match self.state {
            State::Running => self.last_tick.map(|t| t + self.period),
            State::Idle => None,
        }
    }

    /// Take queued lifecycle notifications.
    pub fn drain_events(&mut self) -> Vec<SchedulerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance every task whose surface is in `surfaces`.
    ///
    /// The shared step count moves once per elapsed period, on whichever
    /// call observes it first. Each task is then brought up to that count
    /// when its surface is passed, so several owners ticking the same
    /// scheduler at the same deadline all advance. Tasks whose surface was
    /// not passed keep their step and catch up on a later call.
    pub fn tick(
        &mut self,
        now: Instant,
        surfaces: &mut [&mut dyn AnimationSurface],
    ) -> TickReport {
        let mut report = TickReport::default();
        if self.state == State::Idle {
            self.announce_ended(surfaces);
            return report;
        }
        if self.tasks.is_empty() {
            self.finish_burst(surfaces);
            return report;
        }
        for surface in surfaces.iter_mut() {
            let id = surface.surface_id();
            if self.surfaces.contains(&id) && self.announced.insert(id) {
                surface.animation_began();
            }
        }

        let last = self.last_tick.unwrap_or(now);
        let elapsed = now.saturating_duration_since(last) + self.carry;
        if elapsed >= self.period {
            let periods = elapsed.as_nanos() / self.period.as_nanos().max(1);
            let periods = u64::try_from(periods).unwrap_or(u64::MAX);
            self.carry = elapsed.saturating_sub(
                self.period
                    .saturating_mul(u32::try_from(periods).unwrap_or(u32::MAX)),
            );
            self.last_tick = Some(now);
            self.step_id = self.step_id.saturating_add(periods);
        }
        let step_id = self.step_id;
        let passed = |surface: SurfaceId| {
            surfaces.iter().any(|s| s.surface_id() == surface)
        };
        let due = self
            .tasks
            .iter()
            .any(|t| t.last_step < step_id && passed(t.surface()));
        if !due {
            return report;
        }
        report.stepped = true;

        let started = self.clock.now();
        for surface in surfaces.iter_mut() {
            surface.suspend_redraw();
        }

        // Finished tasks are marked during iteration and removed after.
        let mut keep = vec![true; self.tasks.len()];
        for (task, keep) in self.tasks.iter_mut().zip(keep.iter_mut()) {
            let Some(surface) = surfaces
                .iter_mut()
                .find(|s| s.surface_id() == task.surface())
            else {
                continue;
            };
            let ticks = self.step_id - task.last_step;
            if ticks == 0 {
                continue;
            }
            task.last_step = self.step_id;
            report.advanced += 1;
            match task.advance(ticks, &mut **surface) {
                Ok(TaskState::Running) => {}
                Ok(TaskState::Finished) => {
                    report.finished += 1;
                    *keep = false;
                }
                Err(e) => {
                    log::error!("animation task for {:?} failed: {e}", task.set());
                    report.failed += 1;
                    *keep = false;
                }
            }
        }
        let mut flags = keep.into_iter();
        self.tasks.retain(|_| flags.next().unwrap_or(true));

        for surface in surfaces.iter_mut() {
            surface.resume_redraw();
        }

        let cost = self.clock.now().saturating_duration_since(started);
        self.timing.record(cost);
        if cost > self.period && !self.slowed_this_burst {
            self.period = self.period.mul_f64(self.slowdown_factor);
            self.slowed_this_burst = true;
            log::debug!(
                "tick took {cost:?}, slowing animation period to {:?}",
                self.period
            );
        }

        if self.tasks.is_empty() {
            self.finish_burst(surfaces);
        }
        report
    }

    fn finish_burst(&mut self, surfaces: &mut [&mut dyn AnimationSurface]) {
        self.state = State::Idle;
        self.last_tick = None;
        self.carry = Duration::ZERO;
        self.slowed_this_burst = false;
        self.announce_ended(surfaces);
        self.events.push(SchedulerEvent::Ended);
        log::debug!("animation scheduler stopped after {} steps", self.step_id);
    }

    /// Surfaces told about a burst hear about its end on their next call.
    fn announce_ended(&mut self, surfaces: &mut [&mut dyn AnimationSurface]) {
        for surface in surfaces.iter_mut() {
            if self.announced.remove(&surface.surface_id()) {
                surface.animation_ended();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clock::ManualClock;

    /// Records calls; optionally burns manual-clock time per write.
    struct FakeSurface {
        id: SurfaceId,
        inner: Surface,
        clock: Option<(ManualClock, Duration)>,
        suspended: u32,
        resumed: u32,
        began: u32,
        ended: u32,
    }

    impl FakeSurface {
        fn new() -> Self {
            let inner = Surface::new(1.0);
            Self {
                id: inner.id(),
                inner,
                clock: None,
                suspended: 0,
                resumed: 0,
                began: 0,
                ended: 0,
            }
        }
    }

    impl AnimationSurface for FakeSurface {
        fn surface_id(&self) -> SurfaceId {
            self.id
        }
        fn suspend_redraw(&mut self) {
            self.suspended += 1;
        }
        fn resume_redraw(&mut self) {
            self.resumed += 1;
        }
        fn animation_began(&mut self) {
            self.began += 1;
        }
        fn animation_ended(&mut self) {
            self.ended += 1;
        }
        fn apply_attributes(
            &mut self,
            id: PrimitiveId,
            attrs: &Attributes,
        ) -> Result<(), SeqViewError> {
            if let Some((clock, cost)) = &self.clock {
                clock.advance(*cost);
            }
            self.inner.apply(id, attrs)
        }
    }

    fn scheduler(clock: &ManualClock) -> AnimationScheduler {
        AnimationScheduler::with_clock(
            &AnimationOptions::default(),
            Box::new(clock.clone()),
        )
    }

    fn task_on(surface: &mut FakeSurface, steps: u32) -> (PrimitiveId, AnimationTask) {
        let r = surface.inner.rect(0.0, 0.0, 1.0, 1.0);
        let _ = surface.inner.attach(r);
        let task = AnimationTask::new(SetId::next(), surface.id, vec![r], steps)
            .with_y(0.0, 100.0);
        (r, task)
    }

    #[test]
    fn test_steps_scale_with_period() {
        let clock = ManualClock::new();
        let s = scheduler(&clock);
        assert_eq!(s.steps_for(0.0), 1);
        assert_eq!(s.steps_for(100.0), 5);
        assert_eq!(s.steps_for(-100.0), 5);
        assert_eq!(s.steps_for(1.0e9), 40);
        assert_eq!(s.steps_for(f64::NAN), 1);
    }

    #[test]
    fn test_lifecycle_idle_running_idle() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let (r, task) = task_on(&mut fake, 4);
        let t0 = clock.now();

        s.schedule(task, t0);
        assert!(s.is_running());
        assert_eq!(s.drain_events(), vec![SchedulerEvent::Began]);

        let mut now = t0;
        for _ in 0..10 {
            now += Duration::from_millis(20);
            let _ = s.tick(now, &mut [&mut fake]);
        }
        assert!(!s.is_running());
        assert_eq!(s.task_count(), 0);
        assert_eq!(s.drain_events(), vec![SchedulerEvent::Ended]);
        assert_eq!((fake.began, fake.ended), (1, 1));
        assert_eq!(fake.suspended, fake.resumed);
        assert_eq!(fake.inner.get(r).unwrap().logical_y(1.0), Some(100.0));
    }

    #[test]
    fn test_tick_before_period_is_a_no_op() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let (_, task) = task_on(&mut fake, 4);
        let t0 = clock.now();
        s.schedule(task, t0);
        let report = s.tick(t0 + Duration::from_millis(5), &mut [&mut fake]);
        assert!(!report.stepped);
        assert_eq!(fake.suspended, 0);
    }

    #[test]
    fn test_elapsed_time_drives_steps() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let (r, task) = task_on(&mut fake, 10);
        let t0 = clock.now();
        s.schedule(task, t0);

        // One late tick covering five periods moves five steps.
        let report = s.tick(t0 + Duration::from_millis(100), &mut [&mut fake]);
        assert_eq!(report.advanced, 1);
        assert_eq!(fake.inner.get(r).unwrap().logical_y(1.0), Some(50.0));
    }

    #[test]
    fn test_slow_ticks_raise_period_once_per_burst() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        fake.clock = Some((clock.clone(), Duration::from_millis(50)));
        let (_, task) = task_on(&mut fake, 40);
        let t0 = clock.now();
        s.schedule(task, t0);

        let mut now = t0;
        for _ in 0..3 {
            now += Duration::from_millis(100);
            let _ = s.tick(now, &mut [&mut fake]);
        }
        assert_eq!(s.period(), Duration::from_millis(30));
        assert!(s.timing().last() >= Duration::from_millis(50));
    }

    #[test]
    fn test_new_schedule_supersedes_same_set() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let (r, task) = task_on(&mut fake, 4);
        let set = task.set();
        let t0 = clock.now();
        s.schedule(task, t0);
        let replacement = AnimationTask::new(set, fake.id, vec![r], 2).with_y(0.0, 10.0);
        s.schedule(replacement, t0);
        assert_eq!(s.task_count(), 1);

        let _ = s.tick(t0 + Duration::from_millis(60), &mut [&mut fake]);
        assert_eq!(fake.inner.get(r).unwrap().logical_y(1.0), Some(10.0));
    }

    #[test]
    fn test_cancel_last_task_ends_burst_on_next_tick() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let (_, task) = task_on(&mut fake, 4);
        let set = task.set();
        let t0 = clock.now();
        s.schedule(task, t0);
        assert!(s.cancel(set));
        assert!(!s.has_task_for(set));
        let _ = s.tick(t0 + Duration::from_millis(20), &mut [&mut fake]);
        assert!(!s.is_running());
    }

    #[test]
    fn test_failed_write_drops_task() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let p = fake.inner.path("Q 1 1 2 2");
        let task = AnimationTask::new(SetId::next(), fake.id, vec![p], 2).with_y(0.0, 5.0);
        let t0 = clock.now();
        s.schedule(task, t0);
        let report = s.tick(t0 + Duration::from_millis(20), &mut [&mut fake]);
        assert_eq!(report.failed, 1);
        assert_eq!(s.task_count(), 0);
        assert!(!s.is_running());
    }

    #[test]
    fn test_tasks_for_absent_surfaces_wait() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut fake = FakeSurface::new();
        let mut other = FakeSurface::new();
        let (_, task) = task_on(&mut fake, 4);
        let t0 = clock.now();
        s.schedule(task, t0);
        let report = s.tick(t0 + Duration::from_millis(20), &mut [&mut other]);
        assert_eq!(report.advanced, 0);
        assert_eq!(s.task_count(), 1);
    }

    #[test]
    fn test_owners_ticking_same_deadline_all_advance() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut a = FakeSurface::new();
        let mut b = FakeSurface::new();
        let (ra, task_a) = task_on(&mut a, 5);
        let (rb, task_b) = task_on(&mut b, 5);
        let t0 = clock.now();
        s.schedule(task_a, t0);
        s.schedule(task_b, t0);

        let mut now = t0;
        for _ in 0..2 {
            now += Duration::from_millis(20);
            let first = s.tick(now, &mut [&mut a]);
            let second = s.tick(now, &mut [&mut b]);
            assert_eq!((first.advanced, second.advanced), (1, 1));
        }
        let y = |f: &FakeSurface, r: PrimitiveId| {
            f.inner.get(r).unwrap().logical_y(1.0)
        };
        assert_eq!(y(&a, ra), Some(40.0));
        assert_eq!(y(&b, rb), Some(40.0));

        // A repeated call within the same period is a no-op.
        assert!(!s.tick(now, &mut [&mut a]).stepped);

        for _ in 0..3 {
            now += Duration::from_millis(20);
            let _ = s.tick(now, &mut [&mut a]);
            let _ = s.tick(now, &mut [&mut b]);
        }
        assert_eq!(y(&a, ra), Some(100.0));
        assert_eq!(y(&b, rb), Some(100.0));
        assert!(!s.is_running());
        assert_eq!((b.began, b.ended), (1, 1));
        // `a` hears about the end on its next call.
        assert_eq!(a.ended, 0);
        let _ = s.tick(now, &mut [&mut a]);
        assert_eq!((a.began, a.ended), (1, 1));
    }

    #[test]
    fn test_late_owner_catches_up_on_elapsed_steps() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut a = FakeSurface::new();
        let mut b = FakeSurface::new();
        let (_, task_a) = task_on(&mut a, 10);
        let (rb, task_b) = task_on(&mut b, 10);
        let t0 = clock.now();
        s.schedule(task_a, t0);
        s.schedule(task_b, t0);

        let mut now = t0;
        for _ in 0..3 {
            now += Duration::from_millis(20);
            let _ = s.tick(now, &mut [&mut a]);
        }
        let report = s.tick(now, &mut [&mut b]);
        assert!(report.stepped);
        assert_eq!(b.inner.get(rb).unwrap().logical_y(1.0), Some(30.0));
    }

    #[test]
    fn test_cancel_surfaces_keeps_other_owners_running() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut a = FakeSurface::new();
        let mut b = FakeSurface::new();
        let (ra, task_a) = task_on(&mut a, 4);
        let (_, task_b) = task_on(&mut b, 4);
        let t0 = clock.now();
        s.schedule(task_a, t0);
        s.schedule(task_b, t0);
        let _ = s.drain_events();

        assert_eq!(s.cancel_surfaces(&mut [&mut b]), 1);
        assert!(s.is_running());
        assert_eq!(s.task_count(), 1);
        assert!(s.drain_events().is_empty());

        let mut now = t0;
        for _ in 0..4 {
            now += Duration::from_millis(20);
            let _ = s.tick(now, &mut [&mut a]);
        }
        assert_eq!(a.inner.get(ra).unwrap().logical_y(1.0), Some(100.0));
        assert_eq!(s.drain_events(), vec![SchedulerEvent::Ended]);
    }

    #[test]
    fn test_cancelling_last_owner_ends_burst() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut a = FakeSurface::new();
        let (_, task) = task_on(&mut a, 4);
        let t0 = clock.now();
        s.schedule(task, t0);
        let _ = s.tick(t0 + Duration::from_millis(20), &mut [&mut a]);

        assert_eq!(s.cancel_surfaces(&mut [&mut a]), 1);
        assert!(!s.is_running());
        assert_eq!((a.began, a.ended), (1, 1));
    }

    #[test]
    fn test_stop_drops_every_task() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut a = FakeSurface::new();
        let mut b = FakeSurface::new();
        let (_, task_a) = task_on(&mut a, 4);
        let (_, task_b) = task_on(&mut b, 4);
        let t0 = clock.now();
        s.schedule(task_a, t0);
        s.schedule(task_b, t0);
        s.stop(&mut [&mut a]);
        assert_eq!(s.task_count(), 0);
        assert!(!s.is_running());
    }
}
