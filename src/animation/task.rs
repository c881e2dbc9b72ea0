//! A single stepped attribute transition bound to one primitive set.

use super::scheduler::AnimationSurface;
use crate::error::SeqViewError;
use crate::scene::{Attributes, PrimitiveId, SetId, SurfaceId};
use crate::util::easing::Easing;

/// Whether a task is still in flight after being advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// More steps remain.
    Running,
    /// Target reached; the task should be dropped.
    Finished,
}

/// One animated channel: start and end values in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Channel {
    from: f64,
    to: f64,
}

impl Channel {
    /// Value at eased progress `t`, clamped so it never passes `to`.
    /// The flag reports whether the target was reached.
    fn sample(self, t: f64) -> (f64, bool) {
        let value = self.from + (self.to - self.from) * t;
        let reached = if self.to > self.from {
            value >= self.to
        } else if self.to < self.from {
            value <= self.to
        } else {
            false
        };
        if reached {
            (self.to, true)
        } else {
            (value, false)
        }
    }
}

/// A pending transition of a set's vertical position and/or height.
///
/// The scheduler holds tasks, not sets: a task only keeps the handles of
/// the members it moves, so removing a set's primitives simply turns the
/// remaining steps into no-ops.
#[derive(Debug, Clone)]
pub struct AnimationTask {
    set: SetId,
    surface: SurfaceId,
    members: Vec<PrimitiveId>,
    y: Option<Channel>,
    height: Option<Channel>,
    steps: u32,
    step: u32,
    pub(crate) last_step: u64,
    easing: Easing,
    on_complete: Attributes,
}

impl AnimationTask {
    /// Task moving `members` of `set` over `steps` ticks.
    #[must_use]
    pub fn new(
        set: SetId,
        surface: SurfaceId,
        members: Vec<PrimitiveId>,
        steps: u32,
    ) -> Self {
        Self {
            set,
            surface,
            members,
            y: None,
            height: None,
            steps: steps.max(1),
            step: 0,
            last_step: 0,
            easing: Easing::Linear,
            on_complete: Attributes::new(),
        }
    }

    /// Animate the logical top position from `from` to `to`.
    #[must_use]
    pub fn with_y(mut self, from: f64, to: f64) -> Self {
        self.y = Some(Channel { from, to });
        self
    }

    /// Animate the logical height from `from` to `to`.
    #[must_use]
    pub fn with_height(mut self, from: f64, to: f64) -> Self {
        self.height = Some(Channel { from, to });
        self
    }

    /// Interpolation curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Attributes written once the target is reached.
    #[must_use]
    pub fn on_complete(mut self, attrs: Attributes) -> Self {
        self.on_complete = attrs;
        self
    }

    /// The set this task animates.
    #[must_use]
    pub fn set(&self) -> SetId {
        self.set
    }

    /// Surface the members live on.
    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Total number of steps.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Steps applied so far.
    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Advance by `ticks` steps and write the interpolated values.
    ///
    /// Completion is decided by the tracked value, not the step counter:
    /// moving up the task ends once the value is at or above the target,
    /// moving down once it is at or below. A channel with no change ends
    /// when the steps run out.
    pub fn advance(
        &mut self,
        ticks: u64,
        surface: &mut dyn AnimationSurface,
    ) -> Result<TaskState, SeqViewError> {
        if ticks == 0 {
            return Ok(TaskState::Running);
        }
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.step = self.step.saturating_add(ticks).min(self.steps);
        let t = self.easing.at_step(self.step, self.steps);

        let mut attrs = Attributes::new();
        let mut done = self.step >= self.steps;
        if let Some(channel) = self.y {
            let (value, reached) = channel.sample(t);
            attrs.y = Some(value);
            done |= reached;
        }
        if let Some(channel) = self.height {
            let (value, reached) = channel.sample(t);
            attrs.height = Some(value);
            // Height only ends the task when it is the sole channel.
            if self.y.is_none() {
                done |= reached;
            }
        }

        if done {
            if let Some(channel) = self.y {
                attrs.y = Some(channel.to);
            }
            if let Some(channel) = self.height {
                attrs.height = Some(channel.to);
            }
        }

        for id in &self.members {
            surface.apply_attributes(*id, &attrs)?;
        }

        if done {
            for id in &self.members {
                surface.apply_attributes(*id, &self.on_complete)?;
            }
            Ok(TaskState::Finished)
        } else {
            Ok(TaskState::Running)
        }
    }
}
