//! Animation system for stepped primitive-set transitions.
//!
//! A [`PrimitiveSet`](crate::scene::PrimitiveSet) turns an animated
//! attribute write into an [`AnimationTask`]; the shared
//! [`AnimationScheduler`] steps every task on its own self-tuning clock.

mod clock;
mod scheduler;
mod task;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{
    AnimationScheduler, AnimationSurface, SchedulerEvent, SharedScheduler,
    TickReport,
};
pub use task::{AnimationTask, TaskState};
