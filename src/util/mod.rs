//! Shared utilities for the rendering engine.
//!
//! Easing curves for stepped transitions and the tick-cost meter used by
//! the adaptive animation scheduler.

pub mod easing;
/// Smoothed measurement of scheduler tick cost.
pub mod frame_timing;
