//! Zoom level, translation and the debounced zoom transition.
//!
//! A zoom request does not immediately change the canonical zoom. It
//! starts (or retargets) a transition that shows as a scale transform
//! anchored on a focal residue. Once requests stop for the settle delay,
//! or a touch gesture ends, the transition is folded into the canonical
//! zoom and translation and a [`ZoomEvent::Changed`] is queued so the
//! layout can reflow.

use glam::{DAffine2, DVec2};
use web_time::Instant;

use super::transform::ViewTransform;
use crate::options::ZoomOptions;

/// Notifications queued by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomEvent {
    /// A transition started, anchored at `focal_residue`.
    TransitionBegan {
        /// Residue kept stationary on screen.
        focal_residue: f64,
    },
    /// The transition settled at `zoom`.
    Changed {
        /// New canonical zoom.
        zoom: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    focal: f64,
    start_zoom: f64,
    start_offset: f64,
    target: f64,
    last_request: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Settled,
    Transitioning(Transition),
}

/// Owns the zoom level and horizontal translation of the view.
#[derive(Debug, Clone)]
pub struct ZoomController {
    options: ZoomOptions,
    zoom: f64,
    offset: f64,
    viewport_width: f64,
    sequence_length: Option<usize>,
    phase: Phase,
    gesture_active: bool,
    events: Vec<ZoomEvent>,
}

impl ZoomController {
    /// Controller at the configured initial zoom.
    #[must_use]
    pub fn new(options: &ZoomOptions) -> Self {
        let mut controller = Self {
            options: options.clone(),
            zoom: options.initial_zoom,
            offset: 0.0,
            viewport_width: options.viewport_width,
            sequence_length: None,
            phase: Phase::Settled,
            gesture_active: false,
            events: Vec::new(),
        };
        controller.zoom = controller.clamp_zoom(options.initial_zoom);
        controller
    }

    /// Lowest permitted zoom for the current sequence and viewport.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        let min = match self.sequence_length {
            Some(len) if len > 0 => {
                self.options.min_zoom_factor * self.viewport_width / len as f64
            }
            _ => self.options.fallback_min_zoom,
        };
        min.min(self.options.max_zoom)
    }

    /// Highest permitted zoom.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.options.max_zoom
    }

    fn clamp_zoom(&self, level: f64) -> f64 {
        level.clamp(self.min_zoom(), self.max_zoom())
    }

    /// Canonical (settled) zoom.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom the view is heading to: the transition target, or the
    /// canonical zoom when settled.
    #[must_use]
    pub fn target_zoom(&self) -> f64 {
        match self.phase {
            Phase::Transitioning(t) => t.target,
            Phase::Settled => self.zoom,
        }
    }

    /// Horizontal translation in pixels.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether a transition is waiting to settle.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning(_))
    }

    /// Settled view mapping.
    #[must_use]
    pub fn view(&self, resolution: f64) -> ViewTransform {
        ViewTransform::new(self.zoom, self.offset, resolution)
    }

    /// Viewport width in pixels.
    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Update the viewport width; re-clamps zoom and translation.
    pub fn set_viewport_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.viewport_width = width;
            self.zoom = self.clamp_zoom(self.zoom);
            self.offset = self.clamp_offset(self.offset, self.zoom);
        }
    }

    /// Set the sequence length the minimum zoom derives from. Drops any
    /// transition in progress and resets the translation.
    pub fn set_sequence_length(&mut self, length: usize) {
        self.sequence_length = (length > 0).then_some(length);
        self.phase = Phase::Settled;
        self.offset = 0.0;
        self.zoom = self.clamp_zoom(self.zoom);
    }

    /// Request a zoom level. The focal residue defaults to the residue
    /// at the viewport centre and is latched for the whole transition.
    ///
    /// Returns the clamped target.
    pub fn set_zoom(
        &mut self,
        level: f64,
        focal_residue: Option<f64>,
        now: Instant,
    ) -> f64 {
        if !level.is_finite() {
            log::warn!("ignoring non-finite zoom request {level}");
            return self.target_zoom();
        }
        let target = self.clamp_zoom(level);
        if target == self.target_zoom() {
            return target;
        }
        match &mut self.phase {
            Phase::Transitioning(t) => {
                t.target = target;
                t.last_request = now;
            }
            Phase::Settled => {
                let focal = focal_residue
                    .filter(|r| r.is_finite())
                    .unwrap_or_else(|| self.center_residue());
                self.phase = Phase::Transitioning(Transition {
                    focal,
                    start_zoom: self.zoom,
                    start_offset: self.offset,
                    target,
                    last_request: now,
                });
                self.events.push(ZoomEvent::TransitionBegan {
                    focal_residue: focal,
                });
                log::debug!("zoom transition to {target} anchored at residue {focal}");
            }
        }
        target
    }

    /// Scale transform for the scene group while a transition is pending,
    /// in scaled scene coordinates.
    #[must_use]
    pub fn transition_transform(&self, resolution: f64) -> Option<DAffine2> {
        let Phase::Transitioning(t) = self.phase else {
            return None;
        };
        let s = t.target / t.start_zoom;
        let anchor = t.focal * resolution;
        Some(
            DAffine2::from_translation(DVec2::new((1.0 - s) * anchor, 0.0))
                * DAffine2::from_scale(DVec2::splat(s)),
        )
    }

    /// Settle the transition once the debounce delay has passed.
    ///
    /// While a touch gesture is active in touch mode the timer is ignored
    /// and [`end_gesture`](Self::end_gesture) settles instead. Returns
    /// whether the zoom changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Phase::Transitioning(t) = self.phase else {
            return false;
        };
        if self.options.touch_mode && self.gesture_active {
            return false;
        }
        if now.saturating_duration_since(t.last_request) < self.options.settle_delay() {
            return false;
        }
        self.settle();
        true
    }

    /// When a pending transition will settle on its own, if it will.
    #[must_use]
    pub fn settle_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Transitioning(_)
                if self.options.touch_mode && self.gesture_active =>
            {
                None
            }
            Phase::Transitioning(t) => Some(t.last_request + self.options.settle_delay()),
            Phase::Settled => None,
        }
    }

    /// A touch gesture started.
    pub fn begin_gesture(&mut self) {
        self.gesture_active = true;
    }

    /// A touch gesture ended; in touch mode this settles immediately.
    /// Returns whether the zoom changed.
    pub fn end_gesture(&mut self) -> bool {
        self.gesture_active = false;
        if self.options.touch_mode && self.is_transitioning() {
            self.settle();
            return true;
        }
        false
    }

    fn settle(&mut self) {
        let Phase::Transitioning(t) = self.phase else {
            return;
        };
        // Keep the focal residue at the same screen x. Not clamped: the
        // next pan brings the view back inside the sequence.
        self.offset = t.start_offset + (t.start_zoom - t.target) * t.focal;
        self.zoom = t.target;
        self.phase = Phase::Settled;
        self.events.push(ZoomEvent::Changed { zoom: self.zoom });
        log::debug!("zoom settled at {}", self.zoom);
    }

    fn clamp_offset(&self, offset: f64, zoom: f64) -> f64 {
        let Some(len) = self.sequence_length else {
            return offset;
        };
        let min = (self.viewport_width - zoom * len as f64).min(0.0);
        offset.clamp(min, 0.0)
    }

    /// Translate horizontally by `dx` pixels, clamped to the sequence.
    /// Returns the new translation.
    pub fn pan_by(&mut self, dx: f64) -> f64 {
        self.set_translation(self.offset + dx)
    }

    /// Set the translation directly, clamped to the sequence.
    pub fn set_translation(&mut self, offset: f64) -> f64 {
        if !offset.is_finite() {
            return self.offset;
        }
        let clamped = self.clamp_offset(offset, self.zoom);
        let delta = clamped - self.offset;
        self.offset = clamped;
        if let Phase::Transitioning(t) = &mut self.phase {
            t.start_offset += delta;
        }
        clamped
    }

    /// Fractional residue at the viewport centre.
    #[must_use]
    pub fn center_residue(&self) -> f64 {
        (self.viewport_width / 2.0 - self.offset) / self.zoom
    }

    fn last_residue(&self) -> usize {
        self.sequence_length.map_or(0, |len| len - 1)
    }

    /// First residue (0-based) visible at the left edge.
    #[must_use]
    pub fn left_visible_residue(&self) -> usize {
        let r = (-self.offset / self.zoom).floor().max(0.0) as usize;
        r.min(self.last_residue())
    }

    /// Last residue (0-based) visible at the right edge.
    #[must_use]
    pub fn right_visible_residue(&self) -> usize {
        let r = ((self.viewport_width - self.offset) / self.zoom)
            .floor()
            .max(0.0) as usize;
        r.min(self.last_residue())
    }

    /// Take queued notifications.
    pub fn drain_events(&mut self) -> Vec<ZoomEvent> {
        std::mem::take(&mut self.events)
    }
}
