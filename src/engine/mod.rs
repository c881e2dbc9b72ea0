//! The sequence renderer facade.
//!
//! [`SequenceRenderer`] ties the scene, the shared animation scheduler, the
//! zoom controller, the track layout and the drag engine together behind
//! the operations readers and widgets call. It is driven by the host: every
//! timer advances in [`tick`](SequenceRenderer::tick), and notifications
//! are queued as [`RendererEvent`]s until drained.
//!
//! # Readiness
//!
//! Until a sequence is set there is nothing to lay out. Track, layout, zoom
//! and selection requests made before then are queued and replayed in
//! order once [`set_sequence`](SequenceRenderer::set_sequence) runs.

mod command;
mod readiness;
mod reorder;
mod tracks;
mod view;

pub use command::RendererCommand;
use glam::{DAffine2, DVec2};
pub(crate) use readiness::{DeferredOp, Readiness};
use web_time::Instant;

use crate::animation::{
    AnimationScheduler, AnimationSurface, SharedScheduler, TickReport,
};
use crate::drag::DragEngine;
use crate::error::SeqViewError;
use crate::layout::{ResidueAxis, TrackLayout};
use crate::options::Options;
use crate::registry::{TrackId, TrackRegistry};
use crate::scene::{Attributes, PrimitiveId, Surface};
use crate::viewport::{ZoomController, ZoomEvent};

/// Notifications queued by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    /// A sequence was set and every derived element rebuilt.
    SequenceReady {
        /// Residue count.
        length: usize,
    },
    /// A zoom transition started.
    ZoomTransitionBegan {
        /// Residue held stationary.
        focal_residue: f64,
    },
    /// A zoom transition settled; the layout has been refreshed.
    ZoomChanged {
        /// New canonical zoom.
        zoom: f64,
    },
    /// The animation scheduler went from idle to running.
    AnimationBegan,
    /// The last animation finished.
    AnimationEnded,
    /// The track order changed.
    TrackOrderChanged(Vec<TrackId>),
    /// A track was switched on or off.
    VisibilityChanged {
        /// The track.
        track: TrackId,
        /// New state.
        visible: bool,
    },
    /// A track's primitives were dropped.
    TrackRemoved(TrackId),
}

/// Groups making up the main scene.
#[derive(Debug, Clone, Copy)]
struct SceneGroups {
    /// Receives the zoom transition transform.
    scene: PrimitiveId,
    selection: PrimitiveId,
    axis: PrimitiveId,
    tracks: PrimitiveId,
}

impl SceneGroups {
    fn build(surface: &mut Surface) -> Self {
        let root = surface.root();
        let scene = surface.group();
        let _ = surface.push(root, scene);
        let mut child = || {
            let g = surface.group();
            let _ = surface.push(scene, g);
            g
        };
        let selection = child();
        let axis = child();
        let tracks = child();
        Self {
            scene,
            selection,
            axis,
            tracks,
        }
    }
}

/// Highlighted residue range and its rectangle.
#[derive(Debug, Clone, Copy)]
struct Selection {
    from: usize,
    to: usize,
    rect: PrimitiveId,
}

/// Interactive renderer for one annotated sequence.
pub struct SequenceRenderer {
    options: Options,
    registry: Box<dyn TrackRegistry>,
    scheduler: SharedScheduler,
    surface: Surface,
    groups: SceneGroups,
    readiness: Readiness,
    sequence: Vec<char>,
    axis: Option<ResidueAxis>,
    layout: TrackLayout,
    zoom: ZoomController,
    drag: DragEngine,
    selection: Option<Selection>,
    hovered_residue: Option<usize>,
    animating: bool,
    events: Vec<RendererEvent>,
}

impl std::fmt::Debug for SequenceRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceRenderer")
            .field("sequence_length", &self.sequence.len())
            .field("readiness", &self.readiness)
            .field("zoom", &self.zoom.zoom())
            .field("tracks", &self.layout.order().len())
            .finish_non_exhaustive()
    }
}

impl SequenceRenderer {
    /// Renderer with its own animation scheduler.
    #[must_use]
    pub fn new(options: Options, registry: Box<dyn TrackRegistry>) -> Self {
        let scheduler = AnimationScheduler::new(&options.animation).shared();
        Self::with_scheduler(options, registry, scheduler)
    }

    /// Renderer sharing `scheduler` with other surfaces, so every
    /// transition on the page runs off one clock.
    #[must_use]
    pub fn with_scheduler(
        options: Options,
        registry: Box<dyn TrackRegistry>,
        scheduler: SharedScheduler,
    ) -> Self {
        let mut surface = Surface::new(options.layout.resolution);
        let groups = SceneGroups::build(&mut surface);
        let layout = TrackLayout::new(&options.layout);
        {
            let mut s = scheduler.borrow_mut();
            s.register_surface(surface.id());
            s.register_surface(layout.navigation().surface().id());
        }
        Self {
            zoom: ZoomController::new(&options.zoom),
            drag: DragEngine::new(&options.drag),
            options,
            registry,
            scheduler,
            surface,
            groups,
            readiness: Readiness::default(),
            sequence: Vec::new(),
            axis: None,
            layout,
            selection: None,
            hovered_residue: None,
            animating: false,
            events: Vec::new(),
        }
    }

    /// Options the renderer was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The shared scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &SharedScheduler {
        &self.scheduler
    }

    /// The host's track registry.
    #[must_use]
    pub fn registry(&self) -> &dyn TrackRegistry {
        self.registry.as_ref()
    }

    /// Mutable access to the registry.
    pub fn registry_mut(&mut self) -> &mut dyn TrackRegistry {
        self.registry.as_mut()
    }

    /// Main scene surface.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Navigation panel overlay surface.
    #[must_use]
    pub fn navigation_surface(&self) -> &Surface {
        self.layout.navigation().surface()
    }

    /// Track layout state.
    #[must_use]
    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    /// Zoom and translation state.
    #[must_use]
    pub fn zoom_controller(&self) -> &ZoomController {
        &self.zoom
    }

    /// Drag-and-drop state.
    #[must_use]
    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    /// Whether a sequence has been set.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Residues of the current sequence.
    #[must_use]
    pub fn sequence(&self) -> &[char] {
        &self.sequence
    }

    /// Whether the scheduler is running a burst of animation.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scheduler.borrow().is_running()
    }

    /// Replace the sequence and rebuild every derived element: the axis,
    /// the realized tracks and the navigation rows. Track ids and their
    /// on/off state survive; reader primitives do not and must be added
    /// again after [`RendererEvent::SequenceReady`].
    pub fn set_sequence(
        &mut self,
        residues: &str,
        now: Instant,
    ) -> Result<(), SeqViewError> {
        let sequence: Vec<char> =
            residues.chars().filter(|c| !c.is_whitespace()).collect();
        log::debug!("setting sequence of {} residues", sequence.len());

        let previous: Vec<(TrackId, bool)> = self
            .layout
            .order()
            .iter()
            .map(|id| (id.clone(), self.layout.is_active(id)))
            .collect();

        let nav_id = self.layout.navigation().surface().id();
        {
            let mut scheduler = self.scheduler.borrow_mut();
            let mut surfaces: [&mut dyn AnimationSurface; 2] =
                [&mut self.surface, self.layout.navigation_mut().surface_mut()];
            let _ = scheduler.cancel_surfaces(&mut surfaces);
            scheduler.unregister_surface(nav_id);
        }

        self.surface.clear();
        self.groups = SceneGroups::build(&mut self.surface);
        self.selection = None;
        self.hovered_residue = None;
        self.drag = DragEngine::new(&self.options.drag);
        self.layout = TrackLayout::new(&self.options.layout);
        self.scheduler
            .borrow_mut()
            .register_surface(self.layout.navigation().surface().id());

        self.axis = Some(ResidueAxis::build(
            &mut self.surface,
            self.groups.axis,
            &sequence,
            &self.options.layout,
        ));
        self.zoom.set_sequence_length(sequence.len());
        self.surface.set_offset(DVec2::ZERO);
        self.sequence = sequence;

        for (id, active) in previous {
            if self.realize_track(&id) && !active {
                let _ = self.layout.set_active(&id, false);
            }
        }
        self.update_axis_letters()?;

        let deferred = self.readiness.make_ready();
        for op in deferred {
            self.replay(op, now)?;
        }
        let _ = self.refresh(false, now)?;
        self.events.push(RendererEvent::SequenceReady {
            length: self.sequence.len(),
        });
        Ok(())
    }

    fn replay(&mut self, op: DeferredOp, now: Instant) -> Result<(), SeqViewError> {
        log::trace!("replaying deferred {op:?}");
        match op {
            DeferredOp::AddTrack(id) => {
                let _ = self.add_track(&id);
            }
            DeferredOp::Refresh { animated } => {
                let _ = self.refresh(animated, now)?;
            }
            DeferredOp::SetTrackOrder(ids) => {
                let _ = self.set_track_order(&ids, now)?;
            }
            DeferredOp::SetZoom { level, focal } => {
                let _ = self.set_zoom_at(level, focal, now)?;
            }
            DeferredOp::Select { from, to } => self.select(from, to)?,
        }
        Ok(())
    }

    /// Advance every timer: the zoom settle debounce, the drag hover and
    /// preview timers, then the animation scheduler.
    pub fn tick(&mut self, now: Instant) -> Result<TickReport, SeqViewError> {
        if self.zoom.tick(now) {
            self.finish_zoom(now)?;
        }
        {
            let mut scheduler = self.scheduler.borrow_mut();
            self.drag.tick(&mut self.layout, &mut scheduler, now)?;
        }
        let report = {
            let mut scheduler = self.scheduler.borrow_mut();
            let mut surfaces: [&mut dyn AnimationSurface; 2] =
                [&mut self.surface, self.layout.navigation_mut().surface_mut()];
            scheduler.tick(now, &mut surfaces)
        };
        self.collect_scheduler_events();
        Ok(report)
    }

    /// Earliest instant [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.zoom.settle_deadline(),
            self.drag.next_deadline(),
            self.scheduler.borrow().next_tick_at(),
        ]
            .into_iter()
            .flatten()
            .min()
    }

    /// Take queued notifications.
    pub fn drain_events(&mut self) -> Vec<RendererEvent> {
        self.collect_zoom_events();
        self.collect_scheduler_events();
        std::mem::take(&mut self.events)
    }

    /// Lifecycle is reported from this renderer's own surface, which the
    /// scheduler notifies on the renderer's ticks. The shared queue is
    /// drained so it does not grow while several renderers share it.
    fn collect_scheduler_events(&mut self) {
        let _ = self.scheduler.borrow_mut().drain_events();
        let animating = self.surface.is_animating();
        if animating != self.animating {
            self.animating = animating;
            self.events.push(if animating {
                RendererEvent::AnimationBegan
            } else {
                RendererEvent::AnimationEnded
            });
        }
    }

    fn collect_zoom_events(&mut self) {
        self.events
            .extend(self.zoom.drain_events().into_iter().map(|e| match e {
                ZoomEvent::TransitionBegan { focal_residue } => {
                    RendererEvent::ZoomTransitionBegan { focal_residue }
                }
                ZoomEvent::Changed { zoom } => RendererEvent::ZoomChanged { zoom },
            }));
    }

    fn update_axis_letters(&mut self) -> Result<(), SeqViewError> {
        let Some(axis) = &self.axis else {
            return Ok(());
        };
        let mut scheduler = self.scheduler.borrow_mut();
        axis.update_for_zoom(
            &mut self.surface,
            &mut scheduler,
            self.zoom.zoom(),
            self.options.layout.residue_label_zoom_threshold,
        )
    }

    fn set_scene_transform(&mut self, transform: DAffine2) -> Result<(), SeqViewError> {
        self.surface
            .apply(self.groups.scene, &Attributes::new().transform(transform))
    }

    /// Render the main scene as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.surface.to_svg()
    }

    /// Render the navigation panel as an SVG document.
    #[must_use]
    pub fn navigation_svg(&self) -> String {
        self.layout.navigation().surface().to_svg()
    }
}

#[cfg(test)]
mod tests;
