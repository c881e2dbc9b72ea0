//! Vertical stacking of tracks.
//!
//! A refresh walks the track order top to bottom with a running height
//! counter in screen pixels. Uniform rows keep a constant on-screen height,
//! so their scene height shrinks as zoom grows; rows with a content-driven
//! height scale with the scene instead. Inactive rows collapse to nothing
//! at the position of their group's controller, so they grow back out of
//! it when re-enabled.

use glam::DVec2;
use rustc_hash::{FxHashMap, FxHashSet};
use web_time::Instant;

use super::navigation::{NavigationPanel, RowOptions};
use super::order::TrackOrder;
use crate::animation::AnimationScheduler;
use crate::error::SeqViewError;
use crate::options::LayoutOptions;
use crate::registry::{TrackId, TrackInfo, TrackRegistry};
use crate::scene::{
    Attributes, PrimitiveId, PrimitiveSet, Shape, Surface, ViewBox, Visibility,
};

/// Computed position of one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPlacement {
    /// The track.
    pub track: TrackId,
    /// Top in scene units.
    pub y: f64,
    /// Height in scene units, zero when collapsed.
    pub height: f64,
    /// Whether the track takes up space.
    pub active: bool,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    /// Placements in track order.
    pub placements: Vec<TrackPlacement>,
    /// Stacked height of every active track, in screen pixels.
    pub total_height: f64,
    /// View bounds written to the surface.
    pub view_box: ViewBox,
}

impl LayoutSnapshot {
    /// Placement of `track`.
    #[must_use]
    pub fn placement(&self, track: &TrackId) -> Option<&TrackPlacement> {
        self.placements.iter().find(|p| &p.track == track)
    }
}

/// Everything a layout pass reads or writes besides the layout itself.
pub struct LayoutPass<'a> {
    /// Main scene surface.
    pub surface: &'a mut Surface,
    /// Scheduler for animated writes.
    pub scheduler: &'a mut AnimationScheduler,
    /// Track metadata.
    pub registry: &'a dyn TrackRegistry,
    /// Canonical zoom.
    pub zoom: f64,
    /// Residue count.
    pub sequence_length: usize,
    /// Animate changes starting now; `None` writes directly.
    pub animate_from: Option<Instant>,
}

fn write(
    set: &PrimitiveSet,
    surface: &mut Surface,
    scheduler: &mut AnimationScheduler,
    attrs: &Attributes,
    animate_from: Option<Instant>,
) -> Result<(), SeqViewError> {
    match animate_from {
        Some(now) => set.animate(surface, scheduler, attrs, now),
        None => set.attr(surface, scheduler, attrs),
    }
}

/// Owns the track order, each track's primitive set and the navigation
/// panel mirroring them.
#[derive(Debug)]
pub struct TrackLayout {
    options: LayoutOptions,
    order: TrackOrder,
    sets: FxHashMap<TrackId, PrimitiveSet>,
    containers: FxHashMap<TrackId, PrimitiveId>,
    inactive: FxHashSet<TrackId>,
    navigation: NavigationPanel,
    last: Option<LayoutSnapshot>,
}

impl TrackLayout {
    /// Empty layout.
    #[must_use]
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            options: options.clone(),
            order: TrackOrder::new(),
            sets: FxHashMap::default(),
            containers: FxHashMap::default(),
            inactive: FxHashSet::default(),
            navigation: NavigationPanel::new(options.navigation_width),
            last: None,
        }
    }

    /// Layout geometry settings.
    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Current stacking order.
    #[must_use]
    pub fn order(&self) -> &TrackOrder {
        &self.order
    }

    /// Mutable stacking order.
    pub fn order_mut(&mut self) -> &mut TrackOrder {
        &mut self.order
    }

    /// Replace the order. Tracks left out of `order` are hidden and
    /// deactivated; their ids are returned.
    pub fn set_order(
        &mut self,
        order: TrackOrder,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
    ) -> Result<Vec<TrackId>, SeqViewError> {
        let dropped = self.order.missing_from(&order);
        for id in &dropped {
            if let Some(set) = self.sets.get(id) {
                set.hide(surface, scheduler)?;
            }
            self.navigation.hide_track(scheduler, id)?;
            let _ = self.inactive.insert(id.clone());
        }
        self.order = order;
        Ok(dropped)
    }

    /// Realize a track: an empty container group under `parent` and its
    /// primitive set. Appends the id to the order if absent. Returns
    /// `false` when the track already exists.
    pub fn add_track(
        &mut self,
        surface: &mut Surface,
        parent: PrimitiveId,
        id: &TrackId,
        info: &TrackInfo,
    ) -> bool {
        let _ = self.order.push(id.clone());
        if self.sets.contains_key(id) {
            return false;
        }
        let container = surface.group();
        let _ = surface.push(parent, container);
        let mut set = PrimitiveSet::new();
        set.set_track_height(self.options.track_height);
        let _ = self.sets.insert(id.clone(), set);
        let _ = self.containers.insert(id.clone(), container);
        if info.disabled {
            let _ = self.inactive.insert(id.clone());
        }
        true
    }

    /// Drop a track's primitives and navigation row. The id stays in the
    /// order and is skipped by later passes.
    pub fn remove_track(
        &mut self,
        surface: &mut Surface,
        scheduler: &mut AnimationScheduler,
        id: &TrackId,
    ) -> bool {
        let Some(mut set) = self.sets.remove(id) else {
            return false;
        };
        set.remove_from(surface, scheduler);
        if let Some(container) = self.containers.remove(id) {
            surface.remove(container);
        }
        self.navigation.remove_track(scheduler, id);
        let _ = self.inactive.remove(id);
        true
    }

    /// Create a primitive inside a track's container and add it to the
    /// track's set.
    pub fn add_primitive(
        &mut self,
        surface: &mut Surface,
        id: &TrackId,
        shape: Shape,
    ) -> Option<PrimitiveId> {
        let container = *self.containers.get(id)?;
        let set = self.sets.get_mut(id)?;
        let primitive = surface.create(shape);
        let _ = surface.push(container, primitive);
        set.push(primitive);
        Some(primitive)
    }

    /// Whether `id` has a realized set.
    #[must_use]
    pub fn has_track(&self, id: &TrackId) -> bool {
        self.sets.contains_key(id)
    }

    /// Primitive set of a realized track.
    #[must_use]
    pub fn track_set(&self, id: &TrackId) -> Option<&PrimitiveSet> {
        self.sets.get(id)
    }

    /// Mutable primitive set of a realized track.
    pub fn track_set_mut(&mut self, id: &TrackId) -> Option<&mut PrimitiveSet> {
        self.sets.get_mut(id)
    }

    /// Switch a track on or off. Returns whether the state changed.
    pub fn set_active(&mut self, id: &TrackId, active: bool) -> bool {
        if active {
            self.inactive.remove(id)
        } else {
            self.inactive.insert(id.clone())
        }
    }

    /// Whether a track takes up space.
    #[must_use]
    pub fn is_active(&self, id: &TrackId) -> bool {
        !self.inactive.contains(id)
    }

    /// The navigation overlay.
    #[must_use]
    pub fn navigation(&self) -> &NavigationPanel {
        &self.navigation
    }

    /// Mutable navigation overlay.
    pub fn navigation_mut(&mut self) -> &mut NavigationPanel {
        &mut self.navigation
    }

    /// Result of the most recent pass.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&LayoutSnapshot> {
        self.last.as_ref()
    }

    /// Recompute every track's offset, the view bounds and the navigation
    /// rows. Redraw is held on both surfaces for the whole pass.
    ///
    /// Returns `Ok(None)` for an empty sequence.
    pub fn refresh(
        &mut self,
        mut pass: LayoutPass<'_>,
    ) -> Result<Option<LayoutSnapshot>, SeqViewError> {
        if pass.sequence_length == 0 {
            log::debug!("layout skipped: no sequence");
            return Ok(None);
        }
        pass.surface.suspend_redraw();
        self.navigation.surface_mut().suspend_redraw();
        let result = self.layout_tracks(&mut pass);
        self.navigation.surface_mut().resume_redraw();
        pass.surface.resume_redraw();

        let snapshot = result?;
        log::debug!(
            "layout pass: {} tracks, total height {}",
            snapshot.placements.len(),
            snapshot.total_height
        );
        self.last = Some(snapshot.clone());
        Ok(Some(snapshot))
    }

    fn row_options(
        &self,
        id: &TrackId,
        info: Option<&TrackInfo>,
        registry: &dyn TrackRegistry,
    ) -> RowOptions {
        let is_controller = registry.is_controller(id);
        RowOptions {
            label: info
                .map(|i| i.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| id.to_string()),
            color: info.map(|i| i.color.clone()).unwrap_or_default(),
            group: if is_controller {
                Some(id.clone())
            } else {
                info.and_then(|i| i.group.clone())
            },
            is_controller,
            visible: self.is_active(id),
        }
    }

    fn layout_tracks(
        &mut self,
        pass: &mut LayoutPass<'_>,
    ) -> Result<LayoutSnapshot, SeqViewError> {
        let zoom = pass.zoom;
        let axis = self.options.axis_height;
        let gap = self.options.track_gap;
        let mut running = 0.0;
        let mut placements = Vec::new();
        let mut controller_y: FxHashMap<TrackId, f64> = FxHashMap::default();

        for id in self.order.iter() {
            let Some(set) = self.sets.get(id) else {
                continue;
            };
            let info = pass.registry.track_info(id);
            let row = self.row_options(id, info.as_ref(), pass.registry);

            if !self.is_active(id) {
                let parent_y = info
                    .as_ref()
                    .and_then(|i| i.group.as_ref())
                    .filter(|g| pass.registry.is_controller(g) && self.is_active(g))
                    .and_then(|g| {
                        controller_y.get(g).copied().or_else(|| {
                            self.sets.get(g).and_then(|s| s.current_y(pass.surface))
                        })
                    });
                let y = parent_y.or_else(|| set.current_y(pass.surface));
                let mut attrs = Attributes::new()
                    .height(0.0)
                    .visibility(Visibility::Hidden);
                attrs.y = y;
                write(set, pass.surface, pass.scheduler, &attrs, pass.animate_from)?;
                if let Some(tracers) = set.tracers() {
                    tracers.hide(pass.surface, pass.scheduler)?;
                }
                let y = y.unwrap_or(axis);
                self.navigation.render_track(
                    pass.scheduler,
                    id,
                    y * zoom,
                    0.0,
                    row,
                    pass.animate_from,
                )?;
                placements.push(TrackPlacement {
                    track: id.clone(),
                    y,
                    height: 0.0,
                    active: false,
                });
                continue;
            }

            let above = running;
            let mut attrs = Attributes::new().visibility(Visibility::Visible);
            let (y, height) = match set.fixed_track_height() {
                Some(h) => {
                    let y = axis + running / zoom - self.options.fixed_overlap * h;
                    running += zoom * h + gap;
                    (y, h)
                }
                None => {
                    let y = axis + running / zoom;
                    let h = set.track_height() / zoom;
                    running += set.track_height() + gap;
                    attrs.height = Some(h);
                    (y, h)
                }
            };
            attrs.y = Some(y);
            write(set, pass.surface, pass.scheduler, &attrs, pass.animate_from)?;

            if let Some(tracers) = set.tracers() {
                let tracer_attrs = if zoom > self.options.tracer_zoom_threshold {
                    Attributes::new()
                        .y(axis - 1.5)
                        .height(1.5 + above / zoom)
                        .visibility(Visibility::Visible)
                } else {
                    Attributes::new().visibility(Visibility::Hidden)
                };
                write(
                    tracers,
                    pass.surface,
                    pass.scheduler,
                    &tracer_attrs,
                    pass.animate_from,
                )?;
            }

            if row.is_controller {
                let _ = controller_y.insert(id.clone(), y);
            }
            self.navigation.render_track(
                pass.scheduler,
                id,
                y * zoom,
                height * zoom,
                row,
                pass.animate_from,
            )?;
            placements.push(TrackPlacement {
                track: id.clone(),
                y,
                height,
                active: true,
            });
        }

        let unit = pass.surface.resolution();
        let len = pass.sequence_length as f64;
        let pad = self.options.padding;
        let view_box = ViewBox {
            x: -2.0 * unit,
            y: 0.0,
            width: (len + pad + 2.0) * unit,
            height: (axis + running / zoom + pad) * unit,
        };
        pass.surface.set_view_box(view_box);
        let container = (!self.options.grow_to_fit).then(|| {
            DVec2::new(view_box.width / unit * zoom, view_box.height / unit * zoom)
        });
        pass.surface.set_container_size(container);

        Ok(LayoutSnapshot {
            placements,
            total_height: running,
            view_box,
        })
    }
}
