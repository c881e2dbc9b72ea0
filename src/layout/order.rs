//! Track stacking order and group expansion.

use rustc_hash::FxHashSet;

use crate::registry::{TrackId, TrackRegistry};

/// Top-to-bottom stacking order of tracks.
///
/// Holds only ids the registry knew about when they were added, with no
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOrder {
    ids: Vec<TrackId>,
}

impl TrackOrder {
    /// Empty order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and expand a requested order.
    ///
    /// Unknown ids are dropped with a warning. A group is replaced by its
    /// members, preceded by the group itself when it is also a track (a
    /// controller). An id listed more than once keeps its last position.
    #[must_use]
    pub fn resolve(requested: &[TrackId], registry: &dyn TrackRegistry) -> Self {
        let mut order = Self::new();
        for id in requested {
            let mut expanding = FxHashSet::default();
            order.push_expanded(id, registry, &mut expanding);
        }
        order
    }

    fn push_expanded(
        &mut self,
        id: &TrackId,
        registry: &dyn TrackRegistry,
        expanding: &mut FxHashSet<TrackId>,
    ) {
        if !registry.is_known(id) {
            log::warn!("dropping unknown track '{id}' from track order");
            return;
        }
        if !registry.is_group(id) {
            self.move_to_end(id.clone());
            return;
        }
        // Guard against groups that (indirectly) contain themselves.
        if !expanding.insert(id.clone()) {
            return;
        }
        if registry.track_info(id).is_some() {
            self.move_to_end(id.clone());
        }
        for member in registry.group_members(id) {
            self.push_expanded(&member, registry, expanding);
        }
    }

    fn move_to_end(&mut self, id: TrackId) {
        self.ids.retain(|existing| *existing != id);
        self.ids.push(id);
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn push(&mut self, id: TrackId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Drop `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        before != self.ids.len()
    }

    /// Ids in stacking order.
    #[must_use]
    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    /// Iterate in stacking order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackId> {
        self.ids.iter()
    }

    /// Whether `id` is in the order.
    #[must_use]
    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Index of `id`.
    #[must_use]
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }

    /// Number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids present here but missing from `next`.
    #[must_use]
    pub fn missing_from(&self, next: &Self) -> Vec<TrackId> {
        self.ids
            .iter()
            .filter(|id| !next.contains(id))
            .cloned()
            .collect()
    }

    /// Move `moving` (kept in its given relative order) to just before
    /// `before`, or to the end when `before` is `None` or is itself being
    /// moved. Every other id keeps its relative order.
    pub fn splice(&mut self, moving: &[TrackId], before: Option<&TrackId>) {
        let moving: Vec<TrackId> = moving
            .iter()
            .filter(|id| self.contains(id))
            .cloned()
            .collect();
        if moving.is_empty() {
            return;
        }
        self.ids.retain(|id| !moving.contains(id));
        let at = before
            .and_then(|target| self.position(target))
            .unwrap_or(self.ids.len());
        let _ = self.ids.splice(at..at, moving);
    }
}
