//! The read-only view of track and group metadata the renderer consumes.
//!
//! The registry itself (declarations, colours, event wiring) belongs to the
//! host. The renderer only asks it what a track is and which tracks belong
//! to a group, and reacts to the [`RegistryEvent`]s the host forwards.

use std::fmt;

use rustc_hash::FxHashMap;

/// Key of a track or group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    /// Wrap a key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive metadata of a track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackInfo {
    /// Short label.
    pub name: String,
    /// Long label.
    pub fullname: String,
    /// CSS colour.
    pub color: String,
    /// Owning group, if any. A weak reference used for layout only.
    pub group: Option<TrackId>,
    /// Whether the track starts switched off.
    pub disabled: bool,
}

/// Lookups the renderer performs against the host's registry.
pub trait TrackRegistry {
    /// Metadata of a track, `None` if unknown.
    fn track_info(&self, id: &TrackId) -> Option<TrackInfo>;

    /// Whether `id` names a group.
    fn is_group(&self, id: &TrackId) -> bool;

    /// Member tracks of a group in declaration order. Empty for unknown
    /// groups.
    fn group_members(&self, group: &TrackId) -> Vec<TrackId>;

    /// Whether `id` names a track or a group.
    fn is_known(&self, id: &TrackId) -> bool {
        self.track_info(id).is_some() || self.is_group(id)
    }

    /// A track that stands in for a whole group: one id that is both a
    /// track and a group.
    fn is_controller(&self, id: &TrackId) -> bool {
        self.track_info(id).is_some() && self.is_group(id)
    }

    /// Group a track belongs to.
    fn group_of(&self, id: &TrackId) -> Option<TrackId> {
        self.track_info(id).and_then(|info| info.group)
    }
}

/// Registry changes forwarded by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A track was declared.
    LayerRegistered(TrackId),
    /// A group was declared.
    GroupRegistered(TrackId),
    /// A track was switched on or off.
    VisibilityChange {
        /// The track.
        track: TrackId,
        /// New state.
        visible: bool,
    },
    /// A track was withdrawn.
    Removed(TrackId),
}

/// In-memory registry for hosts without their own store, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    tracks: FxHashMap<TrackId, TrackInfo>,
    groups: FxHashMap<TrackId, Vec<TrackId>>,
}

impl MemoryRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a track. Joining a group appends it to that group's members.
    pub fn register_track(&mut self, id: impl Into<TrackId>, info: TrackInfo) {
        let id = id.into();
        if let Some(group) = &info.group {
            let members = self.groups.entry(group.clone()).or_default();
            if !members.contains(&id) {
                members.push(id.clone());
            }
        }
        let _ = self.tracks.insert(id, info);
    }

    /// Declare a track by name only.
    pub fn register_simple(&mut self, id: &str, color: &str) {
        self.register_track(
            id,
            TrackInfo {
                name: id.to_owned(),
                fullname: id.to_owned(),
                color: color.to_owned(),
                ..TrackInfo::default()
            },
        );
    }

    /// Declare a group.
    pub fn register_group(&mut self, id: impl Into<TrackId>) {
        let _ = self.groups.entry(id.into()).or_default();
    }

    /// Withdraw a track or group.
    pub fn remove(&mut self, id: &TrackId) {
        if let Some(info) = self.tracks.remove(id) {
            if let Some(members) =
                info.group.and_then(|g| self.groups.get_mut(&g))
            {
                members.retain(|m| m != id);
            }
        }
        let _ = self.groups.remove(id);
    }
}

impl TrackRegistry for MemoryRegistry {
    fn track_info(&self, id: &TrackId) -> Option<TrackInfo> {
        self.tracks.get(id).cloned()
    }

    fn is_group(&self, id: &TrackId) -> bool {
        self.groups.contains_key(id)
    }

    fn group_members(&self, group: &TrackId) -> Vec<TrackId> {
        self.groups.get(group).cloned().unwrap_or_default()
    }
}
