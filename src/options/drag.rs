use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Track Reordering", inline)]
#[serde(default)]
/// Drag-and-drop reorder timing.
pub struct DragOptions {
    /// How long the pointer must rest on a candidate before the preview
    /// starts.
    #[schemars(title = "Hover Settle (ms)", range(min = 0, max = 2000))]
    pub hover_settle_ms: u64,
    /// Number of discrete displacement steps in the preview.
    #[schemars(skip)]
    pub preview_steps: u32,
    /// Interval between preview steps.
    #[schemars(title = "Preview Step (ms)", range(min = 0, max = 500))]
    pub preview_step_ms: u64,
}

impl DragOptions {
    /// Hover settle delay as a duration.
    #[must_use]
    pub fn hover_settle(&self) -> Duration {
        Duration::from_millis(self.hover_settle_ms)
    }

    /// Preview step interval as a duration.
    #[must_use]
    pub fn preview_step(&self) -> Duration {
        Duration::from_millis(self.preview_step_ms)
    }
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            hover_settle_ms: 300,
            preview_steps: 4,
            preview_step_ms: 40,
        }
    }
}
