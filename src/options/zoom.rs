use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Zoom", inline)]
#[serde(default)]
/// Zoom clamping, settle and input sensitivity parameters.
pub struct ZoomOptions {
    /// Upper zoom bound.
    #[schemars(skip)]
    pub max_zoom: f64,
    /// Minimum zoom is this factor times viewport width over sequence
    /// length.
    #[schemars(skip)]
    pub min_zoom_factor: f64,
    /// Minimum zoom used while the sequence length is unknown.
    #[schemars(skip)]
    pub fallback_min_zoom: f64,
    /// Quiet period after the last zoom request before the zoom settles.
    #[schemars(title = "Settle Delay (ms)", range(min = 0, max = 1000))]
    pub settle_delay_ms: u64,
    /// Settle on gesture end instead of the debounce timer.
    #[schemars(title = "Touch Mode")]
    pub touch_mode: bool,
    /// Relative zoom change per scroll unit.
    #[schemars(title = "Scroll Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub scroll_speed: f64,
    /// Zoom level before the first request.
    #[schemars(skip)]
    pub initial_zoom: f64,
    /// Viewport width in screen pixels.
    #[schemars(skip)]
    pub viewport_width: f64,
}

impl ZoomOptions {
    /// Settle delay as a duration.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            max_zoom: 10.0,
            min_zoom_factor: 0.15,
            fallback_min_zoom: 0.5,
            settle_delay_ms: 100,
            touch_mode: false,
            scroll_speed: 0.1,
            initial_zoom: 1.0,
            viewport_width: 1000.0,
        }
    }
}
