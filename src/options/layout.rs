use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
/// Track stacking and scene geometry parameters.
pub struct LayoutOptions {
    /// Scene units per residue. Every numeric coordinate handed to the
    /// surface is multiplied by this factor.
    #[schemars(title = "Resolution", range(min = 1.0, max = 200.0))]
    pub resolution: f64,
    /// Height of the residue axis above the first track.
    #[schemars(title = "Axis Height", range(min = 0.0, max = 100.0))]
    pub axis_height: f64,
    /// Default uniform track height.
    #[schemars(title = "Track Height", range(min = 0.5, max = 50.0))]
    pub track_height: f64,
    /// Vertical gap added after every active track.
    #[schemars(title = "Track Gap", range(min = 0.0, max = 20.0))]
    pub track_gap: f64,
    /// Padding added to the view bounds on the right and bottom.
    #[schemars(title = "Padding", range(min = 0.0, max = 50.0))]
    pub padding: f64,
    /// Fraction of a fixed-height track that overlaps the track above.
    #[schemars(skip)]
    pub fixed_overlap: f64,
    /// When set, the container grows to fit content instead of receiving
    /// a zoom-scaled outer bound.
    #[schemars(title = "Grow To Fit")]
    pub grow_to_fit: bool,
    /// Tracers are only shown above this zoom level.
    #[schemars(title = "Tracer Zoom", range(min = 0.5, max = 10.0))]
    pub tracer_zoom_threshold: f64,
    /// Residue letters are only shown at or above this zoom level.
    #[schemars(title = "Residue Label Zoom", range(min = 0.5, max = 10.0))]
    pub residue_label_zoom_threshold: f64,
    /// Width of the navigation panel in screen pixels.
    #[schemars(skip)]
    pub navigation_width: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            resolution: 50.0,
            axis_height: 20.0,
            track_height: 4.0,
            track_gap: 0.0,
            padding: 10.0,
            fixed_overlap: 0.3,
            grow_to_fit: false,
            tracer_zoom_threshold: 3.6,
            residue_label_zoom_threshold: 3.6,
            navigation_width: 200.0,
        }
    }
}
