use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::util::easing::Easing;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Animation scheduler parameters.
pub struct AnimationOptions {
    /// When disabled, every transition is written directly.
    #[schemars(title = "Animate Transitions")]
    pub enabled: bool,
    /// Nominal scheduler tick period.
    #[schemars(title = "Tick Period (ms)", range(min = 5, max = 200))]
    pub tick_period_ms: u64,
    /// Multiplier applied to the period when a tick overruns it.
    #[schemars(skip)]
    pub slowdown_factor: f64,
    /// Upper bound on the number of steps in one transition.
    #[schemars(skip)]
    pub max_steps: u32,
    /// Step interpolation curve.
    #[schemars(skip)]
    pub easing: Easing,
}

impl AnimationOptions {
    /// Nominal tick period as a duration.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_period_ms: 20,
            slowdown_factor: 1.5,
            max_steps: 40,
            easing: Easing::Linear,
        }
    }
}
