use web_time::Duration;

/// Smoothed measurement of how long scheduler ticks actually take.
///
/// The scheduler compares each raw sample against its nominal period to
/// decide whether to slow down; the smoothed value is reported for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct TickTiming {
    /// Most recent raw tick cost.
    last: Duration,
    /// Smoothed cost in seconds using exponential moving average.
    smoothed_secs: f64,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f64,
    /// Number of samples recorded.
    samples: u64,
}

impl TickTiming {
    /// Create an empty meter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Duration::ZERO,
            smoothed_secs: 0.0,
            smoothing: 0.2,
            samples: 0,
        }
    }

    /// Record the cost of one tick.
    pub fn record(&mut self, cost: Duration) {
        self.last = cost;
        let secs = cost.as_secs_f64();
        if self.samples == 0 {
            self.smoothed_secs = secs;
        } else {
            self.smoothed_secs = self.smoothed_secs * (1.0 - self.smoothing)
                + secs * self.smoothing;
        }
        self.samples += 1;
    }

    /// Cost of the most recent tick.
    #[must_use]
    pub fn last(&self) -> Duration {
        self.last
    }

    /// Smoothed tick cost.
    #[must_use]
    pub fn smoothed(&self) -> Duration {
        Duration::from_secs_f64(self.smoothed_secs)
    }

    /// Number of ticks measured.
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Default for TickTiming {
    fn default() -> Self {
        Self::new()
    }
}
