use serde::{Deserialize, Serialize};

pub const DEFAULT_DELTA: f32 = 0.05;

/// Tuning for [`crate::order_depth`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOrderingOptions {
    /// Minimum relative area difference `|a - b| / max(a, b)` for two
    /// adjacent layers to be ordered by area. Pairs at or below it stay
    /// unordered.
    pub delta: f32,
}

impl Default for DepthOrderingOptions {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
        }
    }
}

impl DepthOrderingOptions {
    /// `delta` clamped to `[0, 1]`; non-finite values fall back to
    /// [`DEFAULT_DELTA`].
    pub fn effective_delta(&self) -> f32 {
        if self.delta.is_finite() {
            self.delta.clamp(0.0, 1.0)
        } else {
            DEFAULT_DELTA
        }
    }
}
