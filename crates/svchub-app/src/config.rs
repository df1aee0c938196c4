//! Timing and threshold knobs for the orchestrators.
//!
//! Production code uses [`Tuning::default`]. Tests shrink the debounce
//! windows so races resolve in microseconds instead of wall-clock time.

use std::time::Duration;

/// Pause after the last keystroke or map gesture before firing a request.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum trimmed query length before place suggestions are requested.
pub const SUGGESTION_MIN_CHARS: usize = 3;

/// Cap on the number of place suggestions surfaced to the UI.
pub const MAX_SUGGESTIONS: usize = 10;

/// Device-location jitter below this many degrees is ignored.
pub const LOCATION_NOISE_THRESHOLD_DEGREES: f64 = 0.0005;

/// Map region deltas at or below this are treated as programmatic echoes
/// rather than user pans.
pub const REGION_EPSILON_DEGREES: f64 = 0.0001;

/// Span of the default map region, in degrees.
pub const DEFAULT_MAP_SPAN_DEGREES: f64 = 0.35;

#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Debounce window shared by suggestion typing and map pans.
    pub debounce: Duration,
    pub suggestion_min_chars: usize,
    pub max_suggestions: usize,
    pub location_noise_threshold: f64,
    pub region_epsilon: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE,
            suggestion_min_chars: SUGGESTION_MIN_CHARS,
            max_suggestions: MAX_SUGGESTIONS,
            location_noise_threshold: LOCATION_NOISE_THRESHOLD_DEGREES,
            region_epsilon: REGION_EPSILON_DEGREES,
        }
    }
}

impl Tuning {
    /// Near-zero debounce for deterministic tests.
    #[cfg(test)]
    pub(crate) fn immediate() -> Self {
        Self {
            debounce: Duration::from_millis(1),
            ..Self::default()
        }
    }
}
