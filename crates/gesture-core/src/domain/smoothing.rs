//! Exponential damping of pointer targets.
//!
//! Coordinates derived from hand landmarks jitter by a few pixels from one
//! camera frame to the next.  Instead of jumping to each raw target, the
//! pointer moves a fixed fraction `α` of the remaining distance:
//!
//! ```text
//! next = last + (target - last) * α      (truncated toward zero)
//! ```
//!
//! With `α = 0.3` the pointer covers ~97% of a jump within ten frames, which
//! at 30 fps is well under the threshold where lag becomes noticeable.

use serde::{Deserialize, Serialize};

/// Default damping factor `α`.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Last pointer position issued by the facade; the anchor for smoothing.
///
/// Always holds the last *smoothed* target, never the raw one (except after
/// an immediate move, which writes the raw target on purpose).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerState {
    pub last_x: i32,
    pub last_y: i32,
}

impl PointerState {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            last_x: x,
            last_y: y,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }
}

/// Stateless smoothing function parameterised by `α`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSmoother {
    factor: f64,
}

impl Default for MotionSmoother {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl MotionSmoother {
    /// Creates a smoother with damping factor `factor`.
    ///
    /// Values outside `(0, 1]` are clamped into that range; `1.0` disables
    /// smoothing entirely.
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(f64::EPSILON, 1.0)
        } else {
            DEFAULT_SMOOTHING_FACTOR
        };
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns the damped position between `anchor` and `target`.
    pub fn smooth(&self, anchor: PointerState, x: i32, y: i32) -> (i32, i32) {
        (
            damp(anchor.last_x, x, self.factor),
            damp(anchor.last_y, y, self.factor),
        )
    }
}

fn damp(last: i32, target: i32, factor: f64) -> i32 {
    let last = f64::from(last);
    let delta = f64::from(target) - last;
    // `as` truncates toward zero and saturates at the i32 bounds.
    (last + delta * factor) as i32
}
