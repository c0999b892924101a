//! The driver contract shared by every input mechanism.
//!
//! A driver is one way of producing OS input: the platform's direct API
//! (native), a cross-platform synthetic-input library (generic), or nothing at
//! all (simulation).  All three expose the same operation set so the facade can
//! try them in order without knowing which one it holds.
//!
//! # Failure is a value
//!
//! An `Err` from a driver means "not performed, try the next driver".  It is
//! never fatal: the chain recovers it, and the facade turns an exhausted chain
//! into an unsuccessful `InputResult`.

use std::fmt;
use std::time::Duration;

use gesture_core::{KeyCode, MouseButton, ScrollDirection};
use thiserror::Error;
use tracing::warn;

/// One notch of a standard scroll wheel in OS wheel-delta units.
pub const WHEEL_DELTA: i32 = 120;

/// Upper bound on wheel notches issued by one scroll call.
pub const MAX_SCROLL_NOTCHES: u32 = 100;

/// Why a driver did not perform an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The driver has no implementation of this operation on this platform.
    #[error("operation not supported by this driver")]
    Unsupported,
    /// The OS call returned a failure code or the backend reported an error.
    #[error("driver call failed: {0}")]
    CallFailed(String),
    /// The key has no code on this platform's keyboard mapping.
    #[error("no platform key code for {0:?}")]
    UnmappedKey(KeyCode),
}

/// Which mechanism a driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    Native,
    Generic,
    Simulation,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DriverKind::Native => "native",
            DriverKind::Generic => "generic",
            DriverKind::Simulation => "simulation",
        })
    }
}

/// Delays inserted between primitive events.
///
/// OSes coalesce or drop button transitions that arrive too close together,
/// so clicks hold the button for a short time between press and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTimings {
    /// Press to release for one click.
    pub click_hold: Duration,
    /// Gap between the two click cycles of a double click.
    pub double_click_gap: Duration,
    /// Pause after every synthetic primitive (generic driver only).
    pub auto_delay: Duration,
    /// Press to release for a single key.
    pub key_hold: Duration,
    /// Hold once every key of a combo is down.
    pub combo_hold: Duration,
}

impl Default for DriverTimings {
    fn default() -> Self {
        Self {
            click_hold: Duration::from_millis(50),
            double_click_gap: Duration::from_millis(100),
            auto_delay: Duration::from_millis(10),
            key_hold: Duration::from_millis(50),
            combo_hold: Duration::from_millis(50),
        }
    }
}

impl DriverTimings {
    /// All delays zero; used by tests that record events.
    pub fn immediate() -> Self {
        Self {
            click_hold: Duration::ZERO,
            double_click_gap: Duration::ZERO,
            auto_delay: Duration::ZERO,
            key_hold: Duration::ZERO,
            combo_hold: Duration::ZERO,
        }
    }
}

/// Sleeps for `d` unless it is zero.
pub(crate) fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}

/// Platform-agnostic input driver.
///
/// Implementations block for the duration of the OS event sequence (a click
/// sleeps between press and release), so the facade runs click-type calls on
/// its worker pool.
pub trait InputDriver: Send + Sync {
    /// Which mechanism this driver uses.
    fn kind(&self) -> DriverKind;

    /// Moves the pointer to absolute screen coordinates.
    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError>;

    /// Presses and releases `button` at the current pointer position.
    fn click(&self, button: MouseButton) -> Result<(), DriverError>;

    /// Two left clicks separated by the double-click gap.
    ///
    /// Drivers without a dedicated implementation report `Unsupported` so the
    /// chain moves on.
    fn double_click(&self) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    /// Scrolls the wheel by `amount` notches in `direction`.
    fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), DriverError>;

    /// Presses and releases a single key.
    fn press_key(&self, code: KeyCode) -> Result<(), DriverError>;

    /// Presses `codes` in order, holds, then releases them in reverse order.
    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError>;

    /// Current pointer position.
    fn cursor_position(&self) -> Result<(i32, i32), DriverError>;

    /// Primary screen size in pixels.
    fn screen_size(&self) -> Result<(u32, u32), DriverError>;
}

/// `amount` clamped to [`MAX_SCROLL_NOTCHES`].
pub fn scroll_notches(amount: u32) -> u32 {
    amount.min(MAX_SCROLL_NOTCHES)
}

/// Signed notch count, positive for up, clamped like [`scroll_notches`].
pub fn signed_notches(direction: ScrollDirection, amount: u32) -> i32 {
    // MAX_SCROLL_NOTCHES fits in an i32.
    scroll_notches(amount) as i32 * direction.sign()
}

/// Releases `held` in reverse order after a combo failed part-way.
///
/// Every key is attempted; failures are logged, not returned, since the
/// combo's own error is what the caller reports.
pub fn release_held<F>(held: &[KeyCode], mut release: F)
where
    F: FnMut(KeyCode) -> Result<(), DriverError>,
{
    for &key in held.iter().rev() {
        if let Err(e) = release(key) {
            warn!(%key, error = %e, "failed to release key after combo error");
        }
    }
}

/// Signed wheel delta in OS units: `amount` notches, positive for up.
pub fn wheel_delta(direction: ScrollDirection, amount: u32) -> i32 {
    signed_notches(direction, amount) * WHEEL_DELTA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_delta_is_signed_by_direction() {
        assert_eq!(wheel_delta(ScrollDirection::Up, 3), 360);
        assert_eq!(wheel_delta(ScrollDirection::Down, 3), -360);
    }

    #[test]
    fn test_huge_scroll_amounts_are_clamped() {
        assert_eq!(scroll_notches(u32::MAX), MAX_SCROLL_NOTCHES);
        assert_eq!(scroll_notches(7), 7);
        assert_eq!(signed_notches(ScrollDirection::Down, u32::MAX), -100);
        assert_eq!(wheel_delta(ScrollDirection::Up, u32::MAX), 100 * WHEEL_DELTA);
    }

    #[test]
    fn test_release_held_goes_in_reverse_and_survives_failures() {
        // Arrange
        let mut attempts = Vec::new();

        // Act – the middle release fails
        release_held(&[KeyCode::Control, KeyCode::Shift, KeyCode::Alt], |key| {
            attempts.push(key);
            if key == KeyCode::Shift {
                Err(DriverError::CallFailed("XTestFakeKeyEvent failed".into()))
            } else {
                Ok(())
            }
        });

        // Assert
        assert_eq!(attempts, vec![KeyCode::Alt, KeyCode::Shift, KeyCode::Control]);
    }

    #[test]
    fn test_default_timings_match_click_expectations() {
        let t = DriverTimings::default();
        assert_eq!(t.click_hold, Duration::from_millis(50));
        assert_eq!(t.double_click_gap, Duration::from_millis(100));
        assert_eq!(t.auto_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_driver_kind_display() {
        assert_eq!(DriverKind::Native.to_string(), "native");
        assert_eq!(DriverKind::Simulation.to_string(), "simulation");
    }
}
