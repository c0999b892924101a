//! Per-action debounce gate.
//!
//! A held "click" pose produces a click request on every camera frame.
//! Without a gate the OS would receive dozens of clicks per second.
//! [`ActionCooldown`] remembers when each [`ActionKind`] last fired and lets
//! it fire again only once the window has elapsed.
//!
//! # Atomicity
//!
//! The check and the write happen under one lock, so two concurrent callers
//! can never both pass the gate for the same kind.  A suppressed call does not
//! touch the table: the window is measured from the last *permitted* fire.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use super::command::ActionKind;

/// Default minimum spacing between two fires of the same action kind.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(100);

/// Thread-safe last-fire table keyed by [`ActionKind`].
#[derive(Debug)]
pub struct ActionCooldown {
    window: Duration,
    last_fired: Mutex<HashMap<ActionKind, Instant>>,
}

impl Default for ActionCooldown {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl ActionCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks and records a fire of `kind` at the current instant.
    ///
    /// Returns `true` if the action may proceed.
    pub fn try_fire(&self, kind: ActionKind) -> bool {
        self.try_fire_at(kind, Instant::now())
    }

    /// Same as [`try_fire`](Self::try_fire) with an explicit clock reading.
    pub fn try_fire_at(&self, kind: ActionKind, now: Instant) -> bool {
        // The table only holds timestamps; a panic elsewhere cannot leave it torn.
        let mut table = self.last_fired.lock().unwrap_or_else(PoisonError::into_inner);
        let permitted = match table.get(&kind) {
            None => true,
            Some(&last) => now.saturating_duration_since(last) >= self.window,
        };
        if permitted {
            table.insert(kind, now);
        } else {
            debug!(action = %kind, "suppressed by cooldown");
        }
        permitted
    }
}
