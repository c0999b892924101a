//! InputService: the single entry point the surrounding service calls.
//!
//! Every operation follows the same shape:
//!
//! 1. Discrete actions (clicks, scroll, keys) ask the [`ActionCooldown`] for a
//!    permit.  A suppressed action returns `success = false` with the
//!    `"cooldown"` message and never reaches a driver.
//! 2. Smoothed moves damp the target against the last issued position.
//! 3. The [`DriverChain`] tries its drivers in order.
//! 4. The outcome becomes an [`InputResult`].  No operation returns `Err` or
//!    panics into the caller.
//!
//! Clicks and key presses hold for tens of milliseconds, so they run on the
//! [`ActionWorkerPool`] and return an [`ActionHandle`].  Moves and scrolls run
//! on the calling thread.  [`InputService::execute`] is the async entry point
//! and puts every command on the pool, so awaiting it never blocks a runtime
//! worker.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use gesture_core::{
    ActionCooldown, InputCommand, InputResult, KeyCode, MotionSmoother, MouseButton,
    PlatformCapabilities, PointerState, ScreenInfo, ScrollDirection, DEFAULT_COOLDOWN,
    DEFAULT_SMOOTHING_FACTOR,
};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, info};

use super::chain::{DriverChain, DriverSet};
use super::driver::DriverKind;
use super::worker::{ActionHandle, ActionWorkerPool, DEFAULT_WORKER_THREADS};

/// Screen size reported when every driver fails the query.
pub const FALLBACK_SCREEN_SIZE: (u32, u32) = (1920, 1080);
/// Cursor position reported when every driver fails the query.
pub const FALLBACK_CURSOR: (i32, i32) = (0, 0);

/// Errors raised while constructing a service.  Operations never fail.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no tokio runtime is available for the action worker pool")]
    NoRuntime,
    #[error("invalid service options: {0}")]
    InvalidOptions(String),
}

/// Tuning knobs for the facade itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceOptions {
    pub smoothing_factor: f64,
    pub cooldown_window: Duration,
    pub worker_threads: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            cooldown_window: DEFAULT_COOLDOWN,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

/// Performs admitted commands against the driver chain.
///
/// Cheap to clone, so a copy can move into a worker job.
#[derive(Clone)]
struct ActionRunner {
    chain: DriverChain,
    smoother: MotionSmoother,
    pointer: Arc<Mutex<PointerState>>,
}

impl ActionRunner {
    fn pointer_state(&self) -> PointerState {
        *self.pointer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn perform(&self, command: &InputCommand) -> InputResult {
        let tag = command.action_tag();
        let (outcome, message) = match command {
            InputCommand::Move { x, y } => {
                let (sx, sy) = self.smoother.smooth(self.pointer_state(), *x, *y);
                return self.move_and_record(sx, sy, tag);
            }
            InputCommand::MoveImmediate { x, y } => return self.move_and_record(*x, *y, tag),
            InputCommand::Click { button } => (
                self.chain.run("click", |d| d.click(*button)),
                format!("{} click executed", capitalize(button.to_string())),
            ),
            InputCommand::DoubleClick => (
                self.chain.run("double_click", |d| d.double_click()),
                "Double click executed".to_string(),
            ),
            InputCommand::Scroll { direction, amount } => (
                self.chain.run("scroll", |d| d.scroll(*direction, *amount)),
                format!("Scrolled {direction} by {amount}"),
            ),
            InputCommand::KeyPress { code } => (
                self.chain.run("press_key", |d| d.press_key(*code)),
                format!("Key pressed: {code}"),
            ),
            InputCommand::KeyCombo { codes } => (
                self.chain.run("press_combo", |d| d.press_combo(codes)),
                format!("Key combination pressed: {}", KeyCode::combo_name(codes)),
            ),
        };
        match outcome {
            Ok(((), driver)) => {
                debug!(%driver, action = %tag, "action executed");
                InputResult::ok(message, tag)
            }
            Err(e) => InputResult::failed(e.to_string()),
        }
    }

    /// The pointer state records the issued position, and only when a driver
    /// performed the move.
    fn move_and_record(&self, x: i32, y: i32, tag: String) -> InputResult {
        match self.chain.run("move_to", |d| d.move_to(x, y)) {
            Ok(((), driver)) => {
                let mut pointer = self.pointer.lock().unwrap_or_else(PoisonError::into_inner);
                *pointer = PointerState::new(x, y);
                debug!(%driver, x, y, "pointer moved");
                InputResult::ok(format!("Mouse moved to ({x}, {y})"), tag)
            }
            Err(e) => InputResult::failed(e.to_string()),
        }
    }
}

/// Facade over capability snapshot, driver chain, smoother and cooldown.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct InputService {
    capabilities: PlatformCapabilities,
    runner: ActionRunner,
    cooldown: ActionCooldown,
    workers: ActionWorkerPool,
}

impl InputService {
    /// Builds a service from an already-probed capability snapshot.
    ///
    /// `runtime` executes background actions; it may belong to a runtime
    /// other than the caller's.
    pub fn new(
        capabilities: PlatformCapabilities,
        drivers: DriverSet,
        options: ServiceOptions,
        runtime: Handle,
    ) -> Self {
        let chain = DriverChain::new(&capabilities, drivers);
        info!(%capabilities, drivers = ?chain.kinds(), "input service ready");
        Self {
            capabilities,
            runner: ActionRunner {
                chain,
                smoother: MotionSmoother::new(options.smoothing_factor),
                pointer: Arc::new(Mutex::new(PointerState::default())),
            },
            cooldown: ActionCooldown::new(options.cooldown_window),
            workers: ActionWorkerPool::new(runtime, options.worker_threads),
        }
    }

    /// Like [`InputService::new`], using the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NoRuntime`] when called outside a tokio runtime.
    pub fn with_current_runtime(
        capabilities: PlatformCapabilities,
        drivers: DriverSet,
        options: ServiceOptions,
    ) -> Result<Self, ServiceError> {
        let runtime = Handle::try_current().map_err(|_| ServiceError::NoRuntime)?;
        Ok(Self::new(capabilities, drivers, options, runtime))
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    pub fn native_api_available(&self) -> bool {
        self.capabilities.native_api_available
    }

    /// Driver kinds in the order they are tried.
    pub fn driver_order(&self) -> Vec<DriverKind> {
        self.runner.chain.kinds()
    }

    /// Last position issued by a move; the smoothing anchor.
    pub fn pointer_state(&self) -> PointerState {
        self.runner.pointer_state()
    }

    /// Primary screen size, or 1920×1080 if no driver can answer.
    pub fn screen_size(&self) -> (u32, u32) {
        self.runner
            .chain
            .run("screen_size", |d| d.screen_size())
            .map(|(size, _)| size)
            .unwrap_or(FALLBACK_SCREEN_SIZE)
    }

    /// Pointer position, or (0, 0) if no driver can answer.
    pub fn cursor_position(&self) -> (i32, i32) {
        self.runner
            .chain
            .run("cursor_position", |d| d.cursor_position())
            .map(|(pos, _)| pos)
            .unwrap_or(FALLBACK_CURSOR)
    }

    pub fn screen_info(&self) -> ScreenInfo {
        let (width, height) = self.screen_size();
        let (cursor_x, cursor_y) = self.cursor_position();
        ScreenInfo {
            width,
            height,
            cursor_x,
            cursor_y,
        }
    }

    // ── Calling-thread operations ─────────────────────────────────────────

    /// Moves toward `(x, y)` with exponential damping.
    ///
    /// The pointer state records the smoothed position, not the raw target.
    pub fn move_smooth(&self, x: i32, y: i32) -> InputResult {
        self.runner.perform(&InputCommand::Move { x, y })
    }

    /// Moves straight to `(x, y)` without smoothing.
    pub fn move_immediate(&self, x: i32, y: i32) -> InputResult {
        self.runner.perform(&InputCommand::MoveImmediate { x, y })
    }

    /// Scrolls `amount` wheel notches.
    pub fn scroll(&self, direction: ScrollDirection, amount: u32) -> InputResult {
        let command = InputCommand::Scroll { direction, amount };
        match self.admit(&command) {
            Some(rejected) => rejected,
            None => self.runner.perform(&command),
        }
    }

    // ── Background operations ─────────────────────────────────────────────

    /// Clicks `button` on the worker pool.
    ///
    /// The cooldown is checked before submission, so of two clicks arriving
    /// within the window only the first is ever queued.
    pub fn click(&self, button: MouseButton) -> ActionHandle {
        self.submit(InputCommand::Click { button })
    }

    /// Double left click on the worker pool.
    pub fn double_click(&self) -> ActionHandle {
        self.submit(InputCommand::DoubleClick)
    }

    /// Presses and releases one key on the worker pool.
    pub fn press_key(&self, code: KeyCode) -> ActionHandle {
        self.submit(InputCommand::KeyPress { code })
    }

    /// Presses `codes` in order and releases them in reverse, on the worker
    /// pool.
    ///
    /// An empty slice is rejected without consuming the cooldown.
    pub fn press_combo(&self, codes: &[KeyCode]) -> ActionHandle {
        self.submit(InputCommand::KeyCombo {
            codes: codes.to_vec(),
        })
    }

    // ── Command dispatch ──────────────────────────────────────────────────

    /// Executes one command off the calling task and waits for it.
    pub async fn execute(&self, command: &InputCommand) -> InputResult {
        self.submit(command.clone()).await
    }

    /// Returns the result for a command that must not reach a driver.
    fn admit(&self, command: &InputCommand) -> Option<InputResult> {
        if let InputCommand::KeyCombo { codes } = command {
            if codes.is_empty() {
                return Some(InputResult::failed("empty key combination"));
            }
        }
        match command.cooldown_kind() {
            Some(kind) if !self.cooldown.try_fire(kind) => Some(InputResult::cooldown()),
            _ => None,
        }
    }

    fn submit(&self, command: InputCommand) -> ActionHandle {
        if let Some(rejected) = self.admit(&command) {
            return ActionHandle::ready(rejected);
        }
        let runner = self.runner.clone();
        self.workers.submit(move || runner.perform(&command))
    }
}

fn capitalize(s: String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => s,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
