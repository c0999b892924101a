//! Recording doubles for tests.
//!
//! The real drivers move the test machine's pointer, need a desktop session,
//! and leave nothing observable behind.  These doubles replace the OS with
//! in-memory recording so tests can assert exactly what was emitted and in
//! what order.
//!
//! - [`RecordingDriver`] stands in for a whole [`InputDriver`]; use it to
//!   test the chain and the facade.
//! - [`RecordingBackend`] stands in for a synthetic-input facility under a
//!   real [`GenericDriver`](super::generic::GenericDriver); use it to test
//!   primitive ordering (combo release order, scroll sign, click cycles).
//!
//! Both support injected failure so fallthrough paths can be exercised.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use gesture_core::{KeyCode, MouseButton, ScrollDirection};

use super::generic::{Press, SyntheticBackend, SyntheticSession};
use crate::application::driver::{pause, DriverError, DriverKind, InputDriver};

// ── RecordingDriver ───────────────────────────────────────────────────────────

/// One successful driver operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    MoveTo(i32, i32),
    Click(MouseButton),
    DoubleClick,
    Scroll(ScrollDirection, u32),
    KeyPress(KeyCode),
    Combo(Vec<KeyCode>),
}

/// An [`InputDriver`] that records operations instead of performing them.
///
/// While failing, every call returns [`DriverError::CallFailed`] and records
/// nothing, but still counts toward [`RecordingDriver::call_count`].
pub struct RecordingDriver {
    kind: DriverKind,
    events: Mutex<Vec<DriverEvent>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    cursor: Mutex<(i32, i32)>,
    screen: (u32, u32),
    click_delay: Duration,
}

impl RecordingDriver {
    pub fn new(kind: DriverKind) -> Self {
        Self {
            kind,
            events: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            cursor: Mutex::new((0, 0)),
            screen: (2560, 1440),
            click_delay: Duration::ZERO,
        }
    }

    /// A driver that fails every call until [`set_failing`](Self::set_failing)
    /// turns it back on.
    pub fn failing(kind: DriverKind) -> Self {
        let driver = Self::new(kind);
        driver.set_failing(true);
        driver
    }

    /// Makes clicks block for `delay`, like a real press/hold/release.
    pub fn with_click_delay(mut self, delay: Duration) -> Self {
        self.click_delay = delay;
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = (width, height);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful operations in call order.
    pub fn events(&self) -> Vec<DriverEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Every call made, successful or not, queries included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), DriverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DriverError::CallFailed(format!("injected {} failure", self.kind)));
        }
        Ok(())
    }

    fn record(&self, event: DriverEvent) -> Result<(), DriverError> {
        self.enter()?;
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
        Ok(())
    }
}

impl InputDriver for RecordingDriver {
    fn kind(&self) -> DriverKind {
        self.kind
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError> {
        self.record(DriverEvent::MoveTo(x, y))?;
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner) = (x, y);
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        pause(self.click_delay);
        self.record(DriverEvent::Click(button))
    }

    fn double_click(&self) -> Result<(), DriverError> {
        pause(self.click_delay);
        self.record(DriverEvent::DoubleClick)
    }

    fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), DriverError> {
        self.record(DriverEvent::Scroll(direction, amount))
    }

    fn press_key(&self, code: KeyCode) -> Result<(), DriverError> {
        self.record(DriverEvent::KeyPress(code))
    }

    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError> {
        self.record(DriverEvent::Combo(codes.to_vec()))
    }

    fn cursor_position(&self) -> Result<(i32, i32), DriverError> {
        self.enter()?;
        Ok(*self.cursor.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        self.enter()?;
        Ok(self.screen)
    }
}

// ── RecordingBackend ──────────────────────────────────────────────────────────

/// One synthetic primitive that reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    Move(i32, i32),
    Button(MouseButton, Press),
    /// Wheel notches, positive up.
    Wheel(i32),
    Key(KeyCode, Press),
}

#[derive(Default)]
struct BackendState {
    events: Vec<SyntheticEvent>,
    release_attempts: Vec<KeyCode>,
    primitives: usize,
    cursor: (i32, i32),
}

/// A [`SyntheticBackend`] that records primitives.
///
/// Clones share the same recording, so a test can keep one clone while the
/// driver owns another.
#[derive(Clone)]
pub struct RecordingBackend {
    state: Arc<Mutex<BackendState>>,
    available: bool,
    fail_after: Option<usize>,
    screen: (u32, u32),
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            available: true,
            fail_after: None,
            screen: (2560, 1440),
        }
    }
}

impl RecordingBackend {
    /// A backend whose sessions cannot be opened.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// A backend whose first `n` primitives succeed and the rest fail.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Primitives that succeeded, in order.
    pub fn events(&self) -> Vec<SyntheticEvent> {
        self.lock().events.clone()
    }

    /// Every key release requested, including failed ones.
    pub fn release_attempts(&self) -> Vec<KeyCode> {
        self.lock().release_attempts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SyntheticBackend for RecordingBackend {
    type Session = RecordingSession;

    fn open(&self) -> Result<RecordingSession, DriverError> {
        if !self.available {
            return Err(DriverError::CallFailed("no synthetic input session".into()));
        }
        Ok(RecordingSession {
            backend: self.clone(),
        })
    }
}

pub struct RecordingSession {
    backend: RecordingBackend,
}

impl RecordingSession {
    fn emit(&mut self, event: SyntheticEvent) -> Result<(), DriverError> {
        let mut state = self.backend.lock();
        if let SyntheticEvent::Key(code, Press::Up) = event {
            state.release_attempts.push(code);
        }
        state.primitives += 1;
        if self.backend.fail_after.is_some_and(|n| state.primitives > n) {
            return Err(DriverError::CallFailed("injected primitive failure".into()));
        }
        if let SyntheticEvent::Move(x, y) = event {
            state.cursor = (x, y);
        }
        state.events.push(event);
        Ok(())
    }
}

impl SyntheticSession for RecordingSession {
    fn move_abs(&mut self, x: i32, y: i32) -> Result<(), DriverError> {
        self.emit(SyntheticEvent::Move(x, y))
    }

    fn button(&mut self, button: MouseButton, press: Press) -> Result<(), DriverError> {
        self.emit(SyntheticEvent::Button(button, press))
    }

    fn wheel(&mut self, notches: i32) -> Result<(), DriverError> {
        self.emit(SyntheticEvent::Wheel(notches))
    }

    fn key(&mut self, code: KeyCode, press: Press) -> Result<(), DriverError> {
        self.emit(SyntheticEvent::Key(code, press))
    }

    fn location(&mut self) -> Result<(i32, i32), DriverError> {
        Ok(self.backend.lock().cursor)
    }

    fn display_size(&mut self) -> Result<(u32, u32), DriverError> {
        Ok(self.backend.screen)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
