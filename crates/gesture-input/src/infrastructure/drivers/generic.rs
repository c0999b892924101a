//! Generic driver: synthetic input through a cross-platform library.
//!
//! This is the driver every GUI-capable platform must have.  It is split in
//! two halves:
//!
//! - [`SyntheticBackend`] / [`SyntheticSession`] expose the primitive press,
//!   release, wheel and query calls of some synthetic-input facility.  The
//!   production backend is [`EnigoBackend`]; tests use a recording backend.
//! - [`GenericDriver`] composes those primitives into the driver operations
//!   and owns the timing: an auto-delay after every primitive, a hold between
//!   press and release, the gap between the two halves of a double click, and
//!   reverse-order release for key combos.
//!
//! A session is opened per operation, so no backend state crosses threads.

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use gesture_core::{KeyCode, MouseButton, ScrollDirection};
use crate::application::driver::{
    pause, release_held, signed_notches, DriverError, DriverKind, DriverTimings, InputDriver,
};

/// Press or release half of a button or key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Down,
    Up,
}

/// One open connection to a synthetic-input facility.
pub trait SyntheticSession {
    fn move_abs(&mut self, x: i32, y: i32) -> Result<(), DriverError>;
    fn button(&mut self, button: MouseButton, press: Press) -> Result<(), DriverError>;
    /// Scrolls by `notches`; positive is up.
    fn wheel(&mut self, notches: i32) -> Result<(), DriverError>;
    fn key(&mut self, code: KeyCode, press: Press) -> Result<(), DriverError>;
    fn location(&mut self) -> Result<(i32, i32), DriverError>;
    fn display_size(&mut self) -> Result<(u32, u32), DriverError>;
}

/// Factory for [`SyntheticSession`]s.
pub trait SyntheticBackend: Send + Sync {
    type Session: SyntheticSession;

    fn open(&self) -> Result<Self::Session, DriverError>;
}

/// [`InputDriver`] built from synthetic press/release primitives.
pub struct GenericDriver<B> {
    backend: B,
    timings: DriverTimings,
}

impl<B: SyntheticBackend> GenericDriver<B> {
    pub fn new(backend: B, timings: DriverTimings) -> Self {
        Self { backend, timings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs one primitive, then the auto-delay.
    fn step<T>(
        &self,
        session: &mut B::Session,
        f: impl FnOnce(&mut B::Session) -> Result<T, DriverError>,
    ) -> Result<T, DriverError> {
        let value = f(session)?;
        pause(self.timings.auto_delay);
        Ok(value)
    }

    fn click_cycle(
        &self,
        session: &mut B::Session,
        button: MouseButton,
    ) -> Result<(), DriverError> {
        self.step(session, |s| s.button(button, Press::Down))?;
        pause(self.timings.click_hold);
        self.step(session, |s| s.button(button, Press::Up))
    }
}

impl<B: SyntheticBackend> InputDriver for GenericDriver<B> {
    fn kind(&self) -> DriverKind {
        DriverKind::Generic
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError> {
        let mut session = self.backend.open()?;
        self.step(&mut session, |s| s.move_abs(x, y))
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        let mut session = self.backend.open()?;
        self.click_cycle(&mut session, button)
    }

    fn double_click(&self) -> Result<(), DriverError> {
        let mut session = self.backend.open()?;
        self.click_cycle(&mut session, MouseButton::Left)?;
        pause(self.timings.double_click_gap);
        self.click_cycle(&mut session, MouseButton::Left)
    }

    fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), DriverError> {
        let notches = signed_notches(direction, amount);
        let mut session = self.backend.open()?;
        self.step(&mut session, |s| s.wheel(notches))
    }

    fn press_key(&self, code: KeyCode) -> Result<(), DriverError> {
        let mut session = self.backend.open()?;
        self.step(&mut session, |s| s.key(code, Press::Down))?;
        pause(self.timings.key_hold);
        self.step(&mut session, |s| s.key(code, Press::Up))
    }

    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError> {
        let mut session = self.backend.open()?;
        for (i, &code) in codes.iter().enumerate() {
            if let Err(e) = self.step(&mut session, |s| s.key(code, Press::Down)) {
                // Release whatever is already held so no modifier stays stuck.
                release_held(&codes[..i], |held| session.key(held, Press::Up));
                return Err(e);
            }
        }
        pause(self.timings.combo_hold);
        for &code in codes.iter().rev() {
            self.step(&mut session, |s| s.key(code, Press::Up))?;
        }
        Ok(())
    }

    fn cursor_position(&self) -> Result<(i32, i32), DriverError> {
        self.backend.open()?.location()
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        self.backend.open()?.display_size()
    }
}

// ── enigo backend ─────────────────────────────────────────────────────────────

/// Production backend over `enigo` (SendInput, XTest/libei or CGEvent
/// underneath, depending on the platform).
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoBackend;

pub struct EnigoSession(Enigo);

impl SyntheticBackend for EnigoBackend {
    type Session = EnigoSession;

    fn open(&self) -> Result<EnigoSession, DriverError> {
        Enigo::new(&Settings::default())
            .map(EnigoSession)
            .map_err(|e| DriverError::CallFailed(format!("enigo connection failed: {e}")))
    }
}

fn enigo_err(e: enigo::InputError) -> DriverError {
    DriverError::CallFailed(e.to_string())
}

fn direction(press: Press) -> Direction {
    match press {
        Press::Down => Direction::Press,
        Press::Up => Direction::Release,
    }
}

/// Maps a [`KeyCode`] to the matching `enigo` key.
pub fn to_enigo_key(code: KeyCode) -> Key {
    use KeyCode::*;
    match code {
        Backspace => Key::Backspace,
        Tab => Key::Tab,
        Enter => Key::Return,
        Escape => Key::Escape,
        Space => Key::Space,
        Delete => Key::Delete,
        ArrowLeft => Key::LeftArrow,
        ArrowUp => Key::UpArrow,
        ArrowRight => Key::RightArrow,
        ArrowDown => Key::DownArrow,
        Shift => Key::Shift,
        Control => Key::Control,
        Alt => Key::Alt,
        Meta => Key::Meta,
        F1 => Key::F1,
        F2 => Key::F2,
        F3 => Key::F3,
        F4 => Key::F4,
        F5 => Key::F5,
        // Letters and digits: the virtual-key value is the ASCII upper-case
        // character.
        other => Key::Unicode((other.code() as u8 as char).to_ascii_lowercase()),
    }
}

impl SyntheticSession for EnigoSession {
    fn move_abs(&mut self, x: i32, y: i32) -> Result<(), DriverError> {
        self.0.move_mouse(x, y, Coordinate::Abs).map_err(enigo_err)
    }

    fn button(&mut self, button: MouseButton, press: Press) -> Result<(), DriverError> {
        let button = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        };
        self.0.button(button, direction(press)).map_err(enigo_err)
    }

    fn wheel(&mut self, notches: i32) -> Result<(), DriverError> {
        // enigo scrolls down for positive lengths.
        self.0.scroll(-notches, Axis::Vertical).map_err(enigo_err)
    }

    fn key(&mut self, code: KeyCode, press: Press) -> Result<(), DriverError> {
        self.0.key(to_enigo_key(code), direction(press)).map_err(enigo_err)
    }

    fn location(&mut self) -> Result<(i32, i32), DriverError> {
        self.0.location().map_err(enigo_err)
    }

    fn display_size(&mut self) -> Result<(u32, u32), DriverError> {
        let (w, h) = self.0.main_display().map_err(enigo_err)?;
        match (u32::try_from(w), u32::try_from(h)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(DriverError::CallFailed(format!("invalid display size {w}x{h}"))),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::drivers::mock::{RecordingBackend, SyntheticEvent};
    use std::time::{Duration, Instant};

    fn driver() -> GenericDriver<RecordingBackend> {
        GenericDriver::new(RecordingBackend::default(), DriverTimings::immediate())
    }

    #[test]
    fn test_click_is_press_then_release() {
        // Arrange
        let drv = driver();

        // Act
        drv.click(MouseButton::Right).unwrap();

        // Assert
        assert_eq!(
            drv.backend().events(),
            vec![
                SyntheticEvent::Button(MouseButton::Right, Press::Down),
                SyntheticEvent::Button(MouseButton::Right, Press::Up),
            ]
        );
    }

    #[test]
    fn test_double_click_is_two_left_cycles() {
        let drv = driver();

        drv.double_click().unwrap();

        let down = SyntheticEvent::Button(MouseButton::Left, Press::Down);
        let up = SyntheticEvent::Button(MouseButton::Left, Press::Up);
        assert_eq!(drv.backend().events(), vec![down, up, down, up]);
    }

    #[test]
    fn test_click_holds_between_press_and_release() {
        // Arrange
        let timings = DriverTimings {
            click_hold: Duration::from_millis(50),
            ..DriverTimings::immediate()
        };
        let drv = GenericDriver::new(RecordingBackend::default(), timings);

        // Act
        let start = Instant::now();
        drv.click(MouseButton::Left).unwrap();

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_scroll_up_is_positive_notches() {
        let drv = driver();

        drv.scroll(ScrollDirection::Up, 3).unwrap();
        drv.scroll(ScrollDirection::Down, 2).unwrap();

        assert_eq!(
            drv.backend().events(),
            vec![SyntheticEvent::Wheel(3), SyntheticEvent::Wheel(-2)]
        );
    }

    #[test]
    fn test_huge_scroll_is_clamped() {
        let drv = driver();

        drv.scroll(ScrollDirection::Down, u32::MAX).unwrap();

        assert_eq!(drv.backend().events(), vec![SyntheticEvent::Wheel(-100)]);
    }

    #[test]
    fn test_combo_releases_in_reverse_order() {
        // Arrange
        let drv = driver();

        // Act
        drv.press_combo(&[KeyCode::Control, KeyCode::Shift, KeyCode::KeyT]).unwrap();

        // Assert
        use KeyCode::*;
        assert_eq!(
            drv.backend().events(),
            vec![
                SyntheticEvent::Key(Control, Press::Down),
                SyntheticEvent::Key(Shift, Press::Down),
                SyntheticEvent::Key(KeyT, Press::Down),
                SyntheticEvent::Key(KeyT, Press::Up),
                SyntheticEvent::Key(Shift, Press::Up),
                SyntheticEvent::Key(Control, Press::Up),
            ]
        );
    }

    #[test]
    fn test_combo_failure_releases_held_keys() {
        // Arrange – the third primitive (KeyC down) fails
        let drv =
            GenericDriver::new(RecordingBackend::failing_after(2), DriverTimings::immediate());

        // Act
        let result = drv.press_combo(&[KeyCode::Control, KeyCode::Alt, KeyCode::KeyC]);

        // Assert
        assert!(result.is_err());
        let events = drv.backend().events();
        assert_eq!(events.len(), 2, "only the successful downs are recorded: {events:?}");
        assert_eq!(drv.backend().release_attempts(), vec![KeyCode::Alt, KeyCode::Control]);
    }

    #[test]
    fn test_unavailable_backend_fails_every_operation() {
        let drv = GenericDriver::new(RecordingBackend::unavailable(), DriverTimings::immediate());

        assert!(drv.move_to(1, 1).is_err());
        assert!(drv.screen_size().is_err());
        assert!(drv.cursor_position().is_err());
    }

    #[test]
    fn test_queries_come_from_backend() {
        let drv = driver();

        assert_eq!(drv.screen_size().unwrap(), (2560, 1440));
        drv.move_to(42, 24).unwrap();
        assert_eq!(drv.cursor_position().unwrap(), (42, 24));
    }

    #[test]
    fn test_to_enigo_key_letters_are_lowercase_unicode() {
        assert_eq!(to_enigo_key(KeyCode::KeyC), Key::Unicode('c'));
        assert_eq!(to_enigo_key(KeyCode::Digit7), Key::Unicode('7'));
        assert_eq!(to_enigo_key(KeyCode::Enter), Key::Return);
        assert_eq!(to_enigo_key(KeyCode::Meta), Key::Meta);
    }
}
