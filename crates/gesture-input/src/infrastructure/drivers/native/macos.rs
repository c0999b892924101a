//! macOS native driver: CoreGraphics event posting.
//!
//! Every primitive creates a `CGEvent` from a `CGEventSource` in the
//! HID-system state and posts it at the HID tap, the same level physical
//! input enters.  Quartz global coordinates put the origin at the top-left
//! of the main display, so no Y flip is needed.
//!
//! Posting requires the Accessibility permission (System Settings → Privacy
//! & Security → Accessibility).  Without it event creation still succeeds but
//! the events are dropped; there is no failure code to observe.
//!
//! Core Foundation objects are not `Send`, so event sources are created per
//! call rather than stored.

use core_graphics::display::CGDisplay;
use core_graphics::event::{
    CGEvent, CGEventTapLocation, CGEventType, CGMouseButton, ScrollEventUnit,
};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use gesture_core::{KeyCode, KeyMapper, MouseButton, ScrollDirection};

use crate::application::driver::{
    pause, release_held, signed_notches, DriverError, DriverKind, DriverTimings, InputDriver,
};

pub struct CoreGraphicsNativeDriver {
    timings: DriverTimings,
}

fn source() -> Result<CGEventSource, DriverError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|()| DriverError::CallFailed("CGEventSourceCreate failed".into()))
}

fn created(event: Result<CGEvent, ()>, what: &str) -> Result<CGEvent, DriverError> {
    event.map_err(|()| DriverError::CallFailed(format!("could not create {what} event")))
}

fn mouse_event_types(button: MouseButton) -> (CGEventType, CGEventType, CGMouseButton) {
    match button {
        MouseButton::Left => (
            CGEventType::LeftMouseDown,
            CGEventType::LeftMouseUp,
            CGMouseButton::Left,
        ),
        MouseButton::Right => (
            CGEventType::RightMouseDown,
            CGEventType::RightMouseUp,
            CGMouseButton::Right,
        ),
    }
}

impl CoreGraphicsNativeDriver {
    /// Checks that an event source can be created.
    ///
    /// # Errors
    ///
    /// [`DriverError::CallFailed`] when CoreGraphics refuses an event source.
    pub fn open(timings: DriverTimings) -> Result<Self, DriverError> {
        source()?;
        Ok(Self { timings })
    }

    fn location() -> Result<CGPoint, DriverError> {
        Ok(created(CGEvent::new(source()?), "null")?.location())
    }

    fn post_button(ty: CGEventType, button: CGMouseButton, at: CGPoint) -> Result<(), DriverError> {
        let event = created(CGEvent::new_mouse_event(source()?, ty, at, button), "mouse button")?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn post_key(code: KeyCode, down: bool) -> Result<(), DriverError> {
        let keycode = KeyMapper::to_macos_cgkeycode(code);
        let event = created(CGEvent::new_keyboard_event(source()?, keycode, down), "keyboard")?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn click_cycle(&self, button: MouseButton) -> Result<(), DriverError> {
        let (down, up, cg_button) = mouse_event_types(button);
        let at = Self::location()?;
        Self::post_button(down, cg_button, at)?;
        pause(self.timings.click_hold);
        Self::post_button(up, cg_button, at)
    }
}

impl InputDriver for CoreGraphicsNativeDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Native
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError> {
        let at = CGPoint::new(f64::from(x), f64::from(y));
        let event = created(
            CGEvent::new_mouse_event(source()?, CGEventType::MouseMoved, at, CGMouseButton::Left),
            "mouse move",
        )?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        self.click_cycle(button)
    }

    fn double_click(&self) -> Result<(), DriverError> {
        self.click_cycle(MouseButton::Left)?;
        pause(self.timings.double_click_gap);
        self.click_cycle(MouseButton::Left)
    }

    fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), DriverError> {
        let lines = signed_notches(direction, amount);
        let event = created(
            CGEvent::new_scroll_event(source()?, ScrollEventUnit::LINE, 1, lines, 0, 0),
            "scroll",
        )?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn press_key(&self, code: KeyCode) -> Result<(), DriverError> {
        Self::post_key(code, true)?;
        pause(self.timings.key_hold);
        Self::post_key(code, false)
    }

    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError> {
        for (i, &code) in codes.iter().enumerate() {
            if let Err(e) = Self::post_key(code, true) {
                release_held(&codes[..i], |held| Self::post_key(held, false));
                return Err(e);
            }
        }
        pause(self.timings.combo_hold);
        for &code in codes.iter().rev() {
            Self::post_key(code, false)?;
        }
        Ok(())
    }

    fn cursor_position(&self) -> Result<(i32, i32), DriverError> {
        let at = Self::location()?;
        Ok((at.x as i32, at.y as i32))
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        let main = CGDisplay::main();
        let (w, h) = (main.pixels_wide(), main.pixels_high());
        match (u32::try_from(w), u32::try_from(h)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(DriverError::CallFailed(format!("invalid main display size {w}x{h}"))),
        }
    }
}
