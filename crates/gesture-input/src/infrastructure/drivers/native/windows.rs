//! Windows native driver: Win32 cursor and `SendInput`.
//!
//! - Move: `SetCursorPos` with absolute pixel coordinates.
//! - Buttons and wheel: `SendInput` with `MOUSEINPUT`.  Wheel data is in
//!   `WHEEL_DELTA` (120) units per notch, positive away from the user (up).
//! - Keys: `SendInput` with `KEYBDINPUT` carrying the virtual-key code.
//! - Queries: `GetCursorPos` and `GetSystemMetrics(SM_CXSCREEN/SM_CYSCREEN)`.
//!
//! `SendInput` returns the number of events it inserted; anything short of
//! the requested count (UIPI blocking, a secure desktop) is a failed call.

use gesture_core::{KeyCode, KeyMapper, MouseButton, ScrollDirection};
use windows::core::w;
use windows::Win32::Foundation::{FreeLibrary, POINT};
use windows::Win32::System::LibraryLoader::LoadLibraryW;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL, MOUSEINPUT, MOUSE_EVENT_FLAGS,
    VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
};

use crate::application::driver::{
    pause, wheel_delta, DriverError, DriverKind, DriverTimings, InputDriver,
};

pub struct WindowsNativeDriver {
    timings: DriverTimings,
}

impl WindowsNativeDriver {
    /// Verifies that `user32.dll` can be loaded.
    ///
    /// # Errors
    ///
    /// [`DriverError::CallFailed`] when the library cannot be loaded.
    pub fn open(timings: DriverTimings) -> Result<Self, DriverError> {
        // SAFETY: the argument is a static NUL-terminated wide string.
        let module = unsafe { LoadLibraryW(w!("user32.dll")) }
            .map_err(|e| DriverError::CallFailed(format!("LoadLibraryW(user32.dll): {e}")))?;
        // SAFETY: `module` was returned by LoadLibraryW above and is released once.
        let _ = unsafe { FreeLibrary(module) };
        Ok(Self { timings })
    }
}

fn mouse_input(flags: MOUSE_EVENT_FLAGS, data: i32) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                // Wheel data is a signed quantity carried in a DWORD.
                mouseData: data as u32,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn key_input(code: KeyCode, up: bool) -> INPUT {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if up {
        flags |= KEYEVENTF_KEYUP;
    }
    if is_extended(code) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(KeyMapper::to_windows_vk(code)),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Keys on the extended part of the keyboard need `KEYEVENTF_EXTENDEDKEY`.
fn is_extended(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::ArrowLeft
            | KeyCode::ArrowUp
            | KeyCode::ArrowRight
            | KeyCode::ArrowDown
            | KeyCode::Delete
            | KeyCode::Meta
    )
}

fn send(inputs: &[INPUT]) -> Result<(), DriverError> {
    // SAFETY: every INPUT is fully initialised and the size matches the struct.
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize == inputs.len() {
        Ok(())
    } else {
        Err(DriverError::CallFailed(format!(
            "SendInput inserted {sent} of {} events",
            inputs.len()
        )))
    }
}

fn button_flags(button: MouseButton) -> (MOUSE_EVENT_FLAGS, MOUSE_EVENT_FLAGS) {
    match button {
        MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
        MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
    }
}

impl WindowsNativeDriver {
    fn click_cycle(&self, button: MouseButton) -> Result<(), DriverError> {
        let (down, up) = button_flags(button);
        send(&[mouse_input(down, 0)])?;
        pause(self.timings.click_hold);
        send(&[mouse_input(up, 0)])
    }
}

impl InputDriver for WindowsNativeDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Native
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError> {
        // SAFETY: SetCursorPos takes plain integers.
        unsafe { SetCursorPos(x, y) }
            .map_err(|e| DriverError::CallFailed(format!("SetCursorPos: {e}")))
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
        send(&[mouse_input(MOUSEEVENTF_WHEEL, wheel_delta(direction, amount))])
    }

    fn press_key(&self, code: KeyCode) -> Result<(), DriverError> {
        send(&[key_input(code, false)])?;
        pause(self.timings.key_hold);
        send(&[key_input(code, true)])
    }

    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError> {
        let downs: Vec<INPUT> = codes.iter().map(|&c| key_input(c, false)).collect();
        let ups: Vec<INPUT> = codes.iter().rev().map(|&c| key_input(c, true)).collect();
        let pressed = send(&downs);
        pause(self.timings.combo_hold);
        // Release even after a partial press so no modifier stays down.
        let released = send(&ups);
        pressed.and(released)
    }

    fn cursor_position(&self) -> Result<(i32, i32), DriverError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT.
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| DriverError::CallFailed(format!("GetCursorPos: {e}")))?;
        Ok((point.x, point.y))
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        // SAFETY: GetSystemMetrics has no preconditions.
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        if w <= 0 || h <= 0 {
            return Err(DriverError::CallFailed("GetSystemMetrics returned 0".into()));
        }
        Ok((w as u32, h as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_input_carries_signed_delta() {
        let input = mouse_input(MOUSEEVENTF_WHEEL, wheel_delta(ScrollDirection::Down, 1));
        // SAFETY: the union was initialised through the `mi` member.
        let data = unsafe { input.Anonymous.mi.mouseData };
        assert_eq!(data as i32, -120);
    }

    #[test]
    fn test_key_input_sets_keyup_and_extended_flags() {
        let input = key_input(KeyCode::ArrowUp, true);
        // SAFETY: the union was initialised through the `ki` member.
        let ki = unsafe { input.Anonymous.ki };
        assert_eq!(ki.wVk, VIRTUAL_KEY(0x26));
        assert!(ki.dwFlags.contains(KEYEVENTF_KEYUP));
        assert!(ki.dwFlags.contains(KEYEVENTF_EXTENDEDKEY));
    }

    #[test]
    fn test_letter_is_not_extended() {
        assert!(!is_extended(KeyCode::KeyA));
    }
}
