//! [`KeyCode`] to macOS `CGKeyCode` translation.
//!
//! `CGKeyCode` values are physical key positions on an ANSI keyboard
//! (`kVK_ANSI_A = 0x00`), taken from `<HIToolbox/Events.h>`.  They are not
//! alphabetical, hence the explicit table.
//!
//! Control maps to the Control key, not Command; callers wanting the macOS
//! copy shortcut should send `META+C`.

use super::KeyCode;

/// Returns the `CGKeyCode` for `key`.
pub fn key_to_cgkeycode(key: KeyCode) -> u16 {
    use KeyCode::*;
    match key {
        KeyA => 0x00,
        KeyS => 0x01,
        KeyD => 0x02,
        KeyF => 0x03,
        KeyH => 0x04,
        KeyG => 0x05,
        KeyZ => 0x06,
        KeyX => 0x07,
        KeyC => 0x08,
        KeyV => 0x09,
        KeyB => 0x0B,
        KeyQ => 0x0C,
        KeyW => 0x0D,
        KeyE => 0x0E,
        KeyR => 0x0F,
        KeyY => 0x10,
        KeyT => 0x11,
        Digit1 => 0x12,
        Digit2 => 0x13,
        Digit3 => 0x14,
        Digit4 => 0x15,
        Digit6 => 0x16,
        Digit5 => 0x17,
        Digit9 => 0x19,
        Digit7 => 0x1A,
        Digit8 => 0x1C,
        Digit0 => 0x1D,
        KeyO => 0x1F,
        KeyU => 0x20,
        KeyI => 0x22,
        KeyP => 0x23,
        Enter => 0x24,
        KeyL => 0x25,
        KeyJ => 0x26,
        KeyK => 0x28,
        KeyN => 0x2D,
        KeyM => 0x2E,
        Tab => 0x30,
        Space => 0x31,
        Backspace => 0x33, // kVK_Delete
        Escape => 0x35,
        Meta => 0x37,      // kVK_Command
        Shift => 0x38,
        Alt => 0x3A,       // kVK_Option
        Control => 0x3B,
        F5 => 0x60,
        F3 => 0x63,
        Delete => 0x75, // kVK_ForwardDelete
        F4 => 0x76,
        F2 => 0x78,
        F1 => 0x7A,
        ArrowLeft => 0x7B,
        ArrowRight => 0x7C,
        ArrowDown => 0x7D,
        ArrowUp => 0x7E,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::key_code::ALL_KEYS;
    use std::collections::HashSet;

    #[test]
    fn test_known_positions() {
        assert_eq!(key_to_cgkeycode(KeyCode::KeyA), 0x00);
        assert_eq!(key_to_cgkeycode(KeyCode::Enter), 0x24);
        assert_eq!(key_to_cgkeycode(KeyCode::ArrowUp), 0x7E);
    }

    #[test]
    fn test_every_key_has_a_distinct_cgkeycode() {
        let codes: HashSet<u16> = ALL_KEYS.iter().map(|&k| key_to_cgkeycode(k)).collect();
        assert_eq!(codes.len(), ALL_KEYS.len());
    }
}
