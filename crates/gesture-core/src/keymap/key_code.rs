//! The closed set of keys a gesture can trigger.
//!
//! The recognizer only ever needs a handful of keys: navigation, a few
//! editing keys, modifiers for shortcuts, F1–F5, letters and digits.  Keeping
//! the set closed means every driver can translate every key, and unknown key
//! names are rejected by the caller before anything reaches the drivers.
//!
//! # Numeric values
//!
//! The discriminant of each variant is its Windows Virtual-Key code
//! (`VK_ESCAPE = 0x1B`, `VK_A = 0x41`, ...).  Callers that already hold a
//! platform key code can convert with [`KeyCode::from_code`].
//!
//! # Names
//!
//! [`KeyCode::from_str`](std::str::FromStr) accepts the names the gesture
//! mappings use, case-insensitively:
//!
//! | Name(s)            | Key            |
//! |--------------------|----------------|
//! | `ESC`, `ESCAPE`    | Escape         |
//! | `ENTER`, `RETURN`  | Enter          |
//! | `CTRL`, `CONTROL`  | Control        |
//! | `A` … `Z`, `0` … `9` | letters/digits |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::command::CommandError;

/// A key the input subsystem can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum KeyCode {
    // Editing / control
    Backspace = 0x08,
    Tab = 0x09,
    Enter = 0x0D,
    Escape = 0x1B,
    Space = 0x20,
    Delete = 0x2E,

    // Arrows
    ArrowLeft = 0x25,
    ArrowUp = 0x26,
    ArrowRight = 0x27,
    ArrowDown = 0x28,

    // Modifiers
    Shift = 0x10,
    Control = 0x11,
    Alt = 0x12,
    Meta = 0x5B,

    // Function keys
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,

    // Digits
    Digit0 = 0x30,
    Digit1 = 0x31,
    Digit2 = 0x32,
    Digit3 = 0x33,
    Digit4 = 0x34,
    Digit5 = 0x35,
    Digit6 = 0x36,
    Digit7 = 0x37,
    Digit8 = 0x38,
    Digit9 = 0x39,

    // Letters
    KeyA = 0x41,
    KeyB = 0x42,
    KeyC = 0x43,
    KeyD = 0x44,
    KeyE = 0x45,
    KeyF = 0x46,
    KeyG = 0x47,
    KeyH = 0x48,
    KeyI = 0x49,
    KeyJ = 0x4A,
    KeyK = 0x4B,
    KeyL = 0x4C,
    KeyM = 0x4D,
    KeyN = 0x4E,
    KeyO = 0x4F,
    KeyP = 0x50,
    KeyQ = 0x51,
    KeyR = 0x52,
    KeyS = 0x53,
    KeyT = 0x54,
    KeyU = 0x55,
    KeyV = 0x56,
    KeyW = 0x57,
    KeyX = 0x58,
    KeyY = 0x59,
    KeyZ = 0x5A,
}

/// Every key in declaration order.
pub const ALL_KEYS: &[KeyCode] = {
    use KeyCode::*;
    &[
        Backspace, Tab, Enter, Escape, Space, Delete, ArrowLeft, ArrowUp, ArrowRight, ArrowDown,
        Shift, Control, Alt, Meta, F1, F2, F3, F4, F5, Digit0, Digit1, Digit2, Digit3, Digit4,
        Digit5, Digit6, Digit7, Digit8, Digit9, KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH,
        KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW,
        KeyX, KeyY, KeyZ,
    ]
};

const LETTERS: [KeyCode; 26] = {
    use KeyCode::*;
    [
        KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO,
        KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ]
};

const DIGITS: [KeyCode; 10] = {
    use KeyCode::*;
    [
        Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    ]
};

impl KeyCode {
    /// Returns the numeric key code (the Windows Virtual-Key value).
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Looks up a key by its numeric code.
    ///
    /// Returns `None` for codes outside the supported set.
    pub fn from_code(code: u16) -> Option<Self> {
        ALL_KEYS.iter().copied().find(|k| k.code() == code)
    }

    /// Returns the key for an ASCII letter or digit, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        match c {
            'A'..='Z' => Some(LETTERS[(c as u8 - b'A') as usize]),
            '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
            _ => None,
        }
    }

    /// Canonical lower-case name, used in executed-action tags (`key_esc`).
    pub fn name(self) -> &'static str {
        use KeyCode::*;
        match self {
            Backspace => "backspace",
            Tab => "tab",
            Enter => "enter",
            Escape => "esc",
            Space => "space",
            Delete => "delete",
            ArrowLeft => "left",
            ArrowUp => "up",
            ArrowRight => "right",
            ArrowDown => "down",
            Shift => "shift",
            Control => "ctrl",
            Alt => "alt",
            Meta => "meta",
            F1 => "f1",
            F2 => "f2",
            F3 => "f3",
            F4 => "f4",
            F5 => "f5",
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            KeyA => "a",
            KeyB => "b",
            KeyC => "c",
            KeyD => "d",
            KeyE => "e",
            KeyF => "f",
            KeyG => "g",
            KeyH => "h",
            KeyI => "i",
            KeyJ => "j",
            KeyK => "k",
            KeyL => "l",
            KeyM => "m",
            KeyN => "n",
            KeyO => "o",
            KeyP => "p",
            KeyQ => "q",
            KeyR => "r",
            KeyS => "s",
            KeyT => "t",
            KeyU => "u",
            KeyV => "v",
            KeyW => "w",
            KeyX => "x",
            KeyY => "y",
            KeyZ => "z",
        }
    }

    /// Parses a `+`-separated combo such as `"CTRL+SHIFT+T"`.
    ///
    /// Order is preserved: modifiers are expected first, the final key last.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptyCombo`] for an empty string and
    /// [`CommandError::UnknownKey`] if any part is not a known key name; one
    /// bad part rejects the whole combo.
    pub fn parse_combo(combo: &str) -> Result<Vec<KeyCode>, CommandError> {
        if combo.trim().is_empty() {
            return Err(CommandError::EmptyCombo);
        }
        combo.split('+').map(|part| part.trim().parse()).collect()
    }

    /// Renders a combo back to its tag form, e.g. `ctrl+c`.
    pub fn combo_name(codes: &[KeyCode]) -> String {
        codes
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl FromStr for KeyCode {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use KeyCode::*;
        let upper = s.trim().to_ascii_uppercase();
        let key = match upper.as_str() {
            "ESC" | "ESCAPE" => Escape,
            "ENTER" | "RETURN" => Enter,
            "SPACE" => Space,
            "TAB" => Tab,
            "BACKSPACE" => Backspace,
            "DELETE" | "DEL" => Delete,
            "UP" => ArrowUp,
            "DOWN" => ArrowDown,
            "LEFT" => ArrowLeft,
            "RIGHT" => ArrowRight,
            "CTRL" | "CONTROL" => Control,
            "ALT" => Alt,
            "SHIFT" => Shift,
            "META" | "WIN" | "CMD" | "SUPER" => Meta,
            "F1" => F1,
            "F2" => F2,
            "F3" => F3,
            "F4" => F4,
            "F5" => F5,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        KeyCode::from_char(c).ok_or_else(|| CommandError::UnknownKey(s.into()))?
                    }
                    _ => return Err(CommandError::UnknownKey(s.into())),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_aliases_case_insensitively() {
        assert_eq!("esc".parse::<KeyCode>().unwrap(), KeyCode::Escape);
        assert_eq!("Escape".parse::<KeyCode>().unwrap(), KeyCode::Escape);
        assert_eq!("ctrl".parse::<KeyCode>().unwrap(), KeyCode::Control);
        assert_eq!(" enter ".parse::<KeyCode>().unwrap(), KeyCode::Enter);
    }

    #[test]
    fn test_parse_single_letters_and_digits() {
        assert_eq!("a".parse::<KeyCode>().unwrap(), KeyCode::KeyA);
        assert_eq!("Z".parse::<KeyCode>().unwrap(), KeyCode::KeyZ);
        assert_eq!("7".parse::<KeyCode>().unwrap(), KeyCode::Digit7);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!(matches!(
            "F12".parse::<KeyCode>(),
            Err(CommandError::UnknownKey(name)) if name == "F12"
        ));
        assert!("?".parse::<KeyCode>().is_err());
        assert!("".parse::<KeyCode>().is_err());
    }

    #[test]
    fn test_parse_combo_preserves_order() {
        let combo = KeyCode::parse_combo("CTRL+SHIFT+T").unwrap();
        assert_eq!(combo, vec![KeyCode::Control, KeyCode::Shift, KeyCode::KeyT]);
    }

    #[test]
    fn test_parse_combo_rejects_whole_combo_on_one_bad_part() {
        assert!(KeyCode::parse_combo("CTRL+BOGUS").is_err());
        assert!(matches!(KeyCode::parse_combo("  "), Err(CommandError::EmptyCombo)));
    }

    #[test]
    fn test_codes_are_windows_virtual_keys() {
        assert_eq!(KeyCode::Escape.code(), 0x1B);
        assert_eq!(KeyCode::KeyA.code(), 0x41);
        assert_eq!(KeyCode::Digit0.code(), 0x30);
        assert_eq!(KeyCode::F5.code(), 0x74);
    }

    #[test]
    fn test_from_code_round_trips_every_key() {
        for &key in ALL_KEYS {
            assert_eq!(KeyCode::from_code(key.code()), Some(key));
        }
        assert_eq!(KeyCode::from_code(0xFFFF), None);
    }

    #[test]
    fn test_every_name_parses_back_to_its_key() {
        for &key in ALL_KEYS {
            assert_eq!(key.name().parse::<KeyCode>().unwrap(), key, "{key:?}");
        }
    }

    #[test]
    fn test_combo_name_joins_with_plus() {
        assert_eq!(KeyCode::combo_name(&[KeyCode::Control, KeyCode::KeyC]), "ctrl+c");
    }
}
