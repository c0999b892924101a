//! [`KeyCode`] to X11 KeySym translation for the Linux native driver.
//!
//! `XTestFakeKeyEvent` wants a server keycode, not a KeySym; the driver
//! resolves the KeySym returned here with `XKeysymToKeycode` at call time
//! because keycodes depend on the server's keyboard mapping.
//!
//! Reference: `<X11/keysymdef.h>`.  Latin letters use the lower-case KeySym
//! (`XK_a = 0x61`), matching what a physical key press reports.

use super::KeyCode;

/// Returns the X11 KeySym for `key`.
///
/// Every supported key has a KeySym, so this never fails.
pub fn key_to_keysym(key: KeyCode) -> u32 {
    use KeyCode::*;
    match key {
        Backspace => 0xFF08,  // XK_BackSpace
        Tab => 0xFF09,        // XK_Tab
        Enter => 0xFF0D,      // XK_Return
        Escape => 0xFF1B,     // XK_Escape
        Space => 0x0020,      // XK_space
        Delete => 0xFFFF,     // XK_Delete
        ArrowLeft => 0xFF51,  // XK_Left
        ArrowUp => 0xFF52,    // XK_Up
        ArrowRight => 0xFF53, // XK_Right
        ArrowDown => 0xFF54,  // XK_Down
        Shift => 0xFFE1,      // XK_Shift_L
        Control => 0xFFE3,    // XK_Control_L
        Alt => 0xFFE9,        // XK_Alt_L
        Meta => 0xFFEB,       // XK_Super_L
        F1 => 0xFFBE,
        F2 => 0xFFBF,
        F3 => 0xFFC0,
        F4 => 0xFFC1,
        F5 => 0xFFC2,
        // Digits and letters: KeySym equals the ASCII code (lower case for letters).
        other => {
            let vk = other.code() as u32;
            if (0x41..=0x5A).contains(&vk) {
                vk + 0x20
            } else {
                vk
            }
        }
    }
}
