//! Key code translation for the gesture key set.
//!
//! The canonical representation is [`KeyCode`], whose numeric value is the
//! Windows Virtual-Key code.  Platform-specific codes are produced at the
//! driver boundary through [`KeyMapper`].

pub mod key_code;
pub mod linux_x11;
pub mod macos_cg;

pub use key_code::{KeyCode, ALL_KEYS};

/// Unified key mapper providing every translation direction the drivers need.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`KeyCode`] to a Windows Virtual-Key code.
    pub fn to_windows_vk(key: KeyCode) -> u16 {
        key.code()
    }

    /// Translates a [`KeyCode`] to an X11 KeySym.
    pub fn to_x11_keysym(key: KeyCode) -> u32 {
        linux_x11::key_to_keysym(key)
    }

    /// Translates a [`KeyCode`] to a macOS `CGKeyCode`.
    pub fn to_macos_cgkeycode(key: KeyCode) -> u16 {
        macos_cg::key_to_cgkeycode(key)
    }
}
