//! Linux native driver: Xlib + XTest.
//!
//! # XTest
//!
//! XTest is an X11 extension that lets a client synthesize keyboard and
//! pointer events as if they came from hardware:
//!
//! - `XTestFakeMotionEvent(display, screen, x, y, delay)` moves the pointer.
//! - `XTestFakeButtonEvent(display, button, is_press, delay)` presses or
//!   releases a button.  Buttons 4 and 5 are one notch of wheel up and down.
//! - `XTestFakeKeyEvent(display, keycode, is_press, delay)` presses or
//!   releases a key.  It takes a server keycode, so the KeySym from
//!   [`KeyMapper::to_x11_keysym`] is resolved with `XKeysymToKeycode` first.
//!
//! Events are buffered client-side until `XFlush`.
//!
//! # Threading
//!
//! One display connection is opened when the driver is created and shared by
//! every call behind a mutex.  `XInitThreads` runs before the connection is
//! opened.

use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr;
use std::sync::{Mutex, PoisonError};

use gesture_core::{KeyCode, KeyMapper, MouseButton, ScrollDirection};
use x11::{xlib, xtest};

use crate::application::driver::{
    pause, release_held, scroll_notches, DriverError, DriverKind, DriverTimings, InputDriver,
};

/// `CurrentTime`: no delay before the server processes the event.
const CURRENT_TIME: c_ulong = 0;

/// `-1`: the screen the pointer is currently on.
const SCREEN_DEFAULT: c_int = -1;

const BUTTON_LEFT: c_uint = 1;
const BUTTON_RIGHT: c_uint = 3;
const BUTTON_WHEEL_UP: c_uint = 4;
const BUTTON_WHEEL_DOWN: c_uint = 5;

struct Display(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the owning mutex is
// held, and XInitThreads has been called before the connection was opened.
unsafe impl Send for Display {}

pub struct X11NativeDriver {
    display: Mutex<Display>,
    timings: DriverTimings,
}

impl X11NativeDriver {
    /// Opens the display named by `DISPLAY` and checks for XTest.
    ///
    /// # Errors
    ///
    /// [`DriverError::CallFailed`] if the display cannot be opened or the
    /// server lacks the XTest extension.
    pub fn open(timings: DriverTimings) -> Result<Self, DriverError> {
        // SAFETY: XInitThreads has no preconditions; XOpenDisplay(NULL) reads
        // DISPLAY and returns NULL on failure.
        let raw = unsafe {
            xlib::XInitThreads();
            xlib::XOpenDisplay(ptr::null())
        };
        if raw.is_null() {
            return Err(DriverError::CallFailed("XOpenDisplay returned NULL".into()));
        }

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: `raw` is a live connection and the out-params are valid ints.
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                raw,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        } != 0;
        if !has_xtest {
            // SAFETY: `raw` is live and not used after this.
            unsafe { xlib::XCloseDisplay(raw) };
            return Err(DriverError::CallFailed("X server lacks the XTest extension".into()));
        }

        Ok(Self {
            display: Mutex::new(Display(raw)),
            timings,
        })
    }

    /// Runs `f` on the locked connection, then flushes.
    fn with_display<T>(
        &self,
        f: impl FnOnce(*mut xlib::Display) -> Result<T, DriverError>,
    ) -> Result<T, DriverError> {
        let guard = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        let value = f(guard.0)?;
        // SAFETY: the connection stays open for the life of `self`.
        unsafe { xlib::XFlush(guard.0) };
        Ok(value)
    }

    fn button(&self, button: c_uint, press: bool) -> Result<(), DriverError> {
        self.with_display(|d| {
            // SAFETY: `d` is the live, locked connection.
            let ok =
                unsafe { xtest::XTestFakeButtonEvent(d, button, press as c_int, CURRENT_TIME) };
            check(ok, "XTestFakeButtonEvent")
        })
    }

    fn key(&self, code: KeyCode, press: bool) -> Result<(), DriverError> {
        let keysym = KeyMapper::to_x11_keysym(code);
        self.with_display(|d| {
            // SAFETY: `d` is the live, locked connection.
            let keycode = unsafe { xlib::XKeysymToKeycode(d, xlib::KeySym::from(keysym)) };
            if keycode == 0 {
                return Err(DriverError::UnmappedKey(code));
            }
            // SAFETY: as above; `keycode` came from this server's mapping.
            let ok = unsafe {
                xtest::XTestFakeKeyEvent(d, c_uint::from(keycode), press as c_int, CURRENT_TIME)
            };
            check(ok, "XTestFakeKeyEvent")
        })
    }

    fn click_cycle(&self, button: MouseButton) -> Result<(), DriverError> {
        let button = x_button(button);
        self.button(button, true)?;
        pause(self.timings.click_hold);
        self.button(button, false)
    }
}

impl Drop for X11NativeDriver {
    fn drop(&mut self) {
        let display = self.display.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !display.0.is_null() {
            // SAFETY: the connection is live and this is its last use.
            unsafe { xlib::XCloseDisplay(display.0) };
            display.0 = ptr::null_mut();
        }
    }
}

fn check(status: c_int, call: &str) -> Result<(), DriverError> {
    if status == 0 {
        Err(DriverError::CallFailed(format!("{call} failed")))
    } else {
        Ok(())
    }
}

fn x_button(button: MouseButton) -> c_uint {
    match button {
        MouseButton::Left => BUTTON_LEFT,
        MouseButton::Right => BUTTON_RIGHT,
    }
}

fn wheel_button(direction: ScrollDirection) -> c_uint {
    match direction {
        ScrollDirection::Up => BUTTON_WHEEL_UP,
        ScrollDirection::Down => BUTTON_WHEEL_DOWN,
    }
}

impl InputDriver for X11NativeDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Native
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError> {
        self.with_display(|d| {
            // SAFETY: `d` is the live, locked connection.
            let ok = unsafe { xtest::XTestFakeMotionEvent(d, SCREEN_DEFAULT, x, y, CURRENT_TIME) };
            check(ok, "XTestFakeMotionEvent")
        })
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
        // X11 has no wheel delta; one notch is one press/release of 4 or 5.
        let button = wheel_button(direction);
        for _ in 0..scroll_notches(amount) {
            self.button(button, true)?;
            self.button(button, false)?;
        }
        Ok(())
    }

    fn press_key(&self, code: KeyCode) -> Result<(), DriverError> {
        self.key(code, true)?;
        pause(self.timings.key_hold);
        self.key(code, false)
    }

    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError> {
        for (i, &code) in codes.iter().enumerate() {
            if let Err(e) = self.key(code, true) {
                release_held(&codes[..i], |held| self.key(held, false));
                return Err(e);
            }
        }
        pause(self.timings.combo_hold);
        for &code in codes.iter().rev() {
            self.key(code, false)?;
        }
        Ok(())
    }

    fn cursor_position(&self) -> Result<(i32, i32), DriverError> {
        self.with_display(|d| {
            let (mut root_ret, mut child_ret) = (0, 0);
            let (mut root_x, mut root_y, mut win_x, mut win_y) = (0, 0, 0, 0);
            let mut mask = 0;
            // SAFETY: `d` is the live, locked connection and every out-param
            // points at a local.
            let ok = unsafe {
                xlib::XQueryPointer(
                    d,
                    xlib::XDefaultRootWindow(d),
                    &mut root_ret,
                    &mut child_ret,
                    &mut root_x,
                    &mut root_y,
                    &mut win_x,
                    &mut win_y,
                    &mut mask,
                )
            };
            check(ok, "XQueryPointer").map(|()| (root_x, root_y))
        })
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        self.with_display(|d| {
            // SAFETY: `d` is the live, locked connection.
            let (w, h) = unsafe {
                let screen = xlib::XDefaultScreen(d);
                (xlib::XDisplayWidth(d, screen), xlib::XDisplayHeight(d, screen))
            };
            if w <= 0 || h <= 0 {
                return Err(DriverError::CallFailed(format!("invalid X screen size {w}x{h}")));
            }
            Ok((w as u32, h as u32))
        })
    }
}
