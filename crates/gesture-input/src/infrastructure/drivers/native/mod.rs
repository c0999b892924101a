//! Native drivers: the platform's own input API, no intermediary library.
//!
//! | Platform | API                                           |
//! |----------|-----------------------------------------------|
//! | Windows  | `SetCursorPos`, `SendInput`, `GetSystemMetrics` |
//! | Linux    | Xlib + XTest on the `DISPLAY` connection       |
//! | macOS    | CoreGraphics `CGEvent` posting                 |
//!
//! The native path is best-effort.  Opening it may fail on a perfectly healthy
//! desktop (missing XTest, no Accessibility permission) and any individual
//! call may fail later; the chain then falls through to the generic driver.

use std::sync::Arc;

use crate::application::driver::{DriverError, DriverTimings, InputDriver};

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

/// Opens the native driver for the current platform.
///
/// # Errors
///
/// [`DriverError::Unsupported`] on platforms without a native driver, or the
/// error from loading the platform library.
pub fn open_native(timings: DriverTimings) -> Result<Arc<dyn InputDriver>, DriverError> {
    #[cfg(target_os = "windows")]
    {
        windows::WindowsNativeDriver::open(timings).map(|d| Arc::new(d) as Arc<dyn InputDriver>)
    }

    #[cfg(target_os = "linux")]
    {
        linux::X11NativeDriver::open(timings).map(|d| Arc::new(d) as Arc<dyn InputDriver>)
    }

    #[cfg(target_os = "macos")]
    {
        macos::CoreGraphicsNativeDriver::open(timings).map(|d| Arc::new(d) as Arc<dyn InputDriver>)
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        let _ = timings;
        Err(DriverError::Unsupported)
    }
}
