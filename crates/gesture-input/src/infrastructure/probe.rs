//! One-time capability probe.
//!
//! Answers two questions at startup:
//!
//! 1. Is an interactive display session attached?  On Linux and the BSDs this
//!    means `DISPLAY` or `WAYLAND_DISPLAY` is set to something non-empty.
//!    Windows and macOS processes are assumed to have one.
//! 2. Can the native input API be opened?  Answered by actually opening the
//!    native driver; the opened driver is handed back so it is not opened
//!    twice.
//!
//! The probe never fails.  Anything that goes wrong is recorded as `false` in
//! the snapshot and logged.

use std::sync::Arc;

use gesture_core::{OsFamily, PlatformCapabilities};
use tracing::{info, warn};

use super::config::InputConfig;
use super::drivers::native::open_native;
use crate::application::driver::InputDriver;

/// What the probe found, plus the native driver it opened on the way.
pub struct ProbeReport {
    pub capabilities: PlatformCapabilities,
    pub native: Option<Arc<dyn InputDriver>>,
}

/// Probes with default settings and discards the opened driver.
pub fn probe() -> PlatformCapabilities {
    probe_platform(&InputConfig::default()).capabilities
}

/// Probes honoring the `[platform]` switches of `config`.
///
/// `force_headless` reports no GUI and skips the native driver so nothing
/// touches the real desktop; `disable_native` skips only the native driver.
pub fn probe_platform(config: &InputConfig) -> ProbeReport {
    let os_family = OsFamily::current();
    let platform = &config.platform;

    let gui_available =
        !platform.force_headless && gui_session_present(os_family, |k| std::env::var(k).ok());

    let native = if platform.force_headless || platform.disable_native {
        None
    } else {
        match open_native(config.driver_timings()) {
            Ok(driver) => Some(driver),
            Err(e) => {
                warn!(error = %e, "native input API unavailable");
                None
            }
        }
    };

    let capabilities = PlatformCapabilities {
        os_family,
        gui_available,
        native_api_available: native.is_some(),
    };
    info!(%capabilities, "platform probe complete");
    ProbeReport {
        capabilities,
        native,
    }
}

/// Decides whether a display session is attached, reading the environment
/// through `lookup`.
pub fn gui_session_present(os: OsFamily, lookup: impl Fn(&str) -> Option<String>) -> bool {
    match os {
        OsFamily::Windows | OsFamily::MacOS => true,
        OsFamily::Linux | OsFamily::Other => ["DISPLAY", "WAYLAND_DISPLAY"]
            .iter()
            .any(|var| lookup(var).is_some_and(|v| !v.trim().is_empty())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
