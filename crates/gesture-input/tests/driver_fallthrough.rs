//! Driver chain fallthrough checked with `mockall` expectations.
//!
//! Where the recording doubles assert what was emitted, these assert how
//! often each driver was asked, and that a driver later in the chain is
//! never consulted once an earlier one succeeds.

use std::sync::Arc;

use gesture_core::{KeyCode, MouseButton, OsFamily, PlatformCapabilities, ScrollDirection};
use gesture_input::application::chain::{DriverChain, DriverSet};
use gesture_input::application::driver::{DriverError, DriverKind, InputDriver};
use gesture_input::infrastructure::drivers::simulation::SimulationDriver;
use mockall::mock;

mock! {
    pub Driver {}

    impl InputDriver for Driver {
        fn kind(&self) -> DriverKind;
        fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError>;
        fn click(&self, button: MouseButton) -> Result<(), DriverError>;
        fn double_click(&self) -> Result<(), DriverError>;
        fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), DriverError>;
        fn press_key(&self, code: KeyCode) -> Result<(), DriverError>;
        fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError>;
        fn cursor_position(&self) -> Result<(i32, i32), DriverError>;
        fn screen_size(&self) -> Result<(u32, u32), DriverError>;
    }
}

fn desktop() -> PlatformCapabilities {
    PlatformCapabilities {
        os_family: OsFamily::Windows,
        gui_available: true,
        native_api_available: true,
    }
}

fn chain(native: MockDriver, generic: MockDriver) -> DriverChain {
    DriverChain::new(
        &desktop(),
        DriverSet {
            native: Some(Arc::new(native)),
            generic: Some(Arc::new(generic)),
            simulation: Arc::new(SimulationDriver),
        },
    )
}

fn driver_of(kind: DriverKind) -> MockDriver {
    let mut driver = MockDriver::new();
    driver.expect_kind().return_const(kind);
    driver
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_native_success_never_consults_generic() {
    let mut native = driver_of(DriverKind::Native);
    native.expect_click().times(1).returning(|_| Ok(()));
    let mut generic = driver_of(DriverKind::Generic);
    generic.expect_click().never();

    let (_, used) = chain(native, generic)
        .run("click", |d| d.click(MouseButton::Left))
        .unwrap();

    assert_eq!(used, DriverKind::Native);
}

#[test]
fn test_native_error_falls_through_to_generic_once() {
    let mut native = driver_of(DriverKind::Native);
    native
        .expect_scroll()
        .times(1)
        .returning(|_, _| Err(DriverError::CallFailed("SendInput returned 0".into())));
    let mut generic = driver_of(DriverKind::Generic);
    generic
        .expect_scroll()
        .withf(|direction, amount| *direction == ScrollDirection::Down && *amount == 4)
        .times(1)
        .returning(|_, _| Ok(()));

    let (_, used) = chain(native, generic)
        .run("scroll", |d| d.scroll(ScrollDirection::Down, 4))
        .unwrap();

    assert_eq!(used, DriverKind::Generic);
}

#[test]
fn test_both_failing_reports_last_error() {
    let mut native = driver_of(DriverKind::Native);
    native
        .expect_press_combo()
        .times(1)
        .returning(|_| Err(DriverError::CallFailed("native".into())));
    let mut generic = driver_of(DriverKind::Generic);
    generic
        .expect_press_combo()
        .times(1)
        .returning(|_| Err(DriverError::UnmappedKey(KeyCode::Meta)));

    let err = chain(native, generic)
        .run("press_combo", |d| d.press_combo(&[KeyCode::Meta, KeyCode::KeyL]))
        .unwrap_err();

    assert_eq!(err.operation, "press_combo");
    assert_eq!(err.last_error, Some(DriverError::UnmappedKey(KeyCode::Meta)));
}
