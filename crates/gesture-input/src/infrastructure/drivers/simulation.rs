//! Headless driver: logs what would have happened and reports success.
//!
//! Used when no GUI session exists (CI, containers, servers) so the
//! surrounding service keeps working.  It has no dependencies and cannot
//! fail.

use gesture_core::{KeyCode, MouseButton, ScrollDirection};
use tracing::info;

use crate::application::driver::{DriverError, DriverKind, InputDriver};

/// Screen size reported while headless.
pub const SIMULATED_SCREEN: (u32, u32) = (1920, 1080);
/// Cursor position reported while headless.
pub const SIMULATED_CURSOR: (i32, i32) = (0, 0);

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulationDriver;

impl InputDriver for SimulationDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Simulation
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), DriverError> {
        info!(x, y, "simulated mouse move");
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), DriverError> {
        info!(%button, "simulated click");
        Ok(())
    }

    fn double_click(&self) -> Result<(), DriverError> {
        info!("simulated double click");
        Ok(())
    }

    fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), DriverError> {
        info!(%direction, amount, "simulated scroll");
        Ok(())
    }

    fn press_key(&self, code: KeyCode) -> Result<(), DriverError> {
        info!(key = %code, "simulated key press");
        Ok(())
    }

    fn press_combo(&self, codes: &[KeyCode]) -> Result<(), DriverError> {
        info!(combo = %KeyCode::combo_name(codes), "simulated key combination");
        Ok(())
    }

    fn cursor_position(&self) -> Result<(i32, i32), DriverError> {
        Ok(SIMULATED_CURSOR)
    }

    fn screen_size(&self) -> Result<(u32, u32), DriverError> {
        Ok(SIMULATED_SCREEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_succeeds() {
        let drv = SimulationDriver;

        assert!(drv.move_to(10, 10).is_ok());
        assert!(drv.click(MouseButton::Left).is_ok());
        assert!(drv.double_click().is_ok());
        assert!(drv.scroll(ScrollDirection::Down, 5).is_ok());
        assert!(drv.press_key(KeyCode::F5).is_ok());
        assert!(drv.press_combo(&[KeyCode::Control, KeyCode::KeyV]).is_ok());
    }

    #[test]
    fn test_queries_return_sentinels() {
        assert_eq!(SimulationDriver.screen_size().unwrap(), (1920, 1080));
        assert_eq!(SimulationDriver.cursor_position().unwrap(), (0, 0));
    }
}
