//! Ordered, per-call driver fallback.
//!
//! The order is fixed once from the capability snapshot, but every operation
//! walks it from the top again: a native call that failed a moment ago may
//! succeed now, and a native call may fail even though the probe loaded the
//! library.
//!
//! | native | gui   | order                |
//! |--------|-------|----------------------|
//! | true   | true  | native, generic      |
//! | false  | true  | generic              |
//! | true   | false | native, simulation   |
//! | false  | false | simulation           |
//!
//! Simulation is only reachable without a GUI session.  With a GUI present a
//! failing generic driver is a real failure, not something to paper over with
//! a fake success.

use std::sync::Arc;

use gesture_core::PlatformCapabilities;
use thiserror::Error;
use tracing::warn;

use super::driver::{DriverError, DriverKind, InputDriver};

/// The concrete drivers available to a service, before capability filtering.
#[derive(Clone)]
pub struct DriverSet {
    pub native: Option<Arc<dyn InputDriver>>,
    pub generic: Option<Arc<dyn InputDriver>>,
    pub simulation: Arc<dyn InputDriver>,
}

/// Every driver in the chain declined the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no driver could perform {operation}")]
pub struct ChainExhausted {
    pub operation: &'static str,
    /// Error reported by the last driver tried, if any driver was tried.
    pub last_error: Option<DriverError>,
}

/// Drivers in the order they are tried.
#[derive(Clone)]
pub struct DriverChain {
    drivers: Vec<Arc<dyn InputDriver>>,
}

impl DriverChain {
    /// Builds the fallback order for `capabilities` from the drivers in `set`.
    pub fn new(capabilities: &PlatformCapabilities, set: DriverSet) -> Self {
        let mut drivers = Vec::with_capacity(2);
        if capabilities.native_api_available {
            if let Some(native) = set.native {
                drivers.push(native);
            }
        }
        if capabilities.gui_available {
            if let Some(generic) = set.generic {
                drivers.push(generic);
            }
        } else {
            drivers.push(set.simulation);
        }
        Self { drivers }
    }

    /// Kinds of the drivers in try order.
    pub fn kinds(&self) -> Vec<DriverKind> {
        self.drivers.iter().map(|d| d.kind()).collect()
    }

    /// Runs `op` against each driver until one succeeds.
    ///
    /// Returns the value together with the kind of the driver that produced
    /// it.
    ///
    /// # Errors
    ///
    /// [`ChainExhausted`] when every driver returned an error (or the chain is
    /// empty).
    pub fn run<T, F>(
        &self,
        operation: &'static str,
        op: F,
    ) -> Result<(T, DriverKind), ChainExhausted>
    where
        F: Fn(&dyn InputDriver) -> Result<T, DriverError>,
    {
        let mut last_error = None;
        for driver in &self.drivers {
            match op(driver.as_ref()) {
                Ok(value) => return Ok((value, driver.kind())),
                Err(e) => {
                    warn!(
                        driver = %driver.kind(),
                        operation,
                        error = %e,
                        "driver declined, falling through"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(ChainExhausted {
            operation,
            last_error,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::drivers::mock::{DriverEvent, RecordingDriver};
    use gesture_core::{MouseButton, OsFamily, ScrollDirection};

    fn caps(native: bool, gui: bool) -> PlatformCapabilities {
        PlatformCapabilities {
            os_family: OsFamily::Linux,
            gui_available: gui,
            native_api_available: native,
        }
    }

    struct Drivers {
        native: Arc<RecordingDriver>,
        generic: Arc<RecordingDriver>,
        simulation: Arc<RecordingDriver>,
    }

    impl Drivers {
        fn new() -> Self {
            Self {
                native: Arc::new(RecordingDriver::new(DriverKind::Native)),
                generic: Arc::new(RecordingDriver::new(DriverKind::Generic)),
                simulation: Arc::new(RecordingDriver::new(DriverKind::Simulation)),
            }
        }

        fn set(&self) -> DriverSet {
            DriverSet {
                native: Some(Arc::clone(&self.native) as Arc<dyn InputDriver>),
                generic: Some(Arc::clone(&self.generic) as Arc<dyn InputDriver>),
                simulation: Arc::clone(&self.simulation) as Arc<dyn InputDriver>,
            }
        }
    }

    #[test]
    fn test_chain_order_for_each_capability_combination() {
        let d = Drivers::new();
        use DriverKind::*;

        assert_eq!(DriverChain::new(&caps(true, true), d.set()).kinds(), vec![Native, Generic]);
        assert_eq!(DriverChain::new(&caps(false, true), d.set()).kinds(), vec![Generic]);
        assert_eq!(DriverChain::new(&caps(true, false), d.set()).kinds(), vec![Native, Simulation]);
        assert_eq!(DriverChain::new(&caps(false, false), d.set()).kinds(), vec![Simulation]);
    }

    #[test]
    fn test_native_flag_without_native_driver_is_skipped() {
        // Arrange
        let d = Drivers::new();
        let mut set = d.set();
        set.native = None;

        // Act
        let chain = DriverChain::new(&caps(true, true), set);

        // Assert
        assert_eq!(chain.kinds(), vec![DriverKind::Generic]);
    }

    #[test]
    fn test_run_uses_first_successful_driver() {
        // Arrange
        let d = Drivers::new();
        let chain = DriverChain::new(&caps(true, true), d.set());

        // Act
        let (_, used) = chain.run("click", |drv| drv.click(MouseButton::Left)).unwrap();

        // Assert
        assert_eq!(used, DriverKind::Native);
        assert_eq!(d.native.events(), vec![DriverEvent::Click(MouseButton::Left)]);
        assert!(d.generic.events().is_empty());
    }

    #[test]
    fn test_run_falls_through_on_native_failure() {
        // Arrange
        let d = Drivers::new();
        d.native.set_failing(true);
        let chain = DriverChain::new(&caps(true, true), d.set());

        // Act
        let (_, used) = chain.run("move_to", |drv| drv.move_to(10, 20)).unwrap();

        // Assert
        assert_eq!(used, DriverKind::Generic);
        assert_eq!(d.native.call_count(), 1);
        assert_eq!(d.generic.events(), vec![DriverEvent::MoveTo(10, 20)]);
        assert!(d.simulation.events().is_empty());
    }

    #[test]
    fn test_run_is_reevaluated_per_call() {
        // Arrange – native fails once, then recovers
        let d = Drivers::new();
        d.native.set_failing(true);
        let chain = DriverChain::new(&caps(true, true), d.set());
        let (_, first) = chain.run("move_to", |drv| drv.move_to(1, 1)).unwrap();

        // Act
        d.native.set_failing(false);
        let (_, second) = chain.run("move_to", |drv| drv.move_to(2, 2)).unwrap();

        // Assert
        assert_eq!(first, DriverKind::Generic);
        assert_eq!(second, DriverKind::Native);
    }

    #[test]
    fn test_run_exhausted_reports_last_error() {
        // Arrange
        let d = Drivers::new();
        d.native.set_failing(true);
        d.generic.set_failing(true);
        let chain = DriverChain::new(&caps(true, true), d.set());

        // Act
        let err = chain.run("scroll", |drv| drv.scroll(ScrollDirection::Up, 1)).unwrap_err();

        // Assert
        assert_eq!(err.operation, "scroll");
        assert!(matches!(err.last_error, Some(DriverError::CallFailed(_))));
        assert!(d.simulation.events().is_empty(), "simulation must not run with a GUI present");
    }

    #[test]
    fn test_empty_chain_is_exhausted_without_error() {
        // Arrange – GUI present but no generic driver could be built
        let d = Drivers::new();
        let mut set = d.set();
        set.generic = None;
        let chain = DriverChain::new(&caps(false, true), set);

        // Act
        let err = chain.run("click", |drv| drv.click(MouseButton::Right)).unwrap_err();

        // Assert
        assert!(err.last_error.is_none());
    }
}
