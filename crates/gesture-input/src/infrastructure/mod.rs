//! Infrastructure layer: everything that touches the OS.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gesture_core`, but MUST NOT be imported by the `application` layer outside
//! of tests.
//!
//! # Sub-modules
//!
//! - **`probe`** – The one-time capability probe.
//!
//! - **`drivers`** – Native, generic, simulation and recording drivers.
//!
//! - **`config`** – TOML configuration with platform config-dir resolution and
//!   environment overrides.
//!
//! [`build_input_service`] wires all of it into an [`InputService`].

pub mod config;
pub mod drivers;
pub mod probe;

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::application::chain::DriverSet;
use crate::application::driver::InputDriver;
use crate::application::input_service::{InputService, ServiceError};
use config::InputConfig;
use drivers::generic::{EnigoBackend, GenericDriver};
use drivers::simulation::SimulationDriver;

/// Probes the platform and builds a service with the production drivers.
///
/// Must be called from inside a tokio runtime; queued actions run on it.
///
/// # Errors
///
/// [`ServiceError::InvalidOptions`] if `config` fails validation and
/// [`ServiceError::NoRuntime`] outside a runtime.
pub fn build_input_service(config: &InputConfig) -> Result<InputService, ServiceError> {
    config
        .validate()
        .map_err(|e| ServiceError::InvalidOptions(e.to_string()))?;
    let runtime = Handle::try_current().map_err(|_| ServiceError::NoRuntime)?;

    let report = probe::probe_platform(config);
    let generic: Arc<dyn InputDriver> =
        Arc::new(GenericDriver::new(EnigoBackend, config.driver_timings()));
    let drivers = DriverSet {
        native: report.native,
        generic: Some(generic),
        simulation: Arc::new(SimulationDriver),
    };
    Ok(InputService::new(
        report.capabilities,
        drivers,
        config.service_options(),
        runtime,
    ))
}
