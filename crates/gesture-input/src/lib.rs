//! gesture-input library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does gesture-input do?
//!
//! A hand-gesture recognizer running elsewhere (usually in a browser) decides
//! what the user meant and calls into this crate, through whatever HTTP or
//! WebSocket layer hosts it, to make that happen on the local machine:
//!
//! 1. At startup the capability probe checks whether a GUI session exists and
//!    whether the platform's direct input API can be loaded.
//! 2. Every request goes through [`InputService`]: cooldown gate for discrete
//!    actions, smoothing for pointer moves, then the driver chain.
//! 3. The chain tries the native driver first, then the generic synthetic-input
//!    driver; headless processes get the simulation driver, which only logs.
//! 4. Clicks, key presses and combos run on a small worker pool and hand back
//!    an awaitable handle so the request thread is not blocked for the
//!    press/hold/release sequence.
//!
//! Nothing in here parses JSON or any other wire format.

/// Application layer: driver contract, fallback chain, worker pool, facade.
pub mod application;

/// Infrastructure layer: capability probe, OS drivers, configuration.
pub mod infrastructure;

pub use application::input_service::{InputService, ServiceError};
pub use application::worker::ActionHandle;
