//! Concrete [`InputDriver`](crate::application::driver::InputDriver)
//! implementations.
//!
//! - **`native`** – direct OS APIs, one module per platform selected with
//!   `#[cfg(target_os)]`.
//! - **`generic`** – synthetic input through `enigo`.
//! - **`simulation`** – headless stand-in that only logs.
//! - **`mock`** – recording doubles for tests.

pub mod generic;
pub mod mock;
pub mod native;
pub mod simulation;
