//! Domain layer: pure data and logic shared by every driver and the facade.
//!
//! Nothing in here touches the OS.  Each sub-module can be unit-tested on any
//! machine, including headless CI runners.

pub mod capabilities;
pub mod command;
pub mod cooldown;
pub mod smoothing;
