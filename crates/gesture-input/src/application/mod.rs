//! Application layer of the input subsystem.
//!
//! - **`driver`** – The [`InputDriver`](driver::InputDriver) contract every
//!   input mechanism implements, plus its error type and timing knobs.
//!
//! - **`chain`** – Builds the ordered driver list from the platform
//!   capabilities and runs each operation down it until one driver succeeds.
//!
//! - **`worker`** – Bounded pool that runs click sequences off the caller's
//!   thread and returns an awaitable [`ActionHandle`](worker::ActionHandle).
//!
//! - **`input_service`** – The facade the surrounding service calls.
//!
//! **Dependency rule**: this layer knows the `InputDriver` trait but never a
//! concrete OS driver; those are injected from `infrastructure`.

pub mod chain;
pub mod driver;
pub mod input_service;
pub mod worker;
