//! # gesture-core
//!
//! Shared library for the gesture input subsystem containing the platform
//! capability snapshot, the input command model, motion smoothing, the action
//! cooldown table, and the key code tables.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or transports.
//! The `gesture-input` crate builds the drivers and the `InputService` facade
//! on top of it.
//!
//! # Architecture overview
//!
//! A remote hand-gesture recognizer decides *what* the user meant (move the
//! pointer here, left click, scroll up three notches).  The input subsystem
//! turns that intent into real OS input events.  This crate defines:
//!
//! - **`domain`** – Pure logic with no OS dependencies: what the platform can
//!   do (`PlatformCapabilities`), what the caller may ask for (`InputCommand`),
//!   what comes back (`InputResult`), pointer smoothing and the per-action
//!   debounce gate.
//!
//! - **`keymap`** – The small closed set of keys the recognizer can trigger
//!   and their translation into Windows virtual keys, X11 KeySyms and macOS
//!   `CGKeyCode`s.

pub mod domain;
pub mod keymap;

pub use domain::capabilities::{OsFamily, PlatformCapabilities};
pub use domain::command::{
    ActionKind, CommandError, GestureArgs, InputCommand, InputResult, MouseButton, ScreenInfo,
    ScrollDirection,
};
pub use domain::cooldown::{ActionCooldown, DEFAULT_COOLDOWN};
pub use domain::smoothing::{MotionSmoother, PointerState, DEFAULT_SMOOTHING_FACTOR};
pub use keymap::{KeyCode, KeyMapper};
