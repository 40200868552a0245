//! # rootwm-core
//!
//! Shared library for rootwm containing the key code and keysym types, the
//! keyboard mapping table, modifier and event masks, the input event model,
//! and the key binding table.
//!
//! It has zero dependencies on the X11 transport, sockets, or the operating
//! system, so everything here can be unit-tested without a display server.
//!
//! # Architecture overview
//!
//! rootwm is the startup and input-dispatch core of a minimal X11 window
//! manager.  It claims the root window's input events before any other
//! manager can, then sits in a blocking loop turning raw key codes into
//! keysyms and watching for the quit combination.
//!
//! This crate is the pure half of that design:
//!
//! - **`keymap`** – The code→symbol table fetched once from the server.
//!   Raw hardware key codes (8..=255) are resolved to symbolic keysyms such
//!   as `BackSpace` or `a`.
//!
//! - **`domain`** – Modifier masks, event masks, the closed [`Event`] sum
//!   type produced by every receive call, and the [`KeyBindings`] table that
//!   decides whether a key press means "terminate".

pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `rootwm_core::KeyMapTable` instead of `rootwm_core::keymap::KeyMapTable`.
pub use domain::bindings::{BindingAction, KeyBinding, KeyBindings, KeyMatch};
pub use domain::event::{ButtonEvent, Event, EventMask, KeyEvent};
pub use domain::modifiers::ModifierMask;
pub use keymap::keysyms::{keysym_name, KeySym};
pub use keymap::{KeyCode, KeyMapError, KeyMapTable};
