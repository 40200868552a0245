//! Application layer: the startup sequence and the event loop.
//!
//! Everything in this layer is written against the port traits in
//! [`display`], never against x11rb directly, so each step can be unit-tested
//! with a mock server.
//!
//! # Sub-modules
//!
//! - **`display`** – Port traits ([`display::DisplayServer`],
//!   [`display::EventSource`]) and the plain data they exchange.
//!
//! - **`config`** – The build-time [`config::WmConfig`]: root event mask and
//!   key bindings.
//!
//! - **`load_keymap`** – Fetches the keyboard mapping once and reshapes it
//!   into a [`rootwm_core::KeyMapTable`].
//!
//! - **`claim_ownership`** – Selects input events on the root window, which
//!   only one window manager at a time can do.
//!
//! - **`startup`** – Runs the fixed startup order and builds the
//!   [`startup::Session`] that owns the connection.
//!
//! - **`dispatch_events`** – The blocking receive loop.  This is the only
//!   code that runs after startup; it resolves every key press and stops on
//!   the quit binding.

pub mod claim_ownership;
pub mod config;
pub mod dispatch_events;
pub mod display;
pub mod load_keymap;
pub mod startup;
