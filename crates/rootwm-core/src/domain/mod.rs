//! Domain types for rootwm.
//!
//! This module contains pure logic with no X11 transport or OS dependencies.
//! Everything here can be compiled and tested on any platform without a
//! display server.
//!
//! - **`modifiers`** – the modifier bitset carried by key and button events.
//! - **`event`** – the closed [`event::Event`] sum type and the
//!   [`event::EventMask`] requested on the root window.
//! - **`bindings`** – the key binding table and its matcher.

pub mod bindings;
pub mod event;
pub mod modifiers;
