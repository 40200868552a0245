//! Display-server adapters.
//!
//! [`x11::X11Display`] speaks the X11 wire protocol through x11rb's pure-Rust
//! connection.  It owns the socket: dropping it closes the connection, which
//! also makes the server discard this client's root event selection.
//!
//! # Testability
//!
//! The [`DisplayServer`](crate::application::display::DisplayServer) and
//! [`EventSource`](crate::application::display::EventSource) traits allow
//! integration tests to run the whole startup sequence and event loop
//! against [`mock::SimulatedServer`], which models several clients competing
//! for the same root window without a real X server.

pub mod mock;
pub mod x11;

pub use x11::X11Display;
