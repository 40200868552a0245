//! Ports to the display server.
//!
//! The infrastructure layer implements these traits over a live X11
//! connection (`infrastructure::display::x11`) and over an in-process
//! simulated server (`infrastructure::display::mock`).  Every request is a
//! synchronous round trip: the caller blocks until the reply or error is in.

use rootwm_core::{Event, EventMask, KeySym};
use thiserror::Error;

/// X11 window identifier.
pub type WindowId = u32;

/// One root window as listed in the connection setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRoot {
    pub window: WindowId,
    pub width: u16,
    pub height: u16,
}

/// The parts of the connection setup the manager needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupInfo {
    pub roots: Vec<ScreenRoot>,
    /// Lowest key code the server generates.
    pub min_keycode: u8,
    /// Highest key code the server generates.
    pub max_keycode: u8,
}

/// A physical monitor inside the unified root, as reported by Xinerama.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// GetKeyboardMapping reply: a flat keysym list and its per-code stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMapping {
    pub keysyms_per_keycode: u8,
    pub keysyms: Vec<KeySym>,
}

/// Failure of a startup-phase request.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The transport connection could not be opened.
    #[error("cannot connect to display: {0}")]
    Connect(String),

    /// The setup payload parsed but carries nothing usable.
    #[error("connection setup is unusable: {0}")]
    UnusableSetup(String),

    /// A required protocol extension is missing on the server.
    #[error("extension {0} is not available on this server")]
    ExtensionUnavailable(&'static str),

    /// A request was sent but failed or its reply could not be read.
    #[error("request failed: {0}")]
    Request(String),
}

/// Failure of a root event selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectEventsError {
    /// Another client already holds a conflicting selection.
    #[error("access denied")]
    AccessDenied,

    #[error("{0}")]
    Other(String),
}

/// Failure of a single blocking receive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// An error reply or a malformed event; the connection is still usable.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The connection itself is gone; no further events will arrive.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}

/// Request side of a display connection.
pub trait DisplayServer {
    /// Returns the structured connection setup.
    fn setup_info(&self) -> Result<SetupInfo, DisplayError>;

    /// Initialises the Xinerama extension and returns the heads it reports.
    fn init_xinerama(&self) -> Result<Vec<Head>, DisplayError>;

    /// Fetches keysyms for `count` codes starting at `first_keycode`.
    fn keyboard_mapping(&self, first_keycode: u8, count: u8) -> Result<KeyboardMapping, DisplayError>;

    /// Replaces this client's event selection on `window`, checked.
    fn select_events(&self, window: WindowId, mask: EventMask) -> Result<(), SelectEventsError>;
}

/// Event side of a display connection.
pub trait EventSource {
    /// Blocks until the next event (or error) arrives.  No timeout.
    fn next_event(&mut self) -> Result<Event, ReceiveError>;
}
