//! Input events delivered on the root window and the mask that requests them.

use std::ops::BitOr;

use super::modifiers::ModifierMask;

/// Bitset of event kinds selected on a window.
///
/// Bit values match the X11 core `EventMask` so the adapter can forward them
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventMask(pub u32);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const KEY_PRESS: EventMask = EventMask(1 << 0);
    pub const KEY_RELEASE: EventMask = EventMask(1 << 1);
    /// Only one client may select this on a window; the server rejects a
    /// second selection with an `Access` error.
    pub const BUTTON_PRESS: EventMask = EventMask(1 << 2);
    pub const BUTTON_RELEASE: EventMask = EventMask(1 << 3);

    /// The fixed selection a window manager makes on the root window.
    pub const ROOT_INPUT: EventMask = EventMask(
        Self::KEY_PRESS.0 | Self::KEY_RELEASE.0 | Self::BUTTON_PRESS.0 | Self::BUTTON_RELEASE.0,
    );

    /// Returns `true` if every bit of `other` is set in `self`.
    pub fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if `self` and `other` share at least one bit.
    pub fn intersects(self, other: EventMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        EventMask(self.0 | rhs.0)
    }
}

/// Payload of a key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Raw key code as sent by the server.
    pub code: u8,
    /// Modifiers held when the event was generated.
    pub modifiers: ModifierMask,
}

/// Payload of a pointer button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Button number (1 = left, 2 = middle, 3 = right, 4/5 = wheel).
    pub button: u8,
    pub modifiers: ModifierMask,
}

/// One event produced by a single blocking receive.
///
/// Closed over the kinds the root selection can deliver; anything else the
/// server sends arrives as [`Event::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    ButtonPress(ButtonEvent),
    ButtonRelease(ButtonEvent),
    /// Any other event the server delivers.
    Other,
}

impl Event {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::KeyPress(_) => "KeyPress",
            Event::KeyRelease(_) => "KeyRelease",
            Event::ButtonPress(_) => "ButtonPress",
            Event::ButtonRelease(_) => "ButtonRelease",
            Event::Other => "Other",
        }
    }
}
