//! Key bindings: (modifiers, keysym) pairs mapped to manager actions.
//!
//! The matcher is a pure function of the resolved base keysym and the
//! modifier state of the press.  A binding fires when the keysym is equal
//! and every modifier it names is held; extra held modifiers (Caps Lock,
//! Num Lock, Shift) do not prevent a match.
//!
//! The default table carries a single binding, Control+Alt+BackSpace, which
//! terminates the manager.

use crate::keymap::keysyms::KeySym;

use super::modifiers::ModifierMask;

/// What the manager does when a binding fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
    /// Leave the event loop and shut down.
    Terminate,
}

/// Result of matching one key press against the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    NoMatch,
    Terminate,
}

impl From<BindingAction> for KeyMatch {
    fn from(action: BindingAction) -> Self {
        match action {
            BindingAction::Terminate => KeyMatch::Terminate,
        }
    }
}

/// A single table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Modifiers that must all be held.
    pub modifiers: ModifierMask,
    /// Base keysym of the pressed key.
    pub keysym: KeySym,
    pub action: BindingAction,
}

impl KeyBinding {
    /// Control+Alt+BackSpace → terminate.
    pub const QUIT: KeyBinding = KeyBinding {
        modifiers: ModifierMask(ModifierMask::CONTROL.0 | ModifierMask::MOD1.0),
        keysym: KeySym::BACKSPACE,
        action: BindingAction::Terminate,
    };

    /// Returns `true` if this binding fires for the given press.
    pub fn fires(&self, keysym: KeySym, modifiers: ModifierMask) -> bool {
        self.keysym == keysym && modifiers.contains(self.modifiers)
    }
}

/// Ordered binding table; the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    entries: Vec<KeyBinding>,
}

impl KeyBindings {
    /// An empty table: every press is [`KeyMatch::NoMatch`].
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a binding.
    pub fn with(mut self, binding: KeyBinding) -> Self {
        self.entries.push(binding);
        self
    }

    pub fn entries(&self) -> &[KeyBinding] {
        &self.entries
    }

    /// Matches a resolved base keysym and modifier state against the table.
    pub fn matches(&self, keysym: KeySym, modifiers: ModifierMask) -> KeyMatch {
        self.entries
            .iter()
            .find(|binding| binding.fires(keysym, modifiers))
            .map(|binding| KeyMatch::from(binding.action))
            .unwrap_or(KeyMatch::NoMatch)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty().with(KeyBinding::QUIT)
    }
}
