//! Build-time configuration.
//!
//! rootwm reads no configuration file, flags, or environment variables at
//! this scope.  The root event mask and the binding table are fixed here and
//! handed to [`crate::application::startup::Session::establish`].

use rootwm_core::{EventMask, KeyBindings};

/// Everything the startup sequence and the event loop are parameterised by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmConfig {
    /// Event kinds selected on the root window when claiming ownership.
    pub root_event_mask: EventMask,
    /// Key bindings consulted on every key press.
    pub bindings: KeyBindings,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            root_event_mask: EventMask::ROOT_INPUT,
            bindings: KeyBindings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootwm_core::{KeyMatch, KeySym, ModifierMask};

    #[test]
    fn test_default_selects_key_and_button_events() {
        let config = WmConfig::default();
        assert!(config.root_event_mask.contains(EventMask::KEY_PRESS));
        assert!(config.root_event_mask.contains(EventMask::BUTTON_RELEASE));
    }

    #[test]
    fn test_default_bindings_hold_only_quit() {
        let config = WmConfig::default();
        assert_eq!(config.bindings.entries().len(), 1);
        assert_eq!(
            config
                .bindings
                .matches(KeySym::BACKSPACE, ModifierMask::CONTROL | ModifierMask::MOD1),
            KeyMatch::Terminate
        );
    }
}
