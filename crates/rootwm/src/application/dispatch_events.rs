//! The event loop: receive, classify, resolve, decide.
//!
//! The loop is strictly synchronous.  One event is received, fully handled,
//! and only then is the next receive issued.  Two states exist:
//!
//! ```text
//!            ┌──────────── Continue ────────────┐
//!            ▼                                  │
//!       ┌─────────┐  next_event() / handle  ┌───┴───┐
//!  ───► │ Running │ ──────────────────────► │ step  │
//!       └─────────┘                         └───┬───┘
//!                                               │ quit binding / connection lost
//!                                               ▼
//!                                        ┌────────────┐
//!                                        │ Terminated │
//!                                        └────────────┘
//! ```
//!
//! A protocol-level receive error is logged and counted; the loop stays in
//! `Running`.  Quit is signalled through [`KeyOutcome::Terminate`], never as
//! an error.

use rootwm_core::{Event, KeyBindings, KeyEvent, KeyMapTable, KeyMatch, KeySym, ModifierMask};
use tracing::{debug, error, info, trace, warn};

use super::display::{EventSource, ReceiveError};

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminateReason {
    /// A key press matched a terminating binding.
    QuitBinding {
        keysym: KeySym,
        modifiers: ModifierMask,
    },
    /// The connection to the server is gone.
    ConnectionLost(String),
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Terminate(TerminateReason),
}

/// Loop state after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated(TerminateReason),
}

/// Totals reported when the loop exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Events received and handled, including the one that terminated the loop.
    pub events_handled: u64,
    /// Receive calls that failed with a recoverable error.
    pub receive_errors: u64,
    pub reason: TerminateReason,
}

/// Routes received events through the keymap and the binding table.
pub struct EventDispatcher<'a> {
    keymap: &'a KeyMapTable,
    bindings: &'a KeyBindings,
    events_handled: u64,
    receive_errors: u64,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(keymap: &'a KeyMapTable, bindings: &'a KeyBindings) -> Self {
        Self {
            keymap,
            bindings,
            events_handled: 0,
            receive_errors: 0,
        }
    }

    /// Runs until a terminating binding fires or the connection is lost.
    pub fn run<E: EventSource + ?Sized>(mut self, source: &mut E) -> DispatchSummary {
        info!("entering event loop");
        let reason = loop {
            match self.step(source) {
                LoopState::Running => continue,
                LoopState::Terminated(reason) => break reason,
            }
        };

        let summary = DispatchSummary {
            events_handled: self.events_handled,
            receive_errors: self.receive_errors,
            reason,
        };
        info!(
            "event loop finished after {} events ({} receive errors)",
            summary.events_handled, summary.receive_errors
        );
        summary
    }

    /// Performs one blocking receive and handles the result.
    pub fn step<E: EventSource + ?Sized>(&mut self, source: &mut E) -> LoopState {
        match source.next_event() {
            Ok(event) => {
                self.events_handled += 1;
                match self.handle_event(&event) {
                    KeyOutcome::Continue => LoopState::Running,
                    KeyOutcome::Terminate(reason) => LoopState::Terminated(reason),
                }
            }
            Err(ReceiveError::ConnectionLost(reason)) => {
                error!("connection to the display server lost: {reason}");
                LoopState::Terminated(TerminateReason::ConnectionLost(reason))
            }
            Err(e @ ReceiveError::Protocol(_)) => {
                self.receive_errors += 1;
                warn!("receive failed, continuing: {e}");
                LoopState::Running
            }
        }
    }

    /// Classifies one event.  Only key presses can terminate the loop.
    pub fn handle_event(&self, event: &Event) -> KeyOutcome {
        match event {
            Event::KeyPress(key) => self.handle_key_press(key),
            Event::KeyRelease(_)
            | Event::ButtonPress(_)
            | Event::ButtonRelease(_)
            | Event::Other => {
                trace!("{} discarded", event.kind());
                KeyOutcome::Continue
            }
        }
    }

    fn handle_key_press(&self, key: &KeyEvent) -> KeyOutcome {
        // Base symbol only; shift levels are not consulted.
        let Some(keysym) = self.keymap.base_symbol(key.code) else {
            debug!("key press with reserved code {}; ignored", key.code);
            return KeyOutcome::Continue;
        };
        debug!("key press: code {} -> {} ({})", key.code, keysym, key.modifiers);

        match self.bindings.matches(keysym, key.modifiers) {
            KeyMatch::NoMatch => KeyOutcome::Continue,
            KeyMatch::Terminate => {
                info!("quit binding {}+{} pressed", key.modifiers, keysym);
                KeyOutcome::Terminate(TerminateReason::QuitBinding {
                    keysym,
                    modifiers: key.modifiers,
                })
            }
        }
    }
}
