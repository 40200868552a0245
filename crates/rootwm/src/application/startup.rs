//! Startup sequence and the session context it produces.
//!
//! The order is fixed:
//!
//! ```text
//! connect ─► setup ─► Xinerama ─► root resolution ─► keymap load ─► ownership claim ─► event loop
//! ```
//!
//! The keymap must exist before the first key press can be resolved, and
//! nothing is received before ownership is claimed.  Every step is fatal on
//! failure; there is no partial-startup mode.
//!
//! The [`Session`] owns the connection.  Whether startup fails half-way or
//! the loop exits normally, the connection is dropped exactly once with it.

use rootwm_core::keymap::{MAX_KEYCODE, MIN_KEYCODE};
use rootwm_core::{KeyBinding, KeyBindings, KeyMapTable};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::claim_ownership::{claim_ownership, OwnershipError};
use super::config::WmConfig;
use super::dispatch_events::{DispatchSummary, EventDispatcher};
use super::display::{DisplayError, DisplayServer, EventSource, Head, SetupInfo, WindowId};
use super::load_keymap::{load_key_map, KeyMapLoadError};

/// Error type for the startup sequence.  Every variant aborts the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot open display connection: {0}")]
    Connect(#[source] DisplayError),

    #[error("cannot read connection setup: {0}")]
    Setup(#[source] DisplayError),

    #[error("cannot initialise Xinerama: {0}")]
    Xinerama(#[source] DisplayError),

    #[error("unsupported topology: expected exactly one root window, server reported {0}")]
    UnsupportedTopology(usize),

    #[error(transparent)]
    KeyMap(#[from] KeyMapLoadError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),
}

/// The single logical display area this manager controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSurface {
    pub window: WindowId,
    pub width: u16,
    pub height: u16,
    /// Physical monitors inside the root; empty when Xinerama is inactive.
    pub heads: Vec<Head>,
}

/// Picks the single root window out of the setup.
///
/// # Errors
///
/// [`StartupError::UnsupportedTopology`] unless exactly one root is listed.
pub fn resolve_root(setup: &SetupInfo, heads: Vec<Head>) -> Result<RootSurface, StartupError> {
    match setup.roots.as_slice() {
        [root] => Ok(RootSurface {
            window: root.window,
            width: root.width,
            height: root.height,
            heads,
        }),
        roots => Err(StartupError::UnsupportedTopology(roots.len())),
    }
}

/// Bindings whose keysym is not the base symbol of any key code.
///
/// Such a binding can never fire on the current layout.
pub fn unreachable_bindings<'b>(
    keymap: &KeyMapTable,
    bindings: &'b KeyBindings,
) -> Vec<&'b KeyBinding> {
    bindings
        .entries()
        .iter()
        .filter(|binding| keymap.code_for_base_symbol(binding.keysym).is_none())
        .collect()
}

/// Process-wide state, written once during startup and read-only after.
pub struct Session<S> {
    server: S,
    root: RootSurface,
    keymap: KeyMapTable,
    bindings: KeyBindings,
}

impl<S: DisplayServer + EventSource> Session<S> {
    /// Runs the startup sequence against the connection returned by `connect`.
    ///
    /// # Errors
    ///
    /// Returns the first failing step as a [`StartupError`].  The connection,
    /// if it was opened, has already been released when this returns `Err`.
    pub fn establish<F>(connect: F, config: WmConfig) -> Result<Self, StartupError>
    where
        F: FnOnce() -> Result<S, DisplayError>,
    {
        let server = connect().map_err(StartupError::Connect)?;

        let setup = server.setup_info().map_err(StartupError::Setup)?;
        if setup.min_keycode > MIN_KEYCODE || setup.max_keycode < MAX_KEYCODE {
            warn!(
                "server key codes span {}..={}; mapping is requested for {}..={} regardless",
                setup.min_keycode, setup.max_keycode, MIN_KEYCODE, MAX_KEYCODE
            );
        }

        let heads = server.init_xinerama().map_err(StartupError::Xinerama)?;
        let root = resolve_root(&setup, heads)?;
        info!(
            "managing root window 0x{:x} ({}x{}, {} head(s))",
            root.window,
            root.width,
            root.height,
            root.heads.len()
        );
        for (i, head) in root.heads.iter().enumerate() {
            info!(
                "head {i}: {}x{} at ({}, {})",
                head.width, head.height, head.x, head.y
            );
        }

        let keymap = load_key_map(&server)?;
        for binding in unreachable_bindings(&keymap, &config.bindings) {
            warn!(
                "no key code produces {}; binding {}+{} cannot fire",
                binding.keysym, binding.modifiers, binding.keysym
            );
        }
        debug!("{} key binding(s) active", config.bindings.entries().len());
        claim_ownership(&server, root.window, config.root_event_mask)?;

        Ok(Self {
            server,
            root,
            keymap,
            bindings: config.bindings,
        })
    }

    /// Enters the event loop and blocks until it terminates.
    pub fn run(&mut self) -> DispatchSummary {
        EventDispatcher::new(&self.keymap, &self.bindings).run(&mut self.server)
    }
}

impl<S> Session<S> {
    pub fn root(&self) -> &RootSurface {
        &self.root
    }

    pub fn keymap(&self) -> &KeyMapTable {
        &self.keymap
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut S {
        &mut self.server
    }
}
