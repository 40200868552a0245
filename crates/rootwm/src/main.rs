//! rootwm entry point.
//!
//! Connects to the X server named by `$DISPLAY`, claims the root window,
//! and dispatches input until Control+Alt+BackSpace is pressed.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Session::establish()   -- connect, setup, Xinerama, root, keymap, claim
//!  └─ Session::run()         -- blocking event loop
//! ```
//!
//! Exit status is 0 after the quit binding and non-zero for any startup
//! failure or a lost connection.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rootwm::application::config::WmConfig;
use rootwm::application::dispatch_events::TerminateReason;
use rootwm::application::startup::Session;
use rootwm::infrastructure::display::X11Display;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("rootwm {} starting", env!("CARGO_PKG_VERSION"));

    let mut session = Session::establish(|| X11Display::connect(None), WmConfig::default())
        .context("rootwm could not take over the display")?;

    let summary = session.run();
    drop(session);

    match summary.reason {
        TerminateReason::QuitBinding { keysym, modifiers } => {
            info!("quit requested with {modifiers}+{keysym}; exiting");
            Ok(())
        }
        TerminateReason::ConnectionLost(reason) => {
            anyhow::bail!("display connection lost: {reason}")
        }
    }
}
