//! Live X11 adapter built on x11rb's pure-Rust connection.
//!
//! # Requests issued
//!
//! | Port method          | X11 request                                   |
//! |----------------------|-----------------------------------------------|
//! | `setup_info`         | none; reads the setup parsed at connect time  |
//! | `init_xinerama`      | `XINERAMA QueryVersion`, `XINERAMA QueryScreens` |
//! | `keyboard_mapping`   | `GetKeyboardMapping(first, count)`            |
//! | `select_events`      | `ChangeWindowAttributes(window, event-mask)`, checked |
//!
//! `select_events` is sent as a *checked* request so an `Access` error comes
//! back as the reply instead of arriving later in the event stream.
//!
//! # Receive errors
//!
//! `wait_for_event` hands back X11 error packets as ordinary events; they are
//! reported as [`ReceiveError::Protocol`] and the loop carries on.  A packet
//! that cannot be parsed is also a protocol error.  Any other
//! `ConnectionError` (I/O failure, EOF) means the socket is gone and becomes
//! [`ReceiveError::ConnectionLost`].

use rootwm_core::{ButtonEvent, Event, EventMask, KeyEvent, KeySym, ModifierMask};
use tracing::{debug, info, trace};
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xinerama::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{
    ChangeWindowAttributesAux, ConnectionExt as _, EventMask as XEventMask,
};
use x11rb::protocol::{ErrorKind, Event as XEvent};
use x11rb::rust_connection::RustConnection;

use crate::application::display::{
    DisplayError, DisplayServer, EventSource, Head, KeyboardMapping, ReceiveError, ScreenRoot,
    SelectEventsError, SetupInfo, WindowId,
};

/// X11 protocol major version every usable server speaks.
const X11_PROTOCOL_MAJOR: u16 = 11;

/// Xinerama version requested at initialisation.
const XINERAMA_VERSION: (u8, u8) = (1, 1);

/// An open connection to an X server.
pub struct X11Display {
    conn: RustConnection,
}

impl X11Display {
    /// Connects to `display_name`, or to `$DISPLAY` when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Connect`] if the display name cannot be parsed,
    /// the socket cannot be opened, or the server refuses the handshake.
    pub fn connect(display_name: Option<&str>) -> Result<Self, DisplayError> {
        let (conn, screen_num) =
            x11rb::connect(display_name).map_err(|e| DisplayError::Connect(e.to_string()))?;
        info!("connected to X server (default screen {screen_num})");
        Ok(Self { conn })
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        debug!("closing X11 connection");
    }
}

impl DisplayServer for X11Display {
    fn setup_info(&self) -> Result<SetupInfo, DisplayError> {
        let setup = self.conn.setup();
        if setup.protocol_major_version != X11_PROTOCOL_MAJOR {
            return Err(DisplayError::UnusableSetup(format!(
                "server speaks protocol {}.{}",
                setup.protocol_major_version, setup.protocol_minor_version
            )));
        }

        let roots = setup
            .roots
            .iter()
            .map(|screen| ScreenRoot {
                window: screen.root,
                width: screen.width_in_pixels,
                height: screen.height_in_pixels,
            })
            .collect();

        Ok(SetupInfo {
            roots,
            min_keycode: setup.min_keycode,
            max_keycode: setup.max_keycode,
        })
    }

    fn init_xinerama(&self) -> Result<Vec<Head>, DisplayError> {
        let (major, minor) = XINERAMA_VERSION;
        let version = self
            .conn
            .xinerama_query_version(major, minor)
            .map_err(xinerama_connection_error)?
            .reply()
            .map_err(|e| DisplayError::Request(format!("XINERAMA QueryVersion: {e}")))?;
        debug!("Xinerama {}.{} initialised", version.major, version.minor);

        let screens = self
            .conn
            .xinerama_query_screens()
            .map_err(xinerama_connection_error)?
            .reply()
            .map_err(|e| DisplayError::Request(format!("XINERAMA QueryScreens: {e}")))?;

        Ok(screens
            .screen_info
            .iter()
            .map(|info| Head {
                x: info.x_org,
                y: info.y_org,
                width: info.width,
                height: info.height,
            })
            .collect())
    }

    fn keyboard_mapping(&self, first_keycode: u8, count: u8) -> Result<KeyboardMapping, DisplayError> {
        let reply = self
            .conn
            .get_keyboard_mapping(first_keycode, count)
            .map_err(|e| DisplayError::Request(e.to_string()))?
            .reply()
            .map_err(|e| DisplayError::Request(format!("GetKeyboardMapping: {e}")))?;

        Ok(KeyboardMapping {
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms.into_iter().map(KeySym).collect(),
        })
    }

    fn select_events(&self, window: WindowId, mask: EventMask) -> Result<(), SelectEventsError> {
        let aux = ChangeWindowAttributesAux::new().event_mask(to_x11_event_mask(mask));
        let cookie = self
            .conn
            .change_window_attributes(window, &aux)
            .map_err(|e| SelectEventsError::Other(e.to_string()))?;

        match cookie.check() {
            Ok(()) => Ok(()),
            Err(ReplyError::X11Error(err)) if err.error_kind == ErrorKind::Access => {
                Err(SelectEventsError::AccessDenied)
            }
            Err(e) => Err(SelectEventsError::Other(e.to_string())),
        }
    }
}

impl EventSource for X11Display {
    fn next_event(&mut self) -> Result<Event, ReceiveError> {
        self.conn.flush().map_err(receive_error)?;
        let event = self.conn.wait_for_event().map_err(receive_error)?;
        translate_event(event)
    }
}

/// Converts one wire event into the domain model.
fn translate_event(event: XEvent) -> Result<Event, ReceiveError> {
    match event {
        XEvent::KeyPress(e) => Ok(Event::KeyPress(key_event(e.detail, u16::from(e.state)))),
        XEvent::KeyRelease(e) => Ok(Event::KeyRelease(key_event(e.detail, u16::from(e.state)))),
        XEvent::ButtonPress(e) => Ok(Event::ButtonPress(button_event(e.detail, u16::from(e.state)))),
        XEvent::ButtonRelease(e) => {
            Ok(Event::ButtonRelease(button_event(e.detail, u16::from(e.state))))
        }
        XEvent::Error(err) => Err(ReceiveError::Protocol(format!(
            "{:?} error (major opcode {}, sequence {})",
            err.error_kind, err.major_opcode, err.sequence
        ))),
        other => {
            trace!("unselected event: {other:?}");
            Ok(Event::Other)
        }
    }
}

fn key_event(code: u8, state: u16) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: ModifierMask::from_state(state),
    }
}

fn button_event(button: u8, state: u16) -> ButtonEvent {
    ButtonEvent {
        button,
        modifiers: ModifierMask::from_state(state),
    }
}

fn to_x11_event_mask(mask: EventMask) -> XEventMask {
    const PAIRS: [(EventMask, XEventMask); 4] = [
        (EventMask::KEY_PRESS, XEventMask::KEY_PRESS),
        (EventMask::KEY_RELEASE, XEventMask::KEY_RELEASE),
        (EventMask::BUTTON_PRESS, XEventMask::BUTTON_PRESS),
        (EventMask::BUTTON_RELEASE, XEventMask::BUTTON_RELEASE),
    ];

    PAIRS
        .iter()
        .filter(|(ours, _)| mask.contains(*ours))
        .fold(XEventMask::NO_EVENT, |acc, (_, theirs)| acc | *theirs)
}

fn xinerama_connection_error(err: ConnectionError) -> DisplayError {
    match err {
        ConnectionError::UnsupportedExtension => {
            DisplayError::ExtensionUnavailable(xinerama::X11_EXTENSION_NAME)
        }
        other => DisplayError::Request(other.to_string()),
    }
}

fn receive_error(err: ConnectionError) -> ReceiveError {
    match err {
        ConnectionError::ParseError(e) => ReceiveError::Protocol(format!("malformed packet: {e}")),
        other => ReceiveError::ConnectionLost(other.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::errors::ParseError;
    use x11rb::protocol::xproto::{KeyPressEvent, MapNotifyEvent};
    use x11rb::x11_utils::X11Error;

    fn window_error() -> X11Error {
        X11Error {
            error_kind: ErrorKind::Window,
            error_code: 3,
            sequence: 7,
            bad_value: 0x1a5,
            minor_opcode: 0,
            major_opcode: 2,
            extension_name: None,
            request_name: Some("ChangeWindowAttributes"),
        }
    }

    #[test]
    fn test_x11_error_event_is_recoverable() {
        // Act
        let result = translate_event(XEvent::Error(window_error()));

        // Assert
        match result {
            Err(ReceiveError::Protocol(reason)) => {
                assert!(reason.contains("Window"), "reason: {reason}");
                assert!(reason.contains("sequence 7"), "reason: {reason}");
            }
            other => panic!("expected a protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_key_press_event_keeps_code_and_modifiers() {
        let press = KeyPressEvent {
            detail: 22,
            state: 0x010Cu16.into(),
            ..Default::default()
        };

        let result = translate_event(XEvent::KeyPress(press));

        assert_eq!(
            result,
            Ok(Event::KeyPress(KeyEvent {
                code: 22,
                modifiers: ModifierMask::CONTROL | ModifierMask::MOD1,
            }))
        );
    }

    #[test]
    fn test_unselected_event_becomes_other() {
        let result = translate_event(XEvent::MapNotify(MapNotifyEvent::default()));

        assert_eq!(result, Ok(Event::Other));
    }

    #[test]
    fn test_root_input_mask_maps_to_core_bits() {
        let mask = to_x11_event_mask(EventMask::ROOT_INPUT);
        assert_eq!(u32::from(mask), 0x0F);
    }

    #[test]
    fn test_empty_mask_maps_to_no_event() {
        assert_eq!(u32::from(to_x11_event_mask(EventMask::NONE)), 0);
    }

    #[test]
    fn test_key_event_keeps_code_and_modifier_bits() {
        // Control | Mod1 | Button1
        let event = key_event(22, 0x010C);
        assert_eq!(event.code, 22);
        assert_eq!(event.modifiers, ModifierMask::CONTROL | ModifierMask::MOD1);
    }

    #[test]
    fn test_parse_error_is_recoverable() {
        let err = receive_error(ConnectionError::ParseError(ParseError::InsufficientData));
        assert!(matches!(err, ReceiveError::Protocol(_)));
    }

    #[test]
    fn test_io_error_is_connection_lost() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "server went away");
        let err = receive_error(ConnectionError::IoError(io));
        assert!(matches!(err, ReceiveError::ConnectionLost(_)));
    }

    #[test]
    fn test_missing_xinerama_is_extension_unavailable() {
        let err = xinerama_connection_error(ConnectionError::UnsupportedExtension);
        assert!(matches!(err, DisplayError::ExtensionUnavailable("XINERAMA")));
    }

    /// Smoke-test: without a DISPLAY the connect must fail; with one, the
    /// setup must be readable.
    #[test]
    fn test_connect_smoke() {
        let result = X11Display::connect(None);

        if std::env::var("DISPLAY").is_ok() {
            if let Ok(display) = result {
                assert!(display.setup_info().is_ok(), "setup must be readable");
            }
        } else {
            assert!(
                matches!(result, Err(DisplayError::Connect(_))),
                "connect must fail when DISPLAY is not set"
            );
        }
    }
}
