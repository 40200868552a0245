//! Integration tests for the startup sequence.
//!
//! These tests run `Session::establish` end-to-end against the simulated
//! server, with several clients competing for the same root window.

use rootwm::application::claim_ownership::OwnershipError;
use rootwm::application::config::WmConfig;
use rootwm::application::display::Head;
use rootwm::application::load_keymap::KeyMapLoadError;
use rootwm::application::startup::{Session, StartupError};
use rootwm::infrastructure::display::mock::{
    MockDisplay, RecordedRequest, SimulatedServer, BACKSPACE_CODE,
};
use rootwm_core::keymap::{KEYCODE_COUNT, MIN_KEYCODE};
use rootwm_core::{EventMask, KeySym};

fn establish(server: &SimulatedServer) -> Result<Session<MockDisplay>, StartupError> {
    Session::establish(|| Ok(server.connect()), WmConfig::default())
}

// ── Ownership ─────────────────────────────────────────────────────────────────

#[test]
fn test_second_manager_is_refused_while_first_runs() {
    // Arrange
    let server = SimulatedServer::new();
    let first = establish(&server).expect("first manager must start");

    // Act
    let second = establish(&server);

    // Assert
    let err = second.err().expect("second manager must be refused");
    assert!(matches!(err, StartupError::Ownership(OwnershipError::AccessDenied)));
    assert!(err.to_string().contains("another window manager is likely running"));
    assert_eq!(
        server.selection(first.root().window, first.server().client_id()),
        Some(EventMask::ROOT_INPUT),
        "the first manager keeps its selection"
    );
}

#[test]
fn test_manager_can_start_after_previous_one_exits() {
    let server = SimulatedServer::new();
    let first = establish(&server).expect("first manager must start");
    drop(first);

    let second = establish(&server);

    assert!(second.is_ok(), "root must be free once the first manager disconnects");
}

#[test]
fn test_claim_uses_root_and_standard_mask() {
    let server = SimulatedServer::new();

    let session = establish(&server).expect("startup must succeed");

    let requests = server.requests();
    assert_eq!(
        requests.last(),
        Some(&RecordedRequest::SelectEvents {
            window: session.root().window,
            mask: EventMask::ROOT_INPUT,
        })
    );
}

// ── Ordering and topology ─────────────────────────────────────────────────────

#[test]
fn test_requests_follow_startup_order() {
    let server = SimulatedServer::new();

    let session = establish(&server).expect("startup must succeed");

    assert_eq!(
        server.requests_from(session.server().client_id()),
        vec![
            RecordedRequest::SetupInfo,
            RecordedRequest::Xinerama,
            RecordedRequest::KeyboardMapping { first: MIN_KEYCODE, count: KEYCODE_COUNT },
            RecordedRequest::SelectEvents {
                window: session.root().window,
                mask: EventMask::ROOT_INPUT,
            },
        ]
    );
}

#[test]
fn test_zero_or_two_roots_abort_before_keymap_and_claim() {
    for count in [0, 2] {
        let server = SimulatedServer::with_roots(count);

        let result = establish(&server);

        assert!(
            matches!(result, Err(StartupError::UnsupportedTopology(n)) if n == count),
            "{count} roots must be rejected"
        );
        assert_eq!(
            server.requests(),
            vec![RecordedRequest::SetupInfo, RecordedRequest::Xinerama],
            "nothing may be requested after root resolution fails"
        );
    }
}

#[test]
fn test_heads_are_kept_on_the_root_surface() {
    let server = SimulatedServer::new();
    let heads = vec![
        Head { x: 0, y: 0, width: 1920, height: 1080 },
        Head { x: 1920, y: 0, width: 1280, height: 1024 },
    ];
    server.set_heads(heads.clone());

    let session = establish(&server).expect("startup must succeed");

    assert_eq!(session.root().heads, heads);
}

#[test]
fn test_missing_xinerama_is_fatal() {
    let server = SimulatedServer::new();
    server.fail_xinerama();

    let result = establish(&server);

    assert!(matches!(result, Err(StartupError::Xinerama(_))));
}

// ── Keymap ────────────────────────────────────────────────────────────────────

#[test]
fn test_keymap_is_built_from_server_mapping() {
    let server = SimulatedServer::new();

    let session = establish(&server).expect("startup must succeed");

    assert_eq!(session.keymap().stride(), 2);
    assert_eq!(session.keymap().base_symbol(BACKSPACE_CODE), Some(KeySym::BACKSPACE));
}

#[test]
fn test_malformed_mapping_aborts_before_claim() {
    // Arrange: one keysym short of a full stride-2 table
    let server = SimulatedServer::new();
    let short = usize::from(KEYCODE_COUNT) * 2 - 1;
    server.set_keysyms(2, vec![KeySym::NO_SYMBOL; short]);

    // Act
    let result = establish(&server);

    // Assert
    assert!(matches!(
        result,
        Err(StartupError::KeyMap(KeyMapLoadError::Malformed(_)))
    ));
    assert!(!server
        .requests()
        .iter()
        .any(|r| matches!(r, RecordedRequest::SelectEvents { .. })));
}

#[test]
fn test_keymap_request_failure_is_fatal() {
    let server = SimulatedServer::new();
    server.fail_keyboard_mapping();

    let result = establish(&server);

    assert!(matches!(
        result,
        Err(StartupError::KeyMap(KeyMapLoadError::Request(_)))
    ));
}

// ── Connection lifetime ───────────────────────────────────────────────────────

#[test]
fn test_connection_closed_once_on_failed_startup() {
    let server = SimulatedServer::with_roots(2);

    let _ = establish(&server);

    assert_eq!(server.closed_connections(), 1);
}

#[test]
fn test_connection_closed_once_after_session_ends() {
    let server = SimulatedServer::new();
    let session = establish(&server).expect("startup must succeed");
    assert_eq!(server.closed_connections(), 0);

    drop(session);

    assert_eq!(server.closed_connections(), 1);
}
