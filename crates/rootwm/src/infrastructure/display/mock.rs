//! Simulated display server for tests.
//!
//! [`SimulatedServer`] keeps the server-side state that matters for startup:
//! the roots in the setup, Xinerama heads, the keyboard mapping, and every
//! client's event selection per window.  Each [`SimulatedServer::connect`]
//! hands out a [`MockDisplay`] acting as one client.  Selecting
//! `BUTTON_PRESS` on a window where another client already holds it fails
//! with [`SelectEventsError::AccessDenied`], the same way a real server
//! rejects a second window manager.
//!
//! Events are scripted per connection with [`MockDisplay::push_event`] and
//! [`MockDisplay::push_error`]; once the script runs dry the connection
//! reports itself lost.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use rootwm_core::keymap::{KEYCODE_COUNT, MAX_KEYCODE, MIN_KEYCODE};
use rootwm_core::{Event, EventMask, KeySym};

use crate::application::display::{
    DisplayError, DisplayServer, EventSource, Head, KeyboardMapping, ReceiveError, ScreenRoot,
    SelectEventsError, SetupInfo, WindowId,
};

/// Identifies one simulated client connection.
pub type ClientId = u32;

/// Key code carrying BackSpace in the default mapping.
pub const BACKSPACE_CODE: u8 = 22;
/// Key code carrying `a`/`A` in the default mapping.
pub const LETTER_A_CODE: u8 = 38;

/// First root window id handed out by the simulated setup.
const FIRST_ROOT: WindowId = 0x0000_0100;

/// Default keysyms per key code.
const DEFAULT_STRIDE: u8 = 2;

/// A request as seen by the simulated server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    SetupInfo,
    Xinerama,
    KeyboardMapping { first: u8, count: u8 },
    SelectEvents { window: WindowId, mask: EventMask },
}

struct ServerState {
    roots: Vec<ScreenRoot>,
    heads: Vec<Head>,
    xinerama_available: bool,
    fail_keyboard_mapping: bool,
    stride: u8,
    keysyms: Vec<KeySym>,
    selections: HashMap<WindowId, HashMap<ClientId, EventMask>>,
    requests: Vec<(ClientId, RecordedRequest)>,
    next_client: ClientId,
    closed_connections: usize,
}

impl ServerState {
    fn record(&mut self, client: ClientId, request: RecordedRequest) {
        self.requests.push((client, request));
    }

    fn release(&mut self, client: ClientId) {
        for per_client in self.selections.values_mut() {
            per_client.remove(&client);
        }
        self.closed_connections += 1;
    }
}

/// Shared state of a simulated X server.  Clones refer to the same server.
#[derive(Clone)]
pub struct SimulatedServer {
    state: Arc<Mutex<ServerState>>,
}

impl SimulatedServer {
    /// One 1920x1080 root, a single Xinerama head, and a two-level keymap with
    /// BackSpace on [`BACKSPACE_CODE`] and `a`/`A` on [`LETTER_A_CODE`].
    pub fn new() -> Self {
        Self::with_roots(1)
    }

    /// Like [`new`](Self::new) but the setup lists `count` roots.
    pub fn with_roots(count: usize) -> Self {
        let roots = (0..count)
            .map(|i| ScreenRoot {
                window: FIRST_ROOT + i as WindowId,
                width: 1920,
                height: 1080,
            })
            .collect();

        let mut keysyms =
            vec![KeySym::NO_SYMBOL; usize::from(KEYCODE_COUNT) * usize::from(DEFAULT_STRIDE)];
        let slot = |code: u8| usize::from(code - MIN_KEYCODE) * usize::from(DEFAULT_STRIDE);
        keysyms[slot(BACKSPACE_CODE)] = KeySym::BACKSPACE;
        keysyms[slot(BACKSPACE_CODE) + 1] = KeySym::BACKSPACE;
        keysyms[slot(LETTER_A_CODE)] = KeySym(0x0061);
        keysyms[slot(LETTER_A_CODE) + 1] = KeySym(0x0041);

        Self {
            state: Arc::new(Mutex::new(ServerState {
                roots,
                heads: vec![Head { x: 0, y: 0, width: 1920, height: 1080 }],
                xinerama_available: true,
                fail_keyboard_mapping: false,
                stride: DEFAULT_STRIDE,
                keysyms,
                selections: HashMap::new(),
                requests: Vec::new(),
                next_client: 1,
                closed_connections: 0,
            })),
        }
    }

    /// Opens a new client connection.
    pub fn connect(&self) -> MockDisplay {
        let mut state = self.state.lock().expect("lock poisoned");
        let client = state.next_client;
        state.next_client += 1;
        drop(state);

        MockDisplay {
            client,
            server: self.clone(),
            script: VecDeque::new(),
            receive_calls: 0,
        }
    }

    /// Replaces the keyboard mapping.  `keysyms` covers codes 8..=255 flat.
    pub fn set_keysyms(&self, stride: u8, keysyms: Vec<KeySym>) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.stride = stride;
        state.keysyms = keysyms;
    }

    /// Replaces the Xinerama head list.
    pub fn set_heads(&self, heads: Vec<Head>) {
        self.state.lock().expect("lock poisoned").heads = heads;
    }

    /// Makes every subsequent GetKeyboardMapping fail.
    pub fn fail_keyboard_mapping(&self) {
        self.state.lock().expect("lock poisoned").fail_keyboard_mapping = true;
    }

    /// Removes the Xinerama extension from the server.
    pub fn fail_xinerama(&self) {
        self.state.lock().expect("lock poisoned").xinerama_available = false;
    }

    /// Every request received so far, from all clients, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        let state = self.state.lock().expect("lock poisoned");
        state.requests.iter().map(|(_, r)| r.clone()).collect()
    }

    /// Requests received from one client.
    pub fn requests_from(&self, client: ClientId) -> Vec<RecordedRequest> {
        let state = self.state.lock().expect("lock poisoned");
        state
            .requests
            .iter()
            .filter(|(c, _)| *c == client)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Current selection `client` holds on `window`, if any.
    pub fn selection(&self, window: WindowId, client: ClientId) -> Option<EventMask> {
        let state = self.state.lock().expect("lock poisoned");
        state.selections.get(&window).and_then(|m| m.get(&client)).copied()
    }

    /// Number of client connections closed so far.
    pub fn closed_connections(&self) -> usize {
        self.state.lock().expect("lock poisoned").closed_connections
    }
}

impl Default for SimulatedServer {
    fn default() -> Self {
        Self::new()
    }
}

/// One client connection to a [`SimulatedServer`].
pub struct MockDisplay {
    client: ClientId,
    server: SimulatedServer,
    script: VecDeque<Result<Event, ReceiveError>>,
    receive_calls: usize,
}

impl MockDisplay {
    pub fn client_id(&self) -> ClientId {
        self.client
    }

    /// Queues an event for a later `next_event`.
    pub fn push_event(&mut self, event: Event) {
        self.script.push_back(Ok(event));
    }

    /// Queues a receive failure for a later `next_event`.
    pub fn push_error(&mut self, error: ReceiveError) {
        self.script.push_back(Err(error));
    }

    /// Number of `next_event` calls made on this connection.
    pub fn receive_calls(&self) -> usize {
        self.receive_calls
    }

    /// Events and errors still queued.
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ServerState) -> T) -> T {
        let mut state = self.server.state.lock().expect("lock poisoned");
        f(&mut state)
    }
}

impl Drop for MockDisplay {
    fn drop(&mut self) {
        let client = self.client;
        // A panicking test may have poisoned the lock; nothing to release then.
        if let Ok(mut state) = self.server.state.lock() {
            state.release(client);
        }
    }
}

impl DisplayServer for MockDisplay {
    fn setup_info(&self) -> Result<SetupInfo, DisplayError> {
        self.with_state(|state| {
            state.record(self.client, RecordedRequest::SetupInfo);
            Ok(SetupInfo {
                roots: state.roots.clone(),
                min_keycode: MIN_KEYCODE,
                max_keycode: MAX_KEYCODE,
            })
        })
    }

    fn init_xinerama(&self) -> Result<Vec<Head>, DisplayError> {
        self.with_state(|state| {
            state.record(self.client, RecordedRequest::Xinerama);
            if state.xinerama_available {
                Ok(state.heads.clone())
            } else {
                Err(DisplayError::ExtensionUnavailable("XINERAMA"))
            }
        })
    }

    fn keyboard_mapping(&self, first_keycode: u8, count: u8) -> Result<KeyboardMapping, DisplayError> {
        self.with_state(|state| {
            state.record(
                self.client,
                RecordedRequest::KeyboardMapping { first: first_keycode, count },
            );
            if state.fail_keyboard_mapping {
                return Err(DisplayError::Request("GetKeyboardMapping: BadImplementation".into()));
            }

            let last = u16::from(first_keycode) + u16::from(count);
            if first_keycode < MIN_KEYCODE || last > u16::from(MAX_KEYCODE) + 1 {
                return Err(DisplayError::Request("GetKeyboardMapping: BadValue".into()));
            }

            let stride = usize::from(state.stride);
            let start = usize::from(first_keycode - MIN_KEYCODE) * stride;
            let end = start + usize::from(count) * stride;
            Ok(KeyboardMapping {
                keysyms_per_keycode: state.stride,
                keysyms: state.keysyms.get(start..end).unwrap_or_default().to_vec(),
            })
        })
    }

    fn select_events(&self, window: WindowId, mask: EventMask) -> Result<(), SelectEventsError> {
        self.with_state(|state| {
            state.record(self.client, RecordedRequest::SelectEvents { window, mask });
            if !state.roots.iter().any(|root| root.window == window) {
                return Err(SelectEventsError::Other(format!("BadWindow 0x{window:x}")));
            }

            let per_client = state.selections.entry(window).or_default();
            let contested = mask.intersects(EventMask::BUTTON_PRESS)
                && per_client.iter().any(|(other, held)| {
                    *other != self.client && held.intersects(EventMask::BUTTON_PRESS)
                });
            if contested {
                return Err(SelectEventsError::AccessDenied);
            }

            if mask == EventMask::NONE {
                per_client.remove(&self.client);
            } else {
                per_client.insert(self.client, mask);
            }
            Ok(())
        })
    }
}

impl EventSource for MockDisplay {
    fn next_event(&mut self) -> Result<Event, ReceiveError> {
        self.receive_calls += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(ReceiveError::ConnectionLost("server closed the connection".into())))
    }
}
