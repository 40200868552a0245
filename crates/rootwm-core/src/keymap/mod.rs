//! The keyboard mapping table: raw key codes to ordered keysym lists.
//!
//! The table is fetched from the server exactly once, in a single
//! GetKeyboardMapping round trip covering every usable code.  The reply is a
//! flat keysym sequence plus a stride ("keysyms per keycode"); the table keeps
//! that flat layout and hands out one `stride`-long slice per code.
//!
//! Index 0 of each slice is the base (unshifted) symbol.  Key resolution in
//! rootwm always uses the base symbol regardless of modifier state; the
//! remaining shift levels are kept so a level-aware lookup can be added
//! without refetching.

pub mod keysyms;

use thiserror::Error;
use tracing::debug;

pub use keysyms::KeySym;

/// Lowest key code a server may report.  Codes 0–7 are reserved.
pub const MIN_KEYCODE: u8 = 8;

/// Highest key code a server may report.
pub const MAX_KEYCODE: u8 = 255;

/// Number of codes fetched in the single mapping request (8..=255).
pub const KEYCODE_COUNT: u8 = MAX_KEYCODE - MIN_KEYCODE + 1;

/// A validated, hardware-dependent key code in the range 8..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(u8);

impl KeyCode {
    /// Validates a raw code.  Returns `None` for the reserved codes 0–7.
    pub fn new(raw: u8) -> Option<Self> {
        if raw >= MIN_KEYCODE {
            Some(KeyCode(raw))
        } else {
            None
        }
    }

    /// Returns the raw code.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// Zero-based position of this code inside the table.
    fn index(self) -> usize {
        usize::from(self.0 - MIN_KEYCODE)
    }
}

/// Errors produced while building a [`KeyMapTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyMapError {
    /// The reply advertised zero keysyms per keycode.
    #[error("keyboard mapping reply has zero keysyms per keycode")]
    ZeroStride,

    /// The flat keysym list does not cover every requested code.
    #[error("keyboard mapping reply holds {actual} keysyms, expected {expected} ({count} codes x {stride})")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        count: usize,
        stride: usize,
    },
}

/// Immutable mapping from [`KeyCode`] to its ordered keysyms.
///
/// Built once from the server's reply and never mutated afterwards, so a
/// shared reference can be read from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapTable {
    stride: usize,
    symbols: Box<[KeySym]>,
}

impl KeyMapTable {
    /// Reshapes a GetKeyboardMapping reply for codes 8..=255 into a table.
    ///
    /// `keysyms_per_keycode` is the reply's stride and `keysyms` its flat
    /// symbol list, which must hold exactly `248 * stride` entries.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::ZeroStride`] if the stride is zero.
    /// - [`KeyMapError::LengthMismatch`] if the flat list is the wrong length.
    pub fn from_reply(keysyms_per_keycode: u8, keysyms: Vec<KeySym>) -> Result<Self, KeyMapError> {
        let stride = usize::from(keysyms_per_keycode);
        if stride == 0 {
            return Err(KeyMapError::ZeroStride);
        }

        let count = usize::from(KEYCODE_COUNT);
        let expected = count * stride;
        if keysyms.len() != expected {
            return Err(KeyMapError::LengthMismatch {
                expected,
                actual: keysyms.len(),
                count,
                stride,
            });
        }

        debug!("keymap table built: {count} codes, {stride} keysyms per code");
        Ok(Self {
            stride,
            symbols: keysyms.into_boxed_slice(),
        })
    }

    /// Number of keysyms stored per code (shift levels reported by the server).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the ordered keysyms for a raw code.
    ///
    /// Codes outside 8..=255 yield an empty slice, never a panic.
    pub fn symbols_for(&self, raw: u8) -> &[KeySym] {
        match KeyCode::new(raw) {
            Some(code) => self.symbols_for_code(code),
            None => &[],
        }
    }

    /// Returns the ordered keysyms for a validated code.
    pub fn symbols_for_code(&self, code: KeyCode) -> &[KeySym] {
        let start = code.index() * self.stride;
        &self.symbols[start..start + self.stride]
    }

    /// Returns the base (unshifted) keysym for a raw code.
    ///
    /// `None` only for reserved codes; a code with no binding on the current
    /// layout yields `Some(KeySym::NO_SYMBOL)`.
    pub fn base_symbol(&self, raw: u8) -> Option<KeySym> {
        self.symbols_for(raw).first().copied()
    }

    /// Finds the first code whose base symbol is `sym`.
    pub fn code_for_base_symbol(&self, sym: KeySym) -> Option<KeyCode> {
        (MIN_KEYCODE..=MAX_KEYCODE)
            .filter_map(KeyCode::new)
            .find(|&code| self.symbols_for_code(code).first() == Some(&sym))
    }
}
