//! X11 KeySym values and their symbolic names.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # What is a KeySym?
//!
//! The server hands out raw *key codes*: hardware-dependent numbers in the
//! range 8..=255 that say which physical key moved, not what it means.  The
//! keyboard mapping turns each code into one or more **KeySyms**, the
//! layout-resolved identity of the key:
//!
//! | KeySym name | Value  | Meaning         |
//! |-------------|--------|-----------------|
//! | `a`         | 0x0061 | lowercase 'a'   |
//! | `A`         | 0x0041 | uppercase 'A'   |
//! | `Return`    | 0xFF0D | Enter key       |
//! | `BackSpace` | 0xFF08 | delete-backward |
//!
//! Printable Latin-1 keysyms share their value with the ASCII character, so
//! they are not listed by name below; [`KeySym::as_char`] covers them.

use std::fmt;

/// A symbolic, layout-resolved key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeySym(pub u32);

impl KeySym {
    /// `NoSymbol`: the slot exists but carries no symbol.
    pub const NO_SYMBOL: KeySym = KeySym(0x0000);

    // Control keys
    pub const BACKSPACE: KeySym = KeySym(0xFF08);
    pub const TAB: KeySym = KeySym(0xFF09);
    pub const RETURN: KeySym = KeySym(0xFF0D);
    pub const PAUSE: KeySym = KeySym(0xFF13);
    pub const SCROLL_LOCK: KeySym = KeySym(0xFF14);
    pub const ESCAPE: KeySym = KeySym(0xFF1B);
    pub const DELETE: KeySym = KeySym(0xFFFF);
    pub const SPACE: KeySym = KeySym(0x0020);

    // Navigation
    pub const HOME: KeySym = KeySym(0xFF50);
    pub const LEFT: KeySym = KeySym(0xFF51);
    pub const UP: KeySym = KeySym(0xFF52);
    pub const RIGHT: KeySym = KeySym(0xFF53);
    pub const DOWN: KeySym = KeySym(0xFF54);
    pub const PAGE_UP: KeySym = KeySym(0xFF55);
    pub const PAGE_DOWN: KeySym = KeySym(0xFF56);
    pub const END: KeySym = KeySym(0xFF57);
    pub const PRINT: KeySym = KeySym(0xFF61);
    pub const INSERT: KeySym = KeySym(0xFF63);
    pub const MENU: KeySym = KeySym(0xFF67);
    pub const NUM_LOCK: KeySym = KeySym(0xFF7F);

    // Function keys
    pub const F1: KeySym = KeySym(0xFFBE);
    pub const F12: KeySym = KeySym(0xFFC9);

    // Modifier keys
    pub const SHIFT_L: KeySym = KeySym(0xFFE1);
    pub const SHIFT_R: KeySym = KeySym(0xFFE2);
    pub const CONTROL_L: KeySym = KeySym(0xFFE3);
    pub const CONTROL_R: KeySym = KeySym(0xFFE4);
    pub const CAPS_LOCK: KeySym = KeySym(0xFFE5);
    pub const ALT_L: KeySym = KeySym(0xFFE9);
    pub const ALT_R: KeySym = KeySym(0xFFEA);
    pub const SUPER_L: KeySym = KeySym(0xFFEB);
    pub const SUPER_R: KeySym = KeySym(0xFFEC);

    /// Returns the printable character for Latin-1 keysyms (0x20..=0x7E).
    pub fn as_char(self) -> Option<char> {
        match self.0 {
            0x0020..=0x007E => char::from_u32(self.0),
            _ => None,
        }
    }
}

impl fmt::Display for KeySym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = keysym_name(*self) {
            f.write_str(name)
        } else if let Some(c) = self.as_char() {
            write!(f, "{c}")
        } else {
            write!(f, "0x{:04x}", self.0)
        }
    }
}

/// Returns the keysymdef.h name of a non-printable keysym.
///
/// Returns `None` for printable Latin-1 keysyms and for anything not in the
/// table; callers fall back to [`KeySym::as_char`] or the hex value.
pub fn keysym_name(sym: KeySym) -> Option<&'static str> {
    match sym.0 {
        0x0000 => Some("NoSymbol"),
        0x0020 => Some("space"),

        // Control keys
        0xFF08 => Some("BackSpace"),
        0xFF09 => Some("Tab"),
        0xFF0D => Some("Return"),
        0xFF13 => Some("Pause"),
        0xFF14 => Some("Scroll_Lock"),
        0xFF1B => Some("Escape"),
        0xFFFF => Some("Delete"),

        // Navigation
        0xFF50 => Some("Home"),
        0xFF51 => Some("Left"),
        0xFF52 => Some("Up"),
        0xFF53 => Some("Right"),
        0xFF54 => Some("Down"),
        0xFF55 => Some("Page_Up"),
        0xFF56 => Some("Page_Down"),
        0xFF57 => Some("End"),
        0xFF61 => Some("Print"),
        0xFF63 => Some("Insert"),
        0xFF67 => Some("Menu"),
        0xFF7F => Some("Num_Lock"),

        // Keypad
        0xFF8D => Some("KP_Enter"),
        0xFFAA => Some("KP_Multiply"),
        0xFFAB => Some("KP_Add"),
        0xFFAD => Some("KP_Subtract"),
        0xFFAE => Some("KP_Decimal"),
        0xFFAF => Some("KP_Divide"),
        0xFFB0 => Some("KP_0"),
        0xFFB1 => Some("KP_1"),
        0xFFB2 => Some("KP_2"),
        0xFFB3 => Some("KP_3"),
        0xFFB4 => Some("KP_4"),
        0xFFB5 => Some("KP_5"),
        0xFFB6 => Some("KP_6"),
        0xFFB7 => Some("KP_7"),
        0xFFB8 => Some("KP_8"),
        0xFFB9 => Some("KP_9"),

        // Function keys
        0xFFBE => Some("F1"),
        0xFFBF => Some("F2"),
        0xFFC0 => Some("F3"),
        0xFFC1 => Some("F4"),
        0xFFC2 => Some("F5"),
        0xFFC3 => Some("F6"),
        0xFFC4 => Some("F7"),
        0xFFC5 => Some("F8"),
        0xFFC6 => Some("F9"),
        0xFFC7 => Some("F10"),
        0xFFC8 => Some("F11"),
        0xFFC9 => Some("F12"),

        // Modifier keys
        0xFFE1 => Some("Shift_L"),
        0xFFE2 => Some("Shift_R"),
        0xFFE3 => Some("Control_L"),
        0xFFE4 => Some("Control_R"),
        0xFFE5 => Some("Caps_Lock"),
        0xFFE7 => Some("Meta_L"),
        0xFFE8 => Some("Meta_R"),
        0xFFE9 => Some("Alt_L"),
        0xFFEA => Some("Alt_R"),
        0xFFEB => Some("Super_L"),
        0xFFEC => Some("Super_R"),

        _ => None,
    }
}
