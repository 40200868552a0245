//! Modifier key bitset.
//!
//! Bit positions follow the X11 core protocol `KeyButMask` so a mask read
//! off the wire converts with a plain `u16` copy.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of simultaneously held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierMask(pub u16);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const SHIFT: ModifierMask = ModifierMask(1 << 0);
    pub const LOCK: ModifierMask = ModifierMask(1 << 1);
    pub const CONTROL: ModifierMask = ModifierMask(1 << 2);
    /// First alternate bit; Alt on virtually every layout.
    pub const MOD1: ModifierMask = ModifierMask(1 << 3);
    /// Usually Num Lock.
    pub const MOD2: ModifierMask = ModifierMask(1 << 4);
    pub const MOD3: ModifierMask = ModifierMask(1 << 5);
    /// Usually Super.
    pub const MOD4: ModifierMask = ModifierMask(1 << 6);
    pub const MOD5: ModifierMask = ModifierMask(1 << 7);

    /// Only the eight modifier bits; pointer-button bits are dropped.
    const MODIFIER_BITS: u16 = 0x00FF;

    /// Builds a mask from a raw event state, discarding pointer-button bits.
    pub fn from_state(state: u16) -> Self {
        ModifierMask(state & Self::MODIFIER_BITS)
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub fn contains(self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModifierMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ModifierMask, &str); 8] = [
            (ModifierMask::SHIFT, "Shift"),
            (ModifierMask::LOCK, "Lock"),
            (ModifierMask::CONTROL, "Control"),
            (ModifierMask::MOD1, "Mod1"),
            (ModifierMask::MOD2, "Mod2"),
            (ModifierMask::MOD3, "Mod3"),
            (ModifierMask::MOD4, "Mod4"),
            (ModifierMask::MOD5, "Mod5"),
        ];

        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
