//! Virtual keys, modifier flags and the held-key table.
//!
//! [`KeysState`] records which keys are currently down and when each was
//! pressed. It is the single source for modifier synthesis and for the
//! hold/duration reports generated when events are processed.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::constants::keys::KEY_COUNT;

// ============================================================================
// Virtual keys
// ============================================================================

/// Virtual key code.
///
/// Values follow the common desktop virtual-key table so platform glue can
/// pass codes through with little translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VirtKey(pub u8);

impl VirtKey {
    pub const BACKSPACE: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const MENU: Self = Self(0x12);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const PAGE_UP: Self = Self(0x21);
    pub const PAGE_DOWN: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const DELETE: Self = Self(0x2E);
    pub const F1: Self = Self(0x70);
    pub const F11: Self = Self(0x7A);
    pub const MEDIA_NEXT: Self = Self(0xB0);
    pub const MEDIA_PREV: Self = Self(0xB1);
    pub const MEDIA_STOP: Self = Self(0xB2);
    pub const MEDIA_PLAY_PAUSE: Self = Self(0xB3);
    pub const COMMAND: Self = Self(0xD8);
    pub const FUNCTION: Self = Self(0xD9);

    /// Index into the key table.
    #[must_use]
    pub const fn index(self) -> usize { self.0 as usize }
}

impl fmt::Display for VirtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "0x{:02X}", self.0) }
}

// ============================================================================
// Modifiers
// ============================================================================

/// Modifier key bit set attached to key events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const SHIFT: Self = Self(1 << 8);
    pub const CONTROL: Self = Self(1 << 9);
    pub const ALT: Self = Self(1 << 10);
    pub const COMMAND: Self = Self(1 << 11);
    pub const FUNCTION: Self = Self(1 << 12);

    /// No modifier held.
    #[must_use]
    pub const fn empty() -> Self { Self(0) }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u16 { self.0 }

    /// Returns true when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    /// Returns true when no modifier is set.
    #[must_use]
    pub const fn is_empty(self) -> bool { self.0 == 0 }

    /// Sets the bits of `other`.
    pub const fn insert(&mut self, other: Self) { self.0 |= other.0; }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) { self.0 |= rhs.0; }
}

/// Canonical key for each modifier flag.
const MODIFIER_KEYS: [(VirtKey, Modifiers); 5] = [
    (VirtKey::SHIFT, Modifiers::SHIFT),
    (VirtKey::CONTROL, Modifiers::CONTROL),
    (VirtKey::MENU, Modifiers::ALT),
    (VirtKey::COMMAND, Modifiers::COMMAND),
    (VirtKey::FUNCTION, Modifiers::FUNCTION),
];

// ============================================================================
// KeysState
// ============================================================================

/// Table of held keys and their press timestamps.
#[derive(Clone)]
pub struct KeysState {
    down: [bool; KEY_COUNT],
    times: [f64; KEY_COUNT],
}

impl Default for KeysState {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for KeysState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeysState").field("pressed", &self.pressed_keys().collect::<Vec<_>>()).finish()
    }
}

impl KeysState {
    /// Creates a table with every key released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            down: [false; KEY_COUNT],
            times: [0.0; KEY_COUNT],
        }
    }

    /// Releases every key. Called on focus loss.
    pub fn reset(&mut self) {
        self.down = [false; KEY_COUNT];
        self.times = [0.0; KEY_COUNT];
    }

    /// Records a key press.
    ///
    /// A repeated press of a key already down keeps the original timestamp.
    /// Returns true if the key was previously up.
    pub fn key_down(&mut self, key: VirtKey, time: f64) -> bool {
        let idx = key.index();
        if self.down[idx] {
            return false;
        }
        self.down[idx] = true;
        self.times[idx] = time;
        true
    }

    /// Records a key release and returns the press timestamp.
    ///
    /// Returns `None` when the key was not down.
    pub fn key_up(&mut self, key: VirtKey) -> Option<f64> {
        let idx = key.index();
        if !self.down[idx] {
            return None;
        }
        self.down[idx] = false;
        Some(self.times[idx])
    }

    /// Returns whether the key is held.
    #[must_use]
    pub const fn is_key_down(&self, key: VirtKey) -> bool { self.down[key.index()] }

    /// Press timestamp of a held key.
    #[must_use]
    pub const fn key_time(&self, key: VirtKey) -> Option<f64> {
        if self.down[key.index()] { Some(self.times[key.index()]) } else { None }
    }

    /// Modifier flags derived from the held modifier keys.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        MODIFIER_KEYS
            .iter()
            .filter(|(key, _)| self.is_key_down(*key))
            .fold(Modifiers::empty(), |acc, (_, flag)| acc | *flag)
    }

    /// Held keys with their press timestamps, in key-code order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn pressed_keys(&self) -> impl Iterator<Item = (VirtKey, f64)> + '_ {
        self.down
            .iter()
            .enumerate()
            .filter(|(_, down)| **down)
            .map(|(idx, _)| (VirtKey(idx as u8), self.times[idx]))
    }

    /// Number of held keys.
    #[must_use]
    pub fn pressed_count(&self) -> usize { self.down.iter().filter(|d| **d).count() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_down_keeps_state() {
        let mut keys = KeysState::new();
        assert!(keys.key_down(VirtKey::SPACE, 1.0));
        assert!(!keys.key_down(VirtKey::SPACE, 2.0));
        assert!(keys.is_key_down(VirtKey::SPACE));
        assert_eq!(keys.key_time(VirtKey::SPACE), Some(1.0));

        assert_eq!(keys.key_up(VirtKey::SPACE), Some(1.0));
        assert!(!keys.is_key_down(VirtKey::SPACE));
    }

    #[test]
    fn test_key_up_without_down_is_none() {
        let mut keys = KeysState::new();
        assert_eq!(keys.key_up(VirtKey::ESCAPE), None);
        assert!(!keys.is_key_down(VirtKey::ESCAPE));
    }

    #[test]
    fn test_modifiers_follow_held_keys() {
        let mut keys = KeysState::new();
        assert!(keys.modifiers().is_empty());

        keys.key_down(VirtKey::SHIFT, 0.0);
        keys.key_down(VirtKey::MENU, 0.0);
        let flags = keys.modifiers();
        assert!(flags.contains(Modifiers::SHIFT));
        assert!(flags.contains(Modifiers::ALT));
        assert!(!flags.contains(Modifiers::CONTROL));

        keys.key_up(VirtKey::SHIFT);
        assert_eq!(keys.modifiers(), Modifiers::ALT);
    }

    #[test]
    fn test_modifier_bits_match_wire_values() {
        assert_eq!(Modifiers::SHIFT.bits(), 0x100);
        assert_eq!(Modifiers::FUNCTION.bits(), 0x1000);
        let mut flags = Modifiers::CONTROL;
        flags |= Modifiers::COMMAND;
        assert_eq!(flags.bits(), 0x200 | 0x800);
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut keys = KeysState::new();
        keys.key_down(VirtKey::LEFT, 0.5);
        keys.key_down(VirtKey::CONTROL, 0.6);
        assert_eq!(keys.pressed_count(), 2);

        keys.reset();
        assert_eq!(keys.pressed_count(), 0);
        assert!(keys.modifiers().is_empty());
    }

    #[test]
    fn test_pressed_keys_are_ordered() {
        let mut keys = KeysState::new();
        keys.key_down(VirtKey::RIGHT, 2.0);
        keys.key_down(VirtKey::CONTROL, 1.0);
        let pressed: Vec<_> = keys.pressed_keys().collect();
        assert_eq!(pressed, vec![(VirtKey::CONTROL, 1.0), (VirtKey::RIGHT, 2.0)]);
    }
}
