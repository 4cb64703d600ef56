//! Keyboard model
//!
//! Keys are identified by a closed enum, a snapshot of every key is a 64-bit
//! set, and raw events carry the key that changed.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Key codes understood by the frontends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Key {
    // Letter keys
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Number keys
    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,

    // Arrow keys
    Up, Down, Left, Right,

    // Special keys
    Escape, Enter, Space, Tab, Backspace, LeftShift, RightShift,
}

/// Every key paired with its configuration name, in discriminant order.
static KEY_NAMES: [(Key, &str); 47] = [
    (Key::A, "A"),
    (Key::B, "B"),
    (Key::C, "C"),
    (Key::D, "D"),
    (Key::E, "E"),
    (Key::F, "F"),
    (Key::G, "G"),
    (Key::H, "H"),
    (Key::I, "I"),
    (Key::J, "J"),
    (Key::K, "K"),
    (Key::L, "L"),
    (Key::M, "M"),
    (Key::N, "N"),
    (Key::O, "O"),
    (Key::P, "P"),
    (Key::Q, "Q"),
    (Key::R, "R"),
    (Key::S, "S"),
    (Key::T, "T"),
    (Key::U, "U"),
    (Key::V, "V"),
    (Key::W, "W"),
    (Key::X, "X"),
    (Key::Y, "Y"),
    (Key::Z, "Z"),
    (Key::Key0, "0"),
    (Key::Key1, "1"),
    (Key::Key2, "2"),
    (Key::Key3, "3"),
    (Key::Key4, "4"),
    (Key::Key5, "5"),
    (Key::Key6, "6"),
    (Key::Key7, "7"),
    (Key::Key8, "8"),
    (Key::Key9, "9"),
    (Key::Up, "Up"),
    (Key::Down, "Down"),
    (Key::Left, "Left"),
    (Key::Right, "Right"),
    (Key::Escape, "Escape"),
    (Key::Enter, "Enter"),
    (Key::Space, "Space"),
    (Key::Tab, "Tab"),
    (Key::Backspace, "Backspace"),
    (Key::LeftShift, "LeftShift"),
    (Key::RightShift, "RightShift"),
];

impl Key {
    /// Name used in configuration and script files (e.g. "Up", "Space", "P")
    pub fn name(self) -> &'static str {
        KEY_NAMES[self as usize].1
    }

    /// All keys in discriminant order
    pub fn all() -> impl Iterator<Item = Key> {
        KEY_NAMES.iter().map(|&(key, _)| key)
    }

    fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a string key name to a Key.
///
/// "Return" is accepted as an alias for "Enter".
pub fn string_to_key(s: &str) -> Option<Key> {
    if s == "Return" {
        return Some(Key::Enter);
    }
    KEY_NAMES
        .iter()
        .find(|(_, name)| *name == s)
        .map(|&(key, _)| key)
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        string_to_key(&name).ok_or_else(|| de::Error::custom(format!("unknown key: {}", name)))
    }
}

/// Snapshot of which keys are held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyState {
    bits: u64,
}

impl KeyState {
    /// All keys released
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.bits |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.bits &= !key.bit();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.bits & key.bit() != 0
    }

    /// True when every key in `keys` is held (vacuously true for an empty slice)
    pub fn all_down(&self, keys: &[Key]) -> bool {
        keys.iter().all(|&key| self.is_down(key))
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Keys currently held, in discriminant order
    pub fn pressed(&self) -> impl Iterator<Item = Key> + '_ {
        Key::all().filter(move |&key| self.is_down(key))
    }
}

impl FromIterator<Key> for KeyState {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut state = KeyState::new();
        for key in iter {
            state.press(key);
        }
        state
    }
}

impl<'a> FromIterator<&'a Key> for KeyState {
    fn from_iter<I: IntoIterator<Item = &'a Key>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

/// Raw input event delivered by a display's event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key")]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Window close request
    Quit,
}
