//! Key bindings and the key-combination decision table

use crate::Action;
use emu_core::{Key, KeyState};

/// Toggles between manual and automatic control
pub const TOGGLE_KEY: Key = Key::P;
pub const FIRE_KEY: Key = Key::Space;
/// Submits a no-op while under manual control
pub const CONFIRM_KEY: Key = Key::Enter;
/// Shortens the poll interval
pub const FASTER_KEY: Key = Key::F;
/// Lengthens the poll interval
pub const SLOWER_KEY: Key = Key::S;

/// Ordered (keys, action) rows. The first row whose keys are all held wins,
/// so the most specific combinations come first.
///
/// Opposite directions are never paired: left+right falls through to the
/// single-key rows, where LEFT is listed ahead of RIGHT.
pub const DECISION_TABLE: [(&[Key], Action); 18] = [
    // Direction + direction + fire
    (&[Key::Up, Key::Right, FIRE_KEY], Action::UpRightFire),
    (&[Key::Up, Key::Left, FIRE_KEY], Action::UpLeftFire),
    (&[Key::Down, Key::Right, FIRE_KEY], Action::DownRightFire),
    (&[Key::Down, Key::Left, FIRE_KEY], Action::DownLeftFire),
    // Diagonals
    (&[Key::Up, Key::Left], Action::UpLeft),
    (&[Key::Up, Key::Right], Action::UpRight),
    (&[Key::Down, Key::Left], Action::DownLeft),
    (&[Key::Down, Key::Right], Action::DownRight),
    // Direction + fire
    (&[Key::Up, FIRE_KEY], Action::UpFire),
    (&[Key::Down, FIRE_KEY], Action::DownFire),
    (&[Key::Left, FIRE_KEY], Action::LeftFire),
    (&[Key::Right, FIRE_KEY], Action::RightFire),
    // Singles
    (&[FIRE_KEY], Action::Fire),
    (&[CONFIRM_KEY], Action::Noop),
    (&[Key::Left], Action::Left),
    (&[Key::Right], Action::Right),
    (&[Key::Up], Action::Up),
    (&[Key::Down], Action::Down),
];

/// Map a key snapshot to an action, or None when no row matches.
pub fn resolve(keys: &KeyState) -> Option<Action> {
    DECISION_TABLE
        .iter()
        .find(|(combination, _)| keys.all_down(combination))
        .map(|&(_, action)| action)
}
