//! Atari 2600 keyboard control agent
//!
//! Lets a human override an automated agent's action stream from the
//! keyboard. See [`ManualControlAgent`].

mod action;
mod agent;
pub mod decision;
mod policy;
mod speed;

pub use action::Action;
pub use agent::{ManualControlAgent, MANUAL_CONTROL_BANNER};
pub use policy::{ActionPolicy, RandomPolicy};
pub use speed::PlaybackSpeed;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Keyboard agent needs display_screen = true")]
    DisplayRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(
            AgentError::DisplayRequired.to_string(),
            "Keyboard agent needs display_screen = true"
        );
    }

    #[test]
    fn test_usage_mentions_toggle_key() {
        let usage = ManualControlAgent::<emu_core::scripted::ScriptedDisplay, RandomPolicy>::usage();
        assert!(usage.contains("-p"));
    }
}
