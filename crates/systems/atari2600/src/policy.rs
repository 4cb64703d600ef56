//! Automated action selection used when nobody is at the keyboard

use crate::Action;
use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::settings::Settings;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Source of actions while the agent is under automatic control.
pub trait ActionPolicy {
    fn select_action(&mut self) -> Action;
}

impl<F> ActionPolicy for F
where
    F: FnMut() -> Action,
{
    fn select_action(&mut self) -> Action {
        self()
    }
}

/// Uniform choice over a set of available actions
pub struct RandomPolicy {
    rng: StdRng,
    available: Vec<Action>,
}

impl RandomPolicy {
    /// Seeded from entropy when `seed` is None
    pub fn new(available: Vec<Action>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, available }
    }

    /// Full joystick action set, seeded from `random_seed`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Action::ALL.to_vec(), settings.random_seed)
    }

    pub fn available_actions(&self) -> &[Action] {
        &self.available
    }
}

impl ActionPolicy for RandomPolicy {
    fn select_action(&mut self) -> Action {
        // An empty action set can only ever do nothing
        let action = self
            .available
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Noop);
        log(LogCategory::Policy, LogLevel::Trace, || {
            format!("Policy: random {}", action)
        });
        action
    }
}
