//! Keyboard override for an automated agent
//!
//! `ManualControlAgent` wraps an [`ActionPolicy`]. While under automatic
//! control it forwards every decision to the policy. Pressing the toggle key
//! hands control to the human: each decision then blocks, polling the
//! keyboard every `playback_speed` milliseconds until a bound key
//! combination resolves to an action.
//!
//! The display owns the event loop. The agent subscribes a handler that flips
//! the shared mode flag on the toggle key, decides whether an event is
//! consumed, and queues the direction of the toggle. The queue is drained at
//! the top of [`ManualControlAgent::next_action`] and after every pump of the
//! poll loop; draining is where the pause memo and the display's pause flag
//! change.

use crate::decision::{self, TOGGLE_KEY};
use crate::policy::ActionPolicy;
use crate::speed::PlaybackSpeed;
use crate::{Action, AgentError};
use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::settings::Settings;
use emu_core::{DisplayScreen, EventHandler, InputEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Printed when the human takes over
pub const MANUAL_CONTROL_BANNER: &str = "Starting Manual Control. Commands are as follows:
  -p: return to auto control
  -arrow keys: joystick movement
  -space: button/fire
  -return: no-op
  -f: poll faster
  -s: poll slower";

/// Messages from the event handler to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlMessage {
    ToggleIn,
    ToggleOut,
}

pub struct ManualControlAgent<D: DisplayScreen, P: ActionPolicy> {
    display: D,
    policy: P,
    /// Shared with the registered event handler
    manual_control: Arc<AtomicBool>,
    messages: Receiver<ControlMessage>,
    /// Display pause state captured when manual control began
    return_to_pause: bool,
    playback_speed: PlaybackSpeed,
}

impl<D: DisplayScreen, P: ActionPolicy> ManualControlAgent<D, P> {
    /// Create the agent and subscribe it to the display's input events.
    ///
    /// Fails when `settings.display_screen` is false: there is no window to
    /// type into.
    pub fn new(mut display: D, policy: P, settings: &Settings) -> Result<Self, AgentError> {
        if !settings.display_screen {
            log(LogCategory::Agent, LogLevel::Error, || {
                "Agent: keyboard control requested without a display".to_string()
            });
            return Err(AgentError::DisplayRequired);
        }

        let manual_control = Arc::new(AtomicBool::new(false));
        let (sender, messages) = mpsc::channel();
        display.register_event_handler(input_event_handler(Arc::clone(&manual_control), sender));

        Ok(Self {
            display,
            policy,
            manual_control,
            messages,
            return_to_pause: false,
            playback_speed: PlaybackSpeed::default(),
        })
    }

    /// One-line help for the host's usage text
    pub fn usage() -> &'static str {
        "  -p: Toggle manual control of the agent"
    }

    /// Per-tick decision. Blocks while under manual control until the human
    /// supplies an action or presses the toggle key.
    pub fn next_action(&mut self) -> Action {
        self.process_control_messages();
        if self.is_manual() {
            self.wait_for_input()
        } else {
            self.policy.select_action()
        }
    }

    /// Poll until a key combination resolves. Unbounded: only a bound key or
    /// the toggle key ends the wait. Returns `Noop` under automatic control.
    pub fn wait_for_input(&mut self) -> Action {
        while self.is_manual() {
            if let Some(action) = self.poll_step() {
                return action;
            }
        }
        Action::Noop
    }

    /// A single poll iteration: sleep, refresh keys, apply queued toggles,
    /// adjust speed, then try the toggle escape and the decision table.
    ///
    /// Does nothing and returns `None` under automatic control. A toggle seen
    /// during the pump, or the toggle key still held, yields `Noop` so the
    /// caller drops out of the wait.
    pub fn poll_step(&mut self) -> Option<Action> {
        if !self.is_manual() {
            return None;
        }

        self.display.delay(self.playback_speed.as_duration());
        self.display.pump_events();
        let toggled = self.process_control_messages();
        let keys = self.display.key_state();

        if self.is_manual() && self.playback_speed.adjust(&keys) {
            log(LogCategory::Agent, LogLevel::Debug, || {
                format!("Agent: playback speed {}", self.playback_speed)
            });
        }

        if toggled || keys.is_down(TOGGLE_KEY) {
            return Some(Action::Noop);
        }

        let action = decision::resolve(&keys);
        log(LogCategory::Input, LogLevel::Trace, || {
            let held: Vec<&str> = keys.pressed().map(|key| key.name()).collect();
            format!("Input: held [{}] -> {:?}", held.join(", "), action)
        });
        action
    }

    /// Apply the pause bookkeeping for toggles queued since the last call.
    /// Returns true when at least one toggle was applied.
    pub fn process_control_messages(&mut self) -> bool {
        let mut applied = false;
        while let Ok(message) = self.messages.try_recv() {
            self.toggle_manual_control(message);
            applied = true;
        }
        applied
    }

    fn toggle_manual_control(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::ToggleIn => {
                self.return_to_pause = self.display.is_paused();
                println!("ReturnToPause: {}", self.return_to_pause);
                self.display.set_paused(false);
                println!("{}", MANUAL_CONTROL_BANNER);
            }
            ControlMessage::ToggleOut => {
                self.display.set_paused(self.return_to_pause);
                println!("Returning to Automatic Control.");
            }
        }
        log(LogCategory::Agent, LogLevel::Info, || {
            format!(
                "Agent: {} control",
                match message {
                    ControlMessage::ToggleIn => "manual",
                    ControlMessage::ToggleOut => "automatic",
                }
            )
        });
    }

    pub fn is_manual(&self) -> bool {
        self.manual_control.load(Ordering::Relaxed)
    }

    pub fn playback_speed(&self) -> PlaybackSpeed {
        self.playback_speed
    }

    pub fn return_to_pause(&self) -> bool {
        self.return_to_pause
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}

/// Build the handler registered with the display.
///
/// The toggle key flips the mode here, so key-downs dispatched later in the
/// same pump are judged by the new mode. Key-downs are consumed while manual
/// control is active; the toggle key is always consumed.
fn input_event_handler(
    manual_control: Arc<AtomicBool>,
    sender: Sender<ControlMessage>,
) -> EventHandler {
    Box::new(move |event: &InputEvent| match event {
        InputEvent::KeyDown(key) if *key == TOGGLE_KEY => {
            let message = if manual_control.fetch_xor(true, Ordering::Relaxed) {
                ControlMessage::ToggleOut
            } else {
                ControlMessage::ToggleIn
            };
            // Fails only once the agent is gone, in which case nothing is consumed
            sender.send(message).is_ok()
        }
        InputEvent::KeyDown(_) => manual_control.load(Ordering::Relaxed),
        _ => false,
    })
}
