//! Core emulator primitives and traits.
//!
//! Shared between the system crates and the frontends: the keyboard model,
//! the display/event-source contract, configuration and logging.

pub mod input;
pub mod logging;
pub mod scripted;
pub mod settings;

pub use input::{string_to_key, InputEvent, Key, KeyState};

use std::time::Duration;

/// Callback registered with a display; returns true when the event is consumed
/// and must not propagate to handlers registered after it.
pub type EventHandler = Box<dyn FnMut(&InputEvent) -> bool + Send>;

/// Snapshot access to the keyboard.
pub trait KeyStateSource {
    /// Process pending input: refresh the key snapshot and dispatch queued
    /// events to registered handlers.
    fn pump_events(&mut self);

    /// Pressed/released state of every key as of the last pump.
    fn key_state(&self) -> KeyState;
}

/// The display subsystem as seen by agents.
///
/// The display owns the event loop. Agents subscribe to its events and share
/// its pause flag, but never drive rendering.
pub trait DisplayScreen: KeyStateSource {
    /// Subscribe a handler to input events. Handlers run in registration order.
    fn register_event_handler(&mut self, handler: EventHandler);

    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    /// Block the calling thread for the given duration.
    fn delay(&mut self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Minimal display with no script behind it
    #[derive(Default)]
    struct NullDisplay {
        keys: KeyState,
        handlers: Vec<EventHandler>,
        paused: bool,
        slept: Duration,
    }

    impl KeyStateSource for NullDisplay {
        fn pump_events(&mut self) {
            for handler in self.handlers.iter_mut() {
                if handler(&InputEvent::KeyDown(Key::Space)) {
                    break;
                }
            }
        }

        fn key_state(&self) -> KeyState {
            self.keys
        }
    }

    impl DisplayScreen for NullDisplay {
        fn register_event_handler(&mut self, handler: EventHandler) {
            self.handlers.push(handler);
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn set_paused(&mut self, paused: bool) {
            self.paused = paused;
        }

        fn delay(&mut self, duration: Duration) {
            self.slept += duration;
        }
    }

    #[test]
    fn test_display_trait_object() {
        let mut display: Box<dyn DisplayScreen> = Box::new(NullDisplay::default());
        display.set_paused(true);
        assert!(display.is_paused());
        display.delay(Duration::from_millis(50));
        assert!(display.key_state().is_empty());
    }

    #[test]
    fn test_first_consuming_handler_stops_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut display = NullDisplay::default();

        let first = Arc::clone(&calls);
        display.register_event_handler(Box::new(move |_: &InputEvent| {
            first.fetch_add(1, Ordering::Relaxed);
            true
        }));
        let second = Arc::clone(&calls);
        display.register_event_handler(Box::new(move |_: &InputEvent| {
            second.fetch_add(100, Ordering::Relaxed);
            false
        }));

        display.pump_events();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(display.slept, Duration::ZERO);
    }
}
