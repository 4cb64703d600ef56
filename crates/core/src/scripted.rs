//! Headless display driven by a prerecorded key script
//!
//! Each pump advances one frame of the script: the frame's held keys become
//! the snapshot and its events go through the registered handlers. Delays
//! advance a virtual clock instead of sleeping, which keeps replays and tests
//! deterministic.

use crate::logging::{log, LogCategory, LogLevel};
use crate::{DisplayScreen, EventHandler, InputEvent, Key, KeyState, KeyStateSource};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read key script: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse key script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One pump's worth of input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFrame {
    /// Keys held during this frame
    #[serde(default)]
    pub pressed: Vec<Key>,
    /// Events delivered to handlers when this frame is pumped
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

impl ScriptFrame {
    /// Keys held with no new events
    pub fn held(keys: &[Key]) -> Self {
        Self {
            pressed: keys.to_vec(),
            events: Vec::new(),
        }
    }

    /// A key going down: held in the snapshot and reported as a KeyDown event
    pub fn key_down(key: Key) -> Self {
        Self {
            pressed: vec![key],
            events: vec![InputEvent::KeyDown(key)],
        }
    }

    /// Nothing held, nothing happening
    pub fn idle() -> Self {
        Self::default()
    }
}

pub struct ScriptedDisplay {
    frames: VecDeque<ScriptFrame>,
    keys: KeyState,
    handlers: Vec<EventHandler>,
    paused: bool,
    elapsed: Duration,
    pumps: u64,
}

impl ScriptedDisplay {
    pub fn new(frames: Vec<ScriptFrame>) -> Self {
        Self {
            frames: frames.into(),
            keys: KeyState::new(),
            handlers: Vec::new(),
            paused: false,
            elapsed: Duration::ZERO,
            pumps: 0,
        }
    }

    /// Parse a JSON array of frames, e.g.
    /// `[{"pressed": ["Up", "Space"]}, {"pressed": ["P"], "events": [{"type": "KeyDown", "key": "P"}]}]`
    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        let frames: Vec<ScriptFrame> = serde_json::from_str(contents)?;
        Ok(Self::new(frames))
    }

    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn push_frame(&mut self, frame: ScriptFrame) {
        self.frames.push_back(frame);
    }

    /// Run one event through the handlers, stopping at the first that consumes it.
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        for handler in self.handlers.iter_mut() {
            if handler(event) {
                log(LogCategory::Display, LogLevel::Trace, || {
                    format!("Display: {:?} consumed", event)
                });
                return true;
            }
        }
        false
    }

    /// Virtual time spent in `delay`
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pump_count(&self) -> u64 {
        self.pumps
    }

    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl KeyStateSource for ScriptedDisplay {
    fn pump_events(&mut self) {
        self.pumps += 1;
        // Past the end of the script every key reads as released
        let frame = self.frames.pop_front().unwrap_or_default();
        self.keys = frame.pressed.iter().collect();
        for event in &frame.events {
            self.dispatch(event);
        }
    }

    fn key_state(&self) -> KeyState {
        self.keys
    }
}

impl DisplayScreen for ScriptedDisplay {
    fn register_event_handler(&mut self, handler: EventHandler) {
        self.handlers.push(handler);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log(LogCategory::Display, LogLevel::Debug, || {
                format!("Display: paused = {}", paused)
            });
        }
        self.paused = paused;
    }

    fn delay(&mut self, duration: Duration) {
        self.elapsed += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_pump_advances_frames() {
        let mut display = ScriptedDisplay::new(vec![
            ScriptFrame::held(&[Key::Up, Key::Space]),
            ScriptFrame::idle(),
        ]);
        assert_eq!(display.remaining_frames(), 2);

        display.pump_events();
        assert!(display.key_state().all_down(&[Key::Up, Key::Space]));

        display.pump_events();
        assert!(display.key_state().is_empty());

        // Exhausted scripts read as nothing held
        display.pump_events();
        assert!(display.key_state().is_empty());
        assert_eq!(display.pump_count(), 3);
    }

    #[test]
    fn test_events_dispatched_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut display = ScriptedDisplay::new(vec![ScriptFrame::key_down(Key::P)]);

        let first = Arc::clone(&seen);
        display.register_event_handler(Box::new(move |event: &InputEvent| {
            first.lock().unwrap().push(("first", *event));
            false
        }));
        let second = Arc::clone(&seen);
        display.register_event_handler(Box::new(move |event: &InputEvent| {
            second.lock().unwrap().push(("second", *event));
            true
        }));
        let third = Arc::clone(&seen);
        display.register_event_handler(Box::new(move |event: &InputEvent| {
            third.lock().unwrap().push(("third", *event));
            true
        }));

        display.pump_events();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("first", InputEvent::KeyDown(Key::P)),
                ("second", InputEvent::KeyDown(Key::P)),
            ]
        );
        assert_eq!(display.handler_count(), 3);
    }

    #[test]
    fn test_delay_is_virtual() {
        let mut display = ScriptedDisplay::new(Vec::new());
        display.delay(Duration::from_millis(50));
        display.delay(Duration::from_millis(45));
        assert_eq!(display.elapsed(), Duration::from_millis(95));
    }

    #[test]
    fn test_from_json() {
        let display = ScriptedDisplay::from_json(
            r#"[
                {"pressed": ["Up", "Space"]},
                {"pressed": ["P"], "events": [{"type": "KeyDown", "key": "P"}]},
                {}
            ]"#,
        )
        .expect("parse script");
        assert_eq!(display.remaining_frames(), 3);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = ScriptedDisplay::from_json(r#"[{"pressed": ["Meta"]}]"#)
            .err()
            .expect("unknown key");
        assert!(matches!(err, ScriptError::Parse(_)));
    }
}
