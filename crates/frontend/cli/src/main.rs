use anyhow::{bail, Context, Result};
use clap::Parser;
use emu_atari2600::{Action, ManualControlAgent, RandomPolicy};
use emu_core::logging::{LogConfig, LogLevel};
use emu_core::scripted::ScriptedDisplay;
use emu_core::settings::Settings;
use emu_core::{DisplayScreen, InputEvent, Key, KeyStateSource};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Replay a key script through the Atari 2600 keyboard agent
#[derive(Parser)]
struct Args {
    /// Key script: JSON array of frames ({"pressed": [...], "events": [...]})
    script: PathBuf,

    /// Settings file; missing files fall back to defaults
    #[arg(long, default_value = "settings.json")]
    config: PathBuf,

    /// Number of agent decisions to run
    #[arg(long, default_value_t = 10)]
    ticks: u32,

    /// Seed for the automated fallback policy (overrides random_seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Treat the scripted display as visible (overrides display_screen)
    #[arg(long, default_value_t = false)]
    display_screen: bool,

    /// Start under manual control
    #[arg(long, default_value_t = false)]
    manual: bool,

    /// Print one JSON object per decision
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Agent log level: off, error, warn, info, debug, trace (overrides log_level)
    #[arg(long)]
    log_level: Option<String>,
}

/// Manual wait bounded by the script: a blocking wait on an exhausted script
/// would never return.
fn replay_manual_wait(
    agent: &mut ManualControlAgent<ScriptedDisplay, RandomPolicy>,
) -> Option<Action> {
    while agent.display().remaining_frames() > 0 {
        if let Some(action) = agent.poll_step() {
            return Some(action);
        }
    }
    None
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.display_screen {
        settings.display_screen = true;
    }
    if args.seed.is_some() {
        settings.random_seed = args.seed;
    }
    if args.log_level.is_some() {
        settings.log_level = args.log_level.clone();
    }

    if let Some(name) = settings.log_level.as_deref() {
        match LogLevel::from_str(name) {
            Some(level) => LogConfig::global().set_global_level(level),
            None => bail!("Unknown log level: {}", name),
        }
    }

    let mut display = ScriptedDisplay::from_path(&args.script)
        .with_context(|| format!("loading key script {}", args.script.display()))?;
    let policy = RandomPolicy::from_settings(&settings);
    log::info!(
        "Keyboard agent controls:\n{}",
        ManualControlAgent::<ScriptedDisplay, RandomPolicy>::usage()
    );

    // Registered before the agent, so window close requests are seen in any mode
    let quit = Arc::new(AtomicBool::new(false));
    let quit_flag = Arc::clone(&quit);
    display.register_event_handler(Box::new(move |event: &InputEvent| {
        if *event == InputEvent::Quit {
            quit_flag.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }));

    let mut agent = ManualControlAgent::new(display, policy, &settings)?;
    if args.manual {
        agent.display_mut().dispatch(&InputEvent::KeyDown(Key::P));
    }

    for tick in 1..=args.ticks {
        agent.process_control_messages();
        if quit.load(Ordering::Relaxed) {
            log::info!("Quit requested after {} decision(s)", tick - 1);
            break;
        }
        let action = if agent.is_manual() {
            match replay_manual_wait(&mut agent) {
                Some(action) => action,
                None => {
                    log::warn!("Key script exhausted under manual control; stopping");
                    break;
                }
            }
        } else {
            agent.next_action()
        };
        if args.json {
            let line = serde_json::json!({
                "tick": tick,
                "action": action,
                "index": action.index(),
                "manual": agent.is_manual(),
                "playback_speed_ms": agent.playback_speed().millis(),
            });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("Tick {}: {} ({})", tick, action, action.index());
        }

        // End of the emulated frame: the display processes its event queue.
        // Under manual control the agent's own polling already pumped it.
        if !agent.is_manual() {
            agent.display_mut().pump_events();
        }
    }

    log::debug!(
        "Virtual time spent polling: {:?}",
        agent.display().elapsed()
    );
    Ok(())
}
