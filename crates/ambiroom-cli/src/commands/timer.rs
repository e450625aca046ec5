use std::sync::Arc;

use ambiroom_core::timer::format_display;
use ambiroom_core::{Config, Event, MemoryNotifier, TimerEngine, TimerMode, TimerState};
use chrono::Local;
use clap::Subcommand;
use serde::Serialize;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Render a timer face for the given mode and seconds
    Format {
        #[arg(long, default_value = "pomodoro")]
        mode: TimerMode,
        #[arg(long, allow_negative_numbers = true)]
        seconds: i64,
        #[arg(long)]
        hide_seconds: bool,
    },
    /// Run ticks synchronously and print the resulting state as JSON
    Simulate {
        #[arg(long, default_value = "pomodoro")]
        mode: TimerMode,
        /// Starting time_left (defaults to the mode's starting value)
        #[arg(long, allow_negative_numbers = true)]
        time_left: Option<i64>,
        #[arg(long, default_value_t = 1)]
        ticks: u32,
        /// Start inside a break
        #[arg(long = "break")]
        on_break: bool,
        /// Start paused
        #[arg(long)]
        paused: bool,
        #[arg(long)]
        focus: Option<i64>,
        #[arg(long = "break-time")]
        break_time: Option<i64>,
        #[arg(long)]
        auto_start: bool,
    },
    /// List timer modes
    Modes,
}

#[derive(Serialize)]
struct SimulationReport {
    state: TimerState,
    display: String,
    events: Vec<Event>,
    notifications: Vec<&'static str>,
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Format {
            mode,
            seconds,
            hide_seconds,
        } => {
            println!(
                "{}",
                format_display(mode, seconds, hide_seconds, Local::now().time())
            );
        }
        TimerAction::Simulate {
            mode,
            time_left,
            ticks,
            on_break,
            paused,
            focus,
            break_time,
            auto_start,
        } => {
            let mut timer_config = config.timer.clone();
            if let Some(focus) = focus {
                timer_config.focus_time = focus;
            }
            if let Some(break_time) = break_time {
                timer_config.break_time = break_time;
            }
            timer_config.auto_start |= auto_start;

            let notifier = Arc::new(MemoryNotifier::new());
            let mut engine = TimerEngine::new(timer_config, notifier.clone());
            engine.set_mode(mode);
            if on_break {
                let mut state = engine.state().clone();
                state.is_break = true;
                state.time_left = state.config.break_time;
                engine = TimerEngine::from_state(state, notifier.clone());
            }
            if let Some(time_left) = time_left {
                engine.set_time_left(time_left);
            }
            engine.set_running(!paused);

            let mut events = Vec::new();
            for _ in 0..ticks {
                events.extend(engine.tick());
            }

            let report = SimulationReport {
                state: engine.state().clone(),
                display: engine.display(),
                events,
                notifications: notifier.sent().iter().map(|m| m.text()).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        TimerAction::Modes => {
            for mode in TimerMode::ALL {
                println!("{:<10} {}", mode.as_str(), mode.label());
            }
        }
    }
    Ok(())
}
