use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerConfig, TimerMode};

/// Every timer state change produces an Event.
/// The presentation layer redraws from them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// One second elapsed while running.
    Ticked {
        mode: TimerMode,
        time_left: i64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        time_left: i64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        mode: TimerMode,
        time_left: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left: i64,
        at: DateTime<Utc>,
    },
    TimerReset {
        time_left: i64,
        is_running: bool,
        at: DateTime<Utc>,
    },
    TimeAdjusted {
        delta: i64,
        time_left: i64,
        focus_time: i64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. For pomodoro this precedes `PhaseChanged`.
    TimerCompleted {
        mode: TimerMode,
        was_break: bool,
        at: DateTime<Utc>,
    },
    /// Pomodoro switched between focus and break.
    PhaseChanged {
        is_break: bool,
        time_left: i64,
        is_running: bool,
        at: DateTime<Utc>,
    },
    ConfigUpdated {
        config: TimerConfig,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        is_running: bool,
        is_break: bool,
        time_left: i64,
        display: String,
        config: TimerConfig,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event marks a pomodoro phase boundary.
    pub fn is_phase_change(&self) -> bool {
        matches!(self, Event::PhaseChanged { .. })
    }
}
