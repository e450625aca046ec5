use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// What the timer face is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Wall-clock display; the countdown is idle.
    Clock,
    /// Alternating focus and break phases.
    Pomodoro,
    /// Stopwatch counting up from zero.
    #[serde(alias = "count-up")]
    Countup,
    /// Single countdown towards a user-chosen goal.
    Goal,
}

impl TimerMode {
    /// All modes in display order.
    pub const ALL: [TimerMode; 4] = [
        TimerMode::Clock,
        TimerMode::Pomodoro,
        TimerMode::Countup,
        TimerMode::Goal,
    ];

    /// Human-readable label shown in the mode switcher.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Clock => "Clock",
            TimerMode::Pomodoro => "Pomodoro",
            TimerMode::Countup => "Count Up",
            TimerMode::Goal => "Goal Timer",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Clock => "clock",
            TimerMode::Pomodoro => "pomodoro",
            TimerMode::Countup => "countup",
            TimerMode::Goal => "goal",
        }
    }

    /// Modes whose `time_left` counts down towards zero.
    pub fn counts_down(&self) -> bool {
        matches!(self, TimerMode::Pomodoro | TimerMode::Goal)
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Clock
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clock" => Ok(TimerMode::Clock),
            "pomodoro" => Ok(TimerMode::Pomodoro),
            "countup" | "count-up" => Ok(TimerMode::Countup),
            "goal" => Ok(TimerMode::Goal),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown timer mode '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_display_order() {
        let labels: Vec<_> = TimerMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["Clock", "Pomodoro", "Count Up", "Goal Timer"]);
    }

    #[test]
    fn parses_names_and_alias() {
        assert_eq!("Pomodoro".parse::<TimerMode>().unwrap(), TimerMode::Pomodoro);
        assert_eq!("count-up".parse::<TimerMode>().unwrap(), TimerMode::Countup);
        assert!("stopwatch".parse::<TimerMode>().is_err());
    }

    #[test]
    fn only_pomodoro_and_goal_count_down() {
        assert!(TimerMode::Pomodoro.counts_down());
        assert!(TimerMode::Goal.counts_down());
        assert!(!TimerMode::Countup.counts_down());
        assert!(!TimerMode::Clock.counts_down());
    }
}
