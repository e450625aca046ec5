//! Timer engine implementation.
//!
//! The engine is a plain state machine with no internal thread. Something
//! outside (see [`crate::scheduler::Ticker`]) calls `tick()` once per second
//! while the timer runs.
//!
//! ## Pomodoro phases
//!
//! ```text
//! focus --(time_left hits 0)--> break --(time_left hits 0)--> focus ...
//! ```
//!
//! Each boundary raises the "ended" notification for the phase being left,
//! then the "started" notification for the phase being entered, and leaves
//! the timer running only if `auto_start` is set.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(LogNotifier));
//! engine.set_mode(TimerMode::Pomodoro);
//! engine.start();
//! // once per second:
//! let events = engine.tick();
//! ```

use chrono::{Local, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::config::{TimerConfig, TimerConfigPatch};
use super::format::{format_display, seconds_since_midnight};
use super::mode::TimerMode;
use crate::events::Event;
use crate::notify::{NotificationChannel, NotificationMessage, Notifier};

/// Plain, serialisable timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub is_running: bool,
    /// Seconds. Counts down in pomodoro/goal, up in countup. Can be
    /// negative after a negative `add_time`.
    pub time_left: i64,
    /// Pomodoro phase; false means focus.
    pub is_break: bool,
    pub config: TimerConfig,
}

impl TimerState {
    /// Fresh state: clock mode, stopped, focus phase loaded.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            mode: TimerMode::Clock,
            is_running: false,
            time_left: config.focus_time,
            is_break: false,
            config,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    notifications: NotificationChannel,
}

impl TimerEngine {
    /// Create an engine in clock mode. Opening the notification channel asks
    /// `notifier` for permission once.
    pub fn new(config: TimerConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::from_state(TimerState::new(config), notifier)
    }

    pub fn from_state(state: TimerState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state,
            notifications: NotificationChannel::open(notifier),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn time_left(&self) -> i64 {
        self.state.time_left
    }

    pub fn is_break(&self) -> bool {
        self.state.is_break
    }

    pub fn config(&self) -> &TimerConfig {
        &self.state.config
    }

    /// Whether a tick would currently change anything.
    pub fn wants_ticks(&self) -> bool {
        self.state.is_running && self.state.time_left >= 0
    }

    /// Timer face using the local wall clock.
    pub fn display(&self) -> String {
        self.display_at(Local::now().time())
    }

    pub fn display_at(&self, now: NaiveTime) -> String {
        format_display(
            self.state.mode,
            self.state.time_left,
            self.state.config.hide_seconds,
            now,
        )
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        self.snapshot_at(Local::now().time())
    }

    pub fn snapshot_at(&self, now: NaiveTime) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            is_running: self.state.is_running,
            is_break: self.state.is_break,
            time_left: self.state.time_left,
            display: self.display_at(now),
            config: self.state.config.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance by one second. No-op unless running with `time_left >= 0`.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.wants_ticks() {
            return Vec::new();
        }

        let mode = self.state.mode;
        if !mode.counts_down() {
            if mode == TimerMode::Countup {
                self.state.time_left = self.state.time_left.saturating_add(1);
            }
            return vec![self.ticked()];
        }

        let prev = self.state.time_left;
        if prev > 1 {
            self.state.time_left = prev - 1;
            return vec![self.ticked()];
        }

        self.state.time_left = 0;
        let mut events = vec![self.ticked()];
        let was_break = self.state.is_break;

        if mode == TimerMode::Pomodoro {
            events.push(Event::TimerCompleted {
                mode,
                was_break,
                at: Utc::now(),
            });
            self.notifications.send(
                self.state.config.browser_notifications,
                NotificationMessage::phase_end(was_break),
            );
            events.push(self.toggle_break());
        } else if prev > 0 {
            tracing::info!("goal reached");
            events.push(Event::TimerCompleted {
                mode,
                was_break,
                at: Utc::now(),
            });
        }
        events
    }

    /// Switch mode and load that mode's starting value. Running follows
    /// `auto_start`, as after a reset.
    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        self.set_mode_at(mode, Local::now().time())
    }

    /// As [`set_mode`](Self::set_mode) with an explicit wall-clock time for clock mode.
    pub fn set_mode_at(&mut self, mode: TimerMode, now: NaiveTime) -> Event {
        self.state.mode = mode;
        self.state.time_left = match mode {
            TimerMode::Pomodoro => self.state.config.phase_duration(self.state.is_break),
            TimerMode::Countup | TimerMode::Goal => 0,
            TimerMode::Clock => seconds_since_midnight(now),
        };
        self.state.is_running = self.state.config.auto_start;
        tracing::debug!(%mode, time_left = self.state.time_left, "mode changed");
        Event::ModeChanged {
            mode,
            time_left: self.state.time_left,
            at: Utc::now(),
        }
    }

    /// Reload the current phase's duration; running follows `auto_start`.
    pub fn reset_timer(&mut self) -> Event {
        self.state.time_left = self.state.config.phase_duration(self.state.is_break);
        self.state.is_running = self.state.config.auto_start;
        tracing::debug!(time_left = self.state.time_left, "timer reset");
        Event::TimerReset {
            time_left: self.state.time_left,
            is_running: self.state.is_running,
            at: Utc::now(),
        }
    }

    /// Shift `time_left` by `delta` seconds. Outside a break the focus
    /// duration grows too, so later resets keep the extension.
    ///
    /// Not clamped: a negative delta may leave `time_left` below zero, which
    /// parks the timer until something sets it again.
    pub fn add_time(&mut self, delta: i64) -> Event {
        self.state.time_left = self.state.time_left.saturating_add(delta);
        if !self.state.is_break {
            self.state.config.focus_time = self.state.config.focus_time.saturating_add(delta);
        }
        Event::TimeAdjusted {
            delta,
            time_left: self.state.time_left,
            focus_time: self.state.config.focus_time,
            at: Utc::now(),
        }
    }

    /// Flip between focus and break.
    pub fn toggle_break(&mut self) -> Event {
        let is_break = !self.state.is_break;
        self.notifications.send(
            self.state.config.browser_notifications,
            NotificationMessage::phase_start(is_break),
        );
        self.state.is_break = is_break;
        self.state.time_left = self.state.config.phase_duration(is_break);
        self.state.is_running = self.state.config.auto_start;
        tracing::info!(
            phase = if is_break { "break" } else { "focus" },
            time_left = self.state.time_left,
            running = self.state.is_running,
            "phase changed"
        );
        Event::PhaseChanged {
            is_break,
            time_left: self.state.time_left,
            is_running: self.state.is_running,
            at: Utc::now(),
        }
    }

    pub fn set_running(&mut self, running: bool) -> Option<Event> {
        if running {
            self.start()
        } else {
            self.pause()
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        Some(Event::TimerStarted {
            mode: self.state.mode,
            time_left: self.state.time_left,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerPaused {
            time_left: self.state.time_left,
            at: Utc::now(),
        })
    }

    /// Manual adjustment of the remaining time.
    pub fn set_time_left(&mut self, seconds: i64) {
        self.state.time_left = seconds;
    }

    pub fn update_config(&mut self, patch: TimerConfigPatch) -> Event {
        self.state.config.apply(patch);
        tracing::debug!(config = ?self.state.config, "timer config updated");
        Event::ConfigUpdated {
            config: self.state.config.clone(),
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ticked(&self) -> Event {
        Event::Ticked {
            mode: self.state.mode,
            time_left: self.state.time_left,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;

    fn pomodoro(config: TimerConfig) -> (TimerEngine, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut engine = TimerEngine::new(config, notifier.clone());
        engine.set_mode(TimerMode::Pomodoro);
        engine.start();
        (engine, notifier)
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn starts_in_clock_mode_with_focus_loaded() {
        let engine = TimerEngine::new(TimerConfig::default(), Arc::new(MemoryNotifier::new()));
        assert_eq!(engine.mode(), TimerMode::Clock);
        assert!(!engine.is_running());
        assert!(!engine.is_break());
        assert_eq!(engine.time_left(), 1500);
    }

    #[test]
    fn focus_end_enters_break_and_stops() {
        let config = TimerConfig {
            focus_time: 1500,
            break_time: 600,
            auto_start: false,
            ..Default::default()
        };
        let (mut engine, notifier) = pomodoro(config);
        engine.set_time_left(1);

        let events = engine.tick();

        assert_eq!(engine.time_left(), 600);
        assert!(engine.is_break());
        assert!(!engine.is_running());
        assert!(events.iter().any(Event::is_phase_change));
        assert_eq!(
            notifier.sent(),
            vec![NotificationMessage::FocusEnd, NotificationMessage::BreakStart]
        );
    }

    #[test]
    fn break_end_returns_to_focus_with_auto_start() {
        let config = TimerConfig {
            auto_start: true,
            ..Default::default()
        };
        let (mut engine, notifier) = pomodoro(config);
        engine.toggle_break();
        engine.set_time_left(1);

        engine.tick();

        assert!(!engine.is_break());
        assert_eq!(engine.time_left(), 1500);
        assert!(engine.is_running());
        assert_eq!(
            notifier.sent(),
            vec![
                NotificationMessage::BreakStart,
                NotificationMessage::BreakEnd,
                NotificationMessage::FocusStart,
            ]
        );
    }

    #[test]
    fn disabled_notifications_still_transition() {
        let config = TimerConfig {
            browser_notifications: false,
            ..Default::default()
        };
        let (mut engine, notifier) = pomodoro(config);
        engine.set_time_left(0);
        engine.tick();
        assert!(engine.is_break());
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn goal_clamps_and_reports_once() {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut engine = TimerEngine::new(TimerConfig::default(), notifier.clone());
        engine.set_mode(TimerMode::Goal);
        engine.set_time_left(2);
        engine.start();

        engine.tick();
        assert_eq!(engine.time_left(), 1);
        let events = engine.tick();
        assert_eq!(engine.time_left(), 0);
        assert!(events.iter().any(|e| matches!(e, Event::TimerCompleted { .. })));

        let events = engine.tick();
        assert_eq!(engine.time_left(), 0);
        assert!(!events.iter().any(|e| matches!(e, Event::TimerCompleted { .. })));
        assert!(engine.is_running());
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn countup_counts_three_ticks() {
        let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(MemoryNotifier::new()));
        engine.set_mode(TimerMode::Countup);
        engine.start();
        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(engine.time_left(), 3);
    }

    #[test]
    fn tick_is_a_noop_when_paused_or_negative() {
        let (mut engine, _) = pomodoro(TimerConfig::default());
        engine.pause();
        assert!(engine.tick().is_empty());
        assert_eq!(engine.time_left(), 1500);

        engine.start();
        engine.set_time_left(-3);
        assert!(engine.tick().is_empty());
        assert_eq!(engine.time_left(), -3);
    }

    #[test]
    fn clock_tick_keeps_time_left() {
        let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(MemoryNotifier::new()));
        engine.set_mode_at(TimerMode::Clock, noon());
        engine.start();
        let events = engine.tick();
        assert_eq!(events.len(), 1);
        assert_eq!(engine.time_left(), 12 * 3600);
    }

    #[test]
    fn set_mode_loads_mode_defaults() {
        let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(MemoryNotifier::new()));
        engine.set_mode(TimerMode::Pomodoro);
        assert_eq!(engine.time_left(), 1500);
        engine.set_mode(TimerMode::Countup);
        assert_eq!(engine.time_left(), 0);
        engine.set_mode(TimerMode::Goal);
        assert_eq!(engine.time_left(), 0);
        engine.set_mode_at(TimerMode::Clock, noon());
        assert_eq!(engine.time_left(), 43_200);
    }

    #[test]
    fn set_mode_running_follows_auto_start() {
        let (mut engine, _) = pomodoro(TimerConfig::default());
        engine.set_mode(TimerMode::Countup);
        assert!(!engine.is_running());
        assert_eq!(engine.time_left(), 0);

        let config = TimerConfig {
            auto_start: true,
            ..Default::default()
        };
        let mut engine = TimerEngine::new(config, Arc::new(MemoryNotifier::new()));
        engine.set_mode(TimerMode::Goal);
        assert!(engine.is_running());
    }

    #[test]
    fn set_mode_pomodoro_during_break_loads_break_time() {
        let (mut engine, _) = pomodoro(TimerConfig::default());
        engine.toggle_break();
        engine.set_mode(TimerMode::Countup);
        engine.set_mode(TimerMode::Pomodoro);
        assert!(engine.is_break());
        assert_eq!(engine.time_left(), 600);

        engine.set_time_left(42);
        engine.reset_timer();
        assert_eq!(engine.time_left(), 600);
    }

    #[test]
    fn add_time_extends_focus_only_outside_breaks() {
        let (mut engine, _) = pomodoro(TimerConfig::default());
        engine.add_time(600);
        assert_eq!(engine.time_left(), 2100);
        assert_eq!(engine.config().focus_time, 2100);

        engine.toggle_break();
        engine.add_time(600);
        assert_eq!(engine.time_left(), 1200);
        assert_eq!(engine.config().focus_time, 2100);
    }

    #[test]
    fn negative_add_time_is_not_clamped() {
        let (mut engine, _) = pomodoro(TimerConfig::default());
        engine.set_time_left(30);
        engine.add_time(-90);
        assert_eq!(engine.time_left(), -60);
    }

    #[test]
    fn reset_uses_phase_duration_and_auto_start() {
        let config = TimerConfig {
            auto_start: true,
            ..Default::default()
        };
        let (mut engine, _) = pomodoro(config);
        engine.pause();
        engine.set_time_left(7);
        engine.reset_timer();
        assert_eq!(engine.time_left(), 1500);
        assert!(engine.is_running());

        engine.toggle_break();
        engine.set_time_left(-20);
        engine.reset_timer();
        assert_eq!(engine.time_left(), 600);
    }

    #[test]
    fn start_and_pause_report_only_changes() {
        let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(MemoryNotifier::new()));
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert!(engine.pause().is_some());
        assert!(engine.set_running(false).is_none());
    }

    #[test]
    fn hidden_seconds_display() {
        let config = TimerConfig {
            hide_seconds: true,
            ..Default::default()
        };
        let (mut engine, _) = pomodoro(config);
        engine.set_time_left(125);
        assert_eq!(engine.display_at(noon()), "2:00");
    }

    #[test]
    fn snapshot_carries_display() {
        let (engine, _) = pomodoro(TimerConfig::default());
        match engine.snapshot_at(noon()) {
            Event::StateSnapshot {
                mode,
                time_left,
                display,
                is_running,
                ..
            } => {
                assert_eq!(mode, TimerMode::Pomodoro);
                assert_eq!(time_left, 1500);
                assert_eq!(display, "25:00");
                assert!(is_running);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn update_config_merges() {
        let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(MemoryNotifier::new()));
        engine.update_config(TimerConfigPatch {
            break_time: Some(300),
            ..Default::default()
        });
        assert_eq!(engine.config().break_time, 300);
        assert_eq!(engine.config().focus_time, 1500);
    }
}
