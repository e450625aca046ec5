//! Timer face rendering.
//!
//! Countdown layout is `h:MM:SS` with the hours group dropped when zero.
//! With `hide_seconds` the seconds are truncated, and below one hour the
//! face shows a literal `m:00`.

use chrono::{NaiveTime, Timelike};

use super::TimerMode;

/// Render the timer face for `mode`.
///
/// `now` is only consulted in clock mode.
pub fn format_display(mode: TimerMode, time_left: i64, hide_seconds: bool, now: NaiveTime) -> String {
    match mode {
        TimerMode::Clock => format_clock(now, hide_seconds),
        _ => format_countdown(time_left, hide_seconds),
    }
}

/// Wall-clock face, 24h with two-digit fields.
pub fn format_clock(now: NaiveTime, hide_seconds: bool) -> String {
    if hide_seconds {
        now.format("%H:%M").to_string()
    } else {
        now.format("%H:%M:%S").to_string()
    }
}

pub fn format_countdown(seconds: i64, hide_seconds: bool) -> String {
    if seconds < 0 {
        return format!("-{}", format_countdown(seconds.saturating_neg(), hide_seconds));
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hide_seconds {
        return if hours > 0 {
            format!("{hours}:{minutes:02}")
        } else {
            format!("{minutes}:00")
        };
    }

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Seconds elapsed since midnight for the given wall-clock time.
pub fn seconds_since_midnight(now: NaiveTime) -> i64 {
    i64::from(now.num_seconds_from_midnight())
}
