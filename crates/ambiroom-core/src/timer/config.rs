use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ConfigError, Result, ValidationError};

/// 25 minutes.
pub const DEFAULT_FOCUS_SECS: i64 = 25 * 60;
/// 10 minutes.
pub const DEFAULT_BREAK_SECS: i64 = 10 * 60;

/// Per-timer settings.
///
/// Durations are plain seconds. Positivity is expected but not enforced;
/// a zero or negative duration simply produces a countdown that ends on the
/// next tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_time")]
    pub focus_time: i64,
    #[serde(default = "default_break_time")]
    pub break_time: i64,
    /// Keep running across phase boundaries and resets.
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default)]
    pub hide_seconds: bool,
    #[serde(default = "default_true")]
    pub sound_effects: bool,
    /// Gate for the notification side channel.
    #[serde(default = "default_true")]
    pub browser_notifications: bool,
}

fn default_focus_time() -> i64 {
    DEFAULT_FOCUS_SECS
}
fn default_break_time() -> i64 {
    DEFAULT_BREAK_SECS
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_time: DEFAULT_FOCUS_SECS,
            break_time: DEFAULT_BREAK_SECS,
            auto_start: false,
            hide_seconds: false,
            sound_effects: true,
            browser_notifications: true,
        }
    }
}

/// Partial update for [`TimerConfig`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_seconds: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_effects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_notifications: Option<bool>,
}

impl TimerConfigPatch {
    /// Build a single-field patch from a setting name and its text value.
    /// Hyphens in `key` are accepted in place of underscores.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnknownKey` for an unknown name,
    /// `ValidationError::InvalidValue` when the value does not parse.
    pub fn from_setting(key: &str, value: &str) -> Result<Self> {
        let key = key.trim().replace('-', "_");
        let mut patch = Self::default();
        match key.as_str() {
            "focus_time" => patch.focus_time = Some(parse(&key, value)?),
            "break_time" => patch.break_time = Some(parse(&key, value)?),
            "auto_start" => patch.auto_start = Some(parse(&key, value)?),
            "hide_seconds" => patch.hide_seconds = Some(parse(&key, value)?),
            "sound_effects" => patch.sound_effects = Some(parse(&key, value)?),
            "browser_notifications" => patch.browser_notifications = Some(parse(&key, value)?),
            _ => return Err(ConfigError::UnknownKey(key).into()),
        }
        Ok(patch)
    }
}

fn parse<T>(key: &str, value: &str) -> std::result::Result<T, ValidationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ValidationError::InvalidValue {
            field: key.to_string(),
            message: format!("{value:?}: {e}"),
        })
}

impl TimerConfig {
    /// Merge `patch` into `self`.
    pub fn apply(&mut self, patch: TimerConfigPatch) {
        if let Some(v) = patch.focus_time {
            self.focus_time = v;
        }
        if let Some(v) = patch.break_time {
            self.break_time = v;
        }
        if let Some(v) = patch.auto_start {
            self.auto_start = v;
        }
        if let Some(v) = patch.hide_seconds {
            self.hide_seconds = v;
        }
        if let Some(v) = patch.sound_effects {
            self.sound_effects = v;
        }
        if let Some(v) = patch.browser_notifications {
            self.browser_notifications = v;
        }
    }

    /// Duration of the given pomodoro phase.
    pub fn phase_duration(&self, is_break: bool) -> i64 {
        if is_break {
            self.break_time
        } else {
            self.focus_time
        }
    }
}
