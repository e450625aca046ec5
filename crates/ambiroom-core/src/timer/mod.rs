mod config;
mod engine;
pub mod format;
mod mode;

pub use config::{TimerConfig, TimerConfigPatch, DEFAULT_BREAK_SECS, DEFAULT_FOCUS_SECS};
pub use engine::{TimerEngine, TimerState};
pub use format::{format_clock, format_countdown, format_display};
pub use mode::TimerMode;
