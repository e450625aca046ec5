//! # Ambiroom Core Library
//!
//! Business logic for the Ambiroom ambient-productivity widget: a combined
//! clock and timer, a small todo list, an ambient sound mixer and the flags
//! deciding which widget sections are shown. All runtime state lives in
//! memory and resets on restart; only startup defaults come from a TOML file.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a state machine over clock, pomodoro, count-up and goal
//!   modes that advances one second per `tick()`
//! - **Scheduler**: the tokio task that calls `tick()` once per second while
//!   the timer runs
//! - **Stores**: todo list, sound mixer and UI visibility, each independent
//! - **Side channels**: [`Notifier`] for phase notifications and [`Player`]
//!   for audio playback
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`AmbientApp`]: One instance of every store, built at startup
//! - [`TimerDriver`]: Keeps one [`Ticker`] alive while the timer runs
//! - [`Config`]: Application configuration management

pub mod app;
pub mod error;
pub mod events;
pub mod notify;
pub mod scheduler;
pub mod sound;
pub mod storage;
pub mod timer;
pub mod todo;
pub mod ui;

pub use app::AmbientApp;
pub use error::{ConfigError, CoreError, SoundError, ValidationError};
pub use events::Event;
pub use notify::{LogNotifier, MemoryNotifier, NotificationMessage, Notifier, Permission};
pub use scheduler::{SharedApp, Ticker, TimerDriver, TICK_PERIOD};
pub use sound::{MemoryPlayer, Player, SavedMix, SilentPlayer, Sound, SoundMixer};
pub use storage::Config;
pub use timer::{TimerConfig, TimerConfigPatch, TimerEngine, TimerMode, TimerState};
pub use todo::{TodoItem, TodoList};
pub use ui::{UiSection, UiState};
