//! The widget's state holders, built once at startup.

use std::sync::Arc;

use crate::error::Result;
use crate::events::Event;
use crate::notify::Notifier;
use crate::sound::{default_catalog, Player, Sound, SoundMixer};
use crate::storage::{Config, SoundConfig};
use crate::timer::{TimerConfigPatch, TimerEngine};
use crate::todo::TodoList;
use crate::ui::UiState;

/// One instance of every store. The stores never talk to each other; the
/// app only adds the timer's sound cue on phase changes.
#[derive(Debug)]
pub struct AmbientApp {
    pub timer: TimerEngine,
    pub todos: TodoList,
    pub sounds: SoundMixer,
    pub ui: UiState,
    sound_config: SoundConfig,
}

impl AmbientApp {
    /// Build the stores from `config` with the built-in sound catalog.
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>, player: Arc<dyn Player>) -> Self {
        Self::with_catalog(config, default_catalog(), notifier, player)
    }

    pub fn with_catalog(
        config: &Config,
        catalog: Vec<Sound>,
        notifier: Arc<dyn Notifier>,
        player: Arc<dyn Player>,
    ) -> Self {
        Self {
            timer: TimerEngine::new(config.timer.clone(), notifier),
            todos: TodoList::new(),
            sounds: SoundMixer::new(catalog, player),
            ui: config.ui.clone(),
            sound_config: config.sound.clone(),
        }
    }

    /// Volume for sounds switched on without an explicit level.
    pub fn default_volume(&self) -> f32 {
        self.sound_config.default_volume
    }

    /// Advance the timer by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.timer.tick();
        if events.iter().any(Event::is_phase_change) {
            self.play_phase_cue();
        }
        events
    }

    /// Switch pomodoro phase by hand.
    pub fn toggle_break(&mut self) -> Event {
        let event = self.timer.toggle_break();
        self.play_phase_cue();
        event
    }

    /// Change one timer setting while the widget runs, e.g.
    /// `apply_setting("break_time", "300")`.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<Event> {
        let patch = TimerConfigPatch::from_setting(key, value)?;
        Ok(self.timer.update_config(patch))
    }

    /// The timer's state snapshot as pretty JSON.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.timer.snapshot())?)
    }

    fn play_phase_cue(&self) {
        if !self.timer.config().sound_effects {
            return;
        }
        if let Err(e) = self
            .sounds
            .play_cue(&self.sound_config.cue_sound, self.sound_config.default_volume)
        {
            tracing::warn!("phase cue not played: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::notify::MemoryNotifier;
    use crate::sound::{MemoryPlayer, PlayerCall};
    use crate::timer::TimerMode;

    fn app(config: &Config) -> (AmbientApp, MemoryPlayer) {
        let player = MemoryPlayer::new();
        let app = AmbientApp::new(config, Arc::new(MemoryNotifier::new()), Arc::new(player.clone()));
        (app, player)
    }

    #[test]
    fn stores_start_from_config() {
        let mut config = Config::default();
        config.timer.focus_time = 50 * 60;
        config.ui.show_sound_list = false;
        let (app, _) = app(&config);
        assert_eq!(app.timer.time_left(), 3000);
        assert_eq!(app.timer.mode(), TimerMode::Clock);
        assert!(!app.ui.show_sound_list);
        assert!(app.todos.is_empty());
        assert!(!app.sounds.is_playing());
        assert_eq!(app.sounds.catalog().len(), 5);
    }

    #[test]
    fn phase_change_plays_cue_when_enabled() {
        let (mut app, player) = app(&Config::default());
        app.timer.set_mode(TimerMode::Pomodoro);
        app.timer.start();
        app.timer.set_time_left(1);
        app.tick();
        assert_eq!(
            player.calls(),
            vec![PlayerCall::Play {
                sound_id: "clock".into(),
                volume: 1.0,
                looping: false
            }]
        );
    }

    #[test]
    fn no_cue_without_sound_effects() {
        let mut config = Config::default();
        config.timer.sound_effects = false;
        let (mut app, player) = app(&config);
        app.toggle_break();
        assert!(app.timer.is_break());
        assert!(player.calls().is_empty());
    }

    #[test]
    fn settings_change_the_running_timer() {
        let (mut app, _) = app(&Config::default());
        app.timer.set_mode(TimerMode::Pomodoro);
        app.apply_setting("break_time", "300").unwrap();
        app.apply_setting("hide-seconds", "true").unwrap();
        assert_eq!(app.timer.config().break_time, 300);
        assert_eq!(app.timer.display(), "25:00");

        app.toggle_break();
        assert_eq!(app.timer.time_left(), 300);

        assert!(matches!(
            app.apply_setting("break_time", "-"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            app.apply_setting("colour", "red"),
            Err(CoreError::Config(_))
        ));
        assert_eq!(app.timer.config().break_time, 300);
    }

    #[test]
    fn snapshot_json_is_tagged() {
        let (app, _) = app(&Config::default());
        let json: serde_json::Value = serde_json::from_str(&app.snapshot_json().unwrap()).unwrap();
        assert_eq!(json["type"], "state_snapshot");
        assert_eq!(json["mode"], "clock");
        assert_eq!(json["config"]["focus_time"], 1500);
    }

    #[test]
    fn missing_cue_sound_is_not_fatal() {
        let mut config = Config::default();
        config.sound.cue_sound = "gong".into();
        let (mut app, player) = app(&config);
        app.toggle_break();
        assert!(app.timer.is_break());
        assert!(player.calls().is_empty());
    }
}
