//! Which widget sections are rendered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default = "default_true")]
    pub show_clock: bool,
    #[serde(default = "default_true")]
    pub show_timer: bool,
    #[serde(default = "default_true")]
    pub show_play_mix_switcher: bool,
    #[serde(default = "default_true")]
    pub show_todo_bar: bool,
    #[serde(default = "default_true")]
    pub show_sound_list: bool,
    #[serde(default = "default_true")]
    pub show_controls: bool,
    #[serde(default)]
    pub auto_hide_controls: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_clock: true,
            show_timer: true,
            show_play_mix_switcher: true,
            show_todo_bar: true,
            show_sound_list: true,
            show_controls: true,
            auto_hide_controls: false,
        }
    }
}

/// A toggleable flag of [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiSection {
    Clock,
    Timer,
    PlayMixSwitcher,
    TodoBar,
    SoundList,
    Controls,
    AutoHideControls,
}

impl UiSection {
    pub const ALL: [UiSection; 7] = [
        UiSection::Clock,
        UiSection::Timer,
        UiSection::PlayMixSwitcher,
        UiSection::TodoBar,
        UiSection::SoundList,
        UiSection::Controls,
        UiSection::AutoHideControls,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UiSection::Clock => "clock",
            UiSection::Timer => "timer",
            UiSection::PlayMixSwitcher => "play-mix-switcher",
            UiSection::TodoBar => "todo-bar",
            UiSection::SoundList => "sound-list",
            UiSection::Controls => "controls",
            UiSection::AutoHideControls => "auto-hide-controls",
        }
    }
}

impl fmt::Display for UiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiSection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        UiSection::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "section".into(),
                message: format!("unknown UI section '{s}'"),
            })
    }
}

impl UiState {
    fn flag_mut(&mut self, section: UiSection) -> &mut bool {
        match section {
            UiSection::Clock => &mut self.show_clock,
            UiSection::Timer => &mut self.show_timer,
            UiSection::PlayMixSwitcher => &mut self.show_play_mix_switcher,
            UiSection::TodoBar => &mut self.show_todo_bar,
            UiSection::SoundList => &mut self.show_sound_list,
            UiSection::Controls => &mut self.show_controls,
            UiSection::AutoHideControls => &mut self.auto_hide_controls,
        }
    }

    pub fn is_visible(&self, section: UiSection) -> bool {
        match section {
            UiSection::Clock => self.show_clock,
            UiSection::Timer => self.show_timer,
            UiSection::PlayMixSwitcher => self.show_play_mix_switcher,
            UiSection::TodoBar => self.show_todo_bar,
            UiSection::SoundList => self.show_sound_list,
            UiSection::Controls => self.show_controls,
            UiSection::AutoHideControls => self.auto_hide_controls,
        }
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, section: UiSection) -> bool {
        let flag = self.flag_mut(section);
        *flag = !*flag;
        *flag
    }

    pub fn set_auto_hide_controls(&mut self, value: bool) {
        self.auto_hide_controls = value;
    }
}
