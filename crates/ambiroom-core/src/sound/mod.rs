mod catalog;
mod mixer;
mod player;

pub use catalog::{default_catalog, Sound};
pub use mixer::{MixEntry, SavedMix, SoundMixer, DEFAULT_VOLUME};
pub use player::{MemoryPlayer, Playback, Player, PlayerCall, SilentPlayer};
