//! Ambient sound mixer.
//!
//! Keeps the set of currently looping sounds with their volumes, in the
//! order they were switched on, and a list of named saved mixes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::player::{Playback, Player};
use super::Sound;
use crate::error::SoundError;

pub const DEFAULT_VOLUME: f32 = 1.0;

/// One sound inside a saved mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub sound_id: String,
    pub volume: f32,
}

/// A named snapshot of active sounds and their volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMix {
    pub id: String,
    pub name: String,
    pub sounds: Vec<MixEntry>,
}

struct ActiveSound {
    handle: Box<dyn Playback>,
    volume: f32,
}

pub struct SoundMixer {
    catalog: Vec<Sound>,
    player: Arc<dyn Player>,
    active: IndexMap<String, ActiveSound>,
    saved_mixes: Vec<SavedMix>,
    is_mix_mode: bool,
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

impl SoundMixer {
    pub fn new(catalog: Vec<Sound>, player: Arc<dyn Player>) -> Self {
        Self {
            catalog,
            player,
            active: IndexMap::new(),
            saved_mixes: Vec::new(),
            is_mix_mode: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn catalog(&self) -> &[Sound] {
        &self.catalog
    }

    pub fn sound(&self, id: &str) -> Option<&Sound> {
        self.catalog.iter().find(|s| s.id == id)
    }

    pub fn is_playing(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn is_active(&self, sound_id: &str) -> bool {
        self.active.contains_key(sound_id)
    }

    pub fn volume(&self, sound_id: &str) -> Option<f32> {
        self.active.get(sound_id).map(|a| a.volume)
    }

    /// Active sounds with their volumes, in activation order.
    pub fn active_sounds(&self) -> Vec<MixEntry> {
        self.active
            .iter()
            .map(|(id, a)| MixEntry {
                sound_id: id.clone(),
                volume: a.volume,
            })
            .collect()
    }

    pub fn saved_mixes(&self) -> &[SavedMix] {
        &self.saved_mixes
    }

    pub fn is_mix_mode(&self) -> bool {
        self.is_mix_mode
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_mix_mode(&mut self, is_mix_mode: bool) {
        self.is_mix_mode = is_mix_mode;
    }

    /// Stop `sound_id` if it is playing, otherwise start it looping at
    /// `volume`. Returns whether the sound is active afterwards.
    ///
    /// # Errors
    ///
    /// Fails when the id is not in the catalog or the backend cannot start it.
    pub fn toggle(&mut self, sound_id: &str, volume: f32) -> Result<bool, SoundError> {
        if let Some(mut active) = self.active.shift_remove(sound_id) {
            active.handle.stop();
            tracing::debug!(sound = sound_id, "sound off");
            return Ok(false);
        }

        let sound = self
            .sound(sound_id)
            .ok_or_else(|| SoundError::UnknownSound(sound_id.to_string()))?;
        let volume = clamp_volume(volume);
        let handle = self.player.play(sound, volume, true)?;
        self.active
            .insert(sound_id.to_string(), ActiveSound { handle, volume });
        tracing::debug!(sound = sound_id, volume, "sound on");
        Ok(true)
    }

    /// Change the volume of an active sound. Inactive ids are ignored.
    pub fn update_volume(&mut self, sound_id: &str, volume: f32) -> bool {
        match self.active.get_mut(sound_id) {
            Some(active) => {
                let volume = clamp_volume(volume);
                active.handle.set_volume(volume);
                active.volume = volume;
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for (_, mut active) in self.active.drain(..) {
            active.handle.stop();
        }
    }

    /// Save the active sounds under `name` and return the new mix.
    pub fn save_mix(&mut self, name: &str) -> SavedMix {
        let mix = SavedMix {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            sounds: self.active_sounds(),
        };
        tracing::info!(mix = %mix.name, sounds = mix.sounds.len(), "mix saved");
        self.saved_mixes.push(mix.clone());
        mix
    }

    /// Replace whatever is playing with the sounds of a saved mix.
    /// Entries whose sound is missing from the catalog are skipped.
    ///
    /// # Errors
    ///
    /// Fails for an unknown mix id. Backend failures on single sounds are
    /// logged and skipped.
    pub fn load_mix(&mut self, mix_id: &str) -> Result<usize, SoundError> {
        let mix = self
            .saved_mixes
            .iter()
            .find(|m| m.id == mix_id)
            .cloned()
            .ok_or_else(|| SoundError::UnknownMix(mix_id.to_string()))?;

        self.stop_all();
        let mut started = 0;
        for entry in &mix.sounds {
            if self.sound(&entry.sound_id).is_none() {
                tracing::debug!(sound = %entry.sound_id, "mix entry not in catalog, skipped");
                continue;
            }
            match self.toggle(&entry.sound_id, entry.volume) {
                Ok(true) => started += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("could not start mix entry: {e}"),
            }
        }
        Ok(started)
    }

    pub fn delete_mix(&mut self, mix_id: &str) -> bool {
        let before = self.saved_mixes.len();
        self.saved_mixes.retain(|m| m.id != mix_id);
        self.saved_mixes.len() != before
    }

    /// Fire-and-forget one-shot of a catalog sound (used for timer cues).
    pub fn play_cue(&self, sound_id: &str, volume: f32) -> Result<(), SoundError> {
        let sound = self
            .sound(sound_id)
            .ok_or_else(|| SoundError::UnknownSound(sound_id.to_string()))?;
        self.player.play(sound, clamp_volume(volume), false)?;
        Ok(())
    }
}

impl fmt::Debug for SoundMixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundMixer")
            .field("player", &self.player.name())
            .field("catalog", &self.catalog.len())
            .field("active", &self.active_sounds())
            .field("saved_mixes", &self.saved_mixes)
            .field("is_mix_mode", &self.is_mix_mode)
            .finish()
    }
}

impl Drop for SoundMixer {
    fn drop(&mut self) {
        self.stop_all();
    }
}
