//! Playback backend seam.
//!
//! The mixer only needs to start a sound and later change its volume or stop
//! it. Decoding and output belong to whatever implements [`Player`].

use std::sync::{Arc, Mutex};

use super::Sound;
use crate::error::SoundError;

/// A live playback started by a [`Player`].
pub trait Playback: Send {
    fn set_volume(&mut self, volume: f32);
    fn stop(&mut self);
}

/// Every audio backend implements this trait.
pub trait Player: Send + Sync {
    fn name(&self) -> &str;

    /// Start `sound` at `volume` (0.0..=1.0).
    fn play(&self, sound: &Sound, volume: f32, looping: bool) -> Result<Box<dyn Playback>, SoundError>;
}

/// Backend that produces no audio and only logs what it would do.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

struct SilentPlayback {
    sound_id: String,
}

impl Playback for SilentPlayback {
    fn set_volume(&mut self, volume: f32) {
        tracing::debug!(sound = %self.sound_id, volume, "volume changed");
    }

    fn stop(&mut self) {
        tracing::debug!(sound = %self.sound_id, "stopped");
    }
}

impl Player for SilentPlayer {
    fn name(&self) -> &str {
        "silent"
    }

    fn play(&self, sound: &Sound, volume: f32, looping: bool) -> Result<Box<dyn Playback>, SoundError> {
        tracing::debug!(sound = %sound.id, volume, looping, "playing");
        Ok(Box::new(SilentPlayback {
            sound_id: sound.id.clone(),
        }))
    }
}

/// One call observed by [`MemoryPlayer`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Play {
        sound_id: String,
        volume: f32,
        looping: bool,
    },
    Volume {
        sound_id: String,
        volume: f32,
    },
    Stop {
        sound_id: String,
    },
}

/// Backend that records every call, for assertions.
#[derive(Debug, Default, Clone)]
pub struct MemoryPlayer {
    calls: Arc<Mutex<Vec<PlayerCall>>>,
    /// Sound ids whose `play` fails.
    failing: Vec<String>,
}

impl MemoryPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player whose `play` fails for the given sound ids.
    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            calls: Arc::default(),
            failing: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(calls: &Mutex<Vec<PlayerCall>>, call: PlayerCall) {
        if let Ok(mut calls) = calls.lock() {
            calls.push(call);
        }
    }
}

struct MemoryPlayback {
    sound_id: String,
    calls: Arc<Mutex<Vec<PlayerCall>>>,
}

impl Playback for MemoryPlayback {
    fn set_volume(&mut self, volume: f32) {
        MemoryPlayer::record(
            &self.calls,
            PlayerCall::Volume {
                sound_id: self.sound_id.clone(),
                volume,
            },
        );
    }

    fn stop(&mut self) {
        MemoryPlayer::record(
            &self.calls,
            PlayerCall::Stop {
                sound_id: self.sound_id.clone(),
            },
        );
    }
}

impl Player for MemoryPlayer {
    fn name(&self) -> &str {
        "memory"
    }

    fn play(&self, sound: &Sound, volume: f32, looping: bool) -> Result<Box<dyn Playback>, SoundError> {
        if self.failing.contains(&sound.id) {
            return Err(SoundError::Playback {
                sound_id: sound.id.clone(),
                message: "backend refused".into(),
            });
        }
        Self::record(
            &self.calls,
            PlayerCall::Play {
                sound_id: sound.id.clone(),
                volume,
                looping,
            },
        );
        Ok(Box::new(MemoryPlayback {
            sound_id: sound.id.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}
