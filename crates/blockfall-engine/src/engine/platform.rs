//! Collaborators the game needs from its host: sound output and persisted
//! settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sound effects requested by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Drop,
    LineClear,
    LevelUp,
    Theme,
}

impl Sound {
    /// Resource identifier of the sound.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Sound::Drop => "drop",
            Sound::LineClear => "line_clear",
            Sound::LevelUp => "level_up",
            Sound::Theme => "theme",
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Audio output.
///
/// Playback failures are reported through the return value and must never
/// stop the game.
pub trait AudioSink {
    /// Plays `sound`, returning whether playback started.
    fn play(&mut self, sound: Sound) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
    fn stop(&mut self);
}

/// Persistent mute flag and high score.
pub trait SettingsStore {
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn high_score(&self) -> usize;
    fn set_high_score(&mut self, high_score: usize);
}

/// Snapshot of the persisted settings, read when a game starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    pub high_score: usize,
    pub muted: bool,
}

impl StoredSettings {
    #[must_use]
    pub fn load_from(store: &impl SettingsStore) -> Self {
        Self {
            high_score: store.high_score(),
            muted: store.muted(),
        }
    }
}

/// Audio sink that plays nothing and records what it was asked to play.
#[derive(Debug, Clone, Default)]
pub struct NullAudio {
    muted: bool,
    played: Vec<Sound>,
}

impl NullAudio {
    #[must_use]
    pub fn played(&self) -> &[Sound] {
        &self.played
    }
}

impl AudioSink for NullAudio {
    fn play(&mut self, sound: Sound) -> bool {
        if self.muted {
            return false;
        }
        self.played.push(sound);
        true
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn stop(&mut self) {}
}

/// In-memory settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySettings {
    pub settings: StoredSettings,
}

impl SettingsStore for MemorySettings {
    fn muted(&self) -> bool {
        self.settings.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    fn high_score(&self) -> usize {
        self.settings.high_score
    }

    fn set_high_score(&mut self, high_score: usize) {
        self.settings.high_score = high_score;
    }
}
