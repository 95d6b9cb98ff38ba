//! Host collaborators for the real-time demo.

use std::path::PathBuf;

use blockfall_engine::{AudioSink, SettingsStore, Sound, StoredSettings};

use crate::util::{self, Output};

/// Settings persisted as a JSON file.
///
/// A missing file reads as the defaults. Every change is written back
/// immediately; write failures are reported on stderr and otherwise ignored.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    settings: StoredSettings,
}

impl FileSettingsStore {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let settings = if path.exists() {
            util::read_json_file("settings", &path)?
        } else {
            StoredSettings::default()
        };
        Ok(Self { path, settings })
    }

    fn save(&self) {
        if let Err(err) = Output::save_json(&self.settings, Some(self.path.as_path())) {
            eprintln!("Failed to save settings: {err:#}");
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn muted(&self) -> bool {
        self.settings.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.save();
    }

    fn high_score(&self) -> usize {
        self.settings.high_score
    }

    fn set_high_score(&mut self, high_score: usize) {
        self.settings.high_score = high_score;
        self.save();
    }
}

/// Audio sink that logs sound ids to stderr.
#[derive(Debug, Default)]
pub struct ConsoleAudio {
    muted: bool,
}

impl AudioSink for ConsoleAudio {
    fn play(&mut self, sound: Sound) -> bool {
        if self.muted {
            return false;
        }
        eprintln!("  [sound] {}", sound.id());
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
