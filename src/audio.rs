//! Audio cues
//!
//! The simulation never plays sound itself. It emits `AudioCommand`s at the
//! moments something audible happens and the host forwards them to an
//! `AudioSink`, which owns the actual playback.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::entity::PowerUpKind;

/// Sound effect / music ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Menu background music (looping)
    MenuMusic,
    /// Mode started
    GameStart,
    /// Result screen shown
    GameOver,
    /// Fruit launched
    FruitThrow,
    /// Fruit sliced
    FruitCut,
    /// Bomb launched
    BombThrow,
    /// Burning fuse of one live bomb (looping, keyed by entity id)
    BombFuse(u32),
    /// Bomb sliced
    BombExplode,
    /// A life was lost
    LoseLife,
    /// Critical combo bonus, tier 1..=8 by how far the window beat the threshold
    Critical(u8),
    /// Straight-slash combo, tier 1..=8
    Combo(u8),
    /// Power-up picked up
    PowerUpStart(PowerUpKind),
    /// Power-up ran out
    PowerUpEnd(PowerUpKind),
    /// Blitz background loop
    BlitzLoop,
}

impl Cue {
    /// Asset path for the cue
    pub fn path(&self) -> String {
        match self {
            Cue::MenuMusic => "media/music/nature_bgm.ogg".to_string(),
            Cue::GameStart => "media/sounds/game-start.ogg".to_string(),
            Cue::GameOver => "media/sounds/game-over.ogg".to_string(),
            Cue::FruitThrow => "media/sounds/throw-fruit.ogg".to_string(),
            Cue::FruitCut => "media/sounds/squash.ogg".to_string(),
            Cue::BombThrow => "media/sounds/throw-bomb.ogg".to_string(),
            Cue::BombFuse(_) => "media/sounds/bomb-fuse.ogg".to_string(),
            Cue::BombExplode => "media/sounds/explosion.ogg".to_string(),
            Cue::LoseLife => "media/sounds/lose_life.ogg".to_string(),
            Cue::Critical(tier) => format!("media/sounds/critical-{tier}.ogg"),
            Cue::Combo(tier) => format!("media/sounds/combo-{tier}.ogg"),
            Cue::PowerUpStart(kind) => {
                format!("media/sounds/{}-start.ogg", kind.name().to_lowercase())
            }
            Cue::PowerUpEnd(kind) => {
                format!("media/sounds/{}-end.ogg", kind.name().to_lowercase())
            }
            Cue::BlitzLoop => "media/sounds/blitz-loop.ogg".to_string(),
        }
    }

    /// Music and loops are mixed on the music bus, everything else on sfx
    pub fn is_music(&self) -> bool {
        matches!(self, Cue::MenuMusic | Cue::BlitzLoop)
    }

    /// Relative volume of the cue itself
    pub fn gain(&self) -> f32 {
        match self {
            Cue::BombFuse(_) => 0.1,
            _ => 1.0,
        }
    }
}

/// One request to the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCommand {
    Play(Cue),
    PlayLooping(Cue),
    Stop(Cue),
}

/// Whatever actually makes noise
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn play_looping(&mut self, cue: Cue);
    fn stop(&mut self, cue: Cue);

    /// Forward a command to the matching method
    fn dispatch(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play(cue) => self.play(cue),
            AudioCommand::PlayLooping(cue) => self.play_looping(cue),
            AudioCommand::Stop(cue) => self.stop(cue),
        }
    }
}

/// Audio sink for headless runs: logs every cue and tracks running loops
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    looping: HashSet<Cue>,
    played: usize,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl LogAudio {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            looping: HashSet::new(),
            played: 0,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effective volume for a cue
    pub fn volume(&self, cue: Cue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let bus = if cue.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        self.master_volume * bus * cue.gain()
    }

    pub fn is_looping(&self, cue: Cue) -> bool {
        self.looping.contains(&cue)
    }

    /// Number of loops currently running
    pub fn loops(&self) -> usize {
        self.looping.len()
    }

    /// Total cues started so far
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue) {
        self.played += 1;
        log::debug!("play {} (vol {:.2})", cue.path(), self.volume(cue));
    }

    fn play_looping(&mut self, cue: Cue) {
        self.played += 1;
        if !self.looping.insert(cue) {
            log::warn!("{:?} is already looping", cue);
        }
        log::debug!("loop {} (vol {:.2})", cue.path(), self.volume(cue));
    }

    fn stop(&mut self, cue: Cue) {
        if self.looping.remove(&cue) {
            log::debug!("stop {}", cue.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_path_uses_tier() {
        assert_eq!(Cue::Combo(8).path(), "media/sounds/combo-8.ogg");
        assert_eq!(Cue::Critical(3).path(), "media/sounds/critical-3.ogg");
        assert_eq!(
            Cue::PowerUpStart(PowerUpKind::Freeze).path(),
            "media/sounds/freeze-start.ogg"
        );
    }

    #[test]
    fn test_log_audio_tracks_loops() {
        let mut audio = LogAudio::default();
        audio.dispatch(AudioCommand::PlayLooping(Cue::BombFuse(4)));
        audio.dispatch(AudioCommand::PlayLooping(Cue::BombFuse(5)));
        audio.dispatch(AudioCommand::Stop(Cue::BombFuse(4)));
        assert!(!audio.is_looping(Cue::BombFuse(4)));
        assert!(audio.is_looping(Cue::BombFuse(5)));
        assert_eq!(audio.loops(), 1);
        assert_eq!(audio.played(), 2);
    }

    #[test]
    fn test_volume_buses() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 1.0,
            music_volume: 0.4,
            ..Settings::default()
        };
        let mut audio = LogAudio::new(&settings);
        assert!((audio.volume(Cue::FruitCut) - 0.5).abs() < 1e-6);
        assert!((audio.volume(Cue::MenuMusic) - 0.2).abs() < 1e-6);
        assert!((audio.volume(Cue::BombFuse(1)) - 0.05).abs() < 1e-6);
        audio.set_muted(true);
        assert_eq!(audio.volume(Cue::FruitCut), 0.0);
    }
}
