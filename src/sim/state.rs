//! Shared simulation state and event types
//!
//! Everything every screen needs (the live objects, the blade, physics
//! switches, randomness and the outgoing event queue) lives on the `Stage`.
//! Screens borrow it; nothing is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::SimContext;
use super::swipe::SwipeTracker;
use super::world::World;
use crate::audio::{AudioCommand, Cue};
use crate::consts::CLASSIC_LIVES;
use crate::tuning::Tuning;

/// Game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    /// Lives, no clock
    Classic,
    /// Countdown with power-ups
    Arcade,
}

impl ModeKind {
    /// Integer key used by the score store
    pub fn id(self) -> i64 {
        match self {
            ModeKind::Classic => 0,
            ModeKind::Arcade => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModeKind::Classic => "Classic",
            ModeKind::Arcade => "Arcade",
        }
    }

    /// Lives before the round ends, if the mode has lives
    pub fn max_lives(self) -> Option<u32> {
        match self {
            ModeKind::Classic => Some(CLASSIC_LIVES),
            ModeKind::Arcade => None,
        }
    }

    /// Most hazards thrown per hazard-timer firing
    pub fn max_hazards(self, tuning: &Tuning) -> u32 {
        match self {
            ModeKind::Classic => tuning.max_hazards_classic,
            ModeKind::Arcade => tuning.max_hazards_arcade,
        }
    }

    pub fn has_power_ups(self) -> bool {
        self == ModeKind::Arcade
    }
}

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenKind {
    Loading,
    MainMenu,
    Playing(ModeKind),
    EndTable,
    Quit,
}

/// Something the host should know about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Audio(AudioCommand),
    ScreenChanged(ScreenKind),
    ScoreSaved { mode: ModeKind, score: i64 },
}

/// Outgoing events, drained by the host once per frame
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    events: Vec<GameEvent>,
}

impl Outbox {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: Cue) {
        self.push(GameEvent::Audio(AudioCommand::Play(cue)));
    }

    pub fn play_looping(&mut self, cue: Cue) {
        self.push(GameEvent::Audio(AudioCommand::PlayLooping(cue)));
    }

    pub fn stop(&mut self, cue: Cue) {
        self.push(GameEvent::Audio(AudioCommand::Stop(cue)));
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Audio commands still queued
    pub fn audio(&self) -> impl Iterator<Item = AudioCommand> + '_ {
        self.events.iter().filter_map(|e| match e {
            GameEvent::Audio(cmd) => Some(*cmd),
            _ => None,
        })
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// State shared by every screen
#[derive(Debug, Clone)]
pub struct Stage {
    pub world: World,
    pub ctx: SimContext,
    pub swipe: SwipeTracker,
    pub rng: Pcg32,
    pub events: Outbox,
    pub tuning: Tuning,
    /// Primary pointer button held
    pub pointer_down: bool,
}

impl Stage {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            world: World::default(),
            ctx: SimContext::default(),
            swipe: SwipeTracker::default(),
            rng: RngState::new(seed).to_rng(),
            events: Outbox::default(),
            tuning,
            pointer_down: false,
        }
    }

    /// Drop everything on screen and close any swipe without scoring it
    pub fn reset_playfield(&mut self) {
        self.world.clear_all(&mut self.events);
        self.swipe.reset();
        self.ctx = SimContext::default();
    }
}

/// Seeded RNG used by tests across the simulation
#[cfg(test)]
pub(crate) fn test_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
