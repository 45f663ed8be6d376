//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies; those go out as events or
//!   through the `ScoreStore` trait

pub mod entity;
pub mod ledger;
pub mod menu;
pub mod mode;
pub mod physics;
pub mod sdf;
pub mod state;
pub mod swipe;
pub mod tick;
pub mod timers;
pub mod world;

pub use entity::{Category, Effect, EffectKind, Fragment, FruitKind, Lifecycle, PowerUpKind, Projectile};
pub use ledger::ScoreLedger;
pub use menu::{EndTable, Loading, MENU_TARGETS, MainMenu, MenuTarget};
pub use mode::{ModeController, ModeTimer, RoundSummary};
pub use physics::{Body, SimContext};
pub use sdf::HitMask;
pub use state::{GameEvent, ModeKind, Outbox, RngState, ScreenKind, Stage};
pub use swipe::{ComboAward, CutOutcome, CutReport, SwipeTracker, combo_award, curvature};
pub use tick::{Game, Screen};
pub use timers::Timers;
pub use world::World;
