//! Data-driven game balance
//!
//! Every interval and duration the modes use lives here so a run can be
//! rebalanced from a JSON file without recompiling. Unset fields keep the
//! defaults below.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;

/// Uniform range in seconds (or pixels/second for launch speeds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample; degenerate spans return `min`
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.random_range(self.min..self.max)
        }
    }

    #[inline]
    pub fn as_tuple(&self) -> (f32, f32) {
        (self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawn cadence ===
    pub fruit_interval: Span,
    /// Delay before the first hazard of a round
    pub hazard_first_interval: Span,
    /// Delay between later hazards
    pub hazard_interval: Span,
    /// Most fruit thrown per fruit-timer firing
    pub max_fruit_per_throw: u32,
    /// Most hazards thrown per firing (Classic / Arcade)
    pub max_hazards_classic: u32,
    pub max_hazards_arcade: u32,

    // === After an explosion ===
    pub cooldown_fruit_interval: Span,
    pub cooldown_hazard_interval: Span,

    // === Launch ===
    pub launch_speed_x: Span,
    pub launch_speed_y: Span,

    // === Arcade ===
    pub arcade_duration: f32,
    pub power_up_interval: Span,
    pub freeze_duration: f32,
    pub blitz_duration: f32,
    pub double_duration: f32,
    pub blitz_fruit_interval: Span,

    // === Combo windows ===
    pub session_cycle: f32,
    pub critical_window: f32,
    /// Critical bonus needs strictly more cuts than this per window
    pub critical_threshold: u32,

    // === Screen changes ===
    pub loading_duration: f32,
    pub menu_change_delay: f32,
    pub game_over_delay: f32,
    pub result_return_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fruit_interval: Span::new(0.5, 2.0),
            hazard_first_interval: Span::new(10.0, 15.0),
            hazard_interval: Span::new(5.0, 7.0),
            max_fruit_per_throw: 3,
            max_hazards_classic: 1,
            max_hazards_arcade: 2,

            cooldown_fruit_interval: Span::new(3.0, 4.0),
            cooldown_hazard_interval: Span::new(5.0, 10.0),

            launch_speed_x: Span::new(100.0, 400.0),
            launch_speed_y: Span::new(500.0, 1000.0),

            arcade_duration: crate::consts::ARCADE_DURATION,
            power_up_interval: Span::new(8.0, 12.0),
            freeze_duration: 5.0,
            blitz_duration: 4.0,
            double_duration: 8.0,
            blitz_fruit_interval: Span::new(0.1, 0.25),

            session_cycle: 1.0,
            critical_window: 1.0,
            critical_threshold: 3,

            loading_duration: 2.0,
            menu_change_delay: 1.5,
            game_over_delay: 2.0,
            result_return_delay: 1.0,
        }
    }
}

impl Tuning {
    /// Load tuning overrides from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            log::info!("No tuning at {}, using defaults", path.display());
            return Self::default();
        };
        serde_json::from_str::<Self>(&json)
            .map(Self::validated)
            .unwrap_or_else(|e| {
                log::warn!("Ignoring malformed tuning {}: {}", path.display(), e);
                Self::default()
            })
    }

    /// Raise every interval and duration to at least one simulation step.
    ///
    /// Timers re-arm from these values, so zero or negative delays would fire
    /// every step.
    pub fn validated(mut self) -> Self {
        for (name, span) in [
            ("fruit_interval", &mut self.fruit_interval),
            ("hazard_first_interval", &mut self.hazard_first_interval),
            ("hazard_interval", &mut self.hazard_interval),
            ("cooldown_fruit_interval", &mut self.cooldown_fruit_interval),
            ("cooldown_hazard_interval", &mut self.cooldown_hazard_interval),
            ("power_up_interval", &mut self.power_up_interval),
            ("blitz_fruit_interval", &mut self.blitz_fruit_interval),
        ] {
            let min = span.min.max(SIM_DT);
            let fixed = Span::new(min, span.max.max(min));
            if fixed != *span {
                log::warn!("tuning {} {:?} raised to {:?}", name, span, fixed);
                *span = fixed;
            }
        }
        for (name, seconds) in [
            ("arcade_duration", &mut self.arcade_duration),
            ("freeze_duration", &mut self.freeze_duration),
            ("blitz_duration", &mut self.blitz_duration),
            ("double_duration", &mut self.double_duration),
            ("session_cycle", &mut self.session_cycle),
            ("critical_window", &mut self.critical_window),
            ("loading_duration", &mut self.loading_duration),
            ("menu_change_delay", &mut self.menu_change_delay),
            ("game_over_delay", &mut self.game_over_delay),
            ("result_return_delay", &mut self.result_return_delay),
        ] {
            if seconds.is_nan() || *seconds < SIM_DT {
                log::warn!("tuning {} {} raised to {}", name, seconds, SIM_DT);
                *seconds = SIM_DT;
            }
        }
        self
    }
}
