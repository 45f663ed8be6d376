//! Classic and Arcade round controller
//!
//! One controller runs a round from `reload` until its end-screen timer
//! fires. It owns the round's timers and ledger; everything on screen lives
//! on the shared `Stage`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Effect, FruitKind, PowerUpKind};
use super::ledger::ScoreLedger;
use super::state::{ModeKind, ScreenKind, Stage};
use super::swipe::{ComboAward, CutReport};
use super::timers::Timers;
use crate::audio::Cue;
use crate::consts::{FLASH_DECAY, FLASH_START, HEIGHT, MAX_COMBO_TIER, WIDTH};
use crate::platform::InputEvent;

/// Named deadlines of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeTimer {
    SpawnFruit,
    SpawnHazard,
    SpawnPowerUp,
    PowerUpExpiry,
    /// Arcade countdown
    ModeEnd,
    /// Force-ends the swipe session
    SessionCycle,
    /// Evaluates the critical combo counter
    CriticalWindow,
    /// Delay between game over and the result screen
    EndScreen,
}

/// Number of preset spots for centered popups
pub const CENTERED_SLOTS: usize = 5;

/// Preset spots for combo and critical popups, used in rotation
pub fn centered_position(slot: usize) -> Vec2 {
    let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0);
    let (dx, dy) = (WIDTH / 5.0, HEIGHT / 5.0);
    match slot % CENTERED_SLOTS {
        0 => Vec2::new(cx, cy),
        1 => Vec2::new(cx - dx, cy - dy),
        2 => Vec2::new(cx - dx, cy + dy),
        3 => Vec2::new(cx + dx, cy - dy),
        _ => Vec2::new(cx + dx, cy + dy),
    }
}

/// How a round ended, for the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub mode: ModeKind,
    pub score: i64,
    pub best: i64,
    /// Beat the best score persisted before the round
    pub new_best: bool,
}

#[derive(Debug, Clone)]
pub struct ModeController {
    kind: ModeKind,
    ledger: ScoreLedger,
    timers: Timers<ModeTimer>,
    /// Best score persisted before this round
    previous_best: i64,
    /// False once the round is lost or the clock ran out
    active: bool,
    paused: bool,
    /// Result screen is due
    finished: bool,
    power_up: Option<PowerUpKind>,
    /// Explosion flash overlay alpha
    flash: u8,
    popup_slot: usize,
}

impl ModeController {
    /// Start a round. `best` is the best persisted score for the mode.
    pub fn new(kind: ModeKind, stage: &mut Stage, best: i64) -> Self {
        let mut mode = Self {
            kind,
            ledger: ScoreLedger::new(best),
            timers: Timers::new(),
            previous_best: best,
            active: true,
            paused: false,
            finished: false,
            power_up: None,
            flash: 0,
            popup_slot: 0,
        };
        mode.reload(stage, best);
        mode
    }

    /// Reset every piece of round state and arm the opening timers
    pub fn reload(&mut self, stage: &mut Stage, best: i64) {
        stage.reset_playfield();
        self.ledger = ScoreLedger::new(best);
        self.previous_best = best;
        self.active = true;
        self.paused = false;
        self.finished = false;
        self.power_up = None;
        self.flash = 0;
        self.popup_slot = 0;

        let tuning = &stage.tuning;
        self.timers.clear();
        self.timers
            .arm(ModeTimer::SpawnFruit, tuning.fruit_interval.sample(&mut stage.rng));
        self.timers.arm(
            ModeTimer::SpawnHazard,
            tuning.hazard_first_interval.sample(&mut stage.rng),
        );
        self.timers
            .arm_recurring(ModeTimer::SessionCycle, tuning.session_cycle);
        self.timers
            .arm_recurring(ModeTimer::CriticalWindow, tuning.critical_window);
        if self.kind == ModeKind::Arcade {
            self.timers.arm(ModeTimer::ModeEnd, tuning.arcade_duration);
        }
        if self.kind.has_power_ups() {
            self.timers.arm(
                ModeTimer::SpawnPowerUp,
                tuning.power_up_interval.sample(&mut stage.rng),
            );
        }

        if stage.pointer_down {
            stage.swipe.begin_session();
        }
        stage.events.play(Cue::GameStart);
        log::info!("{} round started (best {})", self.kind.name(), best);
    }

    pub fn handle_input(&mut self, event: &InputEvent, stage: &mut Stage) {
        match *event {
            InputEvent::KeyDown(key) if key.is_pause() => self.toggle_pause(stage),
            InputEvent::KeyDown(key) if key.is_quit() && self.paused => {
                log::info!("{} round quit at {}", self.kind.name(), self.ledger.score());
                self.finished = true;
            }
            _ if self.paused => {}
            InputEvent::PointerDown => stage.swipe.begin_session(),
            InputEvent::PointerUp => {
                if let Some(award) = stage.swipe.end_session() {
                    self.apply_combo(award, stage);
                }
            }
            InputEvent::PointerMove(pos) => {
                stage.swipe.add_position(pos);
                let report = stage.swipe.test_cut(
                    &mut stage.world,
                    &stage.ctx,
                    &mut stage.rng,
                    &mut stage.events,
                );
                self.on_cuts(&report, stage);
            }
            _ => {}
        }
    }

    /// Advance one frame. Returns the next screen once the round is over.
    pub fn tick(&mut self, stage: &mut Stage, dt: f32) -> Option<ScreenKind> {
        if self.finished {
            return Some(ScreenKind::EndTable);
        }
        if self.paused {
            return None;
        }

        self.flash = self.flash.saturating_sub(FLASH_DECAY);
        stage.world.step(&stage.ctx);
        let missed = stage.world.sweep_out_of_bounds(&mut stage.events);
        for _ in 0..missed {
            self.lose_life(stage);
        }

        self.timers.advance(dt);
        while let Some(timer) = self.timers.pop_due() {
            self.fire(timer, stage);
        }

        self.finished.then_some(ScreenKind::EndTable)
    }

    /// Tear down before another screen takes over
    pub fn leave(&mut self, stage: &mut Stage) {
        self.end_power_up(stage);
        self.timers.clear();
        stage.reset_playfield();
    }

    fn fire(&mut self, timer: ModeTimer, stage: &mut Stage) {
        match timer {
            ModeTimer::SpawnFruit => {
                let interval = if self.power_up == Some(PowerUpKind::Blitz) {
                    stage.tuning.blitz_fruit_interval
                } else {
                    stage.tuning.fruit_interval
                };
                self.timers
                    .arm(ModeTimer::SpawnFruit, interval.sample(&mut stage.rng));
                self.spawn_fruit(stage);
            }
            ModeTimer::SpawnHazard => {
                self.timers.arm(
                    ModeTimer::SpawnHazard,
                    stage.tuning.hazard_interval.sample(&mut stage.rng),
                );
                let count = stage
                    .rng
                    .random_range(0..=self.kind.max_hazards(&stage.tuning));
                for _ in 0..count {
                    self.spawn(Category::Hazard, stage);
                }
            }
            ModeTimer::SpawnPowerUp => {
                self.timers.arm(
                    ModeTimer::SpawnPowerUp,
                    stage.tuning.power_up_interval.sample(&mut stage.rng),
                );
                if self.power_up.is_none() {
                    let kind = PowerUpKind::random(&mut stage.rng);
                    self.spawn(Category::PowerUp(kind), stage);
                }
            }
            ModeTimer::PowerUpExpiry => {
                self.end_power_up(stage);
                if self.active && self.kind.has_power_ups() {
                    self.timers.arm(
                        ModeTimer::SpawnPowerUp,
                        stage.tuning.power_up_interval.sample(&mut stage.rng),
                    );
                }
            }
            ModeTimer::ModeEnd => {
                log::info!("{} clock ran out", self.kind.name());
                self.game_over(stage);
            }
            ModeTimer::SessionCycle => {
                if let Some(award) = stage.swipe.end_session() {
                    self.apply_combo(award, stage);
                }
                if stage.pointer_down {
                    stage.swipe.begin_session();
                }
            }
            ModeTimer::CriticalWindow => {
                if let Some(bonus) = self
                    .ledger
                    .evaluate_critical(stage.tuning.critical_threshold)
                {
                    let over = (bonus / 2) as u32 - stage.tuning.critical_threshold;
                    let tier = over.clamp(1, MAX_COMBO_TIER) as u8;
                    let applied = self.ledger.add(bonus);
                    let pos = self.next_centered();
                    stage.world.push_effect(Effect::popup("Critical", applied, pos));
                    stage.events.play(Cue::Critical(tier));
                    log::debug!("critical +{}", applied);
                }
            }
            ModeTimer::EndScreen => {
                self.finished = true;
            }
        }
    }

    fn spawn(&mut self, category: Category, stage: &mut Stage) {
        stage.world.spawn_thrown(
            category,
            &stage.ctx,
            &stage.tuning,
            &mut stage.rng,
            &mut stage.events,
        );
    }

    fn spawn_fruit(&mut self, stage: &mut Stage) {
        let count = stage
            .rng
            .random_range(0..=stage.tuning.max_fruit_per_throw);
        for _ in 0..count {
            let kind = FruitKind::random(&mut stage.rng);
            let category = if stage.ctx.slow_motion {
                Category::Chilled(kind)
            } else {
                Category::Fruit(kind)
            };
            self.spawn(category, stage);
        }
    }

    fn on_cuts(&mut self, report: &CutReport, stage: &mut Stage) {
        for cut in &report.cuts {
            self.ledger.record_cut(cut.category.is_hazard());
            match cut.category {
                Category::PowerUp(kind) => self.start_power_up(kind, stage),
                category => {
                    let applied = self.ledger.add(category.capabilities().score);
                    stage
                        .world
                        .push_effect(Effect::popup(category.label(), applied, cut.center));
                }
            }
        }
        if report.hazard {
            self.explode(stage);
        }
    }

    fn apply_combo(&mut self, award: ComboAward, stage: &mut Stage) {
        let applied = self.ledger.add(award.bonus);
        let pos = self.next_centered();
        stage.world.push_effect(Effect::popup(&award.text(), applied, pos));
        stage.events.play(Cue::Combo(award.tier));
        log::debug!("combo of {} fruits +{}", award.fruits(), applied);
    }

    /// A hazard was cut
    fn explode(&mut self, stage: &mut Stage) {
        stage.world.clear(&mut stage.events);
        self.flash = FLASH_START;
        self.ledger.reset_critical();
        // Blitz keeps its own fruit cadence and has no hazards to delay
        if self.active && self.power_up != Some(PowerUpKind::Blitz) {
            let tuning = &stage.tuning;
            self.timers.arm(
                ModeTimer::SpawnFruit,
                tuning.cooldown_fruit_interval.sample(&mut stage.rng),
            );
            self.timers.arm(
                ModeTimer::SpawnHazard,
                tuning.cooldown_hazard_interval.sample(&mut stage.rng),
            );
        }
        log::debug!("hazard exploded");
        if self.kind.max_lives().is_some() {
            self.lose_life(stage);
        }
    }

    /// A fruit got away or a hazard went off (Classic)
    fn lose_life(&mut self, stage: &mut Stage) {
        if !self.active {
            return;
        }
        let lost = self.ledger.record_miss();
        let Some(lives) = self.kind.max_lives() else {
            return;
        };
        stage.events.play(Cue::LoseLife);
        log::debug!("life lost ({}/{})", lost, lives);
        if lost > lives {
            self.game_over(stage);
        }
    }

    /// Stop the round; the result screen follows after a short delay
    fn game_over(&mut self, stage: &mut Stage) {
        if !self.active {
            return;
        }
        self.active = false;
        self.end_power_up(stage);
        stage.world.clear(&mut stage.events);
        for timer in [
            ModeTimer::SpawnFruit,
            ModeTimer::SpawnHazard,
            ModeTimer::SpawnPowerUp,
            ModeTimer::PowerUpExpiry,
            ModeTimer::ModeEnd,
        ] {
            self.timers.disarm(timer);
        }
        self.timers
            .arm(ModeTimer::EndScreen, stage.tuning.game_over_delay);
        log::info!(
            "{} round over: score {}",
            self.kind.name(),
            self.ledger.score()
        );
    }

    fn start_power_up(&mut self, kind: PowerUpKind, stage: &mut Stage) {
        if !self.active {
            return;
        }
        // A second pickup cut mid-effect replaces the running one
        self.end_power_up(stage);
        self.power_up = Some(kind);
        stage.events.play(Cue::PowerUpStart(kind));
        self.timers.disarm(ModeTimer::SpawnPowerUp);

        let tuning = &stage.tuning;
        let duration = match kind {
            PowerUpKind::Freeze => {
                stage.ctx.slow_motion = true;
                tuning.freeze_duration
            }
            PowerUpKind::Blitz => {
                stage.events.play_looping(Cue::BlitzLoop);
                self.timers.disarm(ModeTimer::SpawnHazard);
                self.timers.arm(
                    ModeTimer::SpawnFruit,
                    tuning.blitz_fruit_interval.sample(&mut stage.rng),
                );
                tuning.blitz_duration
            }
            PowerUpKind::Double => {
                self.ledger.set_double(true);
                tuning.double_duration
            }
        };
        self.timers.arm(ModeTimer::PowerUpExpiry, duration);
        log::info!("{} started for {}s", kind.name(), duration);
    }

    /// Undo the running power-up, if any
    fn end_power_up(&mut self, stage: &mut Stage) {
        let Some(kind) = self.power_up.take() else {
            return;
        };
        self.timers.disarm(ModeTimer::PowerUpExpiry);
        match kind {
            PowerUpKind::Freeze => stage.ctx.slow_motion = false,
            PowerUpKind::Blitz => {
                stage.events.stop(Cue::BlitzLoop);
                if self.active {
                    let tuning = &stage.tuning;
                    self.timers.arm(
                        ModeTimer::SpawnFruit,
                        tuning.fruit_interval.sample(&mut stage.rng),
                    );
                    self.timers.arm(
                        ModeTimer::SpawnHazard,
                        tuning.hazard_interval.sample(&mut stage.rng),
                    );
                }
            }
            PowerUpKind::Double => self.ledger.set_double(false),
        }
        stage.events.play(Cue::PowerUpEnd(kind));
        log::info!("{} ended", kind.name());
    }

    fn toggle_pause(&mut self, stage: &mut Stage) {
        if self.paused {
            self.paused = false;
            if stage.pointer_down {
                stage.swipe.begin_session();
            }
            log::info!("resumed");
        } else {
            self.paused = true;
            if let Some(award) = stage.swipe.end_session() {
                self.apply_combo(award, stage);
            }
            log::info!("paused");
        }
    }

    fn next_centered(&mut self) -> Vec2 {
        let pos = centered_position(self.popup_slot);
        self.popup_slot = (self.popup_slot + 1) % CENTERED_SLOTS;
        pos
    }

    pub fn summary(&self) -> RoundSummary {
        let score = self.ledger.score();
        RoundSummary {
            mode: self.kind,
            score,
            best: self.ledger.best(),
            new_best: score > self.previous_best,
        }
    }

    #[inline]
    pub fn kind(&self) -> ModeKind {
        self.kind
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn power_up(&self) -> Option<PowerUpKind> {
        self.power_up
    }

    /// Explosion flash alpha (0 when none)
    pub fn flash(&self) -> u8 {
        self.flash
    }

    /// Lives left, for modes that have them
    pub fn lives_left(&self) -> Option<u32> {
        self.kind
            .max_lives()
            .map(|lives| lives.saturating_sub(self.ledger.misses()))
    }

    /// Seconds left on the Arcade clock
    pub fn time_left(&self) -> Option<f32> {
        self.timers.remaining(ModeTimer::ModeEnd)
    }

    pub fn timers(&self) -> &Timers<ModeTimer> {
        &self.timers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCommand;
    use crate::consts::SIM_DT;
    use crate::platform::Key;
    use crate::tuning::{Span, Tuning};

    fn stage() -> Stage {
        Stage::new(11, Tuning::default())
    }

    fn cues(stage: &Stage, cue: Cue) -> usize {
        stage
            .events
            .audio()
            .filter(|c| *c == AudioCommand::Play(cue))
            .count()
    }

    fn run(mode: &mut ModeController, stage: &mut Stage, seconds: f32) {
        let ticks = (seconds / SIM_DT).ceil() as usize;
        for _ in 0..ticks {
            mode.tick(stage, SIM_DT);
        }
    }

    /// Swipe onto a spot in one pointer sample
    fn slash(mode: &mut ModeController, stage: &mut Stage, at: Vec2) {
        mode.handle_input(&InputEvent::PointerDown, stage);
        mode.handle_input(&InputEvent::PointerMove(at - Vec2::splat(5.0)), stage);
    }

    #[test]
    fn test_reload_arms_timers() {
        let mut stage = stage();
        let classic = ModeController::new(ModeKind::Classic, &mut stage, 40);
        assert!(classic.timers().is_armed(ModeTimer::SpawnFruit));
        assert!(classic.timers().is_armed(ModeTimer::SpawnHazard));
        assert!(!classic.timers().is_armed(ModeTimer::ModeEnd));
        assert_eq!(classic.ledger().best(), 40);
        assert_eq!(classic.lives_left(), Some(3));
        assert_eq!(cues(&stage, Cue::GameStart), 1);

        let arcade = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        assert!(arcade.timers().is_armed(ModeTimer::SpawnPowerUp));
        assert_eq!(arcade.time_left(), Some(60.0));
        let hazard = arcade.timers().remaining(ModeTimer::SpawnHazard).unwrap();
        assert!((10.0..15.0).contains(&hazard));
    }

    #[test]
    fn test_fourth_miss_ends_classic_once() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        for _ in 0..3 {
            mode.lose_life(&mut stage);
        }
        assert!(mode.is_active());
        assert_eq!(mode.lives_left(), Some(0));

        mode.lose_life(&mut stage);
        assert!(!mode.is_active());
        assert!(mode.timers().is_armed(ModeTimer::EndScreen));
        assert!(!mode.timers().is_armed(ModeTimer::SpawnFruit));

        mode.lose_life(&mut stage);
        assert_eq!(mode.ledger().misses(), 4);
        assert_eq!(cues(&stage, Cue::LoseLife), 4);

        run(&mut mode, &mut stage, 1.9);
        assert!(!mode.is_finished());
        assert_eq!(mode.tick(&mut stage, 0.2), Some(ScreenKind::EndTable));
    }

    #[test]
    fn test_missed_fruit_costs_a_life() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        stage.world.place(
            Category::Fruit(FruitKind::Lime),
            Vec2::new(500.0, HEIGHT + 200.0),
            &mut stage.rng,
        );
        let fruit = stage.world.projectiles.last_mut().unwrap();
        fruit.body.personal_gravity = None;
        mode.tick(&mut stage, SIM_DT);
        assert_eq!(mode.ledger().misses(), 1);
        assert_eq!(mode.lives_left(), Some(2));
        assert_eq!(cues(&stage, Cue::LoseLife), 1);
    }

    #[test]
    fn test_cutting_a_hazard_explodes() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        let at = Vec2::new(600.0, 300.0);
        stage.world.place(Category::Hazard, at, &mut stage.rng);
        stage.world.place(
            Category::Fruit(FruitKind::Banana),
            Vec2::new(100.0, 100.0),
            &mut stage.rng,
        );
        mode.ledger.record_cut(false);

        slash(&mut mode, &mut stage, at);
        assert!(stage.world.projectiles.is_empty());
        assert_eq!(mode.flash(), FLASH_START);
        assert_eq!(mode.ledger().score(), -10);
        assert_eq!(mode.ledger().critical(), 0);
        assert_eq!(mode.lives_left(), Some(2));
        let fruit = mode.timers().remaining(ModeTimer::SpawnFruit).unwrap();
        assert!((3.0..4.0).contains(&fruit));
        let hazard = mode.timers().remaining(ModeTimer::SpawnHazard).unwrap();
        assert!((5.0..10.0).contains(&hazard));

        mode.tick(&mut stage, SIM_DT);
        assert_eq!(mode.flash(), FLASH_START - FLASH_DECAY);
    }

    #[test]
    fn test_arcade_hazard_costs_no_life() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        let at = Vec2::new(600.0, 300.0);
        stage.world.place(Category::Hazard, at, &mut stage.rng);
        slash(&mut mode, &mut stage, at);
        assert_eq!(mode.ledger().misses(), 0);
        assert_eq!(mode.ledger().score(), -10);
        assert_eq!(mode.lives_left(), None);
    }

    #[test]
    fn test_critical_window_awards_bonus() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        for _ in 0..5 {
            mode.ledger.record_cut(false);
        }
        run(&mut mode, &mut stage, 1.01);
        assert_eq!(mode.ledger().score(), 10);
        assert_eq!(mode.ledger().critical(), 0);
        assert_eq!(cues(&stage, Cue::Critical(2)), 1);

        for _ in 0..20 {
            mode.ledger.record_cut(false);
        }
        run(&mut mode, &mut stage, 1.0);
        assert_eq!(mode.ledger().score(), 50);
        assert_eq!(cues(&stage, Cue::Critical(MAX_COMBO_TIER as u8)), 1);
    }

    #[test]
    fn test_zero_spawn_interval_still_returns() {
        let tuning = Tuning {
            fruit_interval: Span::new(0.0, 0.0),
            max_fruit_per_throw: 1,
            ..Tuning::default()
        };
        let mut stage = Stage::new(11, tuning);
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        for _ in 0..10 {
            assert_eq!(mode.tick(&mut stage, SIM_DT), None);
        }
        assert!(stage.world.projectiles.len() <= 10);
        assert!(mode.timers().is_armed(ModeTimer::SpawnFruit));
    }

    #[test]
    fn test_bomb_during_blitz_keeps_fruit_cadence() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        mode.start_power_up(PowerUpKind::Blitz, &mut stage);
        let at = Vec2::new(600.0, 300.0);
        stage.world.place(Category::Hazard, at, &mut stage.rng);
        slash(&mut mode, &mut stage, at);
        assert_eq!(mode.flash(), FLASH_START);
        let fruit = mode.timers().remaining(ModeTimer::SpawnFruit).unwrap();
        assert!(fruit < 0.25);
        assert!(!mode.timers().is_armed(ModeTimer::SpawnHazard));
    }

    #[test]
    fn test_straight_slash_combo_on_release() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        let spots = [200.0, 400.0, 600.0, 800.0].map(|x| Vec2::new(x, 300.0));
        for spot in spots {
            stage.world.place(Category::Fruit(FruitKind::Lime), spot, &mut stage.rng);
        }
        mode.handle_input(&InputEvent::PointerDown, &mut stage);
        for spot in spots {
            mode.handle_input(&InputEvent::PointerMove(spot - Vec2::splat(5.0)), &mut stage);
        }
        assert_eq!(mode.ledger().score(), 20);
        mode.handle_input(&InputEvent::PointerUp, &mut stage);
        // Four collinear cuts: run of 2, bonus 4
        assert_eq!(mode.ledger().score(), 24);
        assert_eq!(cues(&stage, Cue::Combo(2)), 1);
    }

    #[test]
    fn test_session_cycle_restarts_held_swipe() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        stage.pointer_down = true;
        mode.handle_input(&InputEvent::PointerDown, &mut stage);
        mode.handle_input(&InputEvent::PointerMove(Vec2::new(10.0, 10.0)), &mut stage);
        assert_eq!(stage.swipe.track().len(), 1);
        run(&mut mode, &mut stage, 1.01);
        assert!(stage.swipe.is_active());
        assert!(stage.swipe.track().is_empty());
    }

    #[test]
    fn test_pause_freezes_round() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        mode.handle_input(&InputEvent::KeyDown(Key::Char('p')), &mut stage);
        assert!(mode.is_paused());
        run(&mut mode, &mut stage, 5.0);
        assert_eq!(mode.time_left(), Some(60.0));
        assert!(stage.world.projectiles.is_empty());

        mode.handle_input(&InputEvent::KeyDown(Key::Escape), &mut stage);
        assert!(!mode.is_paused());
        run(&mut mode, &mut stage, 1.0);
        assert!(mode.time_left().unwrap() < 60.0);
    }

    #[test]
    fn test_quit_only_while_paused() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Classic, &mut stage, 0);
        mode.handle_input(&InputEvent::KeyDown(Key::Char('q')), &mut stage);
        assert!(!mode.is_finished());
        mode.handle_input(&InputEvent::KeyDown(Key::Escape), &mut stage);
        mode.handle_input(&InputEvent::KeyDown(Key::Char('q')), &mut stage);
        assert_eq!(mode.tick(&mut stage, SIM_DT), Some(ScreenKind::EndTable));
    }

    #[test]
    fn test_arcade_clock_ends_round() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        run(&mut mode, &mut stage, 59.5);
        assert!(mode.is_active());
        run(&mut mode, &mut stage, 1.0);
        assert!(!mode.is_active());
        run(&mut mode, &mut stage, 2.1);
        assert!(mode.is_finished());
    }

    #[test]
    fn test_freeze_power_up_window() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        let at = Vec2::new(640.0, 360.0);
        stage
            .world
            .place(Category::PowerUp(PowerUpKind::Freeze), at, &mut stage.rng);
        slash(&mut mode, &mut stage, at);
        assert_eq!(mode.power_up(), Some(PowerUpKind::Freeze));
        assert!(stage.ctx.slow_motion);
        assert!(!mode.timers().is_armed(ModeTimer::SpawnPowerUp));
        assert_eq!(cues(&stage, Cue::PowerUpStart(PowerUpKind::Freeze)), 1);

        run(&mut mode, &mut stage, 5.1);
        assert_eq!(mode.power_up(), None);
        assert!(!stage.ctx.slow_motion);
        assert!(mode.timers().is_armed(ModeTimer::SpawnPowerUp));
        assert_eq!(cues(&stage, Cue::PowerUpEnd(PowerUpKind::Freeze)), 1);
    }

    #[test]
    fn test_blitz_suppresses_hazards() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        mode.start_power_up(PowerUpKind::Blitz, &mut stage);
        assert!(!mode.timers().is_armed(ModeTimer::SpawnHazard));
        let fruit = mode.timers().remaining(ModeTimer::SpawnFruit).unwrap();
        assert!(fruit < 0.25);
        assert!(
            stage
                .events
                .audio()
                .any(|c| c == AudioCommand::PlayLooping(Cue::BlitzLoop))
        );

        run(&mut mode, &mut stage, 4.1);
        assert!(mode.timers().is_armed(ModeTimer::SpawnHazard));
        assert!(
            stage
                .events
                .audio()
                .any(|c| c == AudioCommand::Stop(Cue::BlitzLoop))
        );
    }

    #[test]
    fn test_double_score_popup() {
        let mut stage = stage();
        let mut mode = ModeController::new(ModeKind::Arcade, &mut stage, 0);
        mode.start_power_up(PowerUpKind::Double, &mut stage);
        let at = Vec2::new(300.0, 300.0);
        stage
            .world
            .place(Category::Fruit(FruitKind::Orange), at, &mut stage.rng);
        slash(&mut mode, &mut stage, at);
        assert_eq!(mode.ledger().score(), 10);
    }

    #[test]
    fn test_centered_positions_cycle() {
        assert_eq!(centered_position(0), Vec2::new(640.0, 360.0));
        assert_eq!(centered_position(5), centered_position(0));
        assert_eq!(centered_position(4), Vec2::new(640.0 + 256.0, 360.0 + 144.0));
    }
}
