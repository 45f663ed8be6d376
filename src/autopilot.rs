//! Demo-mode player
//!
//! Produces the input a player would for the current frame: picks the mode
//! on the main menu, slashes through fruit while keeping the blade away from
//! bombs, and clicks through the result table. Used by the headless runner.

use glam::Vec2;

use crate::consts::{BLADE_SIZE, HEIGHT, WIDTH};
use crate::platform::InputEvent;
use crate::sim::{Category, Game, MENU_TARGETS, ModeKind, Screen, ScreenKind, Stage};

/// Farthest the blade travels in one frame
const BLADE_SPEED: f32 = 80.0;
/// Clearance kept between the blade and any bomb outline
const HAZARD_CLEARANCE: f32 = 40.0;
/// Where a slash starts, relative to its target
const APPROACH: Vec2 = Vec2::new(0.0, 70.0);

#[derive(Debug, Clone)]
pub struct Autopilot {
    mode: ModeKind,
    down: bool,
    /// Already clicked on the current result table
    clicked: bool,
}

impl Autopilot {
    pub fn new(mode: ModeKind) -> Self {
        Self {
            mode,
            down: false,
            clicked: false,
        }
    }

    /// Input for the next tick
    pub fn input(&mut self, game: &Game) -> Vec<InputEvent> {
        let stage = game.stage();
        match game.screen() {
            Screen::MainMenu(menu) => {
                self.clicked = false;
                if menu.chosen().is_some() {
                    return self.release();
                }
                let wanted = ScreenKind::Playing(self.mode);
                match MENU_TARGETS.iter().find(|t| t.leads_to == wanted) {
                    Some(target) => self.slash_towards(stage, target.pos),
                    None => self.release(),
                }
            }
            Screen::Playing(mode) => {
                self.clicked = false;
                if mode.is_paused() || !mode.is_active() {
                    return self.release();
                }
                match pick_target(stage) {
                    Some(target) => self.slash_towards(stage, target),
                    None => self.release(),
                }
            }
            Screen::EndTable(_) if !self.clicked => {
                self.clicked = true;
                self.down = false;
                vec![InputEvent::PointerDown, InputEvent::PointerUp]
            }
            Screen::EndTable(_) | Screen::Loading(_) | Screen::Quit => self.release(),
        }
    }

    fn release(&mut self) -> Vec<InputEvent> {
        if self.down {
            self.down = false;
            vec![InputEvent::PointerUp]
        } else {
            Vec::new()
        }
    }

    /// Step the blade towards `target`, lifting it whenever the next step
    /// would come near a bomb
    fn slash_towards(&mut self, stage: &Stage, target: Vec2) -> Vec<InputEvent> {
        let half = Vec2::splat(BLADE_SIZE / 2.0);
        if !self.down {
            let start = target + APPROACH;
            if !is_safe(stage, start) {
                return Vec::new();
            }
            self.down = true;
            return vec![InputEvent::PointerMove(start - half), InputEvent::PointerDown];
        }

        let blade = stage.swipe.blade_center();
        let offset = target - blade;
        let step = if offset.length() <= BLADE_SPEED {
            // Carry on past the target so the slash stays straight
            target + offset.normalize_or_zero() * BLADE_SIZE
        } else {
            blade + offset.normalize_or_zero() * BLADE_SPEED
        };
        if !is_safe(stage, step) {
            return self.release();
        }
        vec![InputEvent::PointerMove(step - half)]
    }
}

/// Lowest fruit or pickup on screen that is not next to a bomb
fn pick_target(stage: &Stage) -> Option<Vec2> {
    stage
        .world
        .live()
        .filter(|p| !matches!(p.category, Category::Hazard))
        .map(|p| p.body.pos)
        .filter(|pos| pos.y < HEIGHT - 20.0 && pos.y > 20.0 && pos.x > 0.0 && pos.x < WIDTH)
        .filter(|pos| is_safe(stage, *pos))
        .max_by(|a, b| a.y.total_cmp(&b.y))
}

fn is_safe(stage: &Stage, point: Vec2) -> bool {
    stage
        .world
        .live()
        .filter(|p| p.category.is_hazard())
        .all(|p| p.mask().distance(point) > HAZARD_CLEARANCE)
}
