//! Non-gameplay screens: loading splash, main menu and result table

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, FruitKind};
use super::mode::RoundSummary;
use super::state::{ModeKind, ScreenKind, Stage};
use super::timers::Timers;
use crate::audio::Cue;
use crate::platform::InputEvent;
use crate::tuning::Tuning;

/// Splash shown once at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loading {
    elapsed: f32,
}

impl Loading {
    pub fn tick(&mut self, tuning: &Tuning, dt: f32) -> Option<ScreenKind> {
        self.elapsed += dt;
        (self.elapsed >= tuning.loading_duration).then_some(ScreenKind::MainMenu)
    }
}

/// Something to slice on the main menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuTarget {
    pub category: Category,
    pub pos: Vec2,
    pub leads_to: ScreenKind,
    pub caption: &'static str,
}

/// The three menu targets
pub const MENU_TARGETS: [MenuTarget; 3] = [
    MenuTarget {
        category: Category::Fruit(FruitKind::RedApple),
        pos: Vec2::new(200.0, 200.0),
        leads_to: ScreenKind::Playing(ModeKind::Classic),
        caption: "Classic",
    },
    MenuTarget {
        category: Category::Fruit(FruitKind::Watermelon),
        pos: Vec2::new(1000.0, 200.0),
        leads_to: ScreenKind::Playing(ModeKind::Arcade),
        caption: "Arcade",
    },
    MenuTarget {
        category: Category::Hazard,
        pos: Vec2::new(640.0, 520.0),
        leads_to: ScreenKind::Quit,
        caption: "Quit",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuTimer {
    ScreenChange,
}

#[derive(Debug, Clone)]
pub struct MainMenu {
    /// Projectile id of each target, parallel to `MENU_TARGETS`
    ids: [u32; 3],
    timers: Timers<MenuTimer>,
    chosen: Option<ScreenKind>,
}

impl MainMenu {
    /// Set up the targets and start the menu music
    pub fn enter(stage: &mut Stage) -> Self {
        stage.reset_playfield();
        let ids = MENU_TARGETS.map(|t| stage.world.place(t.category, t.pos, &mut stage.rng));
        if stage.pointer_down {
            stage.swipe.begin_session();
        }
        stage.events.play_looping(Cue::MenuMusic);
        Self {
            ids,
            timers: Timers::new(),
            chosen: None,
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent, stage: &mut Stage) {
        match *event {
            InputEvent::PointerDown => stage.swipe.begin_session(),
            // Combos score nothing here
            InputEvent::PointerUp => {
                stage.swipe.end_session();
            }
            InputEvent::PointerMove(pos) => {
                stage.swipe.add_position(pos);
                let report = stage.swipe.test_cut(
                    &mut stage.world,
                    &stage.ctx,
                    &mut stage.rng,
                    &mut stage.events,
                );
                if self.chosen.is_some() {
                    return;
                }
                let picked = report.cuts.iter().find_map(|cut| {
                    self.ids
                        .iter()
                        .position(|id| *id == cut.id)
                        .map(|i| MENU_TARGETS[i].leads_to)
                });
                if let Some(next) = picked {
                    log::info!("menu target cut: {:?}", next);
                    self.chosen = Some(next);
                    self.timers
                        .arm(MenuTimer::ScreenChange, stage.tuning.menu_change_delay);
                }
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, stage: &mut Stage, dt: f32) -> Option<ScreenKind> {
        stage.world.step(&stage.ctx);
        stage.world.sweep_out_of_bounds(&mut stage.events);
        self.timers.advance(dt);
        let mut next = None;
        while let Some(MenuTimer::ScreenChange) = self.timers.pop_due() {
            next = self.chosen;
        }
        next
    }

    pub fn leave(&mut self, stage: &mut Stage) {
        stage.events.stop(Cue::MenuMusic);
        self.timers.clear();
        stage.reset_playfield();
    }

    /// Screen picked by the last cut, once one has been cut
    pub fn chosen(&self) -> Option<ScreenKind> {
        self.chosen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndTimer {
    BackToMenu,
}

/// Result table after a round
#[derive(Debug, Clone)]
pub struct EndTable {
    summary: RoundSummary,
    timers: Timers<EndTimer>,
}

impl EndTable {
    pub fn enter(summary: RoundSummary, stage: &mut Stage) -> Self {
        stage.events.play(Cue::GameOver);
        Self {
            summary,
            timers: Timers::new(),
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent, tuning: &Tuning) {
        if let InputEvent::PointerDown = event {
            self.timers
                .arm(EndTimer::BackToMenu, tuning.result_return_delay);
        }
    }

    pub fn tick(&mut self, dt: f32) -> Option<ScreenKind> {
        self.timers.advance(dt);
        let mut next = None;
        while let Some(EndTimer::BackToMenu) = self.timers.pop_due() {
            next = Some(ScreenKind::MainMenu);
        }
        next
    }

    pub fn summary(&self) -> &RoundSummary {
        &self.summary
    }

    /// Lines of the result table, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let s = &self.summary;
        let mut lines = vec![
            format!("Total: {}", s.score),
            format!("{} mode", s.mode.name()),
            format!("Best: {}", s.best),
        ];
        if s.new_best {
            lines.push("New best!".to_string());
        }
        lines
    }
}
