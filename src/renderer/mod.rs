//! Draw list generation
//!
//! The game does not own a graphics API. Each frame the host asks for a flat
//! list of sprites and labels in back-to-front order and draws them however
//! it likes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FPS, HEIGHT, WIDTH};
use crate::settings::Settings;
use crate::sim::{
    Category, EffectKind, FruitKind, Game, MENU_TARGETS, ModeController, PowerUpKind, Screen,
    ScreenKind, Stage,
};

/// Something the host knows how to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Asset {
    /// Full-screen backdrop for a screen
    Background(ScreenKind),
    Fruit(FruitKind),
    /// Frosted variant of a fruit sprite
    ChilledFruit(FruitKind),
    Fragment { kind: FruitKind, variant: u8 },
    Bomb,
    PowerUp(PowerUpKind),
    Splash { variant: u8 },
    /// One point of the blade trail
    Blade,
    /// Life marker; `lost` draws it crossed out
    Life { lost: bool },
    /// Result table frame
    Table,
    /// White full-screen overlay after an explosion
    Flash,
    /// Dimmed overlay while paused
    PauseOverlay,
    Text(String),
}

/// One sprite or label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub asset: Asset,
    /// Center of the sprite, or anchor of the text
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub alpha: u8,
}

impl DrawCommand {
    pub fn sprite(asset: Asset, pos: Vec2, rotation: f32) -> Self {
        Self {
            asset,
            pos,
            rotation,
            alpha: 255,
        }
    }

    pub fn text(text: impl Into<String>, pos: Vec2) -> Self {
        Self::sprite(Asset::Text(text.into()), pos, 0.0)
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }
}

fn category_asset(category: Category) -> Asset {
    match category {
        Category::Fruit(kind) => Asset::Fruit(kind),
        Category::Chilled(kind) => Asset::ChilledFruit(kind),
        Category::Hazard => Asset::Bomb,
        Category::PowerUp(kind) => Asset::PowerUp(kind),
    }
}

/// Everything to draw this frame, back to front
pub fn draw_list(game: &Game, settings: &Settings) -> Vec<DrawCommand> {
    let center = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
    let mut list = vec![DrawCommand::sprite(
        Asset::Background(game.screen_kind()),
        center,
        0.0,
    )];
    let stage = game.stage();

    match game.screen() {
        Screen::Loading(_) => list.push(DrawCommand::text("Loading", center)),
        Screen::MainMenu(_) => {
            list.push(DrawCommand::text("Fruit", Vec2::new(center.x - 100.0, HEIGHT / 10.0)));
            list.push(DrawCommand::text("Mania", Vec2::new(center.x + 100.0, HEIGHT / 10.0)));
            for target in &MENU_TARGETS {
                let below = target.pos + Vec2::new(0.0, target.category.size().y * 0.75);
                list.push(DrawCommand::text(target.caption, below));
            }
            draw_world(&mut list, stage, settings);
            draw_blade(&mut list, stage, settings);
        }
        Screen::Playing(mode) => {
            draw_world(&mut list, stage, settings);
            draw_blade(&mut list, stage, settings);
            draw_hud(&mut list, mode);
            if mode.flash() > 0 && settings.effective_flash() {
                list.push(DrawCommand::sprite(Asset::Flash, center, 0.0).with_alpha(mode.flash()));
            }
            if mode.is_paused() {
                list.push(DrawCommand::sprite(Asset::PauseOverlay, center, 0.0).with_alpha(160));
                list.push(DrawCommand::text("Paused", center));
                list.push(DrawCommand::text(
                    "Press P to resume or Q to quit",
                    center + Vec2::new(0.0, 50.0),
                ));
            }
        }
        Screen::EndTable(table) => {
            list.push(DrawCommand::sprite(Asset::Table, center, 0.0));
            let top = center.y - HEIGHT / 8.0;
            for (i, line) in table.lines().into_iter().enumerate() {
                list.push(DrawCommand::text(line, Vec2::new(center.x, top + 45.0 * i as f32)));
            }
        }
        Screen::Quit => {}
    }
    if settings.show_fps {
        // Fixed step, so the simulation rate is the frame rate
        list.push(DrawCommand::text(
            format!("FPS: {}", FPS),
            Vec2::new(WIDTH - 80.0, HEIGHT - 30.0),
        ));
    }
    list
}

fn draw_world(list: &mut Vec<DrawCommand>, stage: &Stage, settings: &Settings) {
    let world = &stage.world;
    if settings.splashes {
        for effect in &world.effects {
            if let EffectKind::Splash { variant } = effect.kind {
                list.push(
                    DrawCommand::sprite(Asset::Splash { variant }, effect.pos, 0.0)
                        .with_alpha(effect.alpha.clamp(0, 255) as u8),
                );
            }
        }
    }
    for fragment in &world.fragments {
        list.push(DrawCommand::sprite(
            Asset::Fragment {
                kind: fragment.kind,
                variant: fragment.variant,
            },
            fragment.body.pos,
            fragment.body.angle,
        ));
    }
    for projectile in world.live() {
        list.push(DrawCommand::sprite(
            category_asset(projectile.category),
            projectile.body.pos,
            projectile.body.angle,
        ));
    }
    for effect in &world.effects {
        if let EffectKind::Popup { text } = &effect.kind {
            list.push(
                DrawCommand::text(text.as_str(), effect.pos)
                    .with_alpha(effect.alpha.clamp(0, 255) as u8),
            );
        }
    }
}

fn draw_blade(list: &mut Vec<DrawCommand>, stage: &Stage, settings: &Settings) {
    if !settings.blade_trail {
        return;
    }
    let track = stage.swipe.track();
    let n = track.len().max(1) as f32;
    for (i, point) in track.iter().enumerate() {
        // Older points fade out
        let alpha = (255.0 * (i + 1) as f32 / n) as u8;
        list.push(DrawCommand::sprite(Asset::Blade, *point, 0.0).with_alpha(alpha));
    }
}

fn draw_hud(list: &mut Vec<DrawCommand>, mode: &ModeController) {
    let ledger = mode.ledger();
    list.push(DrawCommand::text(
        format!("Score: {}", ledger.score()),
        Vec2::new(20.0, 20.0),
    ));
    list.push(DrawCommand::text(
        format!("Best: {}", ledger.best()),
        Vec2::new(20.0, 60.0),
    ));
    if let (Some(left), Some(lives)) = (mode.lives_left(), mode.kind().max_lives()) {
        for i in 0..lives {
            let pos = Vec2::new(WIDTH - 60.0 - 40.0 * i as f32, 40.0 + 60.0 * i as f32);
            list.push(DrawCommand::sprite(Asset::Life { lost: i >= left }, pos, 0.0));
        }
    }
    if let Some(time) = mode.time_left() {
        list.push(DrawCommand::text(
            format!("Time: {}", time.ceil() as u32),
            Vec2::new(WIDTH / 2.0, 20.0),
        ));
    }
    if let Some(kind) = mode.power_up() {
        list.push(DrawCommand::text(kind.name(), Vec2::new(WIDTH / 2.0, 60.0)));
    }
}
