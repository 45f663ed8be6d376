//! Fixed timestep game loop
//!
//! `Game` owns the current screen and the shared stage. The host calls
//! `tick` once per fixed step with that step's input events, then drains the
//! events the step produced.

use super::menu::{EndTable, Loading, MainMenu};
use super::mode::{ModeController, RoundSummary};
use super::state::{GameEvent, ModeKind, ScreenKind, Stage};
use crate::persistence::{ScoreStore, StoreError};
use crate::platform::{InputEvent, coalesce};
use crate::tuning::Tuning;

/// The screen currently running
#[derive(Debug, Clone)]
pub enum Screen {
    Loading(Loading),
    MainMenu(MainMenu),
    Playing(ModeController),
    EndTable(EndTable),
    Quit,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Loading(_) => ScreenKind::Loading,
            Screen::MainMenu(_) => ScreenKind::MainMenu,
            Screen::Playing(mode) => ScreenKind::Playing(mode.kind()),
            Screen::EndTable(_) => ScreenKind::EndTable,
            Screen::Quit => ScreenKind::Quit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    screen: Screen,
    stage: Stage,
    seed: u64,
    /// Ticks run so far
    time_ticks: u64,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!("new game, seed {}", seed);
        Self {
            screen: Screen::Loading(Loading::default()),
            stage: Stage::new(seed, tuning),
            seed,
            time_ticks: 0,
        }
    }

    /// Advance one fixed step.
    ///
    /// Input is coalesced and handled in order before the screen ticks.
    /// Only score store failures are errors.
    pub fn tick(
        &mut self,
        input: &[InputEvent],
        dt: f32,
        store: &mut dyn ScoreStore,
    ) -> Result<(), StoreError> {
        if self.should_quit() {
            return Ok(());
        }
        self.time_ticks += 1;

        for event in coalesce(input) {
            match event {
                InputEvent::Quit => {
                    log::info!("quit requested");
                    return self.enter(ScreenKind::Quit, store);
                }
                InputEvent::PointerDown => self.stage.pointer_down = true,
                InputEvent::PointerUp => self.stage.pointer_down = false,
                _ => {}
            }
            match &mut self.screen {
                Screen::MainMenu(menu) => menu.handle_input(&event, &mut self.stage),
                Screen::Playing(mode) => mode.handle_input(&event, &mut self.stage),
                Screen::EndTable(table) => table.handle_input(&event, &self.stage.tuning),
                Screen::Loading(_) | Screen::Quit => {
                    if let InputEvent::PointerMove(pos) = event {
                        self.stage.swipe.add_position(pos);
                    }
                }
            }
        }

        let next = match &mut self.screen {
            Screen::Loading(loading) => loading.tick(&self.stage.tuning, dt),
            Screen::MainMenu(menu) => menu.tick(&mut self.stage, dt),
            Screen::Playing(mode) => mode.tick(&mut self.stage, dt),
            Screen::EndTable(table) => table.tick(dt),
            Screen::Quit => None,
        };
        match next {
            Some(kind) => self.enter(kind, store),
            None => Ok(()),
        }
    }

    /// Skip the menu and start a round directly
    pub fn start_mode(&mut self, mode: ModeKind, store: &mut dyn ScoreStore) -> Result<(), StoreError> {
        self.enter(ScreenKind::Playing(mode), store)
    }

    /// Leave the current screen and set up `next`.
    ///
    /// Leaving a round appends its score to the store.
    fn enter(&mut self, next: ScreenKind, store: &mut dyn ScoreStore) -> Result<(), StoreError> {
        let previous = std::mem::replace(&mut self.screen, Screen::Quit);
        let mut summary = None;
        match previous {
            Screen::MainMenu(mut menu) => menu.leave(&mut self.stage),
            Screen::Playing(mut mode) => {
                let round = mode.summary();
                mode.leave(&mut self.stage);
                store.add_score(round.score, round.mode)?;
                self.stage.events.push(GameEvent::ScoreSaved {
                    mode: round.mode,
                    score: round.score,
                });
                summary = Some(round);
            }
            Screen::Loading(_) | Screen::EndTable(_) | Screen::Quit => {}
        }

        self.screen = match next {
            ScreenKind::Loading => Screen::Loading(Loading::default()),
            ScreenKind::MainMenu => Screen::MainMenu(MainMenu::enter(&mut self.stage)),
            ScreenKind::Playing(kind) => {
                let best = store.best_score(kind)?;
                Screen::Playing(ModeController::new(kind, &mut self.stage, best))
            }
            ScreenKind::EndTable => {
                let summary = summary.unwrap_or(RoundSummary {
                    mode: ModeKind::Classic,
                    score: 0,
                    best: 0,
                    new_best: false,
                });
                Screen::EndTable(EndTable::enter(summary, &mut self.stage))
            }
            ScreenKind::Quit => {
                self.stage.reset_playfield();
                Screen::Quit
            }
        };
        log::info!("screen -> {:?}", next);
        self.stage.events.push(GameEvent::ScreenChanged(next));
        Ok(())
    }

    /// Events produced since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.stage.events.drain()
    }

    pub fn should_quit(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The running round, if any
    pub fn mode(&self) -> Option<&ModeController> {
        match &self.screen {
            Screen::Playing(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, Cue};
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryStore;
    use crate::platform::Key;
    use glam::Vec2;

    fn run(game: &mut Game, store: &mut MemoryStore, seconds: f32) {
        let ticks = (seconds / SIM_DT).ceil() as usize;
        for _ in 0..ticks {
            game.tick(&[], SIM_DT, store).unwrap();
        }
    }

    fn menu_game(store: &mut MemoryStore) -> Game {
        let mut game = Game::new(12345, Tuning::default());
        run(&mut game, store, 2.05);
        assert_eq!(game.screen_kind(), ScreenKind::MainMenu);
        game
    }

    #[test]
    fn test_loading_then_menu() {
        let mut store = MemoryStore::new();
        let mut game = Game::new(1, Tuning::default());
        assert_eq!(game.screen_kind(), ScreenKind::Loading);
        run(&mut game, &mut store, 1.9);
        assert_eq!(game.screen_kind(), ScreenKind::Loading);
        run(&mut game, &mut store, 0.2);
        assert_eq!(game.screen_kind(), ScreenKind::MainMenu);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ScreenChanged(ScreenKind::MainMenu)));
        assert!(events.contains(&GameEvent::Audio(AudioCommand::PlayLooping(Cue::MenuMusic))));
    }

    #[test]
    fn test_menu_apple_starts_classic() {
        let mut store = MemoryStore::new();
        store.add_score(70, ModeKind::Classic).unwrap();
        let mut game = menu_game(&mut store);
        let input = [
            InputEvent::PointerDown,
            InputEvent::PointerMove(Vec2::new(100.0, 100.0)),
            InputEvent::PointerMove(Vec2::new(195.0, 195.0)),
        ];
        game.tick(&input, SIM_DT, &mut store).unwrap();
        run(&mut game, &mut store, 1.6);
        assert_eq!(game.screen_kind(), ScreenKind::Playing(ModeKind::Classic));
        assert_eq!(game.mode().map(|m| m.ledger().best()), Some(70));
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Audio(AudioCommand::Stop(Cue::MenuMusic))));
        assert!(events.contains(&GameEvent::Audio(AudioCommand::Play(Cue::GameStart))));
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut store = MemoryStore::new();
        let mut game = Game::new(2, Tuning::default());
        game.tick(&[InputEvent::Quit], SIM_DT, &mut store).unwrap();
        assert!(game.should_quit());
        // Further ticks are inert
        game.tick(&[InputEvent::PointerDown], SIM_DT, &mut store).unwrap();
        assert!(game.should_quit());
    }

    #[test]
    fn test_quit_mid_round_saves_score() {
        let mut store = MemoryStore::new();
        let mut game = Game::new(3, Tuning::default());
        game.start_mode(ModeKind::Arcade, &mut store).unwrap();
        run(&mut game, &mut store, 1.0);
        game.tick(&[InputEvent::Quit], SIM_DT, &mut store).unwrap();
        assert!(game.should_quit());
        assert_eq!(store.table().len(), 1);
    }

    #[test]
    fn test_round_to_result_and_back() {
        let mut store = MemoryStore::new();
        let mut game = Game::new(4, Tuning::default());
        game.start_mode(ModeKind::Classic, &mut store).unwrap();
        let pause = [InputEvent::KeyDown(Key::Escape)];
        let quit = [InputEvent::KeyDown(Key::Char('q'))];
        game.tick(&pause, SIM_DT, &mut store).unwrap();
        game.tick(&quit, SIM_DT, &mut store).unwrap();
        game.tick(&[], SIM_DT, &mut store).unwrap();
        assert_eq!(game.screen_kind(), ScreenKind::EndTable);
        assert_eq!(store.table().len(), 1);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ScoreSaved {
            mode: ModeKind::Classic,
            score: 0
        }));
        assert!(events.contains(&GameEvent::Audio(AudioCommand::Play(Cue::GameOver))));

        game.tick(&[InputEvent::PointerDown], SIM_DT, &mut store).unwrap();
        run(&mut game, &mut store, 1.05);
        assert_eq!(game.screen_kind(), ScreenKind::MainMenu);
    }

    #[test]
    fn test_classic_runs_out_of_lives() {
        let mut store = MemoryStore::new();
        let mut game = Game::new(5, Tuning::default());
        game.start_mode(ModeKind::Classic, &mut store).unwrap();
        // Nobody swipes: fruit keeps falling until four lives are gone
        let mut ticks = 0;
        while game.screen_kind() != ScreenKind::EndTable && ticks < 60 * 600 {
            game.tick(&[], SIM_DT, &mut store).unwrap();
            ticks += 1;
        }
        assert_eq!(game.screen_kind(), ScreenKind::EndTable);
        assert_eq!(store.table().len(), 1);
    }

    #[test]
    fn test_store_failure_propagates() {
        let mut store = MemoryStore::unavailable();
        let mut game = Game::new(6, Tuning::default());
        assert!(matches!(
            game.start_mode(ModeKind::Classic, &mut store),
            Err(StoreError::Unavailable)
        ));
    }

    #[test]
    fn test_determinism() {
        let mut store1 = MemoryStore::new();
        let mut store2 = MemoryStore::new();
        let mut game1 = Game::new(99999, Tuning::default());
        let mut game2 = Game::new(99999, Tuning::default());
        game1.start_mode(ModeKind::Arcade, &mut store1).unwrap();
        game2.start_mode(ModeKind::Arcade, &mut store2).unwrap();

        for i in 0..600 {
            let sweep = [
                InputEvent::PointerDown,
                InputEvent::PointerMove(Vec2::new((i * 7 % 1280) as f32, 360.0)),
            ];
            game1.tick(&sweep, SIM_DT, &mut store1).unwrap();
            game2.tick(&sweep, SIM_DT, &mut store2).unwrap();
        }

        assert_eq!(game1.time_ticks(), game2.time_ticks());
        assert_eq!(game1.drain_events(), game2.drain_events());
        let (m1, m2) = (game1.mode().unwrap(), game2.mode().unwrap());
        assert_eq!(m1.ledger().score(), m2.ledger().score());
        assert_eq!(
            game1.stage().world.projectiles.len(),
            game2.stage().world.projectiles.len()
        );
    }
}
