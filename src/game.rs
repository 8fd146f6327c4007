//! Core game state machine
//!
//! `Game` owns the mode (menu, playing, paused, game over) and, while a game
//! exists, the [`GameState`]. Input arrives as [`Action`]s, time arrives as
//! ticks, and everything observable leaves as [`Event`]s.

use std::collections::VecDeque;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::bag::Bag;
use crate::board::Board;
use crate::config::GameConfig;
use crate::event::{Event, EventFeed, FinalStats};
use crate::mode::{Mode, Trigger};
use crate::piece::Piece;
use crate::score::ScoreSnapshot;
use crate::snapshot::Snapshot;
use crate::state::GameState;
use crate::tetromino::{PieceKind, RotationDirection};

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDropStart,
    SoftDropStop,
    HardDrop,
    /// Rotate clockwise
    Rotate,
    RotateCounterClockwise,
    Hold,
    /// Toggles between playing and paused
    Pause,
    StartGame,
    Restart,
    Quit,
}

/// The main game struct
#[derive(Debug)]
pub struct Game {
    mode: Mode,
    /// Present from the first start until quit
    state: Option<GameState>,
    config: GameConfig,
    /// Source of per-game bag seeds
    seeds: ChaCha8Rng,
    /// Actions waiting for the next tick
    inputs: VecDeque<Action>,
    events: EventFeed,
    terminated: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    /// Create a machine sitting in the menu, with no game yet
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            mode: Mode::Menu,
            state: None,
            config,
            seeds: ChaCha8Rng::seed_from_u64(seed),
            inputs: VecDeque::new(),
            events: EventFeed::default(),
            terminated: false,
        }
    }

    /// Queue an action for the next tick
    pub fn enqueue(&mut self, action: Action) {
        if !self.terminated {
            self.inputs.push_back(action);
        }
    }

    /// Run one step: drain queued actions, advance timers, return the events
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        while let Some(action) = self.inputs.pop_front() {
            self.apply(action);
        }

        if self.mode.is_live() {
            if let Some(state) = self.state.as_mut() {
                state.advance(dt, &mut self.events);
            }
            self.check_top_out();
        }

        self.events.drain()
    }

    /// Apply one action now; its events wait for the next drain
    pub fn apply(&mut self, action: Action) {
        if self.terminated {
            trace!(?action, "ignored after quit");
            return;
        }

        match action {
            Action::Quit => {
                debug!(mode = self.mode.name(), "quit, discarding game");
                self.state = None;
                self.inputs.clear();
                self.events.clear();
                self.terminated = true;
                return;
            }
            Action::StartGame => self.transition(Trigger::Start),
            Action::Restart => self.transition(Trigger::Restart),
            Action::Pause => self.transition(Trigger::PauseToggle),
            // Releasing soft drop is always honoured so it can't stick across a pause
            Action::SoftDropStop => {
                if let Some(state) = self.state.as_mut() {
                    state.set_soft_drop(false);
                }
            }
            _ if !self.mode.is_live() => {
                trace!(?action, mode = self.mode.name(), "action not applicable");
            }
            _ => self.play(action),
        }

        self.check_top_out();
    }

    /// Gameplay actions, only reached while Playing
    fn play(&mut self, action: Action) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let events = &mut self.events;
        match action {
            Action::MoveLeft => {
                state.shift(-1, events);
            }
            Action::MoveRight => {
                state.shift(1, events);
            }
            Action::SoftDropStart => state.set_soft_drop(true),
            Action::HardDrop => state.hard_drop(events),
            Action::Rotate => {
                state.rotate(RotationDirection::Clockwise, events);
            }
            Action::RotateCounterClockwise => {
                state.rotate(RotationDirection::CounterClockwise, events);
            }
            Action::Hold => {
                if !state.hold(events) {
                    trace!("hold already used for this piece");
                }
            }
            Action::SoftDropStop
            | Action::Pause
            | Action::StartGame
            | Action::Restart
            | Action::Quit => {}
        }
    }

    fn transition(&mut self, trigger: Trigger) {
        let Some(next) = self.mode.on(trigger) else {
            trace!(?trigger, mode = self.mode.name(), "transition not legal");
            return;
        };

        debug!(from = self.mode.name(), to = next.name(), "mode change");
        self.mode = next;
        self.events.push(Event::StateChanged { mode: next });

        if matches!(trigger, Trigger::Start | Trigger::Restart) {
            let seed: u64 = self.seeds.r#gen();
            info!(seed, "new game");
            self.state = Some(GameState::new(
                Bag::with_seed(seed),
                self.config.clone(),
                &mut self.events,
            ));
        }
    }

    /// Move to GameOver if the last spawn collided
    fn check_top_out(&mut self) {
        if self.mode != Mode::Playing {
            return;
        }
        let Some(state) = &self.state else {
            return;
        };
        if !state.is_topped_out() {
            return;
        }

        let stats = state.final_stats();
        info!(score = stats.score, lines = stats.lines, "game over");
        self.transition(Trigger::TopOut);
        self.events.push(Event::GameOver { stats });
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn board(&self) -> Option<&Board> {
        self.state.as_ref().map(GameState::board)
    }

    pub fn active_piece(&self) -> Option<&Piece> {
        self.state.as_ref().and_then(GameState::current)
    }

    pub fn ghost(&self) -> Option<Piece> {
        self.state.as_ref().and_then(GameState::ghost)
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.state.as_ref().and_then(GameState::held)
    }

    pub fn can_hold(&self) -> bool {
        self.state.as_ref().is_some_and(GameState::can_hold)
    }

    pub fn preview(&self) -> Vec<PieceKind> {
        self.state
            .as_ref()
            .map(|state| state.preview().to_vec())
            .unwrap_or_default()
    }

    pub fn score(&self) -> Option<ScoreSnapshot> {
        self.state.as_ref().map(|state| state.score().snapshot())
    }

    pub fn final_stats(&self) -> Option<FinalStats> {
        self.state.as_ref().map(GameState::final_stats)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.mode, self.state.as_ref())
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_WIDTH, Cell};
    use crate::config::TICK;

    fn started(seed: u64) -> Game {
        let mut game = Game::new(GameConfig::default().with_seed(seed));
        game.apply(Action::StartGame);
        game.drain_events();
        game
    }

    fn count<F: Fn(&Event) -> bool>(events: &[Event], f: F) -> usize {
        events.iter().filter(|e| f(e)).count()
    }

    #[test]
    fn test_starts_in_menu_without_state() {
        let mut game = Game::new(GameConfig::default().with_seed(1));
        assert_eq!(game.mode(), Mode::Menu);
        assert!(game.board().is_none());
        game.apply(Action::HardDrop);
        game.apply(Action::Restart);
        assert_eq!(game.mode(), Mode::Menu);
        assert!(game.tick(TICK).is_empty());
    }

    #[test]
    fn test_start_emits_state_change_and_spawn() {
        let mut game = Game::new(GameConfig::default().with_seed(1));
        game.enqueue(Action::StartGame);
        let events = game.tick(TICK);
        assert_eq!(events[0], Event::StateChanged { mode: Mode::Playing });
        assert_eq!(count(&events, |e| matches!(e, Event::PieceSpawned { .. })), 1);
        assert_eq!(game.mode(), Mode::Playing);
        assert_eq!(game.preview().len(), 3);
    }

    #[test]
    fn test_pause_freezes_play() {
        let mut game = started(2);
        let before = *game.active_piece().expect("piece");

        game.apply(Action::Pause);
        assert_eq!(game.mode(), Mode::Paused);
        game.apply(Action::MoveLeft);
        game.apply(Action::Rotate);
        game.apply(Action::HardDrop);
        game.apply(Action::Hold);
        for _ in 0..120 {
            game.tick(TICK);
        }
        assert_eq!(*game.active_piece().expect("piece"), before);
        assert_eq!(game.score().expect("score").elapsed, Duration::ZERO);

        game.apply(Action::Pause);
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn test_hold_twice_swaps_once() {
        let mut game = started(3);
        let first = game.active_piece().expect("piece").kind;
        game.apply(Action::Hold);
        let after_first = game.active_piece().expect("piece").kind;
        game.apply(Action::Hold);
        assert_eq!(game.held(), Some(first));
        assert_eq!(game.active_piece().expect("piece").kind, after_first);
        let events = game.drain_events();
        assert_eq!(count(&events, |e| matches!(e, Event::HoldUsed { .. })), 1);
    }

    /// Fill rows 0-1 except column 0: never full, but covers every spawn cell
    fn block_spawn(game: &mut Game) {
        let state = game.state_mut().expect("state");
        for row in 0..2 {
            for col in 1..BOARD_WIDTH as i32 {
                state.board_mut().set(row, col, Cell::Filled(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_spawn_collision_ends_game_once() {
        let mut game = started(4);
        block_spawn(&mut game);

        // The active piece can't fall, so it locks in place and the next spawn collides
        game.enqueue(Action::HardDrop);
        let mut events = game.tick(TICK);
        events.extend(game.tick(TICK));

        assert_eq!(game.mode(), Mode::GameOver);
        assert_eq!(count(&events, |e| matches!(e, Event::GameOver { .. })), 1);
        assert!(events.contains(&Event::StateChanged {
            mode: Mode::GameOver
        }));
        assert!(game.active_piece().is_none());

        // Gameplay input is inert now
        game.apply(Action::MoveLeft);
        game.apply(Action::Pause);
        assert_eq!(game.mode(), Mode::GameOver);
        assert!(game.tick(TICK).is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = started(5);
        game.apply(Action::Hold);
        game.apply(Action::HardDrop);
        game.state_mut().expect("state").score_mut().points = 999;
        block_spawn(&mut game);
        game.apply(Action::HardDrop);
        assert_eq!(game.mode(), Mode::GameOver);
        let stats = game.final_stats().expect("stats");
        assert_eq!(stats.pieces, 2);

        game.apply(Action::Restart);
        assert_eq!(game.mode(), Mode::Playing);
        assert!(game.board().expect("board").is_empty());
        let score = game.score().expect("score");
        assert_eq!((score.score, score.level, score.combo, score.lines), (0, 1, 0, 0));
        assert_eq!(game.held(), None);
        assert!(game.can_hold());
        assert_eq!(game.preview().len(), 3);
    }

    fn position_of<F: Fn(&Event) -> bool>(events: &[Event], f: F) -> usize {
        events.iter().position(f).expect("event present")
    }

    #[test]
    fn test_restart_in_game_over_tick_ends_on_playing() {
        let mut game = started(12);
        block_spawn(&mut game);
        game.enqueue(Action::HardDrop);
        game.enqueue(Action::Restart);
        let events = game.tick(TICK);

        assert_eq!(game.mode(), Mode::Playing);
        let over = position_of(&events, |e| matches!(e, Event::GameOver { .. }));
        let changed = position_of(&events, |e| matches!(e, Event::StateChanged { .. }));
        let spawned = position_of(&events, |e| matches!(e, Event::PieceSpawned { .. }));
        assert!(over < changed);
        assert!(changed < spawned);
        assert_eq!(events[changed], Event::StateChanged { mode: Mode::Playing });
    }

    #[test]
    fn test_move_after_hard_drop_follows_the_spawn() {
        let mut game = started(13);
        game.enqueue(Action::HardDrop);
        game.enqueue(Action::MoveLeft);
        let events = game.tick(TICK);

        let locked = position_of(&events, |e| matches!(e, Event::PieceLocked { .. }));
        let spawned = position_of(&events, |e| matches!(e, Event::PieceSpawned { .. }));
        let moved = position_of(&events, |e| matches!(e, Event::PieceMoved { .. }));
        assert!(locked < spawned);
        assert!(spawned < moved);

        let piece = game.active_piece().expect("piece");
        assert_eq!(
            events[moved],
            Event::PieceMoved {
                row: piece.row,
                col: piece.col,
            }
        );
        assert_eq!(piece.col, 3);
    }

    #[test]
    fn test_quit_discards_state() {
        let mut game = started(6);
        game.enqueue(Action::Quit);
        game.enqueue(Action::StartGame);
        game.tick(TICK);
        assert!(game.is_terminated());
        assert!(game.state().is_none());
        game.apply(Action::StartGame);
        assert!(game.state().is_none());
    }

    #[test]
    fn test_soft_drop_stop_honoured_while_paused() {
        let mut game = started(7);
        game.apply(Action::SoftDropStart);
        assert!(game.state().expect("state").is_soft_dropping());
        game.apply(Action::Pause);
        game.apply(Action::SoftDropStart);
        game.apply(Action::SoftDropStop);
        assert!(!game.state().expect("state").is_soft_dropping());
    }

    #[test]
    fn test_gravity_eventually_locks_piece() {
        let mut game = started(8);
        // 20 rows at 500 ms plus the lock delay fits in 15 s
        let mut locked = false;
        for _ in 0..(15 * 60) {
            let events = game.tick(TICK);
            if events.iter().any(|e| matches!(e, Event::PieceLocked { .. })) {
                locked = true;
                break;
            }
        }
        assert!(locked);
        assert_eq!(game.board().expect("board").filled_count(), 4);
    }

    #[test]
    fn test_rejected_rotation_reports_and_keeps_piece() {
        let mut game = started(9);
        let state = game.state_mut().expect("state");
        let piece = *state.current().expect("piece");
        // Wall in everything but the piece itself
        for row in 0..20 {
            for col in 0..BOARD_WIDTH as i32 {
                if !piece.cells().contains(&(row, col)) {
                    state.board_mut().set(row, col, Cell::Filled(PieceKind::S));
                }
            }
        }
        game.apply(Action::Rotate);
        let events = game.drain_events();
        if piece.kind != PieceKind::O {
            assert!(events.contains(&Event::PieceRotated {
                accepted: false,
                rotation: piece.rotation,
            }));
            assert_eq!(*game.active_piece().expect("piece"), piece);
        }
    }
}
