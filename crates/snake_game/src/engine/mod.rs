//! Tick-driven game state machine.
//!
//! The host owns the timer and input listeners. It calls [`GameEngine::start`]
//! once it has attached them, forwards every timer firing to
//! [`GameEngine::tick`] and every input event to [`GameEngine::handle_key`] /
//! [`GameEngine::handle_pointer`]. Board and score changes flow back through a
//! [`Presenter`].


use std::fmt;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cell::CellState;
use crate::config::GameConfig;
use crate::coord::Coordinate;
use crate::direction::Direction;
use crate::error::{ConfigError, GameError, GameOverReason};
use crate::input::{self, Intent};
use crate::snake::Snake;
use crate::Board;

/// Receives every board and score change.
pub trait Presenter {
    fn render_cell(&mut self, at: Coordinate, state: CellState);
    fn render_score(&mut self, score: u32);
}

/// Presenter that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Presenter for Headless {
    fn render_cell(&mut self, _at: Coordinate, _state: CellState) {}
    fn render_score(&mut self, _score: u32) {}
}

type GameOverCallback = Box<dyn FnOnce(u32, GameOverReason)>;
type Release = Box<dyn FnOnce()>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Built and drawn, host resources not yet attached.
    NotStarted,
    Paused,
    Running,
    GameOver(GameOverReason),
}

/// What a single call to [`GameEngine::tick`] did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Idle,
    Moved,
    Ate,
    GameOver(GameOverReason),
}

pub struct GameEngine<P: Presenter> {
    config: GameConfig,
    board: Board,
    snake: Snake,
    apple: Coordinate,
    score: u32,
    direction: Direction,
    phase: Phase,
    presenter: P,
    rng: ChaCha8Rng,
    on_game_over: Option<GameOverCallback>,
    resources: Vec<Release>,
}

impl<P: Presenter> fmt::Debug for GameEngine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("snake", &self.snake)
            .field("apple", &self.apple)
            .field("score", &self.score)
            .field("direction", &self.direction)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<P: Presenter> GameEngine<P> {
    /// Lays out the starting snake and first apple and draws them.
    ///
    /// `on_game_over` runs exactly once, when the game ends.
    pub fn new(
        config: GameConfig,
        presenter: P,
        on_game_over: impl FnOnce(u32, GameOverReason) + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut board = Board::new(config.board_size);
        let snake = Snake::initial(config.board_size)?;
        for segment in snake.segments() {
            board.set(segment, CellState::Snake);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or_default());
        let apple = board.sample_empty(&mut rng)?;
        board.set(&apple, CellState::Apple);

        let mut engine = Self {
            config,
            board,
            snake,
            apple,
            score: 0,
            direction: Direction::Right,
            phase: Phase::NotStarted,
            presenter,
            rng,
            on_game_over: Some(Box::new(on_game_over)),
            resources: Vec::new(),
        };
        engine.redraw();
        Ok(engine)
    }

    /// Pushes every occupied cell and the score to the presenter.
    pub fn redraw(&mut self) {
        for segment in self.snake.segments() {
            self.presenter.render_cell(*segment, CellState::Snake);
        }
        self.presenter.render_cell(self.apple, CellState::Apple);
        self.presenter.render_score(self.score);
    }

    /// Takes ownership of the host's timer and listener teardown and waits
    /// for the first input. `release` runs once, on game over.
    pub fn start(&mut self, release: impl FnOnce() + 'static) {
        if self.phase != Phase::NotStarted {
            warn!("start ignored in phase {:?}", self.phase);
            return;
        }
        self.resources.push(Box::new(release));
        self.phase = Phase::Paused;
        info!(
            "game started: {0}x{0} board, {1:?}, {2} ms ticks",
            self.config.board_size, self.config.boundary_mode, self.config.tick_interval_ms
        );
    }

    /// Advances one step if running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Idle;
        }
        match self.advance() {
            Ok(outcome) => {
                debug!("tick {:?}: head {}", outcome, self.snake.head());
                outcome
            }
            Err(err) => {
                let reason = err.reason();
                self.finish(err);
                TickOutcome::GameOver(reason)
            }
        }
    }

    /// Points the snake at `direction` and resumes play.
    ///
    /// Reversals are accepted as-is, which sends the head into the neck on
    /// the next tick.
    pub fn set_direction(&mut self, direction: Direction) {
        match self.phase {
            Phase::Paused | Phase::Running => {
                self.direction = direction;
                self.phase = Phase::Running;
            }
            Phase::NotStarted | Phase::GameOver(_) => {
                debug!("direction {direction} ignored in phase {:?}", self.phase);
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Paused => Phase::Running,
            Phase::Running => Phase::Paused,
            other => other,
        };
    }

    /// Applies a `KeyboardEvent.code`. Returns whether the engine used the
    /// key: unrecognized codes and any key outside Paused / Running return false.
    pub fn handle_key(&mut self, code: &str) -> bool {
        if !matches!(self.phase, Phase::Paused | Phase::Running) {
            return false;
        }
        match input::resolve_key(code) {
            Some(Intent::Turn(direction)) => self.set_direction(direction),
            Some(Intent::TogglePause) => self.toggle_pause(),
            None => return false,
        }
        true
    }

    /// Applies a tap at `(x, y)` in a `width` x `height` viewport.
    pub fn handle_pointer(&mut self, x: f64, y: f64, width: f64, height: f64) {
        match input::resolve_pointer(x, y, width, height) {
            Some(direction) => self.set_direction(direction),
            None => warn!("pointer input ignored for {width}x{height} viewport"),
        }
    }

    /// Ends the game from outside the tick loop.
    pub fn abort(&mut self, error: GameError) {
        self.finish(error);
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn apple(&self) -> Coordinate {
        self.apple
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::NotStarted | Phase::Paused)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    #[must_use]
    pub fn tick_interval_ms(&self) -> u32 {
        self.config.tick_interval_ms
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn advance(&mut self) -> Result<TickOutcome, GameError> {
        debug_assert!(!self.snake.is_empty(), "snake lost its segments");
        let next = self
            .snake
            .head()
            .step(self.direction, self.config.boundary_mode)?;
        match self.board.get(&next) {
            CellState::Snake => {
                if self.snake.collides(&next, false) {
                    return Err(GameError::SelfCollision {
                        x: next.x(),
                        y: next.y(),
                    });
                }
                self.slide(next);
                Ok(TickOutcome::Moved)
            }
            CellState::Apple => {
                self.score += 1;
                self.presenter.render_score(self.score);
                self.snake.push_head(next);
                self.mark(next, CellState::Snake);
                self.respawn_apple()?;
                Ok(TickOutcome::Ate)
            }
            CellState::Empty => {
                self.slide(next);
                Ok(TickOutcome::Moved)
            }
        }
    }

    /// Moves the snake one cell without growing.
    fn slide(&mut self, next: Coordinate) {
        // Tail first: when `next` is the old tail the cell must end up Snake.
        if let Some(tail) = self.snake.pop_tail() {
            self.mark(tail, CellState::Empty);
        }
        self.snake.push_head(next);
        self.mark(next, CellState::Snake);
    }

    fn respawn_apple(&mut self) -> Result<(), GameError> {
        let apple = self.board.sample_empty(&mut self.rng)?;
        self.apple = apple;
        self.mark(apple, CellState::Apple);
        debug!("apple respawned at {apple}");
        Ok(())
    }

    fn mark(&mut self, at: Coordinate, state: CellState) {
        self.board.set(&at, state);
        self.presenter.render_cell(at, state);
    }

    fn finish(&mut self, error: GameError) {
        if self.is_over() {
            return;
        }
        let reason = error.reason();
        self.phase = Phase::GameOver(reason);
        info!("game over: {error}, score {}", self.score);
        for release in self.resources.drain(..) {
            release();
        }
        if let Some(on_game_over) = self.on_game_over.take() {
            on_game_over(self.score, reason);
        }
    }
}

#[cfg(test)]
use crate::coord::BoundaryMode;

#[cfg(test)]
impl<P: Presenter> GameEngine<P> {
    /// Moves the apple to `at`, which must be Empty.
    pub(crate) fn place_apple(&mut self, at: Coordinate) {
        assert_eq!(self.board.get(&at), CellState::Empty, "apple target {at} is occupied");
        let old = self.apple;
        self.mark(old, CellState::Empty);
        self.apple = at;
        self.mark(at, CellState::Apple);
    }

    /// Replaces the snake, which must not overlap the apple.
    pub(crate) fn place_snake(&mut self, snake: Snake) {
        for segment in self.snake.segments().copied().collect::<Vec<_>>() {
            self.mark(segment, CellState::Empty);
        }
        for segment in snake.segments().copied().collect::<Vec<_>>() {
            assert_ne!(segment, self.apple, "snake overlaps apple at {segment}");
            self.mark(segment, CellState::Snake);
        }
        self.snake = snake;
    }

    /// Marks every Empty cell as Snake without touching the snake itself.
    pub(crate) fn clog_board(&mut self) {
        let size = self.config.board_size as i32;
        for y in 0..size {
            for x in 0..size {
                let c = Coordinate::new(x, y, self.config.board_size, BoundaryMode::Bounded).unwrap();
                if self.board.get(&c) == CellState::Empty {
                    self.board.set(&c, CellState::Snake);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Presenter that keeps every call for inspection.
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub cells: Vec<(Coordinate, CellState)>,
        pub scores: Vec<u32>,
    }

    impl Presenter for Recorder {
        fn render_cell(&mut self, at: Coordinate, state: CellState) {
            self.cells.push((at, state));
        }

        fn render_score(&mut self, score: u32) {
            self.scores.push(score);
        }
    }

    pub(crate) type Endings = Rc<RefCell<Vec<(u32, GameOverReason)>>>;

    pub(crate) fn game(size: u32, mode: BoundaryMode) -> (GameEngine<Recorder>, Endings) {
        let endings: Endings = Rc::default();
        let sink = Rc::clone(&endings);
        let config = GameConfig {
            board_size: size,
            boundary_mode: mode,
            seed: Some(1),
            ..GameConfig::default()
        };
        let mut engine = GameEngine::new(config, Recorder::default(), move |score, reason| {
            sink.borrow_mut().push((score, reason));
        })
        .unwrap();
        engine.start(|| {});
        park_apple(&mut engine);
        (engine, endings)
    }

    /// Moves the apple to the top-left corner, out of the starting snake's way.
    pub(crate) fn park_apple<P: Presenter>(engine: &mut GameEngine<P>) {
        let corner = at(0, 0, engine.config().board_size);
        if engine.apple() != corner {
            engine.place_apple(corner);
        }
    }

    pub(crate) fn at(x: i32, y: i32, size: u32) -> Coordinate {
        Coordinate::new(x, y, size, BoundaryMode::Bounded).unwrap()
    }

    /// Board and snake agree, and exactly one apple sits off the snake.
    pub(crate) fn assert_consistent<P: Presenter>(engine: &GameEngine<P>) {
        let size = engine.config().board_size;
        let body: HashSet<usize> = engine.snake().segments().map(Coordinate::index).collect();
        assert_eq!(body.len(), engine.snake().len(), "snake segments repeat");
        for (i, &cell) in engine.board().cells().iter().enumerate() {
            let expected = if body.contains(&i) {
                CellState::Snake
            } else if i == engine.apple().index() {
                CellState::Apple
            } else {
                CellState::Empty
            };
            assert_eq!(cell, expected, "cell {} {} on {size}x{size}", i % size as usize, i / size as usize);
        }
        assert_eq!(engine.board().count(CellState::Apple), 1);
        assert!(!engine.snake().contains(&engine.apple()));
    }

    #[test]
    fn new_draws_snake_apple_and_score() {
        let engine = GameEngine::new(GameConfig::default(), Recorder::default(), |_, _| {}).unwrap();
        assert_eq!(engine.phase(), Phase::NotStarted);
        assert!(engine.is_paused());
        let drawn: HashSet<_> = engine.presenter().cells.iter().copied().collect();
        for x in 1..=3 {
            assert!(drawn.contains(&(at(x, 8, 10), CellState::Snake)));
        }
        assert!(drawn.contains(&(engine.apple(), CellState::Apple)));
        assert_eq!(engine.presenter().scores, vec![0]);
        assert_consistent(&engine);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = GameConfig {
            board_size: 4,
            ..GameConfig::default()
        };
        let err = GameEngine::new(config, Headless, |_, _| {}).unwrap_err();
        assert!(matches!(err, ConfigError::BoardTooSmall { .. }));
    }

    #[test]
    fn new_rejects_huge_board_without_allocating() {
        let config = GameConfig {
            board_size: 4_000_000_000,
            ..GameConfig::default()
        };
        let err = GameEngine::new(config, Headless, |_, _| {}).unwrap_err();
        assert!(matches!(err, ConfigError::BoardTooLarge { size: 4_000_000_000, .. }));
    }

    #[test]
    fn same_seed_same_apple() {
        let config = GameConfig {
            board_size: 16,
            seed: Some(99),
            ..GameConfig::default()
        };
        let a = GameEngine::new(config, Headless, |_, _| {}).unwrap();
        let b = GameEngine::new(config, Headless, |_, _| {}).unwrap();
        assert_eq!(a.apple(), b.apple());
    }

    #[test]
    fn ticks_are_idle_until_running() {
        let mut engine = GameEngine::new(GameConfig::default(), Headless, |_, _| {}).unwrap();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.set_direction(Direction::Up);
        assert_eq!(engine.phase(), Phase::NotStarted);
        assert_eq!(engine.direction(), Direction::Right);

        engine.start(|| {});
        assert_eq!(engine.phase(), Phase::Paused);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.snake().head(), at(3, 8, 10));
    }

    #[test]
    fn start_twice_keeps_first_release() {
        let released = Rc::new(RefCell::new(0));
        let mut engine = GameEngine::new(GameConfig::default(), Headless, |_, _| {}).unwrap();
        let counter = Rc::clone(&released);
        engine.start(move || *counter.borrow_mut() += 1);
        let counter = Rc::clone(&released);
        engine.start(move || *counter.borrow_mut() += 10);
        engine.abort(GameError::BoardFull);
        assert_eq!(*released.borrow(), 1);
    }

    #[test]
    fn set_direction_resumes() {
        let (mut engine, _) = game(10, BoundaryMode::Bounded);
        engine.set_direction(Direction::Up);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.direction(), Direction::Up);
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.snake().head(), at(3, 7, 10));
    }

    #[test]
    fn pause_stops_ticks() {
        let (mut engine, _) = game(10, BoundaryMode::Bounded);
        engine.set_direction(Direction::Up);
        engine.toggle_pause();
        assert!(engine.is_paused());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.toggle_pause();
        assert_eq!(engine.tick(), TickOutcome::Moved);
    }

    #[test]
    fn keys_unused_before_start() {
        let mut engine = GameEngine::new(GameConfig::default(), Headless, |_, _| {}).unwrap();
        assert!(!engine.handle_key("ArrowUp"));
        assert!(!engine.handle_key("Space"));
        assert_eq!(engine.phase(), Phase::NotStarted);
    }

    #[test]
    fn keys_dispatch() {
        let (mut engine, _) = game(10, BoundaryMode::Bounded);
        assert!(!engine.handle_key("KeyQ"));
        assert_eq!(engine.phase(), Phase::Paused);
        assert!(engine.handle_key("Space"));
        assert_eq!(engine.phase(), Phase::Running);
        assert!(engine.handle_key("ArrowUp"));
        assert_eq!(engine.direction(), Direction::Up);
    }

    #[test]
    fn pointer_dispatch() {
        let (mut engine, _) = game(10, BoundaryMode::Bounded);
        engine.handle_pointer(400.0, 10.0, 800.0, 600.0);
        assert_eq!(engine.direction(), Direction::Up);
        assert_eq!(engine.phase(), Phase::Running);
        engine.handle_pointer(400.0, 10.0, 0.0, 0.0);
        assert_eq!(engine.direction(), Direction::Up);
    }

    #[test]
    fn game_over_fires_once_and_releases() {
        let released = Rc::new(RefCell::new(0));
        let endings: Endings = Rc::default();
        let sink = Rc::clone(&endings);
        let mut engine = GameEngine::new(GameConfig::default(), Headless, move |score, reason| {
            sink.borrow_mut().push((score, reason));
        })
        .unwrap();
        let counter = Rc::clone(&released);
        engine.start(move || *counter.borrow_mut() += 1);
        park_apple(&mut engine);
        engine.set_direction(Direction::Down);
        // Head at row 8 of 10: one move to row 9, then off the board.
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.tick(), TickOutcome::GameOver(GameOverReason::OutOfBounds));
        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.abort(GameError::BoardFull);

        assert_eq!(*released.borrow(), 1);
        assert_eq!(*endings.borrow(), vec![(0, GameOverReason::OutOfBounds)]);
        assert_eq!(engine.phase(), Phase::GameOver(GameOverReason::OutOfBounds));
    }

    #[test]
    fn input_ignored_after_game_over() {
        let (mut engine, _) = game(10, BoundaryMode::Bounded);
        engine.abort(GameError::InvalidDirection(7));
        engine.set_direction(Direction::Up);
        engine.toggle_pause();
        assert!(!engine.handle_key("ArrowLeft"));
        assert!(!engine.handle_key("Space"));
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.phase(), Phase::GameOver(GameOverReason::InvalidDirection));
    }

    #[test]
    fn abort_reports_reason() {
        let (mut engine, endings) = game(10, BoundaryMode::Wrapping);
        engine.abort(GameError::InvalidDirection(9));
        assert_eq!(*endings.borrow(), vec![(0, GameOverReason::InvalidDirection)]);
    }

    // Property: two pause toggles leave phase, direction and score untouched.
    proptest! {
        #[test]
        fn prop_double_toggle_is_identity(
            turns in proptest::collection::vec(0u8..4, 0..6),
            ticks in 0usize..4,
        ) {
            let (mut engine, _) = game(12, BoundaryMode::Wrapping);
            for code in turns {
                engine.set_direction(Direction::try_from(code).unwrap());
            }
            for _ in 0..ticks {
                engine.tick();
            }
            let before = (engine.phase(), engine.direction(), engine.score());
            engine.toggle_pause();
            engine.toggle_pause();
            prop_assert_eq!((engine.phase(), engine.direction(), engine.score()), before);
        }
    }

    // Property: between ticks the board mirrors the snake and apple, and the
    // snake is three segments plus one per apple eaten.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn prop_board_stays_consistent(
            size in 5u32..12,
            wrapping in any::<bool>(),
            seed in any::<u64>(),
            moves in proptest::collection::vec(0u8..4, 1..80),
        ) {
            let mode = if wrapping { BoundaryMode::Wrapping } else { BoundaryMode::Bounded };
            let config = GameConfig {
                board_size: size,
                boundary_mode: mode,
                seed: Some(seed),
                ..GameConfig::default()
            };
            let mut engine = GameEngine::new(config, Headless, |_, _| {}).unwrap();
            engine.start(|| {});
            let mut eaten = 0;
            for code in moves {
                engine.set_direction(Direction::try_from(code).unwrap());
                let score = engine.score();
                match engine.tick() {
                    TickOutcome::Ate => eaten += 1,
                    TickOutcome::GameOver(reason) => {
                        if reason != GameOverReason::BoardFull {
                            prop_assert_eq!(engine.score(), score);
                        }
                        break;
                    }
                    TickOutcome::Moved | TickOutcome::Idle => {}
                }
                assert_consistent(&engine);
                prop_assert_eq!(engine.snake().len(), 3 + eaten);
                prop_assert_eq!(engine.score() as usize, eaten);
            }
        }
    }
}
