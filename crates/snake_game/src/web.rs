//! WebAssembly bindings for the browser page.
//!
//! The page owns the DOM grid, the `setInterval` timer and the key / click
//! listeners. It hands the engine three callbacks:
//!
//! - `renderCell(x, y, state)` with `state` one of 0 (empty), 1 (snake), 2 (apple)
//! - `renderScore(score)`
//! - `onGameOver(score, reason)`
//!
//! and, once the timer and listeners are attached, a `release` callback that
//! clears them again on game over.

use js_sys::Function;
use log::warn;
use wasm_bindgen::prelude::*;

use crate::cell::CellState;
use crate::config::GameConfig;
use crate::coord::{BoundaryMode, Coordinate};
use crate::direction::Direction;
use crate::engine::{GameEngine, Presenter};

#[derive(Debug)]
struct JsPresenter {
    render_cell: Function,
    render_score: Function,
}

impl Presenter for JsPresenter {
    fn render_cell(&mut self, at: Coordinate, state: CellState) {
        let result = self.render_cell.call3(
            &JsValue::NULL,
            &JsValue::from(at.x()),
            &JsValue::from(at.y()),
            &JsValue::from(state as u8),
        );
        if let Err(err) = result {
            warn!("renderCell threw at {at}: {err:?}");
        }
    }

    fn render_score(&mut self, score: u32) {
        if let Err(err) = self.render_score.call1(&JsValue::NULL, &JsValue::from(score)) {
            warn!("renderScore threw: {err:?}");
        }
    }
}

/// One game, driven by the page.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebGame {
    engine: GameEngine<JsPresenter>,
}

#[wasm_bindgen]
impl WebGame {
    /// Builds a game from a JSON settings object such as
    /// `{"boardSize": 12, "tickIntervalMs": 120, "boundaryMode": "Wrapping"}`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings: &str,
        render_cell: Function,
        render_score: Function,
        on_game_over: Function,
    ) -> Result<WebGame, JsError> {
        let config = GameConfig::from_json(settings)?;
        Self::build(config, render_cell, render_score, on_game_over)
    }

    /// Builds a game from the splash screen's form values. `version` 1 is
    /// the bounded board, 2 the wrapping one.
    #[wasm_bindgen(js_name = fromForm)]
    pub fn from_form(
        board_size: u32,
        game_speed: u32,
        version: u8,
        render_cell: Function,
        render_score: Function,
        on_game_over: Function,
    ) -> Result<WebGame, JsError> {
        let config = GameConfig {
            board_size,
            tick_interval_ms: game_speed,
            boundary_mode: BoundaryMode::from_version(version)?,
            seed: None,
        };
        Self::build(config, render_cell, render_score, on_game_over)
    }

    /// Call once the timer and listeners are attached; `release` detaches them.
    pub fn start(&mut self, release: Function) {
        self.engine.start(move || {
            if let Err(err) = release.call0(&JsValue::NULL) {
                warn!("release threw: {err:?}");
            }
        });
    }

    /// Timer callback. Returns false once the game has ended.
    pub fn tick(&mut self) -> bool {
        self.engine.tick();
        !self.engine.is_over()
    }

    /// `keyup` handler. Returns true when the key was used, so the page can
    /// call `preventDefault`.
    pub fn key(&mut self, code: &str) -> bool {
        self.engine.handle_key(code)
    }

    /// `click` handler with the page's inner viewport size.
    pub fn pointer(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.engine.handle_pointer(x, y, width, height);
    }

    /// Sets the direction from its wire code (0 up, 1 right, 2 down, 3 left).
    /// Any other code ends the game with `InvalidDirection`.
    pub fn turn(&mut self, code: u8) {
        match Direction::try_from(code) {
            Ok(direction) => self.engine.set_direction(direction),
            Err(err) => self.engine.abort(err),
        }
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
    }

    /// Re-sends every occupied cell and the score.
    pub fn redraw(&mut self) {
        self.engine.redraw();
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.engine.score()
    }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool {
        self.engine.is_paused()
    }

    #[wasm_bindgen(getter)]
    pub fn over(&self) -> bool {
        self.engine.is_over()
    }

    #[wasm_bindgen(getter, js_name = boardSize)]
    pub fn board_size(&self) -> u32 {
        self.engine.config().board_size
    }

    #[wasm_bindgen(getter, js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> u32 {
        self.engine.tick_interval_ms()
    }

    /// Row-major snapshot of the board as cell codes.
    pub fn cells(&self) -> Vec<u8> {
        self.engine
            .board()
            .cells()
            .iter()
            .map(|&cell| cell as u8)
            .collect()
    }
}

impl WebGame {
    fn build(
        mut config: GameConfig,
        render_cell: Function,
        render_score: Function,
        on_game_over: Function,
    ) -> Result<WebGame, JsError> {
        if config.seed.is_none() {
            config.seed = Some((js_sys::Math::random() * f64::from(u32::MAX)) as u64);
        }
        let presenter = JsPresenter {
            render_cell,
            render_score,
        };
        let engine = GameEngine::new(config, presenter, move |score, reason| {
            let reason = JsValue::from_str(&reason.to_string());
            if let Err(err) = on_game_over.call2(&JsValue::NULL, &JsValue::from(score), &reason) {
                warn!("onGameOver threw: {err:?}");
            }
        })?;
        Ok(WebGame { engine })
    }
}
