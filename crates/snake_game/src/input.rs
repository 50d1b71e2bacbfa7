//! Translates raw host input into game intents.

use crate::direction::Direction;

pub const KEY_UP: &str = "ArrowUp";
pub const KEY_RIGHT: &str = "ArrowRight";
pub const KEY_DOWN: &str = "ArrowDown";
pub const KEY_LEFT: &str = "ArrowLeft";
pub const KEY_PAUSE: &str = "Space";

/// What a recognized input asks the engine to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
}

/// Resolves a `KeyboardEvent.code`. Unrecognized codes yield `None`.
#[must_use]
pub fn resolve_key(code: &str) -> Option<Intent> {
    let intent = match code {
        KEY_UP => Intent::Turn(Direction::Up),
        KEY_RIGHT => Intent::Turn(Direction::Right),
        KEY_DOWN => Intent::Turn(Direction::Down),
        KEY_LEFT => Intent::Turn(Direction::Left),
        KEY_PAUSE => Intent::TogglePause,
        _ => return None,
    };
    Some(intent)
}

/// Resolves a tap at `(x, y)` inside a `width` x `height` viewport.
///
/// The axis with the larger normalized offset from the centre wins; equal
/// offsets go to the vertical axis. Degenerate viewports yield `None`.
#[must_use]
pub fn resolve_pointer(x: f64, y: f64, width: f64, height: f64) -> Option<Direction> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return None;
    }
    let dx = (x - width / 2.0) / width;
    let dy = (y - height / 2.0) / height;
    let direction = if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}
