//! Cell states for the game board.

use std::fmt;

/// Discriminant values are the wire codes handed to the page's `renderCell` — do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum CellState {
    #[default]
    Empty = 0,
    Snake = 1,
    Apple = 2,
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Snake => write!(f, "Snake"),
            Self::Apple => write!(f, "Apple"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_state_is_1_byte() {
        assert_eq!(std::mem::size_of::<CellState>(), 1);
    }

    #[test]
    fn cell_state_discriminant_values() {
        assert_eq!(CellState::Empty as u8, 0);
        assert_eq!(CellState::Snake as u8, 1);
        assert_eq!(CellState::Apple as u8, 2);
    }

    #[test]
    fn cell_state_default_is_empty() {
        assert_eq!(CellState::default(), CellState::Empty);
    }

    #[test]
    fn cell_state_display() {
        assert_eq!(format!("{}", CellState::Apple), "Apple");
        assert_eq!(format!("{}", CellState::Snake), "Snake");
        assert_eq!(format!("{}", CellState::Empty), "Empty");
    }
}
