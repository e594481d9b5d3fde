//! Error types for board storage and game rule violations.
//!
//! All rule violations are reported as typed errors and leave the game
//! state untouched. Callers can match on the variant to distinguish a
//! rejected move from a programming error.

use crate::Player;

/// Errors raised by the bit-packed board itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("value {value} does not fit in {bits} bits")]
    ValueTooWide { value: u8, bits: usize },
}

/// Errors raised by game rule checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("position ({row}, {col}) is out of bounds")]
    OutOfBounds { row: usize, col: usize },

    #[error("position ({row}, {col}) is already occupied")]
    PositionOccupied { row: usize, col: usize },

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("it is not {0:?}'s turn")]
    InvalidPlayer(Player),

    #[error("illegal move: {0}")]
    InvalidMove(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_error_display() {
        let err = BoardError::OutOfBounds {
            row: 9,
            col: 2,
            rows: 6,
            cols: 7,
        };
        assert_eq!(err.to_string(), "cell (9, 2) is outside the 6x7 board");
    }

    #[test]
    fn game_error_display() {
        let err = GameError::PositionOccupied { row: 0, col: 3 };
        assert_eq!(err.to_string(), "position (0, 3) is already occupied");

        let err = GameError::InvalidMove("footprint overlaps a neutral piece".to_string());
        assert_eq!(
            err.to_string(),
            "illegal move: footprint overlaps a neutral piece"
        );
    }
}
