//! # Connect 4 Game Implementation
//!
//! This module implements the classic Connect 4 board game.
//! Players take turns dropping pieces into columns, trying to get 4 pieces
//! in a row (horizontally, vertically, or diagonally).
//!
//! ## Rules
//! - Players alternate dropping pieces into columns
//! - Pieces fall to the lowest available spot in the column due to gravity
//! - First player to get 4 pieces in a row wins
//! - Game is a draw if the board fills up with no winner

use crate::analysis::{wins_through, LineGame};
use crate::board::BitPackedBoard;
use crate::error::GameError;
use crate::history::MoveHistory;
use crate::search::Evaluate;
use crate::{GameState, Player};
use std::fmt;
use std::str::FromStr;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const WIN_LENGTH: usize = 4;

/// Center-out column order for tighter alpha-beta pruning.
const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// A move is the column a piece is dropped into (0-based).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Connect4Move(pub usize);

#[derive(Debug, Clone)]
struct UndoRecord {
    row: usize,
    col: usize,
    prev_last_move: Option<(usize, usize)>,
}

/// Complete state of a Connect 4 game: packed board, side to move, move
/// counter and the undo log.
#[derive(Debug, Clone)]
pub struct Connect4State {
    board: BitPackedBoard<ROWS, COLS, 2>,
    current_player: Player,
    move_count: u32,
    last_move: Option<(usize, usize)>,
    history: MoveHistory<UndoRecord>,
}

impl Connect4State {
    pub fn new() -> Self {
        Self {
            board: BitPackedBoard::new(),
            current_player: Player::One,
            move_count: 0,
            last_move: None,
            history: MoveHistory::new(),
        }
    }

    /// Lowest empty row in `col`, or `None` when the column is full.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        self.board.drop_row(col)
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.board.is_column_full(col)
    }

    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Flat row-major cell dump: 0 empty, 1/2 players.
    pub fn cells(&self) -> Vec<u8> {
        let mut cells = Vec::with_capacity(ROWS * COLS);
        for row in 0..ROWS {
            for col in 0..COLS {
                cells.push(self.board.get(row, col).unwrap_or(0));
            }
        }
        cells
    }

    pub fn is_legal(&self, mv: &Connect4Move) -> bool {
        mv.0 < COLS && !self.board.is_column_full(mv.0) && !self.is_terminal()
    }

    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.board.memory_usage() + self.history.memory_usage()
    }
}

impl Default for Connect4State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                let symbol = match self.board.get(row, col).unwrap_or(0) {
                    1 => "X",
                    2 => "O",
                    _ => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl LineGame for Connect4State {
    fn rows(&self) -> usize {
        ROWS
    }

    fn cols(&self) -> usize {
        COLS
    }

    fn win_length(&self) -> usize {
        WIN_LENGTH
    }

    fn stone(&self, row: usize, col: usize) -> Option<Player> {
        Player::from_cell(self.board.get(row, col).unwrap_or(0))
    }

    fn placements_for(&self, _player: Player) -> Vec<(usize, usize)> {
        (0..COLS)
            .filter_map(|col| self.board.drop_row(col).map(|row| (row, col)))
            .collect()
    }
}

impl GameState for Connect4State {
    type Move = Connect4Move;

    fn legal_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .map(Connect4Move)
            .collect()
    }

    fn apply(&mut self, mv: &Self::Move) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameAlreadyOver);
        }
        if mv.0 >= COLS {
            return Err(GameError::OutOfBounds { row: 0, col: mv.0 });
        }
        let row = self
            .board
            .drop_row(mv.0)
            .ok_or(GameError::PositionOccupied { row: 0, col: mv.0 })?;
        self.board.set(row, mv.0, self.current_player.cell())?;
        self.history.push(UndoRecord {
            row,
            col: mv.0,
            prev_last_move: self.last_move,
        });
        self.last_move = Some((row, mv.0));
        self.current_player = self.current_player.opponent();
        self.move_count += 1;
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.move_count as usize == ROWS * COLS
    }

    fn winner(&self) -> Option<Player> {
        // Local check from the just-placed cell; O(win length), not a
        // full-board rescan.
        let (row, col) = self.last_move?;
        let player = self.stone(row, col)?;
        wins_through(self, row, col, player).then_some(player)
    }

    fn current_player(&self) -> Player {
        self.current_player
    }

    fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    fn move_count(&self) -> u32 {
        self.move_count
    }

    fn undo(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };
        // The recorded cell is always in bounds; clearing cannot fail.
        let _ = self.board.set(record.row, record.col, 0);
        self.last_move = record.prev_last_move;
        self.current_player = self.current_player.opponent();
        self.move_count -= 1;
        true
    }
}

impl Evaluate for Connect4State {
    fn evaluate(&self, player: Player) -> i32 {
        let mut score = crate::analysis::evaluate_line_game(self, player);
        // Center column control, as in classic Connect 4 heuristics.
        for row in 0..ROWS {
            match self.stone(row, COLS / 2) {
                Some(p) if p == player => score += 3,
                Some(_) => score -= 3,
                None => {}
            }
        }
        score
    }

    fn ordered_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        MOVE_ORDER
            .iter()
            .filter(|&&col| !self.board.is_column_full(col))
            .map(|&col| Connect4Move(col))
            .collect()
    }
}

impl fmt::Display for Connect4Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Connect4Move {
    type Err = String;

    /// Parses a bare column number, e.g. `"3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let col = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
        Ok(Connect4Move(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Connect4State::new();
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.move_count(), 0);
        assert!(!game.is_terminal());
        assert_eq!(game.legal_moves().len(), 7);
    }

    #[test]
    fn test_pieces_stack_from_the_bottom() {
        let mut game = Connect4State::new();
        game.apply(&Connect4Move(3)).unwrap();
        assert_eq!(game.cells()[5 * COLS + 3], 1);
        assert_eq!(game.current_player(), Player::Two);

        game.apply(&Connect4Move(3)).unwrap();
        assert_eq!(game.cells()[4 * COLS + 3], 2);
        assert_eq!(game.current_player(), Player::One);
    }

    #[test]
    fn test_full_column_is_rejected() {
        let mut game = Connect4State::new();
        for _ in 0..ROWS {
            game.apply(&Connect4Move(0)).unwrap();
        }
        let before = game.cells();
        assert_eq!(
            game.apply(&Connect4Move(0)),
            Err(GameError::PositionOccupied { row: 0, col: 0 })
        );
        assert_eq!(game.cells(), before, "failed move must not mutate state");
        assert_eq!(
            game.apply(&Connect4Move(9)),
            Err(GameError::OutOfBounds { row: 0, col: 9 })
        );
    }

    #[test]
    fn test_win_condition_horizontal() {
        let mut game = Connect4State::new();
        // Player 1: 0, 1, 2, 3 / Player 2: 0, 1, 2
        game.apply(&Connect4Move(0)).unwrap();
        game.apply(&Connect4Move(0)).unwrap();
        game.apply(&Connect4Move(1)).unwrap();
        game.apply(&Connect4Move(1)).unwrap();
        game.apply(&Connect4Move(2)).unwrap();
        game.apply(&Connect4Move(2)).unwrap();
        game.apply(&Connect4Move(3)).unwrap();

        assert_eq!(game.winner(), Some(Player::One));
        assert!(game.is_terminal());
        assert_eq!(
            game.apply(&Connect4Move(4)),
            Err(GameError::GameAlreadyOver)
        );
    }

    #[test]
    fn test_win_condition_vertical() {
        let mut game = Connect4State::new();
        game.apply(&Connect4Move(0)).unwrap();
        game.apply(&Connect4Move(1)).unwrap();
        game.apply(&Connect4Move(0)).unwrap();
        game.apply(&Connect4Move(1)).unwrap();
        game.apply(&Connect4Move(0)).unwrap();
        game.apply(&Connect4Move(1)).unwrap();
        game.apply(&Connect4Move(0)).unwrap();

        assert_eq!(game.winner(), Some(Player::One));
        assert!(game.is_terminal());
    }

    #[test]
    fn test_win_condition_diagonal() {
        let mut game = Connect4State::new();
        game.apply(&Connect4Move(0)).unwrap(); // P1 (5,0)
        game.apply(&Connect4Move(1)).unwrap(); // P2 (5,1)
        game.apply(&Connect4Move(1)).unwrap(); // P1 (4,1)
        game.apply(&Connect4Move(2)).unwrap(); // P2 (5,2)
        game.apply(&Connect4Move(2)).unwrap(); // P1 (4,2)
        game.apply(&Connect4Move(3)).unwrap(); // P2 (5,3)
        game.apply(&Connect4Move(2)).unwrap(); // P1 (3,2)
        game.apply(&Connect4Move(3)).unwrap(); // P2 (4,3)
        game.apply(&Connect4Move(3)).unwrap(); // P1 (3,3)
        game.apply(&Connect4Move(0)).unwrap(); // P2 (4,0)
        game.apply(&Connect4Move(3)).unwrap(); // P1 (2,3) completes /

        assert_eq!(game.winner(), Some(Player::One));
        assert!(game.is_terminal());
    }

    #[test]
    fn test_local_win_check_matches_full_scan() {
        let mut game = Connect4State::new();
        let columns = [0, 0, 1, 1, 2, 2, 3];
        for &col in &columns {
            game.apply(&Connect4Move(col)).unwrap();
        }
        assert_eq!(game.winner(), crate::analysis::scan_for_win(&game));
    }

    #[test]
    fn test_undo_restores_previous_position() {
        let mut game = Connect4State::new();
        game.apply(&Connect4Move(3)).unwrap();
        game.apply(&Connect4Move(4)).unwrap();
        let snapshot = game.cells();

        game.apply(&Connect4Move(5)).unwrap();
        assert!(game.undo());
        assert_eq!(game.cells(), snapshot);
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.move_count(), 2);

        assert!(game.undo());
        assert!(game.undo());
        assert!(!game.undo(), "empty history reports false");
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_undo_reopens_a_finished_game() {
        let mut game = Connect4State::new();
        for &col in &[0, 0, 1, 1, 2, 2, 3] {
            game.apply(&Connect4Move(col)).unwrap();
        }
        assert!(game.is_terminal());
        assert!(game.undo());
        assert!(!game.is_terminal());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_simulate_leaves_source_untouched() {
        let game = Connect4State::new();
        let next = game.simulate(&Connect4Move(3)).unwrap();
        assert_eq!(game.move_count(), 0);
        assert_eq!(next.move_count(), 1);
        assert_eq!(game.cells()[5 * COLS + 3], 0);
        assert_eq!(next.cells()[5 * COLS + 3], 1);
    }

    #[test]
    fn test_ordered_moves_prefers_center() {
        let game = Connect4State::new();
        assert_eq!(game.ordered_moves()[0], Connect4Move(3));
    }

    #[test]
    fn test_move_parsing() {
        assert_eq!(Connect4Move::from_str(" 3 ").unwrap(), Connect4Move(3));
        assert!(Connect4Move::from_str("x").is_err());
    }
}
