use crate::analysis::{wins_through, LineGame};
use crate::board::BitPackedBoard;
use crate::error::GameError;
use crate::history::MoveHistory;
use crate::search::Evaluate;
use crate::{GameState, Player};
use std::fmt;
use std::str::FromStr;

pub const SIZE: usize = 15;
pub const WIN_LENGTH: usize = 5;

/// A stone placement at (row, col).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GomokuMove(pub usize, pub usize);

#[derive(Debug, Clone)]
struct UndoRecord {
    row: usize,
    col: usize,
    prev_last_move: Option<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct GomokuState {
    board: BitPackedBoard<SIZE, SIZE, 2>,
    current_player: Player,
    move_count: u32,
    last_move: Option<(usize, usize)>,
    history: MoveHistory<UndoRecord>,
}

impl GomokuState {
    pub fn new() -> Self {
        Self {
            board: BitPackedBoard::new(),
            current_player: Player::One,
            move_count: 0,
            last_move: None,
            history: MoveHistory::new(),
        }
    }

    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    pub fn cells(&self) -> Vec<u8> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for row in 0..SIZE {
            for col in 0..SIZE {
                cells.push(self.board.get(row, col).unwrap_or(0));
            }
        }
        cells
    }

    pub fn is_legal(&self, mv: &GomokuMove) -> bool {
        self.board.is_within_bounds(mv.0, mv.1)
            && self.board.get(mv.0, mv.1).unwrap_or(1) == 0
            && !self.is_terminal()
    }

    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.board.memory_usage() + self.history.memory_usage()
    }

    /// True if (row, col) lies within Chebyshev distance 2 of any stone.
    fn near_action(&self, row: usize, col: usize) -> bool {
        let lo_r = row.saturating_sub(2);
        let lo_c = col.saturating_sub(2);
        for r in lo_r..=(row + 2).min(SIZE - 1) {
            for c in lo_c..=(col + 2).min(SIZE - 1) {
                if self.board.get(r, c).unwrap_or(0) != 0 {
                    return true;
                }
            }
        }
        false
    }
}

impl Default for GomokuState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GomokuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
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

impl LineGame for GomokuState {
    fn rows(&self) -> usize {
        SIZE
    }

    fn cols(&self) -> usize {
        SIZE
    }

    fn win_length(&self) -> usize {
        WIN_LENGTH
    }

    fn stone(&self, row: usize, col: usize) -> Option<Player> {
        Player::from_cell(self.board.get(row, col).unwrap_or(0))
    }

    fn placements_for(&self, _player: Player) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.board.get(row, col).unwrap_or(1) == 0 {
                    cells.push((row, col));
                }
            }
        }
        cells
    }
}

impl GameState for GomokuState {
    type Move = GomokuMove;

    fn legal_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.placements_for(self.current_player)
            .into_iter()
            .map(|(row, col)| GomokuMove(row, col))
            .collect()
    }

    fn apply(&mut self, mv: &Self::Move) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameAlreadyOver);
        }
        if !self.board.is_within_bounds(mv.0, mv.1) {
            return Err(GameError::OutOfBounds {
                row: mv.0,
                col: mv.1,
            });
        }
        if self.board.get(mv.0, mv.1)? != 0 {
            return Err(GameError::PositionOccupied {
                row: mv.0,
                col: mv.1,
            });
        }
        self.board.set(mv.0, mv.1, self.current_player.cell())?;
        self.history.push(UndoRecord {
            row: mv.0,
            col: mv.1,
            prev_last_move: self.last_move,
        });
        self.last_move = Some((mv.0, mv.1));
        self.current_player = self.current_player.opponent();
        self.move_count += 1;
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.move_count as usize == SIZE * SIZE
    }

    fn winner(&self) -> Option<Player> {
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
        let _ = self.board.set(record.row, record.col, 0);
        self.last_move = record.prev_last_move;
        self.current_player = self.current_player.opponent();
        self.move_count -= 1;
        true
    }
}

impl Evaluate for GomokuState {
    fn evaluate(&self, player: Player) -> i32 {
        crate::analysis::evaluate_line_game(self, player)
    }

    /// On a 15x15 board a full-width search is hopeless; explore only
    /// cells near the existing stones, center first on an empty board.
    fn ordered_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        if self.move_count == 0 {
            return vec![GomokuMove(SIZE / 2, SIZE / 2)];
        }
        let mut moves: Vec<GomokuMove> = self
            .placements_for(self.current_player)
            .into_iter()
            .filter(|&(row, col)| self.near_action(row, col))
            .map(|(row, col)| GomokuMove(row, col))
            .collect();
        let center = (SIZE / 2) as i32;
        moves.sort_by_key(|mv| {
            (mv.0 as i32 - center).abs().max((mv.1 as i32 - center).abs())
        });
        moves
    }
}

impl fmt::Display for GomokuMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

impl FromStr for GomokuMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err("Expected format: r,c".to_string());
        }
        let r = parts[0].parse::<usize>().map_err(|e| e.to_string())?;
        let c = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        Ok(GomokuMove(r, c))
    }
}
