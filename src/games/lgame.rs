//! # L-Game Implementation
//!
//! Edward de Bono's L-Game on a 4x4 board. Each player owns one L-shaped
//! tetromino; two neutral single-cell pieces are shared. A turn mandates
//! moving the player's own L to a different footprint (any of the 8
//! orientations, landing only on empty or self-vacated cells), optionally
//! followed by relocating one neutral piece to an empty cell. A player
//! loses the moment it is their turn and no legal L placement exists.

use crate::board::BitPackedBoard;
use crate::error::GameError;
use crate::history::MoveHistory;
use crate::search::Evaluate;
use crate::{GameState, Player};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const SIZE: usize = 4;
pub const ORIENTATIONS: usize = 8;

/// Board cell value for a neutral piece (players use 1 and 2).
const NEUTRAL_CELL: u8 = 3;

/// Relocation of one of the two neutral pieces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NeutralMove {
    /// Which neutral piece (0 or 1).
    pub index: usize,
    pub to: (usize, usize),
}

/// An L-piece relocation: anchor cell, orientation index and an optional
/// neutral-piece relocation performed after the L lands.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LGameMove {
    pub row: usize,
    pub col: usize,
    pub orientation: usize,
    pub neutral: Option<NeutralMove>,
}

/// The 8 orientations (4 rotations x mirror) of the L tetromino as
/// normalized, sorted offset sets anchored at their top-left bound.
fn orientations() -> &'static [[(usize, usize); 4]; ORIENTATIONS] {
    static TABLE: OnceLock<[[(usize, usize); 4]; ORIENTATIONS]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut unique: HashSet<Vec<(i32, i32)>> = HashSet::new();
        let mut shape: Vec<(i32, i32)> = vec![(0, 0), (1, 0), (2, 0), (2, 1)];
        for _ in 0..2 {
            // Flip
            for _ in 0..4 {
                // Rotate
                unique.insert(normalize(&shape));
                shape = shape.iter().map(|&(r, c)| (-c, r)).collect();
            }
            shape = shape.iter().map(|&(r, c)| (r, -c)).collect();
        }
        let mut all: Vec<Vec<(i32, i32)>> = unique.into_iter().collect();
        all.sort();
        assert_eq!(all.len(), ORIENTATIONS, "L piece must have 8 orientations");
        let mut table = [[(0usize, 0usize); 4]; ORIENTATIONS];
        for (i, shape) in all.iter().enumerate() {
            for (j, &(r, c)) in shape.iter().enumerate() {
                table[i][j] = (r as usize, c as usize);
            }
        }
        table
    })
}

fn normalize(shape: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let min_r = shape.iter().map(|p| p.0).min().unwrap_or(0);
    let min_c = shape.iter().map(|p| p.1).min().unwrap_or(0);
    let mut normalized: Vec<(i32, i32)> = shape
        .iter()
        .map(|&(r, c)| (r - min_r, c - min_c))
        .collect();
    normalized.sort();
    normalized
}

/// Orientation index whose footprint matches `cells`, if the four cells
/// form an L at all.
fn orientation_of(cells: &[(usize, usize); 4]) -> Option<usize> {
    let as_i32: Vec<(i32, i32)> = cells.iter().map(|&(r, c)| (r as i32, c as i32)).collect();
    let normalized = normalize(&as_i32);
    orientations().iter().position(|shape| {
        shape
            .iter()
            .map(|&(r, c)| (r as i32, c as i32))
            .collect::<Vec<_>>()
            == normalized
    })
}

fn sorted(cells: [(usize, usize); 4]) -> [(usize, usize); 4] {
    let mut cells = cells;
    cells.sort();
    cells
}

#[derive(Debug, Clone)]
struct UndoRecord {
    prev_l: [(usize, usize); 4],
    /// (neutral index, previous position) when a neutral was relocated.
    prev_neutral: Option<(usize, (usize, usize))>,
}

#[derive(Debug, Clone)]
pub struct LGameState {
    board: BitPackedBoard<SIZE, SIZE, 2>,
    l_cells: [[(usize, usize); 4]; 2],
    neutrals: [(usize, usize); 2],
    current_player: Player,
    move_count: u32,
    history: MoveHistory<UndoRecord>,
}

impl LGameState {
    /// The classic starting position: both Ls interlocked in the center,
    /// neutral pieces on opposite corners.
    pub fn new() -> Self {
        Self::from_position(
            [(0, 1), (1, 1), (2, 1), (0, 2)],
            [(3, 2), (2, 2), (1, 2), (3, 1)],
            [(0, 0), (3, 3)],
            Player::One,
        )
        .expect("the standard starting position is valid")
    }

    /// Builds a state from explicit piece positions. Rejects overlapping
    /// pieces, out-of-bounds cells and four-cell sets that are not an L.
    pub fn from_position(
        l_one: [(usize, usize); 4],
        l_two: [(usize, usize); 4],
        neutrals: [(usize, usize); 2],
        to_move: Player,
    ) -> Result<Self, GameError> {
        let mut seen = HashSet::new();
        for &(row, col) in l_one.iter().chain(l_two.iter()).chain(neutrals.iter()) {
            if row >= SIZE || col >= SIZE {
                return Err(GameError::OutOfBounds { row, col });
            }
            if !seen.insert((row, col)) {
                return Err(GameError::PositionOccupied { row, col });
            }
        }
        for cells in [&l_one, &l_two] {
            if orientation_of(cells).is_none() {
                return Err(GameError::InvalidMove(
                    "four cells do not form an L piece".to_string(),
                ));
            }
        }
        let mut board = BitPackedBoard::new();
        for &(row, col) in &l_one {
            board.set(row, col, Player::One.cell())?;
        }
        for &(row, col) in &l_two {
            board.set(row, col, Player::Two.cell())?;
        }
        for &(row, col) in &neutrals {
            board.set(row, col, NEUTRAL_CELL)?;
        }
        Ok(Self {
            board,
            l_cells: [sorted(l_one), sorted(l_two)],
            neutrals,
            current_player: to_move,
            move_count: 0,
            history: MoveHistory::new(),
        })
    }

    pub fn neutrals(&self) -> [(usize, usize); 2] {
        self.neutrals
    }

    pub fn l_cells(&self, player: Player) -> [(usize, usize); 4] {
        self.l_cells[Self::index(player)]
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

    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.board.memory_usage() + self.history.memory_usage()
    }

    fn index(player: Player) -> usize {
        match player {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Footprint of `orientation` anchored at (row, col), or an error if
    /// it leaves the board.
    fn footprint(
        row: usize,
        col: usize,
        orientation: usize,
    ) -> Result<[(usize, usize); 4], GameError> {
        if orientation >= ORIENTATIONS {
            return Err(GameError::InvalidMove(format!(
                "orientation {orientation} is not in 0..{ORIENTATIONS}"
            )));
        }
        let shape = &orientations()[orientation];
        let mut cells = [(0usize, 0usize); 4];
        for (i, &(dr, dc)) in shape.iter().enumerate() {
            let r = row + dr;
            let c = col + dc;
            if r >= SIZE || c >= SIZE {
                return Err(GameError::InvalidMove(
                    "L footprint leaves the board".to_string(),
                ));
            }
            cells[i] = (r, c);
        }
        Ok(cells)
    }

    /// A placement is legal when it differs from the piece's current
    /// footprint and covers only empty or self-vacated cells.
    fn placement_is_legal(&self, player: Player, cells: &[(usize, usize); 4]) -> bool {
        let own = &self.l_cells[Self::index(player)];
        if sorted(*cells) == *own {
            return false;
        }
        cells.iter().all(|cell| {
            own.contains(cell)
                || self
                    .board
                    .get(cell.0, cell.1)
                    .map(|v| v == 0)
                    .unwrap_or(false)
        })
    }

    /// All legal (anchor, orientation) placements for `player`'s L piece,
    /// enumerated over every anchor cell and all 8 orientations.
    pub fn legal_l_placements(&self, player: Player) -> Vec<(usize, usize, usize)> {
        let mut placements = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                for orientation in 0..ORIENTATIONS {
                    if let Ok(cells) = Self::footprint(row, col, orientation) {
                        if self.placement_is_legal(player, &cells) {
                            placements.push((row, col, orientation));
                        }
                    }
                }
            }
        }
        placements
    }

    /// Blockade check for the side to move.
    pub fn is_current_player_blocked(&self) -> bool {
        self.legal_l_placements(self.current_player).is_empty()
    }

    /// Cells occupied after moving the current player's L to `new_l`,
    /// excluding the vacated cells.
    fn occupied_after_l(&self, player: Player, new_l: &[(usize, usize); 4]) -> HashSet<(usize, usize)> {
        let mut occupied: HashSet<(usize, usize)> = new_l.iter().copied().collect();
        occupied.extend(self.l_cells[Self::index(player.opponent())]);
        occupied.extend(self.neutrals);
        occupied
    }

    fn validate(&self, mv: &LGameMove) -> Result<[(usize, usize); 4], GameError> {
        if self.is_terminal() {
            return Err(GameError::GameAlreadyOver);
        }
        let cells = Self::footprint(mv.row, mv.col, mv.orientation)?;
        if sorted(cells) == self.l_cells[Self::index(self.current_player)] {
            return Err(GameError::InvalidMove(
                "the L piece must move to a new position".to_string(),
            ));
        }
        if !self.placement_is_legal(self.current_player, &cells) {
            return Err(GameError::InvalidMove(
                "L footprint overlaps an occupied cell".to_string(),
            ));
        }
        if let Some(neutral) = mv.neutral {
            if neutral.index >= 2 {
                return Err(GameError::InvalidMove(format!(
                    "neutral piece index {} is not 0 or 1",
                    neutral.index
                )));
            }
            let (row, col) = neutral.to;
            if row >= SIZE || col >= SIZE {
                return Err(GameError::OutOfBounds { row, col });
            }
            let occupied = self.occupied_after_l(self.current_player, &cells);
            if occupied.contains(&neutral.to) {
                return Err(GameError::PositionOccupied { row, col });
            }
        }
        Ok(cells)
    }
}

impl Default for LGameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LGameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let symbol = match self.board.get(row, col).unwrap_or(0) {
                    1 => "X",
                    2 => "O",
                    3 => "N",
                    _ => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GameState for LGameState {
    type Move = LGameMove;

    fn legal_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for (row, col, orientation) in self.legal_l_placements(self.current_player) {
            moves.push(LGameMove {
                row,
                col,
                orientation,
                neutral: None,
            });
            let cells = match Self::footprint(row, col, orientation) {
                Ok(cells) => cells,
                Err(_) => continue,
            };
            let occupied = self.occupied_after_l(self.current_player, &cells);
            for index in 0..2 {
                for to_row in 0..SIZE {
                    for to_col in 0..SIZE {
                        if !occupied.contains(&(to_row, to_col)) {
                            moves.push(LGameMove {
                                row,
                                col,
                                orientation,
                                neutral: Some(NeutralMove {
                                    index,
                                    to: (to_row, to_col),
                                }),
                            });
                        }
                    }
                }
            }
        }
        moves
    }

    fn apply(&mut self, mv: &Self::Move) -> Result<(), GameError> {
        let cells = self.validate(mv)?;
        let player = self.current_player;
        let index = Self::index(player);
        let prev_l = self.l_cells[index];

        for &(row, col) in &prev_l {
            self.board.set(row, col, 0)?;
        }
        for &(row, col) in &cells {
            self.board.set(row, col, player.cell())?;
        }
        self.l_cells[index] = sorted(cells);

        let mut prev_neutral = None;
        if let Some(neutral) = mv.neutral {
            let from = self.neutrals[neutral.index];
            self.board.set(from.0, from.1, 0)?;
            self.board.set(neutral.to.0, neutral.to.1, NEUTRAL_CELL)?;
            self.neutrals[neutral.index] = neutral.to;
            prev_neutral = Some((neutral.index, from));
        }

        self.history.push(UndoRecord {
            prev_l,
            prev_neutral,
        });
        self.current_player = player.opponent();
        self.move_count += 1;
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.is_current_player_blocked()
    }

    fn winner(&self) -> Option<Player> {
        self.is_current_player_blocked()
            .then(|| self.current_player.opponent())
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
        let player = self.current_player.opponent();
        let index = Self::index(player);

        // Reverse in the opposite order of apply: neutral first, then the
        // L piece (a neutral may sit on a cell the old L is about to
        // reclaim).
        if let Some((neutral_index, from)) = record.prev_neutral {
            let current = self.neutrals[neutral_index];
            let _ = self.board.set(current.0, current.1, 0);
            let _ = self.board.set(from.0, from.1, NEUTRAL_CELL);
            self.neutrals[neutral_index] = from;
        }
        let current_l = self.l_cells[index];
        for &(row, col) in &current_l {
            let _ = self.board.set(row, col, 0);
        }
        for &(row, col) in &record.prev_l {
            let _ = self.board.set(row, col, player.cell());
        }
        self.l_cells[index] = record.prev_l;

        self.current_player = player;
        self.move_count -= 1;
        true
    }
}

impl Evaluate for LGameState {
    /// Mobility evaluation: each legal L placement the opponent cannot
    /// match is an edge toward the blockade.
    fn evaluate(&self, player: Player) -> i32 {
        let own = self.legal_l_placements(player).len() as i32;
        let theirs = self.legal_l_placements(player.opponent()).len() as i32;
        (own - theirs) * 8
    }

    /// Plain L moves first; neutral relocations expand the branching
    /// factor and are explored afterwards.
    fn ordered_moves(&self) -> Vec<Self::Move> {
        let mut moves = self.legal_moves();
        moves.sort_by_key(|mv| mv.neutral.is_some());
        moves
    }
}

impl fmt::Display for LGameMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.neutral {
            Some(neutral) => write!(
                f,
                "{},{},{} n{}->{},{}",
                self.row, self.col, self.orientation, neutral.index, neutral.to.0, neutral.to.1
            ),
            None => write!(f, "{},{},{}", self.row, self.col, self.orientation),
        }
    }
}

impl FromStr for LGameMove {
    type Err = String;

    /// Parses `r,c,o` or `r,c,o,n,nr,nc` where `n` is the neutral index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<usize> = s
            .split(',')
            .map(|p| p.trim().parse::<usize>().map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [row, col, orientation] => Ok(LGameMove {
                row: *row,
                col: *col,
                orientation: *orientation,
                neutral: None,
            }),
            [row, col, orientation, index, to_row, to_col] => Ok(LGameMove {
                row: *row,
                col: *col,
                orientation: *orientation,
                neutral: Some(NeutralMove {
                    index: *index,
                    to: (*to_row, *to_col),
                }),
            }),
            _ => Err("Expected format: r,c,o or r,c,o,n,nr,nc".to_string()),
        }
    }
}
