//! # Trio Implementation
//!
//! A 7x7 grid filled with digits 1-9 and a shared target number. Players
//! race to find three cells in a straight, gapless line whose values
//! satisfy `a*b+c = target` or `a*b-c = target`, reading the line in
//! order. The first correct claim wins. A solver enumerates all 240
//! directed triples so the engine can hint, validate and generate
//! puzzles with a bounded solution count.

use crate::board::BitPackedBoard;
use crate::error::GameError;
use crate::history::MoveHistory;
use crate::{GameState, Player};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const SIZE: usize = 7;

/// The eight reading directions: rows, columns and both diagonals, each
/// traversed both ways. A triple (a, b, c) read left-to-right is a
/// different candidate than (c, b, a) read right-to-left.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TrioOp {
    Add,
    Sub,
}

impl fmt::Display for TrioOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrioOp::Add => write!(f, "+"),
            TrioOp::Sub => write!(f, "-"),
        }
    }
}

/// A verified arithmetic hit: the ordered cells, their digit values and
/// the operation that reaches the target.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Solution {
    pub cells: [(usize, usize); 3],
    pub values: [u8; 3],
    pub op: TrioOp,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.values;
        let result = match self.op {
            TrioOp::Add => a as i32 * b as i32 + c as i32,
            TrioOp::Sub => a as i32 * b as i32 - c as i32,
        };
        write!(f, "{}*{}{}{} = {}", a, b, self.op, c, result)
    }
}

/// Solution census for a (board, target) pair, used to grade generated
/// puzzles. The difficulty score grows as solutions get scarcer:
/// 100 for a unique solution, down toward 0 as they multiply, 0 when
/// the target is unreachable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SolutionStats {
    pub count: usize,
    pub plus_count: usize,
    pub minus_count: usize,
    pub difficulty_score: u32,
}

/// Puzzle difficulty steers the digit distribution and the acceptable
/// number of solutions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrioDifficulty {
    /// Small digits dominate, many reachable targets.
    Easy,
    /// Flat digit distribution, between one and four solutions.
    Hard,
}

/// A claim of three ordered cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TrioMove {
    pub cells: [(usize, usize); 3],
}

/// All 240 directed straight-line triples on the 7x7 grid: 70 per axis
/// and 50 per diagonal orientation.
pub fn adjacent_triples() -> &'static [[(usize, usize); 3]] {
    static TRIPLES: OnceLock<Vec<[(usize, usize); 3]>> = OnceLock::new();
    TRIPLES.get_or_init(|| {
        let mut triples = Vec::new();
        for row in 0..SIZE as i32 {
            for col in 0..SIZE as i32 {
                for (dr, dc) in DIRECTIONS {
                    let end_r = row + 2 * dr;
                    let end_c = col + 2 * dc;
                    if (0..SIZE as i32).contains(&end_r) && (0..SIZE as i32).contains(&end_c) {
                        triples.push([
                            (row as usize, col as usize),
                            ((row + dr) as usize, (col + dc) as usize),
                            (end_r as usize, end_c as usize),
                        ]);
                    }
                }
            }
        }
        triples
    })
}

/// True when the three cells are consecutive on one straight line, in
/// reading order.
fn is_directed_triple(cells: &[(usize, usize); 3]) -> bool {
    let [a, b, c] = cells;
    let dr1 = b.0 as i32 - a.0 as i32;
    let dc1 = b.1 as i32 - a.1 as i32;
    let dr2 = c.0 as i32 - b.0 as i32;
    let dc2 = c.1 as i32 - b.1 as i32;
    DIRECTIONS.contains(&(dr1, dc1)) && (dr1, dc1) == (dr2, dc2)
}

#[derive(Debug, Clone)]
struct UndoRecord {
    solution: Solution,
}

#[derive(Debug, Clone)]
pub struct TrioState {
    board: BitPackedBoard<SIZE, SIZE, 4>,
    target: u8,
    current_player: Player,
    move_count: u32,
    winner: Option<Player>,
    history: MoveHistory<UndoRecord>,
}

impl TrioState {
    /// Builds a puzzle from an explicit digit grid (row-major, values
    /// 1-9) and target.
    pub fn from_grid(grid: [[u8; SIZE]; SIZE], target: u8) -> Result<Self, GameError> {
        let mut board = BitPackedBoard::new();
        for (row, row_values) in grid.iter().enumerate() {
            for (col, &value) in row_values.iter().enumerate() {
                if !(1..=9).contains(&value) {
                    return Err(GameError::InvalidMove(format!(
                        "cell ({row},{col}) holds {value}, digits must be 1-9"
                    )));
                }
                board.set(row, col, value)?;
            }
        }
        Ok(Self {
            board,
            target,
            current_player: Player::One,
            move_count: 0,
            winner: None,
            history: MoveHistory::new(),
        })
    }

    /// Generates a random puzzle whose solution count fits the
    /// difficulty band. Falls back to the last attempt if no board
    /// within the band shows up after a bounded number of tries.
    pub fn generate<R: Rng + ?Sized>(difficulty: TrioDifficulty, rng: &mut R) -> Self {
        // Digit weights for 1..=9. Easy boards skew toward small digits
        // so products cluster in a narrow, reachable range.
        let weights: [u32; 9] = match difficulty {
            TrioDifficulty::Easy => [5, 5, 4, 4, 3, 2, 2, 1, 1],
            TrioDifficulty::Hard => [2, 2, 2, 2, 2, 2, 2, 2, 2],
        };
        let (min_solutions, max_solutions) = match difficulty {
            TrioDifficulty::Easy => (3, usize::MAX),
            TrioDifficulty::Hard => (1, 4),
        };
        let dist = WeightedIndex::new(weights).expect("digit weights are positive");

        let mut fallback: Option<Self> = None;
        for _ in 0..64 {
            let mut grid = [[0u8; SIZE]; SIZE];
            for row in grid.iter_mut() {
                for cell in row.iter_mut() {
                    *cell = dist.sample(rng) as u8 + 1;
                }
            }
            let mut state = Self::from_grid(grid, 1).expect("sampled digits are in 1-9");
            // Grade every target, keeping those inside the difficulty
            // band and remembering any reachable one as a fallback.
            let mut in_band = Vec::new();
            let mut reachable = Vec::new();
            for target in 1..=90u8 {
                state.target = target;
                let count = state.solution_stats().count;
                if count > 0 {
                    reachable.push(target);
                }
                if (min_solutions..=max_solutions).contains(&count) {
                    in_band.push(target);
                }
            }
            if !in_band.is_empty() {
                state.target = in_band[rng.gen_range(0..in_band.len())];
                return state;
            }
            if fallback.is_none() {
                if let Some(&target) = reachable.first() {
                    state.target = target;
                    fallback = Some(state);
                }
            }
        }
        fallback.unwrap_or_else(|| {
            Self::from_grid([[1; SIZE]; SIZE], 2).expect("constant grid is valid")
        })
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn value(&self, row: usize, col: usize) -> Result<u8, GameError> {
        Ok(self.board.get(row, col)?)
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

    /// Checks one ordered triple against the target. Bent, gapped or
    /// misordered triples are simply no match, not an error; only
    /// off-board cells are. `Add` is preferred when both operations
    /// would hit, which cannot happen with nonzero digits.
    pub fn check_triple(&self, cells: &[(usize, usize); 3]) -> Result<Option<Solution>, GameError> {
        for &(row, col) in cells {
            if row >= SIZE || col >= SIZE {
                return Err(GameError::OutOfBounds { row, col });
            }
        }
        if !is_directed_triple(cells) {
            return Ok(None);
        }
        let a = self.board.get(cells[0].0, cells[0].1)?;
        let b = self.board.get(cells[1].0, cells[1].1)?;
        let c = self.board.get(cells[2].0, cells[2].1)?;
        let product = a as i32 * b as i32;
        let target = self.target as i32;
        let op = if product + c as i32 == target {
            Some(TrioOp::Add)
        } else if product - c as i32 == target {
            Some(TrioOp::Sub)
        } else {
            None
        };
        Ok(op.map(|op| Solution {
            cells: *cells,
            values: [a, b, c],
            op,
        }))
    }

    /// Every solution for the current target, in triple enumeration
    /// order.
    pub fn find_all_solutions(&self) -> Vec<Solution> {
        adjacent_triples()
            .iter()
            .filter_map(|cells| self.check_triple(cells).ok().flatten())
            .collect()
    }

    /// The first solution in enumeration order, if any.
    pub fn find_solution(&self) -> Option<Solution> {
        adjacent_triples()
            .iter()
            .find_map(|cells| self.check_triple(cells).ok().flatten())
    }

    pub fn solution_stats(&self) -> SolutionStats {
        let mut stats = SolutionStats::default();
        for solution in self.find_all_solutions() {
            stats.count += 1;
            match solution.op {
                TrioOp::Add => stats.plus_count += 1,
                TrioOp::Sub => stats.minus_count += 1,
            }
        }
        if stats.count > 0 {
            stats.difficulty_score = (100 / stats.count as u32).min(100);
        }
        stats
    }
}

impl fmt::Display for TrioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "target: {}", self.target)?;
        for row in 0..SIZE {
            for col in 0..SIZE {
                write!(f, "{} ", self.board.get(row, col).unwrap_or(0))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GameState for TrioState {
    type Move = TrioMove;

    /// The remaining valid claims. The board never changes, so this is
    /// exactly the solver's output.
    fn legal_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.find_all_solutions()
            .into_iter()
            .map(|solution| TrioMove {
                cells: solution.cells,
            })
            .collect()
    }

    fn apply(&mut self, mv: &Self::Move) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameAlreadyOver);
        }
        let solution = self.check_triple(&mv.cells)?.ok_or_else(|| {
            GameError::InvalidMove(format!(
                "claim is not a straight-line triple reaching target {}",
                self.target
            ))
        })?;
        self.winner = Some(self.current_player);
        self.history.push(UndoRecord { solution });
        self.current_player = self.current_player.opponent();
        self.move_count += 1;
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.find_solution().is_none()
    }

    fn winner(&self) -> Option<Player> {
        self.winner
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
        if self.history.pop().is_none() {
            return false;
        }
        self.winner = None;
        self.current_player = self.current_player.opponent();
        self.move_count -= 1;
        true
    }
}

impl fmt::Display for TrioMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.cells;
        write!(f, "{},{} {},{} {},{}", a.0, a.1, b.0, b.1, c.0, c.1)
    }
}

impl FromStr for TrioMove {
    type Err = String;

    /// Parses `r1,c1,r2,c2,r3,c3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<usize> = s
            .split(',')
            .map(|p| p.trim().parse::<usize>().map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [r1, c1, r2, c2, r3, c3] => Ok(TrioMove {
                cells: [(*r1, *c1), (*r2, *c2), (*r3, *c3)],
            }),
            _ => Err("Expected format: r1,c1,r2,c2,r3,c3".to_string()),
        }
    }
}
