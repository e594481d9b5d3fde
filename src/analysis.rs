//! # Threat Analysis for Line Games
//!
//! Pattern scanning shared by the line-based games (Connect 4, Gomoku).
//! The analyzer classifies open threes, closed fours and fork cells, and
//! counts immediate winning placements by trial placement plus a local
//! win check. Outputs are coordinate lists so callers can highlight the
//! exact cells involved.

use crate::Player;

/// The four canonical line directions (the reverse directions are covered
/// by scanning both ways from a cell).
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Score granted for a decided position.
pub const WIN_SCORE: i32 = 10_000;

/// Tunable evaluation weights. The exact values are not load-bearing;
/// they are validated against the win/loss regression tests, not derived.
pub const NEAR_WIN_WEIGHT: i32 = 200;
pub const OPEN_PATTERN_WEIGHT: i32 = 40;
pub const OPPONENT_NEAR_WIN_WEIGHT: i32 = 320;
pub const OPPONENT_OPEN_PATTERN_WEIGHT: i32 = 45;
pub const CONNECTIVITY_WEIGHT: i32 = 2;

/// Read-only view of a line game offered to the analyzer.
///
/// `placements_for` yields the cells where a player could legally place a
/// stone this turn: drop rows for gravity games, every empty cell for
/// free-placement games.
pub trait LineGame {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    /// Number of aligned stones needed to win.
    fn win_length(&self) -> usize;
    /// The stone at (row, col), or `None` for an empty cell.
    fn stone(&self, row: usize, col: usize) -> Option<Player>;
    fn placements_for(&self, player: Player) -> Vec<(usize, usize)>;
}

fn stone_at<G: LineGame + ?Sized>(game: &G, row: i32, col: i32) -> Option<Player> {
    if row < 0 || col < 0 || row as usize >= game.rows() || col as usize >= game.cols() {
        return None;
    }
    game.stone(row as usize, col as usize)
}

fn is_empty_cell<G: LineGame + ?Sized>(game: &G, row: i32, col: i32) -> bool {
    row >= 0
        && col >= 0
        && (row as usize) < game.rows()
        && (col as usize) < game.cols()
        && game.stone(row as usize, col as usize).is_none()
}

/// True if placing `player` at (row, col) would complete a winning line.
///
/// The cell itself is treated as the player's stone regardless of its
/// current content, so the same check serves both "did the last move win"
/// (the cell already holds the stone) and trial placement.
pub fn wins_through<G: LineGame + ?Sized>(
    game: &G,
    row: usize,
    col: usize,
    player: Player,
) -> bool {
    let needed = game.win_length();
    for &(dr, dc) in &DIRECTIONS {
        let mut run = 1;
        for sign in [1i32, -1] {
            let mut r = row as i32 + dr * sign;
            let mut c = col as i32 + dc * sign;
            while stone_at(game, r, c) == Some(player) {
                run += 1;
                r += dr * sign;
                c += dc * sign;
            }
        }
        if run >= needed {
            return true;
        }
    }
    false
}

/// Exhaustive full-board win scan. Slower than [`wins_through`]; the games
/// use the local check and this serves as its cross-check.
pub fn scan_for_win<G: LineGame + ?Sized>(game: &G) -> Option<Player> {
    let needed = game.win_length();
    for row in 0..game.rows() {
        for col in 0..game.cols() {
            let Some(player) = game.stone(row, col) else {
                continue;
            };
            for &(dr, dc) in &DIRECTIONS {
                let mut run = 0;
                for k in 0..needed as i32 {
                    if stone_at(game, row as i32 + dr * k, col as i32 + dc * k) == Some(player) {
                        run += 1;
                    } else {
                        break;
                    }
                }
                if run == needed {
                    return Some(player);
                }
            }
        }
    }
    None
}

/// A hypothetical placement layered over a live position, so fork
/// detection never mutates the analyzed state.
struct Overlay<'a, G: LineGame + ?Sized> {
    base: &'a G,
    cell: (usize, usize),
    player: Player,
}

impl<G: LineGame + ?Sized> LineGame for Overlay<'_, G> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }

    fn win_length(&self) -> usize {
        self.base.win_length()
    }

    fn stone(&self, row: usize, col: usize) -> Option<Player> {
        if (row, col) == self.cell {
            Some(self.player)
        } else {
            self.base.stone(row, col)
        }
    }

    fn placements_for(&self, player: Player) -> Vec<(usize, usize)> {
        self.base
            .placements_for(player)
            .into_iter()
            .filter(|&cell| cell != self.cell)
            .collect()
    }
}

/// Pattern scanner over a single position.
pub struct ThreatAnalyzer<'a, G: LineGame + ?Sized> {
    game: &'a G,
}

impl<'a, G: LineGame + ?Sized> ThreatAnalyzer<'a, G> {
    pub fn new(game: &'a G) -> Self {
        Self { game }
    }

    /// Legal placements that would immediately complete a win for `player`.
    pub fn winning_cells(&self, player: Player) -> Vec<(usize, usize)> {
        self.game
            .placements_for(player)
            .into_iter()
            .filter(|&(row, col)| wins_through(self.game, row, col, player))
            .collect()
    }

    /// Cells the opponent would win on, i.e. the forced blocks for `player`.
    pub fn blocking_cells(&self, player: Player) -> Vec<(usize, usize)> {
        self.winning_cells(player.opponent())
    }

    /// Number of immediate winning placements for `player`.
    pub fn threat_count(&self, player: Player) -> usize {
        self.winning_cells(player).len()
    }

    /// Runs of exactly three stones with both line extensions empty.
    /// Each entry lists the three stone coordinates.
    pub fn open_threes(&self, player: Player) -> Vec<[(usize, usize); 3]> {
        self.exact_runs(player, 3)
            .into_iter()
            .filter_map(|(start, dir, open_ends)| {
                (open_ends == 2).then(|| Self::run_cells::<3>(start, dir))
            })
            .collect()
    }

    /// Runs of exactly four stones with exactly one open extension.
    pub fn closed_fours(&self, player: Player) -> Vec<[(usize, usize); 4]> {
        self.exact_runs(player, 4)
            .into_iter()
            .filter_map(|(start, dir, open_ends)| {
                (open_ends == 1).then(|| Self::run_cells::<4>(start, dir))
            })
            .collect()
    }

    /// Empty cells whose occupation would create two or more simultaneous
    /// open threes: the double-three fork.
    pub fn fork_cells(&self, player: Player) -> Vec<(usize, usize)> {
        self.game
            .placements_for(player)
            .into_iter()
            .filter(|&cell| {
                let overlay = Overlay {
                    base: self.game,
                    cell,
                    player,
                };
                let through = ThreatAnalyzer::new(&overlay)
                    .open_threes(player)
                    .into_iter()
                    .filter(|run| run.contains(&cell))
                    .count();
                through >= 2
            })
            .collect()
    }

    /// Empty cells whose occupation creates at least one new open three.
    pub fn threatening_cells(&self, player: Player) -> Vec<(usize, usize)> {
        let baseline = self.open_threes(player).len();
        self.game
            .placements_for(player)
            .into_iter()
            .filter(|&cell| {
                let overlay = Overlay {
                    base: self.game,
                    cell,
                    player,
                };
                ThreatAnalyzer::new(&overlay).open_threes(player).len() > baseline
            })
            .collect()
    }

    /// Maximal runs of exactly `length` stones for `player`, reported as
    /// (start cell, direction, number of empty extension cells).
    fn exact_runs(&self, player: Player, length: usize) -> Vec<((usize, usize), (i32, i32), u8)> {
        let mut runs = Vec::new();
        for row in 0..self.game.rows() {
            for col in 0..self.game.cols() {
                if self.game.stone(row, col) != Some(player) {
                    continue;
                }
                for &(dr, dc) in &DIRECTIONS {
                    // Only start counting at the head of a run.
                    if stone_at(self.game, row as i32 - dr, col as i32 - dc) == Some(player) {
                        continue;
                    }
                    let mut run = 0;
                    while stone_at(
                        self.game,
                        row as i32 + dr * run,
                        col as i32 + dc * run,
                    ) == Some(player)
                    {
                        run += 1;
                    }
                    if run as usize != length {
                        continue;
                    }
                    let mut open_ends = 0u8;
                    if is_empty_cell(self.game, row as i32 - dr, col as i32 - dc) {
                        open_ends += 1;
                    }
                    if is_empty_cell(self.game, row as i32 + dr * run, col as i32 + dc * run) {
                        open_ends += 1;
                    }
                    runs.push(((row, col), (dr, dc), open_ends));
                }
            }
        }
        runs
    }

    fn run_cells<const N: usize>(start: (usize, usize), dir: (i32, i32)) -> [(usize, usize); N] {
        std::array::from_fn(|k| {
            (
                (start.0 as i32 + dir.0 * k as i32) as usize,
                (start.1 as i32 + dir.1 * k as i32) as usize,
            )
        })
    }
}

/// Coarse game phase derived from board fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Opening,
    Middle,
    Endgame,
}

impl GamePhase {
    pub fn from_fill(pieces: usize, capacity: usize) -> GamePhase {
        if pieces * 4 < capacity {
            GamePhase::Opening
        } else if pieces * 3 < capacity * 2 {
            GamePhase::Middle
        } else {
            GamePhase::Endgame
        }
    }
}

/// Phase-dependent evaluation weighting. Connectivity matters most while
/// the board is open; concrete line patterns dominate once it fills up.
#[derive(Debug, Clone, Copy)]
pub struct GamePhaseWeights {
    pub pattern: i32,
    pub connectivity: i32,
}

impl GamePhaseWeights {
    pub fn for_phase(phase: GamePhase) -> GamePhaseWeights {
        match phase {
            GamePhase::Opening => GamePhaseWeights {
                pattern: 1,
                connectivity: 3,
            },
            GamePhase::Middle => GamePhaseWeights {
                pattern: 2,
                connectivity: 2,
            },
            GamePhase::Endgame => GamePhaseWeights {
                pattern: 3,
                connectivity: 1,
            },
        }
    }
}

/// Derived read-only snapshot of a position. Computed on demand, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionAnalysis {
    pub current_player_threats: usize,
    pub opponent_threats: usize,
    pub total_pieces: usize,
    pub connectivity_score: i32,
    pub phase: GamePhase,
    pub evaluation_score: i32,
}

/// Number of adjacent same-player stone pairs, each counted once.
pub fn connectivity<G: LineGame + ?Sized>(game: &G, player: Player) -> i32 {
    let mut pairs = 0;
    for row in 0..game.rows() {
        for col in 0..game.cols() {
            if game.stone(row, col) != Some(player) {
                continue;
            }
            for &(dr, dc) in &DIRECTIONS {
                if stone_at(game, row as i32 + dr, col as i32 + dc) == Some(player) {
                    pairs += 1;
                }
            }
        }
    }
    pairs
}

/// Heuristic evaluation of a line game from `player`'s perspective.
///
/// Scans every window of `win_length` cells in the four directions and
/// scores it by how close either side is to completing it, then adds a
/// connectivity term. Pattern and connectivity weights shift with the
/// game phase.
pub fn evaluate_line_game<G: LineGame + ?Sized>(game: &G, player: Player) -> i32 {
    let needed = game.win_length() as i32;
    let mut pattern_score = 0i64;

    for row in 0..game.rows() as i32 {
        for col in 0..game.cols() as i32 {
            for &(dr, dc) in &DIRECTIONS {
                let end_r = row + dr * (needed - 1);
                let end_c = col + dc * (needed - 1);
                if end_r < 0
                    || end_c < 0
                    || end_r >= game.rows() as i32
                    || end_c >= game.cols() as i32
                {
                    continue;
                }
                let mut own = 0;
                let mut opp = 0;
                for k in 0..needed {
                    match stone_at(game, row + dr * k, col + dc * k) {
                        Some(p) if p == player => own += 1,
                        Some(_) => opp += 1,
                        None => {}
                    }
                }
                pattern_score += score_window(own, opp, needed) as i64;
            }
        }
    }

    let pieces = (0..game.rows())
        .flat_map(|r| (0..game.cols()).map(move |c| (r, c)))
        .filter(|&(r, c)| game.stone(r, c).is_some())
        .count();
    let phase = GamePhase::from_fill(pieces, game.rows() * game.cols());
    let weights = GamePhaseWeights::for_phase(phase);

    let connect = connectivity(game, player) - connectivity(game, player.opponent());
    let score = pattern_score * weights.pattern as i64
        + (connect * CONNECTIVITY_WEIGHT * weights.connectivity) as i64;
    score.clamp(-(WIN_SCORE as i64 - 1), WIN_SCORE as i64 - 1) as i32
}

fn score_window(own: i32, opp: i32, needed: i32) -> i32 {
    if own > 0 && opp > 0 {
        return 0; // dead window
    }
    if own == needed {
        WIN_SCORE
    } else if own == needed - 1 {
        NEAR_WIN_WEIGHT
    } else if own == needed - 2 && own > 0 {
        OPEN_PATTERN_WEIGHT
    } else if opp == needed {
        -WIN_SCORE
    } else if opp == needed - 1 {
        -OPPONENT_NEAR_WIN_WEIGHT
    } else if opp == needed - 2 && opp > 0 {
        -OPPONENT_OPEN_PATTERN_WEIGHT
    } else {
        0
    }
}

/// Full snapshot used by the facade's analyze operation.
pub fn analyze_line_game<G: LineGame + ?Sized>(game: &G, to_move: Player) -> PositionAnalysis {
    let analyzer = ThreatAnalyzer::new(game);
    let pieces = (0..game.rows())
        .flat_map(|r| (0..game.cols()).map(move |c| (r, c)))
        .filter(|&(r, c)| game.stone(r, c).is_some())
        .count();
    PositionAnalysis {
        current_player_threats: analyzer.threat_count(to_move),
        opponent_threats: analyzer.threat_count(to_move.opponent()),
        total_pieces: pieces,
        connectivity_score: connectivity(game, to_move) - connectivity(game, to_move.opponent()),
        phase: GamePhase::from_fill(pieces, game.rows() * game.cols()),
        evaluation_score: evaluate_line_game(game, to_move),
    }
}
