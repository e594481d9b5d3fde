//! # Game Wrapper Module
//!
//! A tagged-enum facade over the four game implementations. Callers that
//! do not care which game is loaded (the CLI, bots, analysis tooling)
//! work against [`GameWrapper`] and [`MoveWrapper`] and get compile-time
//! dispatch without trait objects. The shared methods are generated by a
//! macro so adding a game means adding one variant per enum and one
//! identifier to the macro invocation.

use crate::analysis::{analyze_line_game, GamePhase, PositionAnalysis, ThreatAnalyzer};
use crate::error::GameError;
use crate::games::connect4::{Connect4Move, Connect4State};
use crate::games::gomoku::{GomokuMove, GomokuState};
use crate::games::lgame::{LGameMove, LGameState};
use crate::games::trio::{TrioDifficulty, TrioMove, TrioState};
use crate::search::{Difficulty, Evaluate, Minimax, MonteCarlo};
use crate::{GameState, Player};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fmt;

/// Rollout count per candidate move for the Monte Carlo engine.
const MONTE_CARLO_SIMULATIONS: u32 = 2000;

/// Snapshot returned after every successful move: the updated board,
/// whose turn it is now and the game status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub board: Vec<u8>,
    pub current_player: Player,
    pub is_game_over: bool,
    pub winner: Option<Player>,
    pub move_count: u32,
}

/// One loaded game of any supported variant.
#[derive(Debug, Clone)]
pub enum GameWrapper {
    Connect4(Connect4State),
    Gomoku(GomokuState),
    LGame(LGameState),
    Trio(TrioState),
}

/// A move for whichever variant the wrapper holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MoveWrapper {
    Connect4(Connect4Move),
    Gomoku(GomokuMove),
    LGame(LGameMove),
    Trio(TrioMove),
}

impl fmt::Display for MoveWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveWrapper::Connect4(m) => write!(f, "C4({})", m),
            MoveWrapper::Gomoku(m) => write!(f, "G({})", m),
            MoveWrapper::LGame(m) => write!(f, "L({})", m),
            MoveWrapper::Trio(m) => write!(f, "T({})", m),
        }
    }
}

impl fmt::Display for GameWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameWrapper::Connect4(g) => write!(f, "{}", g),
            GameWrapper::Gomoku(g) => write!(f, "{}", g),
            GameWrapper::LGame(g) => write!(f, "{}", g),
            GameWrapper::Trio(g) => write!(f, "{}", g),
        }
    }
}

macro_rules! impl_game_dispatch {
    ($($variant:ident),*) => {
        impl GameWrapper {
            /// All currently legal moves, wrapped.
            pub fn legal_moves(&self) -> Vec<MoveWrapper> {
                match self {
                    $(GameWrapper::$variant(g) => g
                        .legal_moves()
                        .into_iter()
                        .map(MoveWrapper::$variant)
                        .collect(),)*
                }
            }

            /// Applies a move and reports the resulting game status.
            /// A move of the wrong variant is rejected without touching
            /// the state.
            pub fn make_move(&mut self, mv: &MoveWrapper) -> Result<MoveReport, GameError> {
                match (&mut *self, mv) {
                    $((GameWrapper::$variant(g), MoveWrapper::$variant(m)) => g.apply(m)?,)*
                    #[allow(unreachable_patterns)]
                    _ => {
                        return Err(GameError::InvalidMove(
                            "move does not match the loaded game".to_string(),
                        ))
                    }
                }
                Ok(self.report())
            }

            /// Reverts the most recent move. Returns false on a fresh game.
            pub fn undo_move(&mut self) -> bool {
                match self {
                    $(GameWrapper::$variant(g) => g.undo(),)*
                }
            }

            pub fn is_game_over(&self) -> bool {
                match self {
                    $(GameWrapper::$variant(g) => g.is_terminal(),)*
                }
            }

            pub fn winner(&self) -> Option<Player> {
                match self {
                    $(GameWrapper::$variant(g) => g.winner(),)*
                }
            }

            pub fn current_player(&self) -> Player {
                match self {
                    $(GameWrapper::$variant(g) => g.current_player(),)*
                }
            }

            pub fn move_count(&self) -> u32 {
                match self {
                    $(GameWrapper::$variant(g) => g.move_count(),)*
                }
            }

            /// Flat row-major cell values (0 = empty).
            pub fn board_cells(&self) -> Vec<u8> {
                match self {
                    $(GameWrapper::$variant(g) => g.cells(),)*
                }
            }

            /// Approximate heap plus inline footprint of the game state.
            pub fn memory_usage(&self) -> usize {
                match self {
                    $(GameWrapper::$variant(g) => g.memory_usage(),)*
                }
            }
        }
    };
}

impl_game_dispatch!(Connect4, Gomoku, LGame, Trio);

impl GameWrapper {
    pub fn new_connect4() -> Self {
        GameWrapper::Connect4(Connect4State::new())
    }

    pub fn new_gomoku() -> Self {
        GameWrapper::Gomoku(GomokuState::new())
    }

    pub fn new_lgame() -> Self {
        GameWrapper::LGame(LGameState::new())
    }

    pub fn new_trio(difficulty: TrioDifficulty, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        GameWrapper::Trio(TrioState::generate(difficulty, &mut rng))
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameWrapper::Connect4(_) => "connect4",
            GameWrapper::Gomoku(_) => "gomoku",
            GameWrapper::LGame(_) => "lgame",
            GameWrapper::Trio(_) => "trio",
        }
    }

    /// Board dimensions as (rows, cols).
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            GameWrapper::Connect4(_) => {
                (crate::games::connect4::ROWS, crate::games::connect4::COLS)
            }
            GameWrapper::Gomoku(_) => (crate::games::gomoku::SIZE, crate::games::gomoku::SIZE),
            GameWrapper::LGame(_) => (crate::games::lgame::SIZE, crate::games::lgame::SIZE),
            GameWrapper::Trio(_) => (crate::games::trio::SIZE, crate::games::trio::SIZE),
        }
    }

    fn report(&self) -> MoveReport {
        MoveReport {
            board: self.board_cells(),
            current_player: self.current_player(),
            is_game_over: self.is_game_over(),
            winner: self.winner(),
            move_count: self.move_count(),
        }
    }

    /// Parses a move string in the loaded game's notation.
    pub fn parse_move(&self, input: &str) -> Result<MoveWrapper, String> {
        match self {
            GameWrapper::Connect4(_) => input.parse().map(MoveWrapper::Connect4),
            GameWrapper::Gomoku(_) => input.parse().map(MoveWrapper::Gomoku),
            GameWrapper::LGame(_) => input.parse().map(MoveWrapper::LGame),
            GameWrapper::Trio(_) => input.parse().map(MoveWrapper::Trio),
        }
    }

    /// Picks a move for the side to move.
    ///
    /// Trio is a solver lookup rather than a search: the first solution in
    /// enumeration order, or `None` when the puzzle has none left. Hard
    /// Connect Four switches to Monte Carlo, which outplays depth-six
    /// minimax there; everything else runs minimax at the difficulty's
    /// depth.
    pub fn ai_move(&self, difficulty: Difficulty, seed: u64) -> Option<MoveWrapper> {
        if self.is_game_over() {
            return None;
        }
        match self {
            GameWrapper::Connect4(g) => {
                if difficulty == Difficulty::Hard {
                    MonteCarlo::new(MONTE_CARLO_SIMULATIONS, seed)
                        .with_center_bias(true)
                        .best_move(g)
                        .map(MoveWrapper::Connect4)
                } else {
                    Minimax::for_difficulty(difficulty)
                        .best_move(g)
                        .map(MoveWrapper::Connect4)
                }
            }
            GameWrapper::Gomoku(g) => Minimax::for_difficulty(difficulty)
                .best_move(g)
                .map(MoveWrapper::Gomoku),
            GameWrapper::LGame(g) => Minimax::for_difficulty(difficulty)
                .best_move(g)
                .map(MoveWrapper::LGame),
            GameWrapper::Trio(g) => g.find_solution().map(|solution| {
                MoveWrapper::Trio(TrioMove {
                    cells: solution.cells,
                })
            }),
        }
    }

    /// Like [`ai_move`](Self::ai_move) but answers for an explicit
    /// player, which backs hint queries for the human side.
    pub fn ai_move_for(
        &self,
        difficulty: Difficulty,
        player: Player,
        seed: u64,
    ) -> Option<MoveWrapper> {
        match self {
            GameWrapper::Connect4(g) => {
                if difficulty == Difficulty::Hard {
                    MonteCarlo::new(MONTE_CARLO_SIMULATIONS, seed)
                        .with_center_bias(true)
                        .best_move_for(g, player)
                        .map(MoveWrapper::Connect4)
                } else {
                    Minimax::for_difficulty(difficulty)
                        .best_move_for(g, player)
                        .map(MoveWrapper::Connect4)
                }
            }
            GameWrapper::Gomoku(g) => Minimax::for_difficulty(difficulty)
                .best_move_for(g, player)
                .map(MoveWrapper::Gomoku),
            GameWrapper::LGame(g) => Minimax::for_difficulty(difficulty)
                .best_move_for(g, player)
                .map(MoveWrapper::LGame),
            GameWrapper::Trio(_) => self.ai_move(difficulty, seed),
        }
    }

    /// Positional summary for the side to move.
    pub fn analyze(&self) -> PositionAnalysis {
        let to_move = self.current_player();
        match self {
            GameWrapper::Connect4(g) => analyze_line_game(g, to_move),
            GameWrapper::Gomoku(g) => analyze_line_game(g, to_move),
            GameWrapper::LGame(g) => {
                let pieces = g.cells().iter().filter(|&&c| c != 0).count();
                let mut flipped = g.clone();
                flipped.set_current_player(to_move.opponent());
                let opponent_threats = GameWrapper::LGame(flipped).winning_moves().len();
                PositionAnalysis {
                    current_player_threats: self.winning_moves().len(),
                    opponent_threats,
                    total_pieces: pieces,
                    connectivity_score: 0,
                    phase: GamePhase::from_fill(pieces, 16),
                    evaluation_score: g.evaluate(to_move),
                }
            }
            GameWrapper::Trio(g) => {
                let solutions = g.find_all_solutions().len();
                PositionAnalysis {
                    current_player_threats: solutions,
                    opponent_threats: solutions,
                    total_pieces: 49,
                    connectivity_score: 0,
                    phase: GamePhase::Endgame,
                    evaluation_score: 0,
                }
            }
        }
    }

    /// Moves that end the game in the current player's favor right now.
    pub fn winning_moves(&self) -> Vec<MoveWrapper> {
        if self.is_game_over() {
            return Vec::new();
        }
        let to_move = self.current_player();
        match self {
            GameWrapper::Connect4(g) => ThreatAnalyzer::new(g)
                .winning_cells(to_move)
                .into_iter()
                .map(|(_, col)| MoveWrapper::Connect4(Connect4Move(col)))
                .collect(),
            GameWrapper::Gomoku(g) => ThreatAnalyzer::new(g)
                .winning_cells(to_move)
                .into_iter()
                .map(|(row, col)| MoveWrapper::Gomoku(GomokuMove(row, col)))
                .collect(),
            GameWrapper::LGame(g) => g
                .legal_moves()
                .into_iter()
                .filter(|mv| {
                    g.simulate(mv)
                        .map(|after| after.winner() == Some(to_move))
                        .unwrap_or(false)
                })
                .map(MoveWrapper::LGame)
                .collect(),
            GameWrapper::Trio(g) => g
                .find_all_solutions()
                .into_iter()
                .map(|solution| {
                    MoveWrapper::Trio(TrioMove {
                        cells: solution.cells,
                    })
                })
                .collect(),
        }
    }

    /// Moves the current player must consider to stop an immediate
    /// opponent win. Only the line games have forced blocks; in the
    /// L-Game a blockade depends on the whole reply tree and in Trio a
    /// found solution cannot be prevented.
    pub fn blocking_moves(&self) -> Vec<MoveWrapper> {
        if self.is_game_over() {
            return Vec::new();
        }
        let to_move = self.current_player();
        match self {
            GameWrapper::Connect4(g) => ThreatAnalyzer::new(g)
                .blocking_cells(to_move)
                .into_iter()
                .map(|(_, col)| MoveWrapper::Connect4(Connect4Move(col)))
                .collect(),
            GameWrapper::Gomoku(g) => ThreatAnalyzer::new(g)
                .blocking_cells(to_move)
                .into_iter()
                .map(|(row, col)| MoveWrapper::Gomoku(GomokuMove(row, col)))
                .collect(),
            GameWrapper::LGame(_) | GameWrapper::Trio(_) => Vec::new(),
        }
    }

    /// Moves that raise the current player's open-three count, feeding
    /// the hint overlay for the line games.
    pub fn threatening_moves(&self) -> Vec<MoveWrapper> {
        if self.is_game_over() {
            return Vec::new();
        }
        let to_move = self.current_player();
        match self {
            GameWrapper::Connect4(g) => ThreatAnalyzer::new(g)
                .threatening_cells(to_move)
                .into_iter()
                .map(|(_, col)| MoveWrapper::Connect4(Connect4Move(col)))
                .collect(),
            GameWrapper::Gomoku(g) => ThreatAnalyzer::new(g)
                .threatening_cells(to_move)
                .into_iter()
                .map(|(row, col)| MoveWrapper::Gomoku(GomokuMove(row, col)))
                .collect(),
            GameWrapper::LGame(_) | GameWrapper::Trio(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_display() {
        assert_eq!(
            format!("{}", MoveWrapper::Connect4(Connect4Move(3))),
            "C4(3)"
        );
        assert_eq!(
            format!("{}", MoveWrapper::Gomoku(GomokuMove(7, 7))),
            "G(7,7)"
        );
    }

    #[test]
    fn mismatched_move_is_rejected() {
        let mut game = GameWrapper::new_connect4();
        let err = game.make_move(&MoveWrapper::Gomoku(GomokuMove(0, 0)));
        assert!(matches!(err, Err(GameError::InvalidMove(_))));
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn make_move_reports_status() {
        let mut game = GameWrapper::new_connect4();
        let report = game
            .make_move(&MoveWrapper::Connect4(Connect4Move(3)))
            .unwrap();
        assert_eq!(report.move_count, 1);
        assert!(!report.is_game_over);
        assert!(report.winner.is_none());
        assert_eq!(report.current_player, Player::Two);
        assert_eq!(report.board, game.board_cells());
        // The dropped piece shows up at the bottom of column 3.
        assert_eq!(report.board[5 * 7 + 3], 1);
        assert_eq!(game.current_player(), Player::Two);
    }

    #[test]
    fn undo_through_the_facade() {
        let mut game = GameWrapper::new_gomoku();
        game.make_move(&MoveWrapper::Gomoku(GomokuMove(7, 7)))
            .unwrap();
        assert!(game.undo_move());
        assert_eq!(game.move_count(), 0);
        assert!(!game.undo_move());
    }

    #[test]
    fn board_cells_match_dimensions() {
        for game in [
            GameWrapper::new_connect4(),
            GameWrapper::new_gomoku(),
            GameWrapper::new_lgame(),
            GameWrapper::new_trio(TrioDifficulty::Easy, 1),
        ] {
            let (rows, cols) = game.dimensions();
            assert_eq!(game.board_cells().len(), rows * cols);
        }
    }

    #[test]
    fn winning_and_blocking_moves_on_connect4() {
        let mut game = GameWrapper::new_connect4();
        // Player One builds three in column 2.
        for col in [2, 0, 2, 1, 2] {
            game.make_move(&MoveWrapper::Connect4(Connect4Move(col)))
                .unwrap();
        }
        // Player Two to move: no win, one forced block.
        assert!(game.winning_moves().is_empty());
        assert_eq!(
            game.blocking_moves(),
            vec![MoveWrapper::Connect4(Connect4Move(2))]
        );
    }

    #[test]
    fn trio_ai_returns_the_first_solution() {
        let game = GameWrapper::new_trio(TrioDifficulty::Easy, 5);
        let mv = game.ai_move(Difficulty::Easy, 0);
        match mv {
            Some(MoveWrapper::Trio(mv)) => {
                if let GameWrapper::Trio(state) = &game {
                    assert!(state.check_triple(&mv.cells).unwrap().is_some());
                }
            }
            other => panic!("expected a trio move, got {other:?}"),
        }
    }

    #[test]
    fn parse_move_uses_the_loaded_notation() {
        let connect4 = GameWrapper::new_connect4();
        assert_eq!(
            connect4.parse_move("3"),
            Ok(MoveWrapper::Connect4(Connect4Move(3)))
        );
        let gomoku = GameWrapper::new_gomoku();
        assert_eq!(
            gomoku.parse_move("7,8"),
            Ok(MoveWrapper::Gomoku(GomokuMove(7, 8)))
        );
        assert!(gomoku.parse_move("blorp").is_err());
    }

    #[test]
    fn analyze_reports_threats_for_the_side_to_move() {
        let mut game = GameWrapper::new_connect4();
        for col in [2, 0, 2, 1, 2] {
            game.make_move(&MoveWrapper::Connect4(Connect4Move(col)))
                .unwrap();
        }
        let analysis = game.analyze();
        assert_eq!(analysis.current_player_threats, 0);
        assert_eq!(analysis.opponent_threats, 1);
        assert_eq!(analysis.total_pieces, 5);
    }
}
