//! # boardkit
//!
//! Rules-and-intelligence core shared by four abstract strategy board
//! games: Connect 4 (gravity-drop connection), Gomoku (free-placement
//! five in a row), the L-Game (polyomino-movement blockade) and Trio
//! (combinatorial arithmetic puzzle).
//!
//! The crate is organized leaf-to-root: [`board::BitPackedBoard`] stores
//! cells, the per-game states in [`games`] implement the [`GameState`]
//! capability surface over it, [`analysis`] classifies line threats,
//! [`search`] provides minimax/alpha-beta and Monte Carlo engines, and
//! [`game_wrapper::GameWrapper`] is the facade consumed by callers. The
//! facade never exposes board internals directly.
//!
//! Every public call runs to completion before returning; the core spawns
//! no background work and offers no cancellation. Searches operate only on
//! cloned states, so concurrent searches need no locking, but undo is an
//! exclusive mutation of the one live state and must not race an in-flight
//! search on it.

pub mod analysis;
pub mod board;
pub mod error;
pub mod game_wrapper;
pub mod games;
pub mod history;
pub mod search;

pub use crate::analysis::{GamePhase, PositionAnalysis, ThreatAnalyzer};
pub use crate::board::BitPackedBoard;
pub use crate::error::{BoardError, GameError};
pub use crate::game_wrapper::{GameWrapper, MoveReport, MoveWrapper};
pub use crate::history::MoveHistory;
pub use crate::search::{Difficulty, Evaluate, Minimax, MonteCarlo};

/// One of the two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Cell encoding used by the bit-packed boards (1 or 2; 0 is empty).
    pub fn cell(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_cell(value: u8) -> Option<Player> {
        match value {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

/// The capability surface every game variant implements.
///
/// States are cheap to clone (the boards are packed word arrays), which is
/// what makes simulation-based search affordable. `Send` and `Sync` are
/// required so Monte Carlo playout batches can run on worker threads.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game.
    type Move: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// All moves legal in the current position.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies a move, mutating the state. Rule violations return a typed
    /// error and leave the state unchanged.
    fn apply(&mut self, mv: &Self::Move) -> Result<(), GameError>;

    /// True once the game has been decided (win, draw or blockade).
    fn is_terminal(&self) -> bool;

    /// The winning side, or `None` for a draw or an undecided game.
    fn winner(&self) -> Option<Player>;

    /// The side to move.
    fn current_player(&self) -> Player;

    /// Forces the side to move. Used to build hypothetical states when a
    /// caller asks for analysis from the off-turn player's perspective.
    fn set_current_player(&mut self, player: Player);

    /// Completed turns so far.
    fn move_count(&self) -> u32;

    /// Reverts the most recent completed turn. Returns false when the
    /// history is empty.
    fn undo(&mut self) -> bool;

    /// Applies a move to a clone, leaving `self` untouched.
    fn simulate(&self, mv: &Self::Move) -> Result<Self, GameError> {
        let mut next = self.clone();
        next.apply(mv)?;
        Ok(next)
    }
}
