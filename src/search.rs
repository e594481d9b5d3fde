//! # Search Engines
//!
//! Two engines drive the computer opponent. [`Minimax`] runs a
//! depth-limited alpha-beta search over [`Evaluate`] games and is the
//! default for every variant. [`MonteCarlo`] estimates each root move by
//! random playouts, batched across moves with rayon, and backs the
//! hardest Connect Four setting where shallow heuristics plateau.
//!
//! Both engines are deterministic for a fixed state (and seed), run to
//! completion inside the call and share no state between calls.

use crate::analysis::WIN_SCORE;
use crate::{GameState, Player};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use tracing::debug;

/// Heuristic scoring hook the minimax engine searches over.
///
/// `evaluate` scores a position from `player`'s perspective; magnitudes
/// stay below [`WIN_SCORE`] so terminal results always dominate.
pub trait Evaluate: GameState {
    fn evaluate(&self, player: Player) -> i32;

    /// Root and interior move ordering. Better-first ordering tightens
    /// alpha-beta windows; the default is unordered legality.
    fn ordered_moves(&self) -> Vec<Self::Move> {
        self.legal_moves()
    }
}

/// Preset search strengths mapped to minimax depths.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }
}

/// Depth-limited minimax with alpha-beta pruning.
#[derive(Clone, Copy, Debug)]
pub struct Minimax {
    depth: u32,
}

impl Minimax {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.depth())
    }

    /// Best move for the side to move, or `None` on a finished or
    /// moveless position. Ties keep the earliest move in the ordering,
    /// so results are reproducible.
    pub fn best_move<G: Evaluate>(&self, state: &G) -> Option<G::Move> {
        if state.is_terminal() {
            return None;
        }
        let perspective = state.current_player();
        let mut best: Option<(G::Move, i32)> = None;
        let mut alpha = i32::MIN + 1;
        for mv in state.ordered_moves() {
            let Ok(child) = state.simulate(&mv) else {
                continue;
            };
            let score = self.search(&child, self.depth, alpha, i32::MAX, perspective);
            if best.as_ref().map(|(_, s)| score > *s).unwrap_or(true) {
                alpha = alpha.max(score);
                best = Some((mv, score));
            }
        }
        if let Some((mv, score)) = &best {
            debug!(depth = self.depth, score, "minimax picked {mv:?}");
        }
        best.map(|(mv, _)| mv)
    }

    /// Best move as if `player` were to move, regardless of whose turn
    /// the position records. Used for hint queries.
    pub fn best_move_for<G: Evaluate>(&self, state: &G, player: Player) -> Option<G::Move> {
        let mut state = state.clone();
        state.set_current_player(player);
        self.best_move(&state)
    }

    /// Position score for `player` at this engine's depth.
    pub fn evaluate_for<G: Evaluate>(&self, state: &G, player: Player) -> i32 {
        self.search(state, self.depth, i32::MIN + 1, i32::MAX, player)
    }

    fn search<G: Evaluate>(
        &self,
        state: &G,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        perspective: Player,
    ) -> i32 {
        if let Some(winner) = state.winner() {
            // Deeper remaining depth means a faster win; prefer it.
            let magnitude = WIN_SCORE + depth as i32;
            return if winner == perspective {
                magnitude
            } else {
                -magnitude
            };
        }
        if state.is_terminal() {
            return 0;
        }
        if depth == 0 {
            return state.evaluate(perspective);
        }
        let maximizing = state.current_player() == perspective;
        let mut best = if maximizing { i32::MIN + 1 } else { i32::MAX };
        let mut expanded = false;
        for mv in state.ordered_moves() {
            let Ok(child) = state.simulate(&mv) else {
                continue;
            };
            expanded = true;
            let score = self.search(&child, depth - 1, alpha, beta, perspective);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }
        if !expanded {
            // No applicable move; score the position as it stands.
            return state.evaluate(perspective);
        }
        best
    }
}

/// Flat Monte Carlo: each root move is scored by seeded random playouts
/// run in parallel per move. Wins count 2, draws 1, so integer totals
/// compare exactly.
#[derive(Clone, Copy, Debug)]
pub struct MonteCarlo {
    simulations: u32,
    seed: u64,
    /// Bias rollouts toward the front of `ordered_moves`, which for
    /// Connect Four means the center columns.
    center_bias: bool,
}

impl MonteCarlo {
    /// Rollouts are capped well past the longest finite game so a cycle
    /// in move application cannot hang a playout.
    const MAX_PLIES: u32 = 512;

    pub fn new(simulations: u32, seed: u64) -> Self {
        Self {
            simulations,
            seed,
            center_bias: false,
        }
    }

    pub fn with_center_bias(mut self, enabled: bool) -> Self {
        self.center_bias = enabled;
        self
    }

    pub fn best_move<G: Evaluate>(&self, state: &G) -> Option<G::Move> {
        if state.is_terminal() {
            return None;
        }
        let perspective = state.current_player();
        let moves = state.ordered_moves();
        if moves.is_empty() {
            return None;
        }
        let totals: Vec<(usize, u64)> = moves
            .par_iter()
            .enumerate()
            .filter_map(|(index, mv)| {
                let child = state.simulate(mv).ok()?;
                // Per-move rng stream, independent of scheduling order.
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(
                    self.seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
                );
                let mut total = 0u64;
                for _ in 0..self.simulations {
                    total += self.rollout(child.clone(), perspective, &mut rng);
                }
                Some((index, total))
            })
            .collect();
        // Stable tie-break on the ordering index.
        let best = totals
            .iter()
            .max_by_key(|&&(index, total)| (total, std::cmp::Reverse(index)))?;
        debug!(
            simulations = self.simulations,
            total = best.1,
            "monte carlo picked {:?}",
            moves[best.0]
        );
        Some(moves[best.0].clone())
    }

    pub fn best_move_for<G: Evaluate>(&self, state: &G, player: Player) -> Option<G::Move> {
        let mut state = state.clone();
        state.set_current_player(player);
        self.best_move(&state)
    }

    fn rollout<G: Evaluate>(
        &self,
        mut state: G,
        perspective: Player,
        rng: &mut Xoshiro256PlusPlus,
    ) -> u64 {
        for _ in 0..Self::MAX_PLIES {
            if state.is_terminal() {
                break;
            }
            let moves = if self.center_bias {
                state.ordered_moves()
            } else {
                state.legal_moves()
            };
            if moves.is_empty() {
                break;
            }
            let index = if self.center_bias {
                // Min of two uniform draws skews toward the list head.
                let a = rng.gen_range(0..moves.len());
                let b = rng.gen_range(0..moves.len());
                a.min(b)
            } else {
                rng.gen_range(0..moves.len())
            };
            if state.apply(&moves[index]).is_err() {
                break;
            }
        }
        match state.winner() {
            Some(winner) if winner == perspective => 2,
            Some(_) => 0,
            None => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::connect4::{Connect4Move, Connect4State};

    /// Player One has three stones in column 2 and it is their turn.
    fn three_in_column() -> Connect4State {
        let mut game = Connect4State::new();
        for col in [2, 0, 2, 1, 2, 0] {
            game.apply(&Connect4Move(col)).unwrap();
        }
        game
    }

    #[test]
    fn difficulty_maps_to_depth() {
        assert_eq!(Difficulty::Easy.depth(), 2);
        assert_eq!(Difficulty::Medium.depth(), 4);
        assert_eq!(Difficulty::Hard.depth(), 6);
    }

    #[test]
    fn minimax_takes_an_immediate_win() {
        let game = three_in_column();
        let engine = Minimax::for_difficulty(Difficulty::Easy);
        assert_eq!(engine.best_move(&game), Some(Connect4Move(2)));
    }

    #[test]
    fn minimax_blocks_the_opponent_threat() {
        // Player Two to move with no win of their own; column 2 must be
        // blocked or Player One wins next turn.
        let mut game = three_in_column();
        game.apply(&Connect4Move(6)).unwrap();
        game.apply(&Connect4Move(5)).unwrap();
        let engine = Minimax::for_difficulty(Difficulty::Easy);
        // Now Player Two is to move again via an extra Player One move.
        assert_eq!(game.current_player(), crate::Player::One);
        game.apply(&Connect4Move(5)).unwrap();
        assert_eq!(engine.best_move(&game), Some(Connect4Move(2)));
    }

    #[test]
    fn minimax_prefers_winning_over_blocking() {
        // Both sides have an open three; the side to move should finish
        // its own line instead of blocking.
        let mut game = Connect4State::new();
        for col in [2, 4, 2, 4, 2, 4] {
            game.apply(&Connect4Move(col)).unwrap();
        }
        let engine = Minimax::for_difficulty(Difficulty::Medium);
        assert_eq!(engine.best_move(&game), Some(Connect4Move(2)));
    }

    #[test]
    fn minimax_returns_none_on_finished_games() {
        let mut game = three_in_column();
        game.apply(&Connect4Move(2)).unwrap();
        assert!(game.is_terminal());
        let engine = Minimax::new(4);
        assert!(engine.best_move(&game).is_none());
    }

    #[test]
    fn best_move_for_overrides_the_turn() {
        // It is Player Two's turn, but the hint asks for Player One.
        let mut game = three_in_column();
        game.apply(&Connect4Move(6)).unwrap();
        let engine = Minimax::new(2);
        assert_eq!(
            engine.best_move_for(&game, crate::Player::One),
            Some(Connect4Move(2))
        );
    }

    #[test]
    fn evaluate_for_sees_the_forced_win() {
        let game = three_in_column();
        let engine = Minimax::new(2);
        assert!(engine.evaluate_for(&game, crate::Player::One) >= WIN_SCORE);
        assert!(engine.evaluate_for(&game, crate::Player::Two) <= -WIN_SCORE);
    }

    #[test]
    fn monte_carlo_is_deterministic_per_seed() {
        let game = three_in_column();
        let engine = MonteCarlo::new(200, 11).with_center_bias(true);
        let first = engine.best_move(&game);
        let second = engine.best_move(&game);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn monte_carlo_takes_an_immediate_win() {
        let game = three_in_column();
        let engine = MonteCarlo::new(400, 3);
        assert_eq!(engine.best_move(&game), Some(Connect4Move(2)));
    }
}
