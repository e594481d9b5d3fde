//! # Game Implementations Module
//!
//! This module contains the four game variants behind the facade. Each
//! game implements the [`crate::GameState`] trait so the search engines
//! and the facade can operate on any of them uniformly.
//!
//! ## Supported Games
//! - **Connect 4**: Gravity-drop connection game on a 6x7 grid
//! - **Gomoku (Five in a Row)**: Free placement on a 15x15 grid
//! - **L-Game**: Polyomino-movement blockade game on a 4x4 grid
//! - **Trio**: Combinatorial arithmetic puzzle on a pre-filled 7x7 grid
//!
//! ## Adding New Games
//! To add a new game, create a new module and implement:
//! 1. A move type (typically a struct with coordinates)
//! 2. A game state type with the GameState trait and an undo record
//! 3. Display and parsing implementations for moves
//! 4. Game-specific rules and win conditions

pub mod connect4;
pub mod gomoku;
pub mod lgame;
pub mod trio;
