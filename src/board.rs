//! # Bit-Packed Board Storage
//!
//! Fixed-size grid storage with a configurable number of bits per cell.
//! A 6x7 Connect 4 board at 2 bits per cell fits in two 64-bit words, and
//! cloning a board for search-tree branching is a plain word-array copy
//! rather than a cell-by-cell walk.
//!
//! The board also maintains per-column fill counters so that gravity games
//! can answer "lowest empty row in this column" in O(1) instead of scanning.

use crate::error::BoardError;

/// A fixed R x C grid storing `B`-bit values in packed 64-bit words.
///
/// `B` must divide 64 so a cell never straddles a word boundary; the games
/// in this crate use 2 bits (empty / player 1 / player 2 / neutral) or
/// 4 bits (digits 1-9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPackedBoard<const R: usize, const C: usize, const B: usize> {
    words: Vec<u64>,
    /// Non-empty cells per column, maintained by `set`.
    column_counts: Vec<u16>,
}

impl<const R: usize, const C: usize, const B: usize> BitPackedBoard<R, C, B> {
    /// Largest value representable in a cell.
    pub const MAX_VALUE: u8 = ((1u16 << B) - 1) as u8;

    pub fn new() -> Self {
        assert!(B > 0 && 64 % B == 0, "cell width must divide 64");
        let words = (R * C * B).div_ceil(64);
        Self {
            words: vec![0; words],
            column_counts: vec![0; C],
        }
    }

    pub const fn rows(&self) -> usize {
        R
    }

    pub const fn cols(&self) -> usize {
        C
    }

    /// True if (row, col) lies inside the grid.
    pub fn is_within_bounds(&self, row: usize, col: usize) -> bool {
        row < R && col < C
    }

    fn locate(row: usize, col: usize) -> (usize, u32) {
        let bit = (row * C + col) * B;
        (bit / 64, (bit % 64) as u32)
    }

    /// Reads the value stored at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<u8, BoardError> {
        if !self.is_within_bounds(row, col) {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                rows: R,
                cols: C,
            });
        }
        let (word, shift) = Self::locate(row, col);
        Ok(((self.words[word] >> shift) & Self::MAX_VALUE as u64) as u8)
    }

    /// Stores `value` at (row, col), updating the column fill counter.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), BoardError> {
        if !self.is_within_bounds(row, col) {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                rows: R,
                cols: C,
            });
        }
        if value > Self::MAX_VALUE {
            return Err(BoardError::ValueTooWide { value, bits: B });
        }
        let (word, shift) = Self::locate(row, col);
        let old = ((self.words[word] >> shift) & Self::MAX_VALUE as u64) as u8;
        self.words[word] &= !((Self::MAX_VALUE as u64) << shift);
        self.words[word] |= (value as u64) << shift;
        if old == 0 && value != 0 {
            self.column_counts[col] += 1;
        } else if old != 0 && value == 0 {
            self.column_counts[col] -= 1;
        }
        Ok(())
    }

    /// Resets every cell to zero.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.column_counts.fill(0);
    }

    /// Number of cells currently holding `value`.
    pub fn count_value(&self, value: u8) -> usize {
        let mut count = 0;
        for row in 0..R {
            for col in 0..C {
                let (word, shift) = Self::locate(row, col);
                if ((self.words[word] >> shift) & Self::MAX_VALUE as u64) as u8 == value {
                    count += 1;
                }
            }
        }
        count
    }

    /// Total non-empty cells across the board.
    pub fn occupied_cells(&self) -> usize {
        self.column_counts.iter().map(|&c| c as usize).sum()
    }

    /// Number of non-empty cells in `col`. A column outside the grid
    /// reports as completely full, so it can never be played into.
    ///
    /// Only meaningful as a height for gravity games, where columns fill
    /// contiguously from the bottom row upward.
    pub fn column_height(&self, col: usize) -> usize {
        self.column_counts.get(col).map_or(R, |&count| count as usize)
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.column_height(col) >= R
    }

    /// Lowest empty row in `col` (row 0 is the top), or `None` when the
    /// column is full or outside the grid.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        let height = self.column_height(col);
        if height >= R {
            None
        } else {
            Some(R - 1 - height)
        }
    }

    /// Heap bytes held by this board.
    pub fn memory_usage(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
            + self.column_counts.len() * std::mem::size_of::<u16>()
    }
}

impl<const R: usize, const C: usize, const B: usize> Default for BitPackedBoard<R, C, B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type C4Board = BitPackedBoard<6, 7, 2>;
    type TrioBoard = BitPackedBoard<7, 7, 4>;

    #[test]
    fn new_board_is_empty() {
        let board = C4Board::new();
        for row in 0..6 {
            for col in 0..7 {
                assert_eq!(board.get(row, col).unwrap(), 0);
            }
        }
        assert_eq!(board.occupied_cells(), 0);
    }

    #[test]
    fn word_count_is_minimal() {
        // 6*7*2 = 84 bits -> 2 words; 7*7*4 = 196 bits -> 4 words
        assert_eq!(C4Board::new().memory_usage(), 2 * 8 + 7 * 2);
        assert_eq!(TrioBoard::new().memory_usage(), 4 * 8 + 7 * 2);
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut board = TrioBoard::new();
        board.set(3, 4, 9).unwrap();
        assert_eq!(board.get(3, 4).unwrap(), 9);
        assert_eq!(board.get(3, 5).unwrap(), 0);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut board = C4Board::new();
        assert!(matches!(
            board.get(6, 0),
            Err(BoardError::OutOfBounds { row: 6, .. })
        ));
        assert!(matches!(
            board.set(0, 7, 1),
            Err(BoardError::OutOfBounds { col: 7, .. })
        ));
        assert!(!board.is_within_bounds(6, 0));
        assert!(board.is_within_bounds(5, 6));
    }

    #[test]
    fn oversized_value_is_rejected() {
        let mut board = C4Board::new();
        assert_eq!(
            board.set(0, 0, 4),
            Err(BoardError::ValueTooWide { value: 4, bits: 2 })
        );
        assert_eq!(board.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn column_counters_track_set_and_clear() {
        let mut board = C4Board::new();
        board.set(5, 3, 1).unwrap();
        board.set(4, 3, 2).unwrap();
        assert_eq!(board.column_height(3), 2);
        assert_eq!(board.drop_row(3), Some(3));

        // Overwriting a non-empty cell must not change the height.
        board.set(5, 3, 2).unwrap();
        assert_eq!(board.column_height(3), 2);

        board.set(4, 3, 0).unwrap();
        assert_eq!(board.column_height(3), 1);
        assert_eq!(board.drop_row(3), Some(4));
    }

    #[test]
    fn out_of_range_column_reports_full_without_panicking() {
        let board = C4Board::new();
        assert_eq!(board.column_height(7), 6);
        assert!(board.is_column_full(7));
        assert_eq!(board.drop_row(7), None);
    }

    #[test]
    fn full_column_has_no_drop_row() {
        let mut board = C4Board::new();
        for row in 0..6 {
            board.set(row, 0, 1).unwrap();
        }
        assert!(board.is_column_full(0));
        assert_eq!(board.drop_row(0), None);
    }

    proptest! {
        /// Cloning yields an identical board, and mutating the clone never
        /// touches the source.
        #[test]
        fn clone_is_deep(cells in proptest::collection::vec((0..6usize, 0..7usize, 1..=3u8), 0..30)) {
            let mut board = C4Board::new();
            for &(row, col, value) in &cells {
                board.set(row, col, value).unwrap();
            }
            let mut copy = board.clone();
            for row in 0..6 {
                for col in 0..7 {
                    prop_assert_eq!(copy.get(row, col).unwrap(), board.get(row, col).unwrap());
                }
            }
            copy.set(0, 0, 3).unwrap();
            copy.set(5, 6, 0).unwrap();
            prop_assert_eq!(board.get(0, 0).unwrap(), {
                let original = cells.iter().rev().find(|&&(r, c, _)| (r, c) == (0, 0));
                original.map_or(0, |&(_, _, v)| v)
            });
        }

        /// The cached drop row always matches an exhaustive column scan,
        /// provided pieces stack from the bottom as in gravity games.
        #[test]
        fn drop_row_matches_scan(heights in proptest::collection::vec(0..=6usize, 7)) {
            let mut board = C4Board::new();
            for (col, &height) in heights.iter().enumerate() {
                for i in 0..height {
                    board.set(5 - i, col, 1 + (i % 2) as u8).unwrap();
                }
            }
            for col in 0..7 {
                let scanned = (0..6).rev().find(|&row| board.get(row, col).unwrap() == 0);
                prop_assert_eq!(board.drop_row(col), scanned);
            }
        }
    }
}
