//! Stack-based undo log owned by the active game state.
//!
//! Each game defines its own record type carrying exactly the data needed
//! to reverse one completed turn, so undo never has to re-derive anything
//! from the board.

/// A push/pop log of per-turn undo records.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory<E> {
    entries: Vec<E>,
}

impl<E> MoveHistory<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: E) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<E> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&E> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Heap bytes held by the log.
    pub fn memory_usage(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<E>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut history: MoveHistory<u32> = MoveHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.pop(), None);

        history.push(1);
        history.push(2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some(&2));
        assert_eq!(history.pop(), Some(2));
        assert_eq!(history.pop(), Some(1));
        assert!(history.is_empty());
    }

    #[test]
    fn clear_empties_the_log() {
        let mut history: MoveHistory<(usize, usize)> = MoveHistory::new();
        history.push((0, 1));
        history.push((2, 3));
        history.clear();
        assert!(history.is_empty());
    }
}
