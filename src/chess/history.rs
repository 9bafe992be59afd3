//! Undo/redo over position snapshots.
//!
//! The history is a list of snapshots with a cursor on the current one. Undoing and
//! redoing move the cursor; recording a move while some moves are undone discards
//! them first.
//!
//! The list is bounded. Once over capacity, the oldest quarter of the snapshots is
//! dropped in one go, which keeps the cost of recording amortized constant. Dropped
//! snapshots no longer count towards repetitions.

use super::{moves::Move, position::Position};

/// Default number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 1024;

/// A position of the game, with the move that led to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub position: Position,
    /// `None` for the position the history was started from.
    pub played: Option<Move>,
    /// Increasing number identifying the entry, kept across evictions.
    pub sequence: u64,
}

#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    capacity: usize,
    next_sequence: u64,
}
impl History {
    /// A history starting at `root`, keeping at most `capacity` snapshots.
    pub fn new(root: Position, capacity: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                position: root,
                played: None,
                sequence: 0,
            }],
            cursor: 0,
            capacity: capacity.max(1),
            next_sequence: 1,
        }
    }

    /// Appends the position reached by playing `played`.
    ///
    /// Entries after the cursor are discarded first, then the new entry becomes the
    /// current one.
    pub fn record(&mut self, position: Position, played: Move) {
        let discarded = self.entries.len() - (self.cursor + 1);
        if discarded > 0 {
            log::trace!("discarding {discarded} undone entries");
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push(HistoryEntry {
            position,
            played: Some(played),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            let evicted = (self.entries.len() / 4).max(1);
            self.entries.drain(..evicted);
            self.cursor -= evicted;
            log::trace!(
                "evicted {evicted} oldest entries, {} left",
                self.entries.len()
            );
        }
    }

    /// Steps back one entry and returns it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        log::trace!("undo, cursor at {}", self.cursor);
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry and returns it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        log::trace!("redo, cursor at {}", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry under the cursor.
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// Index of the current entry among the kept ones.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of kept entries, including undone ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its current entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries up to and including the current one.
    pub fn past(&self) -> &[HistoryEntry] {
        &self.entries[..=self.cursor]
    }

    /// Moves played from the oldest kept entry to the current one.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.past().iter().filter_map(|entry| entry.played.as_ref())
    }

    /// Hashes of the positions up to and including the current one.
    pub fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.past().iter().map(|entry| entry.position.hash())
    }

    /// Number of times a position with `hash` occurred up to the current entry.
    pub fn repetition_count(&self, hash: u64) -> usize {
        self.hashes().filter(|&h| h == hash).count()
    }
}
