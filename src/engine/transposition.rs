/*
  Minuet, a bitboard chess engine with a neural evaluation boundary.
  Copyright (C) 2024 The Minuet Authors.

  Minuet is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Minuet is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The transposition table: a fixed-size cache of search results keyed by
//! Zobrist hash, shared by every worker of a search.
//!
//! The table has no locks.
//! Workers read and write entries concurrently, so a racing write can tear
//! an entry; every probe therefore verifies the stored full 64-bit key
//! against the query hash before trusting the payload, and a torn entry
//! simply reads as a miss.
//! This key-verified, lock-free design is the only way workers communicate
//! besides the shared best-move record.

use crate::base::Move;

use std::cell::UnsafeCell;

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// What the score of a table entry means.
pub enum Bound {
    /// The slot has never been written.
    /// Zeroed storage decodes to this variant, so a fresh table reads as
    /// all misses.
    Empty = 0,
    /// The score is exact: the search completed inside the window.
    Exact,
    /// The score is a lower bound: the search failed high.
    Lower,
    /// The score is an upper bound: the search failed low.
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// One cached search result.
pub struct TTEntry {
    /// The full Zobrist key of the position this entry describes.
    pub key: u64,
    /// The depth the position was searched to.
    pub depth: i16,
    /// The score of the search, qualified by `kind`.
    pub score: f32,
    /// The best move found, or `Move::NONE` if none was.
    pub best_move: Move,
    /// How to interpret `score`.
    pub kind: Bound,
}

impl TTEntry {
    /// The contents of an unwritten slot.
    const EMPTY: TTEntry = TTEntry {
        key: 0,
        depth: 0,
        score: 0.0,
        best_move: Move::NONE,
        kind: Bound::Empty,
    };
}

/// A table which stores transposition data, behaving much like a hash map
/// from positions to entries.
/// An entry is evicted when a same-slot position arrives with at least its
/// depth (depth-preferred replacement).
pub struct TTable {
    /// The slots. The length is always a power of two.
    slots: Box<[UnsafeCell<TTEntry>]>,
    /// The index mask, `len - 1`.
    mask: u64,
}

// Concurrent slot access is the point of the design; see the module docs
// for why unverified reads are never trusted.
unsafe impl Sync for TTable {}

impl TTable {
    #[must_use]
    /// Construct a table with space for `entries` entries, rounded down to a
    /// power of two (minimum 1).
    pub fn with_entries(entries: usize) -> TTable {
        let len = if entries.is_power_of_two() {
            entries
        } else {
            (entries.next_power_of_two() >> 1).max(1)
        };
        let slots: Box<[UnsafeCell<TTEntry>]> =
            (0..len).map(|_| UnsafeCell::new(TTEntry::EMPTY)).collect();
        TTable {
            slots,
            mask: (len - 1) as u64,
        }
    }

    #[must_use]
    /// The number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn slot(&self, hash: u64) -> *mut TTEntry {
        self.slots[(hash & self.mask) as usize].get()
    }

    #[must_use]
    /// Look up the entry for a hash.
    /// Returns `None` on an empty slot, a key mismatch, or a torn entry
    /// (which cannot match the full key).
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        // SAFETY: the slot pointer is in-bounds, and the copied value is
        // validated by the key comparison before use.
        let entry = unsafe { *self.slot(hash) };
        (entry.kind != Bound::Empty && entry.key == hash).then_some(entry)
    }

    /// Store an entry, replacing the slot's occupant if the slot is empty,
    /// describes the same position, or was searched no deeper than the
    /// newcomer.
    pub fn store(&self, entry: TTEntry) {
        let slot = self.slot(entry.key);
        // SAFETY: in-bounds slot; racing writers may interleave, which the
        // probe-side key check tolerates.
        let current = unsafe { *slot };
        if current.kind == Bound::Empty
            || current.key == entry.key
            || current.depth <= entry.depth
        {
            unsafe { *slot = entry };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{MoveKind, Square};

    fn entry(key: u64, depth: i16, score: f32) -> TTEntry {
        TTEntry {
            key,
            depth,
            score,
            best_move: Move::new(Square::E2, Square::E4, MoveKind::DoublePawnPush),
            kind: Bound::Exact,
        }
    }

    #[test]
    fn probe_miss_on_fresh_table() {
        let table = TTable::with_entries(1024);
        assert_eq!(table.probe(0xDEAD_BEEF), None);
        // hash zero must also miss, not match the zeroed storage
        assert_eq!(table.probe(0), None);
    }

    #[test]
    fn store_then_probe() {
        let table = TTable::with_entries(1024);
        let e = entry(0xABCD, 5, 0.25);
        table.store(e);
        assert_eq!(table.probe(0xABCD), Some(e));
    }

    #[test]
    fn key_mismatch_is_a_miss() {
        let table = TTable::with_entries(1024);
        table.store(entry(0xABCD, 5, 0.25));
        // same slot (differs above the mask bits), different key
        let alias = 0xABCD ^ 0x1_0000_0000;
        assert_eq!(table.probe(alias), None);
    }

    #[test]
    fn replacement_is_depth_preferred() {
        let table = TTable::with_entries(1024);
        let deep = entry(0xABCD, 8, 0.5);
        table.store(deep);

        // a shallower entry for an aliasing key is rejected
        let alias = 0xABCD ^ 0x1_0000_0000;
        table.store(entry(alias, 3, -0.5));
        assert_eq!(table.probe(0xABCD), Some(deep));
        assert_eq!(table.probe(alias), None);

        // an equal-depth entry evicts
        table.store(entry(alias, 8, -0.5));
        assert_eq!(table.probe(alias), Some(entry(alias, 8, -0.5)));

        // the same position always updates, even from a shallower search
        table.store(entry(alias, 2, 0.75));
        assert_eq!(table.probe(alias), Some(entry(alias, 2, 0.75)));
    }

    #[test]
    fn capacity_rounds_down_to_power_of_two() {
        assert_eq!(TTable::with_entries(1000).capacity(), 512);
        assert_eq!(TTable::with_entries(1024).capacity(), 1024);
        assert_eq!(TTable::with_entries(1).capacity(), 1);
    }
}
