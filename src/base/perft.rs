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

//! Perft: exhaustive move-path counting for validating the move generator.
//!
//! `perft(n)` counts the leaves of the depth-`n` game tree under legal move
//! generation.
//! The counts for standard positions are known exactly, so a single wrong
//! edge case (a castling rule, an en-passant pin) changes the total and is
//! caught.

use super::Position;

#[must_use]
/// Count the leaves of the depth-`depth` move tree below `pos`.
///
/// # Examples
///
/// ```
/// use minuet::base::{perft::perft, Position};
///
/// let mut pos = Position::new();
/// assert_eq!(perft(&mut pos, 2), 400);
/// ```
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = pos.legal_moves(pos.side_to_move());
    if depth == 1 {
        // no need to walk the last layer just to count it
        return moves.len() as u64;
    }
    let mut total = 0;
    for m in moves.iter() {
        pos.make(m);
        total += perft(pos, depth - 1);
        let undone = pos.unmake();
        debug_assert!(undone.is_ok());
    }
    total
}

/// Count the leaves below each root move separately, printing one line per
/// move. Handy for diffing against another engine when a perft total is
/// wrong.
pub fn divide(pos: &mut Position, depth: u8) -> u64 {
    let moves = pos.legal_moves(pos.side_to_move());
    let mut total = 0;
    for m in moves.iter() {
        pos.make(m);
        let count = if depth > 1 { perft(pos, depth - 1) } else { 1 };
        let undone = pos.unmake();
        debug_assert!(undone.is_ok());
        println!("{m}: {count}");
        total += count;
    }
    println!("total: {total}");
    total
}
