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

//! The textual move notation spoken at the engine boundary.
//!
//! Castles are `O-O` and `O-O-O`, promotions are `<from><to>=<Letter>` with
//! the letter drawn from {N, B, R, Q}, and every other move is plain
//! `<from><to>`.

use super::{Move, MoveKind, Position};

#[must_use]
/// Write the given move in the boundary notation.
///
/// # Examples
///
/// ```
/// use minuet::base::{algebraic, Move, MoveKind, Square};
///
/// let m = Move::new(Square::E1, Square::G1, MoveKind::KingCastle);
/// assert_eq!(algebraic::format_move(m), "O-O");
/// ```
pub fn format_move(m: Move) -> String {
    match m.kind() {
        MoveKind::KingCastle => "O-O".into(),
        MoveKind::QueenCastle => "O-O-O".into(),
        _ => match m.promotion() {
            Some(kind) => format!("{}{}={}", m.from_square(), m.to_square(), kind.symbol()),
            None => format!("{}{}", m.from_square(), m.to_square()),
        },
    }
}

/// Find the legal move of the side to move which the given string names.
///
/// # Errors
///
/// Returns an `Err` if the string does not name a legal move in `pos`.
pub fn parse_move(s: &str, pos: &Position) -> Result<Move, &'static str> {
    pos.legal_moves(pos.side_to_move())
        .iter()
        .find(|&m| format_move(m) == s)
        .ok_or("string does not name a legal move")
}
