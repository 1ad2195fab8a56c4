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

//! Piece kinds, which contain no information about their side or current
//! square.
//!
//! Everything that was an inheritance hierarchy in less fortunate engines is
//! a closed sum type here; move generation dispatches on the tag.

use std::fmt::{Display, Formatter, Result};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
/// The kind of a piece.
/// This contains no information about the location of a piece, or of its
/// side.
pub enum PieceKind {
    /// A pawn, the cheapest piece, with limited movement.
    Pawn = 0,
    /// A knight, which can move in an L-shape.
    Knight,
    /// A bishop, which can move arbitrarily far diagonally.
    Bishop,
    /// A rook, which can move arbitrarily far horizontally or vertically.
    Rook,
    /// A queen, which can move like both a rook and a bishop.
    Queen,
    /// A king, which must be defended at all costs.
    King,
}

impl PieceKind {
    /// Total number of piece kinds.
    pub const NUM: usize = 6;

    /// Array containing all piece kinds.
    pub const ALL: [PieceKind; PieceKind::NUM] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// The kinds a pawn may promote to, in the order promotions are emitted
    /// by the move generator.
    pub const PROMOTING: [PieceKind; 4] = [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    #[inline(always)]
    #[must_use]
    /// Get the conventional material value of this kind, in centipawns.
    /// Kings have no material value; they cannot be exchanged.
    pub const fn value(self) -> i32 {
        const VALUES: [i32; PieceKind::NUM] = [100, 300, 300, 500, 900, 0];
        VALUES[self as usize]
    }

    #[must_use]
    /// Get the algebraic symbol of this kind as an uppercase character.
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    #[must_use]
    /// Given an uppercase algebraic symbol, convert it to a piece kind.
    pub const fn from_symbol(c: char) -> Option<PieceKind> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.symbol())
    }
}
