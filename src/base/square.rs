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

//! Squares, which are positions on a board.
//!
//! Squares are numbered from the top-left corner of the board as White sees
//! it: a8 is 0, h8 is 7, a1 is 56, and h1 is 63.
//! The row of a square is `sq / 8` (row 0 is rank 8) and its column is
//! `sq % 8` (column 0 is the a-file).

use std::{
    cmp::max,
    fmt::{Display, Formatter},
    mem::transmute,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[rustfmt::skip]
/// A square: an index into the 64 positions of a chessboard.
/// The variants run down the board from White's point of view, rank 8 first.
pub enum Square {
    A8 = 0, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

/// The names of the files of the board, indexed by column.
const FILE_NAMES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

impl Square {
    /// Total number of squares.
    pub const NUM: usize = 64;

    #[inline(always)]
    #[must_use]
    /// Create a `Square` from a row and column, returning `None` if either
    /// index is out of bounds.
    /// Row 0 is rank 8 and column 0 is the a-file.
    pub const fn new(row: usize, col: usize) -> Option<Square> {
        if row < 8 && col < 8 {
            // SAFETY: the index is on 0..64 by the bounds checks above.
            Some(unsafe { transmute::<u8, Square>(((row << 3) | col) as u8) })
        } else {
            None
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the row of this square. Row 0 is rank 8, row 7 is rank 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use minuet::base::Square;
    ///
    /// assert_eq!(Square::A8.row(), 0);
    /// assert_eq!(Square::E2.row(), 6);
    /// ```
    pub const fn row(self) -> usize {
        (self as u8 >> 3) as usize
    }

    #[inline(always)]
    #[must_use]
    /// Get the column of this square. Column 0 is the a-file.
    pub const fn col(self) -> usize {
        (self as u8 & 7) as usize
    }

    #[inline(always)]
    #[must_use]
    /// Get the rank digit (1 through 8) of this square as it would be written
    /// in algebraic notation.
    pub const fn rank_digit(self) -> usize {
        8 - self.row()
    }

    #[inline(always)]
    #[must_use]
    /// Step this square by a signed index offset, returning `None` if the
    /// result leaves the board.
    /// The offset is in index space: -8 is one rank up the board as White
    /// sees it, +1 is one file to the right.
    /// Horizontal wrap-around is not detected here; callers stepping
    /// sideways must check column distance themselves.
    pub const fn offset(self, delta: i8) -> Option<Square> {
        let idx = self as i8 + delta;
        if 0 <= idx && idx < 64 {
            // SAFETY: the index was just bounds-checked.
            Some(unsafe { transmute::<u8, Square>(idx as u8) })
        } else {
            None
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the number of columns between this square and another.
    pub const fn col_distance(self, rhs: Square) -> usize {
        self.col().abs_diff(rhs.col())
    }

    #[inline(always)]
    #[must_use]
    /// Get the number of rows between this square and another.
    pub const fn row_distance(self, rhs: Square) -> usize {
        self.row().abs_diff(rhs.row())
    }

    #[inline(always)]
    #[must_use]
    /// Get the Chebyshev (king-move) distance to another square.
    pub fn chebyshev_to(self, rhs: Square) -> usize {
        max(self.col_distance(rhs), self.row_distance(rhs))
    }

    /// Convert an algebraic string (such as `e4`) to a square.
    /// The file must be lowercase.
    ///
    /// # Errors
    ///
    /// Returns an `Err` describing the problem if `s` does not name a square.
    pub fn from_algebraic(s: &str) -> Result<Square, &'static str> {
        let mut chars = s.chars();
        let file_chr = chars.next().ok_or("empty square name")?;
        let rank_chr = chars.next().ok_or("square name must be 2 characters")?;
        if chars.next().is_some() {
            return Err("square name must be 2 characters");
        }
        let col = FILE_NAMES
            .iter()
            .position(|&c| c == file_chr)
            .ok_or("illegal file for square")?;
        let rank = rank_chr
            .to_digit(10)
            .ok_or("expected digit for square rank")? as usize;
        if !(1..=8).contains(&rank) {
            return Err("square rank out of range");
        }
        Ok(Square::new(8 - rank, col).unwrap())
    }
}

impl TryFrom<u8> for Square {
    type Error = &'static str;

    #[inline(always)]
    fn try_from(x: u8) -> Result<Square, Self::Error> {
        if x < 64 {
            // SAFETY: the index was just bounds-checked.
            Ok(unsafe { transmute::<u8, Square>(x) })
        } else {
            Err("input for square conversion is out of bounds")
        }
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", FILE_NAMES[self.col()], self.rank_digit())
    }
}
