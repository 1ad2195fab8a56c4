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

//! Shared data types and useful basic definitions found across the entire
//! engine: squares, sides, pieces, bitboards, moves, the position itself, and
//! the machinery which generates legal moves for it.

// Many module elements are re-exported to make names more ergonomic to access.

mod bitboard;
pub use bitboard::Bitboard;

mod castling;
pub use castling::CastleRights;

mod moves;
pub use moves::{Move, MoveKind, MoveList};

mod piece;
pub use piece::PieceKind;

mod side;
pub use side::Side;

mod square;
pub use square::Square;

mod position;
pub use position::{HistoryEntry, Position};

pub mod algebraic;
pub mod attacks;
pub mod fen;
pub mod movegen;
pub mod perft;
pub mod zobrist;

mod magics;
