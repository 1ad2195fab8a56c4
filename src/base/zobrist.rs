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

//! Zobrist hash key generation for positions.
//!
//! A position's hash is the XOR of one random 64-bit key per occupied
//! (piece, square) pair, one key per active castling right, one key for the
//! en-passant file when en passant is available, and one key if White is to
//! move.
//! The key tables are filled once at startup from a fixed seed, so hashes
//! are stable within and across processes.

use super::{PieceKind, Side, Square};

use once_cell::sync::Lazy;

/// The seed for the key generator.
/// Fixed so that hashes (and thus transposition tables and tests) are
/// reproducible between runs.
const ZOBRIST_SEED: u64 = 0x00C0_FFEE_D00D_2024;

/// The full set of Zobrist keys.
struct Keys {
    /// One key per (piece, square) pair.
    /// The piece index is `kind + 6 * side`.
    pieces: [[u64; 64]; 12],
    /// One key per castling right, indexed `2 * side + wing` with the
    /// kingside wing first.
    castling: [u64; 4],
    /// One key per en-passant file.
    en_passant_file: [u64; 8],
    /// The key XOR'd in when White is to move.
    white_to_move: u64,
}

static KEYS: Lazy<Keys> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(ZOBRIST_SEED);
    let mut keys = Keys {
        pieces: [[0; 64]; 12],
        castling: [0; 4],
        en_passant_file: [0; 8],
        white_to_move: 0,
    };
    for piece in &mut keys.pieces {
        for key in piece.iter_mut() {
            *key = rng.u64(..);
        }
    }
    for key in &mut keys.castling {
        *key = rng.u64(..);
    }
    for key in &mut keys.en_passant_file {
        *key = rng.u64(..);
    }
    keys.white_to_move = rng.u64(..);
    keys
});

#[inline(always)]
#[must_use]
/// Get the key for a piece of the given side and kind on the given square.
pub fn piece_key(side: Side, kind: PieceKind, sq: Square) -> u64 {
    KEYS.pieces[kind as usize + PieceKind::NUM * side as usize][sq as usize]
}

#[inline(always)]
#[must_use]
/// Get the key for a castling right.
/// The flat index is `2 * side + wing` with the kingside wing first: 0 is
/// White kingside, 1 White queenside, 2 Black kingside, 3 Black queenside.
pub fn castle_key(right: usize) -> u64 {
    KEYS.castling[right]
}

#[inline(always)]
#[must_use]
/// Get the key for an en-passant target on the given square.
/// Only the file of the square participates in the hash.
pub fn en_passant_key(sq: Square) -> u64 {
    KEYS.en_passant_file[sq.col()]
}

#[inline(always)]
#[must_use]
/// Get the key XOR'd into the hash when White is the side to move.
pub fn white_to_move_key() -> u64 {
    KEYS.white_to_move
}
