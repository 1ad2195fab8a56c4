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

//! Forsyth-Edwards Notation: the string adapter between positions and the
//! outside world.
//!
//! Fields 1 through 4 (placement, side to move, castling rights, en-passant
//! square) are parsed and emitted.
//! Fields 5 and 6 (the half-move clock and full-move number) are accepted on
//! input and ignored; they are not emitted.
//!
//! FEN records the square *behind* a double-advanced pawn, while the
//! position stores the pawn's own square; the conversion in both directions
//! lives here and nowhere else.

use super::{Bitboard, CastleRights, PieceKind, Position, Side, Square};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// The ways a FEN string can fail to describe a position.
pub enum FenError {
    /// The string ended before all required fields were present.
    #[error("FEN ended before all fields were parsed")]
    UnexpectedEnd,
    /// The piece-placement field was malformed.
    #[error("invalid piece placement: {0}")]
    Placement(&'static str),
    /// The side-to-move field was not `w` or `b`.
    #[error("unrecognized side to move {0:?}")]
    SideToMove(String),
    /// The castling-rights field held an unknown character.
    #[error("unrecognized castling rights character {0:?}")]
    Castling(char),
    /// The en-passant field named a bad square.
    #[error("invalid en passant square {0:?}")]
    EnPassant(String),
    /// The fields parsed, but they describe an impossible position.
    #[error("illegal position: {0}")]
    IllegalPosition(&'static str),
}

/// Parse a FEN string into a position.
pub fn parse(fen: &str) -> Result<Position, FenError> {
    let mut fields = fen.split_whitespace();

    let placement = fields.next().ok_or(FenError::UnexpectedEnd)?;
    let mut pieces = [[Bitboard::EMPTY; PieceKind::NUM]; Side::NUM];
    let mut row = 0usize;
    let mut col = 0usize;
    for chr in placement.chars() {
        match chr {
            '/' => {
                if col != 8 {
                    return Err(FenError::Placement("short rank"));
                }
                row += 1;
                col = 0;
                if row > 7 {
                    return Err(FenError::Placement("too many ranks"));
                }
            }
            '1'..='8' => {
                col += chr.to_digit(10).unwrap() as usize;
                if col > 8 {
                    return Err(FenError::Placement("overlong rank"));
                }
            }
            _ => {
                let kind = PieceKind::from_symbol(chr.to_ascii_uppercase())
                    .ok_or(FenError::Placement("unknown piece symbol"))?;
                let side = if chr.is_ascii_uppercase() {
                    Side::White
                } else {
                    Side::Black
                };
                let sq = Square::new(row, col)
                    .ok_or(FenError::Placement("overlong rank"))?;
                pieces[side as usize][kind as usize] =
                    pieces[side as usize][kind as usize].with_square(sq);
                col += 1;
            }
        }
    }
    if row != 7 || col != 8 {
        return Err(FenError::Placement("too few ranks"));
    }

    let side_to_move = match fields.next().ok_or(FenError::UnexpectedEnd)? {
        "w" => Side::White,
        "b" => Side::Black,
        other => return Err(FenError::SideToMove(other.into())),
    };

    let mut castle_rights = CastleRights::NONE;
    for chr in fields.next().ok_or(FenError::UnexpectedEnd)?.chars() {
        match chr {
            'K' => castle_rights.grant_kingside(Side::White),
            'Q' => castle_rights.grant_queenside(Side::White),
            'k' => castle_rights.grant_kingside(Side::Black),
            'q' => castle_rights.grant_queenside(Side::Black),
            '-' => {}
            _ => return Err(FenError::Castling(chr)),
        }
    }

    let ep_field = fields.next().ok_or(FenError::UnexpectedEnd)?;
    let en_passant = if ep_field == "-" {
        None
    } else {
        let behind = Square::from_algebraic(ep_field)
            .map_err(|_| FenError::EnPassant(ep_field.into()))?;
        // FEN names the square behind the pawn; step back onto the pawn
        // itself, which double-advanced for the side not on move
        let pusher = side_to_move.opponent();
        let pawn_sq = behind
            .offset(pusher.forward_direction())
            .ok_or_else(|| FenError::EnPassant(ep_field.into()))?;
        Some(pawn_sq)
    };

    // fields 5 and 6 (half-move clock, full-move number) are ignored

    Position::from_parts(pieces, side_to_move, castle_rights, en_passant)
        .map_err(FenError::IllegalPosition)
}

#[must_use]
/// Serialize a position as a FEN string of four fields.
pub fn emit(pos: &Position) -> String {
    let mut fen = String::with_capacity(80);

    for row in 0..8 {
        let mut blanks = 0;
        for col in 0..8 {
            let sq = Square::new(row, col).unwrap();
            match (pos.side_at(sq), pos.piece_kind_at(sq)) {
                (Some(side), Some(kind)) => {
                    if blanks > 0 {
                        fen.push(char::from_digit(blanks, 10).unwrap());
                        blanks = 0;
                    }
                    let symbol = kind.symbol();
                    fen.push(match side {
                        Side::White => symbol,
                        Side::Black => symbol.to_ascii_lowercase(),
                    });
                }
                _ => blanks += 1,
            }
        }
        if blanks > 0 {
            fen.push(char::from_digit(blanks, 10).unwrap());
        }
        if row < 7 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match pos.side_to_move() {
        Side::White => 'w',
        Side::Black => 'b',
    });

    fen.push(' ');
    let rights = pos.castle_rights();
    if rights.any() {
        if rights.kingside(Side::White) {
            fen.push('K');
        }
        if rights.queenside(Side::White) {
            fen.push('Q');
        }
        if rights.kingside(Side::Black) {
            fen.push('k');
        }
        if rights.queenside(Side::Black) {
            fen.push('q');
        }
    } else {
        fen.push('-');
    }

    fen.push(' ');
    match pos.en_passant_target() {
        None => fen.push('-'),
        Some(pawn_sq) => {
            // emit the square behind the pawn, which is where the capture
            // would land
            let pusher = pos.side_to_move().opponent();
            let behind = pawn_sq.offset(-pusher.forward_direction()).unwrap();
            fen.push_str(&behind.to_string());
        }
    }

    fen
}
