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

//! The bitboard-indexed position: piece placement, side to move, castling
//! rights, the en-passant target, and the undo stack which makes every move
//! reversible.
//!
//! There is exactly one mutable `Position` per search thread; moves are
//! applied with [`Position::make`] and reversed with [`Position::unmake`].
//! Nothing in the engine clones a position per node.

use super::{
    fen,
    movegen, zobrist, Bitboard, CastleRights, Move, MoveKind, MoveList, PieceKind, Side, Square,
};

use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Everything needed to restore the previous position after one move:
/// created by [`Position::make`], consumed by [`Position::unmake`].
pub struct HistoryEntry {
    /// The move that was played.
    pub m: Move,
    /// The kind of the piece that moved.
    pub moved: PieceKind,
    /// The kind of the piece the move captured, if any.
    /// For en passant this is the captured pawn, even though it did not
    /// stand on the destination square.
    pub captured: Option<PieceKind>,
    /// The en-passant target before the move.
    pub prev_en_passant: Option<Square>,
    /// The castling rights before the move.
    pub prev_castle_rights: CastleRights,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A representation of a position, including the history needed to unwind
/// back to the position it was constructed from.
pub struct Position {
    /// The squares occupied by each kind of piece of each side.
    pieces: [[Bitboard; PieceKind::NUM]; Side::NUM],
    /// The squares occupied by White and Black, respectively.
    /// Always equal to the union of the respective piece bitboards.
    sides: [Bitboard; Side::NUM],
    /// The squares occupied by any piece.
    all: Bitboard,
    /// The side whose turn it is to move.
    side_to_move: Side,
    /// The castling rights of this position.
    castle_rights: CastleRights,
    /// The square of the pawn which just advanced two squares, if the
    /// previous move was a double pawn push.
    /// Note that this is the pawn's own square, not the square behind it
    /// that FEN notation records.
    en_passant: Option<Square>,
    /// The stack of history entries, one per move made and not yet unmade.
    history: Vec<HistoryEntry>,
}

impl Position {
    #[must_use]
    /// Construct the conventional chess starting position.
    pub fn new() -> Position {
        Position {
            pieces: [
                [
                    Bitboard::new(0x00FF_0000_0000_0000), // pawn
                    Bitboard::new(0x4200_0000_0000_0000), // knight
                    Bitboard::new(0x2400_0000_0000_0000), // bishop
                    Bitboard::new(0x8100_0000_0000_0000), // rook
                    Bitboard::new(0x0800_0000_0000_0000), // queen
                    Bitboard::new(0x1000_0000_0000_0000), // king
                ],
                [
                    Bitboard::new(0x0000_0000_0000_FF00),
                    Bitboard::new(0x0000_0000_0000_0042),
                    Bitboard::new(0x0000_0000_0000_0024),
                    Bitboard::new(0x0000_0000_0000_0081),
                    Bitboard::new(0x0000_0000_0000_0008),
                    Bitboard::new(0x0000_0000_0000_0010),
                ],
            ],
            sides: [
                Bitboard::new(0xFFFF_0000_0000_0000),
                Bitboard::new(0x0000_0000_0000_FFFF),
            ],
            all: Bitboard::new(0xFFFF_0000_0000_FFFF),
            side_to_move: Side::White,
            castle_rights: CastleRights::ALL,
            en_passant: None,
            history: Vec::new(),
        }
    }

    /// Construct a position from a fully-specified descriptor: piece
    /// bitboards, side to move, castling rights, and en-passant target (the
    /// double-advanced pawn's square).
    /// The aggregate bitboards are derived here, never supplied.
    ///
    /// # Errors
    ///
    /// Returns an `Err` describing the violation if the descriptor breaks a
    /// position invariant: overlapping pieces, or a side without exactly one
    /// king.
    pub fn from_parts(
        pieces: [[Bitboard; PieceKind::NUM]; Side::NUM],
        side_to_move: Side,
        castle_rights: CastleRights,
        en_passant: Option<Square>,
    ) -> Result<Position, &'static str> {
        let mut sides = [Bitboard::EMPTY; Side::NUM];
        let mut all = Bitboard::EMPTY;
        for side in [Side::White, Side::Black] {
            for kind in PieceKind::ALL {
                let bb = pieces[side as usize][kind as usize];
                if !(all & bb).is_empty() {
                    return Err("two pieces occupy the same square");
                }
                sides[side as usize] |= bb;
                all |= bb;
            }
            if pieces[side as usize][PieceKind::King as usize].count_ones() != 1 {
                return Err("each side must have exactly one king");
            }
            // a pawn on its own back rank or its promotion rank is
            // unreachable and would underflow pawn stepping
            let back_ranks = Bitboard::new(0xFF00_0000_0000_00FF);
            if !(pieces[side as usize][PieceKind::Pawn as usize] & back_ranks).is_empty() {
                return Err("pawns cannot stand on the first or last rank");
            }
        }
        if let Some(ep) = en_passant {
            let pawns = pieces[side_to_move.opponent() as usize][PieceKind::Pawn as usize];
            if !pawns.contains(ep) {
                return Err("en-passant target is not an opposing pawn");
            }
        }
        Ok(Position {
            pieces,
            sides,
            all,
            side_to_move,
            castle_rights,
            en_passant,
            history: Vec::new(),
        })
    }

    /// Create a position from a FEN string.
    ///
    /// # Errors
    ///
    /// Will return a [`fen::FenError`] if the string is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use minuet::base::Position;
    ///
    /// let parsed =
    ///     Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")?;
    /// assert_eq!(parsed, Position::new());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_fen(s: &str) -> Result<Position, fen::FenError> {
        fen::parse(s)
    }

    #[must_use]
    /// Serialize this position as a FEN string.
    pub fn to_fen(&self) -> String {
        fen::emit(self)
    }

    #[inline(always)]
    #[must_use]
    /// Get the squares occupied by pieces of the given side and kind.
    pub fn pieces(&self, side: Side, kind: PieceKind) -> Bitboard {
        self.pieces[side as usize][kind as usize]
    }

    #[inline(always)]
    #[must_use]
    /// Get the squares occupied by all pieces of the given side.
    pub fn by_side(&self, side: Side) -> Bitboard {
        self.sides[side as usize]
    }

    #[inline(always)]
    #[must_use]
    /// Get the squares occupied by any piece.
    pub fn occupancy(&self) -> Bitboard {
        self.all
    }

    #[inline(always)]
    #[must_use]
    /// Get the side whose turn it is to move.
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline(always)]
    #[must_use]
    /// Get the castling rights of this position.
    pub fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    #[inline(always)]
    #[must_use]
    /// Get the square of the pawn which just double-advanced, if any.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    #[must_use]
    /// Get the number of moves made on this position and not yet unmade.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    #[inline(always)]
    #[must_use]
    /// Get the kind of the piece occupying a given square, if any.
    pub fn piece_kind_at(&self, sq: Square) -> Option<PieceKind> {
        let side = self.side_at(sq)?;
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces(side, kind).contains(sq))
    }

    #[inline(always)]
    #[must_use]
    /// Get the side of the piece occupying a given square, if any.
    pub fn side_at(&self, sq: Square) -> Option<Side> {
        if self.sides[Side::White as usize].contains(sq) {
            Some(Side::White)
        } else if self.sides[Side::Black as usize].contains(sq) {
            Some(Side::Black)
        } else {
            None
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the square of the given side's king.
    pub fn king_square(&self, side: Side) -> Square {
        // a valid position has exactly one king per side, so this set is
        // never empty
        self.pieces(side, PieceKind::King).first_square().unwrap()
    }

    #[inline(always)]
    #[must_use]
    /// Determine whether the given side's king is attacked by its opponent.
    pub fn in_check(&self, side: Side) -> bool {
        movegen::square_attacked(self, self.king_square(side), side.opponent())
    }

    #[must_use]
    /// Generate all legal moves for the given side.
    /// An empty list means the game is over: checkmate if `side` is in
    /// check, stalemate otherwise.
    pub fn legal_moves(&self, side: Side) -> MoveList {
        movegen::legal_moves(self, side)
    }

    #[must_use]
    /// Compute the Zobrist hash of this position.
    /// Positions which agree on piece placement, side to move, castling
    /// rights, and en-passant target hash identically, regardless of how
    /// they were reached.
    pub fn zobrist(&self) -> u64 {
        let mut hash = 0;
        for side in [Side::White, Side::Black] {
            for kind in PieceKind::ALL {
                for sq in self.pieces(side, kind) {
                    hash ^= zobrist::piece_key(side, kind, sq);
                }
            }
        }
        if self.side_to_move == Side::White {
            hash ^= zobrist::white_to_move_key();
        }
        for side in [Side::White, Side::Black] {
            if self.castle_rights.kingside(side) {
                hash ^= zobrist::castle_key(2 * side as usize);
            }
            if self.castle_rights.queenside(side) {
                hash ^= zobrist::castle_key(2 * side as usize + 1);
            }
        }
        if let Some(ep) = self.en_passant {
            hash ^= zobrist::en_passant_key(ep);
        }
        hash
    }

    /// Apply the given move to the position.
    ///
    /// The move must be legal in the current position: this is the caller's
    /// obligation, checked here in debug builds only.
    /// Use [`Position::legal_moves`] to obtain moves that satisfy it.
    ///
    /// # Panics
    ///
    /// May panic if `m` is not legal. Will never panic on legal moves.
    ///
    /// # Examples
    ///
    /// ```
    /// use minuet::base::{Move, MoveKind, Position, Square};
    ///
    /// let mut pos = Position::new();
    /// pos.make(Move::new(Square::E2, Square::E4, MoveKind::DoublePawnPush));
    /// assert!(pos.to_fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
    ///
    /// pos.unmake().unwrap();
    /// assert_eq!(pos, Position::new());
    /// ```
    pub fn make(&mut self, m: Move) {
        let mover = self.side_to_move;
        let opponent = mover.opponent();
        let from = m.from_square();
        let to = m.to_square();

        debug_assert!(
            self.by_side(mover).contains(from),
            "move {m} does not start from a {mover:?} piece"
        );
        debug_assert!(
            !movegen::leaves_king_in_check(self, m),
            "move {m} leaves own king in check"
        );

        // this unwrap is backed by the legality precondition
        let moved = self.piece_kind_at(from).unwrap();
        let captured = match m.kind() {
            MoveKind::EnPassant => Some(PieceKind::Pawn),
            MoveKind::Capture | MoveKind::CapturePromotion => self.piece_kind_at(to),
            _ => None,
        };

        self.history.push(HistoryEntry {
            m,
            moved,
            captured,
            prev_en_passant: self.en_passant,
            prev_castle_rights: self.castle_rights,
        });

        // clear the captured piece first so the destination is free
        match m.kind() {
            MoveKind::EnPassant => {
                // the victim stands beside the from-square, one step behind
                // the destination from the mover's point of view
                let victim = to.offset(-mover.forward_direction()).unwrap();
                debug_assert_eq!(Some(victim), self.en_passant);
                self.remove_piece(victim, PieceKind::Pawn, opponent);
            }
            MoveKind::Capture | MoveKind::CapturePromotion => {
                self.remove_piece(to, captured.unwrap(), opponent);
            }
            _ => {}
        }

        // move the piece, replacing it with the promoted kind if promoting
        self.remove_piece(from, moved, mover);
        self.add_piece(to, m.promotion().unwrap_or(moved), mover);

        // castling also moves the rook
        match m.kind() {
            MoveKind::KingCastle => {
                let rook_from = from.offset(3).unwrap();
                let rook_to = from.offset(1).unwrap();
                self.remove_piece(rook_from, PieceKind::Rook, mover);
                self.add_piece(rook_to, PieceKind::Rook, mover);
            }
            MoveKind::QueenCastle => {
                let rook_from = from.offset(-4).unwrap();
                let rook_to = from.offset(-1).unwrap();
                self.remove_piece(rook_from, PieceKind::Rook, mover);
                self.add_piece(rook_to, PieceKind::Rook, mover);
            }
            _ => {}
        }

        // a king move revokes both of the mover's rights; moving a rook off
        // its home square, or capturing a rook on one, revokes that pairing
        if moved == PieceKind::King {
            self.castle_rights.revoke_both(mover);
        }
        for corner in [from, to] {
            match corner {
                Square::A1 => self.castle_rights.revoke_queenside(Side::White),
                Square::H1 => self.castle_rights.revoke_kingside(Side::White),
                Square::A8 => self.castle_rights.revoke_queenside(Side::Black),
                Square::H8 => self.castle_rights.revoke_kingside(Side::Black),
                _ => {}
            }
        }

        // only a double pawn push leaves an en-passant target behind
        self.en_passant = match m.kind() {
            MoveKind::DoublePawnPush => Some(to),
            _ => None,
        };

        self.side_to_move = opponent;
    }

    /// Reverse the most recent move, restoring the position exactly as it
    /// was before the matching [`Position::make`] call, hash included.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if there is no move to unmake.
    pub fn unmake(&mut self) -> Result<(), &'static str> {
        let entry = self.history.pop().ok_or("no move to unmake")?;
        let mover = self.side_to_move.opponent();
        let m = entry.m;
        let from = m.from_square();
        let to = m.to_square();

        self.side_to_move = mover;

        // take the piece back, undoing the promotion if there was one
        self.remove_piece(to, m.promotion().unwrap_or(entry.moved), mover);
        self.add_piece(from, entry.moved, mover);

        match m.kind() {
            MoveKind::EnPassant => {
                let victim = to.offset(-mover.forward_direction()).unwrap();
                self.add_piece(victim, PieceKind::Pawn, mover.opponent());
            }
            MoveKind::Capture | MoveKind::CapturePromotion => {
                self.add_piece(to, entry.captured.unwrap(), mover.opponent());
            }
            MoveKind::KingCastle => {
                let rook_from = from.offset(3).unwrap();
                let rook_to = from.offset(1).unwrap();
                self.remove_piece(rook_to, PieceKind::Rook, mover);
                self.add_piece(rook_from, PieceKind::Rook, mover);
            }
            MoveKind::QueenCastle => {
                let rook_from = from.offset(-4).unwrap();
                let rook_to = from.offset(-1).unwrap();
                self.remove_piece(rook_to, PieceKind::Rook, mover);
                self.add_piece(rook_from, PieceKind::Rook, mover);
            }
            _ => {}
        }

        self.en_passant = entry.prev_en_passant;
        self.castle_rights = entry.prev_castle_rights;
        Ok(())
    }

    #[must_use]
    /// Get the most recent history entry without unmaking it.
    pub fn last_move(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    #[inline(always)]
    /// Put a piece onto a square, updating the aggregate bitboards.
    /// The square must be empty.
    fn add_piece(&mut self, sq: Square, kind: PieceKind, side: Side) {
        debug_assert!(!self.all.contains(sq));
        let bb = Bitboard::from(sq);
        self.pieces[side as usize][kind as usize] |= bb;
        self.sides[side as usize] |= bb;
        self.all |= bb;
    }

    #[inline(always)]
    /// Take a known piece off a square, updating the aggregate bitboards.
    fn remove_piece(&mut self, sq: Square, kind: PieceKind, side: Side) {
        debug_assert!(self.pieces(side, kind).contains(sq));
        let bb = Bitboard::from(sq);
        self.pieces[side as usize][kind as usize] ^= bb;
        self.sides[side as usize] ^= bb;
        self.all ^= bb;
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Display for Position {
    /// Render the position as an 8x8 grid of piece symbols, rank 8 first.
    /// White pieces are uppercase.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                let sq = Square::new(row, col).unwrap();
                let chr = match (self.side_at(sq), self.piece_kind_at(sq)) {
                    (Some(Side::White), Some(kind)) => kind.symbol(),
                    (Some(Side::Black), Some(kind)) => {
                        kind.symbol().to_ascii_lowercase()
                    }
                    _ => '.',
                };
                write!(f, "{chr} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "{:?} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_layout() {
        let pos = Position::new();
        assert_eq!(pos.piece_kind_at(Square::E1), Some(PieceKind::King));
        assert_eq!(pos.side_at(Square::E1), Some(Side::White));
        assert_eq!(pos.piece_kind_at(Square::D8), Some(PieceKind::Queen));
        assert_eq!(pos.side_at(Square::D8), Some(Side::Black));
        assert_eq!(pos.piece_kind_at(Square::E4), None);
        assert_eq!(pos.occupancy().count_ones(), 32);
        assert_eq!(pos.king_square(Side::Black), Square::E8);
    }

    #[test]
    fn make_unmake_restores_exactly() {
        let mut pos = Position::new();
        let before = pos.clone();
        let hash_before = pos.zobrist();
        pos.make(Move::new(Square::E2, Square::E4, MoveKind::DoublePawnPush));
        assert_eq!(pos.side_to_move(), Side::Black);
        assert_eq!(pos.en_passant_target(), Some(Square::E4));
        pos.unmake().unwrap();
        assert_eq!(pos, before);
        assert_eq!(pos.zobrist(), hash_before);
    }

    #[test]
    fn capture_round_trip() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let before = pos.clone();
        pos.make(Move::new(Square::E4, Square::D5, MoveKind::Capture));
        assert_eq!(pos.piece_kind_at(Square::D5), Some(PieceKind::Pawn));
        assert_eq!(pos.side_at(Square::D5), Some(Side::White));
        pos.unmake().unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn en_passant_round_trip() {
        // white pawn e5, black just played d7d5
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert_eq!(pos.en_passant_target(), Some(Square::D5));
        let before = pos.clone();
        pos.make(Move::new(Square::E5, Square::D6, MoveKind::EnPassant));
        // the d5 pawn is gone, and the capturer stands on d6
        assert_eq!(pos.piece_kind_at(Square::D5), None);
        assert_eq!(pos.side_at(Square::D6), Some(Side::White));
        pos.unmake().unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn kingside_castle_moves_rook() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let before = pos.clone();
        pos.make(Move::new(Square::E1, Square::G1, MoveKind::KingCastle));
        assert_eq!(pos.piece_kind_at(Square::G1), Some(PieceKind::King));
        assert_eq!(pos.piece_kind_at(Square::F1), Some(PieceKind::Rook));
        assert_eq!(pos.piece_kind_at(Square::H1), None);
        assert!(!pos.castle_rights().kingside(Side::White));
        assert!(!pos.castle_rights().queenside(Side::White));
        assert!(pos.castle_rights().kingside(Side::Black));
        pos.unmake().unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn queenside_castle_moves_rook() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1").unwrap();
        let before = pos.clone();
        pos.make(Move::new(Square::E8, Square::C8, MoveKind::QueenCastle));
        assert_eq!(pos.piece_kind_at(Square::C8), Some(PieceKind::King));
        assert_eq!(pos.piece_kind_at(Square::D8), Some(PieceKind::Rook));
        assert_eq!(pos.piece_kind_at(Square::A8), None);
        pos.unmake().unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn promotion_round_trip() {
        let mut pos = Position::from_fen("8/5P2/2k5/8/8/8/4K3/8 w - - 0 1").unwrap();
        let before = pos.clone();
        pos.make(Move::promoting(
            Square::F7,
            Square::F8,
            PieceKind::Queen,
            MoveKind::Promotion,
        ));
        assert_eq!(pos.piece_kind_at(Square::F8), Some(PieceKind::Queen));
        assert_eq!(pos.pieces(Side::White, PieceKind::Pawn), Bitboard::EMPTY);
        pos.unmake().unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn capturing_a_home_rook_revokes_rights() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make(Move::new(Square::A1, Square::A8, MoveKind::Capture));
        assert!(!pos.castle_rights().queenside(Side::Black));
        assert!(pos.castle_rights().kingside(Side::Black));
        assert!(!pos.castle_rights().queenside(Side::White));
        assert!(pos.castle_rights().kingside(Side::White));
    }

    #[test]
    fn from_parts_rejects_overlap() {
        let mut pieces = [[Bitboard::EMPTY; PieceKind::NUM]; Side::NUM];
        pieces[0][PieceKind::King as usize] = Bitboard::from(Square::E1);
        pieces[1][PieceKind::King as usize] = Bitboard::from(Square::E8);
        pieces[0][PieceKind::Pawn as usize] = Bitboard::from(Square::E1);
        assert!(Position::from_parts(
            pieces,
            Side::White,
            CastleRights::NONE,
            None
        )
        .is_err());
    }

    #[test]
    fn zobrist_ignores_move_path() {
        // Nf3 Nf6 Ng1 Ng8 returns to the start position and its hash
        let mut pos = Position::new();
        let start_hash = pos.zobrist();
        for (from, to) in [
            (Square::G1, Square::F3),
            (Square::G8, Square::F6),
            (Square::F3, Square::G1),
            (Square::F6, Square::G8),
        ] {
            pos.make(Move::new(from, to, MoveKind::Normal));
        }
        assert_eq!(pos.zobrist(), start_hash);
    }

    #[test]
    fn zobrist_sees_every_hashed_field() {
        let with_rights =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let without_rights =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        let black_to_move =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        assert_ne!(with_rights.zobrist(), without_rights.zobrist());
        assert_ne!(with_rights.zobrist(), black_to_move.zobrist());
    }
}
