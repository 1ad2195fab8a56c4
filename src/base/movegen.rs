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

//! Move generation: pseudo-legal moves from the attack tables, filtered down
//! to legal moves by an attack test which never mutates the position.
//!
//! Generation is total.
//! Zero legal moves while in check is checkmate; zero legal moves otherwise
//! is stalemate; neither is an error here.

use super::{attacks, Bitboard, Move, MoveKind, MoveList, PieceKind, Position, Side, Square};

#[must_use]
/// Generate all legal moves for the given side.
///
/// # Examples
///
/// ```
/// use minuet::base::{movegen, Position, Side};
///
/// let pos = Position::new();
/// assert_eq!(movegen::legal_moves(&pos, Side::White).len(), 20);
/// ```
pub fn legal_moves(pos: &Position, side: Side) -> MoveList {
    let mut pseudo = MoveList::new();
    pawn_moves(pos, side, &mut pseudo);
    leaper_moves(pos, side, PieceKind::Knight, &mut pseudo);
    slider_moves(pos, side, PieceKind::Bishop, &mut pseudo);
    slider_moves(pos, side, PieceKind::Rook, &mut pseudo);
    slider_moves(pos, side, PieceKind::Queen, &mut pseudo);
    leaper_moves(pos, side, PieceKind::King, &mut pseudo);
    castle_moves(pos, side, &mut pseudo);

    let mut legal = MoveList::new();
    for m in pseudo.iter() {
        if !leaves_king_in_check(pos, m) {
            legal.push(m);
        }
    }
    legal
}

#[must_use]
/// Determine whether `sq` is attacked by any piece of side `by`.
pub fn square_attacked(pos: &Position, sq: Square, by: Side) -> bool {
    square_attacked_with(pos, sq, by, pos.occupancy(), Bitboard::EMPTY)
}

#[must_use]
/// Determine whether playing `m` would leave the mover's own king attacked,
/// without mutating the position.
///
/// The occupancy is patched as if the move were played: the from-square is
/// vacated, the to-square filled, and the en-passant victim removed where
/// applicable.
/// Captured pieces are likewise dropped from the attacker sets, and the
/// slider attacks are recomputed against the patched occupancy.
/// Keeping this test free of make/unmake is what makes the legality filter
/// affordable, so it must stay allocation- and mutation-free.
///
/// `m` must be pseudo-legal: its from-square must hold a piece of the moving
/// side.
pub fn leaves_king_in_check(pos: &Position, m: Move) -> bool {
    let from = m.from_square();
    let to = m.to_square();
    // backed by the pseudo-legality precondition
    let mover = pos.side_at(from).unwrap();

    let mut occupancy = pos.occupancy().without_square(from).with_square(to);
    // anything on the to-square is captured, so it no longer attacks
    let mut captured = Bitboard::from(to);
    if m.kind() == MoveKind::EnPassant {
        let victim = to.offset(-mover.forward_direction()).unwrap();
        occupancy = occupancy.without_square(victim);
        captured = captured.with_square(victim);
    }

    let king_sq = if pos.pieces(mover, PieceKind::King).contains(from) {
        to
    } else {
        pos.king_square(mover)
    };

    square_attacked_with(pos, king_sq, mover.opponent(), occupancy, captured)
}

/// The shared attack test: is `sq` attacked by side `by`, under the given
/// occupancy, ignoring any `by` pieces in `removed`?
fn square_attacked_with(
    pos: &Position,
    sq: Square,
    by: Side,
    occupancy: Bitboard,
    removed: Bitboard,
) -> bool {
    // a pawn of `by` attacks sq exactly when a pawn of the defender standing
    // on sq would attack the pawn's square
    let pawns = pos.pieces(by, PieceKind::Pawn) & !removed;
    if !(attacks::pawn_attacks(by.opponent(), sq) & pawns).is_empty() {
        return true;
    }

    let knights = pos.pieces(by, PieceKind::Knight) & !removed;
    if !(attacks::knight_attacks(sq) & knights).is_empty() {
        return true;
    }

    let queens = pos.pieces(by, PieceKind::Queen);
    let rooks = (pos.pieces(by, PieceKind::Rook) | queens) & !removed;
    if !(attacks::rook_attacks(sq, occupancy) & rooks).is_empty() {
        return true;
    }

    let bishops = (pos.pieces(by, PieceKind::Bishop) | queens) & !removed;
    if !(attacks::bishop_attacks(sq, occupancy) & bishops).is_empty() {
        return true;
    }

    !(attacks::king_attacks(sq) & pos.pieces(by, PieceKind::King)).is_empty()
}

/// Generate pseudo-legal pawn moves: pushes, double pushes, captures,
/// en passant, and promotions.
fn pawn_moves(pos: &Position, side: Side, list: &mut MoveList) {
    let forward = side.forward_direction();
    let enemy = pos.by_side(side.opponent());
    let occupancy = pos.occupancy();
    let promote_rank = side.pawn_promote_rank();

    for from in pos.pieces(side, PieceKind::Pawn) {
        // pawns never stand on the promotion rank, so one step forward is
        // always on the board
        let push = from.offset(forward).unwrap();
        if !occupancy.contains(push) {
            if promote_rank.contains(push) {
                for kind in PieceKind::PROMOTING {
                    list.push(Move::promoting(from, push, kind, MoveKind::Promotion));
                }
            } else {
                list.push(Move::new(from, push, MoveKind::Normal));
                if side.pawn_start_rank().contains(from) {
                    let double = push.offset(forward).unwrap();
                    if !occupancy.contains(double) {
                        list.push(Move::new(from, double, MoveKind::DoublePawnPush));
                    }
                }
            }
        }

        for to in attacks::pawn_attacks(side, from) & enemy {
            if promote_rank.contains(to) {
                for kind in PieceKind::PROMOTING {
                    list.push(Move::promoting(from, to, kind, MoveKind::CapturePromotion));
                }
            } else {
                list.push(Move::new(from, to, MoveKind::Capture));
            }
        }

        if let Some(ep_pawn) = pos.en_passant_target() {
            if pos.pieces(side.opponent(), PieceKind::Pawn).contains(ep_pawn) {
                // the capture lands on the square behind the double-pushed
                // pawn
                if let Some(dest) = ep_pawn.offset(forward) {
                    if attacks::pawn_attacks(side, from).contains(dest) {
                        list.push(Move::new(from, dest, MoveKind::EnPassant));
                    }
                }
            }
        }
    }
}

/// Generate pseudo-legal knight or king moves (not castles) by masking the
/// leaper table against the side's own pieces.
fn leaper_moves(pos: &Position, side: Side, kind: PieceKind, list: &mut MoveList) {
    let own = pos.by_side(side);
    let enemy = pos.by_side(side.opponent());
    for from in pos.pieces(side, kind) {
        let destinations = match kind {
            PieceKind::Knight => attacks::knight_attacks(from),
            _ => attacks::king_attacks(from),
        };
        for to in destinations & !own {
            let move_kind = if enemy.contains(to) {
                MoveKind::Capture
            } else {
                MoveKind::Normal
            };
            list.push(Move::new(from, to, move_kind));
        }
    }
}

/// Generate pseudo-legal bishop, rook, or queen moves from the magic tables.
fn slider_moves(pos: &Position, side: Side, kind: PieceKind, list: &mut MoveList) {
    let own = pos.by_side(side);
    let enemy = pos.by_side(side.opponent());
    let occupancy = pos.occupancy();
    for from in pos.pieces(side, kind) {
        let destinations = match kind {
            PieceKind::Bishop => attacks::bishop_attacks(from, occupancy),
            PieceKind::Rook => attacks::rook_attacks(from, occupancy),
            _ => attacks::queen_attacks(from, occupancy),
        };
        for to in destinations & !own {
            let move_kind = if enemy.contains(to) {
                MoveKind::Capture
            } else {
                MoveKind::Normal
            };
            list.push(Move::new(from, to, move_kind));
        }
    }
}

/// Generate castling moves.
///
/// A castle is permitted if the corresponding right is held, the king is not
/// currently in check, every square the king crosses (destination included)
/// is empty and unattacked, and the rook is at home.
/// On the queen side the b-file square must also be empty, but it may be
/// attacked, since only the rook crosses it.
fn castle_moves(pos: &Position, side: Side, list: &mut MoveList) {
    let rights = pos.castle_rights();
    if !rights.kingside(side) && !rights.queenside(side) {
        return;
    }

    let king_from = match side {
        Side::White => Square::E1,
        Side::Black => Square::E8,
    };
    if pos.king_square(side) != king_from {
        return;
    }

    let occupancy = pos.occupancy();
    let opponent = side.opponent();
    if square_attacked(pos, king_from, opponent) {
        return;
    }

    if rights.kingside(side) {
        let f_file = king_from.offset(1).unwrap();
        let g_file = king_from.offset(2).unwrap();
        let rook_home = king_from.offset(3).unwrap();
        if pos.pieces(side, PieceKind::Rook).contains(rook_home)
            && !occupancy.contains(f_file)
            && !occupancy.contains(g_file)
            && !square_attacked(pos, f_file, opponent)
            && !square_attacked(pos, g_file, opponent)
        {
            list.push(Move::new(king_from, g_file, MoveKind::KingCastle));
        }
    }

    if rights.queenside(side) {
        let d_file = king_from.offset(-1).unwrap();
        let c_file = king_from.offset(-2).unwrap();
        let b_file = king_from.offset(-3).unwrap();
        let rook_home = king_from.offset(-4).unwrap();
        if pos.pieces(side, PieceKind::Rook).contains(rook_home)
            && !occupancy.contains(d_file)
            && !occupancy.contains(c_file)
            && !occupancy.contains(b_file)
            && !square_attacked(pos, d_file, opponent)
            && !square_attacked(pos, c_file, opponent)
        {
            list.push(Move::new(king_from, c_file, MoveKind::QueenCastle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collect the legal moves of the side to move as display strings, for
    /// compact assertions.
    fn move_strings(fen: &str) -> Vec<String> {
        let pos = Position::from_fen(fen).unwrap();
        pos.legal_moves(pos.side_to_move())
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = Position::new();
        assert_eq!(pos.legal_moves(Side::White).len(), 20);
        assert_eq!(pos.legal_moves(Side::Black).len(), 20);
    }

    #[test]
    fn checkmate_has_no_moves() {
        // fool's mate
        let pos = Position::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert!(pos.legal_moves(Side::White).is_empty());
        assert!(pos.in_check(Side::White));
    }

    #[test]
    fn stalemate_has_no_moves_but_no_check() {
        let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert!(pos.legal_moves(Side::Black).is_empty());
        assert!(!pos.in_check(Side::Black));
    }

    #[test]
    fn pinned_piece_cannot_move_off_the_line() {
        // the e4 knight is pinned to the white king by the e8 rook
        let pos =
            Position::from_fen("4r2k/8/8/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        let moves = pos.legal_moves(Side::White);
        assert!(moves.iter().all(|m| m.from_square() != Square::E4));
    }

    #[test]
    fn king_cannot_step_into_slider_line() {
        // the rook on a2 covers the whole second rank
        let moves = move_strings("7k/8/8/8/8/8/r7/4K3 w - - 0 1");
        assert!(!moves.contains(&"e1d2".to_string()));
        assert!(!moves.contains(&"e1e2".to_string()));
        assert!(moves.contains(&"e1d1".to_string()));
    }

    #[test]
    fn en_passant_is_generated() {
        let moves =
            move_strings("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        assert!(moves.contains(&"e5d6".to_string()));
    }

    #[test]
    fn en_passant_respects_horizontal_pin() {
        // capturing en passant would expose the black king on the fourth
        // rank to the white queen
        let moves = move_strings("8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1");
        assert!(!moves.contains(&"e4d3".to_string()));
    }

    #[test]
    fn castling_generated_when_clear() {
        let moves =
            move_strings("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert!(moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn castling_forbidden_through_attack() {
        // the black rook on f8 covers f1, which the king must cross
        let moves = move_strings("5r1k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn castling_forbidden_in_check() {
        let moves = move_strings("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_string()));
        assert!(!moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn queenside_b_file_may_be_attacked_but_not_occupied() {
        // the rook on b8 attacks b1; queenside castling is still legal
        let attacked = move_strings("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(attacked.contains(&"e1c1".to_string()));
        // a knight parked on b1 blocks it
        let occupied = move_strings("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1");
        assert!(!occupied.contains(&"e1c1".to_string()));
    }

    #[test]
    fn promotions_come_in_four_kinds() {
        let moves = move_strings("8/5P2/2k5/8/8/8/4K3/8 w - - 0 1");
        for piece in ["N", "B", "R", "Q"] {
            assert!(moves.contains(&format!("f7f8={piece}")));
        }
    }

    #[test]
    fn attack_test_matches_make_unmake() {
        // the filter must agree with actually playing the move
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1",
        ];
        for fen in fens {
            let mut pos = Position::from_fen(fen).unwrap();
            let side = pos.side_to_move();
            let mut pseudo = MoveList::new();
            pawn_moves(&pos, side, &mut pseudo);
            leaper_moves(&pos, side, PieceKind::Knight, &mut pseudo);
            slider_moves(&pos, side, PieceKind::Bishop, &mut pseudo);
            slider_moves(&pos, side, PieceKind::Rook, &mut pseudo);
            slider_moves(&pos, side, PieceKind::Queen, &mut pseudo);
            leaper_moves(&pos, side, PieceKind::King, &mut pseudo);
            // every move the filter passes must be safe once actually
            // played; the reverse direction is covered by the exact perft
            // totals
            for m in pseudo.iter().collect::<Vec<_>>() {
                if !leaves_king_in_check(&pos, m) {
                    pos.make(m);
                    assert!(!pos.in_check(side), "filter passed illegal {m}");
                    pos.unmake().unwrap();
                }
            }
        }
    }
}
