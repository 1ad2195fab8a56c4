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

//! The standard perft validation suite.
//!
//! Every scenario pins exact node counts for positions chosen to exercise
//! the generator's corners: castling through attacks, en-passant pins,
//! promotions, and discovered checks.
//! The deepest depths run hundreds of millions of nodes and are `#[ignore]`d
//! for ordinary test runs; run them with `cargo test --release -- --ignored`
//! when touching the move generator.

use minuet::base::{perft::perft, Position};

/// Check a position against a table of exact (depth, nodes) pairs.
fn expect_counts(fen: &str, counts: &[(u8, u64)]) {
    let mut pos = Position::from_fen(fen).unwrap();
    for &(depth, expected) in counts {
        assert_eq!(
            perft(&mut pos, depth),
            expected,
            "wrong perft({depth}) for {fen}"
        );
    }
}

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
const PROMOTION_STORM: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -";
const TALKCHESS: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ -";
const SYMMETRIC: &str = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - -";

#[test]
fn perft_startpos() {
    expect_counts(
        STARTPOS,
        &[(1, 20), (2, 400), (3, 8_902), (4, 197_281), (5, 4_865_609)],
    );
}

#[test]
#[ignore = "119 million nodes"]
fn perft_startpos_deep() {
    expect_counts(STARTPOS, &[(6, 119_060_324)]);
}

#[test]
fn perft_kiwipete() {
    expect_counts(
        KIWIPETE,
        &[(1, 48), (2, 2_039), (3, 97_862), (4, 4_085_603)],
    );
}

#[test]
#[ignore = "194 million nodes"]
fn perft_kiwipete_deep() {
    expect_counts(KIWIPETE, &[(5, 193_690_690)]);
}

#[test]
fn perft_endgame() {
    expect_counts(
        ENDGAME,
        &[
            (1, 14),
            (2, 191),
            (3, 2_812),
            (4, 43_238),
            (5, 674_624),
            (6, 11_030_083),
        ],
    );
}

#[test]
#[ignore = "179 million nodes"]
fn perft_endgame_deep() {
    expect_counts(ENDGAME, &[(7, 178_633_661)]);
}

#[test]
fn perft_promotion_storm() {
    expect_counts(
        PROMOTION_STORM,
        &[(1, 6), (2, 264), (3, 9_467), (4, 422_333)],
    );
}

#[test]
#[ignore = "722 million nodes"]
fn perft_promotion_storm_deep() {
    expect_counts(PROMOTION_STORM, &[(5, 15_833_292), (6, 706_045_033)]);
}

#[test]
fn perft_talkchess() {
    expect_counts(
        TALKCHESS,
        &[(1, 44), (2, 1_486), (3, 62_379), (4, 2_103_487)],
    );
}

#[test]
#[ignore = "90 million nodes"]
fn perft_talkchess_deep() {
    expect_counts(TALKCHESS, &[(5, 89_941_194)]);
}

#[test]
fn perft_symmetric() {
    expect_counts(
        SYMMETRIC,
        &[(1, 46), (2, 2_079), (3, 89_890), (4, 3_894_594)],
    );
}

#[test]
#[ignore = "164 million nodes"]
fn perft_symmetric_deep() {
    expect_counts(SYMMETRIC, &[(5, 164_075_551)]);
}
