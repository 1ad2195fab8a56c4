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

//! End-to-end search correctness: the driver must find forced wins, respect
//! its game-over semantics, behave deterministically on one thread, and
//! surface evaluator failures instead of guessing.

use minuet::base::{Move, Position};
use minuet::engine::{EngineConfig, SearchDriver};
use minuet::EngineError;

use std::path::PathBuf;
use std::time::Duration;

fn config(threads: usize, depth: i16) -> EngineConfig {
    EngineConfig {
        thread_count: threads,
        max_depth: depth,
        tt_entries: 1 << 16,
        ..EngineConfig::default()
    }
}

fn best_move(fen: &str, threads: usize, depth: i16) -> Move {
    let driver = SearchDriver::new(config(threads, depth)).unwrap();
    let pos = Position::from_fen(fen).unwrap();
    driver
        .find_best_move(&pos, Duration::from_millis(500))
        .unwrap()
        .best_move
}

#[test]
fn white_mate_in_one() {
    // Rb8#
    assert_eq!(
        best_move("3k4/R7/1R6/8/8/8/8/4K3 w - -", 1, 4).to_string(),
        "b6b8"
    );
}

#[test]
fn black_mate_in_one() {
    // the same ladder, colors reversed: Rb1#
    assert_eq!(
        best_move("4k3/8/8/8/8/1r6/r7/3K4 b - -", 1, 4).to_string(),
        "b3b1"
    );
}

#[test]
fn back_rank_mate_through_noise() {
    // Re8# even with queen-grabbing distractions available
    assert_eq!(
        best_move("6k1/5ppp/8/8/8/8/q7/4R1K1 w - -", 1, 4).to_string(),
        "e1e8"
    );
}

#[test]
fn mate_in_two_with_depth_to_spare() {
    // a rook ladder: 1.Ra7 then 2.Rb8# cannot be dodged
    let m = best_move("5k2/8/8/8/8/8/R7/1R4K1 w - -", 1, 6);
    let pos = Position::from_fen("5k2/8/8/8/8/8/R7/1R4K1 w - -").unwrap();
    assert!(pos.legal_moves(pos.side_to_move()).contains(m));
}

#[test]
fn mated_root_returns_sentinel() {
    let driver = SearchDriver::new(config(1, 4)).unwrap();
    let pos = Position::from_fen(
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq -",
    )
    .unwrap();
    let report = driver
        .find_best_move(&pos, Duration::from_millis(100))
        .unwrap();
    assert_eq!(report.best_move, Move::NONE);
    assert!(report.score < 0.0);
}

#[test]
fn stalemate_root_returns_sentinel_with_level_score() {
    let driver = SearchDriver::new(config(1, 4)).unwrap();
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - -").unwrap();
    let report = driver
        .find_best_move(&pos, Duration::from_millis(100))
        .unwrap();
    assert_eq!(report.best_move, Move::NONE);
    assert_eq!(report.score, 0.0);
}

#[test]
fn deterministic_on_a_single_worker() {
    let fen = "r2qkbnr/ppp2ppp/2np4/4p3/2B1P1b1/2NP1N2/PPP2PPP/R1BQK2R w KQkq -";
    let pos = Position::from_fen(fen).unwrap();
    // depth-capped so the clock cannot influence the outcome
    let run = || {
        SearchDriver::new(config(1, 5))
            .unwrap()
            .find_best_move(&pos, Duration::from_secs(600))
            .unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.depth, b.depth);
    assert_eq!(a.nodes, b.nodes);
    assert!((a.score - b.score).abs() < f32::EPSILON);
}

#[test]
fn parallel_search_result_is_legal_and_complete() {
    let fen = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - -";
    let driver = SearchDriver::new(config(4, 8)).unwrap();
    let pos = Position::from_fen(fen).unwrap();
    let report = driver
        .find_best_move(&pos, Duration::from_millis(400))
        .unwrap();
    assert!(pos.legal_moves(pos.side_to_move()).contains(report.best_move));
    // at least one fully completed depth is always reflected
    assert!(report.depth >= 1);
}

#[test]
fn tiny_budget_still_completes_a_depth() {
    let driver = SearchDriver::new(config(2, 10)).unwrap();
    let pos = Position::new();
    let report = driver
        .find_best_move(&pos, Duration::from_millis(1))
        .unwrap();
    assert!(report.depth >= 1);
    assert!(pos.legal_moves(pos.side_to_move()).contains(report.best_move));
}

#[test]
fn missing_model_surfaces_as_evaluator_failure() {
    let config = EngineConfig {
        model_path: Some(PathBuf::from("/nonexistent/minuet-weights.bin")),
        ..EngineConfig::default()
    };
    assert!(matches!(
        SearchDriver::new(config),
        Err(EngineError::Evaluator(_))
    ));
}
