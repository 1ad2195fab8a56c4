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

//! Principal-variation search.
//!
//! A negamax alpha-beta search in which the first move of each node is
//! searched with the full window and every later move with a null window,
//! re-searching at full width only when the null-window probe lands inside
//! the window at a PV node.
//! Move ordering (transposition move, MVV-LVA captures, killers, history)
//! keeps the first move good enough for the null windows to hold.
//!
//! One `Searcher` exists per worker thread and owns everything that thread
//! mutates: its position, killer and history tables, and PV tables.
//! Only the transposition table is shared.

use crate::base::{Move, MoveKind, MoveList, PieceKind, Position};

use super::{
    evaluate::{EvalError, Evaluator},
    limit::SearchLimit,
    transposition::{Bound, TTEntry, TTable},
};

use thiserror::Error;

/// The hard ceiling on search depth, and the size of every per-ply table.
pub const MAX_PLY: usize = 64;

/// The magnitude of a mate-in-zero score.
/// A mate found at ply `p` scores `MATE - p`, so nearer mates score higher.
pub const MATE: f32 = 1000.0;

/// The score threshold above which a score denotes a forced mate.
const MATE_THRESHOLD: f32 = MATE - 2.0 * MAX_PLY as f32;

/// The width of a null window.
/// Large enough to survive `f32` rounding against mate-scale scores.
const NULL_WINDOW: f32 = 1e-3;

/// Move-ordering score of the transposition move.
const ORDER_TT_MOVE: i32 = 10_000_000;

/// Move-ordering base score of captures; the MVV-LVA offset is added on.
const ORDER_CAPTURE: i32 = 1_000_000;

/// Move-ordering score of the first killer move.
const ORDER_KILLER_FIRST: i32 = 900_000;

/// Move-ordering score of the second killer move.
const ORDER_KILLER_SECOND: i32 = 800_000;

#[must_use]
/// Determine whether a score denotes a forced mate for either player.
pub fn is_mate_score(score: f32) -> bool {
    score.abs() >= MATE_THRESHOLD
}

#[derive(Error, Debug)]
/// The ways a search can end without producing a score.
pub enum SearchError {
    /// The deadline passed; the result in progress is unusable.
    #[error("search timed out")]
    Timeout,
    /// The evaluator failed; the whole request must abort.
    #[error(transparent)]
    Evaluator(#[from] EvalError),
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// What one completed root search found.
pub struct RootResult {
    /// The score of the best root move.
    pub score: f32,
    /// The best root move, or `Move::NONE` if the root had no moves.
    pub best: Move,
    /// The index of the best move in the ordered root move list, used as
    /// the final tie-breaker when workers are aggregated.
    pub ordinal: u32,
}

/// A structure containing the per-thread state of a principal variation
/// search.
pub struct Searcher<'a> {
    /// This worker's private position.
    pos: Position,
    /// The shared transposition table.
    ttable: &'a TTable,
    /// The shared search limit.
    limit: &'a SearchLimit,
    /// This worker's evaluation adapter.
    evaluator: Evaluator,
    /// The killer moves: quiet moves which caused a beta cutoff at the same
    /// ply in a sibling subtree, two remembered per ply.
    killers: [[Move; 2]; MAX_PLY],
    /// The history heuristic: cutoff counts indexed by from- and to-square,
    /// weighted by depth squared.
    history: [[i32; 64]; 64],
    /// The triangular principal-variation table.
    /// `pv_table[ply]` holds the line found below ply `ply`.
    pv_table: [[Move; MAX_PLY]; MAX_PLY],
    /// The length of each line in `pv_table`.
    pv_length: [usize; MAX_PLY],
    /// The number of nodes this worker has searched.
    nodes: u64,
    /// The number of useful transposition hits this worker has had.
    tt_hits: u64,
}

impl<'a> Searcher<'a> {
    #[must_use]
    /// Construct a searcher over its own position clone.
    pub fn new(
        pos: Position,
        ttable: &'a TTable,
        limit: &'a SearchLimit,
        evaluator: Evaluator,
    ) -> Searcher<'a> {
        Searcher {
            pos,
            ttable,
            limit,
            evaluator,
            killers: [[Move::NONE; 2]; MAX_PLY],
            history: [[0; 64]; 64],
            pv_table: [[Move::NONE; MAX_PLY]; MAX_PLY],
            pv_length: [0; MAX_PLY],
            nodes: 0,
            tt_hits: 0,
        }
    }

    #[must_use]
    /// The number of nodes searched so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[must_use]
    /// The number of transposition hits so far.
    pub fn tt_hits(&self) -> u64 {
        self.tt_hits
    }

    #[must_use]
    /// The principal variation of the most recent completed root search.
    pub fn principal_variation(&self) -> &[Move] {
        &self.pv_table[0][..self.pv_length[0]]
    }

    /// Search the root position to `depth` inside the window `[alpha,
    /// beta]`.
    ///
    /// `prev_best` is the best move of the previous completed iteration; it
    /// is tried first, ahead of the general move ordering.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] if the deadline passes or the evaluator
    /// fails mid-search.
    /// In either case the position is unwound back to the root, so the
    /// searcher may be reused for another attempt.
    pub fn search_root(
        &mut self,
        depth: i16,
        alpha: f32,
        beta: f32,
        prev_best: Option<Move>,
    ) -> Result<RootResult, SearchError> {
        let root_ply = self.pos.ply();
        let result = self.root_moves_loop(depth, alpha, beta, prev_best);
        if result.is_err() {
            // an error can surface from any depth of the recursion; put the
            // position back so the next iteration starts clean
            while self.pos.ply() > root_ply {
                let undone = self.pos.unmake();
                debug_assert!(undone.is_ok());
            }
        }
        result
    }

    /// The root move loop: a PVS node specialized to record the best move
    /// and its ordinal rather than store a transposition entry by ply.
    fn root_moves_loop(
        &mut self,
        depth: i16,
        mut alpha: f32,
        beta: f32,
        prev_best: Option<Move>,
    ) -> Result<RootResult, SearchError> {
        let side = self.pos.side_to_move();
        let mut moves = self.pos.legal_moves(side);
        if moves.is_empty() {
            let score = if self.pos.in_check(side) { -MATE } else { 0.0 };
            return Ok(RootResult {
                score,
                best: Move::NONE,
                ordinal: 0,
            });
        }

        let hash = self.pos.zobrist();
        let tt_move = self.ttable.probe(hash).map(|e| e.best_move);
        self.order_moves(&mut moves, tt_move, 0);
        if let Some(pv_move) = prev_best {
            moves.bring_to_front(pv_move);
        }

        self.pv_length[0] = 0;
        let alpha_orig = alpha;
        let mut best_score = f32::NEG_INFINITY;
        let mut best = Move::NONE;
        let mut ordinal = 0;

        for i in 0..moves.len() {
            let m = moves.get(i);
            self.pos.make(m);
            let score = if i == 0 {
                -self.pvs(depth - 1, -beta, -alpha, 1, true)?
            } else {
                let probe = -self.pvs(depth - 1, -alpha - NULL_WINDOW, -alpha, 1, false)?;
                if alpha < probe && probe < beta {
                    -self.pvs(depth - 1, -beta, -alpha, 1, true)?
                } else {
                    probe
                }
            };
            let undone = self.pos.unmake();
            debug_assert!(undone.is_ok());

            if score > best_score {
                best_score = score;
                best = m;
                ordinal = i as u32;
                if score > alpha {
                    alpha = score;
                    self.write_pv(0, m);
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }

        let kind = bound_kind(best_score, alpha_orig, beta);
        self.ttable.store(TTEntry {
            key: hash,
            depth,
            score: best_score,
            best_move: best,
            kind,
        });

        Ok(RootResult {
            score: best_score,
            best,
            ordinal,
        })
    }

    /// The principal-variation recursion.
    ///
    /// Scores are from the perspective of the side to move at this node.
    /// `ply` is the distance from the root, used for mate scoring and the
    /// per-ply tables; `is_pv` marks nodes whose full window has survived
    /// from the root.
    fn pvs(
        &mut self,
        depth: i16,
        mut alpha: f32,
        mut beta: f32,
        ply: usize,
        is_pv: bool,
    ) -> Result<f32, SearchError> {
        if self.limit.check_time() {
            return Err(SearchError::Timeout);
        }

        self.nodes += 1;
        self.pv_length[ply] = 0;

        if depth <= 0 || ply >= MAX_PLY - 1 {
            return Ok(self.evaluator.evaluate(&self.pos)?);
        }

        let hash = self.pos.zobrist();
        let mut tt_move = None;
        if let Some(entry) = self.ttable.probe(hash) {
            self.tt_hits += 1;
            if entry.best_move != Move::NONE {
                tt_move = Some(entry.best_move);
            }
            if !is_pv && entry.depth >= depth {
                match entry.kind {
                    Bound::Exact => return Ok(entry.score),
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                    Bound::Empty => unreachable!("probe never returns empty entries"),
                }
                if alpha >= beta {
                    return Ok(entry.score);
                }
            }
        }

        // internal iterative deepening: a PV node with no ordering hint is
        // worth a shallow search just to seed the transposition move
        if is_pv && depth >= 4 && tt_move.is_none() {
            self.pvs(depth - 2, alpha, beta, ply, true)?;
            tt_move = self
                .ttable
                .probe(hash)
                .map(|e| e.best_move)
                .filter(|&m| m != Move::NONE);
        }

        let side = self.pos.side_to_move();
        let mut moves = self.pos.legal_moves(side);
        if moves.is_empty() {
            // mated scores prefer the nearer mate; stalemate is dead equal
            return Ok(if self.pos.in_check(side) {
                -(MATE - ply as f32)
            } else {
                0.0
            });
        }

        self.order_moves(&mut moves, tt_move, ply);

        let alpha_orig = alpha;
        let mut best_score = f32::NEG_INFINITY;
        let mut best_move = Move::NONE;

        for i in 0..moves.len() {
            let m = moves.get(i);
            self.pos.make(m);
            let score = if i == 0 {
                -self.pvs(depth - 1, -beta, -alpha, ply + 1, is_pv)?
            } else {
                let probe =
                    -self.pvs(depth - 1, -alpha - NULL_WINDOW, -alpha, ply + 1, false)?;
                if is_pv && alpha < probe && probe < beta {
                    -self.pvs(depth - 1, -beta, -alpha, ply + 1, true)?
                } else {
                    probe
                }
            };
            let undone = self.pos.unmake();
            debug_assert!(undone.is_ok());

            if score > best_score {
                best_score = score;
                best_move = m;
                if score > alpha {
                    alpha = score;
                    if is_pv {
                        self.write_pv(ply, m);
                    }
                    if alpha >= beta {
                        if m.is_quiet() {
                            self.record_killer(ply, m);
                            self.history[m.from_square() as usize]
                                [m.to_square() as usize] += i32::from(depth) * i32::from(depth);
                        }
                        break;
                    }
                }
            }
        }

        self.ttable.store(TTEntry {
            key: hash,
            depth,
            score: best_score,
            best_move,
            kind: bound_kind(best_score, alpha_orig, beta),
        });

        Ok(best_score)
    }

    /// Assign ordering scores to every move and sort the list, best first.
    ///
    /// Scores, highest first: the transposition move, captures by MVV-LVA
    /// (victim value scaled up, attacker value subtracted), the two killers
    /// of this ply, then quiet moves by their history counts.
    fn order_moves(&mut self, moves: &mut MoveList, tt_move: Option<Move>, ply: usize) {
        for i in 0..moves.len() {
            let m = moves.get(i);
            let score = if tt_move == Some(m) {
                ORDER_TT_MOVE
            } else if m.is_capture() {
                let victim = match m.kind() {
                    MoveKind::EnPassant => PieceKind::Pawn,
                    _ => self
                        .pos
                        .piece_kind_at(m.to_square())
                        .unwrap_or(PieceKind::Pawn),
                };
                let attacker = self
                    .pos
                    .piece_kind_at(m.from_square())
                    .unwrap_or(PieceKind::Pawn);
                ORDER_CAPTURE + victim.value() * 10 - attacker.value()
            } else if self.killers[ply][0] == m {
                ORDER_KILLER_FIRST
            } else if self.killers[ply][1] == m {
                ORDER_KILLER_SECOND
            } else {
                self.history[m.from_square() as usize][m.to_square() as usize]
            };
            moves.set_score(i, score);
        }
        moves.sort_desc();
    }

    /// Remember a quiet move which caused a beta cutoff at this ply.
    fn record_killer(&mut self, ply: usize, m: Move) {
        if self.killers[ply][0] != m {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = m;
        }
    }

    /// Extend the principal variation at `ply` with `m` followed by the
    /// line found at `ply + 1`.
    fn write_pv(&mut self, ply: usize, m: Move) {
        let next_len = self.pv_length[ply + 1];
        let (head, tail) = self.pv_table.split_at_mut(ply + 1);
        head[ply][0] = m;
        head[ply][1..=next_len].copy_from_slice(&tail[0][..next_len]);
        self.pv_length[ply] = next_len + 1;
    }
}

/// Classify a finished node's score against its original window.
fn bound_kind(best_score: f32, alpha_orig: f32, beta: f32) -> Bound {
    if best_score <= alpha_orig {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate::MaterialModel;
    use std::sync::Arc;

    fn searcher_for<'a>(
        fen: &str,
        ttable: &'a TTable,
        limit: &'a SearchLimit,
    ) -> Searcher<'a> {
        Searcher::new(
            Position::from_fen(fen).unwrap(),
            ttable,
            limit,
            Evaluator::new(Arc::new(MaterialModel)),
        )
    }

    #[test]
    fn finds_mate_in_one() {
        let ttable = TTable::with_entries(1 << 14);
        let limit = SearchLimit::infinite();
        // Rb8 is mate
        let mut searcher = searcher_for("3k4/R7/1R6/8/8/8/8/4K3 w - - 0 1", &ttable, &limit);
        let result = searcher
            .search_root(3, f32::NEG_INFINITY, f32::INFINITY, None)
            .unwrap();
        assert_eq!(result.best.to_string(), "b6b8");
        assert!(is_mate_score(result.score));
        assert!(result.score > 0.0);
    }

    #[test]
    fn prefers_the_nearer_mate() {
        // mate at ply 1 scores above mate at ply 3
        assert!(MATE - 1.0 > MATE - 3.0);
        assert!(is_mate_score(MATE - 3.0));
        assert!(!is_mate_score(0.9));
    }

    #[test]
    fn mated_root_reports_sentinel() {
        let ttable = TTable::with_entries(1 << 10);
        let limit = SearchLimit::infinite();
        // fool's mate: white to move, checkmated
        let mut searcher = searcher_for(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            &ttable,
            &limit,
        );
        let result = searcher
            .search_root(4, f32::NEG_INFINITY, f32::INFINITY, None)
            .unwrap();
        assert_eq!(result.best, Move::NONE);
        assert_eq!(result.score, -MATE);
    }

    #[test]
    fn takes_the_hanging_queen() {
        let ttable = TTable::with_entries(1 << 14);
        let limit = SearchLimit::infinite();
        // a queen sits en prise on d5
        let mut searcher =
            searcher_for("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", &ttable, &limit);
        let result = searcher
            .search_root(2, f32::NEG_INFINITY, f32::INFINITY, None)
            .unwrap();
        assert_eq!(result.best.to_string(), "e4d5");
        assert!(result.score > 0.0);
    }

    #[test]
    fn timeout_unwinds_the_position() {
        let ttable = TTable::with_entries(1 << 10);
        let limit = SearchLimit::infinite();
        let mut searcher = searcher_for(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &ttable,
            &limit,
        );
        limit.stop();
        let result = searcher.search_root(6, f32::NEG_INFINITY, f32::INFINITY, None);
        assert!(matches!(result, Err(SearchError::Timeout)));
        // the root position must be restored for the next iteration
        assert_eq!(searcher.pos.ply(), 0);
    }

    #[test]
    fn pv_starts_with_best_move() {
        let ttable = TTable::with_entries(1 << 14);
        let limit = SearchLimit::infinite();
        let mut searcher =
            searcher_for("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", &ttable, &limit);
        let result = searcher
            .search_root(3, f32::NEG_INFINITY, f32::INFINITY, None)
            .unwrap();
        let pv = searcher.principal_variation();
        assert!(!pv.is_empty());
        assert_eq!(pv[0], result.best);
    }
}
