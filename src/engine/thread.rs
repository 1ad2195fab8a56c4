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

//! The iterative-deepening driver and its worker pool.
//!
//! Parallelism is "Lazy SMP": every worker runs the same iterative
//! deepening over its own position clone, and the workers cooperate only
//! through the shared transposition table.
//! Aggregation is a single mutex-guarded best-so-far record; the deepest
//! completed iteration wins, with ties broken by score and then by root
//! move ordinal, so the aggregate is deterministic for any fixed set of
//! completed iterations.

use crate::base::{algebraic, attacks, Move, Position};

use crate::EngineError;

use super::{
    config::EngineConfig,
    evaluate::{EvalError, Evaluator, LinearModel, MaterialModel, Model},
    limit::SearchLimit,
    search::{is_mate_score, RootResult, SearchError, Searcher, MATE},
    transposition::TTable,
};

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    thread::scope,
    time::{Duration, Instant},
};

use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
/// What a completed search found.
pub struct SearchReport {
    /// The best move found, or `Move::NONE` if the root position has no
    /// legal moves.
    pub best_move: Move,
    /// The score of the best move, from the root side to move's
    /// perspective.
    pub score: f32,
    /// The deepest fully completed iteration.
    pub depth: i16,
    /// The total number of nodes searched, across all workers.
    pub nodes: u64,
}

/// The shared best-so-far record the workers race to improve.
struct BestRecord {
    depth: i16,
    score: f32,
    best: Move,
    ordinal: u32,
}

impl BestRecord {
    /// The aggregation order: deeper completed iterations always win; at
    /// equal depth the higher score wins; at equal score the lower root
    /// ordinal wins.
    fn improved_by(&self, depth: i16, result: &RootResult) -> bool {
        if depth != self.depth {
            return depth > self.depth;
        }
        if result.score != self.score {
            return result.score > self.score;
        }
        result.ordinal < self.ordinal
    }
}

/// The search driver: owns the transposition table and the evaluator
/// binding, and runs one worker pool per [`SearchDriver::find_best_move`]
/// call.
pub struct SearchDriver {
    config: EngineConfig,
    ttable: TTable,
    model: Arc<dyn Model>,
}

impl SearchDriver {
    /// Construct a driver from a configuration, binding the evaluator named
    /// by `model_path` (or the built-in material fallback when no path is
    /// configured).
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Evaluator`] if the model fails to load.
    pub fn new(config: EngineConfig) -> Result<SearchDriver, EngineError> {
        let model: Arc<dyn Model> = match &config.model_path {
            Some(path) => Arc::new(LinearModel::load(path)?),
            None => Arc::new(MaterialModel),
        };
        Ok(SearchDriver::with_model(config, model))
    }

    #[must_use]
    /// Construct a driver over an already-loaded model.
    /// Also forces the attack tables, so no search pays their
    /// initialization cost.
    pub fn with_model(config: EngineConfig, model: Arc<dyn Model>) -> SearchDriver {
        attacks::init();
        SearchDriver {
            ttable: TTable::with_entries(config.tt_entries),
            config,
            model,
        }
    }

    /// Search for the best move in `pos` within the given wall-clock
    /// budget.
    ///
    /// A sentinel [`Move::NONE`] is reported when the position has no legal
    /// moves; a position with exactly one legal move returns it without
    /// searching.
    /// Otherwise the report always reflects at least one fully completed
    /// iteration: depth 1 is searched synchronously before the deadline is
    /// armed.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Evaluator`] if the evaluator fails; no
    /// partial or stale score is ever substituted.
    pub fn find_best_move(
        &self,
        pos: &Position,
        budget: Duration,
    ) -> Result<SearchReport, EngineError> {
        let side = pos.side_to_move();
        let root_moves = pos.legal_moves(side);
        if root_moves.is_empty() {
            let score = if pos.in_check(side) { -MATE } else { 0.0 };
            return Ok(SearchReport {
                best_move: Move::NONE,
                score,
                depth: 0,
                nodes: 0,
            });
        }
        if root_moves.len() == 1 {
            return Ok(SearchReport {
                best_move: root_moves.get(0),
                score: 0.0,
                depth: 0,
                nodes: 0,
            });
        }

        // depth 1 runs under an unexpiring limit, so one completed depth is
        // guaranteed no matter how small the budget is
        let warmup_limit = SearchLimit::infinite();
        let mut warmup = Searcher::new(
            pos.clone(),
            &self.ttable,
            &warmup_limit,
            Evaluator::new(self.model.clone()),
        );
        let seed = warmup.search_root(1, f32::NEG_INFINITY, f32::INFINITY, None)?;

        let deadline = Instant::now() + budget.mul_f64(self.config.time_buffer);
        let limit = SearchLimit::until(deadline);
        let best = Mutex::new(BestRecord {
            depth: 1,
            score: seed.score,
            best: seed.best,
            ordinal: seed.ordinal,
        });
        let total_nodes = AtomicU64::new(warmup.nodes());
        let failure: Mutex<Option<EvalError>> = Mutex::new(None);

        scope(|s| {
            for worker_id in 0..self.config.thread_count {
                let limit = &limit;
                let best = &best;
                let total_nodes = &total_nodes;
                let failure = &failure;
                s.spawn(move || {
                    self.worker(worker_id, pos, limit, best, total_nodes, failure);
                });
            }
            // the scope joins every worker; each one stops cooperatively
            // within a node of the deadline passing
        });

        if let Some(e) = failure.into_inner().unwrap() {
            return Err(EngineError::Evaluator(e));
        }

        let record = best.into_inner().unwrap();
        let nodes = total_nodes.into_inner();
        info!(
            depth = record.depth,
            score = record.score,
            nodes,
            best = %algebraic::format_move(record.best),
            "search finished"
        );
        Ok(SearchReport {
            best_move: record.best,
            score: record.score,
            depth: record.depth,
            nodes,
        })
    }

    /// One worker's life: iterative deepening until the deadline, a mate,
    /// or the depth cap, publishing every completed iteration.
    fn worker(
        &self,
        worker_id: usize,
        pos: &Position,
        limit: &SearchLimit,
        best: &Mutex<BestRecord>,
        total_nodes: &AtomicU64,
        failure: &Mutex<Option<EvalError>>,
    ) {
        let mut searcher = Searcher::new(
            pos.clone(),
            &self.ttable,
            limit,
            Evaluator::new(self.model.clone()),
        );
        let mut prev: Option<RootResult> = None;

        for depth in 2..=self.config.max_depth {
            match self.iterate(&mut searcher, depth, prev) {
                Ok(Some(result)) => {
                    {
                        let mut record = best.lock().unwrap();
                        if record.improved_by(depth, &result) {
                            record.depth = depth;
                            record.score = result.score;
                            record.best = result.best;
                            record.ordinal = result.ordinal;
                        }
                    }
                    debug!(
                        worker_id,
                        depth,
                        score = result.score,
                        nodes = searcher.nodes(),
                        tt_hits = searcher.tt_hits(),
                        pv = %searcher
                            .principal_variation()
                            .iter()
                            .map(|&m| algebraic::format_move(m))
                            .collect::<Vec<_>>()
                            .join(" "),
                        "completed iteration"
                    );
                    if is_mate_score(result.score) {
                        break;
                    }
                    prev = Some(result);
                }
                // the deadline passed mid-iteration; the completed depths
                // are already published
                Ok(None) => break,
                Err(e) => {
                    failure.lock().unwrap().get_or_insert(e);
                    limit.stop();
                    break;
                }
            }
        }

        total_nodes.fetch_add(searcher.nodes(), Ordering::Relaxed);
    }

    /// Run one aspiration-windowed iteration at `depth`.
    /// Returns `Ok(None)` if the deadline passed before the iteration
    /// completed.
    fn iterate(
        &self,
        searcher: &mut Searcher,
        depth: i16,
        prev: Option<RootResult>,
    ) -> Result<Option<RootResult>, EvalError> {
        let w = self.config.aspiration_window;
        let (mut alpha, mut beta) = match prev {
            Some(r) => (r.score - w, r.score + w),
            None => (f32::NEG_INFINITY, f32::INFINITY),
        };
        let center = prev.map_or(0.0, |r| r.score);
        let prev_best = prev.map(|r| r.best);
        let mut fails_low = 0u32;
        let mut fails_high = 0u32;

        loop {
            match searcher.search_root(depth, alpha, beta, prev_best) {
                Ok(result) if result.score <= alpha && alpha > f32::NEG_INFINITY => {
                    // fail low: drop the lower bound by W, then 2W, then to
                    // -infinity, leaving the upper bound alone
                    alpha = match fails_low {
                        0 => center - 2.0 * w,
                        1 => center - 4.0 * w,
                        _ => f32::NEG_INFINITY,
                    };
                    fails_low += 1;
                }
                Ok(result) if result.score >= beta && beta < f32::INFINITY => {
                    beta = match fails_high {
                        0 => center + 2.0 * w,
                        1 => center + 4.0 * w,
                        _ => f32::INFINITY,
                    };
                    fails_high += 1;
                }
                Ok(result) => return Ok(Some(result)),
                Err(SearchError::Timeout) => return Ok(None),
                Err(SearchError::Evaluator(e)) => return Err(e),
            }
        }
    }
}
