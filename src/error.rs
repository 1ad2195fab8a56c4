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

//! The error type spoken at the engine boundary.
//!
//! Leaf validation (FEN strings, client moves, square indices) surfaces
//! these to the caller.
//! Inside the search, failures propagate as values and abort the request;
//! nothing is retried.

use crate::base::fen::FenError;
use crate::engine::evaluate::EvalError;

use thiserror::Error;

#[derive(Error, Debug)]
/// Everything that can go wrong at the boundary of the engine.
pub enum EngineError {
    /// A malformed position string.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),

    /// A client-submitted move which is not in the legal-move list.
    #[error("illegal move {0}")]
    IllegalMove(String),

    /// A square index outside 0..64.
    #[error("square index {0} out of range")]
    InvalidSquare(u32),

    /// The evaluator failed to load or to infer.
    /// Fatal for the request: the search aborts rather than score positions
    /// with stale or garbage values.
    #[error("evaluator failure: {0}")]
    Evaluator(#[from] EvalError),

    /// A detected inconsistency of bitboards, history, or search state.
    /// Never user-recoverable; the request is aborted and the details
    /// logged.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(&'static str),
}

impl From<crate::engine::SearchError> for EngineError {
    fn from(e: crate::engine::SearchError) -> EngineError {
        use crate::engine::SearchError;
        match e {
            // only reachable if a search under an unexpiring limit claims a
            // timeout
            SearchError::Timeout => {
                EngineError::InternalInvariant("search timed out with no completed depth")
            }
            SearchError::Evaluator(source) => EngineError::Evaluator(source),
        }
    }
}
