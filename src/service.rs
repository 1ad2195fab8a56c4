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

//! The request/response boundary the outer shell consumes.
//!
//! A [`GameSession`] owns one game: a position, the search driver, and a
//! repetition ledger.
//! Its operations mirror the outer service's endpoints one to one
//! (`initial_position`, `legal_moves_for`, `make_move`, `computer_move`,
//! `undo`), each answering with a [`BoardState`].
//! The wire types here derive serde so the shell can marshal them as JSON;
//! none of them leak into the engine's own vocabulary.

use crate::base::{Move, Position, Side, Square};

use crate::engine::{EngineConfig, SearchDriver};

use crate::EngineError;

use nohash_hasher::IntMap;

use serde::{Deserialize, Serialize};

use std::time::Duration;

use tracing::info;

/// How long the computer thinks per move unless the caller overrides it.
const DEFAULT_THINK_TIME: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// The state of the game as the outer shell sees it.
pub struct BoardState {
    /// The position in FEN.
    pub fen: String,
    /// +1 if White has delivered mate, -1 if Black has, 0 otherwise
    /// (running, stalemate, or drawn by repetition).
    pub winner_flag: i8,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// A move on the wire: the packed word, plus redundant unpacked fields for
/// the UI's convenience.
pub struct MoveRecord {
    /// The packed move word; authoritative.
    pub value: u32,
    /// The from-square index.
    pub from_tile_index: u32,
    /// The to-square index.
    pub to_tile_index: u32,
    /// The `MoveKind` discriminant.
    pub move_type: u8,
    /// The promoted `PieceKind` discriminant, or 0 when not promoting.
    pub promoted_piece_type: u8,
}

impl From<Move> for MoveRecord {
    fn from(m: Move) -> MoveRecord {
        MoveRecord {
            value: m.value(),
            from_tile_index: m.from_square() as u32,
            to_tile_index: m.to_square() as u32,
            move_type: m.kind() as u8,
            promoted_piece_type: m.promotion().map_or(0, |p| p as u8),
        }
    }
}

/// One game in progress: the session every boundary operation acts on.
pub struct GameSession {
    /// The game's position, mutated only through make/unmake.
    position: Position,
    /// The search driver, shared across the session's computer moves.
    driver: SearchDriver,
    /// How long the computer thinks per move.
    think_time: Duration,
    /// How many times each position (by Zobrist key) has occurred, for
    /// threefold-repetition detection.
    /// Keys are already hashes, so the identity hasher is the right map.
    seen: IntMap<u64, u32>,
}

impl GameSession {
    /// Create a session at the starting position.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Evaluator`] if the configured model fails
    /// to load.
    pub fn new(config: EngineConfig) -> Result<GameSession, EngineError> {
        Ok(GameSession::with_driver(SearchDriver::new(config)?))
    }

    #[must_use]
    /// Create a session at the starting position over an existing driver.
    pub fn with_driver(driver: SearchDriver) -> GameSession {
        let position = Position::new();
        let mut seen = IntMap::default();
        seen.insert(position.zobrist(), 1);
        GameSession {
            position,
            driver,
            think_time: DEFAULT_THINK_TIME,
            seen,
        }
    }

    /// Override how long the computer thinks per move.
    pub fn set_think_time(&mut self, think_time: Duration) {
        self.think_time = think_time;
    }

    /// Reset the session to the starting position and report it.
    pub fn initial_position(&mut self) -> BoardState {
        self.position = Position::new();
        self.seen.clear();
        self.seen.insert(self.position.zobrist(), 1);
        info!("session reset");
        self.board_state()
    }

    #[must_use]
    /// Report the current state without changing anything.
    pub fn board_state(&self) -> BoardState {
        BoardState {
            fen: self.position.to_fen(),
            winner_flag: self.winner_flag(),
        }
    }

    /// List the legal moves which start from the given square index.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::InvalidSquare`] if the index is not on
    /// 0..64.
    pub fn legal_moves_for(&self, square_index: u32) -> Result<Vec<MoveRecord>, EngineError> {
        let sq = u8::try_from(square_index)
            .ok()
            .and_then(|x| Square::try_from(x).ok())
            .ok_or(EngineError::InvalidSquare(square_index))?;
        Ok(self
            .position
            .legal_moves(self.position.side_to_move())
            .iter()
            .filter(|m| m.from_square() == sq)
            .map(MoveRecord::from)
            .collect())
    }

    /// Play a client-submitted move.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::IllegalMove`] unless the move is in the
    /// current legal-move list.
    pub fn make_move(&mut self, record: MoveRecord) -> Result<BoardState, EngineError> {
        let side = self.position.side_to_move();
        let m = self
            .position
            .legal_moves(side)
            .iter()
            .find(|m| m.value() == record.value)
            .ok_or_else(|| EngineError::IllegalMove(Move::from_value(record.value).to_string()))?;
        self.apply(m);
        info!(mv = %m, "client move");
        Ok(self.board_state())
    }

    /// Have the engine choose and play a move.
    /// If the game is already over (mate, stalemate, or repetition), the
    /// state is reported unchanged.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Evaluator`] if the evaluator fails; the
    /// position is left unchanged in that case.
    pub fn computer_move(&mut self) -> Result<BoardState, EngineError> {
        if self.game_over() {
            return Ok(self.board_state());
        }
        let report = self.driver.find_best_move(&self.position, self.think_time)?;
        if report.best_move == Move::NONE {
            // the game-over check above makes a sentinel unreachable
            return Err(EngineError::InternalInvariant(
                "search returned no move in a live position",
            ));
        }
        self.apply(report.best_move);
        info!(mv = %report.best_move, depth = report.depth, "computer move");
        Ok(self.board_state())
    }

    /// Take back the most recent move (of either player).
    /// A session with no moves to take back reports its state unchanged.
    pub fn undo(&mut self) -> Result<BoardState, EngineError> {
        if self.position.ply() > 0 {
            let key = self.position.zobrist();
            match self.seen.get_mut(&key) {
                Some(count) if *count > 1 => *count -= 1,
                Some(_) => {
                    self.seen.remove(&key);
                }
                None => {
                    return Err(EngineError::InternalInvariant(
                        "repetition ledger out of sync with history",
                    ))
                }
            }
            self.position
                .unmake()
                .map_err(EngineError::InternalInvariant)?;
            info!("undo");
        }
        Ok(self.board_state())
    }

    #[must_use]
    /// Whether the game has ended: no legal moves, or threefold repetition.
    pub fn game_over(&self) -> bool {
        self.position
            .legal_moves(self.position.side_to_move())
            .is_empty()
            || self.drawn_by_repetition()
    }

    #[must_use]
    /// Whether the current position has occurred three or more times.
    pub fn drawn_by_repetition(&self) -> bool {
        self.seen
            .get(&self.position.zobrist())
            .is_some_and(|&count| count >= 3)
    }

    /// Apply a legal move and record the resulting position in the
    /// repetition ledger.
    fn apply(&mut self, m: Move) {
        self.position.make(m);
        *self.seen.entry(self.position.zobrist()).or_insert(0) += 1;
    }

    /// The winner flag of the current position: nonzero only on checkmate.
    fn winner_flag(&self) -> i8 {
        let side = self.position.side_to_move();
        if self.position.legal_moves(side).is_empty() && self.position.in_check(side) {
            match side.opponent() {
                Side::White => 1,
                Side::Black => -1,
            }
        } else {
            0
        }
    }
}
