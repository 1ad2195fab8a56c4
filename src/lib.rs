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

//! Minuet is a chess engine kernel: a bitboard position representation with
//! incremental make/unmake, magic-bitboard move generation, Zobrist hashing,
//! and an iterative-deepening principal-variation search shared across worker
//! threads through a lock-free transposition table.
//!
//! The crate deliberately stops at the engine boundary.
//! The outer HTTP shell consumes [`service::GameSession`], and the neural
//! position evaluator is bound through [`engine::evaluate::Model`]; neither
//! the web server nor the network weights live here.

#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

pub mod base;
pub mod engine;
pub mod service;

mod error;
pub use error::EngineError;
