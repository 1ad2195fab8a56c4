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

//! A small command-line driver for the engine kernel: perft counting and
//! one-shot searches from a FEN.
//!
//! ```text
//! minuet perft <depth> [fen]
//! minuet search <millis> [fen]
//! ```
//!
//! The starting position is assumed when no FEN is given.
//! Set `RUST_LOG=minuet=debug` to watch the iteration log.

use minuet::base::{algebraic, perft, Position};
use minuet::engine::{EngineConfig, SearchDriver};

use std::{env, process::ExitCode, time::Duration};

use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: minuet perft <depth> [fen]\n       minuet search <millis> [fen]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let (command, rest) = args.split_first().ok_or(USAGE)?;
    let (number, fen_parts) = rest.split_first().ok_or(USAGE)?;

    let mut pos = if fen_parts.is_empty() {
        Position::new()
    } else {
        Position::from_fen(&fen_parts.join(" ")).map_err(|e| e.to_string())?
    };

    match command.as_str() {
        "perft" => {
            let depth: u8 = number.parse().map_err(|_| USAGE.to_string())?;
            perft::divide(&mut pos, depth);
            Ok(())
        }
        "search" => {
            let millis: u64 = number.parse().map_err(|_| USAGE.to_string())?;
            let driver =
                SearchDriver::new(EngineConfig::default()).map_err(|e| e.to_string())?;
            let report = driver
                .find_best_move(&pos, Duration::from_millis(millis))
                .map_err(|e| e.to_string())?;
            println!(
                "bestmove {} score {:+.3} depth {} nodes {}",
                algebraic::format_move(report.best_move),
                report.score,
                report.depth,
                report.nodes
            );
            Ok(())
        }
        _ => Err(USAGE.into()),
    }
}
