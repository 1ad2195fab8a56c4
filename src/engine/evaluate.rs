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

//! The adapter over the external position evaluator.
//!
//! The search only ever sees `evaluate(position) -> f32`; what sits behind
//! that is a [`Model`], an opaque function from the encoded position tensors
//! to a scalar in [-1, +1], scored from the side to move's point of view.
//!
//! The adapter packs the twelve piece bitboards into a dense 8x8x12 one-hot
//! plane tensor, appends a flags vector (side to move, castling rights,
//! en passant), and hands both to the model.
//! Encode buffers are allocated once per adapter and reused for every call;
//! each search worker owns its own adapter, so encoding never contends.
//! The model itself is shared and must be thread-safe.

use crate::base::{PieceKind, Position, Side};

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

/// The length of the plane tensor: 8 x 8 squares x 12 piece planes.
pub const PLANES_LEN: usize = 8 * 8 * 12;

/// The length of the base flags vector: side to move, four castling rights,
/// and whether en passant is available.
pub const FLAGS_LEN: usize = 6;

/// The length of the flags vector in the file-one-hot model variant: side to
/// move, four castling rights, and an 8-wide en-passant file one-hot.
pub const FLAGS_LEN_FILE_ONE_HOT: usize = 13;

#[derive(Error, Debug)]
/// The ways the evaluator can fail.
/// Any of these is fatal for the search that hits it: the driver surfaces
/// the failure rather than returning a stale or garbage score.
pub enum EvalError {
    /// The model file could not be read.
    #[error("failed to load model from {path}: {source}")]
    Load {
        /// The path that was tried.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
    /// The model file does not hold the expected number of weights.
    #[error("model file {path} holds {found} weights, expected {expected}")]
    Shape {
        /// The path that was loaded.
        path: PathBuf,
        /// The number of weights the variant requires.
        expected: usize,
        /// The number of weights found in the file.
        found: usize,
    },
    /// The model failed to produce a score.
    #[error("model inference failed: {0}")]
    Inference(String),
}

/// An opaque position evaluator.
///
/// `planes` is the 8x8x12 one-hot tensor and `flags` the flags vector, whose
/// length the model dictates through [`Model::flags_len`].
/// The returned scalar is in [-1, +1] from the side to move's perspective.
///
/// Implementations are shared across search workers, so they must be
/// thread-safe; per-call scratch state belongs in the [`Evaluator`], not
/// here.
pub trait Model: Send + Sync {
    /// The flags-vector length this model expects: [`FLAGS_LEN`] or
    /// [`FLAGS_LEN_FILE_ONE_HOT`].
    fn flags_len(&self) -> usize;

    /// Score the encoded position.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError::Inference`] if the model cannot produce a
    /// score; the search aborts in response.
    fn infer(&self, planes: &[f32], flags: &[f32]) -> Result<f32, EvalError>;
}

/// The per-worker evaluation adapter: owns the reusable encode buffers and
/// a handle to the shared model.
pub struct Evaluator {
    /// The shared model.
    model: Arc<dyn Model>,
    /// The reused plane tensor buffer.
    planes: Box<[f32; PLANES_LEN]>,
    /// The reused flags buffer, sized to the model's variant.
    flags: Vec<f32>,
}

impl Evaluator {
    #[must_use]
    /// Create an adapter over the given model, pre-allocating its buffers.
    pub fn new(model: Arc<dyn Model>) -> Evaluator {
        let flags = vec![0.0; model.flags_len()];
        Evaluator {
            model,
            planes: Box::new([0.0; PLANES_LEN]),
            flags,
        }
    }

    /// Score the given position.
    ///
    /// # Errors
    ///
    /// Propagates any [`EvalError`] from the model; the caller must abort
    /// its search rather than substitute a score.
    pub fn evaluate(&mut self, pos: &Position) -> Result<f32, EvalError> {
        self.encode(pos);
        self.model.infer(&self.planes[..], &self.flags)
    }

    /// Pack the position into the reused buffers.
    /// Plane layout: square-major, `(row * 8 + col) * 12 + plane`, where the
    /// plane index is `kind + 6 * side`.
    fn encode(&mut self, pos: &Position) {
        self.planes.fill(0.0);
        for side in [Side::White, Side::Black] {
            for kind in PieceKind::ALL {
                let plane = kind as usize + PieceKind::NUM * side as usize;
                for sq in pos.pieces(side, kind) {
                    self.planes[sq as usize * 12 + plane] = 1.0;
                }
            }
        }

        self.flags.fill(0.0);
        if pos.side_to_move() == Side::White {
            self.flags[0] = 1.0;
        }
        let rights = pos.castle_rights();
        for side in [Side::White, Side::Black] {
            if rights.kingside(side) {
                self.flags[1 + 2 * side as usize] = 1.0;
            }
            if rights.queenside(side) {
                self.flags[2 + 2 * side as usize] = 1.0;
            }
        }
        if let Some(ep) = pos.en_passant_target() {
            if self.flags.len() == FLAGS_LEN_FILE_ONE_HOT {
                self.flags[5 + ep.col()] = 1.0;
            } else {
                self.flags[5] = 1.0;
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
/// The built-in fallback evaluator: material balance squashed into the
/// model's output range.
/// Deterministic, dependency-free, and used whenever no model path is
/// configured; the test suite leans on its stability.
pub struct MaterialModel;

/// One queen and change; a material lead this large is winning anyway, so
/// the squash saturates around it.
const MATERIAL_SCALE: f32 = 1000.0;

impl Model for MaterialModel {
    fn flags_len(&self) -> usize {
        FLAGS_LEN
    }

    fn infer(&self, planes: &[f32], flags: &[f32]) -> Result<f32, EvalError> {
        const VALUES: [f32; PieceKind::NUM] = [100.0, 300.0, 300.0, 500.0, 900.0, 0.0];
        let mut balance = 0.0;
        for (i, &occupied) in planes.iter().enumerate() {
            if occupied != 0.0 {
                let plane = i % 12;
                let value = VALUES[plane % PieceKind::NUM];
                balance += if plane < PieceKind::NUM { value } else { -value };
            }
        }
        // orient to the side to move
        if flags[0] == 0.0 {
            balance = -balance;
        }
        Ok((balance / MATERIAL_SCALE).tanh())
    }
}

#[derive(Debug)]
/// The shipped binding of the on-disk evaluator: a dense linear layer over
/// the full input tensor, stored as little-endian `f32` words (one weight
/// per plane input, one per flag, then a bias), with the output squashed
/// into [-1, +1].
pub struct LinearModel {
    /// The weights, plane inputs first, then flag inputs.
    weights: Vec<f32>,
    /// The bias term.
    bias: f32,
    /// The flags variant this file was sized for.
    flags_len: usize,
}

impl LinearModel {
    /// Load a weights file.
    /// The flags variant is inferred from the file size: either
    /// [`FLAGS_LEN`] or [`FLAGS_LEN_FILE_ONE_HOT`] flags plus the planes
    /// and a bias.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Load`] if the file cannot be read, or
    /// [`EvalError::Shape`] if its length matches neither variant.
    pub fn load(path: &Path) -> Result<LinearModel, EvalError> {
        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut f| f.read_to_end(&mut bytes))
            .map_err(|source| EvalError::Load {
                path: path.into(),
                source,
            })?;

        if bytes.len() % 4 != 0 {
            return Err(EvalError::Shape {
                path: path.into(),
                expected: PLANES_LEN + FLAGS_LEN + 1,
                found: bytes.len() / 4,
            });
        }
        let words: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let flags_len = match words.len() {
            n if n == PLANES_LEN + FLAGS_LEN + 1 => FLAGS_LEN,
            n if n == PLANES_LEN + FLAGS_LEN_FILE_ONE_HOT + 1 => FLAGS_LEN_FILE_ONE_HOT,
            found => {
                return Err(EvalError::Shape {
                    path: path.into(),
                    expected: PLANES_LEN + FLAGS_LEN + 1,
                    found,
                })
            }
        };

        let (weights, bias) = words.split_at(words.len() - 1);
        Ok(LinearModel {
            weights: weights.to_vec(),
            bias: bias[0],
            flags_len,
        })
    }
}

impl Model for LinearModel {
    fn flags_len(&self) -> usize {
        self.flags_len
    }

    fn infer(&self, planes: &[f32], flags: &[f32]) -> Result<f32, EvalError> {
        let mut sum = self.bias;
        let (plane_weights, flag_weights) = self.weights.split_at(PLANES_LEN);
        for (w, x) in plane_weights.iter().zip(planes) {
            sum += w * x;
        }
        for (w, x) in flag_weights.iter().zip(flags) {
            sum += w * x;
        }
        if !sum.is_finite() {
            return Err(EvalError::Inference("non-finite model output".into()));
        }
        Ok(sum.tanh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let mut evaluator = Evaluator::new(Arc::new(MaterialModel));
        let score = evaluator.evaluate(&Position::new()).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn material_is_side_to_move_relative() {
        // white is up a queen
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let flipped = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        let mut evaluator = Evaluator::new(Arc::new(MaterialModel));
        let white_view = evaluator.evaluate(&pos).unwrap();
        let black_view = evaluator.evaluate(&flipped).unwrap();
        assert!(white_view > 0.0);
        assert!((white_view + black_view).abs() < 1e-6);
    }

    #[test]
    fn output_is_bounded() {
        // an absurd material imbalance still scores inside (-1, 1)
        let pos = Position::from_fen("4k3/8/8/8/8/8/PPPPPPPP/QQQQKQQQ w - - 0 1").unwrap();
        let mut evaluator = Evaluator::new(Arc::new(MaterialModel));
        let score = evaluator.evaluate(&pos).unwrap();
        assert!(score > 0.9 && score < 1.0);
    }

    #[test]
    fn linear_model_loads_and_infers() {
        let dir = std::env::temp_dir();
        let path = dir.join("minuet_linear_model_test.bin");
        // all-zero weights, bias 0.5
        let mut bytes = vec![0u8; (PLANES_LEN + FLAGS_LEN) * 4];
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let model = LinearModel::load(&path).unwrap();
        assert_eq!(model.flags_len(), FLAGS_LEN);
        let mut evaluator = Evaluator::new(Arc::new(model));
        let score = evaluator.evaluate(&Position::new()).unwrap();
        assert!((score - 0.5f32.tanh()).abs() < 1e-6);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn linear_model_rejects_wrong_shape() {
        let dir = std::env::temp_dir();
        let path = dir.join("minuet_linear_model_bad.bin");
        std::fs::write(&path, [0u8; 12]).unwrap();
        assert!(matches!(
            LinearModel::load(&path),
            Err(EvalError::Shape { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_model_is_a_load_error() {
        let path = Path::new("/nonexistent/minuet/model.bin");
        assert!(matches!(
            LinearModel::load(path),
            Err(EvalError::Load { .. })
        ));
    }
}
