use crate::alphabet::Alphabet;
use crate::error::{LogoError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Row-sum tolerance for matrices built from exact observation counts.
pub const EXACT_SUM_TOLERANCE: f64 = 1e-9;

/// Row-sum tolerance for matrices read from text input, where published motif
/// files carry probabilities rounded to a handful of decimals.
pub const INPUT_SUM_TOLERANCE: f64 = 1e-3;

/// Per-position symbol frequencies: one row per sequence position, one column
/// per alphabet symbol in [`Alphabet`] order.
///
/// Each row holds finite probabilities in `[0, 1]` summing to 1 within
/// tolerance. `nsites` is the effective number of observations backing the
/// estimate, used by the small-sample correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyMatrix {
    pub values: Array2<f64>,
    pub nsites: usize,
}

impl FrequencyMatrix {
    pub fn new(values: Array2<f64>, nsites: usize) -> Self {
        FrequencyMatrix { values, nsites }
    }

    /// Number of sequence positions (rows).
    pub fn positions(&self) -> usize {
        self.values.nrows()
    }

    /// Number of alphabet symbols (columns).
    pub fn symbol_count(&self) -> usize {
        self.values.ncols()
    }

    /// Frequencies at one position.
    pub fn row(&self, position: usize) -> ArrayView1<'_, f64> {
        self.values.row(position)
    }

    /// Checks shape against the alphabet and every row against the frequency
    /// invariant: finite values in `[0, 1]` summing to 1 within `tolerance`.
    ///
    /// # Errors
    /// * `LogoError::InvalidMatrix` naming the first offending row.
    pub fn validate(&self, alphabet_len: usize, tolerance: f64) -> Result<()> {
        if self.symbol_count() != alphabet_len {
            return Err(LogoError::invalid_matrix(
                0,
                format!(
                    "matrix has {} columns but the alphabet has {} symbols",
                    self.symbol_count(),
                    alphabet_len
                ),
            ));
        }
        for (position, row) in self.values.rows().into_iter().enumerate() {
            let mut sum = 0.0;
            for &frequency in row {
                if !frequency.is_finite() || !(0.0..=1.0).contains(&frequency) {
                    return Err(LogoError::invalid_matrix(
                        position,
                        format!("frequency {} is outside [0, 1]", frequency),
                    ));
                }
                sum += frequency;
            }
            if (sum - 1.0).abs() > tolerance {
                return Err(LogoError::invalid_matrix(
                    position,
                    format!("row sums to {} instead of 1", sum),
                ));
            }
        }
        Ok(())
    }
}

/// Motif-level attributes carried by MEME input. All fields are optional;
/// FASTA-derived records have none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifMetadata {
    /// Version string from the `MEME version` line.
    pub version: Option<String>,
    /// Strand orientations from the `strands:` line, e.g. `['+', '-']`.
    pub strands: Option<Vec<char>>,
    /// Background frequencies in declaration order.
    pub background: Option<Vec<(char, f64)>>,
    /// Second token of the `MOTIF` line, when present.
    pub alternate_name: Option<String>,
    /// First `http(s)://` token found outside recognized sections.
    pub url: Option<String>,
    /// `E=` attribute of the matrix header; 0 when defaulted.
    pub evalue: Option<f64>,
    /// `w=` attribute of the matrix header.
    pub declared_width: Option<usize>,
}

/// Common intermediate produced by either parser and consumed by the height
/// computation and layout engine.
///
/// `stack_heights` and `letter_heights` start `None` and become valid only
/// through [`SequenceRecord::update_state`]. There is no dependency tracking:
/// any change to `frequency_matrix` leaves them stale until the next
/// `update_state` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub identifier: String,
    pub alphabet: Alphabet,
    pub frequency_matrix: FrequencyMatrix,
    pub metadata: Option<MotifMetadata>,
    /// Bits of information per position; `None` until refreshed.
    pub stack_heights: Option<Array1<f64>>,
    /// Stack height apportioned by frequency, rows = positions; `None` until
    /// refreshed.
    pub letter_heights: Option<Array2<f64>>,
}

impl SequenceRecord {
    pub fn new(
        identifier: impl Into<String>,
        alphabet: Alphabet,
        frequency_matrix: FrequencyMatrix,
    ) -> Self {
        SequenceRecord {
            identifier: identifier.into(),
            alphabet,
            frequency_matrix,
            metadata: None,
            stack_heights: None,
            letter_heights: None,
        }
    }

    /// Number of sequence positions.
    pub fn positions(&self) -> usize {
        self.frequency_matrix.positions()
    }

    /// Recomputes both derived height fields from the frequency matrix, in
    /// order: stack heights, then letter heights. The single refresh entry
    /// point to call after every parse or matrix change.
    pub fn update_state(&mut self) -> Result<()> {
        crate::logo::update_state(self)
    }
}
