use crate::alphabet::{glyph_index, Alphabet};
use crate::error::{LogoError, Result};
use crate::logo::max_entropy;
use crate::types::SequenceRecord;
use serde::{Deserialize, Serialize};

/// A `[lower, upper)` vertical span assigned to one symbol at one position.
///
/// `glyph` is the alphabet registry's fixed index for the symbol, the key a
/// rendering adapter uses to pick a glyph path and color. Intervals at one
/// position are non-overlapping and sorted by descending length, so the
/// tallest symbol sits at the bottom of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    pub glyph: usize,
}

impl Interval {
    /// Vertical extent of the span.
    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Stacks one position's letter heights into drawable intervals.
///
/// A first pass accumulates spans in declared alphabet order purely to fix
/// each symbol's span length. Spans are then stable-sorted by descending
/// length (ties keep declaration order) and re-accumulated from the baseline
/// `max_entropy - stack_height`, which anchors low-information positions near
/// the axis and keeps the full-entropy line fixed across all positions.
/// Zero-length spans are dropped before returning.
///
/// Inputs are borrowed read-only; the returned intervals are an independent
/// value.
///
/// # Errors
/// * Returns `LogoError::InvalidMatrix` if `letter_heights` does not match
///   the alphabet length
/// * Returns `LogoError::UnknownSymbol` if a symbol with drawable height is
///   outside the registry's closed glyph set
pub fn position_intervals(
    alphabet: &Alphabet,
    letter_heights: &[f64],
    stack_height: f64,
    max_entropy: f64,
) -> Result<Vec<Interval>> {
    if letter_heights.len() != alphabet.len() {
        return Err(LogoError::invalid_matrix(
            0,
            format!(
                "letter heights have {} entries but the alphabet has {} symbols",
                letter_heights.len(),
                alphabet.len()
            ),
        ));
    }

    // Declaration-order pass; only the span lengths survive the sort.
    let mut spans: Vec<(f64, usize)> = Vec::with_capacity(letter_heights.len());
    let mut cursor = 0.0;
    for (column, &height) in letter_heights.iter().enumerate() {
        let next = cursor + height;
        spans.push((next - cursor, column));
        cursor = next;
    }
    spans.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut intervals = Vec::with_capacity(spans.len());
    let mut cursor = max_entropy - stack_height;
    for (length, column) in spans {
        let lower = cursor;
        let upper = cursor + length;
        cursor = upper;
        if length <= 0.0 {
            continue;
        }
        let symbol = alphabet
            .symbol_at(column)
            .ok_or(LogoError::UnknownGlyphIndex(column))?;
        intervals.push(Interval {
            lower,
            upper,
            glyph: glyph_index(symbol)?,
        });
    }
    Ok(intervals)
}

/// Computes [`position_intervals`] for every position of a refreshed record.
///
/// # Errors
/// * Returns `LogoError::HeightsNotComputed` if `update_state` has not run
///   since the frequency matrix last changed (missing or mis-shaped derived
///   fields), plus any [`position_intervals`] error
pub fn record_intervals(record: &SequenceRecord) -> Result<Vec<Vec<Interval>>> {
    let stale = || LogoError::HeightsNotComputed(record.identifier.clone());
    let stack_heights = record.stack_heights.as_ref().ok_or_else(stale)?;
    let letter_heights = record.letter_heights.as_ref().ok_or_else(stale)?;
    let positions = record.positions();
    if stack_heights.len() != positions || letter_heights.nrows() != positions {
        return Err(stale());
    }

    let top = max_entropy(record.alphabet.len());
    let mut layout = Vec::with_capacity(positions);
    for position in 0..positions {
        let row = letter_heights.row(position).to_vec();
        layout.push(position_intervals(
            &record.alphabet,
            &row,
            stack_heights[position],
            top,
        )?);
    }
    Ok(layout)
}
