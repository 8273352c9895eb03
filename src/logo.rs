use crate::error::{LogoError, Result};
use crate::types::SequenceRecord;
use ndarray::{Array1, ArrayView1, Axis};

/// Maximum information (bits) available over an alphabet of `alphabet_len`
/// symbols: `log2(alphabet_len)`. Also the fixed top of the layout scale.
pub fn max_entropy(alphabet_len: usize) -> f64 {
    (alphabet_len as f64).log2()
}

/// Computes the information content (bits) of one sequence position.
///
/// The height follows the Schneider-Stephens formulation used by WebLogo:
///
/// ```text
/// R(l) = log2(s) - (H(l) + e(n))
/// H(l) = -sum_b f(b,l) * log2(f(b,l))
/// e(n) = (s - 1) / (2 * n)
/// ```
///
/// where `s` is the alphabet size, `f(b,l)` the frequency of symbol `b` at
/// position `l`, and `n` the effective sample size. Symbols with zero
/// frequency contribute exactly 0 to the uncertainty sum. The result may be
/// negative for small `n` and is passed through unclamped.
///
/// # Errors
/// * Returns `LogoError::DegenerateInput` for an empty alphabet, an empty
///   matrix, or `nsites == 0` (guarding every division and logarithm)
/// * Returns `LogoError::InvalidMatrix` if the matrix column count does not
///   match the alphabet or `position` is out of range
pub fn stack_height(record: &SequenceRecord, position: usize) -> Result<f64> {
    check_contract(record)?;
    let matrix = &record.frequency_matrix;
    if position >= matrix.positions() {
        return Err(LogoError::invalid_matrix(
            position,
            format!("position out of range (matrix has {})", matrix.positions()),
        ));
    }
    Ok(height_at(
        matrix.row(position),
        record.alphabet.len(),
        matrix.nsites,
    ))
}

/// Computes [`stack_height`] for every position and stores the result in
/// `record.stack_heights`.
pub fn update_stack_heights(record: &mut SequenceRecord) -> Result<()> {
    check_contract(record)?;
    let alphabet_len = record.alphabet.len();
    let nsites = record.frequency_matrix.nsites;
    let heights: Array1<f64> = record
        .frequency_matrix
        .values
        .rows()
        .into_iter()
        .map(|row| height_at(row, alphabet_len, nsites))
        .collect();
    record.stack_heights = Some(heights);
    Ok(())
}

/// Apportions each position's stack height by frequency and stores the result
/// in `record.letter_heights`: `letter_height(s, l) = f(s, l) * R(l)`.
///
/// # Errors
/// * Returns `LogoError::HeightsNotComputed` if stack heights have not been
///   computed for the current matrix, plus the [`stack_height`] guards
pub fn update_letter_heights(record: &mut SequenceRecord) -> Result<()> {
    check_contract(record)?;
    let heights = record
        .stack_heights
        .as_ref()
        .filter(|heights| heights.len() == record.frequency_matrix.positions())
        .ok_or_else(|| LogoError::HeightsNotComputed(record.identifier.clone()))?;
    let scaled = &record.frequency_matrix.values * &heights.view().insert_axis(Axis(1));
    record.letter_heights = Some(scaled);
    Ok(())
}

/// The single refresh entry point: recomputes stack heights, then letter
/// heights, from the current frequency matrix. Invoked after every parse and
/// after any matrix change; derived fields are stale until it runs.
pub fn update_state(record: &mut SequenceRecord) -> Result<()> {
    update_stack_heights(record)?;
    update_letter_heights(record)
}

fn height_at(frequencies: ArrayView1<'_, f64>, alphabet_len: usize, nsites: usize) -> f64 {
    let uncertainty: f64 = frequencies
        .iter()
        .map(|&f| if f > 0.0 { -f * f.log2() } else { 0.0 })
        .sum();
    let error_correction = (alphabet_len as f64 - 1.0) / (2.0 * nsites as f64);
    max_entropy(alphabet_len) - uncertainty - error_correction
}

/// Fail-fast preconditions shared by the height computations. Parsers emit
/// validated records; this catches hand-built or mutated ones before a
/// division by zero or a silently wrong height.
fn check_contract(record: &SequenceRecord) -> Result<()> {
    let matrix = &record.frequency_matrix;
    if record.alphabet.is_empty() {
        return Err(LogoError::degenerate("alphabet has no symbols"));
    }
    if matrix.positions() == 0 {
        return Err(LogoError::degenerate("frequency matrix has no positions"));
    }
    if matrix.nsites == 0 {
        return Err(LogoError::degenerate("nsites is zero"));
    }
    if matrix.symbol_count() != record.alphabet.len() {
        return Err(LogoError::invalid_matrix(
            0,
            format!(
                "matrix has {} columns but the alphabet has {} symbols",
                matrix.symbol_count(),
                record.alphabet.len()
            ),
        ));
    }
    Ok(())
}
