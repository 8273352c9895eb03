use crate::error::{LogoError, Result};
use crate::types::SequenceRecord;
use polars::lazy::dsl::*;
use polars::prelude::*;

/// Renders a record's frequency matrix as a DataFrame: a 1-based "position"
/// column plus one `f64` column per alphabet symbol, in alphabet order.
///
/// # Errors
/// * Returns `LogoError::DataError` if DataFrame creation fails
pub fn frequency_frame(record: &SequenceRecord) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(record.alphabet.len() + 1);
    columns.push(Column::new(
        "position".into(),
        position_labels(record.positions()),
    ));
    for (index, &symbol) in record.alphabet.symbols().iter().enumerate() {
        columns.push(Column::new(
            symbol.to_string().into(),
            record.frequency_matrix.values.column(index).to_vec(),
        ));
    }
    DataFrame::new(columns).map_err(|err| LogoError::DataError(err.to_string()))
}

/// Renders a refreshed record's letter heights as a DataFrame: a 1-based
/// "position" column, one column per alphabet symbol, and a "stack" column
/// with the total information per position.
///
/// # Errors
/// * Returns `LogoError::HeightsNotComputed` if `update_state` has not run
/// * Returns `LogoError::DataError` if DataFrame creation fails
pub fn heights_frame(record: &SequenceRecord) -> Result<DataFrame> {
    let stale = || LogoError::HeightsNotComputed(record.identifier.clone());
    let stack_heights = record.stack_heights.as_ref().ok_or_else(stale)?;
    let letter_heights = record.letter_heights.as_ref().ok_or_else(stale)?;

    let mut columns = Vec::with_capacity(record.alphabet.len() + 2);
    columns.push(Column::new(
        "position".into(),
        position_labels(record.positions()),
    ));
    for (index, &symbol) in record.alphabet.symbols().iter().enumerate() {
        columns.push(Column::new(
            symbol.to_string().into(),
            letter_heights.column(index).to_vec(),
        ));
    }
    columns.push(Column::new("stack".into(), stack_heights.to_vec()));
    DataFrame::new(columns).map_err(|err| LogoError::DataError(err.to_string()))
}

/// Per-position summary: the stack height next to the dominant letter height
/// (the tallest single symbol), computed lazily across the symbol columns.
///
/// # Errors
/// * Same conditions as [`heights_frame`]
pub fn summary_frame(record: &SequenceRecord) -> Result<DataFrame> {
    let heights = heights_frame(record)?;
    let symbol_columns: Vec<Expr> = record
        .alphabet
        .symbols()
        .iter()
        .map(|symbol| col(symbol.to_string().as_str()))
        .collect();
    heights
        .lazy()
        .select([
            col("position"),
            col("stack"),
            max_horizontal(symbol_columns)
                .map_err(|err| LogoError::DataError(err.to_string()))?
                .alias("dominant"),
        ])
        .collect()
        .map_err(|err| LogoError::DataError(err.to_string()))
}

fn position_labels(positions: usize) -> Vec<u32> {
    (1..=positions as u32).collect()
}
