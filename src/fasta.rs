use crate::alphabet::Alphabet;
use crate::error::{LogoError, Result};
use crate::types::{FrequencyMatrix, SequenceRecord};
use log::debug;
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// One FASTA record mid-parse: header plus normalized residues.
#[derive(Debug)]
struct RawRecord {
    header: String,
    residues: Vec<char>,
}

/// Parses FASTA text into a [`SequenceRecord`] holding the observed alphabet
/// and a per-position frequency matrix.
///
/// Sequence lines are uppercased, internal whitespace is stripped, and the
/// gap character `-` is normalized to `N`. Multi-line sequences are
/// concatenated under the preceding `>` header; blank lines between records
/// are ignored. All records must share one sequence length; the first
/// completed record fixes it. The observed alphabet keeps the order of first
/// appearance across all sequences, which fixes the matrix column order.
/// `nsites` is the record count.
///
/// # Arguments
/// * `identifier` - Name attached to the resulting record (not parsed from
///   the text)
/// * `text` - Raw multi-line FASTA content
///
/// # Returns
/// * `Result<SequenceRecord>` - Record with derived heights unset; call
///   `update_state` before layout
///
/// # Errors
/// * Returns `LogoError::MalformedInput` on a sequence-length mismatch or on
///   sequence data before the first header
/// * Returns `LogoError::DegenerateInput` if no records are found
pub fn parse_fasta(identifier: &str, text: &str) -> Result<SequenceRecord> {
    let mut records: Vec<RawRecord> = Vec::new();
    let mut sequence_length: Option<usize> = None;
    let mut current: Option<RawRecord> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            flush_record(&mut current, &mut records, &mut sequence_length)?;
            current = Some(RawRecord {
                header: header.to_string(),
                residues: Vec::new(),
            });
        } else {
            let record = current
                .as_mut()
                .ok_or_else(|| LogoError::malformed("sequence data before the first '>' header"))?;
            record.residues.extend(normalize_residues(line));
        }
    }
    flush_record(&mut current, &mut records, &mut sequence_length)?;

    if records.is_empty() {
        return Err(LogoError::degenerate("no records found in FASTA input"));
    }
    let length = sequence_length
        .ok_or_else(|| LogoError::degenerate("no sequence residues found in FASTA input"))?;

    let alphabet = Alphabet::from_observed(
        records
            .iter()
            .flat_map(|record| record.residues.iter().copied()),
    );

    let nsites = records.len();
    let mut counts = Array2::<f64>::zeros((length, alphabet.len()));
    for record in &records {
        for (position, &residue) in record.residues.iter().enumerate() {
            if let Some(column) = alphabet.index_of(residue) {
                counts[[position, column]] += 1.0;
            }
        }
    }
    let values = counts.mapv(|count| count / nsites as f64);

    debug!(
        "parsed {} FASTA records of length {} over {} symbols",
        nsites,
        length,
        alphabet.len()
    );

    Ok(SequenceRecord::new(
        identifier,
        alphabet,
        FrequencyMatrix::new(values, nsites),
    ))
}

/// Reads a FASTA file and parses it with [`parse_fasta`], using the file stem
/// as the record identifier.
///
/// # Errors
/// * Returns `LogoError::Io` for file reading issues, plus any
///   [`parse_fasta`] error
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<SequenceRecord> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let identifier = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("fasta");
    parse_fasta(identifier, &text)
}

/// Uppercases, drops internal whitespace, and maps the gap character to the
/// explicit unknown symbol `N`.
fn normalize_residues(line: &str) -> impl Iterator<Item = char> + '_ {
    line.chars()
        .filter(|residue| !residue.is_whitespace())
        .map(|residue| match residue {
            '-' => 'N',
            other => other.to_ascii_uppercase(),
        })
}

/// Completes the pending record: empty records are dropped, the first
/// completed record fixes the expected length, and every later record must
/// match it.
fn flush_record(
    current: &mut Option<RawRecord>,
    records: &mut Vec<RawRecord>,
    sequence_length: &mut Option<usize>,
) -> Result<()> {
    if let Some(record) = current.take() {
        if record.residues.is_empty() {
            return Ok(());
        }
        match *sequence_length {
            Some(expected) if record.residues.len() != expected => {
                return Err(LogoError::malformed(format!(
                    "record '{}' has sequence length {} but earlier records have length {}",
                    record.header,
                    record.residues.len(),
                    expected
                )));
            }
            Some(_) => {}
            None => *sequence_length = Some(record.residues.len()),
        }
        records.push(record);
    }
    Ok(())
}
