use crate::alphabet::Alphabet;
use crate::error::{LogoError, Result};
use crate::types::{FrequencyMatrix, MotifMetadata, SequenceRecord, INPUT_SUM_TOLERANCE};
use log::{debug, warn};
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// Effective sample size assumed when the matrix header carries no `nsites`
/// attribute. Inherited from the reference WebLogo tool; it feeds the
/// small-sample correction, so a defaulted value is logged.
pub const DEFAULT_NSITES: usize = 20;

/// Parses a single-motif MEME document into a [`SequenceRecord`].
///
/// Recognizes, in any order: the `MEME version` line, the `ALPHABET=`
/// declaration (fixes the matrix column order), the `strands:` line, the
/// `Background letter frequencies` block (explicit `symbol value` pairs, or a
/// uniform distribution over the declared alphabet when the following line is
/// blank), the `MOTIF` name line (second token becomes the alternate name), a
/// source URL, and one `letter-probability matrix` block: a header of
/// `key= value` attributes followed by one whitespace-separated frequency row
/// per position, read up to the declared alphabet length and terminated by a
/// blank line or end of input. Rows are used as written; they are validated
/// but never renormalized.
///
/// # Arguments
/// * `text` - Raw multi-line MEME motif content
///
/// # Returns
/// * `Result<SequenceRecord>` - Record with declared-alphabet column order,
///   motif metadata attached, and derived heights unset
///
/// # Errors
/// * Returns `LogoError::MalformedInput` if the alphabet declaration is
///   missing or does not precede the matrix block, if the `MOTIF` line is
///   missing, or if more than one matrix block is present
/// * Returns `LogoError::InvalidMatrix` for rows with too few values,
///   unparseable or out-of-range frequencies, or row sums away from 1
/// * Returns `LogoError::DegenerateInput` for a matrix block with no rows
pub fn parse_meme(text: &str) -> Result<SequenceRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut alphabet: Option<Alphabet> = None;
    let mut identifier: Option<String> = None;
    let mut metadata = MotifMetadata::default();
    let mut matrix: Option<FrequencyMatrix> = None;

    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx].trim();
        if line.is_empty() {
            idx += 1;
            continue;
        }
        if let Some(rest) = line.strip_prefix("MEME version ") {
            metadata.version = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("ALPHABET=") {
            alphabet = Some(Alphabet::from_declared(rest.trim())?);
        } else if let Some(rest) = line.strip_prefix("strands:") {
            metadata.strands = Some(parse_strands(rest)?);
        } else if line.starts_with("Background letter frequencies") {
            idx += 1;
            let next = lines.get(idx).map(|raw| raw.trim()).unwrap_or("");
            metadata.background = Some(parse_background(next, alphabet.as_ref())?);
        } else if let Some(rest) = line.strip_prefix("MOTIF ") {
            let mut names = rest.split_whitespace();
            identifier = names.next().map(str::to_string);
            metadata.alternate_name = names.next().map(str::to_string);
        } else if let Some(rest) = line.strip_prefix("letter-probability matrix:") {
            if matrix.is_some() {
                return Err(LogoError::malformed(
                    "more than one letter-probability matrix block; single-motif documents only",
                ));
            }
            let declared = alphabet
                .as_ref()
                .ok_or_else(|| LogoError::malformed("alphabet must precede probability matrix"))?;
            let nsites = parse_matrix_attributes(rest, &mut metadata)?;

            let mut cells: Vec<f64> = Vec::new();
            let mut positions = 0;
            idx += 1;
            while idx < lines.len() {
                let row_line = lines[idx].trim();
                if row_line.is_empty() {
                    break;
                }
                parse_matrix_row(row_line, declared.len(), positions, &mut cells)?;
                positions += 1;
                idx += 1;
            }
            if positions == 0 {
                return Err(LogoError::degenerate(
                    "letter-probability matrix block has no rows",
                ));
            }
            let values = Array2::from_shape_vec((positions, declared.len()), cells)
                .map_err(|err| LogoError::invalid_matrix(0, err.to_string()))?;
            let parsed = FrequencyMatrix::new(values, nsites);
            parsed.validate(declared.len(), INPUT_SUM_TOLERANCE)?;
            matrix = Some(parsed);
        } else if metadata.url.is_none() {
            // URL recognition runs last so the parenthetical source in the
            // background-frequencies header line is never captured.
            metadata.url = find_url(line).map(str::to_string);
        }
        idx += 1;
    }

    let alphabet =
        alphabet.ok_or_else(|| LogoError::malformed("missing alphabet declaration in MEME input"))?;
    let identifier =
        identifier.ok_or_else(|| LogoError::malformed("missing MOTIF declaration in MEME input"))?;
    let frequency_matrix = matrix
        .ok_or_else(|| LogoError::malformed("missing letter-probability matrix in MEME input"))?;

    debug!(
        "parsed MEME motif '{}': {} positions over {} symbols, nsites={}",
        identifier,
        frequency_matrix.positions(),
        alphabet.len(),
        frequency_matrix.nsites
    );

    let mut record = SequenceRecord::new(identifier, alphabet, frequency_matrix);
    record.metadata = Some(metadata);
    Ok(record)
}

/// Reads a MEME motif file and parses it with [`parse_meme`]. The record
/// identifier comes from the document's `MOTIF` line, not the file name.
///
/// # Errors
/// * Returns `LogoError::Io` for file reading issues, plus any
///   [`parse_meme`] error
pub fn read_meme<P: AsRef<Path>>(path: P) -> Result<SequenceRecord> {
    let text = fs::read_to_string(path)?;
    parse_meme(&text)
}

fn parse_strands(rest: &str) -> Result<Vec<char>> {
    let mut strands = Vec::new();
    for token in rest.split_whitespace() {
        match token {
            "+" => strands.push('+'),
            "-" => strands.push('-'),
            other => {
                return Err(LogoError::malformed(format!(
                    "unrecognized strand token '{}'",
                    other
                )))
            }
        }
    }
    Ok(strands)
}

/// Parses the line after the `Background letter frequencies` header: either
/// alternating `symbol value` pairs, or (when blank or absent) a uniform
/// distribution over the declared alphabet.
fn parse_background(line: &str, alphabet: Option<&Alphabet>) -> Result<Vec<(char, f64)>> {
    if line.is_empty() {
        let alphabet = alphabet.ok_or_else(|| {
            LogoError::malformed("alphabet must precede uniform background frequencies")
        })?;
        let uniform = 1.0 / alphabet.len() as f64;
        return Ok(alphabet
            .symbols()
            .iter()
            .map(|&symbol| (symbol, uniform))
            .collect());
    }
    let mut pairs = Vec::new();
    let mut tokens = line.split_whitespace();
    while let Some(symbol_token) = tokens.next() {
        let mut symbols = symbol_token.chars();
        let symbol = symbols.next();
        let symbol = match (symbol, symbols.next()) {
            (Some(symbol), None) => symbol,
            _ => {
                return Err(LogoError::malformed(format!(
                    "background frequency symbol '{}' is not a single character",
                    symbol_token
                )))
            }
        };
        let value_token = tokens.next().ok_or_else(|| {
            LogoError::malformed(format!(
                "background frequency for '{}' is missing a value",
                symbol
            ))
        })?;
        let value = value_token.parse::<f64>().map_err(|err| {
            LogoError::malformed(format!(
                "invalid background frequency '{}': {}",
                value_token, err
            ))
        })?;
        pairs.push((symbol, value));
    }
    Ok(pairs)
}

/// Parses the `key= value` attributes of the matrix header line and returns
/// the effective sample size, defaulting it (and the E-value) when absent.
fn parse_matrix_attributes(rest: &str, metadata: &mut MotifMetadata) -> Result<usize> {
    let mut nsites: Option<usize> = None;
    let mut tokens = rest.split_whitespace();
    while let Some(token) = tokens.next() {
        let (key, value) = if let Some(key) = token.strip_suffix('=') {
            let value = tokens.next().ok_or_else(|| {
                LogoError::malformed(format!("matrix attribute '{}' is missing a value", key))
            })?;
            (key, value)
        } else if let Some((key, value)) = token.split_once('=') {
            (key, value)
        } else {
            return Err(LogoError::malformed(format!(
                "unrecognized matrix attribute token '{}'",
                token
            )));
        };
        match key {
            "nsites" => {
                let parsed = value.parse::<f64>().map_err(|err| {
                    LogoError::malformed(format!("invalid nsites value '{}': {}", value, err))
                })?;
                if !parsed.is_finite() || parsed < 1.0 {
                    return Err(LogoError::malformed(format!(
                        "nsites must be a positive number, got '{}'",
                        value
                    )));
                }
                nsites = Some(parsed.round() as usize);
            }
            "E" => {
                metadata.evalue = Some(value.parse::<f64>().map_err(|err| {
                    LogoError::malformed(format!("invalid E value '{}': {}", value, err))
                })?);
            }
            "w" => {
                metadata.declared_width = Some(value.parse::<usize>().map_err(|err| {
                    LogoError::malformed(format!("invalid w value '{}': {}", value, err))
                })?);
            }
            // alength and anything else carried by other MEME emitters is
            // ignored; the declared alphabet fixes the column count.
            _ => {}
        }
    }
    Ok(match nsites {
        Some(nsites) => nsites,
        None => {
            warn!(
                "matrix header has no nsites attribute; assuming nsites={} for the \
                 small-sample correction",
                DEFAULT_NSITES
            );
            if metadata.evalue.is_none() {
                metadata.evalue = Some(0.0);
            }
            DEFAULT_NSITES
        }
    })
}

/// Parses one frequency row, reading up to `alphabet_len` values and
/// truncating any extra columns.
fn parse_matrix_row(
    line: &str,
    alphabet_len: usize,
    position: usize,
    cells: &mut Vec<f64>,
) -> Result<()> {
    let mut parsed = 0;
    for token in line.split_whitespace().take(alphabet_len) {
        let value = token.parse::<f64>().map_err(|err| {
            LogoError::invalid_matrix(position, format!("invalid frequency '{}': {}", token, err))
        })?;
        cells.push(value);
        parsed += 1;
    }
    if parsed < alphabet_len {
        return Err(LogoError::invalid_matrix(
            position,
            format!(
                "row has {} values but the alphabet has {} symbols",
                parsed, alphabet_len
            ),
        ));
    }
    Ok(())
}

fn find_url(line: &str) -> Option<&str> {
    line.split_whitespace()
        .find(|token| token.starts_with("http://") || token.starts_with("https://"))
}
