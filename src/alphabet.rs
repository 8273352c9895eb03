use crate::error::{LogoError, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Fixed symbol -> glyph index table covering nucleotides (A, C, G, T, U) and
/// the 20 standard amino acids plus ambiguity codes (B, J, O, X, Z, N).
///
/// Indices are stable across the process and exist only so a rendering layer
/// can key glyph paths and colors off a compact integer. The table order is
/// the one established by the reference WebLogo glyph set.
static GLYPH_INDICES: phf::Map<u8, u8> = phf_map! {
    b'A' => 0u8,
    b'C' => 1u8,
    b'G' => 2u8,
    b'T' => 3u8,
    b'U' => 4u8,
    b'D' => 5u8,
    b'E' => 6u8,
    b'F' => 7u8,
    b'H' => 8u8,
    b'I' => 9u8,
    b'K' => 10u8,
    b'L' => 11u8,
    b'M' => 12u8,
    b'N' => 13u8,
    b'P' => 14u8,
    b'Q' => 15u8,
    b'R' => 16u8,
    b'S' => 17u8,
    b'V' => 18u8,
    b'W' => 19u8,
    b'Y' => 20u8,
    b'B' => 21u8,
    b'J' => 22u8,
    b'O' => 23u8,
    b'X' => 24u8,
    b'Z' => 25u8,
};

/// Reverse lookup: glyph index -> symbol. Exact inverse of [`GLYPH_INDICES`].
const GLYPH_SYMBOLS: [char; 26] = [
    'A', 'C', 'G', 'T', 'U', 'D', 'E', 'F', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'V',
    'W', 'Y', 'B', 'J', 'O', 'X', 'Z',
];

/// Number of symbols in the closed glyph set.
pub const GLYPH_COUNT: usize = GLYPH_SYMBOLS.len();

/// Looks up the fixed glyph index for a symbol.
///
/// # Errors
/// * Returns `LogoError::UnknownSymbol` if the symbol is outside the closed
///   26-symbol set. Parsing never needs this lookup; only the layout output
///   keyed for a rendering adapter does.
pub fn glyph_index(symbol: char) -> Result<usize> {
    if !symbol.is_ascii() {
        return Err(LogoError::UnknownSymbol(symbol));
    }
    GLYPH_INDICES
        .get(&(symbol as u8))
        .map(|&i| i as usize)
        .ok_or(LogoError::UnknownSymbol(symbol))
}

/// Looks up the symbol for a fixed glyph index.
///
/// # Errors
/// * Returns `LogoError::UnknownGlyphIndex` if the index is out of range.
pub fn glyph_symbol(index: usize) -> Result<char> {
    GLYPH_SYMBOLS
        .get(index)
        .copied()
        .ok_or(LogoError::UnknownGlyphIndex(index))
}

/// Ordered set of distinct one-character symbols observed in, or declared
/// for, one input.
///
/// Order is first-appearance order for FASTA-derived alphabets and
/// declaration order for MEME-derived alphabets. The order fixes the column
/// index into the frequency matrix, so it must stay identical between parsing
/// and height computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet from residues in reading order, keeping the first
    /// appearance of each symbol and dropping repeats.
    pub fn from_observed<I>(residues: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut symbols = Vec::new();
        for residue in residues {
            if !symbols.contains(&residue) {
                symbols.push(residue);
            }
        }
        Alphabet { symbols }
    }

    /// Builds an alphabet from a declaration string such as `"ACGT"`,
    /// preserving declaration order.
    ///
    /// # Errors
    /// * Returns `LogoError::MalformedInput` if the declaration is empty or
    ///   repeats a symbol.
    pub fn from_declared(declaration: &str) -> Result<Self> {
        if declaration.is_empty() {
            return Err(LogoError::malformed("empty alphabet declaration"));
        }
        let mut symbols = Vec::with_capacity(declaration.len());
        for symbol in declaration.chars() {
            if symbols.contains(&symbol) {
                return Err(LogoError::malformed(format!(
                    "symbol '{}' repeated in alphabet declaration",
                    symbol
                )));
            }
            symbols.push(symbol);
        }
        Ok(Alphabet { symbols })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbols were observed or declared.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in column order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Column index of a symbol, if present.
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    /// Symbol at a column index, if in range.
    pub fn symbol_at(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }
}
