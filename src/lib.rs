//! Sequence logo computation from FASTA and MEME motif input in Rust
//!
//! Parses either format into a common per-position frequency record, computes
//! entropy-based stack and letter heights, and stacks them into ordered,
//! non-overlapping vertical intervals ready for a rendering layer.

pub mod alphabet;
pub mod error;
pub mod export;
pub mod fasta;
pub mod layout;
pub mod logo;
pub mod meme;
pub mod types;

/// Raw text input at the parsing boundary, tagged by format.
#[derive(Debug, Clone)]
pub enum SequenceInput {
    /// FASTA records plus the identifier to attach to the parsed record.
    Fasta { identifier: String, text: String },
    /// A single-motif MEME document; the identifier comes from its `MOTIF`
    /// line.
    MemeMotif { text: String },
}

impl SequenceInput {
    /// Dispatches to the matching parser.
    pub fn parse(&self) -> error::Result<types::SequenceRecord> {
        match self {
            SequenceInput::Fasta { identifier, text } => fasta::parse_fasta(identifier, text),
            SequenceInput::MemeMotif { text } => meme::parse_meme(text),
        }
    }
}
