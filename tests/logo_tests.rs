use ndarray::array;
use seqlogo_rs::alphabet::Alphabet;
use seqlogo_rs::error::LogoError;
use seqlogo_rs::types::{FrequencyMatrix, SequenceRecord};
use seqlogo_rs::{fasta, logo, meme};

fn dna_record(values: ndarray::Array2<f64>, nsites: usize) -> SequenceRecord {
    SequenceRecord::new(
        "test",
        Alphabet::from_declared("ACGT").unwrap(),
        FrequencyMatrix::new(values, nsites),
    )
}

#[test]
fn test_uniform_row_height() {
    // Uniform uncertainty equals log2(k), so only the small-sample
    // correction remains: -(k - 1) / (2 * nsites).
    let record = dna_record(array![[0.25, 0.25, 0.25, 0.25]], 20);
    let height = logo::stack_height(&record, 0).unwrap();
    assert!((height - (-0.075)).abs() < 1e-12, "got {}", height);
}

#[test]
fn test_certain_row_height() {
    let record = dna_record(array![[1.0, 0.0, 0.0, 0.0]], 17);
    let height = logo::stack_height(&record, 0).unwrap();
    let expected = 2.0 - 3.0 / 34.0;
    assert!((height - expected).abs() < 1e-12, "got {}", height);
}

#[test]
fn test_meme_default_nsites_height() {
    let text = "\
ALPHABET= ACGT
MOTIF m1
letter-probability matrix: alength= 4 w= 1
0.25 0.25 0.25 0.25
";
    let mut record = meme::parse_meme(text).unwrap();
    record.update_state().unwrap();
    let heights = record.stack_heights.as_ref().unwrap();
    // 2 - 2 - 3/40 with the defaulted nsites of 20; negative and unclamped.
    assert!((heights[0] - (-0.075)).abs() < 1e-12, "got {}", heights[0]);
}

#[test]
fn test_height_is_alphabet_order_invariant() {
    let forward = dna_record(array![[0.5, 0.2, 0.2, 0.1]], 12);
    let reversed = SequenceRecord::new(
        "test",
        Alphabet::from_declared("TGCA").unwrap(),
        FrequencyMatrix::new(array![[0.1, 0.2, 0.2, 0.5]], 12),
    );
    let a = logo::stack_height(&forward, 0).unwrap();
    let b = logo::stack_height(&reversed, 0).unwrap();
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn test_update_state_populates_both_fields() {
    let mut record = fasta::parse_fasta("example", ">a\nACGT\n>b\nACGA\n").unwrap();
    assert!(record.stack_heights.is_none());
    assert!(record.letter_heights.is_none());

    record.update_state().unwrap();

    let stack_heights = record.stack_heights.as_ref().unwrap();
    let letter_heights = record.letter_heights.as_ref().unwrap();
    assert_eq!(stack_heights.len(), 4);
    assert_eq!(letter_heights.nrows(), 4);
    assert_eq!(letter_heights.ncols(), record.alphabet.len());

    // Apportionment is exact: letter heights at a position sum back to the
    // stack height.
    for position in 0..record.positions() {
        let sum: f64 = letter_heights.row(position).sum();
        assert!(
            (sum - stack_heights[position]).abs() < 1e-9,
            "position {}: {} vs {}",
            position,
            sum,
            stack_heights[position]
        );
    }
}

#[test]
fn test_letter_heights_scale_with_frequency() {
    let mut record = dna_record(array![[0.5, 0.5, 0.0, 0.0]], 100);
    record.update_state().unwrap();
    let stack = record.stack_heights.as_ref().unwrap()[0];
    let letters = record.letter_heights.as_ref().unwrap();
    assert!((letters[[0, 0]] - 0.5 * stack).abs() < 1e-12);
    assert!(letters[[0, 2]].abs() < 1e-12);
}

#[test]
fn test_zero_frequencies_contribute_nothing() {
    // A row with zeros must not poison the uncertainty sum with NaN.
    let record = dna_record(array![[0.5, 0.5, 0.0, 0.0]], 100);
    let height = logo::stack_height(&record, 0).unwrap();
    assert!(height.is_finite());
    let expected = 2.0 - 1.0 - 3.0 / 200.0;
    assert!((height - expected).abs() < 1e-12);
}

#[test]
fn test_degenerate_records_are_rejected() {
    // nsites of zero would divide by zero in the correction term.
    let mut record = dna_record(array![[0.25, 0.25, 0.25, 0.25]], 0);
    assert!(matches!(
        record.update_state(),
        Err(LogoError::DegenerateInput(_))
    ));

    // no positions at all
    let mut record = dna_record(ndarray::Array2::zeros((0, 4)), 5);
    assert!(matches!(
        record.update_state(),
        Err(LogoError::DegenerateInput(_))
    ));
}

#[test]
fn test_shape_mismatch_fails_fast() {
    let record = SequenceRecord::new(
        "test",
        Alphabet::from_declared("ACGT").unwrap(),
        FrequencyMatrix::new(array![[0.5, 0.5, 0.0]], 5),
    );
    assert!(matches!(
        logo::stack_height(&record, 0),
        Err(LogoError::InvalidMatrix { .. })
    ));
}

#[test]
fn test_position_out_of_range() {
    let record = dna_record(array![[0.25, 0.25, 0.25, 0.25]], 20);
    assert!(matches!(
        logo::stack_height(&record, 1),
        Err(LogoError::InvalidMatrix { .. })
    ));
}

#[test]
fn test_letter_heights_require_stack_heights() {
    let mut record = dna_record(array![[0.25, 0.25, 0.25, 0.25]], 20);
    assert!(matches!(
        logo::update_letter_heights(&mut record),
        Err(LogoError::HeightsNotComputed(_))
    ));
}

#[test]
fn test_max_entropy() {
    assert!((logo::max_entropy(4) - 2.0).abs() < 1e-12);
    assert!((logo::max_entropy(26) - (26f64).log2()).abs() < 1e-12);
}
