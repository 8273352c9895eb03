use seqlogo_rs::error::LogoError;
use seqlogo_rs::export;
use seqlogo_rs::{fasta, meme};

fn refreshed_record() -> seqlogo_rs::types::SequenceRecord {
    let mut record = fasta::parse_fasta("example", ">a\nACGT\n>b\nACGA\n").unwrap();
    record.update_state().unwrap();
    record
}

#[test]
fn test_frequency_frame_columns_follow_alphabet_order() {
    let record = refreshed_record();
    let df = export::frequency_frame(&record).unwrap();

    assert_eq!(df.height(), 4);
    assert_eq!(df.width(), 5);
    let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["position", "A", "C", "G", "T"]);

    // Position labels are 1-based; position 4 splits A and T evenly.
    let a = df.column("A").unwrap().f64().unwrap();
    assert!((a.get(3).unwrap() - 0.5).abs() < 1e-12);
    let g = df.column("G").unwrap().f64().unwrap();
    assert!((g.get(2).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_heights_frame_has_stack_column() {
    let record = refreshed_record();
    let df = export::heights_frame(&record).unwrap();

    assert_eq!(df.height(), 4);
    assert_eq!(df.width(), 6);
    let stack = df.column("stack").unwrap().f64().unwrap();
    let expected = record.stack_heights.as_ref().unwrap();
    for position in 0..4 {
        assert!((stack.get(position).unwrap() - expected[position]).abs() < 1e-12);
    }
}

#[test]
fn test_heights_frame_requires_refreshed_record() {
    let record = fasta::parse_fasta("example", ">a\nACGT\n>b\nACGA\n").unwrap();
    assert!(matches!(
        export::heights_frame(&record),
        Err(LogoError::HeightsNotComputed(_))
    ));
}

#[test]
fn test_summary_frame_dominant_height() {
    let text = "\
ALPHABET= ACGT
MOTIF m1
letter-probability matrix: nsites= 100
0.970 0.010 0.010 0.010
";
    let mut record = meme::parse_meme(text).unwrap();
    record.update_state().unwrap();

    let df = export::summary_frame(&record).unwrap();
    let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["position", "stack", "dominant"]);

    // The dominant letter height is the A column's share of the stack.
    let stack = record.stack_heights.as_ref().unwrap()[0];
    let dominant = df.column("dominant").unwrap().f64().unwrap();
    assert!((dominant.get(0).unwrap() - 0.97 * stack).abs() < 1e-12);
}
