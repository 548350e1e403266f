//! RepeatX engine demo
//!
//! Generates a reference/query pair with planted tandem repeats, runs the
//! finder over it and compares the report against the answer key.

use repeatx_core::{write_report, FinderParams, ReportFormat, RepeatFinder, SyntheticPair, SyntheticParams};

fn main() -> anyhow::Result<()> {
    println!("RepeatX Demo");
    println!("============\n");

    let synthetic = SyntheticParams {
        reference_length: 2_000,
        planted: 4,
        ..SyntheticParams::default()
    };
    let pair = SyntheticPair::generate(&synthetic)?;
    println!("Reference: {} bp", pair.reference.len());
    println!("Query:     {} bp\n", pair.query.len());

    println!("Planted repeats:");
    for planted in &pair.planted {
        println!(
            "  ref {:>5} len {:>3} x{} {} at query {}",
            planted.reference_position,
            planted.length,
            planted.repeat_count,
            planted.strand(),
            planted.query_position
        );
    }

    let finder = RepeatFinder::new(FinderParams {
        min_window_length: synthetic.min_unit_length,
        max_window_length: synthetic.max_unit_length,
        ..FinderParams::default()
    })?;
    let repeats = finder.find_repeats(pair.reference.bases(), pair.query.bases())?;

    let recovered = pair.planted.iter().filter(|p| repeats.contains(p)).count();
    println!("\nFound {} repeats, {} of {} planted recovered\n", repeats.len(), recovered, pair.planted.len());

    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), &repeats, ReportFormat::Details)?;
    Ok(())
}
