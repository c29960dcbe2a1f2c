//! Jumble command - make a messy copy of a clean file.

use std::path::PathBuf;

use colored::Colorize;
use vitals::{JumbleConfig, Jumbler, Parser, write_csv};

pub fn run(
    input: PathBuf,
    output: PathBuf,
    missing_fraction: f64,
    duplicate_fraction: f64,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let (table, _) = Parser::new().parse_file(&input)?;
    let jumbler = Jumbler::with_config(JumbleConfig {
        missing_fraction,
        duplicate_fraction,
        seed,
    });
    let (messy, report) = jumbler.jumble(table)?;
    write_csv(&messy, &output)?;

    println!(
        "{} {} -> {}",
        "Jumbled".cyan().bold(),
        input.display().to_string().white(),
        output.display().to_string().white()
    );
    println!(
        "Rows: {} -> {} ({} duplicates added)",
        report.rows_before,
        messy.row_count(),
        report.duplicates_added.to_string().yellow()
    );
    for (column, nulls) in &report.nulls_injected {
        println!("  {:20} {} values blanked", column, nulls);
    }

    Ok(())
}
