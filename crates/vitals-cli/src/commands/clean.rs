//! Clean command - apply the cleaning rules to a local file.

use std::path::PathBuf;

use colored::Colorize;
use vitals::{Cleaner, Parser, ParserConfig, write_csv};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    delimiter: Option<char>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => {
            return Err(format!("Delimiter must be a single ASCII character, got '{}'", c).into());
        }
        None => None,
    };

    let parser = Parser::with_config(ParserConfig { delimiter });
    let (table, source) = parser.parse_file(&file)?;
    let (cleaned, report) = Cleaner::new().clean(table);

    let output_path = output.unwrap_or_else(|| default_output(&file));
    write_csv(&cleaned, &output_path)?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "{} {} ({}, {} rows)",
        "Cleaned".cyan().bold(),
        file.display().to_string().white(),
        source.format,
        source.row_count
    );

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for role in vitals::VitalRole::ALL {
            let column = report.columns.get(role).unwrap_or("(not found)");
            println!("  {:20} {}", role.to_string(), column);
        }
    }

    println!();
    super::print_cleaning_report(&report);
    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}

/// `<stem>_clean.csv` next to the input.
fn default_output(file: &std::path::Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_clean.csv", stem))
}
