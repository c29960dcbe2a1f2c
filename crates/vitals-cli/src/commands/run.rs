//! Run command - download, clean, and load the vitals table.

use colored::Colorize;
use vitals::{
    EtlConfig, EtlSettings, Extractor, LocalFileExtractor, Pipeline, PostgresLoader, RunSummary,
    S3Extractor,
};

pub fn run(
    settings: EtlSettings,
    skip_download: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate before building the runtime so bad settings never reach a collaborator.
    let config = EtlConfig::from_settings(settings)?;

    if !json {
        println!(
            "{} {} {} {}",
            "Running".cyan().bold(),
            config.source.to_string().white(),
            "->".dimmed(),
            format!("{}/{}", config.database, config.table).white()
        );
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let summary = if skip_download {
        runtime.block_on(execute(&config, &LocalFileExtractor::new()))?
    } else {
        runtime.block_on(execute(&config, &S3Extractor::new()))?
    };

    if json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!();
    super::print_cleaning_report(&summary.cleaning);
    println!();
    println!(
        "{} {} rows into {} ({} batches)",
        "Loaded".green().bold(),
        summary.load.rows.to_string().white().bold(),
        summary.load.table.white(),
        summary.load.batches
    );

    Ok(())
}

async fn execute<E: Extractor>(config: &EtlConfig, extractor: &E) -> vitals::Result<RunSummary> {
    let loader = PostgresLoader::new().with_batch_size(config.batch_size);
    Pipeline::new(config).run(extractor, &loader).await
}
