//! Vitals CLI - batch ETL for biomedical vital-sign data.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    // A missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            settings,
            skip_download,
            json,
        } => commands::run::run(settings.into(), skip_download, json),

        Commands::Clean {
            file,
            output,
            delimiter,
            json,
        } => commands::clean::run(file, output, delimiter, json, cli.verbose),

        Commands::Jumble {
            input,
            output,
            missing_fraction,
            duplicate_fraction,
            seed,
        } => commands::jumble::run(input, output, missing_fraction, duplicate_fraction, seed),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
