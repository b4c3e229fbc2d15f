use autorename::cli::{Cli, run_cli};
use autorename::output::OutputFormatter;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(&cli.paths) {
        Ok(summary) => {
            OutputFormatter::summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
