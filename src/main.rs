use clap::Parser;
use std::process::ExitCode;

use notebox::cli::{Cli, config::Config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    notebox::init_logging(&config.log_filter(cli.verbose));

    if let Err(err) = notebox::run(cli, config).await {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
