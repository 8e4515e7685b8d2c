use clap::Parser;
use std::process;

mod cli;
mod commands;
mod display;
mod exit_codes;
mod logging;

use cli::Cli;
use exit_codes::EXIT_ERROR;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::configure_logging(cli.verbose, cli.quiet);

    let exit_code = match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };
    process::exit(exit_code);
}
