use std::process::ExitCode;

use clap::Parser;
use pasteup_lib::bootstrap::tracing::init_tracing_subscriber;
use pasteup_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing_subscriber(cli.verbose) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    match pasteup_lib::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "pasteup failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
