use std::process::ExitCode;

use clap::Parser;
use docseal_cli::{run, Cli, Status};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match run(cli, &mut stdout) {
        Ok(Status::Ok) => ExitCode::SUCCESS,
        Ok(Status::NotVerified) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", console::style("error:").red().bold(), e);
            ExitCode::from(2)
        }
    }
}
