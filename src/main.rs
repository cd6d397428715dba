use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use physio_assess::cli::{Args, RootCommand};

fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbosity);

    tokio::select! {
        result = RootCommand::execute(args) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted by user");
            std::process::exit(130);
        }
    }
}
