mod cli;
mod commands;
mod docx;
mod model;
mod pdf;
mod toc;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::pdf::PdfSupport;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet());

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let support = PdfSupport::detect();

    match cli.command {
        Some(Commands::Extract(args)) => commands::extract::run(args, support),
        Some(Commands::Embed(args)) => commands::embed::run(args, support),
        None => commands::extract::run(cli.extract, support),
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
