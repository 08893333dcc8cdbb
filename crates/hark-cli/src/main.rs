mod app;
mod args;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;

use args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    hark_core::set_verbose(cli.verbose);

    match cli.command {
        Some(Command::Devices) => commands::devices::run(),
        Some(Command::Config(config_args)) => commands::config::run(config_args),
        None => commands::record::run(cli.record).await,
    }
}
