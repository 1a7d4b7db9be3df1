mod apply;
mod cli;
mod commands;
mod compose;
mod config;
mod display;
mod paths;
mod quotes;
mod store;

use clap::Parser;
use colored::*;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.debug {
        eprintln!("Debug mode is on");
    }

    let command = cli.command.unwrap_or_default();
    if let Err(e) = commands::handle_command(command, cli.debug).await {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}
