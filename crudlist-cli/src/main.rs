//! crudlist command line.

mod cli;
mod commands;
mod logging;
mod paths;
mod prefs;
mod source;
mod table;

use clap::Parser;

use crate::cli::Cli;
use crate::cli::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Command::List(args) => commands::run_list(args).await,
        Command::Delete(args) => commands::run_delete(args).await,
        Command::Prefs(args) => commands::run_prefs(args),
    }
}
