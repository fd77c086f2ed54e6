//! Ore CLI: the `ore` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Localize {
            category,
            denominator,
            all,
            config,
            json,
        } => commands::localize::run(category, denominator, all, config, json),

        Commands::Toy {
            name,
            denominator,
            config,
            json,
        } => commands::toy::run(name, denominator, config, json),

        Commands::Toys { json } => commands::toys::run(json),
    }
}
