use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ore",
    about = "Ore: localize a finite category at a set of morphisms by a calculus of fractions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Localize a category read from a JSON file
    Localize {
        /// Category JSON path (objects, arrows, composition table)
        category: String,

        /// Arrow to invert (repeatable)
        #[arg(long, short = 'd')]
        denominator: Vec<String>,

        /// Invert every arrow of the category
        #[arg(long, conflicts_with = "denominator")]
        all: bool,

        /// Options TOML path
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Localize one of the built-in toy categories
    Toy {
        /// Toy name (see `ore toys`)
        name: String,

        /// Arrow to invert (repeatable); defaults to every arrow
        #[arg(long, short = 'd')]
        denominator: Vec<String>,

        /// Options TOML path
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in toy categories
    Toys {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
