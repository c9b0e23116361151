mod commands;
mod config;
mod image;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    Service, cmd_add, cmd_bought, cmd_categories, cmd_clear, cmd_delete, cmd_export, cmd_import,
    cmd_list, cmd_toggle,
};
use crate::config::Config;
use larder_core::models::BoughtFilter;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "A simple, local-first grocery and ingredient tracker",
    long_about = "Keep track of what to buy and what is in the cupboard.\n\
                  Adding an ingredient that already exists (same name and category)\n\
                  merges it: quantities are added, the earliest expiration is kept\n\
                  and notes are combined."
)]
struct Cli {
    /// Path to the database file (default: platform data directory)
    #[arg(long, global = true, env = "LARDER_DB", value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an ingredient, merging it with an existing one of the same name and category
    Add {
        /// Ingredient name
        name: String,
        /// Quantity (e.g. "6 pcs", "500 g", "a bunch")
        quantity: String,
        /// Category (matched exactly, case-sensitive)
        #[arg(short, long)]
        category: String,
        /// Expiration date (YYYY-MM-DD, today, tomorrow or +Nd)
        #[arg(short, long)]
        expires: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Image file to attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List ingredients
    List {
        /// Only show ingredients whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by bought state: all, bought, not-bought
        #[arg(short, long, default_value = "all")]
        bought: BoughtFilter,
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an ingredient as bought
    Bought {
        /// Position shown by `larder list`
        position: usize,
        /// Mark as not bought instead
        #[arg(long)]
        undo: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip the bought state of an ingredient
    Toggle {
        /// Position shown by `larder list`
        position: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an ingredient
    Delete {
        /// Position shown by `larder list`
        position: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all ingredients
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the categories in use
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all ingredients as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Output a JSON status line (only with --output)
        #[arg(long)]
        json: bool,
    },
    /// Import ingredients from a JSON export, merging duplicates
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    tracing::debug!(db = %config.db_path.display(), "opening database");
    let mut svc = Service::open(&config.db_path)?;

    match cli.command {
        Commands::Add {
            name,
            quantity,
            category,
            expires,
            notes,
            image,
            json,
        } => cmd_add(
            &mut svc,
            &commands::AddArgs {
                name: &name,
                quantity: &quantity,
                category: &category,
                expires: expires.as_deref(),
                notes: notes.as_deref(),
                image: image.as_deref(),
            },
            json,
        ),
        Commands::List {
            search,
            bought,
            category,
            json,
        } => cmd_list(&svc, search, bought, category, json),
        Commands::Bought {
            position,
            undo,
            json,
        } => cmd_bought(&mut svc, position, undo, json),
        Commands::Toggle { position, json } => cmd_toggle(&mut svc, position, json),
        Commands::Delete {
            position,
            yes,
            json,
        } => cmd_delete(&mut svc, position, yes, json),
        Commands::Clear { yes, json } => cmd_clear(&mut svc, yes, json),
        Commands::Categories { json } => cmd_categories(&svc, json),
        Commands::Export { output, json } => cmd_export(&svc, output.as_deref(), json),
        Commands::Import { file, json } => cmd_import(&mut svc, &file, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "larder", "add", "Egg", "6 pcs", "--category", "Dairy", "--expires", "today",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                name,
                quantity,
                category,
                expires,
                ..
            } => {
                assert_eq!(name, "Egg");
                assert_eq!(quantity, "6 pcs");
                assert_eq!(category, "Dairy");
                assert_eq!(expires.as_deref(), Some("today"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_list_bought_filter() {
        let cli = Cli::try_parse_from(["larder", "list", "--bought", "not-bought"]).unwrap();
        match cli.command {
            Commands::List { bought, .. } => assert_eq!(bought, BoughtFilter::NotBought),
            _ => panic!("expected list"),
        }
        assert!(Cli::try_parse_from(["larder", "list", "--bought", "maybe"]).is_err());
    }

    #[test]
    fn test_add_and_list_against_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("larder.db");
        let mut svc = Service::open(&path).unwrap();
        let args = commands::AddArgs {
            name: " Egg ",
            quantity: "6 pcs",
            category: "Dairy",
            expires: Some("2024-05-01"),
            notes: None,
            image: None,
        };
        cmd_add(&mut svc, &args, true).unwrap();
        cmd_add(&mut svc, &args, true).unwrap();

        let svc = Service::open(&path).unwrap();
        let records = svc.collection().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Egg");
        assert_eq!(records[0].quantity, "12 pcs");
    }
}
