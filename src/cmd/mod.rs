mod generate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "erd-gen")]
#[command(version)]
#[command(about = "Generate a Mermaid entity-relationship diagram from a live database schema", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an ERD file from the database schema
    Generate {
        /// Database connection URL (mysql://, postgres://, or sqlite:)
        #[arg(short, long)]
        database: Option<String>,

        /// Output file path (default: docs/database-erd.md)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compare with the existing ERD file and report whether it changed
        #[arg(long)]
        compare: bool,

        /// Output the full schema without simplifying junction tables
        #[arg(long)]
        raw_relationships: bool,

        /// Tables to ignore (can be used multiple times)
        #[arg(long = "ignore", value_name = "TABLE")]
        ignore: Vec<String>,

        /// Columns to ignore (can be used multiple times)
        #[arg(long = "ignore-column", value_name = "COLUMN")]
        ignore_column: Vec<String>,

        /// Font size for the diagram (e.g. 20px); pass an empty string to
        /// omit the init directive
        #[arg(long)]
        font_size: Option<String>,

        /// YAML config file (default: erd.yaml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show progress during introspection
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            database,
            output,
            compare,
            raw_relationships,
            ignore,
            ignore_column,
            font_size,
            config,
            progress,
        } => generate::run(
            database,
            output,
            compare,
            raw_relationships,
            ignore,
            ignore_column,
            font_size,
            config,
            progress,
        ),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
