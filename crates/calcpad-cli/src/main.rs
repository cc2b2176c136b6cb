//! calcpad CLI - evaluate and check calculation sheets.

mod check;
mod colors;
mod eval;
mod keys;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calcpad")]
#[command(about = "Lazily evaluated calculation sheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve keys of a sheet and print their values
    Eval {
        /// Path to the sheet (.json file)
        sheet: String,

        /// Key to resolve, in order (repeatable; default: every key, sorted)
        #[arg(short, long = "key")]
        keys: Vec<String>,

        /// Print pass statistics after the results
        #[arg(long)]
        stats: bool,
    },

    /// Report missing references and cycles without evaluating
    Check {
        /// Path to the sheet (.json file)
        sheet: String,
    },

    /// List the keys of a sheet and their kinds
    Keys {
        /// Path to the sheet (.json file)
        sheet: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Eval { sheet, keys, stats } => eval::execute(&sheet, &keys, stats)?,
        Commands::Check { sheet } => check::execute(&sheet)?,
        Commands::Keys { sheet } => keys::execute(&sheet)?,
    }

    Ok(())
}
