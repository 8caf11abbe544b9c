use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod config;
mod import_cmd;
mod ledger_cmd;
mod state;

use ledger_cmd::FilterArgs;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EXTRATO_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "extrato", version = VERSION, about = "Import Brazilian bank-statement PDFs and track spending")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from statement PDFs and store them
    Import {
        /// Statement files; anything not named *.pdf is skipped
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Skip the OCR fallback even if configured
        #[arg(long)]
        no_ocr: bool,
    },

    /// List stored transactions
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Totals, top merchants and category breakdown
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of merchants to show (default: 10)
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Merchants with and without a category
    Merchants,

    /// Categories in use and the remembered merchant categories
    Categories,

    /// Remember a category for a merchant and apply it to stored transactions
    Categorize {
        #[arg(long)]
        merchant: String,
        #[arg(long)]
        category: String,
    },

    /// Forget a merchant's category
    Uncategorize {
        #[arg(long)]
        merchant: String,
    },

    /// Write transactions as CSV (stdout unless --out is given)
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage ~/.extrato/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
        };
    }

    let cfg = config::load_config()?;
    match cli.command {
        Command::Import { files, no_ocr } => import_cmd::run(&cfg, &files, no_ocr),
        Command::List { filters } => ledger_cmd::list(&cfg, &filters),
        Command::Report { filters, top } => ledger_cmd::report(&cfg, &filters, top),
        Command::Merchants => ledger_cmd::merchants(&cfg),
        Command::Categories => ledger_cmd::categories(&cfg),
        Command::Categorize { merchant, category } => {
            ledger_cmd::categorize(&cfg, &merchant, &category)
        }
        Command::Uncategorize { merchant } => ledger_cmd::uncategorize(&cfg, &merchant),
        Command::Export { filters, out } => ledger_cmd::export(&cfg, &filters, out.as_deref()),
        Command::Config { .. } => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
