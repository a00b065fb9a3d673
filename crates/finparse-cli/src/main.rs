mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "finparse",
    version,
    about = "Parse bank and UPI wallet statements into CSV or JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a statement (PDF, extracted text, or JSON cell grids)
    Parse {
        /// Path to PDF, .txt or .json (cell grids, table format only)
        input_file: PathBuf,

        /// Statement format: ledger (canara), wallet (upi) or table (gpay)
        #[arg(short = 't', long = "type", value_name = "FORMAT")]
        format: String,

        /// Output format: csv (default), json, or table (print to stdout)
        #[arg(
            short = 'f',
            long = "format",
            default_value = "csv",
            value_parser = ["csv", "json", "table"]
        )]
        output: String,

        /// Privacy level: raw, masked (default) or clean
        #[arg(short, long, default_value = "masked", value_parser = ["raw", "masked", "clean"])]
        privacy: String,

        /// Directory to write csv/json output into
        #[arg(short = 'o', long = "output", value_name = "DIR", default_value = "output")]
        out_dir: PathBuf,

        /// Custom JSON privacy policy (replaces the built-in one for the format)
        #[arg(long, value_name = "FILE")]
        policy: Option<PathBuf>,

        /// Column layout: canonical (all fields) or native (the format's own)
        #[arg(long, default_value = "canonical", value_parser = ["canonical", "native"])]
        layout: String,
    },
    /// Inspect and validate privacy policies
    Policies {
        #[command(subcommand)]
        action: PoliciesAction,
    },
}

#[derive(Subcommand)]
enum PoliciesAction {
    /// List built-in policies
    List,
    /// Explain what each privacy level does for a format
    Explain {
        /// Statement format (e.g., "wallet")
        format: String,
    },
    /// Validate a custom policy file
    Validate {
        /// Path to JSON policy file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            format,
            output,
            privacy,
            out_dir,
            policy,
            layout,
        } => commands::parse::run(
            input_file,
            &format,
            &output,
            &privacy,
            out_dir,
            policy,
            &layout,
        ),
        Commands::Policies { action } => match action {
            PoliciesAction::List => commands::policies::list(),
            PoliciesAction::Explain { format } => commands::policies::explain(&format),
            PoliciesAction::Validate { file } => commands::policies::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
