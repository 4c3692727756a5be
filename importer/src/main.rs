//! contactload CLI - turn a contact export into SQL, or summarize it
//!
//! ```bash
//! contactload transform contacts.csv -o personal_contacts_import.sql
//! contactload summary contacts.csv
//! contactload summary contacts.csv --format json
//! contactload mapping > mapping.json       # default column mapping, to edit
//! ```
//!
//! Paths and the batch size can also come from the environment (or a `.env`
//! file): `CONTACTLOAD_INPUT`, `CONTACTLOAD_OUTPUT`, `CONTACTLOAD_BATCH_SIZE`,
//! `CONTACTLOAD_MAPPING`, `CONTACTLOAD_BATCH_ID`.

use clap::{Parser, Subcommand, ValueEnum};
use contactload::{
    logs::LOGGER,
    run_summary, run_transform, ColumnMapping, SummaryOptions, TransformOptions,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contactload")]
#[command(about = "Convert a contact CSV export into SQL INSERT statements", long_about = None)]
struct Cli {
    /// Suppress progress output on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write batched INSERT statements for the export
    Transform {
        /// Input CSV file
        #[arg(env = "CONTACTLOAD_INPUT")]
        input: PathBuf,

        /// Output SQL file
        #[arg(short, long, env = "CONTACTLOAD_OUTPUT", default_value = "personal_contacts_import.sql")]
        output: PathBuf,

        /// Rows per INSERT statement
        #[arg(short, long, env = "CONTACTLOAD_BATCH_SIZE", default_value = "1000")]
        batch_size: usize,

        /// JSON column mapping (default: built-in personal_contacts layout)
        #[arg(short, long, env = "CONTACTLOAD_MAPPING")]
        mapping: Option<PathBuf>,

        /// Value for `import_batch` columns (default: generated per run)
        #[arg(long, env = "CONTACTLOAD_BATCH_ID")]
        batch_id: Option<String>,
    },

    /// Print frequency counts, missing-data rates and sample rows
    Summary {
        /// Input CSV file
        #[arg(env = "CONTACTLOAD_INPUT")]
        input: PathBuf,

        /// Entries per ranked section
        #[arg(long, default_value = "10")]
        top: usize,

        /// Raw rows to show at the end
        #[arg(long, default_value = "5")]
        samples: usize,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Print the default column mapping as JSON
    Mapping,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);
    LOGGER.set_json(cli.log_json);

    let result = match cli.command {
        Commands::Transform {
            input,
            output,
            batch_size,
            mapping,
            batch_id,
        } => cmd_transform(input, output, batch_size, mapping, batch_id),

        Commands::Summary {
            input,
            top,
            samples,
            format,
        } => cmd_summary(input, top, samples, format),

        Commands::Mapping => cmd_mapping(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_transform(
    input: PathBuf,
    output: PathBuf,
    batch_size: usize,
    mapping: Option<PathBuf>,
    batch_id: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = TransformOptions {
        batch_size,
        mapping_path: mapping,
        batch_id,
    };
    run_transform(&input, &output, &options)?;
    Ok(())
}

fn cmd_summary(
    input: PathBuf,
    top: usize,
    samples: usize,
    format: ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = SummaryOptions {
        top_n: top,
        sample_size: samples,
    };
    let report = run_summary(&input, &options)?;

    match format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn cmd_mapping() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", ColumnMapping::default().to_json()?);
    Ok(())
}
