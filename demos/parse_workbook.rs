//! Parse an invoice workbook and print it as JSON.
//!
//! ```text
//! cargo run --example parse_workbook --features json -- invoices.xlsx [--verbose] [--strict]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, warn};

use invoice_sheets::core::*;
use invoice_sheets::export::to_json;
use invoice_sheets::parser::WorkbookParser;

#[derive(Parser)]
#[command(name = "parse_workbook")]
#[command(about = "Parses an invoice workbook and prints it as JSON", long_about = None)]
struct Cli {
    /// Path to the xlsx/xls/ods workbook
    #[arg(value_name = "WORKBOOK")]
    path: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Fail on unparsable dates and numbers instead of skipping them
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { log::Level::Debug } else { log::Level::Info };
    if let Err(err) = easy_logging::init("invoice_sheets", log_level) {
        eprintln!("Failed to initialize the logging: {}.", err);
        return ExitCode::FAILURE;
    }

    let mut options = ParseOptions::new();
    if cli.strict {
        options = options.coercion(CoercionPolicy::Strict);
    }

    let parsed = match WorkbookParser::new(options).parse_file(&cli.path) {
        Ok(parsed) => parsed,
        Err(err) => {
            error!("Failed to parse {}: {}.", cli.path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let invoices: Vec<Invoice> = parsed.invoices().cloned().collect();
    for finding in validate_references(&parsed.metadata, &invoices) {
        warn!("{}.", finding);
    }

    match to_json(&parsed) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}.", err);
            ExitCode::FAILURE
        }
    }
}
