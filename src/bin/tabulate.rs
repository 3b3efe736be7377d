//! CLI tool to print a CSV file as a table.
//!
//! Usage:
//!   tabulate <input.csv> --types str,int,float
//!   tabulate <input.csv> --types str,int,float --format html -o table.html
//!
//! If no output file is specified, writes to stdout.

use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tabulate_rs::{
    FieldType, Sequence, TableConfig, TableFormat, parse_with_report, print_table,
};
use tracing_subscriber::EnvFilter;

/// Print a CSV file as a table, converting each column to its declared type.
///
/// Rows that fail conversion are skipped and reported on stderr.
#[derive(Parser)]
#[command(name = "tabulate")]
struct Cli {
    /// Input CSV file (first row names the columns)
    input: String,

    /// One type per column: str, int, or float (e.g. str,int,float)
    #[arg(short, long, value_delimiter = ',', required = true)]
    types: Vec<FieldType>,

    /// Table layout
    #[arg(short, long, value_enum, default_value_t = TableFormat::Text)]
    format: TableFormat,

    /// Columns to print, comma-separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Per-column value formats, comma-separated (e.g. %s,%d,%0.2f)
    #[arg(long)]
    column_formats: Option<String>,

    /// Upper-case the headings
    #[arg(long)]
    upper_headings: bool,

    /// Only print records START:END (either side may be omitted)
    #[arg(long, value_parser = parse_slice)]
    slice: Option<(usize, usize)>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Show paths and record counts on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_slice(text: &str) -> Result<(usize, usize), String> {
    let (start, end) = text
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got '{text}'"))?;
    let bound = |s: &str, default: usize| -> Result<usize, String> {
        let s = s.trim();
        if s.is_empty() {
            Ok(default)
        } else {
            s.parse().map_err(|_| format!("invalid slice bound '{s}'"))
        }
    };
    Ok((bound(start, 0)?, bound(end, usize::MAX)?))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = TableConfig::new(cli.format).with_upper_headings(cli.upper_headings);
    if let Some(text) = &cli.column_formats {
        config = match config.with_column_formats(text) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error in --column-formats: {e}");
                process::exit(1);
            }
        };
    }
    let formatter = config.build();

    let file = match File::open(&cli.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error reading input file '{}': {e}", cli.input);
            process::exit(1);
        }
    };

    let (records, skipped) = match parse_with_report(file, &cli.types) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Parse error: {e}");
            process::exit(1);
        }
    };

    let records = match cli.slice {
        Some((start, end)) => records.slice(start..end),
        None => records,
    };

    let columns: Vec<String> = if cli.columns.is_empty() {
        records.fields().to_vec()
    } else {
        cli.columns.clone()
    };

    if cli.verbose {
        eprintln!("Input:    {}", cli.input);
        eprintln!("Output:   {}", cli.output.as_deref().unwrap_or("(stdout)"));
        eprintln!("Format:   {:?}", cli.format);
    }

    let mut rendered = Vec::new();
    if let Err(e) = print_table(&records, &columns, &formatter, &mut rendered) {
        eprintln!("Table error: {e}");
        process::exit(1);
    }

    if let Some(out_path) = &cli.output {
        if let Some(parent) = Path::new(out_path.as_str()).parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            eprintln!("Error creating output directory for '{out_path}'");
            process::exit(1);
        }
        if let Err(e) = fs::write(out_path, &rendered) {
            eprintln!("Error writing output file '{out_path}': {e}");
            process::exit(1);
        }
    } else if let Err(e) = io::stdout().write_all(&rendered) {
        eprintln!("Error writing output: {e}");
        process::exit(1);
    }

    if cli.verbose {
        eprintln!(
            "Records:  {} printed, {} skipped",
            records.len(),
            skipped.len()
        );
    }
}
