//! Tablecalc CLI - formula evaluation and recalculation tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tablecalc::prelude::*;

#[derive(Parser)]
#[command(name = "tablecalc")]
#[command(
    author,
    version,
    about = "Evaluate spreadsheet formulas and recalculate CSV tables"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one formula and print the result
    Eval {
        /// Formula text, e.g. "=SUM(A1:A3)*2"
        formula: String,

        /// CSV file providing cell values (default: empty table)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field delimiter of the input file
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Recalculate a CSV table and write the result to stdout or a file
    #[command(alias = "calc")]
    Recalc {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of recalculation passes
        #[arg(short, long, default_value = "1")]
        passes: u32,

        /// Write formula text instead of computed values
        #[arg(short, long)]
        formulas: bool,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Show information about a CSV table
    Info {
        /// Input CSV file
        input: PathBuf,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval {
            formula,
            input,
            delimiter,
        } => eval(&formula, input.as_deref(), delimiter),
        Commands::Recalc {
            input,
            output,
            passes,
            formulas,
            delimiter,
        } => recalc(&input, output.as_deref(), passes, formulas, delimiter),
        Commands::Info { input, delimiter } => show_info(&input, delimiter),
    }
}

/// Install a stderr subscriber; RUST_LOG wins over the verbosity flag
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter '{}' is not a single ASCII character", delimiter))
}

fn open_table(input: &Path, delimiter: char) -> Result<Table> {
    let options = CsvReadOptions {
        delimiter: delimiter_byte(delimiter)?,
        ..Default::default()
    };
    CsvReader::read_file(input, &options)
        .with_context(|| format!("Failed to open '{}'", input.display()))
}

fn eval(formula: &str, input: Option<&Path>, delimiter: char) -> Result<()> {
    let table = match input {
        Some(path) => {
            let mut table = open_table(path, delimiter)?;
            table.recalculate();
            table
        }
        None => Table::new(),
    };

    let value = table
        .evaluate_formula(formula)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;

    println!("{}", value);
    Ok(())
}

fn recalc(
    input: &Path,
    output: Option<&Path>,
    passes: u32,
    formulas: bool,
    delimiter: char,
) -> Result<()> {
    let mut table = open_table(input, delimiter)?;

    let stats = table.recalculate_with_options(&CalculationOptions { passes });
    eprintln!(
        "Calculated {} formulas in {} pass(es) ({} errors)",
        stats.formula_count, stats.passes, stats.errors
    );

    let options = CsvWriteOptions {
        delimiter: delimiter_byte(delimiter)?,
        write_formulas: formulas,
        line_terminator: tablecalc::LineTerminator::LF,
        ..Default::default()
    };

    if let Some(output_path) = output {
        CsvWriter::write_file(&table, output_path, &options)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote '{}'", output_path.display());
    } else {
        CsvWriter::write(&table, io::stdout().lock(), &options)
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn show_info(input: &Path, delimiter: char) -> Result<()> {
    let table = open_table(input, delimiter)?;

    println!("File: {}", input.display());
    println!("Dimensions: {} rows x {} columns", table.rows(), table.cols());

    if let Some(range) = table.used_range() {
        println!(
            "Used range: A1:{} ({} rows x {} columns)",
            range.end,
            range.end.row + 1,
            range.end.col + 1
        );
    } else {
        println!("Used range: empty");
    }
    println!("Formulas: {}", table.formula_count());

    for (addr, formula) in table.formula_cells() {
        println!("  {}\t{}", addr, formula);
    }

    Ok(())
}
