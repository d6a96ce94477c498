//! tabcalc CLI - derived columns for CSV files

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabcalc::prelude::*;
use tabcalc::{parse, ColumnReferences};

#[derive(Parser)]
#[command(name = "tabcalc")]
#[command(
    author,
    version,
    about = "Add formula-derived columns to tabular data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one or more `Name = Expression` formulas to a CSV file
    Apply {
        /// Input CSV file (first row names the columns)
        input: PathBuf,

        /// Formula to apply, repeatable; applied in order
        #[arg(short, long = "formula", required = true)]
        formulas: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Column holding the row timestamp, read by Δt
        #[arg(long, default_value = "time")]
        time_column: String,

        /// Match column names exactly instead of by trailing words
        #[arg(long)]
        exact_names: bool,

        /// Field delimiter for input and output
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Parse a formula and report how it would be evaluated
    Check {
        /// Formula in `Name = Expression` form
        formula: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            input,
            formulas,
            output,
            format,
            time_column,
            exact_names,
            delimiter,
        } => {
            let matching = if exact_names {
                NameMatching::Exact
            } else {
                NameMatching::WordSuffix
            };
            let options = MaterializeOptions::new()
                .with_time_column(time_column)
                .with_name_matching(matching);
            apply(&input, &formulas, output.as_deref(), format, &options, delimiter)
        }
        Commands::Check { formula } => check(&formula),
    }
}

fn apply(
    input: &Path,
    formulas: &[String],
    output: Option<&Path>,
    format: OutputFormat,
    options: &MaterializeOptions,
    delimiter: char,
) -> Result<()> {
    ensure!(
        delimiter.is_ascii(),
        "Delimiter must be a single ASCII character, got '{}'",
        delimiter
    );
    let delimiter = delimiter as u8;

    // Load the table
    let read_options = CsvReadOptions::default().with_delimiter(delimiter);
    let mut table = CsvReader::read_file(input, &read_options)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    info!(
        "Loaded {} rows, {} columns from '{}'",
        table.len(),
        table.columns().len(),
        input.display()
    );

    // Apply formulas in order, so later ones can read earlier results
    for formula in formulas {
        let stats = table
            .add_derived_column_with_options(formula, options)
            .with_context(|| format!("Invalid formula '{}'", formula))?;

        eprintln!(
            "{}: {} rows ({} numbers, {} strings, {} errors)",
            formula.trim(),
            stats.rows,
            stats.numbers,
            stats.strings,
            stats.errors
        );
    }

    // Output
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Csv => {
            let write_options = CsvWriteOptions::default().with_delimiter(delimiter);
            CsvWriter::write(&table, &mut buffer, &write_options)
                .context("Failed to format CSV")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut buffer, &table).context("Failed to format JSON")?;
            buffer.push(b'\n');
        }
    }

    if let Some(output_path) = output {
        std::fs::write(output_path, &buffer)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote {} rows to '{}'", table.len(), output_path.display());
    } else {
        io::stdout()
            .write_all(&buffer)
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn check(formula: &str) -> Result<()> {
    let definition = match parse(formula) {
        Ok(definition) => definition,
        Err(e) => bail!("Invalid formula '{}': {}", formula, e),
    };

    println!("Column: {}", definition.name);

    match definition.expression() {
        Ok(expr) => {
            let refs = ColumnReferences::collect(&expr);
            println!("Expression: {}", expr);
            print_set("Reads", refs.columns.iter());
            print_set("Aggregates", refs.aggregated.iter());
            print_set("Lags", refs.lagged.iter());
            print_set("Leads", refs.led.iter());
            if refs.uses_time_delta {
                println!("Uses Δt: yes");
            }
        }
        Err(e) => {
            println!("Expression: {} ({})", definition.expression_text, e);
            println!("Every row would get: {}", FieldError::UnsupportedFormula);
        }
    }

    Ok(())
}

fn print_set<'a, I: Iterator<Item = &'a String>>(label: &str, names: I) {
    let names: Vec<&str> = names.map(String::as_str).collect();
    if !names.is_empty() {
        println!("{}: {}", label, names.join(", "));
    }
}
