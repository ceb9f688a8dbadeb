//! My Sheets CLI - formula evaluation and worksheet replay tool

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use my_sheets::prelude::*;
use my_sheets::{evaluate, FormulaResult};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "mysheets")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single expression against an empty sheet
    Eval {
        /// Expression, with or without the leading `=`
        expression: String,
    },

    /// Check whether a formula is valid (exit status 1 if not)
    Check {
        /// Formula to check
        expression: String,
    },

    /// Replay `ADDRESS: EXPRESSION` lines and print the resulting sheet
    Run {
        /// Script file (default: stdin)
        script: Option<PathBuf>,

        /// Print cells as JSON
        #[arg(long)]
        json: bool,

        /// Print every change notification to stderr
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval { expression } => eval(&expression),
        Commands::Check { expression } => check(&expression),
        Commands::Run {
            script,
            json,
            trace,
        } => run(script.as_deref(), json, trace),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn eval(expression: &str) -> Result<ExitCode> {
    let value = evaluate(expression, |reference: &str| -> FormulaResult<CellValue> {
        CellAddress::parse(reference)?;
        Ok(CellValue::Number(0.0))
    });

    println!("{}", value);
    Ok(ExitCode::SUCCESS)
}

fn check(expression: &str) -> Result<ExitCode> {
    if Worksheet::new().is_formula_valid(expression) {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("invalid");
        Ok(ExitCode::FAILURE)
    }
}

fn run(script: Option<&Path>, json: bool, trace: bool) -> Result<ExitCode> {
    let text = match script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let mut sheet = Worksheet::new();
    if trace {
        sheet.subscribe(|addr| eprintln!("changed {}", addr));
    }

    let mut edits = 0;
    for (index, line) in text.lines().enumerate() {
        let Some((address, expression)) =
            parse_line(line).with_context(|| format!("Line {}", index + 1))?
        else {
            continue;
        };

        sheet
            .set_cell_at_address(address, expression)
            .with_context(|| format!("Line {}", index + 1))?;
        edits += 1;
    }
    match sheet.used_range() {
        Some(range) => log::info!(
            "Applied {} edits, {} cells materialized in {}",
            edits,
            sheet.active_cell_count(),
            range
        ),
        None => log::warn!("Script contained no edits"),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        let records: Vec<CellRecord<'_>> = sheet.cells().map(CellRecord::from).collect();
        serde_json::to_writer_pretty(&mut out, &records).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        for cell in sheet.cells() {
            writeln!(
                out,
                "{}\t{}\t{}",
                cell.address(),
                cell.expression(),
                cell.value()
            )?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Split a script line into address and expression
///
/// Blank lines and `#` comments yield `None`.
fn parse_line(line: &str) -> Result<Option<(&str, &str)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let Some((address, expression)) = line.split_once(':') else {
        bail!("Expected 'ADDRESS: EXPRESSION', got '{}'", line);
    };
    Ok(Some((address.trim(), expression.trim())))
}

/// One cell in `--json` output
///
/// `value` is the displayed text, so errors appear as `#ERROR!` and `#CYCLE!`.
#[derive(Serialize)]
struct CellRecord<'a> {
    address: String,
    expression: &'a str,
    #[serde(rename = "type")]
    cell_type: CellType,
    value: String,
}

impl<'a> From<&'a Cell> for CellRecord<'a> {
    fn from(cell: &'a Cell) -> Self {
        Self {
            address: cell.address().to_string(),
            expression: cell.expression(),
            cell_type: cell.cell_type(),
            value: cell.value().to_string(),
        }
    }
}
