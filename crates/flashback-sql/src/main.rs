//! flashback-sql CLI
//!
//! Command-line tool that filters or inverts binlog2sql output.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use flashback_sql::prelude::*;
use flashback_sql_core::DEFAULT_PRIMARY_KEY;

/// Filter binlog2sql UPDATE statements and generate flashback SQL.
#[derive(Parser)]
#[command(name = "flashback-sql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL file you want to filter.
    #[arg(short = 'f', long = "file", required_unless_present = "sql")]
    sql_file: Option<PathBuf>,

    /// File that saves the result (standard output if not specified).
    #[arg(short, long)]
    out_file: Option<PathBuf>,

    /// Column used as primary key; always kept in the WHERE clause.
    #[arg(short = 'p', long = "pk", default_value = DEFAULT_PRIMARY_KEY)]
    primary_key: String,

    /// Columns that are never filtered out of the WHERE clause.
    #[arg(short = 'k', long = "kcl", num_args = 0..)]
    keep_columns: Vec<String>,

    /// Generate flashback SQL.
    #[arg(long)]
    flashback: bool,

    /// Generate full flashback SQL (no filtering, UPDATE only).
    #[arg(long)]
    full_flashback: bool,

    /// Show the filter, flashback and full flashback result of one statement.
    #[arg(long, conflicts_with = "sql_file")]
    sql: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RewriteConfig::new(&cli.primary_key).keep_columns(&cli.keep_columns);
    let rewriter = Rewriter::new(config);

    if let Some(sql) = cli.sql {
        let results = preview(&sql, &rewriter, &mut TracingSink)?;
        for (mode, result) in results {
            let label = match mode {
                Mode::Filter => "filter",
                Mode::Flashback => "flashback",
                Mode::FullFlashback => "full flashback",
            };
            println!("{label} result:  {result}\n");
        }
        return Ok(());
    }

    let Some(input) = cli.sql_file else {
        bail!("Missing sql file, we need [-f|--file] argument.");
    };

    let mode = Mode::from_flags(cli.flashback, cli.full_flashback);
    if mode == Mode::Filter {
        warn!("This function only filter update statement");
    }
    info!(
        primary_key = %rewriter.config().primary_key(),
        keep_columns = ?rewriter.config().kept().collect::<Vec<_>>(),
        ?mode,
        "Starting"
    );

    let options = Options {
        input,
        output: cli.out_file,
        mode,
    };

    match run_file(&options, &rewriter) {
        Ok(summary) => {
            info!(
                lines = summary.lines,
                statements = summary.statements,
                passed_through = summary.passed_through,
                "Done"
            );
            Ok(())
        }
        Err(err) => {
            error!("{err}");
            Err(err.into())
        }
    }
}
