pub mod cli;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod io_utils;
pub mod report;
pub mod request;
pub mod schema;
pub mod table;

pub use engine::{CertifiedCounter, EngineOptions};
pub use error::{EngineError, SchemaError};
pub use schema::Role;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    config::ReportPlan,
    table::Align,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("h1b_counting", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(&args),
        Commands::Top(args) => handle_top(&args),
        Commands::Columns(args) => columns::execute(&args),
    }
}

fn open_counter(source: &cli::SourceArgs) -> Result<CertifiedCounter> {
    info!(
        "Reading '{}' with delimiter '{}'",
        source.input.display(),
        io_utils::printable_delimiter(source.delimiter)
    );
    let options = source.engine_options()?;
    CertifiedCounter::with_options(&source.input, options)
        .with_context(|| format!("Opening case file {:?}", source.input))
}

fn handle_report(args: &cli::ReportArgs) -> Result<()> {
    let mut counter = open_counter(&args.source)?;
    let plan = match &args.config {
        Some(path) => ReportPlan::load(path)?,
        None => ReportPlan::canonical(&args.occupation_output, &args.state_output, args.top),
    };
    let written = report::write_plan(&mut counter, &plan)?;
    info!("Wrote {written} report(s)");
    Ok(())
}

fn handle_top(args: &cli::TopArgs) -> Result<()> {
    let mut counter = open_counter(&args.source)?;
    let column = resolve_column_argument(&counter, &args.column);
    let ranked = counter
        .top_n(&column, args.top.get())
        .with_context(|| format!("Ranking column '{column}'"))?;
    let total = counter.certified_total(&column).unwrap_or_default();

    let rows = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (value, count))| {
            vec![
                (idx + 1).to_string(),
                value,
                count.to_string(),
                report::format_percentage(count, total),
            ]
        })
        .collect::<Vec<_>>();
    let headers = vec![
        "#".to_string(),
        column.clone(),
        "certified".to_string(),
        "percent".to_string(),
    ];
    table::print_table(
        &headers,
        &rows,
        &[Align::Right, Align::Left, Align::Right, Align::Right],
    );
    info!("Ranked {} value(s) of {column} across {total} certified row(s)", rows.len());
    Ok(())
}

/// A header name wins over a role of the same spelling.
fn resolve_column_argument(counter: &CertifiedCounter, raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    if counter.schema().position(&upper).is_some() {
        return upper;
    }
    match raw.parse::<Role>() {
        Ok(role) => counter.column_for(role).to_string(),
        Err(_) => upper,
    }
}
