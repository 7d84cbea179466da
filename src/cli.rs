use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::{engine::EngineOptions, io_utils, request::TopCount};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Rank certified H-1B applications by occupation and worksite state",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the top occupations and top worksite states reports
    Report(ReportArgs),
    /// Print the most frequent certified values of one column
    Top(TopArgs),
    /// List header columns and the roles they were resolved to
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Semicolon-delimited case file
    #[arg(short = 'i', long = "input", default_value = "./input/h1b_input.csv")]
    pub input: PathBuf,
    /// Field delimiter (supports ';', ',', 'tab', '|')
    #[arg(long, value_parser = parse_delimiter, default_value = ";")]
    pub delimiter: u8,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

impl SourceArgs {
    pub fn engine_options(&self) -> Result<EngineOptions> {
        Ok(EngineOptions {
            delimiter: self.delimiter,
            encoding: io_utils::resolve_encoding(self.input_encoding.as_deref())?,
        })
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output file for the top occupations report
    #[arg(
        short = 'o',
        long = "occupation-output",
        default_value = "./output/top_10_occupations.txt"
    )]
    pub occupation_output: PathBuf,
    /// Output file for the top worksite states report
    #[arg(
        short = 's',
        long = "state-output",
        default_value = "./output/top_10_states.txt"
    )]
    pub state_output: PathBuf,
    /// Number of ranked entries per report
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    pub top: TopCount,
    /// YAML report plan replacing the two default reports
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TopArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Column to rank: a header name or a role (occupation, status, state)
    #[arg(short = 'C', long = "column")]
    pub column: String,
    /// Number of ranked entries to print
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    pub top: TopCount,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
