use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airq-processor")]
#[command(about = "Air-quality observation processor: classification and temporal aggregation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute all chart aggregates and write a JSON report
    Analyze {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(long, value_parser = parse_date, help = "Inclusive start date (YYYY-MM-DD)")]
        start_date: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date, help = "Inclusive end date (YYYY-MM-DD)")]
        end_date: Option<NaiveDate>,

        #[arg(
            short,
            long,
            help = "Output JSON report path [default: output/airq-report-{YYMMDD}.json]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Write the report to stdout instead of a file")]
        stdout: bool,

        #[arg(long, help = "Compact JSON instead of pretty-printed")]
        compact: bool,

        #[arg(short, long, help = "Restrict the analysis to one station")]
        station: Option<String>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Convert the CSV into an enriched Parquet observation table
    Convert {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output Parquet path [default: output/airq-observations-{YYMMDD}.parquet]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(short, long, help = "Restrict the output to one station")]
        station: Option<String>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, default_value = "1000")]
        chunk_size: usize,
    },

    /// Check schema and data quality without writing output
    Validate {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Display information about a previously written Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a valid YYYY-MM-DD date", value))
}
