use std::io::Write;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::analyzers::AirQualityAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::error::{AnalysisError, Result};
use crate::models::Dataset;
use crate::processors::{DateRange, Enricher, QualityChecker};
use crate::readers::CsvObservationReader;
use crate::utils::filename::{generate_default_parquet_filename, generate_default_report_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ParquetWriter, ReportWriter};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            start_date,
            end_date,
            output,
            stdout,
            compact,
            station,
            max_workers,
        } => {
            let progress = ProgressReporter::new_spinner("Loading observations...", stdout);
            let dataset = load_dataset(&input, station.as_deref(), max_workers, &progress).await?;

            progress.set_message("Computing aggregates...");
            let range = DateRange::resolve(start_date, end_date, &dataset)?;
            let report = AirQualityAnalyzer::new().analyze(&dataset, &range)?;
            progress.finish_with_message(&format!(
                "Analyzed {} observations",
                report.dataset.rows_in_range
            ));

            let writer = ReportWriter::new().with_pretty(!compact);
            if stdout {
                let mut out = std::io::stdout().lock();
                writer.write(&report, &mut out)?;
                out.write_all(b"\n")?;
            } else {
                println!("\n{}", report.summary());

                let output_path = output.unwrap_or_else(generate_default_report_filename);
                ensure_parent_dir(&output_path)?;
                writer.write_to_path(&report, &output_path)?;
                println!("Report written to {}", output_path.display());
            }
        }

        Commands::Convert {
            input,
            output,
            compression,
            station,
            max_workers,
            chunk_size,
        } => {
            let progress = ProgressReporter::new_spinner("Loading observations...", false);
            let dataset = load_dataset(&input, station.as_deref(), max_workers, &progress).await?;
            progress.finish_with_message(&format!("Loaded {} observations", dataset.len()));

            let output_path = output.unwrap_or_else(generate_default_parquet_filename);
            ensure_parent_dir(&output_path)?;

            println!(
                "Writing {} observations to Parquet file...",
                dataset.len()
            );
            let writer = ParquetWriter::new().with_compression(&compression)?;
            writer.write_observations_batched(dataset.observations(), &output_path, chunk_size)?;

            let file_info = writer.get_file_info(&output_path)?;
            println!("\n{}", file_info.summary());
            println!("Conversion complete: {}", output_path.display());
        }

        Commands::Validate { input, max_workers } => {
            let progress = ProgressReporter::new_spinner("Validating observations...", false);
            let dataset = load_dataset(&input, None, max_workers, &progress).await?;
            progress.finish_with_message("Validation complete");

            let checker = QualityChecker::new();
            let report = checker.check(&dataset);
            println!("\n{}", checker.generate_summary(&report));

            if report.unmapped_wind_labels.is_empty() {
                println!("All wind-direction labels map to the 16-point compass");
            } else {
                println!(
                    "Found {} distinct unmapped wind labels (excluded from wind aggregates)",
                    report.unmapped_wind_labels.len()
                );
            }
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                println!("\nSample observations (showing up to {}):", sample);
                let observations = writer.read_sample_observations(&file, sample)?;
                for (i, obs) in observations.iter().enumerate() {
                    let level = obs
                        .level
                        .map(|l| l.label().to_string())
                        .unwrap_or_else(|| "unclassified".to_string());
                    let temp = obs
                        .temp
                        .map(|t| format!("{:.1}°C", t))
                        .unwrap_or_else(|| "no TEMP".to_string());
                    println!(
                        "{}. {} at {}: {}, {}",
                        i + 1,
                        obs.station,
                        obs.timestamp,
                        temp,
                        level
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore failure when a subscriber is already installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Read, enrich, and optionally restrict to one station. The read is blocking
/// file I/O, so it runs off the async runtime.
async fn load_dataset(
    input: &Path,
    station: Option<&str>,
    max_workers: usize,
    progress: &ProgressReporter,
) -> Result<Dataset> {
    let path = input.to_path_buf();
    let observations =
        tokio::task::spawn_blocking(move || CsvObservationReader::new().read_observations(&path))
            .await??;

    progress.set_message("Deriving pollution levels and wind degrees...");
    let enricher = Enricher::new(max_workers);
    let mut observations = enricher.enrich(observations)?;

    if let Some(name) = station {
        observations.retain(|o| o.station == name);
        if observations.is_empty() {
            return Err(AnalysisError::StationNotFound {
                station: name.to_string(),
            });
        }
    }

    Dataset::new(observations)
}

fn ensure_parent_dir(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
