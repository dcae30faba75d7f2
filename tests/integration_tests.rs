use std::io::Write;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};

use airq_processor::analyzers::AirQualityAnalyzer;
use airq_processor::error::AnalysisError;
use airq_processor::models::{Dataset, PollutionLevel};
use airq_processor::processors::{DateRange, Enricher, QualityChecker};
use airq_processor::readers::CsvObservationReader;
use airq_processor::utils::constants::SHARE_EPSILON;
use airq_processor::writers::{ParquetWriter, ReportWriter};

const HEADER: &str = "tanggal,station,TEMP,PM2.5,PM10,SO2,NO2,CO,O3,wd,WSPM";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

fn sample_csv() -> NamedTempFile {
    write_csv(&[
        // January: low pollution at Aotizhongxin, one unmapped wind label
        "2016-01-01 00:00:00,Aotizhongxin,-2.0,20.0,40.0,5.0,10.0,100.0,20.0,N,1.0",
        "2016-01-01 12:00:00,Aotizhongxin,1.0,30.0,45.0,8.0,20.0,200.0,30.0,calm,2.0",
        "2016-01-02 06:00:00,Aotizhongxin,-1.0,50.0,80.0,15.0,45.0,700.0,60.0,E,3.0",
        // February: high pollution at Changping, one row with missing readings
        "2016-02-01 00:00:00,Changping,3.0,150.0,200.0,30.0,80.0,1500.0,90.0,W,4.0",
        "2016-02-02 00:00:00,Changping,5.0,,40.0,5.0,10.0,100.0,20.0,S,1.5",
    ])
}

fn load(file: &NamedTempFile) -> Dataset {
    let observations = CsvObservationReader::new()
        .read_observations(file.path())
        .expect("Failed to read CSV");
    let enriched = Enricher::new(2).enrich(observations).expect("enrich");
    Dataset::new(enriched).expect("dataset")
}

#[test]
fn test_pipeline_end_to_end() {
    let file = sample_csv();
    let dataset = load(&file);

    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.stations(), vec!["Aotizhongxin", "Changping"]);

    let range = DateRange::full_span(&dataset);
    let report = AirQualityAnalyzer::new()
        .analyze(&dataset, &range)
        .expect("analyze");

    // Monthly temperature means in chronological order
    let temperature = report.temperature.expect("temperature section");
    assert_eq!(temperature.monthly_mean.len(), 2);
    let january = &temperature.monthly_mean[0];
    assert_eq!(january.month.to_string(), "2016-01");
    assert!((january.value - (-2.0 + 1.0 - 1.0) / 3.0).abs() < 1e-12);
    assert_eq!(temperature.warmest_month.month.to_string(), "2016-02");

    // Level classification: 2 low, 1 moderate, 1 high, 1 unclassified
    let levels = report.levels.expect("level section");
    assert_eq!(levels.overall.observations, 4);
    assert!((levels.overall.sum() - 1.0).abs() < SHARE_EPSILON);
    assert!((levels.overall.low - 0.5).abs() < SHARE_EPSILON);
    assert!((levels.overall.moderate - 0.25).abs() < SHARE_EPSILON);
    assert!((levels.overall.high - 0.25).abs() < SHARE_EPSILON);

    // Per-group shares each sum to one
    for station in &levels.by_station {
        assert!((station.shares.sum() - 1.0).abs() < SHARE_EPSILON);
    }
    for year in &levels.by_year {
        assert!((year.shares.sum() - 1.0).abs() < SHARE_EPSILON);
    }
    for month in &levels.by_month {
        assert!((month.shares.sum() - 1.0).abs() < SHARE_EPSILON);
    }
    assert_eq!(levels.by_month.len(), 2);

    // Wind rose: 4 mapped rows, the 'calm' label excluded
    let wind = report.wind.expect("wind section");
    let binned: usize = wind.sectors.iter().map(|s| s.count).sum();
    assert_eq!(binned, 4);
    let north = &wind.sectors[0];
    assert_eq!(north.degrees, 0.0);
    assert_eq!(north.count, 1);
}

#[test]
fn test_date_filter_and_range_violation() {
    let file = sample_csv();
    let dataset = load(&file);

    // January only
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2016, 1, 31).unwrap(),
    )
    .unwrap();
    let report = AirQualityAnalyzer::new().analyze(&dataset, &range).unwrap();
    assert_eq!(report.dataset.rows_in_range, 3);
    let levels = report.levels.unwrap();
    assert_eq!(levels.by_station.len(), 1);
    assert_eq!(levels.by_station[0].station, "Aotizhongxin");

    // Outside the span: non-fatal, sections skipped, no crash and no NaN
    let outside = DateRange::new(
        NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2014, 12, 31).unwrap(),
    )
    .unwrap();
    let report = AirQualityAnalyzer::new()
        .analyze(&dataset, &outside)
        .unwrap();
    assert!(report.temperature.is_none());
    assert!(report.levels.is_none());
    assert!(report.wind.is_none());
}

#[test]
fn test_analysis_is_deterministic() {
    let file = sample_csv();
    let dataset = load(&file);
    let range = DateRange::full_span(&dataset);
    let analyzer = AirQualityAnalyzer::new();
    let writer = ReportWriter::new();

    let first = writer.to_json(&analyzer.analyze(&dataset, &range).unwrap()).unwrap();
    let second = writer.to_json(&analyzer.analyze(&dataset, &range).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_quality_report_surfaces_exclusions() {
    let file = sample_csv();
    let dataset = load(&file);

    let checker = QualityChecker::new();
    let report = checker.check(&dataset);

    assert_eq!(report.total_rows, 5);
    assert_eq!(report.rows_with_readings, 4);
    assert_eq!(report.rows_with_wind, 4);
    assert_eq!(report.unmapped_wind_labels.get("calm"), Some(&1));
    assert_eq!(report.level_counts.low, 2);
    assert_eq!(report.level_counts.moderate, 1);
    assert_eq!(report.level_counts.high, 1);
}

#[test]
fn test_parquet_round_trip_through_pipeline() {
    let file = sample_csv();
    let dataset = load(&file);

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("observations.parquet");

    let writer = ParquetWriter::new();
    writer
        .write_observations(dataset.observations(), &path)
        .unwrap();

    let read_back = writer.read_sample_observations(&path, 100).unwrap();
    assert_eq!(read_back.as_slice(), dataset.observations());

    // Enriched fields survive the round trip
    assert_eq!(read_back[0].level, Some(PollutionLevel::Low));
    assert_eq!(read_back[0].wind_degrees, Some(0.0));
}

#[test]
fn test_missing_column_reported_by_name() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "tanggal,station,TEMP,PM2.5,PM10,SO2,NO2,CO,O3,WSPM").unwrap();
    writeln!(
        file,
        "2016-01-01 00:00:00,Aotizhongxin,1.0,20.0,40.0,5.0,10.0,100.0,20.0,1.0"
    )
    .unwrap();

    let err = CsvObservationReader::new()
        .read_observations(file.path())
        .unwrap_err();
    match err {
        AnalysisError::SchemaViolation { column } => assert_eq!(column, "wd"),
        other => panic!("expected schema violation, got {other}"),
    }
}
