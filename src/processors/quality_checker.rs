use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::models::{CompassPoint, Dataset, PollutionLevel};

/// Counts of each severity label within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: PollutionLevel) {
        match level {
            PollutionLevel::Low => self.low += 1,
            PollutionLevel::Moderate => self.moderate += 1,
            PollutionLevel::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high
    }
}

#[derive(Debug, Clone, Default)]
pub struct StationQuality {
    pub total_rows: usize,
    pub rows_with_temp: usize,
    pub rows_with_readings: usize,
    pub level_counts: LevelCounts,
}

/// Data-quality survey of the enriched table: how many rows can feed each
/// aggregate, and what was excluded.
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub total_rows: usize,
    pub rows_with_temp: usize,
    pub rows_with_readings: usize,
    pub rows_with_wind: usize,
    pub unmapped_wind_labels: BTreeMap<String, usize>,
    pub level_counts: LevelCounts,
    pub station_quality: BTreeMap<String, StationQuality>,
    pub span: (NaiveDateTime, NaiveDateTime),
}

pub struct QualityChecker;

impl QualityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, dataset: &Dataset) -> QualityReport {
        let mut report = QualityReport {
            total_rows: dataset.len(),
            rows_with_temp: 0,
            rows_with_readings: 0,
            rows_with_wind: 0,
            unmapped_wind_labels: BTreeMap::new(),
            level_counts: LevelCounts::default(),
            station_quality: BTreeMap::new(),
            span: dataset.span(),
        };

        for observation in dataset.observations() {
            let station = report
                .station_quality
                .entry(observation.station.clone())
                .or_default();
            station.total_rows += 1;

            if observation.temp.is_some() {
                report.rows_with_temp += 1;
                station.rows_with_temp += 1;
            }

            if let Some(level) = observation.level {
                report.rows_with_readings += 1;
                report.level_counts.record(level);
                station.rows_with_readings += 1;
                station.level_counts.record(level);
            }

            match observation.wind_direction.as_deref() {
                Some(label) if CompassPoint::from_label(label).is_some() => {
                    report.rows_with_wind += 1;
                }
                Some(label) => {
                    *report
                        .unmapped_wind_labels
                        .entry(label.to_string())
                        .or_insert(0) += 1;
                }
                None => {}
            }
        }

        report
    }

    pub fn generate_summary(&self, report: &QualityReport) -> String {
        let pct = |part: usize| {
            if report.total_rows == 0 {
                0.0
            } else {
                100.0 * part as f64 / report.total_rows as f64
            }
        };

        let mut summary = String::new();
        summary.push_str("=== Data Quality Report ===\n");
        summary.push_str(&format!(
            "Span: {} to {}\n",
            report.span.0.date(),
            report.span.1.date()
        ));
        summary.push_str(&format!("Total Rows: {}\n", report.total_rows));
        summary.push_str(&format!(
            "Rows with TEMP: {} ({:.1}%)\n",
            report.rows_with_temp,
            pct(report.rows_with_temp)
        ));
        summary.push_str(&format!(
            "Rows with all six pollutants: {} ({:.1}%)\n",
            report.rows_with_readings,
            pct(report.rows_with_readings)
        ));
        summary.push_str(&format!(
            "Rows with mapped wind direction: {} ({:.1}%)\n",
            report.rows_with_wind,
            pct(report.rows_with_wind)
        ));
        summary.push_str(&format!(
            "Severity counts: {} low / {} moderate / {} high\n",
            report.level_counts.low, report.level_counts.moderate, report.level_counts.high
        ));

        if !report.unmapped_wind_labels.is_empty() {
            summary.push_str("\nUnmapped wind labels (excluded from wind aggregates):\n");
            for (label, count) in &report.unmapped_wind_labels {
                summary.push_str(&format!("  '{}': {} rows\n", label, count));
            }
        }

        summary.push_str(&format!("\nStations: {}\n", report.station_quality.len()));
        for (name, station) in &report.station_quality {
            summary.push_str(&format!(
                "  {}: {} rows, {} with readings, {} with TEMP\n",
                name, station.total_rows, station.rows_with_readings, station.rows_with_temp
            ));
        }

        summary
    }
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::new()
    }
}
