use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::analyzers::aggregate::{
    earliest_max, earliest_min, level_shares, level_shares_by_month, level_shares_by_station,
    level_shares_by_year, monthly_matrix, monthly_mean, monthly_mean_by_station, scatter_pairs,
    station_mean, wind_rose, LevelShares, MonthBucket, MonthlyMatrix, WindSector,
};
use crate::error::{AnalysisError, Result};
use crate::models::{Dataset, Metric, Observation};
use crate::processors::{DateRange, RangeFilter};

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyValue {
    pub month: MonthBucket,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationValue {
    pub station: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Extreme {
    pub month: MonthBucket,
    pub value: f64,
}

/// Inputs for the temperature time-series chart: overall and per-station
/// monthly means plus the annotated global extremes.
#[derive(Debug, Clone, Serialize)]
pub struct TemperatureSection {
    pub monthly_mean: Vec<MonthlyValue>,
    pub monthly_mean_by_station: BTreeMap<String, Vec<MonthlyValue>>,
    pub warmest_month: Extreme,
    pub coolest_month: Extreme,
}

/// Inputs for the pollutant charts: yearly and per-station means for each of
/// the six pollutants, plus the PM2.5 month-by-station heatmap table.
#[derive(Debug, Clone, Serialize)]
pub struct PollutantSection {
    pub yearly_mean: BTreeMap<String, Vec<YearlyValue>>,
    pub station_mean: BTreeMap<String, Vec<StationValue>>,
    pub pm25_monthly_matrix: Option<MonthlyMatrix>,
}

/// Inputs for the pie and stacked-bar charts.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSection {
    pub overall: LevelShares,
    pub by_station: Vec<StationShares>,
    pub by_year: Vec<YearShares>,
    pub by_month: Vec<MonthShares>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationShares {
    pub station: String,
    pub shares: LevelShares,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearShares {
    pub year: i32,
    pub shares: LevelShares,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthShares {
    pub month: MonthBucket,
    pub shares: LevelShares,
}

/// Inputs for the polar wind rose.
#[derive(Debug, Clone, Serialize)]
pub struct WindSection {
    pub sectors: Vec<WindSector>,
}

/// Inputs for the temperature vs PM2.5 scatter.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterSection {
    pub x: String,
    pub y: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows_in_range: usize,
    pub total_rows: usize,
    pub stations: Vec<String>,
    pub span_start: NaiveDateTime,
    pub span_end: NaiveDateTime,
    pub range: DateRange,
}

/// The full numeric contract for the chart renderers. Sections are absent
/// when their underlying aggregate had nothing to work with; consumers skip
/// the corresponding chart.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub dataset: DatasetSummary,
    pub temperature: Option<TemperatureSection>,
    pub pollutants: Option<PollutantSection>,
    pub levels: Option<LevelSection>,
    pub wind: Option<WindSection>,
    pub scatter: Option<ScatterSection>,
}

impl AnalysisReport {
    /// Console-facing digest of the report.
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!(
            "Observations: {} of {} in range {}\n",
            self.dataset.rows_in_range, self.dataset.total_rows, self.dataset.range
        ));
        summary.push_str(&format!(
            "Stations: {}\n",
            self.dataset.stations.join(", ")
        ));

        match &self.temperature {
            Some(section) => {
                summary.push_str(&format!(
                    "Warmest month: {} ({:.1}°C), coolest month: {} ({:.1}°C)\n",
                    section.warmest_month.month,
                    section.warmest_month.value,
                    section.coolest_month.month,
                    section.coolest_month.value
                ));
            }
            None => summary.push_str("Temperature: no valid measurements in range\n"),
        }

        match &self.levels {
            Some(section) => {
                summary.push_str(&format!(
                    "Pollution levels: {:.1}% low, {:.1}% moderate, {:.1}% high ({} classified rows)\n",
                    100.0 * section.overall.low,
                    100.0 * section.overall.moderate,
                    100.0 * section.overall.high,
                    section.overall.observations
                ));
            }
            None => summary.push_str("Pollution levels: no classified rows in range\n"),
        }

        match &self.wind {
            Some(section) => {
                let binned = section.sectors.iter().map(|s| s.count).sum::<usize>();
                summary.push_str(&format!("Wind rose: {} binned observations\n", binned));
            }
            None => summary.push_str("Wind rose: no mapped wind directions in range\n"),
        }

        summary
    }
}

/// Recomputes every aggregate from scratch over the date-filtered table.
/// A range violation on the filter itself yields a report with every section
/// absent; a section whose own inputs are empty is skipped with a warning
/// while the others proceed.
pub struct AirQualityAnalyzer;

impl AirQualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, dataset: &Dataset, range: &DateRange) -> Result<AnalysisReport> {
        let (span_start, span_end) = dataset.span();

        let filtered = match RangeFilter::new(*range).apply(dataset) {
            Ok(rows) => rows,
            Err(err @ AnalysisError::RangeViolation(_)) => {
                warn!("{err}; all chart sections skipped");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        let report = AnalysisReport {
            dataset: DatasetSummary {
                rows_in_range: filtered.len(),
                total_rows: dataset.len(),
                stations: dataset.stations(),
                span_start,
                span_end,
                range: *range,
            },
            temperature: self.temperature_section(&filtered),
            pollutants: self.pollutant_section(&filtered),
            levels: self.level_section(&filtered),
            wind: self.wind_section(&filtered),
            scatter: self.scatter_section(&filtered),
        };

        Ok(report)
    }

    fn temperature_section(&self, rows: &[&Observation]) -> Option<TemperatureSection> {
        let overall = monthly_mean(rows, Metric::Temperature);
        let (Some(warmest), Some(coolest)) = (earliest_max(&overall), earliest_min(&overall))
        else {
            warn!("temperature section skipped: no TEMP values in range");
            return None;
        };

        let by_station = monthly_mean_by_station(rows, Metric::Temperature)
            .into_iter()
            .map(|(station, series)| (station, into_monthly_values(series)))
            .collect();

        Some(TemperatureSection {
            monthly_mean: into_monthly_values(overall),
            monthly_mean_by_station: by_station,
            warmest_month: Extreme {
                month: warmest.0,
                value: warmest.1,
            },
            coolest_month: Extreme {
                month: coolest.0,
                value: coolest.1,
            },
        })
    }

    fn pollutant_section(&self, rows: &[&Observation]) -> Option<PollutantSection> {
        let mut yearly = BTreeMap::new();
        let mut stations = BTreeMap::new();

        for metric in Metric::POLLUTANTS {
            let yearly_series = yearly_values(rows, metric);
            if !yearly_series.is_empty() {
                yearly.insert(metric.column_name().to_string(), yearly_series);
            }

            let station_series: Vec<StationValue> = station_mean(rows, metric)
                .into_iter()
                .map(|(station, value)| StationValue { station, value })
                .collect();
            if !station_series.is_empty() {
                stations.insert(metric.column_name().to_string(), station_series);
            }
        }

        if yearly.is_empty() && stations.is_empty() {
            warn!("pollutant section skipped: no pollutant values in range");
            return None;
        }

        Some(PollutantSection {
            yearly_mean: yearly,
            station_mean: stations,
            pm25_monthly_matrix: monthly_matrix(rows, Metric::Pm25),
        })
    }

    fn level_section(&self, rows: &[&Observation]) -> Option<LevelSection> {
        let Some(overall) = level_shares(rows) else {
            warn!("pollution-level section skipped: no classified rows in range");
            return None;
        };

        Some(LevelSection {
            overall,
            by_station: level_shares_by_station(rows)
                .into_iter()
                .map(|(station, shares)| StationShares { station, shares })
                .collect(),
            by_year: level_shares_by_year(rows)
                .into_iter()
                .map(|(year, shares)| YearShares { year, shares })
                .collect(),
            by_month: level_shares_by_month(rows)
                .into_iter()
                .map(|(month, shares)| MonthShares { month, shares })
                .collect(),
        })
    }

    fn wind_section(&self, rows: &[&Observation]) -> Option<WindSection> {
        let sectors = wind_rose(rows);
        if sectors.is_empty() {
            warn!("wind section skipped: no mapped wind directions in range");
            return None;
        }
        Some(WindSection { sectors })
    }

    fn scatter_section(&self, rows: &[&Observation]) -> Option<ScatterSection> {
        let points = scatter_pairs(rows, Metric::Temperature, Metric::Pm25);
        if points.is_empty() {
            warn!("scatter section skipped: no paired TEMP/PM2.5 values in range");
            return None;
        }
        Some(ScatterSection {
            x: Metric::Temperature.column_name().to_string(),
            y: Metric::Pm25.column_name().to_string(),
            points,
        })
    }
}

impl Default for AirQualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn into_monthly_values(series: Vec<(MonthBucket, f64)>) -> Vec<MonthlyValue> {
    series
        .into_iter()
        .map(|(month, value)| MonthlyValue { month, value })
        .collect()
}

fn yearly_values(rows: &[&Observation], metric: Metric) -> Vec<YearlyValue> {
    crate::analyzers::aggregate::yearly_mean(rows, metric)
        .into_iter()
        .map(|(year, value)| YearlyValue { year, value })
        .collect()
}
