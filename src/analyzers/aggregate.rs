use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{CompassPoint, Metric, Observation};
use crate::processors::LevelCounts;

/// Calendar-month grouping key. Ordering is chronological, so BTreeMap-keyed
/// groupings come out in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Arithmetic mean, absent for an empty slice; empty groups are omitted from
/// aggregates rather than reported as zero.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of a field per calendar month, chronological, missing values ignored.
pub fn monthly_mean(observations: &[&Observation], metric: Metric) -> Vec<(MonthBucket, f64)> {
    let mut groups: BTreeMap<MonthBucket, Vec<f64>> = BTreeMap::new();
    for observation in observations {
        if let Some(value) = metric.value(observation) {
            groups
                .entry(MonthBucket::from_timestamp(&observation.timestamp))
                .or_default()
                .push(value);
        }
    }

    groups
        .into_iter()
        .filter_map(|(bucket, values)| mean(&values).map(|m| (bucket, m)))
        .collect()
}

/// Mean of a field per calendar year, chronological.
pub fn yearly_mean(observations: &[&Observation], metric: Metric) -> Vec<(i32, f64)> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for observation in observations {
        if let Some(value) = metric.value(observation) {
            groups.entry(observation.year()).or_default().push(value);
        }
    }

    groups
        .into_iter()
        .filter_map(|(year, values)| mean(&values).map(|m| (year, m)))
        .collect()
}

/// Mean of a field per station, lexical station order.
pub fn station_mean(observations: &[&Observation], metric: Metric) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for observation in observations {
        if let Some(value) = metric.value(observation) {
            groups
                .entry(observation.station.as_str())
                .or_default()
                .push(value);
        }
    }

    groups
        .into_iter()
        .filter_map(|(station, values)| mean(&values).map(|m| (station.to_string(), m)))
        .collect()
}

/// Monthly means of a field for each station separately.
pub fn monthly_mean_by_station(
    observations: &[&Observation],
    metric: Metric,
) -> BTreeMap<String, Vec<(MonthBucket, f64)>> {
    let mut by_station: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for &observation in observations {
        by_station
            .entry(observation.station.as_str())
            .or_default()
            .push(observation);
    }

    by_station
        .into_iter()
        .filter_map(|(station, rows)| {
            let series = monthly_mean(&rows, metric);
            if series.is_empty() {
                None
            } else {
                Some((station.to_string(), series))
            }
        })
        .collect()
}

/// Per-station monthly means arranged as one table: one row per station, one
/// column per month across the filtered span. Cells with no valid
/// observations stay empty.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyMatrix {
    pub metric: String,
    pub months: Vec<MonthBucket>,
    pub stations: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

pub fn monthly_matrix(observations: &[&Observation], metric: Metric) -> Option<MonthlyMatrix> {
    let by_station = monthly_mean_by_station(observations, metric);
    if by_station.is_empty() {
        return None;
    }

    let mut months: Vec<MonthBucket> = by_station
        .values()
        .flat_map(|series| series.iter().map(|(bucket, _)| *bucket))
        .collect();
    months.sort();
    months.dedup();

    let stations: Vec<String> = by_station.keys().cloned().collect();
    let values = stations
        .iter()
        .map(|station| {
            let series: BTreeMap<MonthBucket, f64> =
                by_station[station].iter().copied().collect();
            months.iter().map(|month| series.get(month).copied()).collect()
        })
        .collect();

    Some(MonthlyMatrix {
        metric: metric.column_name().to_string(),
        months,
        stations,
        values,
    })
}

/// Distribution of severity labels within one group; the shares always sum
/// to 1.0 because the denominator is the group's classified-row count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelShares {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
    pub observations: usize,
}

impl LevelShares {
    pub fn from_counts(counts: &LevelCounts) -> Option<Self> {
        let total = counts.total();
        if total == 0 {
            return None;
        }
        let total_f = total as f64;
        Some(Self {
            low: counts.low as f64 / total_f,
            moderate: counts.moderate as f64 / total_f,
            high: counts.high as f64 / total_f,
            observations: total,
        })
    }

    pub fn sum(&self) -> f64 {
        self.low + self.moderate + self.high
    }
}

fn count_levels(rows: &[&Observation]) -> LevelCounts {
    let mut counts = LevelCounts::default();
    for observation in rows {
        if let Some(level) = observation.level {
            counts.record(level);
        }
    }
    counts
}

/// Severity distribution over the whole filtered table.
pub fn level_shares(observations: &[&Observation]) -> Option<LevelShares> {
    LevelShares::from_counts(&count_levels(observations))
}

/// Severity distribution per station, lexical order, empty groups absent.
pub fn level_shares_by_station(observations: &[&Observation]) -> Vec<(String, LevelShares)> {
    let mut groups: BTreeMap<&str, LevelCounts> = BTreeMap::new();
    for observation in observations {
        if let Some(level) = observation.level {
            groups
                .entry(observation.station.as_str())
                .or_default()
                .record(level);
        }
    }

    groups
        .into_iter()
        .filter_map(|(station, counts)| {
            LevelShares::from_counts(&counts).map(|shares| (station.to_string(), shares))
        })
        .collect()
}

/// Severity distribution per calendar year, chronological.
pub fn level_shares_by_year(observations: &[&Observation]) -> Vec<(i32, LevelShares)> {
    let mut groups: BTreeMap<i32, LevelCounts> = BTreeMap::new();
    for observation in observations {
        if let Some(level) = observation.level {
            groups.entry(observation.year()).or_default().record(level);
        }
    }

    groups
        .into_iter()
        .filter_map(|(year, counts)| LevelShares::from_counts(&counts).map(|s| (year, s)))
        .collect()
}

/// Severity distribution per calendar month, chronological.
pub fn level_shares_by_month(observations: &[&Observation]) -> Vec<(MonthBucket, LevelShares)> {
    let mut groups: BTreeMap<MonthBucket, LevelCounts> = BTreeMap::new();
    for observation in observations {
        if let Some(level) = observation.level {
            groups
                .entry(MonthBucket::from_timestamp(&observation.timestamp))
                .or_default()
                .record(level);
        }
    }

    groups
        .into_iter()
        .filter_map(|(bucket, counts)| LevelShares::from_counts(&counts).map(|s| (bucket, s)))
        .collect()
}

/// One of the 16 wind-rose sectors.
#[derive(Debug, Clone, Serialize)]
pub struct WindSector {
    pub direction: CompassPoint,
    pub degrees: f64,
    pub count: usize,
    pub share: f64,
    pub mean_speed: Option<f64>,
}

/// Bin observations into the 16 compass sectors, compass order. Rows whose
/// label is missing or unmapped are excluded entirely. Returns an empty
/// vector when nothing binned, so callers skip the rose instead of dividing
/// by zero.
pub fn wind_rose(observations: &[&Observation]) -> Vec<WindSector> {
    let mut counts: BTreeMap<usize, (usize, Vec<f64>)> = BTreeMap::new();

    let mut total = 0usize;
    for observation in observations {
        let point = observation
            .wind_direction
            .as_deref()
            .and_then(CompassPoint::from_label);
        let Some(point) = point else { continue };

        let index = CompassPoint::ALL
            .iter()
            .position(|p| *p == point)
            .unwrap_or(0);
        let entry = counts.entry(index).or_insert_with(|| (0, Vec::new()));
        entry.0 += 1;
        total += 1;
        if let Some(speed) = observation.wind_speed {
            entry.1.push(speed);
        }
    }

    if total == 0 {
        return Vec::new();
    }

    CompassPoint::ALL
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let (count, speeds) = counts.remove(&index).unwrap_or((0, Vec::new()));
            WindSector {
                direction: *point,
                degrees: point.degrees(),
                count,
                share: count as f64 / total as f64,
                mean_speed: mean(&speeds),
            }
        })
        .collect()
}

/// Paired samples of two fields, keeping only rows where both are present.
pub fn scatter_pairs(observations: &[&Observation], x: Metric, y: Metric) -> Vec<(f64, f64)> {
    observations
        .iter()
        .filter_map(|observation| {
            let x_value = x.value(observation)?;
            let y_value = y.value(observation)?;
            Some((x_value, y_value))
        })
        .collect()
}

/// Global maximum over an aggregated series; ties break to the earliest
/// bucket, which strict comparison gives for chronologically ordered input.
pub fn earliest_max<K: Copy>(series: &[(K, f64)]) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for &(key, value) in series {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((key, value)),
        }
    }
    best
}

/// Global minimum with the same earliest-bucket tie-break.
pub fn earliest_min<K: Copy>(series: &[(K, f64)]) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for &(key, value) in series {
        match best {
            Some((_, best_value)) if value >= best_value => {}
            _ => best = Some((key, value)),
        }
    }
    best
}
