use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AnalysisError, Result};
use crate::models::{Dataset, Observation};

/// Inclusive date selection; the end date spans through end-of-day so an
/// hourly table keeps its final day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_date_order"))]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn validate_date_order(range: &DateRange) -> std::result::Result<(), ValidationError> {
    if range.start > range.end {
        return Err(ValidationError::new("start date is after end date"));
    }
    Ok(())
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// The full span of the dataset.
    pub fn full_span(dataset: &Dataset) -> Self {
        let (start, end) = dataset.span();
        Self {
            start: start.date(),
            end: end.date(),
        }
    }

    /// Resolve a user selection: both bounds present means an explicit range,
    /// anything partial or empty falls back to the full available span.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        dataset: &Dataset,
    ) -> Result<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Ok(Self::full_span(dataset)),
        }
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn end_datetime(&self) -> NaiveDateTime {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        self.end.and_time(end_of_day)
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        *timestamp >= self.start_datetime() && *timestamp <= self.end_datetime()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Immutable date filtering over the loaded table. Selections outside the
/// available span, or selections that match nothing, are range violations:
/// the affected aggregate is skipped while the session continues.
pub struct RangeFilter {
    range: DateRange,
}

impl RangeFilter {
    pub fn new(range: DateRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Result<Vec<&'a Observation>> {
        let (span_start, span_end) = dataset.span();

        // Compared at date granularity: selecting the span's own last day must
        // not violate just because the final hourly reading is before midnight
        if self.range.start < span_start.date() || self.range.end > span_end.date() {
            return Err(AnalysisError::RangeViolation(format!(
                "selected range {} is outside the available span {} to {}",
                self.range,
                span_start.date(),
                span_end.date()
            )));
        }

        let filtered: Vec<&Observation> = dataset
            .observations()
            .iter()
            .filter(|o| self.range.contains(&o.timestamp))
            .collect();

        if filtered.is_empty() {
            return Err(AnalysisError::RangeViolation(format!(
                "no observations in selected range {}",
                self.range
            )));
        }

        Ok(filtered)
    }
}
