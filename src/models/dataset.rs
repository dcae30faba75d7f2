use chrono::NaiveDateTime;

use crate::error::{AnalysisError, Result};
use crate::models::Observation;

/// The immutable-after-load observation table. Constructed once per session;
/// aggregations borrow from it and never mutate it.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    span: (NaiveDateTime, NaiveDateTime),
}

impl Dataset {
    /// Wrap a non-empty observation vector, sorted chronologically so that
    /// repeated runs see an identical table regardless of load order.
    pub fn new(mut observations: Vec<Observation>) -> Result<Self> {
        observations.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.station.cmp(&b.station))
        });

        let span = match (observations.first(), observations.last()) {
            (Some(first), Some(last)) => (first.timestamp, last.timestamp),
            _ => {
                return Err(AnalysisError::DataUnavailable(
                    "no observations loaded from source".to_string(),
                ))
            }
        };

        Ok(Self { observations, span })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest and latest timestamps in the table.
    pub fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.span
    }

    /// Distinct station names in lexical order.
    pub fn stations(&self) -> Vec<String> {
        let mut stations: Vec<String> = self
            .observations
            .iter()
            .map(|o| o.station.clone())
            .collect();
        stations.sort();
        stations.dedup();
        stations
    }
}
