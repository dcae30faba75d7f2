use rayon::prelude::*;

use crate::error::{AnalysisError, Result};
use crate::models::{CompassPoint, Observation, PollutionLevel};

/// Single derivation pass over freshly loaded observations: attaches the
/// pollution-severity level and the wind-direction degrees. Runs before the
/// table becomes immutable; the per-row derivation is pure, so parallel
/// execution cannot change the result.
pub struct Enricher {
    max_workers: usize,
}

impl Enricher {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn enrich(&self, mut observations: Vec<Observation>) -> Result<Vec<Observation>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        pool.install(|| {
            observations
                .par_iter_mut()
                .for_each(Self::attach_derived_fields)
        });

        Ok(observations)
    }

    fn attach_derived_fields(observation: &mut Observation) {
        observation.level = observation
            .pollutant_readings()
            .map(|readings| PollutionLevel::classify(&readings));

        observation.wind_degrees = observation
            .wind_direction
            .as_deref()
            .and_then(CompassPoint::from_label)
            .map(|point| point.degrees());
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation(pm25: Option<f64>, wind_direction: Option<&str>) -> Observation {
        let timestamp = NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut obs = Observation::new(timestamp, "Gucheng".to_string());
        obs.pm25 = pm25;
        obs.pm10 = Some(40.0);
        obs.so2 = Some(5.0);
        obs.no2 = Some(10.0);
        obs.co = Some(100.0);
        obs.o3 = Some(20.0);
        obs.wind_direction = wind_direction.map(str::to_string);
        obs
    }

    #[test]
    fn test_enrich_attaches_level_and_degrees() {
        let enricher = Enricher::new(2);
        let enriched = enricher
            .enrich(vec![observation(Some(20.0), Some("E"))])
            .unwrap();

        assert_eq!(enriched[0].level, Some(PollutionLevel::Low));
        assert_eq!(enriched[0].wind_degrees, Some(90.0));
    }

    #[test]
    fn test_missing_pollutant_leaves_level_unset() {
        let enricher = Enricher::new(1);
        let enriched = enricher.enrich(vec![observation(None, Some("N"))]).unwrap();

        assert_eq!(enriched[0].level, None);
        assert_eq!(enriched[0].wind_degrees, Some(0.0));
    }

    #[test]
    fn test_unmapped_wind_label_is_excluded_not_zeroed() {
        let enricher = Enricher::new(1);
        let enriched = enricher
            .enrich(vec![observation(Some(20.0), Some("NORTH"))])
            .unwrap();

        assert_eq!(enriched[0].wind_degrees, None);
        assert_eq!(enriched[0].level, Some(PollutionLevel::Low));
    }

    #[test]
    fn test_enrichment_is_deterministic_across_worker_counts() {
        let rows: Vec<Observation> = (0..200)
            .map(|i| observation(Some(i as f64), Some(if i % 2 == 0 { "N" } else { "SSW" })))
            .collect();

        let serial = Enricher::new(1).enrich(rows.clone()).unwrap();
        let parallel = Enricher::new(4).enrich(rows).unwrap();

        assert_eq!(serial, parallel);
    }
}
