use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::pollution::{PollutantReadings, PollutionLevel};

/// One timestamped sensor reading at a station, plus the derived attributes
/// attached by the enrichment pass. Derived fields are computed once after
/// load and treated as read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub station: String,

    /// Air temperature, °C
    pub temp: Option<f64>,

    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub co: Option<f64>,
    pub o3: Option<f64>,

    /// Raw 16-point compass label as it appeared in the source
    pub wind_direction: Option<String>,

    /// Wind speed, m/s
    pub wind_speed: Option<f64>,

    /// Derived: severity label, absent when any pollutant reading is missing
    pub level: Option<PollutionLevel>,

    /// Derived: wind direction in degrees, absent for unmapped labels
    pub wind_degrees: Option<f64>,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, station: String) -> Self {
        Self {
            timestamp,
            station,
            temp: None,
            pm25: None,
            pm10: None,
            so2: None,
            no2: None,
            co: None,
            o3: None,
            wind_direction: None,
            wind_speed: None,
            level: None,
            wind_degrees: None,
        }
    }

    /// The six pollutant readings, only when all are present and finite.
    /// This is the precondition gate for the classifier.
    pub fn pollutant_readings(&self) -> Option<PollutantReadings> {
        let values = [
            self.pm25?, self.pm10?, self.so2?, self.no2?, self.co?, self.o3?,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(PollutantReadings::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        ))
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }
}
