use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{LABEL_HIGH, LABEL_LOW, LABEL_MODERATE, LOW_BANDS, MODERATE_BANDS};

/// One observation's six pollutant readings. Callers must only construct this
/// from present, finite values; classification of missing data is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantReadings {
    pub pm25: f64,
    pub pm10: f64,
    pub so2: f64,
    pub no2: f64,
    pub co: f64,
    pub o3: f64,
}

impl PollutantReadings {
    pub fn new(pm25: f64, pm10: f64, so2: f64, no2: f64, co: f64, o3: f64) -> Self {
        Self {
            pm25,
            pm10,
            so2,
            no2,
            co,
            o3,
        }
    }

    /// Readings in band order: PM2.5, PM10, SO2, NO2, CO, O3
    fn as_array(&self) -> [f64; 6] {
        [self.pm25, self.pm10, self.so2, self.no2, self.co, self.o3]
    }

    fn within(&self, bands: &[(f64, f64); 6]) -> bool {
        self.as_array()
            .iter()
            .zip(bands.iter())
            .all(|(value, (min, max))| (*min..=*max).contains(value))
    }
}

/// Pollution-severity label derived from the six pollutant readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollutionLevel {
    #[serde(rename = "Low Pollution")]
    Low,
    #[serde(rename = "Moderate Pollution")]
    Moderate,
    #[serde(rename = "High Pollution")]
    High,
}

impl PollutionLevel {
    pub const ALL: [PollutionLevel; 3] = [
        PollutionLevel::Low,
        PollutionLevel::Moderate,
        PollutionLevel::High,
    ];

    /// Ordered rule evaluation, first match wins. Low and Moderate require ALL
    /// six readings inside their band simultaneously; everything else falls
    /// through to High, including readings that straddle different bands.
    pub fn classify(readings: &PollutantReadings) -> Self {
        if readings.within(&LOW_BANDS) {
            PollutionLevel::Low
        } else if readings.within(&MODERATE_BANDS) {
            PollutionLevel::Moderate
        } else {
            PollutionLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PollutionLevel::Low => LABEL_LOW,
            PollutionLevel::Moderate => LABEL_MODERATE,
            PollutionLevel::High => LABEL_HIGH,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            LABEL_LOW => Some(PollutionLevel::Low),
            LABEL_MODERATE => Some(PollutionLevel::Moderate),
            LABEL_HIGH => Some(PollutionLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for PollutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
