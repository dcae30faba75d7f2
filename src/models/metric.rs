use serde::{Deserialize, Serialize};

use crate::models::Observation;

/// The numeric observation fields that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Temperature,
    Pm25,
    Pm10,
    So2,
    No2,
    Co,
    O3,
    WindSpeed,
}

impl Metric {
    /// The six pollutants feeding the severity classifier, in band order.
    pub const POLLUTANTS: [Metric; 6] = [
        Metric::Pm25,
        Metric::Pm10,
        Metric::So2,
        Metric::No2,
        Metric::Co,
        Metric::O3,
    ];

    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "TEMP" => Some(Metric::Temperature),
            "PM2.5" => Some(Metric::Pm25),
            "PM10" => Some(Metric::Pm10),
            "SO2" => Some(Metric::So2),
            "NO2" => Some(Metric::No2),
            "CO" => Some(Metric::Co),
            "O3" => Some(Metric::O3),
            "WSPM" => Some(Metric::WindSpeed),
            _ => None,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Temperature => "TEMP",
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::So2 => "SO2",
            Metric::No2 => "NO2",
            Metric::Co => "CO",
            Metric::O3 => "O3",
            Metric::WindSpeed => "WSPM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::So2 => "Sulphur dioxide",
            Metric::No2 => "Nitrogen dioxide",
            Metric::Co => "Carbon monoxide",
            Metric::O3 => "Ozone",
            Metric::WindSpeed => "Wind speed",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Co => "mg/m³",
            Metric::WindSpeed => "m/s",
            _ => "µg/m³",
        }
    }

    /// The field value for one observation, absent when the reading is missing.
    pub fn value(&self, observation: &Observation) -> Option<f64> {
        match self {
            Metric::Temperature => observation.temp,
            Metric::Pm25 => observation.pm25,
            Metric::Pm10 => observation.pm10,
            Metric::So2 => observation.so2,
            Metric::No2 => observation.no2,
            Metric::Co => observation.co,
            Metric::O3 => observation.o3,
            Metric::WindSpeed => observation.wind_speed,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation_with_temp(temp: Option<f64>) -> Observation {
        let timestamp = NaiveDate::from_ymd_opt(2014, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut obs = Observation::new(timestamp, "Aotizhongxin".to_string());
        obs.temp = temp;
        obs
    }

    #[test]
    fn test_column_round_trip() {
        for metric in [
            Metric::Temperature,
            Metric::Pm25,
            Metric::Pm10,
            Metric::So2,
            Metric::No2,
            Metric::Co,
            Metric::O3,
            Metric::WindSpeed,
        ] {
            assert_eq!(Metric::from_column(metric.column_name()), Some(metric));
        }
        assert_eq!(Metric::from_column("RAIN"), None);
    }

    #[test]
    fn test_value_accessor_respects_missing() {
        let present = observation_with_temp(Some(21.5));
        assert_eq!(Metric::Temperature.value(&present), Some(21.5));

        let missing = observation_with_temp(None);
        assert_eq!(Metric::Temperature.value(&missing), None);
    }

    #[test]
    fn test_units() {
        assert_eq!(Metric::Temperature.units(), "°C");
        assert_eq!(Metric::Co.units(), "mg/m³");
        assert_eq!(Metric::Pm25.units(), "µg/m³");
        assert_eq!(Metric::WindSpeed.units(), "m/s");
    }
}
