use chrono::{NaiveDate, NaiveDateTime};
use csv::{StringRecord, Trim};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::Observation;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, REQUIRED_COLUMNS};

/// Reads the air-quality CSV into observations, validating the schema first.
/// A missing required column is fatal; missing or unparseable numeric cells
/// are treated as absent readings in an otherwise usable row.
pub struct CsvObservationReader {
    use_mmap: bool,
}

impl CsvObservationReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn read_observations(&self, path: &Path) -> Result<Vec<Observation>> {
        if self.use_mmap {
            self.read_observations_mmap(path)
        } else {
            let file = File::open(path)?;
            let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            self.read_from(reader)
        }
    }

    /// Memory-mapped read path for large files.
    fn read_observations_mmap(&self, path: &Path) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        self.read_from(&mmap[..])
    }

    fn read_from<R: Read>(&self, reader: R) -> Result<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(AnalysisError::DataUnavailable(
                "source is empty".to_string(),
            ));
        }
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut observations = Vec::new();
        for record_result in csv_reader.records() {
            let record = record_result?;
            if let Some(observation) = self.parse_record(&record, &columns)? {
                observations.push(observation);
            }
        }

        if observations.is_empty() {
            return Err(AnalysisError::DataUnavailable(
                "source contains no data rows".to_string(),
            ));
        }

        Ok(observations)
    }

    /// Parse one CSV record. Returns None for skippable rows (blank station).
    fn parse_record(
        &self,
        record: &StringRecord,
        columns: &ColumnIndex,
    ) -> Result<Option<Observation>> {
        let station = record.get(columns.station).unwrap_or("").trim();
        if station.is_empty() {
            return Ok(None);
        }

        let raw_timestamp = record.get(columns.tanggal).unwrap_or("").trim();
        let timestamp = parse_timestamp(raw_timestamp)?;

        let mut observation = Observation::new(timestamp, station.to_string());
        observation.temp = parse_optional_float(record.get(columns.temp));
        observation.pm25 = parse_optional_float(record.get(columns.pm25));
        observation.pm10 = parse_optional_float(record.get(columns.pm10));
        observation.so2 = parse_optional_float(record.get(columns.so2));
        observation.no2 = parse_optional_float(record.get(columns.no2));
        observation.co = parse_optional_float(record.get(columns.co));
        observation.o3 = parse_optional_float(record.get(columns.o3));
        observation.wind_speed = parse_optional_float(record.get(columns.wspm));

        let wind_direction = record.get(columns.wd).unwrap_or("").trim();
        if !wind_direction.is_empty() {
            observation.wind_direction = Some(wind_direction.to_string());
        }

        Ok(Some(observation))
    }
}

impl Default for CsvObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    tanggal: usize,
    station: usize,
    temp: usize,
    pm25: usize,
    pm10: usize,
    so2: usize,
    no2: usize,
    co: usize,
    o3: usize,
    wd: usize,
    wspm: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::SchemaViolation {
                    column: name.to_string(),
                })
        };

        // Looked up in REQUIRED_COLUMNS order so the first missing column names the error
        let [tanggal, station, temp, pm25, pm10, so2, no2, co, o3, wd, wspm] = REQUIRED_COLUMNS;
        Ok(Self {
            tanggal: position(tanggal)?,
            station: position(station)?,
            temp: position(temp)?,
            pm25: position(pm25)?,
            pm10: position(pm10)?,
            so2: position(so2)?,
            no2: position(no2)?,
            co: position(co)?,
            o3: position(o3)?,
            wd: position(wd)?,
            wspm: position(wspm)?,
        })
    }
}

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse an ISO-style date-time; a bare date resolves to midnight.
pub(crate) fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(timestamp);
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Empty, non-numeric, and non-finite cells all count as missing readings.
fn parse_optional_float(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() || cell == "NA" {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
