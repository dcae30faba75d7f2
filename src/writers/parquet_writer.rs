use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AnalysisError, Result};
use crate::models::{Observation, PollutionLevel};
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;

/// Persists the enriched observation table as Parquet for downstream chart
/// consumers, and reads it back for inspection.
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(AnalysisError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write observations to a Parquet file in one batch.
    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        self.write_observations_batched(observations, path, observations.len().max(1))
    }

    /// Write observations in batches for memory efficiency.
    pub fn write_observations_batched(
        &self,
        observations: &[Observation],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if observations.is_empty() {
            return Ok(());
        }

        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in observations.chunks(batch_size.max(1)) {
            let batch = self.observations_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Second, None),
                false,
            ),
            Field::new("station", DataType::Utf8, false),
            Field::new("temp", DataType::Float64, true),
            Field::new("pm25", DataType::Float64, true),
            Field::new("pm10", DataType::Float64, true),
            Field::new("so2", DataType::Float64, true),
            Field::new("no2", DataType::Float64, true),
            Field::new("co", DataType::Float64, true),
            Field::new("o3", DataType::Float64, true),
            Field::new("wd", DataType::Utf8, true),
            Field::new("wspm", DataType::Float64, true),
            Field::new("pollution_level", DataType::Utf8, true),
            Field::new("wind_degrees", DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn observations_to_batch(
        &self,
        observations: &[Observation],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let timestamps: Vec<i64> = observations
            .iter()
            .map(|o| o.timestamp.and_utc().timestamp())
            .collect();
        let stations: Vec<&str> = observations.iter().map(|o| o.station.as_str()).collect();
        let temps: Vec<Option<f64>> = observations.iter().map(|o| o.temp).collect();
        let pm25: Vec<Option<f64>> = observations.iter().map(|o| o.pm25).collect();
        let pm10: Vec<Option<f64>> = observations.iter().map(|o| o.pm10).collect();
        let so2: Vec<Option<f64>> = observations.iter().map(|o| o.so2).collect();
        let no2: Vec<Option<f64>> = observations.iter().map(|o| o.no2).collect();
        let co: Vec<Option<f64>> = observations.iter().map(|o| o.co).collect();
        let o3: Vec<Option<f64>> = observations.iter().map(|o| o.o3).collect();
        let wd: Vec<Option<&str>> = observations
            .iter()
            .map(|o| o.wind_direction.as_deref())
            .collect();
        let wspm: Vec<Option<f64>> = observations.iter().map(|o| o.wind_speed).collect();
        let levels: Vec<Option<&str>> = observations
            .iter()
            .map(|o| o.level.map(|l| l.label()))
            .collect();
        let degrees: Vec<Option<f64>> = observations.iter().map(|o| o.wind_degrees).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampSecondArray::from(timestamps)),
                Arc::new(StringArray::from(stations)),
                Arc::new(Float64Array::from(temps)),
                Arc::new(Float64Array::from(pm25)),
                Arc::new(Float64Array::from(pm10)),
                Arc::new(Float64Array::from(so2)),
                Arc::new(Float64Array::from(no2)),
                Arc::new(Float64Array::from(co)),
                Arc::new(Float64Array::from(o3)),
                Arc::new(StringArray::from(wd)),
                Arc::new(Float64Array::from(wspm)),
                Arc::new(StringArray::from(levels)),
                Arc::new(Float64Array::from(degrees)),
            ],
        )?;

        Ok(batch)
    }

    /// Read up to `limit` observations back from a Parquet file.
    pub fn read_sample_observations(&self, path: &Path, limit: usize) -> Result<Vec<Observation>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        if limit == 0 {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut observations = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let timestamps = downcast::<TimestampSecondArray>(&batch, 0, "timestamp")?;
            let stations = downcast::<StringArray>(&batch, 1, "station")?;
            let temps = downcast::<Float64Array>(&batch, 2, "temp")?;
            let pm25 = downcast::<Float64Array>(&batch, 3, "pm25")?;
            let pm10 = downcast::<Float64Array>(&batch, 4, "pm10")?;
            let so2 = downcast::<Float64Array>(&batch, 5, "so2")?;
            let no2 = downcast::<Float64Array>(&batch, 6, "no2")?;
            let co = downcast::<Float64Array>(&batch, 7, "co")?;
            let o3 = downcast::<Float64Array>(&batch, 8, "o3")?;
            let wd = downcast::<StringArray>(&batch, 9, "wd")?;
            let wspm = downcast::<Float64Array>(&batch, 10, "wspm")?;
            let levels = downcast::<StringArray>(&batch, 11, "pollution_level")?;
            let degrees = downcast::<Float64Array>(&batch, 12, "wind_degrees")?;

            for i in 0..batch.num_rows() {
                let timestamp = chrono::DateTime::from_timestamp(timestamps.value(i), 0)
                    .map(|dt| dt.naive_utc())
                    .ok_or_else(|| {
                        AnalysisError::InvalidFormat(
                            "invalid timestamp in Parquet file".to_string(),
                        )
                    })?;

                let mut observation =
                    Observation::new(timestamp, stations.value(i).to_string());
                observation.temp = optional_value(temps, i);
                observation.pm25 = optional_value(pm25, i);
                observation.pm10 = optional_value(pm10, i);
                observation.so2 = optional_value(so2, i);
                observation.no2 = optional_value(no2, i);
                observation.co = optional_value(co, i);
                observation.o3 = optional_value(o3, i);
                observation.wind_speed = optional_value(wspm, i);
                observation.wind_degrees = optional_value(degrees, i);
                if !wd.is_null(i) {
                    observation.wind_direction = Some(wd.value(i).to_string());
                }
                if !levels.is_null(i) {
                    observation.level = PollutionLevel::from_label(levels.value(i));
                }

                observations.push(observation);
                if observations.len() >= limit {
                    return Ok(observations);
                }
            }
        }

        Ok(observations)
    }

    /// File statistics for the `info` command.
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            row_group_sizes.push(metadata.row_group(i).num_rows());
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<'a, T: 'static>(
    batch: &'a RecordBatch,
    index: usize,
    name: &str,
) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| AnalysisError::InvalidFormat(format!("Invalid {} column type", name)))
}

fn optional_value(array: &Float64Array, index: usize) -> Option<f64> {
    if array.is_null(index) {
        None
    } else {
        Some(array.value(index))
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Rows: {}\nRow groups: {} ({:?})\nFile size: {} bytes",
            self.total_rows, self.row_groups, self.row_group_sizes, self.file_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn observation(hour: u32) -> Observation {
        let timestamp = NaiveDate::from_ymd_opt(2015, 8, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        let mut obs = Observation::new(timestamp, "Nongzhanguan".to_string());
        obs.temp = Some(28.5);
        obs.pm25 = Some(20.0);
        obs.pm10 = Some(40.0);
        obs.so2 = Some(5.0);
        obs.no2 = Some(10.0);
        obs.co = Some(100.0);
        obs.o3 = Some(20.0);
        obs.wind_direction = Some("ESE".to_string());
        obs.wind_speed = Some(2.1);
        obs.level = Some(PollutionLevel::Low);
        obs.wind_degrees = Some(112.5);
        obs
    }

    #[test]
    fn test_round_trip_preserves_enriched_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("observations.parquet");

        let mut sparse = observation(1);
        sparse.temp = None;
        sparse.wind_direction = None;
        sparse.wind_degrees = None;
        sparse.level = None;
        sparse.o3 = None;

        let original = vec![observation(0), sparse];
        let writer = ParquetWriter::new();
        writer.write_observations(&original, &path).unwrap();

        let info = writer.get_file_info(&path).unwrap();
        assert_eq!(info.total_rows, 2);

        let read_back = writer.read_sample_observations(&path, 10).unwrap();
        assert_eq!(read_back, original);
    }

    #[test]
    fn test_read_respects_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("observations.parquet");

        let rows: Vec<Observation> = (0..20).map(observation).collect();
        let writer = ParquetWriter::new();
        writer.write_observations_batched(&rows, &path, 7).unwrap();

        let read_back = writer.read_sample_observations(&path, 5).unwrap();
        assert_eq!(read_back.len(), 5);
    }

    #[test]
    fn test_unsupported_compression_is_config_error() {
        assert!(ParquetWriter::new().with_compression("brotli9").is_err());
        assert!(ParquetWriter::new().with_compression("zstd").is_ok());
    }
}
