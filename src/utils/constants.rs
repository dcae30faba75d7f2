/// Required CSV columns, in the order they appear in the source dataset
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "tanggal", "station", "TEMP", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "wd", "WSPM",
];

/// Inclusive (min, max) bands per pollutant for the Low Pollution level,
/// in reading order: PM2.5, PM10, SO2, NO2, CO, O3
pub const LOW_BANDS: [(f64, f64); 6] = [
    (0.0, 35.0),
    (0.0, 50.0),
    (0.0, 10.0),
    (0.0, 30.0),
    (0.0, 500.0),
    (0.0, 50.0),
];

/// Inclusive (min, max) bands per pollutant for the Moderate Pollution level
pub const MODERATE_BANDS: [(f64, f64); 6] = [
    (36.0, 75.0),
    (51.0, 100.0),
    (11.0, 20.0),
    (31.0, 60.0),
    (501.0, 1000.0),
    (51.0, 70.0),
];

/// Severity labels
pub const LABEL_LOW: &str = "Low Pollution";
pub const LABEL_MODERATE: &str = "Moderate Pollution";
pub const LABEL_HIGH: &str = "High Pollution";

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// Tolerance when asserting that per-group proportions sum to one
pub const SHARE_EPSILON: f64 = 1e-9;
