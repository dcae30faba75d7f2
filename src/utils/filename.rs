use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default report filename with format: airq-report-{YYMMDD}.json
pub fn generate_default_report_filename() -> PathBuf {
    PathBuf::from("output").join(format!("airq-report-{}.json", date_stamp()))
}

/// Generate default Parquet filename with format: airq-observations-{YYMMDD}.parquet
pub fn generate_default_parquet_filename() -> PathBuf {
    PathBuf::from("output").join(format!("airq-observations-{}.parquet", date_stamp()))
}

fn date_stamp() -> String {
    let now = Local::now();
    format!(
        "{:02}{:02}{:02}",
        now.year() % 100,
        now.month(),
        now.day()
    )
}
