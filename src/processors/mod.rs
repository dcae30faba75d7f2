pub mod enricher;
pub mod quality_checker;
pub mod range_filter;

pub use enricher::Enricher;
pub use quality_checker::{LevelCounts, QualityChecker, QualityReport, StationQuality};
pub use range_filter::{DateRange, RangeFilter};
