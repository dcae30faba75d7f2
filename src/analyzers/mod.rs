pub mod aggregate;
pub mod report;

pub use aggregate::{
    earliest_max, earliest_min, level_shares, level_shares_by_month, level_shares_by_station,
    level_shares_by_year, mean, monthly_matrix, monthly_mean, monthly_mean_by_station,
    scatter_pairs, station_mean, wind_rose, yearly_mean, LevelShares, MonthBucket, MonthlyMatrix,
    WindSector,
};
pub use report::{AirQualityAnalyzer, AnalysisReport};
