pub mod dataset;
pub mod metric;
pub mod observation;
pub mod pollution;
pub mod wind;

pub use dataset::Dataset;
pub use metric::Metric;
pub use observation::Observation;
pub use pollution::{PollutantReadings, PollutionLevel};
pub use wind::CompassPoint;
