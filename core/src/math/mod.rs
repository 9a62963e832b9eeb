pub mod angle;
pub mod stats;

pub use angle::AngleMapping;
pub use stats::StatsHelper;
