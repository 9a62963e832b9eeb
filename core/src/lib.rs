//! Ingest and angular aggregation core for PDoA rotation measurements.
//!
//! Each capture file holds the samples recorded at one rotation step. The
//! modules here turn a directory of such files into angle-sorted statistics
//! (and per-file grid panels) that the plotting driver renders.

pub mod ingest;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{AnalysisError, AnalysisResult, AngularStatistic, Reduction};
