use crate::math::StatsHelper;
use crate::prelude::AngularStatistic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Console digest of an angular sweep.
///
/// Ranges and means are taken over the finite entries only, so an empty
/// capture shows up in the plot gap without poisoning the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularSummary {
    pub angles: usize,
    pub step_deg: f64,
    pub mean_range: Option<(f64, f64)>,
    pub overall_mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_std: Option<f64>,
}

impl AngularSummary {
    pub fn from_statistics(statistics: &[AngularStatistic], step_deg: f64) -> Self {
        let means: Vec<f64> = statistics.iter().map(|s| s.mean).collect();
        let stds: Vec<f64> = statistics.iter().filter_map(|s| s.std_dev).collect();
        let mean_std = if stds.is_empty() {
            None
        } else {
            Some(StatsHelper::finite_mean(&stds))
        };

        Self {
            angles: statistics.len(),
            step_deg,
            mean_range: StatsHelper::finite_range(&means),
            overall_mean: StatsHelper::finite_mean(&means),
            mean_std,
        }
    }
}

impl fmt::Display for AngularSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        writeln!(f, "Number of angles: {}", self.angles)?;
        writeln!(f, "Angular step: {:?} degrees", self.step_deg)?;
        match self.mean_range {
            Some((lo, hi)) => writeln!(f, "Mean value range: {lo:.2} - {hi:.2}")?,
            None => writeln!(f, "Mean value range: n/a")?,
        }
        write!(f, "Overall mean: {:.2}", self.overall_mean)?;
        if let Some(mean_std) = self.mean_std {
            write!(f, "\nMean of std deviations: {mean_std:.2}")?;
        }
        Ok(())
    }
}
