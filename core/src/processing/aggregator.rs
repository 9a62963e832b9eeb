use crate::ingest::{discover, SampleFile, SampleTable};
use crate::math::{AngleMapping, StatsHelper};
use crate::prelude::{AnalysisError, AnalysisResult, AngularStatistic, Reduction};
use crate::processing::correction::CorrectionTable;
use crate::telemetry::log::LogManager;
use std::collections::BTreeMap;
use std::path::Path;

/// Reduces a set of rotation captures to angle-sorted statistics.
///
/// Every capture is loaded, sign-corrected through the calibration table
/// and reduced on its own; nothing is shared between files.
pub struct AngularAggregator {
    mapping: AngleMapping,
    corrections: CorrectionTable,
    reduction: Reduction,
    logger: LogManager,
}

impl AngularAggregator {
    pub fn new(mapping: AngleMapping, corrections: CorrectionTable, reduction: Reduction) -> Self {
        Self {
            mapping,
            corrections,
            reduction,
            logger: LogManager::new(),
        }
    }

    pub fn mapping(&self) -> AngleMapping {
        self.mapping
    }

    pub fn aggregate_dir<P: AsRef<Path>>(&self, dir: P) -> AnalysisResult<Vec<AngularStatistic>> {
        let files = discover(dir)?;
        self.aggregate(&files)
    }

    pub fn aggregate(&self, files: &[SampleFile]) -> AnalysisResult<Vec<AngularStatistic>> {
        let mut seen: BTreeMap<u32, &SampleFile> = BTreeMap::new();
        for file in files {
            if let Some(previous) = seen.insert(file.index, file) {
                return Err(AnalysisError::MalformedInput(format!(
                    "{} and {} both map to index {}",
                    previous.path.display(),
                    file.path.display(),
                    file.index
                )));
            }
        }

        let mut statistics = files
            .iter()
            .map(|file| self.reduce_file(file))
            .collect::<AnalysisResult<Vec<_>>>()?;
        statistics.sort_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));

        self.logger.record(&format!(
            "aggregated {} captures at {:.2} deg step",
            statistics.len(),
            self.mapping.step_deg()
        ));
        Ok(statistics)
    }

    pub fn reduce_file(&self, file: &SampleFile) -> AnalysisResult<AngularStatistic> {
        let table = SampleTable::load(&file.path)?;
        let values = table.values()?;
        let statistic = self.reduce_samples(file.index, values);
        self.logger.record(&format!(
            "{} -> {:.1} deg mean {:.4} ({} samples)",
            file.display_name(),
            statistic.angle_deg,
            statistic.mean,
            statistic.samples
        ));
        Ok(statistic)
    }

    /// Corrects and reduces raw samples already attributed to `index`.
    pub fn reduce_samples(&self, index: u32, mut values: Vec<f64>) -> AngularStatistic {
        values.retain(|v| !v.is_nan());
        self.corrections.rule_for(index).apply(&mut values);

        let std_dev = match self.reduction {
            Reduction::Mean => None,
            Reduction::MeanAndStd => Some(StatsHelper::sample_std(&values)),
        };

        AngularStatistic {
            index,
            angle_deg: self.mapping.angle_deg(index),
            samples: values.len(),
            mean: StatsHelper::mean(&values),
            std_dev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::correction::CorrectionRule;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn capture_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn four_quadrant_sweep_produces_sorted_means() {
        let dir = capture_dir(&[
            ("2.csv", "Value\n3\n3\n"),
            ("0.csv", "Value\n1\n1\n"),
            ("3.csv", "Value\n4\n4\n"),
            ("1.csv", "Value\n2\n2\n"),
        ]);
        let aggregator =
            AngularAggregator::new(AngleMapping::new(4), CorrectionTable::new(), Reduction::Mean);

        let stats = aggregator.aggregate_dir(dir.path()).unwrap();
        let pairs: Vec<(f64, f64)> = stats.iter().map(|s| (s.angle_deg, s.mean)).collect();
        assert_eq!(
            pairs,
            vec![(0.0, 1.0), (90.0, 2.0), (180.0, 3.0), (270.0, 4.0)]
        );
        assert!(stats.iter().all(|s| s.std_dev.is_none()));
    }

    #[test]
    fn every_position_appears_once_in_ascending_order() {
        let names: Vec<String> = (0..16).rev().map(|i| format!("{i}.csv")).collect();
        let files: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "Value\n0.5\n")).collect();
        let dir = capture_dir(&files);
        let aggregator = AngularAggregator::new(
            AngleMapping::default(),
            CorrectionTable::new(),
            Reduction::Mean,
        );

        let stats = aggregator.aggregate_dir(dir.path()).unwrap();
        let angles: Vec<f64> = stats.iter().map(|s| s.angle_deg).collect();
        let expected: Vec<f64> = (0..16).map(|i| (i as f64 * 22.5) % 360.0).collect();
        assert_eq!(angles, expected);
    }

    #[test]
    fn corrections_follow_the_table() {
        let dir = capture_dir(&[
            ("0.csv", "Value\n-2\n3\n-1\n"),
            ("1.csv", "Value\n2\n-3\n1\n"),
            ("2.csv", "Value\n-2\n3\n-1\n"),
        ]);
        let table = CorrectionTable::new()
            .with_rule(0, CorrectionRule::NegateNegatives)
            .with_rule(1, CorrectionRule::NegatePositives);
        let aggregator = AngularAggregator::new(AngleMapping::new(4), table, Reduction::Mean);

        let stats = aggregator.aggregate_dir(dir.path()).unwrap();
        assert_eq!(stats[0].mean, 2.0);
        assert_eq!(stats[1].mean, -2.0);
        assert_eq!(stats[2].mean, 0.0);
    }

    #[test]
    fn single_sample_yields_nan_std_without_failing() {
        let aggregator = AngularAggregator::new(
            AngleMapping::default(),
            CorrectionTable::new(),
            Reduction::MeanAndStd,
        );
        let stat = aggregator.reduce_samples(5, vec![1.25]);
        assert_eq!(stat.mean, 1.25);
        assert!(stat.std_dev.unwrap().is_nan());
        assert_eq!(stat.angle_deg, 112.5);
    }

    #[test]
    fn empty_capture_is_kept_with_nan_mean() {
        let dir = capture_dir(&[("0.csv", "Value\n1\n"), ("1.csv", "Timestamp,Value\n")]);
        let aggregator = AngularAggregator::new(
            AngleMapping::new(2),
            CorrectionTable::new(),
            Reduction::MeanAndStd,
        );

        let stats = aggregator.aggregate_dir(dir.path()).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[1].samples, 0);
        assert!(stats[1].mean.is_nan());
    }

    #[test]
    fn missing_cells_are_skipped_before_reduction() {
        let aggregator = AngularAggregator::new(
            AngleMapping::default(),
            CorrectionTable::new(),
            Reduction::MeanAndStd,
        );
        let stat = aggregator.reduce_samples(0, vec![1.0, f64::NAN, 3.0]);
        assert_eq!(stat.samples, 2);
        assert_eq!(stat.mean, 2.0);
        assert!((stat.std_dev.unwrap() - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn missing_value_column_aborts_the_run() {
        let dir = capture_dir(&[("0.csv", "Value\n1\n"), ("1.csv", "Phase\n0.2\n")]);
        let aggregator = AngularAggregator::new(
            AngleMapping::default(),
            CorrectionTable::new(),
            Reduction::Mean,
        );
        let err = aggregator.aggregate_dir(dir.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { .. }));
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let dir = capture_dir(&[("1.csv", "Value\n1\n"), ("01.csv", "Value\n2\n")]);
        let aggregator = AngularAggregator::new(
            AngleMapping::default(),
            CorrectionTable::new(),
            Reduction::Mean,
        );
        let err = aggregator.aggregate_dir(dir.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput(_)));
    }
}
