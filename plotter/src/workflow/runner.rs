use crate::render;
use crate::workflow::config::AnalysisConfig;
use anyhow::Context;
use log::info;
use pdoacore::ingest::discover;
use pdoacore::processing::{
    AngularAggregator, AngularSummary, CorrectionTable, GridLoader, GridPanel,
};
use pdoacore::{AngularStatistic, Reduction};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The two angle-indexed charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AngularChart {
    ErrorBars,
    Radiation,
}

impl AngularChart {
    fn reduction(self) -> Reduction {
        match self {
            AngularChart::ErrorBars => Reduction::MeanAndStd,
            AngularChart::Radiation => Reduction::Mean,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AngularReport {
    pub chart: AngularChart,
    pub statistics: Vec<AngularStatistic>,
    pub summary: AngularSummary,
}

impl AngularReport {
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(self).context("serializing angular report")?;
        fs::write(path, body).with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}

pub struct GridOutcome {
    pub panels: usize,
    pub failed: usize,
    pub output: Option<PathBuf>,
}

#[derive(Clone)]
pub struct Runner {
    config: AnalysisConfig,
}

impl Runner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn corrections(&self, chart: AngularChart) -> &CorrectionTable {
        match chart {
            AngularChart::ErrorBars => &self.config.error_bars.corrections,
            AngularChart::Radiation => &self.config.radiation.corrections,
        }
    }

    pub fn grid_panels(&self) -> anyhow::Result<Vec<GridPanel>> {
        let files = discover(&self.config.data_dir)
            .with_context(|| format!("discovering captures in {}", self.config.data_dir.display()))?;
        let loader = GridLoader::new();
        let panels = loader.load(&files);
        let (processed, errors) = loader.snapshot();
        info!("grid loaded {} captures, {} failed", processed, errors);
        Ok(panels)
    }

    /// Loads and renders the grid; nothing is written when there are no captures.
    pub fn run_grid(&self, output: &Path) -> anyhow::Result<GridOutcome> {
        let panels = self.grid_panels()?;
        let failed = panels.iter().filter(|p| p.is_failed()).count();
        if panels.is_empty() {
            return Ok(GridOutcome {
                panels: 0,
                failed,
                output: None,
            });
        }

        render::render_grid(output, &panels)
            .with_context(|| format!("rendering grid to {}", output.display()))?;
        Ok(GridOutcome {
            panels: panels.len(),
            failed,
            output: Some(output.to_path_buf()),
        })
    }

    pub fn angular_report(&self, chart: AngularChart) -> anyhow::Result<AngularReport> {
        let corrections = self.corrections(chart);
        let mapping = self.config.angle_mapping();
        if corrections.is_empty() {
            info!("{:?}: no sign corrections configured", chart);
        }

        let aggregator =
            AngularAggregator::new(mapping, corrections.clone(), chart.reduction());
        let statistics = aggregator
            .aggregate_dir(&self.config.data_dir)
            .with_context(|| format!("aggregating captures in {}", self.config.data_dir.display()))?;
        let summary = AngularSummary::from_statistics(&statistics, mapping.step_deg());

        Ok(AngularReport {
            chart,
            statistics,
            summary,
        })
    }

    pub fn run_angular(&self, chart: AngularChart, output: &Path) -> anyhow::Result<AngularReport> {
        let report = self.angular_report(chart)?;
        match chart {
            AngularChart::ErrorBars => render::render_error_bars(output, &report.statistics),
            AngularChart::Radiation => render::render_radiation_pattern(output, &report.statistics),
        }
        .with_context(|| format!("rendering {:?} chart to {}", chart, output.display()))?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{write_capture_set, CaptureConfig};
    use pdoacore::processing::CorrectionRule;
    use tempfile::tempdir;

    fn runner_for(dir: &Path, positions: u32) -> Runner {
        let cfg = AnalysisConfig::default().with_overrides(Some(dir.to_path_buf()), Some(positions));
        Runner::new(cfg)
    }

    #[test]
    fn quadrant_sweep_report_matches_expected_means() {
        let dir = tempdir().unwrap();
        for (i, v) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            fs::write(dir.path().join(format!("{i}.csv")), format!("Value\n{v}\n{v}\n")).unwrap();
        }
        let mut runner = runner_for(dir.path(), 4);
        runner.config.radiation.corrections = CorrectionTable::new();

        let report = runner.angular_report(AngularChart::Radiation).unwrap();
        let pairs: Vec<(f64, f64)> = report
            .statistics
            .iter()
            .map(|s| (s.angle_deg, s.mean))
            .collect();
        assert_eq!(
            pairs,
            vec![(0.0, 1.0), (90.0, 2.0), (180.0, 3.0), (270.0, 4.0)]
        );
        assert_eq!(report.summary.overall_mean, 2.5);
        assert!(report.summary.mean_std.is_none());
    }

    #[test]
    fn calibration_table_undoes_sign_artifacts() {
        let dir = tempdir().unwrap();
        let capture = CaptureConfig {
            samples: 40,
            sign_artifacts: vec![3, 11],
            seed: 9,
            ..Default::default()
        };
        write_capture_set(&capture, dir.path()).unwrap();

        let mut runner = runner_for(dir.path(), 16);
        runner.config.error_bars.corrections = CorrectionTable::new()
            .with_rule(3, CorrectionRule::NegateNegatives)
            .with_rule(11, CorrectionRule::NegateNegatives);

        let report = runner.angular_report(AngularChart::ErrorBars).unwrap();
        assert_eq!(report.statistics.len(), 16);
        assert!(report.statistics.iter().all(|s| s.mean > 0.0));
        assert!(report.statistics.iter().all(|s| s.std_dev.is_some()));
        assert_eq!(report.summary.step_deg, 22.5);
    }

    #[test]
    fn non_numeric_capture_name_aborts_angular_run() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.csv"), "Value\n1\n").unwrap();
        fs::write(dir.path().join("baseline.csv"), "Value\n1\n").unwrap();
        let runner = runner_for(dir.path(), 16);
        assert!(runner.angular_report(AngularChart::ErrorBars).is_err());
    }

    #[test]
    fn grid_keeps_going_past_a_broken_capture() {
        let dir = tempdir().unwrap();
        let capture = CaptureConfig {
            positions: 5,
            samples: 8,
            ..Default::default()
        };
        write_capture_set(&capture, dir.path()).unwrap();
        fs::write(dir.path().join("2.csv"), "Timestamp,Value\nnot-a-time,1\n").unwrap();

        let panels = runner_for(dir.path(), 16).grid_panels().unwrap();
        assert_eq!(panels.len(), 5);
        let failed: Vec<&str> = panels
            .iter()
            .filter(|p| p.is_failed())
            .map(|p| p.title())
            .collect();
        assert_eq!(failed, vec!["2.csv (Error)"]);
    }

    #[test]
    fn empty_directory_renders_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("all_plots.png");
        let outcome = runner_for(dir.path(), 16).run_grid(&out).unwrap();
        assert_eq!(outcome.panels, 0);
        assert!(outcome.output.is_none());
        assert!(!out.exists());
    }

    #[test]
    fn report_is_written_as_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.csv"), "Value\n2\n").unwrap();
        fs::write(dir.path().join("1.csv"), "Value\n4\n6\n").unwrap();
        let runner = runner_for(dir.path(), 2);

        let report = runner.angular_report(AngularChart::ErrorBars).unwrap();
        let path = dir.path().join("reports/error_bars.json");
        report.write_json(&path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["chart"], "error_bars");
        assert_eq!(parsed["statistics"][1]["angle_deg"], 180.0);
        assert_eq!(parsed["statistics"][1]["mean"], 5.0);
        assert!(parsed["statistics"][0]["std_dev"].is_null());
    }
}
