use crate::ingest::{SampleFile, SampleTable, VALUE_COLUMN};
use crate::prelude::AnalysisResult;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;

/// What the horizontal axis of a panel measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAxis {
    ElapsedSeconds,
    SampleIndex,
}

impl PanelAxis {
    pub fn label(self) -> &'static str {
        match self {
            PanelAxis::ElapsedSeconds => "Time (seconds)",
            PanelAxis::SampleIndex => "Sample Index",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// One slot of the per-file grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridPanel {
    Plotted {
        title: String,
        axis: PanelAxis,
        x: Vec<f64>,
        series: Vec<PanelSeries>,
        /// Set when every numeric column is drawn instead of `Value`.
        legend: bool,
    },
    Failed {
        title: String,
        message: String,
    },
}

impl GridPanel {
    pub fn title(&self) -> &str {
        match self {
            GridPanel::Plotted { title, .. } | GridPanel::Failed { title, .. } => title,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, GridPanel::Failed { .. })
    }
}

/// Builds one panel per capture; a capture that fails to load becomes a
/// failed panel instead of aborting the rest.
pub struct GridLoader {
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl GridLoader {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn load(&self, files: &[SampleFile]) -> Vec<GridPanel> {
        files.iter().map(|file| self.load_panel(file)).collect()
    }

    /// Processed and failed capture counts so far.
    pub fn snapshot(&self) -> (usize, usize) {
        self.metrics.snapshot()
    }

    fn load_panel(&self, file: &SampleFile) -> GridPanel {
        let name = file.display_name();
        match build_panel(file, &name) {
            Ok(panel) => {
                self.metrics.record_processed();
                panel
            }
            Err(err) => {
                self.metrics.record_error();
                self.logger.warn(&format!("grid panel {name} failed: {err}"));
                GridPanel::Failed {
                    title: format!("{name} (Error)"),
                    message: format!("Error reading {name}\n{err}"),
                }
            }
        }
    }
}

impl Default for GridLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn build_panel(file: &SampleFile, name: &str) -> AnalysisResult<GridPanel> {
    let table = SampleTable::load(&file.path)?;

    let (axis, x) = match table.elapsed_seconds()? {
        Some(elapsed) => (PanelAxis::ElapsedSeconds, elapsed),
        None => (
            PanelAxis::SampleIndex,
            (0..table.row_count()).map(|i| i as f64).collect(),
        ),
    };

    let (series, legend) = if table.has_column(VALUE_COLUMN) {
        let values = table.values()?;
        (
            vec![PanelSeries {
                name: VALUE_COLUMN.to_string(),
                values,
            }],
            false,
        )
    } else {
        let series = table
            .numeric_columns()
            .into_iter()
            .map(|(name, values)| PanelSeries { name, values })
            .collect();
        (series, true)
    };

    Ok(GridPanel::Plotted {
        title: name.to_string(),
        axis,
        x,
        series,
        legend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::discover;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn unreadable_capture_becomes_error_panel() {
        let dir = tempdir().unwrap();
        for i in 0..4 {
            fs::write(
                dir.path().join(format!("{i}.csv")),
                "Timestamp,Value\n2024-05-01 10:00:00,1\n2024-05-01 10:00:01,2\n",
            )
            .unwrap();
        }
        fs::write(dir.path().join("4.csv"), "Timestamp,Value\n2024-05-01 10:00:00,1,9\n").unwrap();

        let loader = GridLoader::new();
        let panels = loader.load(&discover(dir.path()).unwrap());

        assert_eq!(panels.len(), 5);
        assert_eq!(panels.iter().filter(|p| p.is_failed()).count(), 1);
        match &panels[4] {
            GridPanel::Failed { title, message } => {
                assert_eq!(title, "4.csv (Error)");
                assert!(message.starts_with("Error reading 4.csv\n"));
            }
            other => panic!("expected failed panel, got {other:?}"),
        }
        assert_eq!(loader.snapshot(), (4, 1));
    }

    #[test]
    fn timestamp_column_drives_elapsed_axis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0.csv");
        fs::write(
            &path,
            "Timestamp,Value\n2024-05-01 10:00:00,1\n2024-05-01 10:00:05,2\n",
        )
        .unwrap();

        let panels = GridLoader::new().load(&[SampleFile::from_path(&path).unwrap()]);
        match &panels[0] {
            GridPanel::Plotted {
                axis, x, series, legend, ..
            } => {
                assert_eq!(*axis, PanelAxis::ElapsedSeconds);
                assert_eq!(x, &vec![0.0, 5.0]);
                assert_eq!(series.len(), 1);
                assert!(!legend);
            }
            other => panic!("expected plotted panel, got {other:?}"),
        }
    }

    #[test]
    fn without_value_column_all_numeric_columns_are_drawn() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("3.csv");
        fs::write(&path, "Phase,Label,Amplitude\n0.1,a,2\n0.2,b,3\n0.3,c,4\n").unwrap();

        let panels = GridLoader::new().load(&[SampleFile::from_path(&path).unwrap()]);
        match &panels[0] {
            GridPanel::Plotted {
                axis, x, series, legend, ..
            } => {
                assert_eq!(*axis, PanelAxis::SampleIndex);
                assert_eq!(x, &vec![0.0, 1.0, 2.0]);
                let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, vec!["Phase", "Amplitude"]);
                assert!(legend);
            }
            other => panic!("expected plotted panel, got {other:?}"),
        }
    }
}
