use anyhow::Context;
use pdoacore::math::AngleMapping;
use pdoacore::processing::CorrectionTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub output: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("all_plots.png"),
        }
    }
}

/// Mean ± std chart; any key left out keeps the bench value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBarsConfig {
    pub output: PathBuf,
    pub corrections: CorrectionTable,
}

impl Default for ErrorBarsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("mean_with_error_bars.png"),
            corrections: CorrectionTable::error_bar_profile(),
        }
    }
}

/// Polar pattern chart; any key left out keeps the bench value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiationConfig {
    pub output: PathBuf,
    pub corrections: CorrectionTable,
}

impl Default for RadiationConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("radiation_pattern.png"),
            corrections: CorrectionTable::radiation_profile(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub positions: u32,
    pub data_dir: PathBuf,
    pub grid: GridConfig,
    pub error_bars: ErrorBarsConfig,
    pub radiation: RadiationConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            positions: AngleMapping::DEFAULT_POSITIONS,
            data_dir: PathBuf::from("."),
            grid: GridConfig::default(),
            error_bars: ErrorBarsConfig::default(),
            radiation: RadiationConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading analysis config {}", path_ref.display()))?;
        let config: AnalysisConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing analysis config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Applies command-line overrides on top of the loaded or default config.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, positions: Option<u32>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(positions) = positions {
            self.positions = positions;
        }
        self
    }

    pub fn angle_mapping(&self) -> AngleMapping {
        AngleMapping::new(self.positions)
    }
}
