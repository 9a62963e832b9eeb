use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How far each capture file is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Mean,
    MeanAndStd,
}

/// Reduced statistic for one rotation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularStatistic {
    pub index: u32,
    pub angle_deg: f64,
    /// Number of non-missing samples that went into the reduction.
    pub samples: usize,
    pub mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

/// Common error type for ingest and aggregation.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
