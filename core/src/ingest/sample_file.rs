use crate::prelude::{AnalysisError, AnalysisResult};
use std::fs;
use std::path::{Path, PathBuf};

const CAPTURE_EXTENSION: &str = "csv";

/// A capture file whose stem names its rotation index (`7.csv` is index 7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFile {
    pub index: u32,
    pub path: PathBuf,
}

impl SampleFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                AnalysisError::MalformedInput(format!("{} has no file stem", path.display()))
            })?;
        let index = stem.trim().parse::<u32>().map_err(|_| {
            AnalysisError::MalformedInput(format!(
                "file name {} does not carry an integer index",
                path.display()
            ))
        })?;
        Ok(Self {
            index,
            path: path.to_path_buf(),
        })
    }

    /// File name used for titles and messages.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Lists `*.csv` captures in `dir`, sorted by index.
///
/// Every capture must carry an integer stem; the first one that does not
/// aborts discovery.
pub fn discover<P: AsRef<Path>>(dir: P) -> AnalysisResult<Vec<SampleFile>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|err| AnalysisError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| AnalysisError::io(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(CAPTURE_EXTENSION) {
            continue;
        }
        files.push(SampleFile::from_path(&path)?);
    }

    files.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}
