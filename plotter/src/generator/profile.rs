use anyhow::Context;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use pdoacore::math::AngleMapping;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Configuration for generating a synthetic rotation sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub positions: u32,
    pub samples: usize,
    pub interval_ms: i64,
    /// Pattern maximum, reached at 0°.
    pub peak: f64,
    /// Pattern minimum, reached at 180°.
    pub floor: f64,
    pub noise: f64,
    pub seed: u64,
    /// Positions whose samples get a random sign, as an uncalibrated setup would record.
    pub sign_artifacts: Vec<u32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            positions: AngleMapping::DEFAULT_POSITIONS,
            samples: 200,
            interval_ms: 50,
            peak: 40.0,
            floor: 5.0,
            noise: 1.5,
            seed: 0,
            sign_artifacts: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct CaptureRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Value")]
    value: f64,
}

fn sweep_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Cardioid-like expected level at `angle_deg`.
fn pattern_level(config: &CaptureConfig, angle_deg: f64) -> f64 {
    let lobe = (1.0 + angle_deg.to_radians().cos()) / 2.0;
    config.floor + (config.peak - config.floor) * lobe
}

fn build_position_samples(config: &CaptureConfig, index: u32, rng: &mut StdRng) -> Vec<f64> {
    let mapping = AngleMapping::new(config.positions);
    let level = pattern_level(config, mapping.angle_deg(index));
    let artifact = config.sign_artifacts.contains(&index);

    (0..config.samples)
        .map(|_| {
            let jitter = if config.noise > 0.0 {
                rng.gen_range(-config.noise..config.noise)
            } else {
                0.0
            };
            let value = level + jitter;
            if artifact && rng.gen_bool(0.5) {
                -value
            } else {
                value
            }
        })
        .collect()
}

/// Writes `0.csv`..`N-1.csv` into `out_dir` and returns their paths.
pub fn write_capture_set<P: AsRef<Path>>(
    config: &CaptureConfig,
    out_dir: P,
) -> anyhow::Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating capture directory {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let step = Duration::milliseconds(config.interval_ms.max(1));
    let mut paths = Vec::with_capacity(config.positions as usize);

    for index in 0..config.positions.max(1) {
        let path = out_dir.join(format!("{index}.csv"));
        let samples = build_position_samples(config, index, &mut rng);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;

        let mut stamp = sweep_start() + Duration::seconds(index as i64 * 60);
        for value in samples {
            writer
                .serialize(CaptureRow {
                    timestamp: stamp.format(TIMESTAMP_FORMAT).to_string(),
                    value,
                })
                .with_context(|| format!("writing {}", path.display()))?;
            stamp += step;
        }
        writer
            .flush()
            .with_context(|| format!("flushing {}", path.display()))?;
        paths.push(path);
    }

    Ok(paths)
}
