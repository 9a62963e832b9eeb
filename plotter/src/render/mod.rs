//! PNG charts drawn with `plotters`.
//!
//! The chart functions take the aggregator's output unchanged; the helpers
//! below hold the geometry so it can be checked without a font stack.

pub mod error_bars;
pub mod grid;
pub mod polar;

pub use error_bars::render_error_bars;
pub use grid::render_grid;
pub use polar::render_radiation_pattern;

use anyhow::Context;
use std::fs;
use std::ops::Range;
use std::path::Path;

pub(crate) const FONT: &str = "sans-serif";

pub(crate) fn prepare_output(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Rows and columns of the most nearly square grid holding `count` panels.
pub fn grid_shape(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (rows, cols)
}

/// Splits a polyline at every non-finite point, so gaps stay gaps when
/// each run is drawn as its own series.
pub fn finite_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in points {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Finite min..max of `values` widened by `pad` of the span; a flat or
/// empty input gets a unit-wide window.
pub fn padded_range<I: IntoIterator<Item = f64>>(values: I, pad: f64) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return -1.0..1.0;
    }
    let span = hi - lo;
    if span.abs() < 1e-12 {
        return (lo - 0.5)..(hi + 0.5);
    }
    (lo - pad * span)..(hi + pad * span)
}

/// Compass-style projection: 0 deg points up and angles grow clockwise.
pub fn polar_point(angle_deg: f64, radius: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    (radius * theta.sin(), radius * theta.cos())
}

/// Radial axis bounds; the centre sits at zero unless values go negative.
pub fn radial_bounds(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((0.0f64, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !hi.is_finite() || hi - lo < 1e-12 {
        return (lo, lo + 1.0);
    }
    (lo, hi)
}
