use super::{finite_runs, padded_range, prepare_output, FONT};
use pdoacore::AngularStatistic;
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// Linear degree axis whose ticks sit exactly on the measured angles.
#[derive(Clone)]
struct AngleAxis {
    start: f64,
    end: f64,
    angles: Vec<f64>,
}

impl AngleAxis {
    fn new(range: Range<f64>, angles: impl IntoIterator<Item = f64>) -> Self {
        let mut angles: Vec<f64> = angles.into_iter().filter(|a| a.is_finite()).collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        angles.dedup();
        AngleAxis {
            start: range.start,
            end: range.end,
            angles,
        }
    }
}

impl Ranged for AngleAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let coord: RangedCoordf64 = (self.start..self.end).into();
        coord.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        let max_points = hint.max_num_points();
        if max_points == 0 {
            return Vec::new();
        }
        let inside: Vec<f64> = self
            .angles
            .iter()
            .copied()
            .filter(|a| *a >= self.start && *a <= self.end)
            .collect();
        // Too many positions for the axis: keep every k-th angle.
        let stride = inside.len().div_ceil(max_points).max(1);
        inside.into_iter().step_by(stride).collect()
    }

    fn range(&self) -> Range<f64> {
        self.start..self.end
    }
}

impl ValueFormatter<f64> for AngleAxis {
    fn format(value: &f64) -> String {
        format!("{value:.0}°")
    }
}

/// Mean against angle with a ±1 std bar at every position.
pub fn render_error_bars(path: &Path, statistics: &[AngularStatistic]) -> anyhow::Result<()> {
    prepare_output(path)?;

    let runs = finite_runs(
        &statistics
            .iter()
            .map(|s| (s.angle_deg, s.mean))
            .collect::<Vec<_>>(),
    );
    let points: Vec<(f64, f64)> = runs.iter().flatten().copied().collect();
    // (angle, low, mean, high) for every position with a finite spread.
    let bars: Vec<(f64, f64, f64, f64)> = statistics
        .iter()
        .filter_map(|s| {
            let std = s.std_dev.filter(|v| v.is_finite())?;
            s.mean
                .is_finite()
                .then_some((s.angle_deg, s.mean - std, s.mean, s.mean + std))
        })
        .collect();

    let x_axis = AngleAxis::new(
        padded_range(statistics.iter().map(|s| s.angle_deg), 0.05),
        statistics.iter().map(|s| s.angle_deg),
    );
    let y_range = padded_range(
        points
            .iter()
            .map(|p| p.1)
            .chain(bars.iter().flat_map(|b| [b.1, b.3])),
        0.1,
    );

    let root = BitMapBackend::new(path, (1800, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean Measurements vs Angle with Error Bars", (FONT, 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_axis, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Angle (degrees)")
        .y_desc("Measurement Value")
        .x_labels(statistics.len().max(2))
        .label_style((FONT, 18))
        .axis_desc_style((FONT, 22))
        .light_line_style(&BLACK.mix(0.05))
        .draw()?;

    for (idx, run) in runs.into_iter().enumerate() {
        let drawn = chart.draw_series(LineSeries::new(run, BLUE.stroke_width(2)))?;
        if idx == 0 {
            drawn
                .label("Mean ± Std Dev")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
        }
    }

    chart.draw_series(bars.iter().map(|&(angle, lo, mean, hi)| {
        ErrorBar::new_vertical(angle, lo, mean, hi, BLUE.stroke_width(2), 14)
    }))?;

    chart.draw_series(points.iter().map(|&p| Circle::new(p, 7, BLUE.filled())))?;

    chart
        .configure_series_labels()
        .label_font((FONT, 18))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
