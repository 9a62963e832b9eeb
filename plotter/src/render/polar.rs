use super::{finite_runs, polar_point, prepare_output, radial_bounds, FONT};
use pdoacore::AngularStatistic;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const RINGS: usize = 4;
const SPOKE_STEP_DEG: f64 = 45.0;
const RING_LABEL_DEG: f64 = 45.0;

fn circle_path(radius: f64) -> Vec<(f64, f64)> {
    (0..=360)
        .step_by(2)
        .map(|deg| polar_point(deg as f64, radius))
        .collect()
}

/// Projected outline runs, and whether the pattern wraps back onto its first
/// position. Only a sweep without gaps is closed.
fn pattern_outline(
    statistics: &[AngularStatistic],
    scale: impl Fn(f64) -> f64,
) -> (Vec<Vec<(f64, f64)>>, bool) {
    let polar: Vec<(f64, f64)> = statistics.iter().map(|s| (s.angle_deg, s.mean)).collect();
    let closed = !polar.is_empty() && polar.iter().all(|(a, m)| a.is_finite() && m.is_finite());
    let mut runs: Vec<Vec<(f64, f64)>> = finite_runs(&polar)
        .into_iter()
        .map(|run| run.into_iter().map(|(a, m)| polar_point(a, scale(m))).collect())
        .collect();
    if closed {
        if let Some(run) = runs.first_mut() {
            let first = run[0];
            run.push(first);
        }
    }
    (runs, closed)
}

/// Polar radiation pattern of the per-angle mean: 0° at the top, clockwise.
/// A complete sweep is closed and filled; missing positions leave gaps.
pub fn render_radiation_pattern(
    path: &Path,
    statistics: &[AngularStatistic],
) -> anyhow::Result<()> {
    prepare_output(path)?;

    let means: Vec<f64> = statistics.iter().map(|s| s.mean).collect();
    let (r_lo, r_hi) = radial_bounds(&means);
    let scale = |value: f64| (value - r_lo) / (r_hi - r_lo);

    let (runs, closed) = pattern_outline(statistics, scale);
    let markers: Vec<(f64, f64)> = statistics
        .iter()
        .filter(|s| s.angle_deg.is_finite() && s.mean.is_finite())
        .map(|s| polar_point(s.angle_deg, scale(s.mean)))
        .collect();

    let root = BitMapBackend::new(path, (1200, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Antenna Radiation Pattern (Mean Values vs Angle)", (FONT, 32))
        .margin(30)
        .build_cartesian_2d(-1.2f64..1.2f64, -1.2f64..1.2f64)?;

    let grid_style = BLACK.mix(0.2);
    for ring in 1..=RINGS {
        let fraction = ring as f64 / RINGS as f64;
        chart.draw_series(std::iter::once(PathElement::new(
            circle_path(fraction),
            grid_style.stroke_width(1),
        )))?;
        let value = r_lo + fraction * (r_hi - r_lo);
        chart.draw_series(std::iter::once(Text::new(
            format!("{value:.2}"),
            polar_point(RING_LABEL_DEG, fraction),
            (FONT, 18).into_font().color(&BLACK.mix(0.7)),
        )))?;
    }

    let spoke_label = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    let mut spoke = 0.0;
    while spoke < 360.0 {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), polar_point(spoke, 1.0)],
            grid_style.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{spoke:.0}°"),
            polar_point(spoke, 1.1),
            spoke_label.clone(),
        )))?;
        spoke += SPOKE_STEP_DEG;
    }

    if closed && markers.len() > 2 {
        chart.draw_series(std::iter::once(Polygon::new(
            markers.clone(),
            BLUE.mix(0.25).filled(),
        )))?;
    }
    chart.draw_series(
        runs.into_iter()
            .map(|run| PathElement::new(run, BLUE.stroke_width(2))),
    )?;
    chart.draw_series(markers.into_iter().map(|p| Circle::new(p, 7, BLUE.filled())))?;

    root.present()?;
    Ok(())
}
