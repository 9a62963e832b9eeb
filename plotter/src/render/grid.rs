use super::{finite_runs, grid_shape, padded_range, prepare_output, FONT};
use pdoacore::processing::GridPanel;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const PANEL_SIZE: (u32, u32) = (500, 400);

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// One panel per capture on a near-square grid; slots past the last
/// capture stay blank.
pub fn render_grid(path: &Path, panels: &[GridPanel]) -> anyhow::Result<()> {
    prepare_output(path)?;

    let (rows, cols) = grid_shape(panels.len());
    let size = (
        PANEL_SIZE.0 * cols.max(1) as u32,
        PANEL_SIZE.1 * rows.max(1) as u32 + 60,
    );
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Data from CSV Files", (FONT, 36))?;

    if panels.is_empty() {
        root.present()?;
        return Ok(());
    }

    let areas = root.split_evenly((rows, cols));
    for (panel, area) in panels.iter().zip(areas.iter()) {
        match panel {
            GridPanel::Plotted { .. } => draw_plotted(area, panel)?,
            GridPanel::Failed { title, message } => draw_failed(area, title, message)?,
        }
    }

    root.present()?;
    Ok(())
}

fn draw_plotted(area: &Panel<'_>, panel: &GridPanel) -> anyhow::Result<()> {
    let GridPanel::Plotted {
        title,
        axis,
        x,
        series,
        legend,
    } = panel
    else {
        return Ok(());
    };

    let x_range = padded_range(x.iter().copied(), 0.0);
    let y_range = padded_range(
        series.iter().flat_map(|s| s.values.iter().copied()),
        0.05,
    );

    let mut chart = ChartBuilder::on(area)
        .caption(title.as_str(), (FONT, 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(axis.label())
        .light_line_style(&BLACK.mix(0.05))
        .label_style((FONT, 13));
    if !legend {
        mesh.y_desc("Value");
    }
    mesh.draw()?;

    for (idx, line) in series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(1.0);
        for (run_idx, run) in series_runs(x, &line.values).into_iter().enumerate() {
            let drawn = chart.draw_series(LineSeries::new(run, color.stroke_width(2)))?;
            if *legend && run_idx == 0 {
                drawn
                    .label(line.name.clone())
                    .legend(move |(lx, ly)| {
                        PathElement::new(vec![(lx, ly), (lx + 16, ly)], color.stroke_width(2))
                    });
            }
        }
    }

    if *legend && !series.is_empty() {
        chart
            .configure_series_labels()
            .label_font((FONT, 13))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .draw()?;
    }
    Ok(())
}

/// Line segments of one series; empty cells split the line. An all-missing
/// series yields one empty run so it still gets its legend entry.
fn series_runs(x: &[f64], values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let points: Vec<(f64, f64)> = x.iter().copied().zip(values.iter().copied()).collect();
    let mut runs = finite_runs(&points);
    if runs.is_empty() {
        runs.push(Vec::new());
    }
    runs
}

fn draw_failed(area: &Panel<'_>, title: &str, message: &str) -> anyhow::Result<()> {
    let inner = area.titled(title, (FONT, 20))?;
    let (width, height) = inner.dim_in_pixel();
    let style = TextStyle::from((FONT, 15).into_font().color(&RED))
        .pos(Pos::new(HPos::Center, VPos::Center));

    let lines: Vec<&str> = message.lines().collect();
    let line_height = 20;
    let top = height as i32 / 2 - (lines.len() as i32 - 1) * line_height / 2;
    for (idx, line) in lines.iter().enumerate() {
        inner.draw(&Text::new(
            line.to_string(),
            (width as i32 / 2, top + idx as i32 * line_height),
            style.clone(),
        ))?;
    }
    Ok(())
}
