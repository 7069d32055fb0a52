use std::path::Path;

use plotters::prelude::*;
use plotters::coord::types::RangedCoordf64;

use super::{chart_frame, padded_range, plotting_error, RenderError, Result};
use crate::color::ColorMap;
use crate::config::FigureSize;
use crate::data::model::{finite_range, SpectrumColumn};
use crate::data::stats::{box_stats, group_by_label, BoxStats};
use crate::data::Window;

/// Fraction of a column slot covered by its box.
const BOX_WIDTH: f64 = 0.6;

/// Box of one spectrum, positioned and coloured for drawing.
struct PlacedBox<'a> {
    name: &'a str,
    color: RGBColor,
    stats: BoxStats,
}

/// Columns of the window in drawing order: grouped by class label (groups in
/// order of first appearance), source order inside a group.
fn layout<'a>(window: &Window<'a>, colors: &ColorMap) -> Vec<PlacedBox<'a>> {
    let columns = window.columns();
    let ordered: Vec<(&'a SpectrumColumn, RGBColor)> = match window.labels() {
        Some(labels) => group_by_label(columns, labels)
            .into_iter()
            .flat_map(|(label, members)| {
                let color = colors.color_for(label);
                members.into_iter().map(move |c| (c, color))
            })
            .collect(),
        None => columns.iter().map(|c| (c, colors.color_for(""))).collect(),
    };

    ordered
        .into_iter()
        .filter_map(|(column, color)| {
            box_stats(&column.values).map(|stats| PlacedBox {
                name: column.name.as_str(),
                color,
                stats,
            })
        })
        .collect()
}

type BoxChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Value grid with each box slot labelled by its spectrum name.
#[cfg(feature = "fonts")]
fn draw_axes(chart: &mut BoxChart<'_, '_>, boxes: &[PlacedBox<'_>]) -> Result<()> {
    let names: Vec<&str> = boxes.iter().map(|b| b.name).collect();
    let tick_name = |x: &f64| -> String {
        let slot = x.floor();
        if slot < 0.0 || (x - slot - 0.5).abs() > 0.25 {
            return String::new();
        }
        names.get(slot as usize).map(|s| s.to_string()).unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len() * 2 + 1)
        .x_label_formatter(&tick_name)
        .y_desc("reflectance")
        .draw()
        .map_err(plotting_error)
}

/// Value grid only; there is no label area to write names into.
#[cfg(not(feature = "fonts"))]
fn draw_axes(chart: &mut BoxChart<'_, '_>, _boxes: &[PlacedBox<'_>]) -> Result<()> {
    chart
        .configure_mesh()
        .disable_x_mesh()
        .draw()
        .map_err(plotting_error)
}

#[cfg(feature = "fonts")]
fn draw_class_legend<'a, 'b: 'a>(chart: &mut BoxChart<'a, 'b>, colors: &ColorMap) -> Result<()> {
    for (label, color) in colors.legend_entries() {
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
            .map_err(plotting_error)?
            .label(label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled())
            });
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 16))
        .draw()
        .map_err(plotting_error)
}

/// One image of box plots for a window, boxes grouped and coloured by class.
///
/// `y_range` fixes the value axis so consecutive windows share ticks; when
/// `None` the window's own data range is used.
pub fn plot_window(
    output_path: &Path,
    window: &Window<'_>,
    colors: &ColorMap,
    y_range: Option<(f64, f64)>,
    size: FigureSize,
) -> Result<()> {
    let boxes = layout(window, colors);
    let title = format!("window {}", window.index());
    if boxes.is_empty() {
        return Err(RenderError::EmptyData(title));
    }

    let y = match y_range {
        Some(r) => r,
        None => finite_range(
            window
                .columns()
                .iter()
                .flat_map(|c| c.values.iter().copied()),
        )
        .ok_or_else(|| RenderError::EmptyData(title.clone()))?,
    };

    let root = BitMapBackend::new(output_path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plotting_error)?;

    let n = boxes.len();
    let mut chart = chart_frame(&root, &title, 28, 80)
        .build_cartesian_2d(0.0..n as f64, padded_range(y, 0.05))
        .map_err(plotting_error)?;
    draw_axes(&mut chart, &boxes)?;

    for (i, b) in boxes.iter().enumerate() {
        let center = i as f64 + 0.5;
        let (left, right) = (center - BOX_WIDTH / 2.0, center + BOX_WIDTH / 2.0);
        let s = &b.stats;
        let edge = b.color.stroke_width(2);

        chart
            .draw_series([
                Rectangle::new([(left, s.q1), (right, s.q3)], b.color.mix(0.35).filled()),
                Rectangle::new([(left, s.q1), (right, s.q3)], edge),
            ])
            .map_err(plotting_error)?;

        let (cap_l, cap_r) = (center - BOX_WIDTH / 4.0, center + BOX_WIDTH / 4.0);
        chart
            .draw_series([
                PathElement::new(vec![(left, s.median), (right, s.median)], BLACK.stroke_width(3)),
                PathElement::new(vec![(center, s.q3), (center, s.upper_whisker)], edge),
                PathElement::new(vec![(center, s.q1), (center, s.lower_whisker)], edge),
                PathElement::new(vec![(cap_l, s.upper_whisker), (cap_r, s.upper_whisker)], edge),
                PathElement::new(vec![(cap_l, s.lower_whisker), (cap_r, s.lower_whisker)], edge),
            ])
            .map_err(plotting_error)?;

        chart
            .draw_series(
                s.outliers
                    .iter()
                    .map(|&v| Circle::new((center, v), 3, b.color.stroke_width(1))),
            )
            .map_err(plotting_error)?;
    }

    #[cfg(feature = "fonts")]
    {
        if window.labels().is_some() {
            draw_class_legend(&mut chart, colors)?;
        }
    }

    root.present().map_err(plotting_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SampleCollection, SampleTable, WideSpectrumTable};
    use crate::data::{assemble, partition};
    use tempfile::tempdir;

    fn labelled_table() -> WideSpectrumTable {
        let w: Vec<f64> = (0..20).map(|i| 500.0 + i as f64).collect();
        let mut c = SampleCollection::new();
        for k in 0..4 {
            let r = w.iter().map(|x| (x - 500.0) * 0.01 + k as f64 * 0.1).collect();
            c.insert(format!("s{k}"), SampleTable::new(w.clone(), r)).unwrap();
        }
        let labels = ["leaf", "bark", "leaf", "bark"].map(String::from).to_vec();
        assemble(&c).unwrap().with_labels(labels).unwrap()
    }

    #[test]
    fn test_layout_groups_columns_by_label() {
        let table = labelled_table();
        let colors = ColorMap::new(table.labels().unwrap().iter().map(String::as_str));
        let p = partition(&table, 4).unwrap();
        let window = p.iter().next().unwrap();
        let boxes = layout(&window, &colors);
        let names: Vec<&str> = boxes.iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["s0", "s2", "s1", "s3"]);
        assert_eq!(boxes[0].color, colors.color_for("leaf"));
        assert_eq!(boxes[2].color, colors.color_for("bark"));
    }

    #[test]
    fn test_plot_window_writes_png() {
        let dir = tempdir().unwrap();
        let table = labelled_table();
        let colors = ColorMap::new(table.labels().unwrap().iter().map(String::as_str));
        let p = partition(&table, 2).unwrap();
        for window in &p {
            let path = dir.path().join(format!("{}.png", window.index()));
            plot_window(
                &path,
                &window,
                &colors,
                table.value_range(),
                FigureSize::new(400, 300),
            )
            .unwrap();
            assert_eq!(image::image_dimensions(&path).unwrap(), (400, 300));
        }
    }
}
