use std::path::Path;

use plotters::prelude::*;
use plotters::coord::types::RangedCoordf64;

use super::{chart_frame, padded_range, plotting_error, RenderError, Result};
use crate::color::series_colors;
use crate::config::FigureSize;
use crate::data::model::{finite_range, WideSpectrumTable};

/// Overlays with more spectra than this are drawn without a legend.
#[cfg(feature = "fonts")]
const LEGEND_LIMIT: usize = 40;

// ---------------------------------------------------------------------------
// Spectral line plots
// ---------------------------------------------------------------------------

/// Finite (wavelength, value) pairs; NaN rows would break the line.
fn points(wavelength: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    wavelength
        .iter()
        .zip(values)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect()
}

type LineChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Grid, plus wavelength/reflectance axis descriptions when text is drawn.
fn draw_axes(chart: &mut LineChart<'_, '_>) -> Result<()> {
    let mut mesh = chart.configure_mesh();
    #[cfg(feature = "fonts")]
    mesh.x_desc("wavelength").y_desc("reflectance");
    mesh.draw().map_err(plotting_error)
}

/// One spectrum, reflectance against wavelength.
pub fn plot_spectrum(
    output_path: &Path,
    title: &str,
    wavelength: &[f64],
    reflectance: &[f64],
    size: FigureSize,
) -> Result<()> {
    let data = points(wavelength, reflectance);
    let x = finite_range(data.iter().map(|p| p.0));
    let y = finite_range(data.iter().map(|p| p.1));
    let (Some(x), Some(y)) = (x, y) else {
        return Err(RenderError::EmptyData(title.to_string()));
    };

    let root = BitMapBackend::new(output_path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plotting_error)?;

    let mut chart = chart_frame(&root, title, 28, 50)
        .build_cartesian_2d(padded_range(x, 0.0), padded_range(y, 0.05))
        .map_err(plotting_error)?;
    draw_axes(&mut chart)?;

    chart
        .draw_series(LineSeries::new(data, BLUE.stroke_width(2)))
        .map_err(plotting_error)?;

    root.present().map_err(plotting_error)?;
    Ok(())
}

/// Every spectrum of the table on one chart, one colour per spectrum.
pub fn plot_overlay(
    output_path: &Path,
    title: &str,
    table: &WideSpectrumTable,
    size: FigureSize,
) -> Result<()> {
    let x = finite_range(table.wavelength().iter().copied());
    let (Some(x), Some(y)) = (x, table.value_range()) else {
        return Err(RenderError::EmptyData(title.to_string()));
    };

    let root = BitMapBackend::new(output_path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plotting_error)?;

    let mut chart = chart_frame(&root, title, 36, 50)
        .build_cartesian_2d(padded_range(x, 0.0), padded_range(y, 0.05))
        .map_err(plotting_error)?;
    draw_axes(&mut chart)?;

    let colors = series_colors(table.data_column_count());
    for (column, color) in table.columns().iter().zip(colors) {
        chart
            .draw_series(LineSeries::new(
                points(table.wavelength(), &column.values),
                color.stroke_width(2),
            ))
            .map_err(plotting_error)?
            .label(column.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    #[cfg(feature = "fonts")]
    {
        if table.data_column_count() <= LEGEND_LIMIT {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(("sans-serif", 16))
                .draw()
                .map_err(plotting_error)?;
        }
    }

    root.present().map_err(plotting_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::assemble;
    use crate::data::model::{SampleCollection, SampleTable};
    use tempfile::tempdir;

    fn table() -> WideSpectrumTable {
        let w: Vec<f64> = (0..50).map(|i| 400.0 + 2.0 * i as f64).collect();
        let mut c = SampleCollection::new();
        for k in 0..3 {
            let r = w.iter().map(|x| ((x / 40.0) + k as f64).sin()).collect();
            c.insert(format!("s{k}"), SampleTable::new(w.clone(), r)).unwrap();
        }
        assemble(&c).unwrap()
    }

    #[test]
    fn test_overlay_writes_png_of_requested_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        plot_overlay(&path, "overlay", &table(), FigureSize::new(400, 260)).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (400, 260));
    }

    #[test]
    fn test_overlay_draws_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        plot_overlay(&path, "overlay", &table(), FigureSize::new(400, 260)).unwrap();

        let RGBColor(r, g, b) = series_colors(3)[1];
        let img = image::open(&path).unwrap().to_rgb8();
        let drawn = img.pixels().filter(|p| p.0 == [r, g, b]).count();
        assert!(drawn > 100, "only {drawn} pixels of the second series");
    }

    #[test]
    fn test_single_spectrum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.png");
        let t = table();
        plot_spectrum(
            &path,
            "s0",
            t.wavelength(),
            &t.columns()[0].values,
            FigureSize::new(300, 200),
        )
        .unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (300, 200));
    }

    #[test]
    fn test_all_nan_spectrum_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nan.png");
        let err = plot_spectrum(
            &path,
            "nan",
            &[1.0, 2.0],
            &[f64::NAN, f64::NAN],
            FigureSize::new(100, 100),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::EmptyData(_)));
        assert!(!path.exists());
    }
}
