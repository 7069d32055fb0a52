//! PNG rendering of spectra and windowed box plots with plotters.
//!
//! Text (captions, tick labels, axis descriptions, legends) needs a font
//! backend and is drawn with the default `fonts` feature. Built without it,
//! charts get no caption or label areas and only lines, boxes and markers
//! are drawn, so no text call ever reaches plotters.

pub mod boxplot;
pub mod plot;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plotting error: {0}")]
    Plotting(String),

    #[error("nothing to plot: {0}")]
    EmptyData(String),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

pub(crate) fn plotting_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Plotting(e.to_string())
}

/// Chart frame shared by every figure: margin, plus caption and label areas
/// when text can be drawn.
pub(crate) fn chart_frame<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    title: &str,
    caption_size: u32,
    x_label_area: u32,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(20);
    #[cfg(feature = "fonts")]
    builder
        .caption(title, ("sans-serif", caption_size))
        .x_label_area_size(x_label_area)
        .y_label_area_size(70);
    #[cfg(not(feature = "fonts"))]
    let _ = (title, caption_size, x_label_area);
    builder
}

/// Widen a (min, max) range by `fraction` of its span on both sides; a
/// degenerate range is widened by one unit.
pub fn padded_range((lo, hi): (f64, f64), fraction: f64) -> std::ops::Range<f64> {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    (lo - span * fraction)..(hi + span * fraction)
}

/// File-system safe image name for a sample key.
pub fn image_file_name(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        let r = padded_range((0.0, 10.0), 0.05);
        assert!((r.start + 0.5).abs() < 1e-12);
        assert!((r.end - 10.5).abs() < 1e-12);
        assert_eq!(padded_range((2.0, 2.0), 0.05), 1.0..3.0);
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(image_file_name("leaves/s1.txt"), "leaves_s1.txt.png");
        assert_eq!(image_file_name("s1"), "s1.png");
    }
}
