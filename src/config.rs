//! Run configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. Command line flags are applied on top of the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::Delimiter;
use crate::data::RemainderPolicy;

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl FigureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Spectra per box-plot image.
    pub window_size: usize,
    pub remainder: RemainderPolicy,
    /// Reject samples whose wavelength values differ from the first sample.
    pub strict_axis: bool,
    pub delimiter: Delimiter,
    /// Render one image per spectrum.
    pub individual_plots: bool,
    pub write_parquet: bool,
    /// Render any images at all.
    pub figures: bool,
    /// Use one y range for every box-plot window.
    pub shared_box_range: bool,
    pub overlay_size: FigureSize,
    pub spectrum_size: FigureSize,
    pub boxplot_size: FigureSize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            remainder: RemainderPolicy::Drop,
            strict_axis: false,
            delimiter: Delimiter::Whitespace,
            individual_plots: false,
            write_parquet: false,
            figures: true,
            shared_box_range: true,
            overlay_size: FigureSize::new(2400, 1200),
            spectrum_size: FigureSize::new(1800, 540),
            boxplot_size: FigureSize::new(3000, 1200),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(
            &path,
            r#"{ "window_size": 25, "remainder": "keep", "delimiter": "comma",
                 "boxplot_size": { "width": 800, "height": 600 } }"#,
        )
        .unwrap();

        let cfg = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.window_size, 25);
        assert_eq!(cfg.remainder, RemainderPolicy::Keep);
        assert_eq!(cfg.delimiter, Delimiter::Comma);
        assert_eq!(cfg.boxplot_size, FigureSize::new(800, 600));
        assert_eq!(cfg.overlay_size, AnalysisConfig::default().overlay_size);
        assert!(cfg.figures);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "remainder": "sometimes" }"#).unwrap();
        assert!(AnalysisConfig::from_json_file(&path).is_err());
        assert!(AnalysisConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let text = serde_json::to_string(&AnalysisConfig::default()).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, AnalysisConfig::default());
    }
}
