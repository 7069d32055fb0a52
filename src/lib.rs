//! Batch analysis of reflectance spectra.
//!
//! Reads one spectrum per file from one or more folders, pivots them into a
//! single table over a shared wavelength axis, writes the table with its
//! descriptive statistics, and renders an overlay of all spectra plus
//! windowed box plots grouped by class (source folder).
//!
//! ```no_run
//! use spectral_analysis::data::{assemble, partition, SampleCollection, SampleTable};
//!
//! let mut samples = SampleCollection::new();
//! samples.insert("a", SampleTable::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0])).unwrap();
//! let table = assemble(&samples).unwrap();
//! for window in &partition(&table, 100).unwrap() {
//!     println!("window {} has {} spectra", window.index(), window.len());
//! }
//! ```

pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;
pub mod render;

pub use config::AnalysisConfig;
pub use pipeline::{run, RunOptions, RunReport};
