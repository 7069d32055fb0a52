use std::collections::HashMap;

use super::error::{Result, SpectrumError};

/// Header of the shared axis column in the wide table.
pub const WAVELENGTH_COLUMN: &str = "wavelength";

// ---------------------------------------------------------------------------
// SampleTable – one measured spectrum as loaded from disk
// ---------------------------------------------------------------------------

/// A single spectrum as read from one file.
///
/// Column 0 is the wavelength, column 1 the reflectance. Files may carry more
/// columns; they are kept here but never read by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    columns: Vec<Vec<f64>>,
}

impl SampleTable {
    /// A two-column (wavelength, reflectance) table.
    pub fn new(wavelength: Vec<f64>, reflectance: Vec<f64>) -> Self {
        Self {
            columns: vec![wavelength, reflectance],
        }
    }

    /// A table with an arbitrary number of columns, as parsed.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, taken from the first column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn wavelength(&self) -> Option<&[f64]> {
        self.columns.first().map(Vec::as_slice)
    }

    pub fn reflectance(&self) -> Option<&[f64]> {
        self.columns.get(1).map(Vec::as_slice)
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }
}

// ---------------------------------------------------------------------------
// SampleCollection – insertion-ordered key → SampleTable map
// ---------------------------------------------------------------------------

/// Samples keyed by a unique name, iterated in insertion order.
///
/// The order is what the assembler uses as column order, so it is kept as an
/// explicit key list next to the lookup index.
#[derive(Debug, Clone, Default)]
pub struct SampleCollection {
    entries: Vec<(String, SampleTable)>,
    index: HashMap<String, usize>,
}

impl SampleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample. Keys must be unique.
    pub fn insert(&mut self, key: impl Into<String>, table: SampleTable) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(SpectrumError::DuplicateKey(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, table));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SampleTable> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SampleTable)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WideSpectrumTable – one shared wavelength axis, one column per sample
// ---------------------------------------------------------------------------

/// One reflectance column of the wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// The assembled table: a wavelength column plus one column per sample,
/// optionally decorated with one class label per sample column.
#[derive(Debug, Clone, PartialEq)]
pub struct WideSpectrumTable {
    wavelength: Vec<f64>,
    columns: Vec<SpectrumColumn>,
    labels: Option<Vec<String>>,
}

impl WideSpectrumTable {
    pub(crate) fn new(wavelength: Vec<f64>, columns: Vec<SpectrumColumn>) -> Self {
        Self {
            wavelength,
            columns,
            labels: None,
        }
    }

    /// Attach the class label column: exactly one label per data column.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.columns.len() {
            return Err(SpectrumError::ShapeMismatch {
                key: "class".to_string(),
                detail: format!(
                    "{} label(s) for {} data column(s)",
                    labels.len(),
                    self.columns.len()
                ),
            });
        }
        self.labels = Some(labels);
        Ok(self)
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    /// Data columns, in sample insertion order.
    pub fn columns(&self) -> &[SpectrumColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&SpectrumColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Number of data columns (wavelength and labels excluded).
    pub fn data_column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.wavelength.len()
    }

    /// Min and max over every finite reflectance value, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(self.columns.iter().flat_map(|c| c.values.iter().copied()))
    }
}

/// Min and max of the finite values of an iterator.
pub fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
