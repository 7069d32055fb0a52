use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::model::SampleTable;

/// Field separator of the sample text files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Any run of spaces and/or tabs.
    #[default]
    Whitespace,
    Comma,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Delimiter::Whitespace => b' ',
            Delimiter::Comma => b',',
        }
    }
}

/// All samples of one input folder, labelled with the folder's name.
#[derive(Debug, Clone)]
pub struct LabelledFolder {
    pub label: String,
    /// (file name, table) in file-name order.
    pub samples: Vec<(String, SampleTable)>,
}

// ---------------------------------------------------------------------------
// Folder listing
// ---------------------------------------------------------------------------

/// Class label of a folder: its last path component.
///
/// `data/leaves/` and `data/leaves` both give `leaves`; paths without a
/// usable last component (`.`, `..`) are resolved first.
pub fn folder_label(folder: &Path) -> Result<String> {
    if let Some(name) = folder.file_name().and_then(|n| n.to_str()) {
        return Ok(name.to_string());
    }
    let resolved = folder
        .canonicalize()
        .with_context(|| format!("resolving folder {}", folder.display()))?;
    resolved
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("folder {} has no name", folder.display()))
}

/// Regular, non-hidden files of `folder`, sorted by file name.
pub fn list_sample_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("listing folder {}", folder.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing folder {}", folder.display()))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !path.is_file() {
            debug!("skipping {}", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Load every sample file of a folder.
pub fn load_folder(folder: &Path, delimiter: Delimiter) -> Result<LabelledFolder> {
    let label = folder_label(folder)?;
    let files = list_sample_files(folder)?;
    if files.is_empty() {
        bail!("folder {} contains no sample files", folder.display());
    }

    let mut samples = Vec::with_capacity(files.len());
    for path in &files {
        let table = load_sample_file(path, delimiter)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        samples.push((name, table));
    }

    info!(
        "loaded {} sample(s) from {} (class '{label}')",
        samples.len(),
        folder.display()
    );
    Ok(LabelledFolder { label, samples })
}

// ---------------------------------------------------------------------------
// Sample file parsing
// ---------------------------------------------------------------------------

/// Parse one headerless numeric text table.
///
/// * Lines starting with `#` are comments; blank lines are skipped.
/// * A first row that does not parse as numbers is taken as a header.
/// * Every data row must have as many fields as the first one.
pub fn load_sample_file(path: &Path, delimiter: Delimiter) -> Result<SampleTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .delimiter(delimiter.byte())
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut seen_rows = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{}: reading row {row_no}", path.display()))?;
        let fields = split_fields(&record, delimiter);
        if fields.is_empty() {
            continue;
        }

        let parsed: std::result::Result<Vec<f64>, _> =
            fields.iter().map(|f| f.parse::<f64>()).collect();
        let values = match parsed {
            Ok(values) => values,
            Err(_) if seen_rows == 0 && columns.is_empty() => {
                debug!("{}: treating row {row_no} as header", path.display());
                seen_rows += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("{}: row {row_no} is not numeric: {fields:?}", path.display())
                })
            }
        };
        seen_rows += 1;

        if columns.is_empty() {
            columns = vec![Vec::new(); values.len()];
        } else if values.len() != columns.len() {
            bail!(
                "{}: row {row_no} has {} field(s), expected {}",
                path.display(),
                values.len(),
                columns.len()
            );
        }
        for (column, v) in columns.iter_mut().zip(values) {
            column.push(v);
        }
    }

    if columns.is_empty() {
        bail!("{}: no data rows", path.display());
    }
    Ok(SampleTable::from_columns(columns))
}

fn split_fields(record: &csv::StringRecord, delimiter: Delimiter) -> Vec<&str> {
    match delimiter {
        // Runs of spaces show up as empty fields; tabs are split here.
        Delimiter::Whitespace => record
            .iter()
            .flat_map(|f| f.split('\t'))
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect(),
        Delimiter::Comma => {
            let fields: Vec<&str> = record.iter().map(str::trim).collect();
            if fields.iter().all(|f| f.is_empty()) {
                Vec::new()
            } else {
                fields
            }
        }
    }
}
