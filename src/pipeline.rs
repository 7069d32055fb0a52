//! One batch run: load folders, assemble, write tables, render figures.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::color::ColorMap;
use crate::config::AnalysisConfig;
use crate::data::loader::{folder_label, load_folder};
use crate::data::{
    assemble_with, partition_with, stats, AssembleOptions, SampleCollection, SpectrumError,
    WideSpectrumTable,
};
use crate::export;
use crate::render::{self, boxplot, plot};

/// Inputs of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Prefix of the output files; derived from the input folders if unset.
    pub name: Option<String>,
    pub config: AnalysisConfig,
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub name: String,
    pub samples: usize,
    pub rows: usize,
    pub classes: usize,
    pub windows: usize,
    /// Columns left out of the box plots by the remainder policy.
    pub dropped_columns: usize,
    pub outputs: Vec<PathBuf>,
}

/// Output file prefix: the folder name, or the folder names joined by `_`.
pub fn run_name(inputs: &[PathBuf]) -> Result<String> {
    let labels = inputs
        .iter()
        .map(|p| folder_label(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(labels.join("_"))
}

/// Load every input folder into one collection plus the per-sample labels.
///
/// Keys are file names for a single folder and `<folder>/<file>` otherwise.
pub fn load_inputs(
    inputs: &[PathBuf],
    config: &AnalysisConfig,
) -> Result<(SampleCollection, Vec<String>)> {
    if inputs.is_empty() {
        bail!("no input folder given");
    }
    let qualify = inputs.len() > 1;

    let mut collection = SampleCollection::new();
    let mut labels = Vec::new();
    for folder in inputs {
        let loaded = load_folder(folder, config.delimiter)?;
        for (file, table) in loaded.samples {
            let key = if qualify {
                format!("{}/{file}", loaded.label)
            } else {
                file
            };
            collection
                .insert(key, table)
                .with_context(|| format!("adding samples of {}", folder.display()))?;
            labels.push(loaded.label.clone());
        }
    }
    Ok((collection, labels))
}

pub fn run(options: &RunOptions) -> Result<RunReport> {
    let config = &options.config;
    if config.window_size == 0 {
        return Err(SpectrumError::InvalidWindowSize(config.window_size))
            .context("checking configuration");
    }
    let name = match &options.name {
        Some(n) => n.clone(),
        None => run_name(&options.inputs)?,
    };

    let (collection, labels) = load_inputs(&options.inputs, config)?;
    let table = assemble_with(
        &collection,
        &AssembleOptions {
            strict_axis: config.strict_axis,
        },
    )
    .context("assembling spectra")?
    .with_labels(labels)
    .context("attaching class labels")?;

    info!(
        "assembled {} spectra x {} wavelengths",
        table.data_column_count(),
        table.row_count()
    );

    std::fs::create_dir_all(&options.output)
        .with_context(|| format!("creating output folder {}", options.output.display()))?;

    let mut report = RunReport {
        name: name.clone(),
        samples: table.data_column_count(),
        rows: table.row_count(),
        ..RunReport::default()
    };

    write_tables(&options.output, &name, &table, config, &mut report)?;

    if config.figures {
        render_figures(&options.output, &name, &table, config, &mut report)?;
    } else {
        debug!("figures disabled");
    }

    Ok(report)
}

fn write_tables(
    out: &Path,
    name: &str,
    table: &WideSpectrumTable,
    config: &AnalysisConfig,
    report: &mut RunReport,
) -> Result<()> {
    let wide = out.join(format!("{name}_concatenated_spectrums.csv"));
    export::write_wide_csv(&wide, table)?;
    report.outputs.push(wide);

    let summary = out.join(format!("{name}_boxplot_stats.csv"));
    export::write_summary_csv(&summary, &stats::describe_table(table))?;
    report.outputs.push(summary);

    let labels_path = out.join(format!("{name}_class_labels.csv"));
    if export::write_labels_csv(&labels_path, table)? {
        report.outputs.push(labels_path);
    }

    if let Some(labels) = table.labels() {
        let groups = stats::group_summaries(table.columns(), labels);
        report.classes = groups.len();
        for (label, s) in &groups {
            debug!(
                "class '{label}': {} values, median {:.4}, IQR {:.4}..{:.4}",
                s.count, s.median, s.q25, s.q75
            );
        }
        let class_stats = out.join(format!("{name}_class_stats.csv"));
        export::write_summary_csv(&class_stats, &groups)?;
        report.outputs.push(class_stats);
    }

    if config.write_parquet {
        let parquet = out.join(format!("{name}_concatenated_spectrums.parquet"));
        export::write_parquet(&parquet, table)?;
        report.outputs.push(parquet);
    }

    info!("wrote {} table file(s) to {}", report.outputs.len(), out.display());
    Ok(())
}

fn render_figures(
    out: &Path,
    name: &str,
    table: &WideSpectrumTable,
    config: &AnalysisConfig,
    report: &mut RunReport,
) -> Result<()> {
    let overlay = out.join(format!("{name}.png"));
    plot::plot_overlay(&overlay, name, table, config.overlay_size)
        .with_context(|| format!("rendering {}", overlay.display()))?;
    report.outputs.push(overlay);

    let partition = partition_with(table, config.window_size, config.remainder)
        .context("partitioning spectra into windows")?;
    if partition.dropped_columns() > 0 {
        warn!(
            "{} trailing spectra do not fill a window of {} and are left out of the box plots",
            partition.dropped_columns(),
            config.window_size
        );
    }
    report.windows = partition.len();
    report.dropped_columns = partition.dropped_columns();

    let colors = ColorMap::new(table.labels().unwrap_or_default().iter().map(String::as_str));
    let shared = if config.shared_box_range {
        table.value_range()
    } else {
        None
    };
    for window in &partition {
        let path = out.join(format!("{}.png", window.index()));
        match boxplot::plot_window(&path, &window, &colors, shared, config.boxplot_size) {
            Ok(()) => report.outputs.push(path),
            Err(render::RenderError::EmptyData(what)) => {
                warn!("skipping {what}: no finite values");
            }
            Err(e) => return Err(e).with_context(|| format!("rendering {}", path.display())),
        }
    }

    if config.individual_plots {
        for column in table.columns() {
            let path = out.join(render::image_file_name(&column.name));
            match plot::plot_spectrum(
                &path,
                &column.name,
                table.wavelength(),
                &column.values,
                config.spectrum_size,
            ) {
                Ok(()) => report.outputs.push(path),
                Err(render::RenderError::EmptyData(what)) => {
                    warn!("skipping spectrum {what}: no finite values");
                }
                Err(e) => return Err(e).with_context(|| format!("rendering {}", path.display())),
            }
        }
    }

    info!(
        "rendered {} box plot window(s) for {} spectra",
        report.windows, report.samples
    );
    Ok(())
}
