//! Command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use crate::config::AnalysisConfig;
use crate::data::RemainderPolicy;
use crate::pipeline::{self, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "spectral-analysis")]
#[command(about = "Spectral signal analysis: concatenate, describe and plot reflectance spectra", version)]
pub struct Cli {
    /// Folder(s) holding one spectrum file per sample; the folder name is the class label
    #[arg(short, long = "input-folder", required = true, num_args = 1..)]
    pub input_folder: Vec<PathBuf>,

    /// Folder where tables and figures are written
    #[arg(short, long = "output-folder", default_value = ".")]
    pub output_folder: PathBuf,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prefix of the output files (defaults to the input folder name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Spectra per box-plot image
    #[arg(short, long)]
    pub window_size: Option<usize>,

    /// Render the trailing spectra that do not fill a window as a short window
    #[arg(long)]
    pub keep_remainder: bool,

    /// Fail when samples do not share the same wavelength values
    #[arg(long)]
    pub strict_axis: bool,

    /// Also render one image per spectrum
    #[arg(long)]
    pub individual: bool,

    /// Also write the concatenated table as Parquet
    #[arg(long)]
    pub parquet: bool,

    /// Only write tables, no images
    #[arg(long)]
    pub no_figures: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Config file (or defaults) with the command line flags applied on top.
    pub fn resolve_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let cfg = AnalysisConfig::from_json_file(path)?;
                info!("Loaded config from: {}", path.display());
                cfg
            }
            None => AnalysisConfig::default(),
        };

        if let Some(size) = self.window_size {
            config.window_size = size;
        }
        if self.keep_remainder {
            config.remainder = RemainderPolicy::Keep;
        }
        config.strict_axis |= self.strict_axis;
        config.individual_plots |= self.individual;
        config.write_parquet |= self.parquet;
        if self.no_figures {
            config.figures = false;
        }
        Ok(config)
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    let start = Instant::now();
    let result = cli.resolve_config().and_then(|config| {
        pipeline::run(&RunOptions {
            inputs: cli.input_folder.clone(),
            output: cli.output_folder.clone(),
            name: cli.name.clone(),
            config,
        })
    });

    match result {
        Ok(report) => {
            info!(
                "'{}': {} spectra, {} wavelengths, {} class(es), {} window(s), {} file(s) in {:.2?}",
                report.name,
                report.samples,
                report.rows,
                report.classes,
                report.windows,
                report.outputs.len(),
                start.elapsed()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
