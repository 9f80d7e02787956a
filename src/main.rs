//! `spreadsheet-metadata`: turn one spreadsheet into a `.metadata.json` document.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use spreadsheet_metadata::config::{DEFAULT_CONFIG_PATH, DEFAULT_OUTPUT_DIR, METADATA_FILE_NAME, PipelineConfig};
use spreadsheet_metadata::ingestion::{LoadOptions, TracingObserver};
use spreadsheet_metadata::logging::{LogConfig, LogFormat, init_logging};
use spreadsheet_metadata::pipeline;

#[derive(Parser)]
#[command(
    name = "spreadsheet-metadata",
    version,
    about = "Convert a spreadsheet or CSV file into a metadata JSON document",
    long_about = "Convert a spreadsheet (.xls/.xlsx) or CSV file into a metadata JSON document.\n\n\
                  By default the input file and hierarchy level are read from the job \
                  configuration document. Use --input and --hierarchy-level to bypass it."
)]
struct Cli {
    /// Job configuration document naming the input file and hierarchy level.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory the metadata document is written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Read this file directly instead of the one named in the job configuration.
    #[arg(long, value_name = "FILE", requires = "hierarchy_level")]
    input: Option<PathBuf>,

    /// Hierarchy level label used with --input.
    #[arg(long = "hierarchy-level", value_name = "LABEL", requires = "input")]
    hierarchy_level: Option<String>,

    /// Output file used with --input (default: <DIR>/.metadata.json).
    #[arg(long, value_name = "FILE", requires = "input")]
    output: Option<PathBuf>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    log_format: LogFormatArg,

    /// Adjust log verbosity (-v for debug, -q for warnings only).
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        format: cli.log_format.into(),
        use_env_filter: !cli.verbosity.is_present(),
        with_ansi: io::stderr().is_terminal(),
    };
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match (&cli.input, &cli.hierarchy_level) {
        (Some(input), Some(level)) => {
            let output = cli
                .output
                .clone()
                .unwrap_or_else(|| cli.output_dir.join(METADATA_FILE_NAME));
            PipelineConfig::new(input, level.as_str(), output)?
        }
        _ => PipelineConfig::from_job_config_file(&cli.config, &cli.output_dir)
            .with_context(|| format!("reading job configuration {}", cli.config.display()))?,
    };

    let options = LoadOptions {
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };
    let document = pipeline::run(&config, &options)
        .with_context(|| format!("processing {}", config.input_path.display()))?;

    tracing::info!(
        output = %config.output_path.display(),
        shape = ?document.info.shape(),
        entries = document.info.len(),
        "done"
    );
    Ok(())
}
