//! End-to-end run: load, reshape, write.

use tracing::info_span;

use crate::config::PipelineConfig;
use crate::error::MetadataResult;
use crate::ingestion::{load_from_path, LoadOptions, ReshapeSummary, Stage};
use crate::output::MetadataDocument;
use crate::processing::reshape;

/// Run the whole transform for one input file.
///
/// Loads `config.input_path`, reshapes it into subject metadata, wraps that under
/// `config.hierarchy_level` and writes the document to `config.output_path`. The first failing
/// stage stops the run; nothing is written unless reshaping succeeded.
///
/// Stage outcomes are reported to `options.observer` when one is configured.
///
/// # Examples
///
/// ```no_run
/// use spreadsheet_metadata::config::PipelineConfig;
/// use spreadsheet_metadata::ingestion::LoadOptions;
/// use spreadsheet_metadata::pipeline;
///
/// # fn main() -> Result<(), spreadsheet_metadata::MetadataError> {
/// let config = PipelineConfig::new("subjects.csv", "subject", "out/.metadata.json")?;
/// let doc = pipeline::run(&config, &LoadOptions::default())?;
/// println!("{} entries", doc.info.len());
/// # Ok(())
/// # }
/// ```
pub fn run(config: &PipelineConfig, options: &LoadOptions) -> MetadataResult<MetadataDocument> {
    let _span = info_span!(
        "metadata",
        input = %config.input_name,
        level = %config.hierarchy_level
    )
    .entered();

    let table = load_from_path(&config.input_path, options)?;

    let info = reshape(&table).inspect_err(|e| options.report_failure(Stage::Reshape, e))?;
    if let Some(obs) = options.observer.as_ref() {
        obs.on_reshaped(ReshapeSummary {
            shape: info.shape(),
            entries: info.len(),
        });
    }

    let document = MetadataDocument::new(config.hierarchy_level.clone(), info);
    document
        .write_metadata(&config.output_path)
        .inspect_err(|e| options.report_failure(Stage::Write, e))?;
    if let Some(obs) = options.observer.as_ref() {
        obs.on_written(&config.output_path);
    }

    Ok(document)
}
