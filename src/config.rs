//! Run configuration.
//!
//! [`PipelineConfig`] is what [`crate::pipeline::run`] takes. It can be built directly or read
//! from the job configuration document the hosting platform drops next to the job:
//!
//! ```json
//! {
//!     "inputs": {
//!         "spreadsheet-file": {
//!             "location": {"path": "/work/input/subjects.xlsx", "name": "subjects.xlsx"},
//!             "hierarchy": {"type": "subject"}
//!         }
//!     }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MetadataError, MetadataResult};

/// Default location of the job configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "/flywheel/v0/config.json";

/// Default directory the metadata document is written to.
pub const DEFAULT_OUTPUT_DIR: &str = "/flywheel/v0/output";

/// File name of the metadata document inside the output directory.
pub const METADATA_FILE_NAME: &str = ".metadata.json";

/// Explicit parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Spreadsheet or CSV file to read.
    pub input_path: PathBuf,
    /// Display name of the input file.
    pub input_name: String,
    /// Hierarchy level the metadata attaches to (top-level key of the document).
    pub hierarchy_level: String,
    /// Where the metadata document is written.
    pub output_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct JobConfig {
    inputs: JobInputs,
}

#[derive(Debug, Deserialize)]
struct JobInputs {
    #[serde(rename = "spreadsheet-file")]
    spreadsheet_file: FileInput,
}

#[derive(Debug, Deserialize)]
struct FileInput {
    location: FileLocation,
    hierarchy: Hierarchy,
}

#[derive(Debug, Deserialize)]
struct FileLocation {
    path: PathBuf,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Hierarchy {
    #[serde(rename = "type")]
    level: String,
}

impl PipelineConfig {
    /// Build a config from explicit values; the display name is the input's file name.
    pub fn new(
        input_path: impl Into<PathBuf>,
        hierarchy_level: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> MetadataResult<Self> {
        let input_path = input_path.into();
        let input_name = display_name(&input_path);
        Self::validated(input_path, input_name, hierarchy_level.into(), output_path.into())
    }

    /// Read the job configuration document at `config_path`.
    ///
    /// The metadata document goes to `<output_dir>/.metadata.json`.
    pub fn from_job_config_file(
        config_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> MetadataResult<Self> {
        let text = fs::read_to_string(config_path)?;
        Self::from_job_config_str(&text, output_dir)
    }

    /// Parse a job configuration document from a string.
    pub fn from_job_config_str(text: &str, output_dir: impl AsRef<Path>) -> MetadataResult<Self> {
        let job: JobConfig = serde_json::from_str(text)?;
        let input = job.inputs.spreadsheet_file;
        let input_name = input
            .location
            .name
            .unwrap_or_else(|| display_name(&input.location.path));
        Self::validated(
            input.location.path,
            input_name,
            input.hierarchy.level,
            output_dir.as_ref().join(METADATA_FILE_NAME),
        )
    }

    fn validated(
        input_path: PathBuf,
        input_name: String,
        hierarchy_level: String,
        output_path: PathBuf,
    ) -> MetadataResult<Self> {
        if input_path.as_os_str().is_empty() {
            return Err(MetadataError::Config {
                message: "input file path is empty".to_string(),
            });
        }
        let hierarchy_level = hierarchy_level.trim().to_string();
        if hierarchy_level.is_empty() {
            return Err(MetadataError::Config {
                message: "hierarchy level is empty".to_string(),
            });
        }
        Ok(Self {
            input_path,
            input_name,
            hierarchy_level,
            output_path,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::PipelineConfig;
    use crate::error::MetadataError;

    const JOB: &str = r#"{
        "config": {},
        "inputs": {
            "spreadsheet-file": {
                "base": "file",
                "location": {"path": "/work/input/file/subjects.xlsx", "name": "subjects.xlsx"},
                "hierarchy": {"type": "session", "id": "abc123"}
            }
        }
    }"#;

    #[test]
    fn reads_input_and_hierarchy_from_job_config() {
        let cfg = PipelineConfig::from_job_config_str(JOB, "/work/output").unwrap();
        assert_eq!(cfg.input_path, PathBuf::from("/work/input/file/subjects.xlsx"));
        assert_eq!(cfg.input_name, "subjects.xlsx");
        assert_eq!(cfg.hierarchy_level, "session");
        assert_eq!(cfg.output_path, PathBuf::from("/work/output/.metadata.json"));
    }

    #[test]
    fn missing_input_section_is_a_json_error() {
        let err = PipelineConfig::from_job_config_str(r#"{"inputs": {}}"#, "/out").unwrap_err();
        assert!(matches!(err, MetadataError::Json(_)));
    }

    #[test]
    fn blank_hierarchy_level_is_rejected() {
        let err = PipelineConfig::new("a.csv", "  ", "/out/.metadata.json").unwrap_err();
        assert!(err.to_string().contains("hierarchy level is empty"));
    }

    #[test]
    fn explicit_config_derives_display_name() {
        let cfg = PipelineConfig::new("/data/people.csv", "subject", "/out/meta.json").unwrap();
        assert_eq!(cfg.input_name, "people.csv");
    }
}
