//! `spreadsheet-metadata` converts a single spreadsheet or CSV file into a fixed-shape JSON
//! metadata document.
//!
//! The pipeline is a single synchronous pass:
//!
//! 1. [`ingestion::load_from_path`] parses the file into a [`types::Table`] (`.csv`, `.xls`,
//!    `.xlsx`; first sheet only) and renders spreadsheet date/time columns as text.
//! 2. [`processing::reshape`] looks at the first column. One non-missing value means the sheet
//!    describes a single subject and becomes a flat map; several values mean one subject per
//!    row, keyed by that column.
//! 3. [`output::MetadataDocument`] wraps the result as
//!    `{ <hierarchy_level>: { "info": ... } }` and writes it with sorted keys and a fixed layout.
//!
//! [`pipeline::run`] does all three for a [`config::PipelineConfig`].
//!
//! ## Example
//!
//! ```rust
//! use spreadsheet_metadata::output::MetadataDocument;
//! use spreadsheet_metadata::processing::reshape;
//! use spreadsheet_metadata::types::{Column, Table, Value};
//!
//! # fn main() -> Result<(), spreadsheet_metadata::MetadataError> {
//! let table = Table::new(vec![
//!     Column::new("id", vec![Value::Int(1)]),
//!     Column::new("score", vec![Value::Float(2.0)]),
//! ]);
//! let doc = MetadataDocument::new("subject", reshape(&table)?);
//! assert_eq!(
//!     doc.to_json_string()?,
//!     "{\n    \"subject\": {\n        \"info\": {\n            \"id\": \"1\", \n            \"score\": \"2\"\n        }\n    }\n}"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: loading entrypoints, format-specific parsers, date repair, observers
//! - [`types`]: cell values, columns and tables
//! - [`processing`]: value normalization and reshaping
//! - [`output`]: the metadata document and its JSON layout
//! - [`config`]: run configuration and the job configuration document
//! - [`pipeline`]: the end-to-end run
//! - [`logging`]: `tracing` subscriber setup for the binary
//! - [`error`]: the shared error type

pub mod config;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{MetadataError, MetadataResult};
