//! The metadata document and its on-disk JSON form.
//!
//! A document always has the shape `{ <hierarchy_level>: { "info": <subject metadata> } }`.
//! Keys are sorted, the layout is fixed by [`MetadataFormatter`], and the file carries no
//! trailing newline.

pub mod formatter;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::MetadataResult;
use crate::processing::SubjectInfo;

pub use formatter::MetadataFormatter;

/// Subject metadata attached to one level of the containing hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    /// Hierarchy level label, used as the single top-level key.
    pub hierarchy_level: String,
    /// Reshaped subject metadata, stored under `"info"`.
    pub info: SubjectInfo,
}

#[derive(Serialize)]
struct LevelEntry<'a> {
    info: &'a SubjectInfo,
}

impl Serialize for MetadataDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.hierarchy_level, &LevelEntry { info: &self.info })?;
        map.end()
    }
}

impl MetadataDocument {
    /// Create a document for `hierarchy_level`.
    pub fn new(hierarchy_level: impl Into<String>, info: SubjectInfo) -> Self {
        Self {
            hierarchy_level: hierarchy_level.into(),
            info,
        }
    }

    /// Serialize the document into `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> MetadataResult<()> {
        let mut ser = serde_json::Serializer::with_formatter(writer, MetadataFormatter::new());
        self.serialize(&mut ser)?;
        Ok(())
    }

    /// Render the document as a JSON string.
    pub fn to_json_string(&self) -> MetadataResult<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        // The formatter escapes everything outside ASCII.
        let text = String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(text)
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// The file handle is flushed and closed before returning, on success and on failure.
    pub fn write_metadata(&self, path: impl AsRef<Path>) -> MetadataResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
