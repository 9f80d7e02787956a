//! In-memory transformations from a loaded [`crate::types::Table`] to subject metadata.
//!
//! - [`normalize()`]: render a single cell as metadata text
//! - [`reshape()`]: detect single- vs multi-subject layout and build [`SubjectInfo`]
//!
//! ## Example: one subject with a multi-valued column
//!
//! ```rust
//! use spreadsheet_metadata::processing::{reshape, InfoValue, SubjectInfo};
//! use spreadsheet_metadata::types::{Column, Table, Value};
//!
//! let table = Table::new(vec![
//!     Column::new("name", vec![Value::Text("Alice".into()), Value::Missing]),
//!     Column::new("tags", vec![Value::Text("x".into()), Value::Text("y".into())]),
//! ]);
//!
//! let SubjectInfo::Single(fields) = reshape(&table).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(fields["name"], InfoValue::Scalar("Alice".into()));
//! assert_eq!(
//!     fields["tags"],
//!     InfoValue::List(vec![Value::Text("x".into()), Value::Text("y".into())])
//! );
//! ```

pub mod normalize;
pub mod reshape;

pub use normalize::normalize;
pub use reshape::{reshape, subject_count, InfoValue, SubjectInfo, SubjectShape};
