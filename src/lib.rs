//! Core of the oncutf batch renamer: the typed [`FileEntry`] record,
//! metadata field validation and the text/size formatting used by its
//! file table.

pub mod diagnostics;
pub mod elide;
pub mod file_entry;
pub mod listing;
pub mod path_utils;
pub mod util;
pub mod validate;

pub use diagnostics::{Diagnostics, NullDiagnostics, TracingDiagnostics};
pub use elide::{elide, truncate_middle};
pub use file_entry::{EntryError, FileEntry, MetadataStatus};
pub use util::{format_file_size, format_size};
pub use validate::{
    format_keywords, parse_keywords, validate_field, validate_value, MetadataField,
    ValidationResult,
};
