use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::path_utils::{base_name, normalize_extension, split_extension};
use crate::util::format_size;
use crate::validate::{parse_keywords, MetadataField, ValidationResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metadata key whose truthy value marks metadata read in extended mode.
pub const EXTENDED_MARKER: &str = "__extended__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataStatus {
    #[default]
    None,
    Loaded,
    Extended,
    Modified,
}

impl MetadataStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(MetadataStatus::None),
            "loaded" => Some(MetadataStatus::Loaded),
            "extended" => Some(MetadataStatus::Extended),
            "modified" => Some(MetadataStatus::Modified),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetadataStatus::None => "none",
            MetadataStatus::Loaded => "loaded",
            MetadataStatus::Extended => "extended",
            MetadataStatus::Modified => "modified",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("legacy entry is not an object")]
    NotAnObject,

    #[error("legacy entry has no 'full_path' or 'path'")]
    MissingPath,

    #[error("legacy entry field '{field}' should be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// One file tracked by the renamer.
///
/// `filename` is always the base name of `full_path`, and `extension` is
/// always lowercase without a leading dot; constructors enforce both.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    full_path: PathBuf,
    filename: String,
    extension: String,
    size: u64,
    modified: DateTime<Utc>,
    checked: bool,
    metadata_status: MetadataStatus,
    metadata: BTreeMap<String, Value>,
}

impl FileEntry {
    /// Build an entry from explicit fields. A `filename` that disagrees with
    /// `full_path` is replaced by the real base name.
    pub fn new(full_path: impl Into<PathBuf>, filename: &str, extension: &str) -> Self {
        let full_path = full_path.into();
        let actual = base_name(&full_path);
        if actual != filename {
            tracing::trace!(given = filename, actual = %actual, "filename corrected from path");
        }

        Self {
            filename: actual,
            extension: normalize_extension(extension),
            full_path,
            size: 0,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            checked: false,
            metadata_status: MetadataStatus::None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Stat `path` and build an entry from it. Stat failures are logged and
    /// leave size 0 / modified at the epoch.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::from_path_with(path, &TracingDiagnostics)
    }

    pub fn from_path_with(path: impl AsRef<Path>, diag: &dyn Diagnostics) -> Self {
        let path = path.as_ref();
        let filename = base_name(path);
        let extension = split_extension(&filename).1.unwrap_or("").to_string();
        let entry = Self::new(path, &filename, &extension);

        match std::fs::metadata(path) {
            Ok(md) => {
                let modified = md
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                entry.with_size(md.len()).with_modified(modified)
            }
            Err(e) => {
                diag.stat_failed(path, &e);
                entry
            }
        }
    }

    /// Adapt the older untyped representation (a JSON object).
    ///
    /// Accepts `path` as an alias of `full_path` and `modified` as either an
    /// ISO-8601 string or Unix seconds. A missing `extension` is derived from
    /// the file name; a missing `metadata_status` is inferred from `metadata`.
    pub fn from_legacy(record: &Value) -> Result<Self, EntryError> {
        Self::from_legacy_with(record, &TracingDiagnostics)
    }

    pub fn from_legacy_with(record: &Value, diag: &dyn Diagnostics) -> Result<Self, EntryError> {
        let obj = record.as_object().ok_or(EntryError::NotAnObject)?;

        let full_path = field(obj, "full_path")
            .or_else(|| field(obj, "path"))
            .ok_or(EntryError::MissingPath)?
            .as_str()
            .ok_or(EntryError::InvalidField {
                field: "full_path",
                expected: "a string",
            })?;

        let given_name = opt_str(obj, "filename")?.unwrap_or("");
        let mut entry = Self::new(full_path, given_name, "");

        entry.extension = match opt_str(obj, "extension")? {
            Some(ext) => normalize_extension(ext),
            None => normalize_extension(split_extension(&entry.filename).1.unwrap_or("")),
        };

        if let Some(v) = field(obj, "size") {
            entry.size = legacy_size(v)?;
        }
        if let Some(v) = field(obj, "modified") {
            entry.modified = legacy_time(v)?;
        }
        if let Some(v) = field(obj, "checked") {
            entry.checked = v.as_bool().ok_or(EntryError::InvalidField {
                field: "checked",
                expected: "a boolean",
            })?;
        }
        if let Some(v) = field(obj, "metadata") {
            let map = v.as_object().ok_or(EntryError::InvalidField {
                field: "metadata",
                expected: "an object",
            })?;
            entry.attach_metadata(map.clone().into_iter().collect());
        }

        if let Some(raw) = opt_str(obj, "metadata_status")? {
            entry.metadata_status = MetadataStatus::parse(raw).unwrap_or_else(|| {
                diag.unknown_status(raw);
                MetadataStatus::None
            });
        }

        Ok(entry)
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn metadata_status(&self) -> MetadataStatus {
        self.metadata_status
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }

    pub fn metadata_extended(&self) -> bool {
        self.metadata.get(EXTENDED_MARKER).is_some_and(is_truthy)
    }

    /// Size column text, see [`format_size`].
    pub fn human_readable_size(&self) -> String {
        format_size(self.size)
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle_checked(&mut self) {
        self.checked = !self.checked;
    }

    /// Replace the metadata map. Status becomes `extended` when the map
    /// carries the extended marker, `loaded` otherwise, `none` if empty.
    pub fn attach_metadata(&mut self, metadata: BTreeMap<String, Value>) {
        self.metadata = metadata;
        self.metadata_status = if self.metadata.is_empty() {
            MetadataStatus::None
        } else if self.metadata_extended() {
            MetadataStatus::Extended
        } else {
            MetadataStatus::Loaded
        };
    }

    pub fn clear_metadata(&mut self) {
        self.metadata.clear();
        self.metadata_status = MetadataStatus::None;
    }

    /// Validate a user edit and, when valid, store it and mark the entry
    /// `modified`. Keywords are stored as a list. Invalid edits leave the
    /// entry untouched.
    pub fn set_metadata_field(&mut self, field: MetadataField, value: &str) -> ValidationResult {
        let result = field.validate(value);
        if !result.is_valid {
            return result;
        }

        let stored = match field {
            MetadataField::Keywords => Value::from(parse_keywords(value)),
            _ => Value::from(value.trim()),
        };
        self.metadata.insert(field.as_str().to_string(), stored);
        self.metadata_status = MetadataStatus::Modified;
        result
    }

    /// Plain JSON mapping of every field, `modified` in RFC 3339, plus the
    /// derived `has_metadata`.
    pub fn to_dict(&self) -> Value {
        json!({
            "full_path": self.full_path.to_string_lossy(),
            "filename": self.filename,
            "extension": self.extension,
            "size": self.size,
            "modified": self.modified.to_rfc3339(),
            "checked": self.checked,
            "metadata_status": self.metadata_status,
            "metadata": self.metadata,
            "has_metadata": self.has_metadata(),
        })
    }
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn opt_str<'a>(obj: &'a Map<String, Value>, key: &'static str) -> Result<Option<&'a str>, EntryError> {
    match field(obj, key) {
        None => Ok(None),
        Some(v) => v.as_str().map(Some).ok_or(EntryError::InvalidField {
            field: key,
            expected: "a string",
        }),
    }
}

// Older records sometimes carried negative or fractional sizes.
fn legacy_size(v: &Value) -> Result<u64, EntryError> {
    if let Some(n) = v.as_u64() {
        return Ok(n);
    }
    if let Some(f) = v.as_f64() {
        return Ok(if f > 0.0 { f as u64 } else { 0 });
    }
    Err(EntryError::InvalidField {
        field: "size",
        expected: "a number",
    })
}

fn legacy_time(v: &Value) -> Result<DateTime<Utc>, EntryError> {
    let bad = EntryError::InvalidField {
        field: "modified",
        expected: "an ISO-8601 timestamp or Unix seconds",
    };

    if let Some(s) = v.as_str() {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        // naive timestamps are taken as UTC
        return NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|n| n.and_utc())
            .map_err(|_| bad);
    }

    if let Some(secs) = v.as_i64() {
        return DateTime::from_timestamp(secs, 0).ok_or(bad);
    }
    if let Some(f) = v.as_f64() {
        let secs = f.floor();
        let nanos = ((f - secs) * 1e9) as u32;
        return DateTime::from_timestamp(secs as i64, nanos).ok_or(bad);
    }
    Err(bad)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
