//! Validation rules for user-editable metadata fields.
//!
//! Every rule is total: bad input produces an invalid [`ValidationResult`]
//! carrying a message meant to be shown as-is next to the edited field.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TITLE_MAX: usize = 255;
pub const ARTIST_MAX: usize = 100;
pub const COPYRIGHT_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 2000;
pub const KEYWORDS_MAX_COUNT: usize = 50;
pub const KEYWORD_MAX: usize = 30;

/// Characters that cannot appear in a title, since titles often end up in
/// generated filenames.
pub const TITLE_FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetadataField {
    Title,
    Artist,
    Author,
    Copyright,
    Description,
    Keywords,
}

impl MetadataField {
    pub const ALL: [MetadataField; 6] = [
        MetadataField::Title,
        MetadataField::Artist,
        MetadataField::Author,
        MetadataField::Copyright,
        MetadataField::Description,
        MetadataField::Keywords,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetadataField::Title => "Title",
            MetadataField::Artist => "Artist",
            MetadataField::Author => "Author",
            MetadataField::Copyright => "Copyright",
            MetadataField::Description => "Description",
            MetadataField::Keywords => "Keywords",
        }
    }

    pub fn check(self, value: &str) -> Result<(), FieldError> {
        match self {
            MetadataField::Title => check_title(value),
            MetadataField::Artist | MetadataField::Author => {
                check_max_len(self, value, ARTIST_MAX)
            }
            MetadataField::Copyright => check_max_len(self, value, COPYRIGHT_MAX),
            MetadataField::Description => check_max_len(self, value, DESCRIPTION_MAX),
            MetadataField::Keywords => check_keywords(value),
        }
    }

    pub fn validate(self, value: &str) -> ValidationResult {
        self.check(value).into()
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetadataField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} cannot be empty")]
    Empty(MetadataField),

    #[error("{field} is too long ({len} characters, maximum {max})")]
    TooLong {
        field: MetadataField,
        len: usize,
        max: usize,
    },

    #[error("{field} contains invalid characters: {found}")]
    InvalidChars { field: MetadataField, found: String },

    #[error("Too many keywords ({count}, maximum {max})")]
    TooManyKeywords { count: usize, max: usize },

    #[error("Keyword '{keyword}' is too long ({len} characters, maximum {max})")]
    KeywordTooLong {
        keyword: String,
        len: usize,
        max: usize,
    },

    #[error("Unknown metadata field: '{0}'")]
    UnknownField(String),

    #[error("{field} must be text, got {kind}")]
    NotText { field: MetadataField, kind: &'static str },
}

/// Outcome of a validation rule. `message` is empty when valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

impl From<Result<(), FieldError>> for ValidationResult {
    fn from(r: Result<(), FieldError>) -> Self {
        match r {
            Ok(()) => Self::valid(),
            Err(e) => Self::invalid(e.to_string()),
        }
    }
}

pub fn validate_title(value: &str) -> ValidationResult {
    MetadataField::Title.validate(value)
}

pub fn validate_artist(value: &str) -> ValidationResult {
    MetadataField::Artist.validate(value)
}

pub fn validate_author(value: &str) -> ValidationResult {
    MetadataField::Author.validate(value)
}

pub fn validate_copyright(value: &str) -> ValidationResult {
    MetadataField::Copyright.validate(value)
}

pub fn validate_description(value: &str) -> ValidationResult {
    MetadataField::Description.validate(value)
}

pub fn validate_keywords(value: &str) -> ValidationResult {
    MetadataField::Keywords.validate(value)
}

/// Validate by field name (`"Title"`, `"Artist"`, ...).
pub fn validate_field(name: &str, value: &str) -> ValidationResult {
    name.parse::<MetadataField>()
        .and_then(|field| field.check(value))
        .into()
}

/// Like [`validate_field`], for values coming out of an untyped metadata map.
/// Anything but a JSON string is rejected.
pub fn validate_value(name: &str, value: &Value) -> ValidationResult {
    name.parse::<MetadataField>()
        .and_then(|field| match value {
            Value::String(s) => field.check(s),
            other => Err(FieldError::NotText {
                field,
                kind: json_kind(other),
            }),
        })
        .into()
}

/// Split a comma separated keyword string, trimming and dropping empties.
pub fn parse_keywords(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn format_keywords<S: AsRef<str>>(keywords: &[S]) -> String {
    keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_title(value: &str) -> Result<(), FieldError> {
    let field = MetadataField::Title;
    let v = value.trim();
    if v.is_empty() {
        return Err(FieldError::Empty(field));
    }
    check_max_len(field, v, TITLE_MAX)?;

    let mut found: Vec<char> = Vec::new();
    for c in v.chars().filter(|c| TITLE_FORBIDDEN.contains(c)) {
        if !found.contains(&c) {
            found.push(c);
        }
    }
    if !found.is_empty() {
        let found = found
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        return Err(FieldError::InvalidChars { field, found });
    }
    Ok(())
}

fn check_max_len(field: MetadataField, value: &str, max: usize) -> Result<(), FieldError> {
    let len = value.trim().chars().count();
    if len > max {
        return Err(FieldError::TooLong { field, len, max });
    }
    Ok(())
}

fn check_keywords(value: &str) -> Result<(), FieldError> {
    let keywords = parse_keywords(value);
    if keywords.len() > KEYWORDS_MAX_COUNT {
        return Err(FieldError::TooManyKeywords {
            count: keywords.len(),
            max: KEYWORDS_MAX_COUNT,
        });
    }
    for k in keywords {
        let len = k.chars().count();
        if len > KEYWORD_MAX {
            return Err(FieldError::KeywordTooLong {
                keyword: k,
                len,
                max: KEYWORD_MAX,
            });
        }
    }
    Ok(())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_must_not_be_blank() {
        assert!(!validate_title("").is_valid);
        assert!(!validate_title("   ").is_valid);
        assert_eq!(validate_title("").message, "Title cannot be empty");
        assert_eq!(validate_title("Summer"), ValidationResult::valid());
    }

    #[test]
    fn title_length_limit() {
        assert!(validate_title(&"a".repeat(255)).is_valid);
        let r = validate_title(&"a".repeat(256));
        assert!(!r.is_valid);
        assert!(r.message.contains("256"), "{}", r.message);
        // surrounding whitespace is not counted
        assert!(validate_title(&format!("  {}  ", "a".repeat(255))).is_valid);
    }

    #[test]
    fn title_reports_forbidden_chars_once() {
        let r = validate_title("a<b>c<d?");
        assert!(!r.is_valid);
        assert_eq!(r.message, "Title contains invalid characters: < > ?");
    }

    #[test]
    fn artist_and_author_share_limit() {
        assert!(validate_artist("").is_valid);
        assert!(validate_author(&"x".repeat(100)).is_valid);
        assert!(!validate_artist(&"x".repeat(101)).is_valid);
        assert!(!validate_author(&"x".repeat(101)).is_valid);
        assert!(validate_artist(&format!("{}   ", "x".repeat(100))).is_valid);
    }

    #[test]
    fn copyright_and_description_limits() {
        assert!(validate_copyright("").is_valid);
        assert!(validate_copyright(&"c".repeat(200)).is_valid);
        assert!(!validate_copyright(&"c".repeat(201)).is_valid);

        let multi = "line one\nline two\n".repeat(50);
        assert!(validate_description(&multi).is_valid);
        assert!(validate_description(&"d".repeat(2000)).is_valid);
        assert!(!validate_description(&"d".repeat(2001)).is_valid);
    }

    #[test]
    fn keywords_parse_and_validate() {
        assert!(validate_keywords("a,b,c").is_valid);
        assert_eq!(parse_keywords("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_keywords(" a , ,b,, c ,"), vec!["a", "b", "c"]);
        assert!(parse_keywords("").is_empty());
        assert!(validate_keywords("").is_valid);
    }

    #[test]
    fn keywords_count_limit() {
        let fifty = (0..50).map(|i| format!("k{i}")).collect::<Vec<_>>().join(",");
        assert!(validate_keywords(&fifty).is_valid);

        let fifty_one = (0..51).map(|i| format!("k{i}")).collect::<Vec<_>>().join(",");
        let r = validate_keywords(&fifty_one);
        assert!(!r.is_valid);
        assert_eq!(r.message, "Too many keywords (51, maximum 50)");

        // empties do not count
        assert!(validate_keywords(&format!("{fifty},,, ,")).is_valid);
    }

    #[test]
    fn keyword_length_limit_names_keyword() {
        let long = "k".repeat(31);
        let r = validate_keywords(&format!("ok, {long}, fine"));
        assert!(!r.is_valid);
        assert!(r.message.contains(&long), "{}", r.message);
        assert!(validate_keywords(&"k".repeat(30)).is_valid);
    }

    #[test]
    fn format_keywords_joins() {
        assert_eq!(format_keywords(&["a", " b ", "", "c"]), "a, b, c");
        let empty: [&str; 0] = [];
        assert_eq!(format_keywords(&empty), "");
        assert_eq!(format_keywords(&parse_keywords("x,y")), "x, y");
    }

    #[test]
    fn dispatch_by_name() {
        assert!(!validate_field("Title", "").is_valid);
        assert!(validate_field("Artist", "").is_valid);
        assert!(validate_field("Author", "Jane").is_valid);
        assert!(validate_field("Keywords", "a,b").is_valid);
        assert!(!validate_field("Copyright", &"c".repeat(201)).is_valid);

        let r = validate_field("Rating", "5");
        assert!(!r.is_valid);
        assert_eq!(r.message, "Unknown metadata field: 'Rating'");
        // names are exact
        assert!(!validate_field("title", "x").is_valid);
    }

    #[test]
    fn non_text_values_are_invalid() {
        let r = validate_value("Artist", &json!(42));
        assert!(!r.is_valid);
        assert_eq!(r.message, "Artist must be text, got a number");
        assert!(!validate_value("Keywords", &json!(["a", "b"])).is_valid);
        assert!(!validate_value("Title", &Value::Null).is_valid);
        assert!(validate_value("Title", &json!("Fine")).is_valid);
    }

    #[test]
    fn field_names_round_trip() {
        for f in MetadataField::ALL {
            assert_eq!(f.to_string().parse::<MetadataField>(), Ok(f));
        }
    }
}
