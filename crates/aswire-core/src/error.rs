//! Decode error taxonomy.

use thiserror::Error;

/// Result alias used across the codec.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error returned when a protocol message cannot be decoded.
///
/// Every variant is local to the message being decoded: nothing is retried
/// and no other decode is affected.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed {type_name} at {path}: {problem}")]
    MalformedMessage {
        type_name: &'static str,
        path: String,
        problem: Problem,
    },

    #[error(
        "ambiguous {type_name} at {path}: alternatives {} are present at the same time",
        .alternatives.join(", ")
    )]
    AmbiguousUnion {
        type_name: &'static str,
        path: String,
        alternatives: Vec<&'static str>,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The malformation, if this is a `MalformedMessage`.
    #[must_use]
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::MalformedMessage { problem, .. } => Some(problem),
            _ => None,
        }
    }

    /// Name of the protocol type that was being decoded.
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::MalformedMessage { type_name, .. } | Self::AmbiguousUnion { type_name, .. } => {
                Some(type_name)
            }
            Self::Json(_) => None,
        }
    }

    /// JSON path of the offending value.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MalformedMessage { path, .. } | Self::AmbiguousUnion { path, .. } => Some(path),
            Self::Json(_) => None,
        }
    }

    /// Stable machine-readable code for reports.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedMessage { .. } => codes::MALFORMED_MESSAGE,
            Self::AmbiguousUnion { .. } => codes::AMBIGUOUS_UNION,
            Self::Json(_) => codes::INVALID_JSON,
        }
    }
}

/// Stable error codes.
pub mod codes {
    pub const MALFORMED_MESSAGE: &str = "MALFORMED_MESSAGE";
    pub const AMBIGUOUS_UNION: &str = "AMBIGUOUS_UNION";
    pub const INVALID_JSON: &str = "INVALID_JSON";
}

/// What exactly is wrong with a malformed message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: String,
    },

    #[error("unknown `{key}` tag {found:?}")]
    UnknownTag { key: &'static str, found: String },

    #[error("none of the alternatives {} is present", .0.join(", "))]
    MissingAlternative(&'static [&'static str]),

    #[error("index {index} is outside table `{table}` of length {len}")]
    IndexOutOfRange {
        table: &'static str,
        index: i64,
        len: usize,
    },

    #[error("`{left}` has {left_len} entries but `{right}` has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("string {0:?} appears more than once in the string table")]
    DuplicateString(String),

    #[error("id {0} appears more than once")]
    DuplicateId(i64),

    #[error("range at {offset} has negative length {length}")]
    NegativeLength { offset: i64, length: i64 },

    #[error(
        "range [{offset}, {end}) is not contained in parent range [{parent_offset}, {parent_end})"
    )]
    RangeNotContained {
        offset: i64,
        end: i64,
        parent_offset: i64,
        parent_end: i64,
    },

    #[error("range at {offset} starts before the previous sibling at {previous_offset}")]
    SiblingOutOfOrder { offset: i64, previous_offset: i64 },

    #[error("range [{offset}, {end}) starts before the previous sibling ends at {previous_end}")]
    SiblingOverlap {
        offset: i64,
        end: i64,
        previous_end: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_type_and_field() {
        let err = Error::MalformedMessage {
            type_name: "Location",
            path: "$.location".to_string(),
            problem: Problem::MissingField("offset"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Location"));
        assert!(msg.contains("$.location"));
        assert!(msg.contains("`offset`"));
        assert_eq!(err.code(), codes::MALFORMED_MESSAGE);
    }

    #[test]
    fn test_ambiguous_union_lists_alternatives() {
        let err = Error::AmbiguousUnion {
            type_name: "FlutterWidgetPropertyValue",
            path: "$".to_string(),
            alternatives: vec!["boolValue", "intValue"],
        };
        assert!(err.to_string().contains("boolValue, intValue"));
        assert_eq!(err.type_name(), Some("FlutterWidgetPropertyValue"));
        assert!(err.problem().is_none());
    }

    #[test]
    fn test_json_error_has_no_path() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), codes::INVALID_JSON);
        assert!(err.path().is_none());
    }
}
