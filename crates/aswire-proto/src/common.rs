//! Flat records shared by many requests and notifications.

use aswire_core::{open_enum, protocol_object};

open_enum! {
    /// Severity of an `AnalysisError`.
    pub struct AnalysisErrorSeverity {
        INFO = "INFO",
        WARNING = "WARNING",
        ERROR = "ERROR",
    }
}

open_enum! {
    /// Category of an `AnalysisError`.
    pub struct AnalysisErrorType {
        CHECKED_MODE_COMPILE_TIME_ERROR = "CHECKED_MODE_COMPILE_TIME_ERROR",
        COMPILE_TIME_ERROR = "COMPILE_TIME_ERROR",
        HINT = "HINT",
        LINT = "LINT",
        STATIC_TYPE_WARNING = "STATIC_TYPE_WARNING",
        STATIC_WARNING = "STATIC_WARNING",
        SYNTACTIC_ERROR = "SYNTACTIC_ERROR",
        TODO = "TODO",
    }
}

open_enum! {
    /// Whether a file is a library or a part.
    pub struct FileKind {
        LIBRARY = "LIBRARY",
        PART = "PART",
    }
}

open_enum! {
    pub struct FoldingKind {
        ANNOTATIONS = "ANNOTATIONS",
        BLOCK = "BLOCK",
        CLASS_BODY = "CLASS_BODY",
        COMMENT = "COMMENT",
        DIRECTIVES = "DIRECTIVES",
        DOCUMENTATION_COMMENT = "DOCUMENTATION_COMMENT",
        FILE_HEADER = "FILE_HEADER",
        FUNCTION_BODY = "FUNCTION_BODY",
        INVOCATION = "INVOCATION",
        LITERAL = "LITERAL",
        PARAMETERS = "PARAMETERS",
    }
}

open_enum! {
    pub struct HighlightRegionType {
        ANNOTATION = "ANNOTATION",
        BUILT_IN = "BUILT_IN",
        CLASS = "CLASS",
        COMMENT_BLOCK = "COMMENT_BLOCK",
        COMMENT_DOCUMENTATION = "COMMENT_DOCUMENTATION",
        COMMENT_END_OF_LINE = "COMMENT_END_OF_LINE",
        CONSTRUCTOR = "CONSTRUCTOR",
        ENUM = "ENUM",
        ENUM_CONSTANT = "ENUM_CONSTANT",
        FUNCTION_TYPE_ALIAS = "FUNCTION_TYPE_ALIAS",
        IDENTIFIER_DEFAULT = "IDENTIFIER_DEFAULT",
        IMPORT_PREFIX = "IMPORT_PREFIX",
        KEYWORD = "KEYWORD",
        LABEL = "LABEL",
        LITERAL_BOOLEAN = "LITERAL_BOOLEAN",
        LITERAL_DOUBLE = "LITERAL_DOUBLE",
        LITERAL_INTEGER = "LITERAL_INTEGER",
        LITERAL_LIST = "LITERAL_LIST",
        LITERAL_MAP = "LITERAL_MAP",
        LITERAL_STRING = "LITERAL_STRING",
        LOCAL_VARIABLE_DECLARATION = "LOCAL_VARIABLE_DECLARATION",
        LOCAL_VARIABLE_REFERENCE = "LOCAL_VARIABLE_REFERENCE",
        PARAMETER_DECLARATION = "PARAMETER_DECLARATION",
        PARAMETER_REFERENCE = "PARAMETER_REFERENCE",
        TOP_LEVEL_FUNCTION_DECLARATION = "TOP_LEVEL_FUNCTION_DECLARATION",
        TOP_LEVEL_FUNCTION_REFERENCE = "TOP_LEVEL_FUNCTION_REFERENCE",
        TYPE_NAME_DYNAMIC = "TYPE_NAME_DYNAMIC",
        TYPE_PARAMETER = "TYPE_PARAMETER",
        UNRESOLVED_INSTANCE_MEMBER_REFERENCE = "UNRESOLVED_INSTANCE_MEMBER_REFERENCE",
        VALID_STRING_ESCAPE = "VALID_STRING_ESCAPE",
    }
}

open_enum! {
    pub struct LinkedEditSuggestionKind {
        METHOD = "METHOD",
        PARAMETER = "PARAMETER",
        TYPE = "TYPE",
        VARIABLE = "VARIABLE",
    }
}

protocol_object! {
    /// A position in a file.
    #[derive(Eq, Hash)]
    pub struct Position {
        required file: String = "file",
        required offset: i64 = "offset",
    }
}

protocol_object! {
    /// A location (character range) within a file.
    #[derive(Eq, Hash)]
    pub struct Location {
        required file: String = "file",
        required offset: i64 = "offset",
        required length: i64 = "length",
        /// One-based line of the first character.
        required start_line: i64 = "startLine",
        /// One-based column of the first character.
        required start_column: i64 = "startColumn",
        optional end_line: i64 = "endLine",
        optional end_column: i64 = "endColumn",
    }
}

protocol_object! {
    /// A single textual replacement.
    #[derive(Eq, Hash)]
    pub struct SourceEdit {
        required offset: i64 = "offset",
        required length: i64 = "length",
        required replacement: String = "replacement",
        optional id: String = "id",
        optional description: String = "description",
    }
}

protocol_object! {
    /// Edits to one file. `file_stamp` is the modification stamp the edits
    /// were computed against, or -1 for a file that does not exist yet.
    #[derive(Eq, Hash)]
    pub struct SourceFileEdit {
        required file: String = "file",
        required file_stamp: i64 = "fileStamp",
        required edits: Vec<SourceEdit> = "edits",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct LinkedEditSuggestion {
        required value: String = "value",
        required kind: LinkedEditSuggestionKind = "kind",
    }
}

protocol_object! {
    /// Positions that must be edited together.
    #[derive(Eq, Hash)]
    pub struct LinkedEditGroup {
        required positions: Vec<Position> = "positions",
        required length: i64 = "length",
        required suggestions: Vec<LinkedEditSuggestion> = "suggestions",
    }
}

protocol_object! {
    /// A set of edits implementing one conceptual change.
    #[derive(Eq, Hash)]
    pub struct SourceChange {
        required message: String = "message",
        required edits: Vec<SourceFileEdit> = "edits",
        required linked_edit_groups: Vec<LinkedEditGroup> = "linkedEditGroups",
        optional selection: Position = "selection",
        optional selection_length: i64 = "selectionLength",
        optional id: String = "id",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct DiagnosticMessage {
        required message: String = "message",
        required location: Location = "location",
    }
}

protocol_object! {
    /// An error, warning, hint or lint reported by the analyzer.
    #[derive(Eq, Hash)]
    pub struct AnalysisError {
        required severity: AnalysisErrorSeverity = "severity",
        required error_type: AnalysisErrorType = "type",
        required location: Location = "location",
        required message: String = "message",
        optional correction: String = "correction",
        required code: String = "code",
        optional url: String = "url",
        optional context_messages: Vec<DiagnosticMessage> = "contextMessages",
        optional has_fix: bool = "hasFix",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct HighlightRegion {
        required region_type: HighlightRegionType = "type",
        required offset: i64 = "offset",
        required length: i64 = "length",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct FoldingRegion {
        required kind: FoldingKind = "kind",
        required offset: i64 = "offset",
        required length: i64 = "length",
    }
}

protocol_object! {
    /// Params of the `analysis.errors` notification.
    #[derive(Eq, Hash)]
    pub struct AnalysisErrorsParams {
        required file: String = "file",
        required errors: Vec<AnalysisError> = "errors",
    }
}

protocol_object! {
    /// Params of the `analysis.highlights` notification.
    #[derive(Eq, Hash)]
    pub struct AnalysisHighlightsParams {
        required file: String = "file",
        required regions: Vec<HighlightRegion> = "regions",
    }
}

protocol_object! {
    /// Params of the `analysis.folding` notification.
    #[derive(Eq, Hash)]
    pub struct AnalysisFoldingParams {
        required file: String = "file",
        required regions: Vec<FoldingRegion> = "regions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aswire_core::{decode, encode, Problem};
    use serde_json::json;

    fn location_json() -> serde_json::Value {
        json!({
            "file": "/lib/a.dart",
            "offset": 10,
            "length": 4,
            "startLine": 2,
            "startColumn": 3
        })
    }

    #[test]
    fn test_location_optional_end_omitted() {
        let location: Location = decode(&location_json()).unwrap();
        assert_eq!(location.end_line, None);
        assert_eq!(encode(&location), location_json());
    }

    #[test]
    fn test_analysis_error_round_trip() {
        let json = json!({
            "severity": "WARNING",
            "type": "STATIC_WARNING",
            "location": location_json(),
            "message": "Unused import.",
            "code": "unused_import",
            "hasFix": true
        });
        let error: AnalysisError = decode(&json).unwrap();
        assert_eq!(error.severity, AnalysisErrorSeverity::WARNING);
        assert_eq!(error.has_fix, Some(true));
        assert_eq!(error.correction, None);
        let encoded = encode(&error);
        assert_eq!(encoded, json);
        assert_eq!(decode::<AnalysisError>(&encoded).unwrap(), error);
    }

    #[test]
    fn test_unknown_severity_preserved() {
        let mut json = json!({
            "severity": "FATAL",
            "type": "FUTURE_KIND",
            "location": location_json(),
            "message": "m",
            "code": "c"
        });
        let error: AnalysisError = decode(&json).unwrap();
        assert!(!error.severity.is_known());
        assert!(!error.error_type.is_known());
        assert_eq!(encode(&error), json);

        json["severity"] = json!(3);
        let err = decode::<AnalysisError>(&json).unwrap_err();
        assert_eq!(err.path(), Some("$.severity"));
    }

    #[test]
    fn test_nested_missing_field_reports_nested_type() {
        let json = json!({
            "message": "m",
            "location": {"file": "/a.dart", "offset": 1, "length": 1, "startLine": 1}
        });
        let err = decode::<DiagnosticMessage>(&json).unwrap_err();
        assert_eq!(err.type_name(), Some("Location"));
        assert_eq!(err.path(), Some("$.location"));
        assert_eq!(err.problem(), Some(&Problem::MissingField("startColumn")));
    }

    #[test]
    fn test_source_change_round_trip() {
        let json = json!({
            "message": "Rename",
            "edits": [{
                "file": "/a.dart",
                "fileStamp": -1,
                "edits": [{"offset": 0, "length": 3, "replacement": "bar"}]
            }],
            "linkedEditGroups": [{
                "positions": [{"file": "/a.dart", "offset": 0}],
                "length": 3,
                "suggestions": [{"value": "baz", "kind": "VARIABLE"}]
            }],
            "selection": {"file": "/a.dart", "offset": 3}
        });
        let change: SourceChange = decode(&json).unwrap();
        assert_eq!(change.edits[0].file_stamp, -1);
        assert_eq!(change.selection_length, None);
        assert_eq!(encode(&change), json);
    }
}
