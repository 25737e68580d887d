//! `aswire decode`: validate protocol messages and print their normalized
//! re-encoding.

use crate::config::Config;
use aswire_core::{DecodeConfig, Error, RangeViolation};
use aswire_proto::registry::{self, TypeEntry};
use miette::{miette, IntoDiagnostic, Result};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

const DECODE_SCHEMA_VERSION: u32 = 1;

/// Error code for input that could not be read at all.
const READ_FAILED: &str = "READ_FAILED";

/// Warning code for a flagged tree range.
const RANGE_VIOLATION: &str = "RANGE_VIOLATION";

#[derive(Serialize)]
struct DecodeReport {
    schema_version: u32,
    ok: bool,
    files: Vec<FileReport>,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<WarningJson>,
}

/// A tree range problem accepted under `--range-policy flag`.
#[derive(Serialize)]
struct WarningJson {
    code: &'static str,
    message: String,
    path: String,
}

impl From<&RangeViolation> for WarningJson {
    fn from(violation: &RangeViolation) -> Self {
        Self {
            code: RANGE_VIOLATION,
            message: violation.problem.to_string(),
            path: violation.path.clone(),
        }
    }
}

#[derive(Serialize)]
struct ErrorJson {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl From<&Error> for ErrorJson {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            type_name: err.type_name(),
            path: err.path().map(str::to_string),
        }
    }
}

/// Run the decode command over `files`. `-` reads stdin.
///
/// Without `type_name`, every file must hold a whole message envelope and
/// its kind is detected from its keys.
pub fn run(files: &[PathBuf], type_name: Option<&str>, config: &Config) -> Result<()> {
    let entry = type_name.map(lookup_type).transpose()?;
    if files.iter().filter(|f| is_stdin(f)).count() > 1 {
        return Err(miette!("stdin (`-`) can only be given once"));
    }

    let stdin = if files.iter().any(|f| is_stdin(f)) {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).into_diagnostic()?;
        Some(text)
    } else {
        None
    };

    let decode = &config.decode;
    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|file| {
            let text = match &stdin {
                Some(text) if is_stdin(file) => Ok(text.clone()),
                _ => std::fs::read_to_string(file),
            };
            decode_one(file, text, entry, decode)
        })
        .collect();

    let ok = reports.iter().all(|r| r.ok);
    tracing::debug!(
        files = reports.len(),
        failed = reports.iter().filter(|r| !r.ok).count(),
        "decode finished"
    );

    if config.json {
        let report = DecodeReport {
            schema_version: DECODE_SCHEMA_VERSION,
            ok,
            files: reports,
        };
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    } else {
        print_human(&reports);
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn lookup_type(name: &str) -> Result<&'static TypeEntry> {
    registry::find(name).ok_or_else(|| {
        miette!(
            help = "run `aswire types` to list the known types",
            "unknown protocol type `{name}`"
        )
    })
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn decode_one(
    file: &Path,
    text: std::io::Result<String>,
    entry: Option<&TypeEntry>,
    config: &DecodeConfig,
) -> FileReport {
    let name = file.display().to_string();
    let text = match text {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(file = %name, error = %err, "read failed");
            return FileReport {
                file: name,
                ok: false,
                normalized: None,
                error: Some(ErrorJson {
                    code: READ_FAILED,
                    message: err.to_string(),
                    type_name: None,
                    path: None,
                }),
                warnings: Vec::new(),
            };
        }
    };

    let result = serde_json::from_str::<Value>(&text)
        .map_err(Error::from)
        .and_then(|value| match entry {
            Some(entry) => entry.normalize(&value, config),
            None => registry::normalize_message(&value, config),
        });

    match result {
        Ok(normalized) => {
            for violation in &normalized.violations {
                tracing::warn!(
                    file = %name,
                    path = %violation.path,
                    problem = %violation.problem,
                    "range violation accepted"
                );
            }
            tracing::debug!(file = %name, "decoded");
            FileReport {
                file: name,
                ok: true,
                warnings: normalized.violations.iter().map(WarningJson::from).collect(),
                normalized: Some(normalized.value),
                error: None,
            }
        }
        Err(err) => {
            tracing::warn!(file = %name, code = err.code(), error = %err, "decode failed");
            FileReport {
                file: name,
                ok: false,
                normalized: None,
                error: Some(ErrorJson::from(&err)),
                warnings: Vec::new(),
            }
        }
    }
}

fn print_human(reports: &[FileReport]) {
    let single = reports.len() == 1;
    for report in reports {
        for warning in &report.warnings {
            eprintln!("warning: {}: {} at {}", report.file, warning.message, warning.path);
        }
        match (&report.normalized, &report.error) {
            (Some(normalized), _) if single => println!("{normalized}"),
            (Some(normalized), _) => println!("{}: {normalized}", report.file),
            (None, Some(error)) => eprintln!("error: {}: {}", report.file, error.message),
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: &str, entry: Option<&TypeEntry>) -> FileReport {
        decode_one(
            Path::new("msg.json"),
            Ok(text.to_string()),
            entry,
            &DecodeConfig::default(),
        )
    }

    #[test]
    fn test_typed_decode_normalizes() {
        let entry = registry::find("Position");
        let r = report(r#"{"offset":1,"file":"/a.dart","extra":null}"#, entry);
        assert!(r.ok);
        assert_eq!(
            r.normalized.unwrap().to_string(),
            r#"{"file":"/a.dart","offset":1}"#
        );
    }

    #[test]
    fn test_envelope_detection() {
        let r = report(r#"{"event":"server.connected","params":{"version":"1"}}"#, None);
        assert!(r.ok);
    }

    #[test]
    fn test_invalid_json_reports_code() {
        let r = report("{", None);
        assert!(!r.ok);
        assert_eq!(r.error.unwrap().code, "INVALID_JSON");
    }

    #[test]
    fn test_malformed_reports_path() {
        let entry = registry::find("Location");
        let r = report(r#"{"file":"/a.dart","offset":"x"}"#, entry);
        let error = r.error.unwrap();
        assert_eq!(error.code, "MALFORMED_MESSAGE");
        assert_eq!(error.type_name, Some("Location"));
        assert_eq!(error.path.as_deref(), Some("$.offset"));
    }

    #[test]
    fn test_flagged_ranges_become_warnings() {
        let entry = registry::find("Outline");
        let element = serde_json::json!({"kind": "CLASS", "name": "A", "flags": 0});
        let node = |offset: i64, length: i64| {
            serde_json::json!({
                "element": element.clone(),
                "offset": offset, "length": length,
                "codeOffset": offset, "codeLength": length
            })
        };
        let mut root = node(0, 20);
        root["children"] = serde_json::json!([node(2, 6), node(4, 2)]);
        let text = root.to_string();

        let strict = report(&text, entry);
        assert!(!strict.ok);
        assert!(strict.warnings.is_empty());

        let config = DecodeConfig::new().with_tree_ranges(aswire_core::RangePolicy::Flag);
        let lenient = decode_one(Path::new("o.json"), Ok(text), entry, &config);
        assert!(lenient.ok);
        assert_eq!(lenient.warnings.len(), 1);
        assert_eq!(lenient.warnings[0].code, RANGE_VIOLATION);
        assert_eq!(lenient.warnings[0].path, "$.children[1]");
    }

    #[test]
    fn test_read_failure() {
        let r = decode_one(
            Path::new("missing.json"),
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
            None,
            &DecodeConfig::default(),
        );
        assert_eq!(r.error.unwrap().code, READ_FAILED);
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        assert!(lookup_type("Nope").is_err());
        assert!(lookup_type("Element").is_ok());
    }
}
