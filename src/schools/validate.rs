use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{region_for_file, REQUIRED_FIELDS, STATUS_NEGERI};
use crate::error::Error;
use crate::hierarchy::read_json;

pub const NPSN_LEN: usize = 8;
/// Used when a file name does not identify its kecamatan.
pub const GENERIC_NAME_FRAGMENT: &str = "Kecamatan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    /// `file`, `record[3]`, `record[3].NPSN`, ...
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    /// `NPSN 20302001 appears in records 1 and 4`
    pub duplicate_npsn: Vec<String>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }
}

#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub report: ValidationReport,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        !self.report.has_errors()
    }
}

pub fn validate_npsn(npsn: &str) -> Result<(), String> {
    if npsn.is_empty() {
        return Err("NPSN is empty".to_string());
    }
    let len = npsn.chars().count();
    if len != NPSN_LEN {
        return Err(format!("NPSN must be {NPSN_LEN} digits, got {len}"));
    }
    if !npsn.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(format!("NPSN must contain only digits, got '{npsn}'"));
    }
    Ok(())
}

/// Checks every record and collects all violations; nothing stops at the first.
pub fn validate_records(records: &[Value], required_fragment: &str) -> ValidationReport {
    let mut report = ValidationReport {
        total_records: records.len(),
        ..ValidationReport::default()
    };
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in records.iter().enumerate() {
        let position = index + 1;
        let context = format!("record[{position}]");
        let Some(object) = entry.as_object() else {
            report.push(ValidationSeverity::Error, context, "record is not an object");
            report.invalid_records += 1;
            continue;
        };

        let before = report.diagnostics.len();
        validate_record(&mut report, object, position, required_fragment);
        let record_failed = report.diagnostics[before..]
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error);
        if record_failed {
            report.invalid_records += 1;
        } else {
            report.valid_records += 1;
        }

        if let Some(npsn) = object.get("NPSN").and_then(Value::as_str) {
            match first_seen.get(npsn) {
                Some(first) => {
                    let duplicate = format!("NPSN {npsn} appears in records {first} and {position}");
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.NPSN"),
                        format!("duplicate: {duplicate}"),
                    );
                    report.duplicate_npsn.push(duplicate);
                }
                None => {
                    first_seen.insert(npsn, position);
                }
            }
        }
    }

    report
}

fn validate_record(
    report: &mut ValidationReport,
    object: &Map<String, Value>,
    position: usize,
    required_fragment: &str,
) {
    let context = format!("record[{position}]");
    for field in REQUIRED_FIELDS {
        if !object.contains_key(*field) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("missing required field '{field}'"),
            );
        }
    }
    for key in object.keys() {
        if !REQUIRED_FIELDS.contains(&key.as_str()) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.{key}"),
                "unexpected field",
            );
        }
    }

    let field_context = |field: &str| format!("{context}.{field}");

    match object.get("No") {
        None => {}
        Some(Value::String(no)) if *no == position.to_string() => {}
        Some(Value::String(no)) => report.push(
            ValidationSeverity::Error,
            field_context("No"),
            format!("expected '{position}', got '{no}'"),
        ),
        Some(_) => report.push(ValidationSeverity::Error, field_context("No"), "must be a string"),
    }

    match object.get("NPSN") {
        None => {}
        Some(Value::String(npsn)) => {
            if let Err(message) = validate_npsn(npsn) {
                report.push(ValidationSeverity::Error, field_context("NPSN"), message);
            }
        }
        Some(_) => report.push(ValidationSeverity::Error, field_context("NPSN"), "must be a string"),
    }

    for field in ["Nama Sekolah", "Alamat", "Kelurahan"] {
        match object.get(field) {
            None => {}
            Some(Value::String(value)) if value.trim().is_empty() => {
                report.push(ValidationSeverity::Error, field_context(field), "is empty")
            }
            Some(Value::String(_)) => {}
            Some(_) => report.push(ValidationSeverity::Error, field_context(field), "must be a string"),
        }
    }

    if let Some(name) = object.get("Nama Sekolah").and_then(Value::as_str) {
        if !name.trim().is_empty() && !name.contains(required_fragment) {
            report.push(
                ValidationSeverity::Error,
                field_context("Nama Sekolah"),
                format!("should include '{required_fragment}': {name}"),
            );
        }
    }

    match object.get("Status") {
        None => {}
        Some(Value::String(status)) if status == STATUS_NEGERI => {}
        Some(other) => report.push(
            ValidationSeverity::Error,
            field_context("Status"),
            format!(
                "must be '{STATUS_NEGERI}', got {}",
                other.as_str().map(|s| format!("'{s}'")).unwrap_or_else(|| other.to_string())
            ),
        ),
    }
}

/// Loads and validates one school file. Unreadable or structurally wrong
/// files yield a report with a single file-level error.
pub fn validate_file(path: &Path) -> FileValidation {
    let fragment = region_for_file(path)
        .map(|region| region.required_name_fragment())
        .unwrap_or_else(|| GENERIC_NAME_FRAGMENT.to_string());
    validate_file_with(path, &fragment)
}

pub fn validate_file_with(path: &Path, required_fragment: &str) -> FileValidation {
    let mut report = ValidationReport::default();
    match read_json::<Value>(path) {
        Err(err) => {
            let message = match err {
                Error::NotFound(_) => "file not found".to_string(),
                Error::Parse { source, .. } => format!("invalid JSON format: {source}"),
                other => other.to_string(),
            };
            report.push(ValidationSeverity::Error, "file", message);
        }
        Ok(Value::Array(records)) if records.is_empty() => {
            report.push(ValidationSeverity::Error, "file", "JSON array is empty");
        }
        Ok(Value::Array(records)) => {
            report = validate_records(&records, required_fragment);
        }
        Ok(_) => {
            report.push(ValidationSeverity::Error, "file", "JSON root must be an array");
        }
    }
    FileValidation {
        path: path.to_path_buf(),
        report,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const FRAGMENT: &str = "Kecamatan Ajibarang";

    fn school(no: usize, npsn: &str) -> Value {
        json!({
            "No": no.to_string(),
            "NPSN": npsn,
            "Nama Sekolah": format!("SD Negeri {no} Ajibarang Kecamatan Ajibarang"),
            "Alamat": "Jl. Raya Ajibarang",
            "Kelurahan": "Ajibarang Wetan",
            "Status": "NEGERI",
        })
    }

    fn conformant(count: usize) -> Vec<Value> {
        (1..=count)
            .map(|no| school(no, &format!("2030{:04}", no)))
            .collect()
    }

    #[test]
    fn conformant_records_validate_cleanly() {
        let report = validate_records(&conformant(5), FRAGMENT);
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.valid_records, 5);
        assert_eq!(report.invalid_records, 0);
    }

    #[test]
    fn every_violation_is_collected_not_just_the_first() {
        let mut records = conformant(4);
        records[0].as_object_mut().unwrap().remove("Alamat");
        records[1]["NPSN"] = json!("2030A002");
        records[2]["Status"] = json!("SWASTA");
        records[3]["No"] = json!("7");
        let report = validate_records(&records, FRAGMENT);
        assert!(report.has_errors());
        assert_eq!(report.invalid_records, 4);
        let messages: Vec<String> = report.errors().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("missing required field 'Alamat'")));
        assert!(messages.iter().any(|m| m.contains("record[2].NPSN")));
        assert!(messages.iter().any(|m| m.contains("got 'SWASTA'")));
        assert!(messages.iter().any(|m| m.contains("expected '4', got '7'")));
    }

    #[test]
    fn npsn_must_be_exactly_eight_digits() {
        assert!(validate_npsn("20302001").is_ok());
        assert!(validate_npsn("2030200").is_err());
        assert!(validate_npsn("203020011").is_err());
        assert!(validate_npsn("2030200x").is_err());
        assert!(validate_npsn("").is_err());
    }

    #[test]
    fn duplicate_npsn_is_reported_with_both_positions() {
        let mut records = conformant(3);
        records[2]["NPSN"] = records[0]["NPSN"].clone();
        let report = validate_records(&records, FRAGMENT);
        assert!(report.has_errors());
        assert_eq!(
            report.duplicate_npsn,
            ["NPSN 20300001 appears in records 1 and 3"]
        );
    }

    #[test]
    fn school_name_must_name_its_kecamatan() {
        let mut records = conformant(1);
        records[0]["Nama Sekolah"] = json!("SD Negeri 1 Wangon Kecamatan Wangon");
        let report = validate_records(&records, FRAGMENT);
        assert!(report
            .errors()
            .any(|d| d.message.contains("should include 'Kecamatan Ajibarang'")));
    }

    #[test]
    fn extra_fields_only_warn() {
        let mut records = conformant(1);
        records[0]["Akreditasi"] = json!("A");
        let report = validate_records(&records, FRAGMENT);
        assert!(!report.has_errors());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].severity, ValidationSeverity::Warning);
    }

    #[test]
    fn blank_text_fields_are_errors() {
        let mut records = conformant(1);
        records[0]["Alamat"] = json!("");
        records[0]["Kelurahan"] = json!("  ");
        let report = validate_records(&records, FRAGMENT);
        assert_eq!(report.invalid_records, 1);
        let contexts: Vec<&str> = report.errors().map(|d| d.context.as_str()).collect();
        assert_eq!(contexts, ["record[1].Alamat", "record[1].Kelurahan"]);
        assert!(report.errors().all(|d| d.message == "is empty"));
    }

    fn temp_dir(name: &str) -> PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("hirarki-validate-{name}-{stamp}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn single_file_error(result: &FileValidation) -> &ValidationDiagnostic {
        assert!(!result.is_valid());
        assert_eq!(result.report.diagnostics.len(), 1, "{:?}", result.report.diagnostics);
        let diag = &result.report.diagnostics[0];
        assert_eq!(diag.severity, ValidationSeverity::Error);
        assert_eq!(diag.context, "file");
        diag
    }

    #[test]
    fn unreadable_or_misshapen_files_get_one_file_error() {
        let dir = temp_dir("files");
        let cases = [
            ("sd_negeri_broken.json", Some("[{\"No\": \"1\","), "invalid JSON format"),
            ("sd_negeri_empty.json", Some("[]"), "JSON array is empty"),
            ("sd_negeri_object.json", Some("{\"No\": \"1\"}"), "JSON root must be an array"),
            ("sd_negeri_missing.json", None, "file not found"),
        ];
        for (name, content, expected) in cases {
            let path = dir.join(name);
            if let Some(content) = content {
                std::fs::write(&path, content).unwrap();
            }
            let result = validate_file(&path);
            let diag = single_file_error(&result);
            assert!(diag.message.starts_with(expected), "{name}: {}", diag.message);
            assert_eq!(result.report.total_records, 0);
        }
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn region_file_requires_its_own_kecamatan_name() {
        let dir = temp_dir("region");
        let path = dir.join("sd_negeri_ajibarang.json");
        let mut records = conformant(2);
        records[1]["Nama Sekolah"] = json!("SD Negeri 2 Kalibagor Kecamatan Kalibagor");
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let result = validate_file(&path);
        assert!(!result.is_valid());
        assert_eq!(result.report.valid_records, 1);
        assert!(validate_file_with(&path, GENERIC_NAME_FRAGMENT).is_valid());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn non_object_and_non_string_values_are_errors() {
        let records = vec![json!("SD Negeri 1"), json!({"No": 2, "NPSN": 20302002})];
        let report = validate_records(&records, FRAGMENT);
        assert_eq!(report.invalid_records, 2);
        assert!(report.errors().any(|d| d.message == "record is not an object"));
        assert!(report
            .errors()
            .any(|d| d.context == "record[2].No" && d.message == "must be a string"));
    }
}
