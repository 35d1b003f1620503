//! Error resolution mirroring what the generated `errors/` module does at
//! runtime: code lookup across the custom and built-in tables, and
//! scraping a custom error code out of free-form transaction logs. Any
//! line that doesn't match the expected shape resolves to no match, the
//! logs are diagnostic text of unknown provenance.

use crate::anchor_errors::{self, BuiltinError};
use crate::idl::{Idl, IdlErrorCode};

pub const CUSTOM_ERROR_MIN: u32 = 6000;

#[derive(Debug)]
pub enum ResolvedError<'a> {
    Custom(&'a IdlErrorCode),
    Builtin(&'static BuiltinError),
}

impl ResolvedError<'_> {
    pub fn name(&self) -> &str {
        match self {
            ResolvedError::Custom(e) => &e.name,
            ResolvedError::Builtin(e) => e.name,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ResolvedError::Custom(e) => e.code,
            ResolvedError::Builtin(e) => e.code,
        }
    }
}

pub fn lookup_error(idl: &Idl, code: u32) -> Option<ResolvedError<'_>> {
    if code >= CUSTOM_ERROR_MIN {
        idl.errors
            .iter()
            .find(|e| e.code == code)
            .map(ResolvedError::Custom)
    } else {
        anchor_errors::lookup(code).map(ResolvedError::Builtin)
    }
}

/// Scans log lines for `Program <id> failed: custom program error: <hex>`
/// and resolves the code against the declared and built-in tables. The
/// first line matching the pattern wins; a wrong program id, unparsable
/// code, or unknown code is a non-match, not an error.
pub fn from_tx_logs<'a>(
    idl: &'a Idl,
    expected_program_id: &str,
    logs: &[String],
) -> Option<ResolvedError<'a>> {
    let (program_id, code_raw) = logs.iter().find_map(|line| scrape_line(line))?;
    if program_id != expected_program_id {
        return None;
    }
    let code = parse_hex_code(code_raw)?;
    lookup_error(idl, code)
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scrape_line(line: &str) -> Option<(&str, &str)> {
    const MID: &str = " failed: custom program error: ";
    const HEAD: &str = "Program ";
    let mid = line.find(MID)?;
    let head = line[..mid].rfind(HEAD)? + HEAD.len();
    let program_id = &line[head..mid];
    if program_id.is_empty() || !program_id.chars().all(is_word) {
        return None;
    }
    let rest = &line[mid + MID.len()..];
    let end = rest.find(|c| !is_word(c)).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some((program_id, &rest[..end]))
}

fn parse_hex_code(raw: &str) -> Option<u32> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM_ID: &str = "J3X6ZBvnhHhMVSQkdUcDXumSJRNktS1SaUTRYcG1SG3i";

    fn idl_with_errors() -> Idl {
        Idl::from_json(
            r#"{
                "version": "0.1.0",
                "name": "example_program",
                "instructions": [],
                "errors": [
                    {"code": 6000, "name": "SomeError", "msg": "Example error."},
                    {"code": 6001, "name": "OtherError", "msg": "Another error."}
                ]
            }"#,
        )
        .unwrap()
    }

    fn logs(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn resolves_custom_error_from_logs() {
        let idl = idl_with_errors();
        let lines = logs(&[
            &format!("Program {PROGRAM_ID} invoke [1]"),
            &format!("Program {PROGRAM_ID} failed: custom program error: 0x1770"),
        ]);
        let err = from_tx_logs(&idl, PROGRAM_ID, &lines).unwrap();
        assert_eq!(err.name(), "SomeError");
        assert_eq!(err.code(), 6000);
    }

    #[test]
    fn resolves_builtin_error_from_logs() {
        let idl = idl_with_errors();
        // 0x7d1 = 2001 ConstraintHasOne
        let lines = logs(&[&format!(
            "Program {PROGRAM_ID} failed: custom program error: 0x7d1"
        )]);
        let err = from_tx_logs(&idl, PROGRAM_ID, &lines).unwrap();
        assert_eq!(err.name(), "ConstraintHasOne");
    }

    #[test]
    fn wrong_program_id_is_no_match() {
        let idl = idl_with_errors();
        let lines = logs(&["Program SomeOtherProgram1111 failed: custom program error: 0x1770"]);
        assert!(from_tx_logs(&idl, PROGRAM_ID, &lines).is_none());
    }

    #[test]
    fn unknown_code_and_garbage_are_no_match() {
        let idl = idl_with_errors();
        let unknown = logs(&[&format!(
            "Program {PROGRAM_ID} failed: custom program error: 0x2000"
        )]);
        assert!(from_tx_logs(&idl, PROGRAM_ID, &unknown).is_none());

        let garbage = logs(&["some unrelated log line", "Program log: hello"]);
        assert!(from_tx_logs(&idl, PROGRAM_ID, &garbage).is_none());

        assert!(from_tx_logs(&idl, PROGRAM_ID, &[]).is_none());
    }

    #[test]
    fn lookup_prefers_custom_range() {
        let idl = idl_with_errors();
        assert_eq!(lookup_error(&idl, 6001).unwrap().name(), "OtherError");
        assert_eq!(lookup_error(&idl, 100).unwrap().name(), "InstructionMissing");
        assert!(lookup_error(&idl, 6999).is_none());
    }

    #[test]
    fn resolved_errors_debug_format() {
        let idl = idl_with_errors();
        let custom = format!("{:?}", lookup_error(&idl, 6000).unwrap());
        assert!(custom.contains("SomeError"));
        let builtin = format!("{:?}", lookup_error(&idl, 100).unwrap());
        assert!(builtin.contains("InstructionMissing"));
    }
}
