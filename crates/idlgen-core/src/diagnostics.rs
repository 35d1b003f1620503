use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Parse,
    Resolve,
    Lower,
    Emit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    Idg0001ParseError,
    Idg0201UnresolvedTypeRef,
    Idg0202DuplicateDeclaration,
    Idg0210UnsupportedTypeShape,
    Idg0301MissingProgramId,
}

impl DiagnosticCode {
    pub fn code_str(self) -> &'static str {
        match self {
            DiagnosticCode::Idg0001ParseError => "IDG0001",
            DiagnosticCode::Idg0201UnresolvedTypeRef => "IDG0201",
            DiagnosticCode::Idg0202DuplicateDeclaration => "IDG0202",
            DiagnosticCode::Idg0210UnsupportedTypeShape => "IDG0210",
            DiagnosticCode::Idg0301MissingProgramId => "IDG0301",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            DiagnosticCode::Idg0001ParseError => "failed to parse IDL document",
            DiagnosticCode::Idg0201UnresolvedTypeRef => "type reference does not resolve",
            DiagnosticCode::Idg0202DuplicateDeclaration => "duplicate declaration name",
            DiagnosticCode::Idg0210UnsupportedTypeShape => "unsupported type shape",
            DiagnosticCode::Idg0301MissingProgramId => "program id not declared anywhere",
        }
    }

    pub fn default_help(self) -> Option<&'static str> {
        match self {
            DiagnosticCode::Idg0001ParseError => {
                Some("Ensure the file is a JSON IDL produced by the anchor build tooling.")
            }
            DiagnosticCode::Idg0210UnsupportedTypeShape => Some(
                "The legacy coption shape has no supported wire form; change the program type.",
            ),
            DiagnosticCode::Idg0301MissingProgramId => Some(
                "Pass --program-id or add metadata.address to the IDL; otherwise edit the generated programId.ts by hand.",
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub phase: Phase,
    pub severity: Severity,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, phase: Phase, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            phase,
            severity: Severity::Error,
            message: message.into(),
            help: code.default_help().map(|s| s.to_string()),
        }
    }

    pub fn warning(code: DiagnosticCode, phase: Phase, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            phase,
            severity: Severity::Warning,
            message: message.into(),
            help: code.default_help().map(|s| s.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {:?}: {}",
            self.code.code_str(),
            self.phase,
            self.severity,
            self.message
        )?;
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}
