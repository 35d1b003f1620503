//! Emits `programId.ts` and resolves which address goes in it.

use crate::diagnostics::{Diagnostic, DiagnosticCode, Phase};
use crate::gen::WEB3_MODULE;
use crate::idl::Idl;
use crate::ts::{SourceUnit, TsExpr, TsItem, TsType};

/// The system program address, used when no real address is known. The
/// generated client still compiles; the caller edits the constant by hand.
pub const PLACEHOLDER_PROGRAM_ID: &str = "11111111111111111111111111111111";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgramId {
    pub address: String,
    /// Set when neither a CLI override nor `metadata.address` supplied an
    /// address and the placeholder went in instead.
    pub warning: Option<Diagnostic>,
}

/// A CLI override wins over the address declared in the IDL.
pub fn resolve_program_id(idl: &Idl, cli_override: Option<&str>) -> ResolvedProgramId {
    if let Some(addr) = cli_override {
        return ResolvedProgramId {
            address: addr.to_string(),
            warning: None,
        };
    }
    if let Some(addr) = idl.program_address() {
        return ResolvedProgramId {
            address: addr.to_string(),
            warning: None,
        };
    }
    ResolvedProgramId {
        address: PLACEHOLDER_PROGRAM_ID.to_string(),
        warning: Some(Diagnostic::warning(
            DiagnosticCode::Idg0301MissingProgramId,
            Phase::Resolve,
            "no program id found; generated programId.ts with a placeholder",
        )),
    }
}

pub fn gen_program_id(address: &str) -> SourceUnit {
    SourceUnit {
        path: "programId.ts".to_string(),
        items: vec![
            TsItem::named_import(&["PublicKey"], WEB3_MODULE),
            TsItem::Const {
                exported: true,
                name: "PROGRAM_ID".to_string(),
                ty: Some(TsType::name("PublicKey")),
                init: TsExpr::new_(TsExpr::ident("PublicKey"), vec![TsExpr::str(address)]),
            },
        ],
    }
}
