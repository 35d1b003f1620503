//! Single entry point: walk the IDL once and emit every source unit of
//! the client, in a stable order.

use anyhow::Result;

use crate::diagnostics::Diagnostic;
use crate::gen;
use crate::gen::program_id::resolve_program_id;
use crate::idl::Idl;
use crate::ts::SourceUnit;
use crate::ts_emit::render_unit;

#[derive(Debug)]
pub struct GeneratedClient {
    pub units: Vec<SourceUnit>,
    pub warnings: Vec<Diagnostic>,
}

impl GeneratedClient {
    /// Rendered `(relative path, source text)` pairs, ready to write out.
    pub fn files(&self) -> Vec<(String, String)> {
        self.units
            .iter()
            .map(|u| (u.path.clone(), render_unit(u)))
            .collect()
    }
}

pub fn generate(idl: &Idl, program_id_override: Option<&str>) -> Result<GeneratedClient> {
    let resolved = resolve_program_id(idl, program_id_override);

    let mut units = vec![gen::program_id::gen_program_id(&resolved.address)];
    units.extend(gen::errors::gen_errors(idl));
    units.extend(gen::types::gen_types(idl)?);
    units.extend(gen::accounts::gen_accounts(idl)?);
    units.extend(gen::instructions::gen_instructions(idl)?);

    Ok(GeneratedClient {
        units,
        warnings: resolved.warning.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDL: &str = r#"{
        "version": "0.1.0",
        "name": "example_program",
        "instructions": [
            {
                "name": "initialize",
                "accounts": [{"name": "state", "isMut": true, "isSigner": true}],
                "args": [{"name": "startValue", "type": "u64"}]
            }
        ],
        "accounts": [
            {
                "name": "State",
                "type": {"kind": "struct", "fields": [
                    {"name": "value", "type": "u64"}
                ]}
            }
        ],
        "types": [
            {
                "name": "Config",
                "type": {"kind": "struct", "fields": [
                    {"name": "admin", "type": "publicKey"}
                ]}
            }
        ],
        "errors": [{"code": 6000, "name": "SomeError", "msg": "uh oh"}],
        "metadata": {"address": "3rTQ3R4B2PxZrAyx7EUefySPgZY8RhJf16cZajbmrzp8"}
    }"#;

    #[test]
    fn emits_every_section_once() {
        let idl = Idl::from_json(IDL).unwrap();
        let client = generate(&idl, None).unwrap();
        let paths: Vec<&str> = client.units.iter().map(|u| u.path.as_str()).collect();
        for expected in [
            "programId.ts",
            "errors/index.ts",
            "errors/anchor.ts",
            "errors/custom.ts",
            "types/index.ts",
            "types/Config.ts",
            "accounts/index.ts",
            "accounts/State.ts",
            "instructions/index.ts",
            "instructions/initialize.ts",
        ] {
            assert_eq!(
                paths.iter().filter(|p| **p == expected).count(),
                1,
                "missing or duplicated: {expected}"
            );
        }
        assert!(client.warnings.is_empty());
    }

    #[test]
    fn empty_sections_emit_no_index() {
        let idl = Idl::from_json(r#"{"version": "0.1.0", "name": "bare"}"#).unwrap();
        let client = generate(&idl, None).unwrap();
        let paths: Vec<&str> = client.units.iter().map(|u| u.path.as_str()).collect();
        assert!(!paths.contains(&"types/index.ts"));
        assert!(!paths.contains(&"accounts/index.ts"));
        assert!(!paths.contains(&"instructions/index.ts"));
        // the error surface always exists; builtins do not depend on the IDL
        assert!(paths.contains(&"errors/index.ts"));
        assert_eq!(client.warnings.len(), 1);
    }

    #[test]
    fn files_render_with_declared_program_id() {
        let idl = Idl::from_json(IDL).unwrap();
        let client = generate(&idl, None).unwrap();
        let files = client.files();
        let (_, program_id) = files.iter().find(|(p, _)| p == "programId.ts").unwrap();
        assert!(program_id.contains("3rTQ3R4B2PxZrAyx7EUefySPgZY8RhJf16cZajbmrzp8"));

        let client = generate(&idl, Some("OverrideAddr111")).unwrap();
        let (_, program_id) = client
            .files()
            .into_iter()
            .find(|(p, _)| p == "programId.ts")
            .unwrap();
        assert!(program_id.contains("OverrideAddr111"));
    }
}
