//! Per-declaration emitters. Each produces self-contained source units
//! from the lowered projections; the orchestrator in `generate` stitches
//! them together with the index units.

pub mod accounts;
pub mod errors;
pub mod instructions;
pub mod program_id;
pub mod types;

use crate::ts::TsItem;

pub(crate) const WEB3_MODULE: &str = "@solana/web3.js";
pub(crate) const BORSH_MODULE: &str = "@project-serum/borsh";

/// Standard header for a generated type file: pubkey and bignum runtime
/// types, the sibling types namespace, and the borsh layout library.
pub(crate) fn type_file_imports() -> Vec<TsItem> {
    vec![
        TsItem::named_import(&["PublicKey"], WEB3_MODULE),
        TsItem::default_import("BN", "bn.js"),
        TsItem::namespace_import("types", "../types"),
        TsItem::namespace_import("borsh", BORSH_MODULE),
    ]
}

/// Header for account and instruction files, which additionally reach
/// the program id and the web3 client types.
pub(crate) fn client_file_imports(web3_names: &[&str]) -> Vec<TsItem> {
    vec![
        TsItem::named_import(web3_names, WEB3_MODULE),
        TsItem::default_import("BN", "bn.js"),
        TsItem::namespace_import("borsh", BORSH_MODULE),
        TsItem::namespace_import("types", "../types"),
        TsItem::named_import(&["PROGRAM_ID"], "../programId"),
    ]
}
