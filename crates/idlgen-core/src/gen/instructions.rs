//! Emits one builder function per callable operation: flattened account
//! keys, the 8-byte identifier, and call-data assembled from the encoded
//! argument struct.

use anyhow::Result;
use heck::{ToLowerCamelCase, ToUpperCamelCase};

use crate::discriminator::instruction_identifier;
use crate::gen::client_file_imports;
use crate::idl::{Idl, IdlAccountItem, IdlInstruction};
use crate::lower::{self, map_value, ToEncodable};
use crate::ts::{SourceUnit, TsExpr, TsItem, TsParam, TsProp, TsStmt, TsType};

const TYPES_PREFIX: &str = "types.";

pub fn gen_instructions(idl: &Idl) -> Result<Vec<SourceUnit>> {
    if idl.instructions.is_empty() {
        return Ok(Vec::new());
    }

    let mut units = vec![gen_index(idl)];
    for ix in &idl.instructions {
        units.push(gen_instruction_unit(idl, ix)?);
    }
    Ok(units)
}

fn fn_name(ix: &IdlInstruction) -> String {
    ix.name.to_lower_camel_case()
}

fn args_interface_name(ix: &IdlInstruction) -> String {
    format!("{}Args", ix.name.to_upper_camel_case())
}

fn accounts_interface_name(ix: &IdlInstruction) -> String {
    format!("{}Accounts", ix.name.to_upper_camel_case())
}

fn gen_index(idl: &Idl) -> SourceUnit {
    let items = idl
        .instructions
        .iter()
        .map(|ix| {
            let mut names = vec![fn_name(ix)];
            if !ix.args.is_empty() {
                names.push(args_interface_name(ix));
            }
            if !ix.accounts.is_empty() {
                names.push(accounts_interface_name(ix));
            }
            TsItem::ExportFrom {
                names,
                module: format!("./{}", fn_name(ix)),
            }
        })
        .collect();
    SourceUnit {
        path: "instructions/index.ts".to_string(),
        items,
    }
}

/// The accounts interface mirrors the declared nesting; grouping is for
/// readability only and disappears in the flattened key list.
fn accounts_props(items: &[IdlAccountItem]) -> Vec<(String, TsType)> {
    items
        .iter()
        .map(|item| match item {
            IdlAccountItem::Account { name, .. } => (name.clone(), TsType::name("PublicKey")),
            IdlAccountItem::Group { name, accounts } => {
                (name.clone(), TsType::Object(accounts_props(accounts)))
            }
        })
        .collect()
}

/// Depth-first, declaration-order flatten of the account tree into
/// `{ pubkey, isSigner, isWritable }` entries.
fn flatten_keys(items: &[IdlAccountItem], path: &str, out: &mut Vec<TsExpr>) {
    for item in items {
        match item {
            IdlAccountItem::Account {
                name,
                is_mut,
                is_signer,
            } => {
                out.push(TsExpr::Object(vec![
                    TsProp::KeyValue(
                        "pubkey".to_string(),
                        TsExpr::path(&format!("{path}.{name}")),
                    ),
                    TsProp::KeyValue("isSigner".to_string(), TsExpr::Bool(*is_signer)),
                    TsProp::KeyValue("isWritable".to_string(), TsExpr::Bool(*is_mut)),
                ]));
            }
            IdlAccountItem::Group { name, accounts } => {
                flatten_keys(accounts, &format!("{path}.{name}"), out);
            }
        }
    }
}

fn gen_instruction_unit(idl: &Idl, ix: &IdlInstruction) -> Result<SourceUnit> {
    let mut items = client_file_imports(&["TransactionInstruction", "PublicKey"]);
    let has_args = !ix.args.is_empty();
    let has_accounts = !ix.accounts.is_empty();

    if has_args {
        let mut props = Vec::new();
        for arg in &ix.args {
            props.push((
                arg.name.clone(),
                lower::native_type(idl, &arg.ty, TYPES_PREFIX, true)?,
            ));
        }
        items.push(TsItem::Interface {
            exported: true,
            name: args_interface_name(ix),
            props,
        });
    }

    if has_accounts {
        items.push(TsItem::Interface {
            exported: true,
            name: accounts_interface_name(ix),
            props: accounts_props(&ix.accounts),
        });
    }

    if has_args {
        let mut layouts = Vec::new();
        for arg in &ix.args {
            layouts.push(lower::layout_for(idl, &arg.ty, Some(&arg.name), TYPES_PREFIX)?);
        }
        items.push(TsItem::Const {
            exported: true,
            name: "layout".to_string(),
            ty: None,
            init: TsExpr::ident("borsh").method("struct", vec![TsExpr::Array(layouts)]),
        });
    }

    // builder function
    let mut params = Vec::new();
    if has_args {
        params.push(TsParam::new("args", TsType::name(args_interface_name(ix))));
    }
    if has_accounts {
        params.push(TsParam::new(
            "accounts",
            TsType::name(accounts_interface_name(ix)),
        ));
    }

    let mut keys = Vec::new();
    flatten_keys(&ix.accounts, "accounts", &mut keys);

    let identifier = instruction_identifier(&ix.name);
    let mut body = vec![
        TsStmt::Const("keys".to_string(), TsExpr::Array(keys)),
        TsStmt::Const(
            "identifier".to_string(),
            TsExpr::path("Buffer.from").call(vec![TsExpr::byte_array(&identifier)]),
        ),
    ];

    if has_args {
        let mut enc_props = Vec::new();
        for arg in &ix.args {
            let enc = map_value(
                idl,
                &ToEncodable {
                    prefix: TYPES_PREFIX,
                },
                TsExpr::path(&format!("args.{}", arg.name)),
                &arg.ty,
            )?;
            enc_props.push(TsProp::KeyValue(arg.name.clone(), enc));
        }
        body.push(TsStmt::Const(
            "buffer".to_string(),
            TsExpr::path("Buffer.alloc").call(vec![TsExpr::num(1000)]),
        ));
        body.push(TsStmt::Const(
            "len".to_string(),
            TsExpr::path("layout.encode")
                .call(vec![TsExpr::Object(enc_props), TsExpr::ident("buffer")]),
        ));
        body.push(TsStmt::Const(
            "data".to_string(),
            TsExpr::path("Buffer.concat")
                .call(vec![TsExpr::Array(vec![
                    TsExpr::ident("identifier"),
                    TsExpr::ident("buffer"),
                ])])
                .method(
                    "slice",
                    vec![
                        TsExpr::num(0),
                        TsExpr::Binary(
                            "+",
                            Box::new(TsExpr::num(8)),
                            Box::new(TsExpr::ident("len")),
                        ),
                    ],
                ),
        ));
    } else {
        body.push(TsStmt::Const(
            "data".to_string(),
            TsExpr::ident("identifier"),
        ));
    }

    body.push(TsStmt::Const(
        "ix".to_string(),
        TsExpr::new_(
            TsExpr::ident("TransactionInstruction"),
            vec![TsExpr::Object(vec![
                TsProp::KeyValue("keys".to_string(), TsExpr::ident("keys")),
                TsProp::KeyValue("programId".to_string(), TsExpr::ident("PROGRAM_ID")),
                TsProp::KeyValue("data".to_string(), TsExpr::ident("data")),
            ])],
        ),
    ));
    body.push(TsStmt::Return(Some(TsExpr::ident("ix"))));

    items.push(TsItem::Function {
        exported: true,
        name: fn_name(ix),
        params,
        ret: None,
        body,
    });

    Ok(SourceUnit {
        path: format!("instructions/{}.ts", fn_name(ix)),
        items,
    })
}
