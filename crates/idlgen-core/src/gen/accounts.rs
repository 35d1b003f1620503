//! Emits stored-record (account) client classes: the struct surface plus
//! the 8-byte discriminator, fetch helpers and the guarded decode.

use anyhow::Result;

use crate::discriminator::account_discriminator;
use crate::gen::client_file_imports;
use crate::gen::types::{
    fields_interface, from_decoded_object, from_json_object, json_interface, layout_array,
    struct_class_members, to_json_object,
};
use crate::idl::{Idl, IdlField, TypeDefKind};
use crate::lower::{fields_interface_name, json_interface_name};
use crate::ts::{
    ArrowBody, ClassMember, SourceUnit, TsExpr, TsItem, TsParam, TsStmt, TsType,
};

pub fn gen_accounts(idl: &Idl) -> Result<Vec<SourceUnit>> {
    if idl.accounts.is_empty() {
        return Ok(Vec::new());
    }

    let mut units = vec![gen_index(idl)];
    for def in &idl.accounts {
        let TypeDefKind::Struct { fields } = &def.ty else {
            anyhow::bail!(
                "{}",
                crate::diagnostics::Diagnostic::error(
                    crate::diagnostics::DiagnosticCode::Idg0210UnsupportedTypeShape,
                    crate::diagnostics::Phase::Emit,
                    format!("account {} must be a struct", def.name),
                )
            );
        };
        units.push(gen_account_unit(idl, &def.name, fields)?);
    }
    Ok(units)
}

fn gen_index(idl: &Idl) -> SourceUnit {
    let items = idl
        .accounts
        .iter()
        .map(|def| TsItem::ExportFrom {
            names: vec![
                def.name.clone(),
                fields_interface_name(&def.name),
                json_interface_name(&def.name),
            ],
            module: format!("./{}", def.name),
        })
        .collect();
    SourceUnit {
        path: "accounts/index.ts".to_string(),
        items,
    }
}

/// Both fetch paths share the same per-account guards: missing accounts
/// map to null, a foreign owner is an error.
fn owner_guard_stmts() -> Vec<TsStmt> {
    vec![
        TsStmt::If {
            cond: TsExpr::Binary(
                "===",
                Box::new(TsExpr::ident("info")),
                Box::new(TsExpr::Null),
            ),
            then_body: vec![TsStmt::Return(Some(TsExpr::Null))],
            else_body: vec![],
        },
        TsStmt::If {
            cond: TsExpr::Not(Box::new(
                TsExpr::path("info.owner").method("equals", vec![TsExpr::ident("PROGRAM_ID")]),
            )),
            then_body: vec![TsExpr::throw_error("account doesn't belong to this program")],
            else_body: vec![],
        },
        TsStmt::Blank,
        TsStmt::Return(Some(
            TsExpr::path("this.decode").call(vec![TsExpr::path("info.data")]),
        )),
    ]
}

fn gen_account_unit(idl: &Idl, name: &str, fields: &[IdlField]) -> Result<SourceUnit> {
    let mut items = client_file_imports(&["PublicKey", "Connection"]);

    items.push(fields_interface(idl, name, fields)?);
    items.push(json_interface(idl, name, fields)?);

    let mut members = struct_class_members(idl, name, fields)?;

    let discriminator = account_discriminator(name);
    // the ctor sits last; the static tables read better right after the
    // properties, matching the generated-class layout clients expect
    let ctor = members.pop();
    members.push(ClassMember::Property {
        is_static: true,
        is_readonly: true,
        name: "discriminator".to_string(),
        ty: None,
        init: Some(TsExpr::path("Buffer.from").call(vec![TsExpr::byte_array(&discriminator)])),
    });
    members.push(ClassMember::Property {
        is_static: true,
        is_readonly: true,
        name: "layout".to_string(),
        ty: None,
        init: Some(TsExpr::ident("borsh").method("struct", vec![layout_array(idl, fields)?])),
    });
    members.extend(ctor);

    // static async fetch
    members.push(ClassMember::Method {
        is_static: true,
        is_async: true,
        name: "fetch".to_string(),
        params: vec![
            TsParam::new("c", TsType::name("Connection")),
            TsParam::new("address", TsType::name("PublicKey")),
        ],
        ret: Some(TsType::promise_of(TsType::nullable(TsType::name(name)))),
        body: {
            let mut body = vec![
                TsStmt::Const(
                    "info".to_string(),
                    TsExpr::Await(Box::new(
                        TsExpr::ident("c").method("getAccountInfo", vec![TsExpr::ident("address")]),
                    )),
                ),
                TsStmt::Blank,
            ];
            body.extend(owner_guard_stmts());
            body
        },
    });

    // static async fetchMultiple: per-element outcome, input order kept
    members.push(ClassMember::Method {
        is_static: true,
        is_async: true,
        name: "fetchMultiple".to_string(),
        params: vec![
            TsParam::new("c", TsType::name("Connection")),
            TsParam::new("addresses", TsType::name("PublicKey[]")),
        ],
        ret: Some(TsType::promise_of(TsType::array_of(TsType::nullable(
            TsType::name(name),
        )))),
        body: vec![
            TsStmt::Const(
                "infos".to_string(),
                TsExpr::Await(Box::new(TsExpr::ident("c").method(
                    "getMultipleAccountsInfo",
                    vec![TsExpr::ident("addresses")],
                ))),
            ),
            TsStmt::Blank,
            TsStmt::Return(Some(TsExpr::path("infos.map").call(vec![TsExpr::Arrow(
                vec!["info".to_string()],
                ArrowBody::Block(owner_guard_stmts()),
            )]))),
        ],
    });

    // static decode: verify the leading discriminator, then destructure
    members.push(ClassMember::Method {
        is_static: true,
        is_async: false,
        name: "decode".to_string(),
        params: vec![TsParam::new("data", TsType::name("Buffer"))],
        ret: Some(TsType::name(name)),
        body: vec![
            TsStmt::If {
                cond: TsExpr::Not(Box::new(
                    TsExpr::ident("data")
                        .method("slice", vec![TsExpr::num(0), TsExpr::num(8)])
                        .method(
                            "equals",
                            vec![TsExpr::path(&format!("{name}.discriminator"))],
                        ),
                )),
                then_body: vec![TsExpr::throw_error("invalid account discriminator")],
                else_body: vec![],
            },
            TsStmt::Blank,
            TsStmt::Const(
                "dec".to_string(),
                TsExpr::path(&format!("{name}.layout")).method(
                    "decode",
                    vec![TsExpr::ident("data").method("slice", vec![TsExpr::num(8)])],
                ),
            ),
            TsStmt::Blank,
            TsStmt::Return(Some(TsExpr::new_(
                TsExpr::ident(name),
                vec![from_decoded_object(idl, fields, "dec")?],
            ))),
        ],
    });

    // toJSON / fromJSON
    members.push(ClassMember::Method {
        is_static: false,
        is_async: false,
        name: "toJSON".to_string(),
        params: vec![],
        ret: Some(TsType::name(json_interface_name(name))),
        body: vec![TsStmt::Return(Some(to_json_object(idl, fields)?))],
    });
    members.push(ClassMember::Method {
        is_static: true,
        is_async: false,
        name: "fromJSON".to_string(),
        params: vec![TsParam::new("obj", TsType::name(json_interface_name(name)))],
        ret: Some(TsType::name(name)),
        body: vec![TsStmt::Return(Some(TsExpr::new_(
            TsExpr::ident(name),
            vec![from_json_object(idl, fields)?],
        )))],
    });

    items.push(TsItem::Class {
        exported: true,
        name: name.to_string(),
        extends: None,
        members,
    });

    Ok(SourceUnit {
        path: format!("accounts/{name}.ts"),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::account_discriminator;
    use crate::ts_emit::render_unit;

    fn idl() -> Idl {
        Idl::from_json(
            r#"{
                "version": "0.1.0",
                "name": "example",
                "instructions": [],
                "accounts": [
                    {"name": "Counter", "type": {"kind": "struct", "fields": [
                        {"name": "count", "type": "u64"},
                        {"name": "authority", "type": "publicKey"}
                    ]}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn account_unit_carries_discriminator_and_guards() {
        let idl = idl();
        let units = gen_accounts(&idl).unwrap();
        let unit = units
            .iter()
            .find(|u| u.path == "accounts/Counter.ts")
            .unwrap();
        let src = render_unit(unit);

        let disc = account_discriminator("Counter");
        let bytes: Vec<String> = disc.iter().map(|b| b.to_string()).collect();
        assert!(src.contains(&format!(
            "static readonly discriminator = Buffer.from([{}])",
            bytes.join(", ")
        )));

        assert!(src.contains("static async fetch(c: Connection, address: PublicKey): Promise<Counter | null> {"));
        assert!(src.contains("if (!info.owner.equals(PROGRAM_ID)) {"));
        assert!(src.contains(r#"throw new Error("account doesn't belong to this program")"#));
        assert!(src.contains("if (!data.slice(0, 8).equals(Counter.discriminator)) {"));
        assert!(src.contains(r#"throw new Error("invalid account discriminator")"#));
        assert!(src.contains("return infos.map((info) => {"));
    }

    #[test]
    fn json_round_trip_widens_u64() {
        let idl = idl();
        let units = gen_accounts(&idl).unwrap();
        let unit = units
            .iter()
            .find(|u| u.path == "accounts/Counter.ts")
            .unwrap();
        let src = render_unit(unit);
        assert!(src.contains("count: this.count.toString()"));
        assert!(src.contains("count: new BN(obj.count)"));
        assert!(src.contains("authority: new PublicKey(obj.authority)"));
    }

    #[test]
    fn no_accounts_no_units() {
        let idl = Idl::from_json(
            r#"{"version": "0.1.0", "name": "empty", "instructions": []}"#,
        )
        .unwrap();
        assert!(gen_accounts(&idl).unwrap().is_empty());
    }
}
