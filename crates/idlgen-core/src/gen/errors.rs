//! Emits the error surface: one class per framework error code, one per
//! program-declared code, and an index that maps transaction logs back to
//! a typed error instance.

use crate::anchor_errors::BUILTIN_ERRORS;
use crate::errors::CUSTOM_ERROR_MIN;
use crate::idl::Idl;
use crate::ts::{ClassMember, SourceUnit, TsExpr, TsItem, TsParam, TsStmt, TsType};

pub fn gen_errors(idl: &Idl) -> Vec<SourceUnit> {
    let mut units = vec![gen_index(idl), gen_anchor_unit()];
    if !idl.errors.is_empty() {
        units.push(gen_custom_unit(idl));
    }
    units
}

fn error_class(name: &str, code: u32, msg: &str) -> TsItem {
    let prop = |prop_name: &str, init: TsExpr| ClassMember::Property {
        is_static: false,
        is_readonly: true,
        name: prop_name.to_string(),
        ty: None,
        init: Some(init),
    };
    TsItem::Class {
        exported: true,
        name: name.to_string(),
        extends: Some("Error".to_string()),
        members: vec![
            prop("code", TsExpr::num(code)),
            prop("name", TsExpr::str(name)),
            prop("msg", TsExpr::str(msg)),
            ClassMember::Ctor {
                params: vec![],
                body: vec![TsStmt::Expr(
                    TsExpr::ident("super").call(vec![TsExpr::str(format!("{code}: {msg}"))]),
                )],
            },
        ],
    }
}

fn from_code_fn(ret: &str, cases: Vec<(u32, String)>) -> TsItem {
    let cases = cases
        .into_iter()
        .map(|(code, name)| {
            (
                TsExpr::num(code),
                vec![TsStmt::Return(Some(TsExpr::new_(
                    TsExpr::ident(name),
                    vec![],
                )))],
            )
        })
        .collect();
    TsItem::Function {
        exported: true,
        name: "fromCode".to_string(),
        params: vec![TsParam::new("code", TsType::name("number"))],
        ret: Some(TsType::name(ret)),
        body: vec![
            TsStmt::Switch {
                scrutinee: TsExpr::ident("code"),
                cases,
            },
            TsStmt::Blank,
            TsStmt::Return(Some(TsExpr::Null)),
        ],
    }
}

fn gen_anchor_unit() -> SourceUnit {
    let mut items = vec![TsItem::TypeAlias {
        exported: true,
        name: "AnchorError".to_string(),
        ty: TsType::Union(
            BUILTIN_ERRORS
                .iter()
                .map(|e| TsType::name(e.name))
                .collect(),
        ),
    }];
    for e in BUILTIN_ERRORS {
        items.push(error_class(e.name, e.code, e.msg));
    }
    items.push(from_code_fn(
        "AnchorError | null",
        BUILTIN_ERRORS
            .iter()
            .map(|e| (e.code, e.name.to_string()))
            .collect(),
    ));
    SourceUnit {
        path: "errors/anchor.ts".to_string(),
        items,
    }
}

fn gen_custom_unit(idl: &Idl) -> SourceUnit {
    let mut items = vec![TsItem::TypeAlias {
        exported: true,
        name: "CustomError".to_string(),
        ty: TsType::Union(idl.errors.iter().map(|e| TsType::name(&e.name)).collect()),
    }];
    for e in &idl.errors {
        items.push(error_class(&e.name, e.code, e.msg.as_deref().unwrap_or("")));
    }
    items.push(from_code_fn(
        "CustomError | null",
        idl.errors
            .iter()
            .map(|e| (e.code, e.name.clone()))
            .collect(),
    ));
    SourceUnit {
        path: "errors/custom.ts".to_string(),
        items,
    }
}

fn return_null() -> Vec<TsStmt> {
    vec![TsStmt::Return(Some(TsExpr::Null))]
}

fn gen_index(idl: &Idl) -> SourceUnit {
    let has_custom = !idl.errors.is_empty();
    let ret = if has_custom {
        "custom.CustomError | anchor.AnchorError | null"
    } else {
        "anchor.AnchorError | null"
    };

    let mut items = vec![
        TsItem::named_import(&["PROGRAM_ID"], "../programId"),
        TsItem::namespace_import("anchor", "./anchor"),
    ];
    if has_custom {
        items.push(TsItem::namespace_import("custom", "./custom"));
    }

    let from_code_body = if has_custom {
        vec![
            TsStmt::If {
                cond: TsExpr::Binary(
                    ">=",
                    Box::new(TsExpr::ident("code")),
                    Box::new(TsExpr::num(CUSTOM_ERROR_MIN)),
                ),
                then_body: vec![TsStmt::Return(Some(
                    TsExpr::path("custom.fromCode").call(vec![TsExpr::ident("code")]),
                ))],
                else_body: vec![],
            },
            TsStmt::Return(Some(
                TsExpr::path("anchor.fromCode").call(vec![TsExpr::ident("code")]),
            )),
        ]
    } else {
        vec![TsStmt::Return(Some(
            TsExpr::path("anchor.fromCode").call(vec![TsExpr::ident("code")]),
        ))]
    };
    items.push(TsItem::Function {
        exported: true,
        name: "fromCode".to_string(),
        params: vec![TsParam::new("code", TsType::name("number"))],
        ret: Some(TsType::name(ret)),
        body: from_code_body,
    });

    items.push(TsItem::Const {
        exported: false,
        name: "errorRe".to_string(),
        ty: None,
        init: TsExpr::Raw(r"/Program (\w+) failed: custom program error: (\w+)/".to_string()),
    });

    // Narrowing order matters: err must be a non-null object before the
    // `in` check, and logs must be an array before iterating.
    let bad_shape = TsExpr::Binary(
        "!==",
        Box::new(TsExpr::Raw("typeof err".to_string())),
        Box::new(TsExpr::str("object")),
    )
    .or(TsExpr::Binary(
        "===",
        Box::new(TsExpr::ident("err")),
        Box::new(TsExpr::Null),
    ))
    .or(TsExpr::Not(Box::new(
        TsExpr::Binary(
            "in",
            Box::new(TsExpr::str("logs")),
            Box::new(TsExpr::ident("err")),
        )
        .paren(),
    )))
    .or(TsExpr::Not(Box::new(
        TsExpr::path("Array.isArray").call(vec![TsExpr::path("err.logs")]),
    )));

    let body = vec![
        TsStmt::If {
            cond: bad_shape,
            then_body: return_null(),
            else_body: vec![],
        },
        TsStmt::Blank,
        TsStmt::Let(
            "firstMatch".to_string(),
            Some(TsType::name("RegExpExecArray | null")),
            Some(TsExpr::Null),
        ),
        TsStmt::ForOf {
            var: "logLine".to_string(),
            iter: TsExpr::path("err.logs"),
            body: vec![
                TsStmt::Assign(
                    TsExpr::ident("firstMatch"),
                    TsExpr::path("errorRe.exec").call(vec![TsExpr::ident("logLine")]),
                ),
                TsStmt::If {
                    cond: TsExpr::Binary(
                        "!==",
                        Box::new(TsExpr::ident("firstMatch")),
                        Box::new(TsExpr::Null),
                    ),
                    then_body: vec![TsStmt::Break],
                    else_body: vec![],
                },
            ],
        },
        TsStmt::Blank,
        TsStmt::If {
            cond: TsExpr::Binary(
                "===",
                Box::new(TsExpr::ident("firstMatch")),
                Box::new(TsExpr::Null),
            ),
            then_body: return_null(),
            else_body: vec![],
        },
        TsStmt::Blank,
        TsStmt::Const(
            "[programIdRaw, codeRaw]".to_string(),
            TsExpr::path("firstMatch.slice").call(vec![TsExpr::num(1)]),
        ),
        TsStmt::If {
            cond: TsExpr::Binary(
                "!==",
                Box::new(TsExpr::ident("programIdRaw")),
                Box::new(TsExpr::path("PROGRAM_ID.toString").call(vec![])),
            ),
            then_body: return_null(),
            else_body: vec![],
        },
        TsStmt::Blank,
        TsStmt::Const(
            "errorCode".to_string(),
            TsExpr::ident("parseInt").call(vec![TsExpr::ident("codeRaw"), TsExpr::num(16)]),
        ),
        TsStmt::If {
            cond: TsExpr::ident("isNaN").call(vec![TsExpr::ident("errorCode")]),
            then_body: return_null(),
            else_body: vec![],
        },
        TsStmt::Blank,
        TsStmt::Return(Some(
            TsExpr::ident("fromCode").call(vec![TsExpr::ident("errorCode")]),
        )),
    ];
    items.push(TsItem::Function {
        exported: true,
        name: "fromTxError".to_string(),
        params: vec![TsParam::new("err", TsType::name("unknown"))],
        ret: Some(TsType::name(ret)),
        body,
    });

    SourceUnit {
        path: "errors/index.ts".to_string(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts_emit::render_unit;

    fn idl_with_errors() -> Idl {
        Idl::from_json(
            r#"{
                "version": "0.1.0",
                "name": "example",
                "errors": [
                    {"code": 6000, "name": "SomeError", "msg": "Example error."},
                    {"code": 6001, "name": "OtherError"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn custom_classes_carry_code_name_msg() {
        let idl = idl_with_errors();
        let units = gen_errors(&idl);
        let custom = units.iter().find(|u| u.path == "errors/custom.ts").unwrap();
        let src = render_unit(custom);
        assert!(src.contains("export type CustomError = SomeError | OtherError"));
        assert!(src.contains("readonly code = 6000"));
        assert!(src.contains(r#"super("6000: Example error.")"#));
        // a missing message renders as an empty string, not "undefined"
        assert!(src.contains(r#"super("6001: ")"#));
        assert!(src.contains("case 6001: {"));
    }

    #[test]
    fn anchor_unit_covers_builtin_table() {
        let units = gen_errors(&idl_with_errors());
        let anchor = units.iter().find(|u| u.path == "errors/anchor.ts").unwrap();
        let src = render_unit(anchor);
        assert!(src.contains("export class InstructionMissing extends Error"));
        assert!(src.contains(r#"super("100: 8 byte instruction identifier not provided")"#));
        assert!(src.contains("case 5000: {"));
        assert!(src.contains("return new Deprecated()"));
    }

    #[test]
    fn index_scrapes_logs_and_dispatches() {
        let units = gen_errors(&idl_with_errors());
        let index = units.iter().find(|u| u.path == "errors/index.ts").unwrap();
        let src = render_unit(index);
        assert!(src.contains(r"const errorRe = /Program (\w+) failed: custom program error: (\w+)/"));
        assert!(src.contains("if (code >= 6000) {"));
        assert!(src.contains(r#"!("logs" in err)"#));
        assert!(src.contains("const [programIdRaw, codeRaw] = firstMatch.slice(1)"));
        assert!(src.contains("const errorCode = parseInt(codeRaw, 16)"));
        assert!(src.contains("if (isNaN(errorCode)) {"));
        assert!(src.contains("import * as custom from \"./custom\""));
    }

    #[test]
    fn no_custom_errors_skips_custom_unit() {
        let idl = Idl::from_json(r#"{"version": "0.1.0", "name": "bare"}"#).unwrap();
        let units = gen_errors(&idl);
        assert!(units.iter().all(|u| u.path != "errors/custom.ts"));
        let index = units.iter().find(|u| u.path == "errors/index.ts").unwrap();
        let src = render_unit(index);
        assert!(!src.contains("custom.fromCode"));
        assert!(src.contains("export function fromCode(code: number): anchor.AnchorError | null {"));
    }
}
