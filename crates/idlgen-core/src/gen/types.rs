//! Emits one source unit per declared composite: structs as a class with
//! round-trip methods, enums as one class per variant plus module-level
//! `fromDecoded` / `fromJSON` / `layout`, and the `types/index.ts`
//! aggregation unit.

use anyhow::Result;
use heck::{ToLowerCamelCase, ToSnakeCase};

use crate::gen::type_file_imports;
use crate::idl::{EnumFields, EnumVariant, Idl, IdlField, TypeDefKind};
use crate::lower::{
    self, fields_interface_name, json_interface_name, kind_interface_name, map_value,
    value_interface_name, FromDecoded, FromJson, Initializer, ToEncodable, ToJson,
};
use crate::ts::{ClassMember, SourceUnit, TsExpr, TsItem, TsParam, TsProp, TsStmt, TsType};

const TYPES_PREFIX: &str = "types.";

pub fn gen_types(idl: &Idl) -> Result<Vec<SourceUnit>> {
    if idl.types.is_empty() {
        return Ok(Vec::new());
    }

    let mut units = vec![gen_index(idl)];
    for def in &idl.types {
        let unit = match &def.ty {
            TypeDefKind::Struct { fields } => gen_struct_unit(idl, &def.name, fields)?,
            TypeDefKind::Enum { variants } => gen_enum_unit(idl, &def.name, variants)?,
        };
        units.push(unit);
    }
    Ok(units)
}

fn gen_index(idl: &Idl) -> SourceUnit {
    let mut items = Vec::new();
    for def in &idl.types {
        match &def.ty {
            TypeDefKind::Struct { .. } => items.push(TsItem::ExportFrom {
                names: vec![
                    def.name.clone(),
                    fields_interface_name(&def.name),
                    json_interface_name(&def.name),
                ],
                module: format!("./{}", def.name),
            }),
            TypeDefKind::Enum { variants } => {
                items.push(TsItem::namespace_import(
                    &def.name,
                    &format!("./{}", def.name),
                ));
                items.push(TsItem::ExportNames(vec![def.name.clone()]));
                items.push(TsItem::TypeAlias {
                    exported: true,
                    name: kind_interface_name(&def.name),
                    ty: TsType::Union(
                        variants
                            .iter()
                            .map(|v| TsType::name(format!("{}.{}", def.name, v.name)))
                            .collect(),
                    ),
                });
                items.push(TsItem::TypeAlias {
                    exported: true,
                    name: json_interface_name(&def.name),
                    ty: TsType::Union(
                        variants
                            .iter()
                            .map(|v| {
                                TsType::name(format!(
                                    "{}.{}",
                                    def.name,
                                    json_interface_name(&v.name)
                                ))
                            })
                            .collect(),
                    ),
                });
            }
        }
    }
    SourceUnit {
        path: "types/index.ts".to_string(),
        items,
    }
}

fn gen_struct_unit(idl: &Idl, name: &str, fields: &[IdlField]) -> Result<SourceUnit> {
    let mut items = type_file_imports();
    items.push(fields_interface(idl, name, fields)?);
    items.push(json_interface(idl, name, fields)?);
    items.push(struct_class(idl, name, fields)?);
    Ok(SourceUnit {
        path: format!("types/{name}.ts"),
        items,
    })
}

pub(crate) fn fields_interface(idl: &Idl, name: &str, fields: &[IdlField]) -> Result<TsItem> {
    let mut props = Vec::new();
    for field in fields {
        props.push((
            field.name.clone(),
            lower::native_type(idl, &field.ty, TYPES_PREFIX, true)?,
        ));
    }
    Ok(TsItem::Interface {
        exported: true,
        name: fields_interface_name(name),
        props,
    })
}

pub(crate) fn json_interface(idl: &Idl, name: &str, fields: &[IdlField]) -> Result<TsItem> {
    let mut props = Vec::new();
    for field in fields {
        props.push((
            field.name.clone(),
            lower::json_type(idl, &field.ty, TYPES_PREFIX)?,
        ));
    }
    Ok(TsItem::Interface {
        exported: true,
        name: json_interface_name(name),
        props,
    })
}

/// Builds the struct class shared by plain composites and stored
/// records; accounts extend the returned member list with their own
/// fetch and decode machinery.
pub(crate) fn struct_class_members(
    idl: &Idl,
    name: &str,
    fields: &[IdlField],
) -> Result<Vec<ClassMember>> {
    let mut members = Vec::new();

    for field in fields {
        members.push(ClassMember::Property {
            is_static: false,
            is_readonly: true,
            name: field.name.clone(),
            ty: Some(lower::native_type(idl, &field.ty, TYPES_PREFIX, false)?),
            init: None,
        });
    }

    // constructor: defensively reconstruct nested composites
    let mut body = Vec::new();
    for field in fields {
        let init = map_value(
            idl,
            &Initializer {
                prefix: TYPES_PREFIX,
            },
            TsExpr::path(&format!("fields.{}", field.name)),
            &field.ty,
        )?;
        body.push(TsStmt::Assign(
            TsExpr::path(&format!("this.{}", field.name)),
            init,
        ));
    }
    members.push(ClassMember::Ctor {
        params: vec![TsParam::new(
            "fields",
            TsType::name(fields_interface_name(name)),
        )],
        body,
    });

    Ok(members)
}

pub(crate) fn layout_array(idl: &Idl, fields: &[IdlField]) -> Result<TsExpr> {
    let mut layouts = Vec::new();
    for field in fields {
        layouts.push(lower::layout_for(
            idl,
            &field.ty,
            Some(&field.name),
            TYPES_PREFIX,
        )?);
    }
    Ok(TsExpr::Array(layouts))
}

pub(crate) fn from_decoded_object(idl: &Idl, fields: &[IdlField], src: &str) -> Result<TsExpr> {
    let mut props = Vec::new();
    for field in fields {
        let decoded = map_value(
            idl,
            &FromDecoded {
                prefix: TYPES_PREFIX,
            },
            TsExpr::path(&format!("{src}.{}", field.name)),
            &field.ty,
        )?;
        props.push(TsProp::KeyValue(field.name.clone(), decoded));
    }
    Ok(TsExpr::Object(props))
}

pub(crate) fn to_json_object(idl: &Idl, fields: &[IdlField]) -> Result<TsExpr> {
    let mut props = Vec::new();
    for field in fields {
        let json = map_value(
            idl,
            &ToJson,
            TsExpr::path(&format!("this.{}", field.name)),
            &field.ty,
        )?;
        props.push(TsProp::KeyValue(field.name.clone(), json));
    }
    Ok(TsExpr::Object(props))
}

pub(crate) fn from_json_object(idl: &Idl, fields: &[IdlField]) -> Result<TsExpr> {
    let mut props = Vec::new();
    for field in fields {
        let parsed = map_value(
            idl,
            &FromJson {
                prefix: TYPES_PREFIX,
            },
            TsExpr::path(&format!("obj.{}", field.name)),
            &field.ty,
        )?;
        props.push(TsProp::KeyValue(field.name.clone(), parsed));
    }
    Ok(TsExpr::Object(props))
}

fn struct_class(idl: &Idl, name: &str, fields: &[IdlField]) -> Result<TsItem> {
    let mut members = struct_class_members(idl, name, fields)?;

    // static layout(property?)
    members.push(ClassMember::Method {
        is_static: true,
        is_async: false,
        name: "layout".to_string(),
        params: vec![TsParam::optional("property", TsType::name("string"))],
        ret: None,
        body: vec![TsStmt::Return(Some(TsExpr::ident("borsh").method(
            "struct",
            vec![layout_array(idl, fields)?, TsExpr::ident("property")],
        )))],
    });

    // static fromDecoded(obj: any)
    members.push(ClassMember::Method {
        is_static: true,
        is_async: false,
        name: "fromDecoded".to_string(),
        params: vec![TsParam::new("obj", TsType::name("any"))],
        ret: None,
        body: vec![TsStmt::Return(Some(TsExpr::new_(
            TsExpr::ident(name),
            vec![from_decoded_object(idl, fields, "obj")?],
        )))],
    });

    // static toEncodable(fields)
    let mut enc_props = Vec::new();
    for field in fields {
        let enc = map_value(
            idl,
            &ToEncodable {
                prefix: TYPES_PREFIX,
            },
            TsExpr::path(&format!("fields.{}", field.name)),
            &field.ty,
        )?;
        enc_props.push(TsProp::KeyValue(field.name.clone(), enc));
    }
    members.push(ClassMember::Method {
        is_static: true,
        is_async: false,
        name: "toEncodable".to_string(),
        params: vec![TsParam::new(
            "fields",
            TsType::name(fields_interface_name(name)),
        )],
        ret: None,
        body: vec![TsStmt::Return(Some(TsExpr::Object(enc_props)))],
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

    // instance toEncodable
    members.push(ClassMember::Method {
        is_static: false,
        is_async: false,
        name: "toEncodable".to_string(),
        params: vec![],
        ret: None,
        body: vec![TsStmt::Return(Some(
            TsExpr::path(&format!("{name}.toEncodable")).call(vec![TsExpr::ident("this")]),
        ))],
    });

    Ok(TsItem::Class {
        exported: true,
        name: name.to_string(),
        extends: None,
        members,
    })
}

/// A named variant payload field, carrying the casing asymmetry: the
/// declared name appears snake_cased on the wire and camelCased in
/// native and JSON shapes.
struct VariantField<'a> {
    wire: String,
    native: String,
    ty: &'a crate::idl::IdlType,
}

fn variant_fields(variant: &EnumVariant) -> Vec<VariantField<'_>> {
    match &variant.fields {
        None => Vec::new(),
        Some(EnumFields::Named(fields)) => fields
            .iter()
            .map(|f| VariantField {
                wire: f.name.to_snake_case(),
                native: f.name.to_lower_camel_case(),
                ty: &f.ty,
            })
            .collect(),
        Some(EnumFields::Tuple(tys)) => tys
            .iter()
            .enumerate()
            .map(|(i, ty)| VariantField {
                wire: format!("_{i}"),
                native: format!("_{i}"),
                ty,
            })
            .collect(),
    }
}

fn is_tuple(variant: &EnumVariant) -> bool {
    matches!(variant.fields, Some(EnumFields::Tuple(_)))
}

fn gen_enum_unit(idl: &Idl, name: &str, variants: &[EnumVariant]) -> Result<SourceUnit> {
    let mut items = type_file_imports();

    for (ordinal, variant) in variants.iter().enumerate() {
        emit_variant(idl, &mut items, variant, ordinal)?;
    }

    items.push(enum_from_decoded(idl, name, variants)?);
    items.push(enum_from_json(idl, name, variants)?);
    items.push(enum_layout(idl, variants)?);

    Ok(SourceUnit {
        path: format!("types/{name}.ts"),
        items,
    })
}

fn emit_variant(
    idl: &Idl,
    items: &mut Vec<TsItem>,
    variant: &EnumVariant,
    ordinal: usize,
) -> Result<()> {
    let fields = variant_fields(variant);
    let tuple = is_tuple(variant);

    // fields / value aliases and the JSON interface
    if !fields.is_empty() {
        for (alias, use_fields) in [
            (fields_interface_name(&variant.name), true),
            (value_interface_name(&variant.name), false),
        ] {
            let ty = if tuple {
                let mut parts = Vec::new();
                for f in &fields {
                    parts.push(lower::native_type(idl, f.ty, TYPES_PREFIX, use_fields)?);
                }
                TsType::Tuple(parts)
            } else {
                let mut props = Vec::new();
                for f in &fields {
                    props.push((
                        f.native.clone(),
                        lower::native_type(idl, f.ty, TYPES_PREFIX, use_fields)?,
                    ));
                }
                TsType::Object(props)
            };
            items.push(TsItem::TypeAlias {
                exported: true,
                name: alias,
                ty,
            });
        }
    }

    let mut json_props = vec![("kind".to_string(), TsType::StrLit(variant.name.clone()))];
    if !fields.is_empty() {
        let value_ty = if tuple {
            let mut parts = Vec::new();
            for f in &fields {
                parts.push(lower::json_type(idl, f.ty, TYPES_PREFIX)?);
            }
            TsType::Tuple(parts)
        } else {
            let mut props = Vec::new();
            for f in &fields {
                props.push((f.native.clone(), lower::json_type(idl, f.ty, TYPES_PREFIX)?));
            }
            TsType::Object(props)
        };
        json_props.push(("value".to_string(), value_ty));
    }
    items.push(TsItem::Interface {
        exported: true,
        name: json_interface_name(&variant.name),
        props: json_props,
    });

    // variant class
    let mut members = vec![
        ClassMember::Property {
            is_static: false,
            is_readonly: true,
            name: "discriminator".to_string(),
            ty: None,
            init: Some(TsExpr::num(ordinal)),
        },
        ClassMember::Property {
            is_static: false,
            is_readonly: true,
            name: "kind".to_string(),
            ty: None,
            init: Some(TsExpr::str(&variant.name)),
        },
    ];

    if !fields.is_empty() {
        members.push(ClassMember::Property {
            is_static: false,
            is_readonly: true,
            name: "value".to_string(),
            ty: Some(TsType::name(value_interface_name(&variant.name))),
            init: None,
        });

        let init = Initializer {
            prefix: TYPES_PREFIX,
        };
        let value = if tuple {
            let mut elems = Vec::new();
            for (i, f) in fields.iter().enumerate() {
                let base = TsExpr::ident("value").index(TsExpr::num(i));
                elems.push(map_value(idl, &init, base, f.ty)?);
            }
            TsExpr::Array(elems)
        } else {
            let mut props = Vec::new();
            for f in &fields {
                let base = TsExpr::path(&format!("value.{}", f.native));
                props.push(TsProp::KeyValue(f.native.clone(), map_value(idl, &init, base, f.ty)?));
            }
            TsExpr::Object(props)
        };
        members.push(ClassMember::Ctor {
            params: vec![TsParam::new(
                "value",
                TsType::name(fields_interface_name(&variant.name)),
            )],
            body: vec![TsStmt::Assign(TsExpr::path("this.value"), value)],
        });
    }

    // toJSON
    let mut json_value = vec![TsProp::KeyValue(
        "kind".to_string(),
        TsExpr::str(&variant.name),
    )];
    if !fields.is_empty() {
        let value = if tuple {
            let mut elems = Vec::new();
            for (i, f) in fields.iter().enumerate() {
                let base = TsExpr::path("this.value").index(TsExpr::num(i));
                elems.push(map_value(idl, &ToJson, base, f.ty)?);
            }
            TsExpr::Array(elems)
        } else {
            let mut props = Vec::new();
            for f in &fields {
                let base = TsExpr::path(&format!("this.value.{}", f.native));
                props.push(TsProp::KeyValue(f.native.clone(), map_value(idl, &ToJson, base, f.ty)?));
            }
            TsExpr::Object(props)
        };
        json_value.push(TsProp::KeyValue("value".to_string(), value));
    }
    members.push(ClassMember::Method {
        is_static: false,
        is_async: false,
        name: "toJSON".to_string(),
        params: vec![],
        ret: Some(TsType::name(json_interface_name(&variant.name))),
        body: vec![TsStmt::Return(Some(TsExpr::Object(json_value)))],
    });

    // toEncodable: single-key wire object, payload keyed by wire names
    let enc = ToEncodable {
        prefix: TYPES_PREFIX,
    };
    let mut payload = Vec::new();
    for (i, f) in fields.iter().enumerate() {
        let base = if tuple {
            TsExpr::path("this.value").index(TsExpr::num(i))
        } else {
            TsExpr::path(&format!("this.value.{}", f.native))
        };
        payload.push(TsProp::KeyValue(f.wire.clone(), map_value(idl, &enc, base, f.ty)?));
    }
    members.push(ClassMember::Method {
        is_static: false,
        is_async: false,
        name: "toEncodable".to_string(),
        params: vec![],
        ret: None,
        body: vec![TsStmt::Return(Some(TsExpr::Object(vec![TsProp::KeyValue(
            variant.name.clone(),
            TsExpr::Object(payload),
        )])))],
    });

    items.push(TsItem::Class {
        exported: true,
        name: variant.name.clone(),
        extends: None,
        members,
    });
    Ok(())
}

fn enum_from_decoded(idl: &Idl, name: &str, variants: &[EnumVariant]) -> Result<TsItem> {
    let invalid = || TsExpr::throw_error("Invalid enum object");

    // exactly one variant key must be present; two matching keys would
    // otherwise silently decode as the first-declared variant
    let variant_names = TsExpr::Array(variants.iter().map(|v| TsExpr::str(&v.name)).collect());
    let key_filter = variant_names.method(
        "filter",
        vec![TsExpr::arrow(
            "kind",
            TsExpr::Binary(
                "in",
                Box::new(TsExpr::ident("kind")),
                Box::new(TsExpr::ident("obj")),
            ),
        )],
    );

    let mut body = vec![
        TsStmt::If {
            cond: TsExpr::Binary(
                "!==",
                Box::new(TsExpr::Raw("typeof obj".to_string())),
                Box::new(TsExpr::str("object")),
            ),
            then_body: vec![invalid()],
            else_body: vec![],
        },
        TsStmt::Const("matches".to_string(), key_filter),
        TsStmt::If {
            cond: TsExpr::Binary(
                "!==",
                Box::new(TsExpr::path("matches.length")),
                Box::new(TsExpr::num(1)),
            ),
            then_body: vec![invalid()],
            else_body: vec![],
        },
        TsStmt::Blank,
    ];

    for variant in variants {
        let fields = variant_fields(variant);
        let tuple = is_tuple(variant);
        let dec = FromDecoded {
            prefix: TYPES_PREFIX,
        };

        let mut then_body = Vec::new();
        let ctor_arg = if fields.is_empty() {
            None
        } else {
            then_body.push(TsStmt::Const(
                "val".to_string(),
                TsExpr::ident("obj").index_str(&variant.name),
            ));
            let arg = if tuple {
                let mut elems = Vec::new();
                for f in &fields {
                    let base = TsExpr::ident("val").index_str(&f.wire);
                    elems.push(map_value(idl, &dec, base, f.ty)?);
                }
                TsExpr::Array(elems)
            } else {
                let mut props = Vec::new();
                for f in &fields {
                    let base = TsExpr::ident("val").index_str(&f.wire);
                    props.push(TsProp::KeyValue(f.native.clone(), map_value(idl, &dec, base, f.ty)?));
                }
                TsExpr::Object(props)
            };
            Some(arg)
        };
        then_body.push(TsStmt::Return(Some(TsExpr::new_(
            TsExpr::ident(&variant.name),
            ctor_arg.into_iter().collect(),
        ))));

        body.push(TsStmt::If {
            cond: TsExpr::Binary(
                "in",
                Box::new(TsExpr::str(&variant.name)),
                Box::new(TsExpr::ident("obj")),
            ),
            then_body,
            else_body: vec![],
        });
    }

    body.push(TsStmt::Blank);
    body.push(invalid());

    Ok(TsItem::Function {
        exported: true,
        name: "fromDecoded".to_string(),
        params: vec![TsParam::new("obj", TsType::name("any"))],
        ret: Some(TsType::name(format!("types.{}", kind_interface_name(name)))),
        body,
    })
}

fn enum_from_json(idl: &Idl, name: &str, variants: &[EnumVariant]) -> Result<TsItem> {
    let mut cases = Vec::new();
    for variant in variants {
        let fields = variant_fields(variant);
        let tuple = is_tuple(variant);
        let from = FromJson {
            prefix: TYPES_PREFIX,
        };

        let ctor_arg = if fields.is_empty() {
            None
        } else if tuple {
            let mut elems = Vec::new();
            for (i, f) in fields.iter().enumerate() {
                let base = TsExpr::path("obj.value").index(TsExpr::num(i));
                elems.push(map_value(idl, &from, base, f.ty)?);
            }
            Some(TsExpr::Array(elems))
        } else {
            let mut props = Vec::new();
            for f in &fields {
                let base = TsExpr::path(&format!("obj.value.{}", f.native));
                props.push(TsProp::KeyValue(f.native.clone(), map_value(idl, &from, base, f.ty)?));
            }
            Some(TsExpr::Object(props))
        };

        cases.push((
            TsExpr::str(&variant.name),
            vec![TsStmt::Return(Some(TsExpr::new_(
                TsExpr::ident(&variant.name),
                ctor_arg.into_iter().collect(),
            )))],
        ));
    }

    Ok(TsItem::Function {
        exported: true,
        name: "fromJSON".to_string(),
        params: vec![TsParam::new(
            "obj",
            TsType::name(format!("types.{}", json_interface_name(name))),
        )],
        ret: Some(TsType::name(format!("types.{}", kind_interface_name(name)))),
        body: vec![TsStmt::Switch {
            scrutinee: TsExpr::path("obj.kind"),
            cases,
        }],
    })
}

fn enum_layout(idl: &Idl, variants: &[EnumVariant]) -> Result<TsItem> {
    let mut variant_layouts = Vec::new();
    for variant in variants {
        let fields = variant_fields(variant);
        let mut layouts = Vec::new();
        for f in &fields {
            layouts.push(lower::layout_for(idl, f.ty, Some(&f.wire), TYPES_PREFIX)?);
        }
        variant_layouts.push(TsExpr::ident("borsh").method(
            "struct",
            vec![TsExpr::Array(layouts), TsExpr::str(&variant.name)],
        ));
    }

    Ok(TsItem::Function {
        exported: true,
        name: "layout".to_string(),
        params: vec![TsParam::optional("property", TsType::name("string"))],
        ret: None,
        body: vec![
            TsStmt::Const(
                "ret".to_string(),
                TsExpr::ident("borsh").method("rustEnum", vec![TsExpr::Array(variant_layouts)]),
            ),
            TsStmt::If {
                cond: TsExpr::Binary(
                    "!==",
                    Box::new(TsExpr::ident("property")),
                    Box::new(TsExpr::Undefined),
                ),
                then_body: vec![TsStmt::Return(Some(
                    TsExpr::path("ret.replicate").call(vec![TsExpr::ident("property")]),
                ))],
                else_body: vec![],
            },
            TsStmt::Return(Some(TsExpr::ident("ret"))),
        ],
    })
}
